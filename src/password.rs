//! Where passwords come from: the operator's terminal, a fixed script, or the
//! export password generator.

use std::collections::VecDeque;
use std::path::Path;

use rand::distr::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, TryRngCore};
use zeroize::Zeroizing;

use crate::error::{KeyCertError, Result};

/// Supplies passwords for encrypted key material, one request at a time.
pub trait PasswordSource {
    /// Asks for the password that unlocks `path`.
    ///
    /// An error ends the unlock attempt; this is how a closed terminal or a
    /// cancelled prompt surfaces.
    fn request_password(&mut self, path: &Path) -> Result<Zeroizing<String>>;
}

impl<T: PasswordSource + ?Sized> PasswordSource for &mut T {
    fn request_password(&mut self, path: &Path) -> Result<Zeroizing<String>> {
        (**self).request_password(path)
    }
}

/// Prompts on the controlling terminal with `Password for <path>: ` and reads
/// the answer without echo.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl PasswordSource for TerminalPrompt {
    fn request_password(&mut self, path: &Path) -> Result<Zeroizing<String>> {
        let prompt = format!("Password for {}: ", path.display());
        rpassword::prompt_password(prompt)
            .map(Zeroizing::new)
            .map_err(|e| KeyCertError::PasswordUnavailable(e.to_string()))
    }
}

/// Hands out a fixed sequence of passwords, then fails.
///
/// # Example
/// ```
/// use std::path::Path;
/// use keycert::password::{PasswordSource, ScriptedPasswords};
///
/// let mut script = ScriptedPasswords::new(["first", "second"]);
/// assert_eq!(script.request_password(Path::new("key.pem")).unwrap().as_str(), "first");
/// assert_eq!(script.requests(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPasswords {
    remaining: VecDeque<Zeroizing<String>>,
    requests: u32,
}

impl ScriptedPasswords {
    pub fn new<I, S>(passwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            remaining: passwords
                .into_iter()
                .map(|p| Zeroizing::new(p.into()))
                .collect(),
            requests: 0,
        }
    }

    /// Number of times a password was asked for, including failed requests.
    pub fn requests(&self) -> u32 {
        self.requests
    }
}

impl PasswordSource for ScriptedPasswords {
    fn request_password(&mut self, path: &Path) -> Result<Zeroizing<String>> {
        self.requests += 1;
        self.remaining.pop_front().ok_or_else(|| {
            KeyCertError::PasswordUnavailable(format!(
                "no scripted password left for {}",
                path.display()
            ))
        })
    }
}

/// Generates a password of `length` characters drawn uniformly from `[A-Za-z0-9]`
/// using the operating system's CSPRNG.
pub fn generate_export_password(length: usize) -> Zeroizing<String> {
    let mut rng = OsRng.unwrap_err();
    Zeroizing::new(
        (&mut rng)
            .sample_iter(Alphanumeric)
            .take(length)
            .map(char::from)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_password_alphabet_and_length() {
        let password = generate_export_password(20);
        assert_eq!(password.len(), 20);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_export_passwords_differ() {
        let first = generate_export_password(20);
        let second = generate_export_password(20);
        assert_ne!(first, second);
    }

    #[test]
    fn test_scripted_passwords_run_out() {
        let mut script = ScriptedPasswords::new(["only"]);
        let path = Path::new("key.pem");
        assert_eq!(script.request_password(path).unwrap().as_str(), "only");
        let err = script.request_password(path).unwrap_err();
        assert!(matches!(err, KeyCertError::PasswordUnavailable(_)));
        assert_eq!(script.requests(), 2);
    }
}
