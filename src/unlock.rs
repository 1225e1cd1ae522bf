//! Opening password-protected key material.
//!
//! [`Unlocker::unlock`] reads a file once and hands its bytes to a decoder, first
//! with the initially supplied password (if any) and then with every password the
//! [`PasswordSource`] produces, until the decoder succeeds. Decoders tell a wrong
//! password apart from broken data through [`DecodeFailure`]; only the former is
//! retried.

use std::path::Path;

use zeroize::Zeroizing;

use crate::config::KeyCertConfig;
use crate::error::{KeyCertError, Result};
use crate::observer::{LoadEvent, LoadObserver, TracingObserver};
use crate::password::{PasswordSource, TerminalPrompt};

/// Why a decoder could not produce a value from the file contents.
#[derive(Debug)]
pub enum DecodeFailure {
    /// The password was missing or wrong; another one may work.
    PasswordRejected(String),
    /// The data itself is unusable. Not retried.
    Malformed(KeyCertError),
}

impl From<KeyCertError> for DecodeFailure {
    fn from(err: KeyCertError) -> Self {
        DecodeFailure::Malformed(err)
    }
}

/// Drives the password retry loop for one or more files.
///
/// # Example
/// ```no_run
/// use keycert::pair::KeyCertPair;
/// use keycert::unlock::Unlocker;
///
/// # fn main() -> keycert::error::Result<()> {
/// let mut unlocker = Unlocker::interactive();
/// let pair = KeyCertPair::from_pkcs12("identity.p12", &mut unlocker)?;
/// println!("{}", pair.certificate_common_name()?);
/// # Ok(())
/// # }
/// ```
pub struct Unlocker<P, O> {
    passwords: P,
    observer: O,
    initial_password: Option<Zeroizing<String>>,
    max_attempts: Option<u32>,
}

impl Unlocker<TerminalPrompt, TracingObserver> {
    /// Prompts on the terminal and logs through `tracing`.
    pub fn interactive() -> Self {
        Self::new(TerminalPrompt, TracingObserver)
    }
}

impl<P: PasswordSource, O: LoadObserver> Unlocker<P, O> {
    pub fn new(passwords: P, observer: O) -> Self {
        Self {
            passwords,
            observer,
            initial_password: None,
            max_attempts: None,
        }
    }

    /// Password tried before asking the password source.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.initial_password = Some(Zeroizing::new(password.into()));
        self
    }

    /// Gives up after `limit` rejected passwords. `None` keeps asking forever.
    pub fn max_attempts(mut self, limit: Option<u32>) -> Self {
        self.max_attempts = limit;
        self
    }

    /// Takes the attempt bound from `config.max_password_attempts`.
    pub fn with_config(self, config: &KeyCertConfig) -> Self {
        self.max_attempts(config.max_password_attempts)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Fails with [`KeyCertError::Configuration`] unless `path` is a regular file.
    pub fn require_file(&self, path: &Path) -> Result<()> {
        if path.is_file() {
            return Ok(());
        }
        self.observer.on_event(&LoadEvent::MissingFile {
            path: path.to_path_buf(),
        });
        Err(KeyCertError::Configuration {
            path: path.to_path_buf(),
        })
    }

    /// Reads `path` and decodes it, asking for passwords until `decode` accepts one.
    ///
    /// The first attempt uses the initial password, or none. After that each
    /// attempt uses a freshly requested password. A rejection is reported to the
    /// observer only when a password was actually supplied.
    pub fn unlock<T, F>(&mut self, path: &Path, mut decode: F) -> Result<T>
    where
        F: FnMut(&[u8], Option<&str>) -> std::result::Result<T, DecodeFailure>,
    {
        let contents = Zeroizing::new(std::fs::read(path)?);
        let mut password = self.initial_password.clone();
        let mut prompts = 0u32;
        let mut rejected = 0u32;

        loop {
            let outcome = decode(contents.as_slice(), password.as_deref().map(String::as_str));
            match outcome {
                Ok(value) => {
                    self.observer.on_event(&LoadEvent::Unlocked {
                        path: path.to_path_buf(),
                        prompts,
                    });
                    return Ok(value);
                }
                Err(DecodeFailure::Malformed(err)) => return Err(err),
                Err(DecodeFailure::PasswordRejected(reason)) => {
                    if password.is_some() {
                        rejected += 1;
                        self.observer.on_event(&LoadEvent::PasswordRejected {
                            path: path.to_path_buf(),
                            reason,
                        });
                        if self.max_attempts.is_some_and(|limit| rejected >= limit) {
                            return Err(KeyCertError::PasswordAttemptsExhausted {
                                path: path.to_path_buf(),
                                attempts: rejected,
                            });
                        }
                    }
                    prompts += 1;
                    password = Some(self.passwords.request_password(path)?);
                }
            }
        }
    }
}
