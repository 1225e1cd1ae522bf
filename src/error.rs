//! use keycert::error::KeyCertError;

use std::path::PathBuf;

use thiserror::Error;

/// Represents errors that can occur while loading, using or exporting a key pair.
///
/// Wrong passwords never show up here: the unlock protocol handles them by
/// asking again.
#[derive(Debug, Error)]
pub enum KeyCertError {
    /// An input file named by the caller does not exist or is not a regular file.
    #[error("'{}' is not a file", path.display())]
    Configuration { path: PathBuf },

    /// Cryptographic material that could not be decoded, for reasons other than a password.
    #[error("Failed to parse: {0}")]
    Parse(String),

    /// The operation needs a certificate and none is attached.
    #[error("No certificate is attached to this key pair")]
    MissingCertificate,

    /// The attached certificate has no subject common name.
    #[error("Certificate subject has no common name")]
    CommonNameNotFound,

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    Encoding(String),

    /// Error from RSA operations.
    #[error("RSA error: {0}")]
    Rsa(String),

    /// A signature could not be produced or did not verify.
    #[error("Signature error: {0}")]
    Signature(String),

    /// The password source could not supply another password.
    #[error("No password available: {0}")]
    PasswordUnavailable(String),

    /// The configured bound on password attempts was reached.
    #[error("Gave up on '{}' after {attempts} rejected passwords", path.display())]
    PasswordAttemptsExhausted { path: PathBuf, attempts: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<der::Error> for KeyCertError {
    /// Converts a `der::Error` into a `KeyCertError`.
    fn from(err: der::Error) -> Self {
        KeyCertError::Parse(err.to_string())
    }
}

impl From<pkcs8::Error> for KeyCertError {
    fn from(err: pkcs8::Error) -> Self {
        KeyCertError::Parse(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for KeyCertError {
    fn from(err: pkcs8::spki::Error) -> Self {
        KeyCertError::Encoding(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for KeyCertError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        KeyCertError::Parse(err.to_string())
    }
}

impl From<pem::PemError> for KeyCertError {
    fn from(err: pem::PemError) -> Self {
        KeyCertError::Parse(err.to_string())
    }
}

impl From<rsa::Error> for KeyCertError {
    fn from(err: rsa::Error) -> Self {
        KeyCertError::Rsa(err.to_string())
    }
}

impl From<rsa::signature::Error> for KeyCertError {
    fn from(err: rsa::signature::Error) -> Self {
        KeyCertError::Signature(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KeyCertError>;
