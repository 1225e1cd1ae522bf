use crate::error::{KeyCertError, Result};

/// Parse the first PEM block of a file.
pub fn parse(bytes: &[u8]) -> Result<pem::Pem> {
    if bytes.is_empty() {
        return Err(KeyCertError::Parse("empty PEM input".to_string()));
    }
    Ok(pem::parse(bytes)?)
}
