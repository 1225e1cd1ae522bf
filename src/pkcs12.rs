use p12_keystore::KeyStore;
use p12_keystore::error::Error as KeyStoreError;

use crate::cert::Certificate;
use crate::error::KeyCertError;
use crate::key::PrivateKey;
use crate::unlock::DecodeFailure;

/// Decodes a PKCS#12 container into its private key and leaf certificate.
///
/// Input that is not a PFX structure is malformed and never retried. A failed
/// MAC check, or a bag that will not decrypt, is blamed on the password. "No
/// password" is tried as the empty password.
pub fn decode(
    der: &[u8],
    password: Option<&str>,
) -> std::result::Result<(PrivateKey, Certificate), DecodeFailure> {
    der::Document::try_from(der)
        .map_err(|e| KeyCertError::Parse(format!("not a PKCS#12 file: {e}")))?;

    let store =
        KeyStore::from_pkcs12(der, password.unwrap_or_default()).map_err(classify)?;

    let (_alias, chain) = store
        .private_key_chain()
        .ok_or_else(|| KeyCertError::Parse("PKCS#12 file holds no private key".to_string()))?;

    let key = PrivateKey::from_pkcs8_der(chain.key())?;
    let leaf = chain
        .chain()
        .first()
        .ok_or_else(|| KeyCertError::Parse("PKCS#12 file holds no certificate".to_string()))?;
    let certificate = Certificate::from_der(leaf.as_der())?;

    Ok((key, certificate))
}

/// Splits keystore errors into structural problems and password problems.
fn classify(err: KeyStoreError) -> DecodeFailure {
    match err {
        KeyStoreError::DerError { .. }
        | KeyStoreError::InvalidVersion { .. }
        | KeyStoreError::UnsupportedContentType { .. }
        | KeyStoreError::UnsupportedMacAlgorithm { .. } => {
            DecodeFailure::Malformed(KeyCertError::Parse(format!("not a PKCS#12 file: {err}")))
        }
        // MacError, plus decryption failures in containers without a MAC.
        other => DecodeFailure::PasswordRejected(other.to_string()),
    }
}
