pub mod params;

use der::asn1::{Ia5StringRef, PrintableStringRef, Utf8StringRef};
use der::{Decode, DecodePem, Encode, EncodePem, Tag, Tagged};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::certificate::CertificateInner;

use crate::error::{KeyCertError, Result};
use params::COMMON_NAME;

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Decodes a DER-encoded certificate.
    ///
    /// # Errors
    /// [`KeyCertError::Parse`] when `der` is not a certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        Ok(Self {
            inner: CertificateInner::from_der(der)?,
        })
    }

    /// Decodes a PEM `CERTIFICATE` block.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        Ok(Self {
            inner: CertificateInner::from_pem(pem)?,
        })
    }

    /// Encodes the certificate into DER format.
    ///
    /// # Returns
    /// A byte vector containing the DER-encoded certificate.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| KeyCertError::Encoding(e.to_string()))
    }

    /// Encodes the certificate into PEM format.
    ///
    /// # Returns
    /// A string containing the PEM-encoded certificate.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| KeyCertError::Encoding(e.to_string()))
    }

    /// DER-encoded SubjectPublicKeyInfo carried by the certificate.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        self.inner
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| KeyCertError::Encoding(e.to_string()))
    }

    /// Returns the first common name in the subject.
    ///
    /// # Errors
    /// [`KeyCertError::CommonNameNotFound`] when the subject has no CN attribute.
    pub fn common_name(&self) -> Result<String> {
        let attr = self
            .inner
            .tbs_certificate
            .subject
            .0
            .iter()
            .flat_map(|rdn| rdn.0.iter())
            .find(|attr| attr.oid == COMMON_NAME)
            .ok_or(KeyCertError::CommonNameNotFound)?;
        directory_string(attr)
    }
}

fn directory_string(attr: &AttributeTypeAndValue) -> Result<String> {
    let value = &attr.value;
    let text = match value.tag() {
        Tag::Utf8String => value.decode_as::<Utf8StringRef<'_>>()?.as_str().to_owned(),
        Tag::PrintableString => value
            .decode_as::<PrintableStringRef<'_>>()?
            .as_str()
            .to_owned(),
        Tag::Ia5String => value.decode_as::<Ia5StringRef<'_>>()?.as_str().to_owned(),
        other => {
            return Err(KeyCertError::Parse(format!(
                "Unsupported common name encoding {other}"
            )));
        }
    };
    Ok(text)
}
