use der::Encode;
use der::asn1::{BitString, UtcTime};
use rand_core::{OsRng, RngCore};
use x509_cert::Version;
use x509_cert::certificate::{CertificateInner, TbsCertificateInner};
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Time;

use crate::cert::Certificate;
use crate::cert::params::{DistinguishedName, Validity};
use crate::csr::sha256_with_rsa;
use crate::error::{KeyCertError, Result};
use crate::key::PrivateKey;

/// Issues a v3 certificate for `key`'s own public key, signed by `key`.
///
/// Issuer and subject are both `subject`; the serial number is 16 random bytes.
/// No extensions are added.
pub fn self_signed(
    key: &PrivateKey,
    subject: &DistinguishedName,
    validity: &Validity,
) -> Result<Certificate> {
    let name = subject.as_x509_name()?;

    let tbs_certificate = TbsCertificateInner {
        version: Version::V3,
        serial_number: random_serial_number()?,
        signature: sha256_with_rsa(),
        issuer: name.clone(),
        validity: x509_cert::time::Validity {
            not_before: utc_time(validity.not_before)?,
            not_after: utc_time(validity.not_after)?,
        },
        subject: name,
        subject_public_key_info: key.as_spki()?,
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: None,
    };

    let signature = key.sign_pkcs1v15_sha256(&tbs_certificate.to_der()?)?;

    let inner = CertificateInner {
        tbs_certificate,
        signature_algorithm: sha256_with_rsa(),
        signature: BitString::from_bytes(&signature)?,
    };
    Ok(Certificate { inner })
}

fn random_serial_number() -> Result<SerialNumber> {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    // Positive and without a redundant leading zero.
    bytes[0] = (bytes[0] & 0x7f) | 0x40;
    Ok(SerialNumber::new(&bytes)?)
}

fn utc_time(at: time::OffsetDateTime) -> Result<Time> {
    UtcTime::from_system_time(at.into())
        .map(Time::UtcTime)
        .map_err(|e| KeyCertError::Encoding(e.to_string()))
}
