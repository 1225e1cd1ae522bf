use der::asn1::{BitString, SetOfVec};
use der::{Any, Encode};
use x509_cert::request::{CertReq, CertReqInfo, Version};
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::cert::params::DistinguishedName;
use crate::error::{KeyCertError, Result};
use crate::key::PrivateKey;

/// `sha256WithRSAEncryption` with the NULL parameters RFC 4055 asks for.
pub(crate) fn sha256_with_rsa() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
        parameters: Some(Any::null()),
    }
}

/// Builds a PKCS#10 request for `subject`, signed by `key`, and returns its DER encoding.
///
/// The request carries no attributes.
pub fn build_csr(key: &PrivateKey, subject: &DistinguishedName) -> Result<Vec<u8>> {
    let info = CertReqInfo {
        version: Version::V1,
        subject: subject.as_x509_name()?,
        public_key: key.as_spki()?,
        attributes: SetOfVec::new(),
    };

    let signature = key.sign_pkcs1v15_sha256(&info.to_der()?)?;

    let request = CertReq {
        info,
        algorithm: sha256_with_rsa(),
        signature: BitString::from_bytes(&signature)?,
    };
    request
        .to_der()
        .map_err(|e| KeyCertError::Encoding(e.to_string()))
}
