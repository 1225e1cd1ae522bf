use const_oid::db::rfc5912::RSA_ENCRYPTION;
use pkcs8::pkcs5::{self, pbes2};
use pkcs8::{EncryptedPrivateKeyInfo, LineEnding, PrivateKeyInfo};
use rand_core::{OsRng, RngCore};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey, pkcs1v15, pss};
use sha2::{Digest, Sha256};
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use zeroize::Zeroizing;

use crate::config::PUBLIC_EXPONENT;
use crate::error::{KeyCertError, Result};
use crate::pem_utils;
use crate::unlock::DecodeFailure;

const ENCRYPTED_PKCS8_LABEL: &str = "ENCRYPTED PRIVATE KEY";
const PKCS8_LABEL: &str = "PRIVATE KEY";
const PKCS1_LABEL: &str = "RSA PRIVATE KEY";

/// An RSA private key owned by a key pair.
///
/// The secret parts are zeroized when the key is dropped.
pub struct PrivateKey {
    inner: Box<RsaPrivateKey>,
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

impl From<RsaPrivateKey> for PrivateKey {
    fn from(key: RsaPrivateKey) -> Self {
        Self {
            inner: Box::new(key),
        }
    }
}

impl PrivateKey {
    /// Generate an RSA key with the specified number of bits and exponent 65537.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = OsRng;
        let exponent = BigUint::from(PUBLIC_EXPONENT);
        let private = RsaPrivateKey::new_with_exp(&mut rng, bits, &exponent)?;
        Ok(private.into())
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.inner.n().bits()
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.inner.to_public_key()
    }

    /// DER-encoded SubjectPublicKeyInfo of the public half.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        Ok(self.public_key().to_public_key_der()?.as_bytes().to_vec())
    }

    pub fn as_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        Ok(SubjectPublicKeyInfoOwned::from_key(self.public_key())?)
    }

    /// Imports an unencrypted PKCS#8 `PrivateKeyInfo`. Only RSA keys are accepted.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let info = PrivateKeyInfo::try_from(der)?;
        Self::from_private_key_info(info)
    }

    fn from_private_key_info(info: PrivateKeyInfo<'_>) -> Result<Self> {
        if info.algorithm.oid != RSA_ENCRYPTION {
            return Err(KeyCertError::Parse(format!(
                "Unsupported private key algorithm {}",
                info.algorithm.oid
            )));
        }
        Ok(RsaPrivateKey::try_from(info)?.into())
    }

    /// Decodes a PEM private key, decrypting it with `password` when it is encrypted.
    ///
    /// Accepts `ENCRYPTED PRIVATE KEY`, `PRIVATE KEY` and `RSA PRIVATE KEY`.
    /// A missing or wrong password is reported as [`DecodeFailure::PasswordRejected`];
    /// everything else that goes wrong is [`DecodeFailure::Malformed`].
    pub fn from_pem(
        pem_bytes: &[u8],
        password: Option<&str>,
    ) -> std::result::Result<Self, DecodeFailure> {
        let pem = pem_utils::parse(pem_bytes)?;
        match pem.tag() {
            ENCRYPTED_PKCS8_LABEL => {
                let encrypted = EncryptedPrivateKeyInfo::try_from(pem.contents())
                    .map_err(KeyCertError::from)?;
                let Some(password) = password else {
                    return Err(DecodeFailure::PasswordRejected(
                        "key is encrypted and no password was given".to_string(),
                    ));
                };
                // A CBC padding mismatch surfaces as EncryptFailed, not DecryptFailed.
                let decrypted = match encrypted.decrypt(password) {
                    Ok(document) => document,
                    Err(pkcs8::Error::EncryptedPrivateKey(
                        err @ (pkcs5::Error::DecryptFailed | pkcs5::Error::EncryptFailed),
                    )) => {
                        return Err(DecodeFailure::PasswordRejected(format!(
                            "could not decrypt private key: {err}"
                        )));
                    }
                    Err(err) => return Err(KeyCertError::from(err).into()),
                };
                // CBC padding occasionally survives a wrong password.
                let info = PrivateKeyInfo::try_from(decrypted.as_bytes()).map_err(|_| {
                    DecodeFailure::PasswordRejected(
                        "decrypted private key is not valid PKCS#8".to_string(),
                    )
                })?;
                Ok(Self::from_private_key_info(info)?)
            }
            PKCS8_LABEL => Ok(Self::from_pkcs8_der(pem.contents())?),
            PKCS1_LABEL => {
                if pem.headers().get("Proc-Type").is_some() {
                    return Err(KeyCertError::Parse(
                        "legacy encrypted PKCS#1 PEM is not supported".to_string(),
                    )
                    .into());
                }
                let private =
                    RsaPrivateKey::from_pkcs1_der(pem.contents()).map_err(KeyCertError::from)?;
                Ok(Self::from(private))
            }
            other => Err(KeyCertError::Parse(format!("Unexpected PEM label '{other}'")).into()),
        }
    }

    /// Serializes the key as an `ENCRYPTED PRIVATE KEY` PEM document.
    ///
    /// PBES2 with PBKDF2-HMAC-SHA256 and AES-256-CBC; salt and IV are fresh for every call.
    pub fn to_encrypted_pem(&self, password: &str, iterations: u32) -> Result<Zeroizing<String>> {
        let mut salt = [0u8; 16];
        let mut iv = [0u8; 16];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut iv);

        let params = pbes2::Parameters::pbkdf2_sha256_aes256cbc(iterations, &salt, &iv)
            .map_err(|e| KeyCertError::Encoding(e.to_string()))?;

        let plain = self
            .inner
            .to_pkcs8_der()
            .map_err(|e| KeyCertError::Encoding(e.to_string()))?;
        let info = PrivateKeyInfo::try_from(plain.as_bytes())?;
        let encrypted = info
            .encrypt_with_params(params, password)
            .map_err(|e| KeyCertError::Encoding(e.to_string()))?;

        encrypted
            .to_pem(ENCRYPTED_PKCS8_LABEL, LineEnding::LF)
            .map_err(|e| KeyCertError::Encoding(e.to_string()))
    }

    /// Signs `data` with RSASSA-PSS, SHA-256 and the largest salt the key allows.
    pub fn sign_pss(&self, data: &[u8]) -> Result<Vec<u8>> {
        let salt_len = max_pss_salt_len(&self.public_key());
        let signing_key =
            pss::BlindedSigningKey::<Sha256>::new_with_salt_len((*self.inner).clone(), salt_len);
        let signature = signing_key.try_sign_with_rng(&mut OsRng, data)?;
        Ok(signature.to_vec())
    }

    /// Signs `data` with RSASSA-PKCS1-v1_5 and SHA-256, as used for CSRs and certificates.
    pub fn sign_pkcs1v15_sha256(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signing_key = pkcs1v15::SigningKey::<Sha256>::new((*self.inner).clone());
        let signature = signing_key.try_sign(data)?;
        Ok(signature.to_vec())
    }
}

/// Largest PSS salt for a SHA-256 signature under `public_key`.
///
/// `emLen - hLen - 2`, where `emLen = ceil((modBits - 1) / 8)`; 222 bytes for RSA-2048.
pub fn max_pss_salt_len(public_key: &RsaPublicKey) -> usize {
    let em_len = (public_key.n().bits() - 1).div_ceil(8);
    em_len.saturating_sub(<Sha256 as Digest>::output_size() + 2)
}

/// Verifies a signature produced by [`PrivateKey::sign_pss`].
pub fn verify_pss(public_key: &RsaPublicKey, data: &[u8], signature: &[u8]) -> Result<()> {
    let salt_len = max_pss_salt_len(public_key);
    let verifying_key = pss::VerifyingKey::<Sha256>::new_with_salt_len(public_key.clone(), salt_len);
    let signature = pss::Signature::try_from(signature)?;
    verifying_key.verify(data, &signature)?;
    Ok(())
}

/// Verifies an RSASSA-PKCS1-v1_5 / SHA-256 signature, such as a CSR self-signature.
pub fn verify_pkcs1v15_sha256(
    public_key: &RsaPublicKey,
    data: &[u8],
    signature: &[u8],
) -> Result<()> {
    let verifying_key = pkcs1v15::VerifyingKey::<Sha256>::new(public_key.clone());
    let signature = pkcs1v15::Signature::try_from(signature)?;
    verifying_key.verify(data, &signature)?;
    Ok(())
}
