use std::path::Path;

use rsa::RsaPublicKey;
use zeroize::Zeroizing;

use crate::cert::Certificate;
use crate::cert::params::{DistinguishedName, Validity};
use crate::config::KeyCertConfig;
use crate::error::{KeyCertError, Result};
use crate::key::{self, PrivateKey};
use crate::observer::LoadObserver;
use crate::password::{PasswordSource, generate_export_password};
use crate::unlock::Unlocker;
use crate::{csr, issuer, pkcs12};

/// An RSA private key and the certificate issued for it, if any.
///
/// The key never leaves the pair except through [`KeyCertPair::save_as_pem_files`],
/// and then only encrypted.
#[derive(Debug)]
pub struct KeyCertPair {
    private_key: PrivateKey,
    certificate: Option<Certificate>,
    config: KeyCertConfig,
}

impl KeyCertPair {
    /// Generates a fresh RSA-2048 key (exponent 65537) with no certificate.
    pub fn generate() -> Result<Self> {
        Self::generate_with(KeyCertConfig::default())
    }

    /// Generates a fresh key of `config.key_bits` bits.
    pub fn generate_with(config: KeyCertConfig) -> Result<Self> {
        let private_key = PrivateKey::generate_rsa(config.key_bits)?;
        tracing::debug!(bits = config.key_bits, "generated RSA key");
        Ok(Self::from_parts(private_key, None, config))
    }

    pub fn from_parts(
        private_key: PrivateKey,
        certificate: Option<Certificate>,
        config: KeyCertConfig,
    ) -> Self {
        Self {
            private_key,
            certificate,
            config,
        }
    }

    /// Loads the private key and leaf certificate from a PKCS#12 container.
    ///
    /// # Errors
    /// * [`KeyCertError::Configuration`] if `path` is not a regular file; no password is asked for.
    /// * [`KeyCertError::Parse`] if the container, key or certificate is malformed.
    pub fn from_pkcs12<P, O>(path: impl AsRef<Path>, unlocker: &mut Unlocker<P, O>) -> Result<Self>
    where
        P: PasswordSource,
        O: LoadObserver,
    {
        let path = path.as_ref();
        unlocker.require_file(path)?;
        let (private_key, certificate) = unlocker.unlock(path, pkcs12::decode)?;
        Ok(Self::from_parts(
            private_key,
            Some(certificate),
            KeyCertConfig::default(),
        ))
    }

    /// Loads a PEM private key and a separate PEM certificate.
    ///
    /// Both paths are checked before anything is read. Only the key goes through
    /// the password protocol; a bad certificate file fails straight away.
    pub fn from_pem_files<P, O>(
        key_path: impl AsRef<Path>,
        cert_path: impl AsRef<Path>,
        unlocker: &mut Unlocker<P, O>,
    ) -> Result<Self>
    where
        P: PasswordSource,
        O: LoadObserver,
    {
        let key_path = key_path.as_ref();
        let cert_path = cert_path.as_ref();
        unlocker.require_file(key_path)?;
        unlocker.require_file(cert_path)?;

        let private_key = unlocker.unlock(key_path, PrivateKey::from_pem)?;
        let certificate = Certificate::from_pem(&std::fs::read(cert_path)?)?;
        Ok(Self::from_parts(
            private_key,
            Some(certificate),
            KeyCertConfig::default(),
        ))
    }

    /// Replaces the policy this pair uses for CSRs and exports.
    pub fn with_config(mut self, config: KeyCertConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &KeyCertConfig {
        &self.config
    }

    /// DER-encoded PKCS#10 request with subject `CN=<csr_common_name>`, signed
    /// with SHA-256 / RSA PKCS#1 v1.5.
    pub fn create_csr(&self) -> Result<Vec<u8>> {
        let subject = DistinguishedName::common_name_only(self.config.csr_common_name.clone());
        csr::build_csr(&self.private_key, &subject)
    }

    /// RSA-PSS signature over `data` (SHA-256, MGF1-SHA-256, maximum salt length).
    ///
    /// Randomized: signing the same data twice gives different signatures.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.private_key.sign_pss(data)
    }

    /// Checks a signature produced by [`KeyCertPair::sign`] against this pair's public key.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        key::verify_pss(&self.public_key(), data, signature)
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.public_key()
    }

    /// DER-encoded SubjectPublicKeyInfo of [`KeyCertPair::public_key`].
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        self.private_key.public_key_der()
    }

    pub fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_ref()
    }

    fn attached_certificate(&self) -> Result<&Certificate> {
        self.certificate
            .as_ref()
            .ok_or(KeyCertError::MissingCertificate)
    }

    pub fn certificate_der(&self) -> Result<Vec<u8>> {
        self.attached_certificate()?.to_der()
    }

    /// Attaches `certificate`, replacing any previous one. The key match is not checked.
    pub fn set_certificate(&mut self, certificate: Certificate) {
        self.certificate = Some(certificate);
    }

    pub fn set_certificate_from_der(&mut self, der: &[u8]) -> Result<()> {
        self.set_certificate(Certificate::from_der(der)?);
        Ok(())
    }

    pub fn certificate_common_name(&self) -> Result<String> {
        self.attached_certificate()?.common_name()
    }

    /// Issues a self-signed certificate for this key. The pair is left unchanged.
    pub fn self_signed_certificate(
        &self,
        subject: &DistinguishedName,
        validity: &Validity,
    ) -> Result<Certificate> {
        issuer::self_signed(&self.private_key, subject, validity)
    }

    /// Writes the key as encrypted PKCS#8 PEM and the certificate as PEM, and
    /// returns the freshly generated password protecting the key.
    ///
    /// Existing files are overwritten. Without a certificate nothing is written.
    pub fn save_as_pem_files(
        &self,
        key_path: impl AsRef<Path>,
        cert_path: impl AsRef<Path>,
    ) -> Result<Zeroizing<String>> {
        let cert_pem = self.attached_certificate()?.to_pem()?;

        let password = generate_export_password(self.config.export_password_length);
        let key_pem = self
            .private_key
            .to_encrypted_pem(&password, self.config.pbkdf2_iterations)?;

        std::fs::write(key_path.as_ref(), key_pem.as_bytes())?;
        std::fs::write(cert_path.as_ref(), cert_pem)?;
        tracing::info!(
            key = %key_path.as_ref().display(),
            cert = %cert_path.as_ref().display(),
            "exported key pair"
        );

        Ok(password)
    }
}
