#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;

use keycert::cert::params::{DistinguishedName, Validity};
use keycert::config::KeyCertConfig;
use keycert::observer::{LoadEvent, LoadObserver};
use keycert::pair::KeyCertPair;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::x509::X509;

/// Same policy as the default, with a PBKDF2 work factor small enough for tests.
pub fn fast_config() -> KeyCertConfig {
    KeyCertConfig::builder().pbkdf2_iterations(1_000).build()
}

pub fn generate_with_cert(common_name: &str) -> KeyCertPair {
    let mut pair = KeyCertPair::generate_with(fast_config()).unwrap();
    let cert = pair
        .self_signed_certificate(
            &DistinguishedName::common_name_only(common_name),
            &Validity::for_days(30),
        )
        .unwrap();
    pair.set_certificate(cert);
    pair
}

/// Collects every event it sees.
#[derive(Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<LoadEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<LoadEvent> {
        self.events.borrow().clone()
    }

    pub fn rejections(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, LoadEvent::PasswordRejected { .. }))
            .count()
    }
}

impl LoadObserver for RecordingObserver {
    fn on_event(&self, event: &LoadEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// The pair's private key as an OpenSSL key, by way of an encrypted export.
pub fn openssl_private_key(pair: &KeyCertPair, scratch: &Path) -> PKey<Private> {
    let key_path = scratch.join("export.key");
    let cert_path = scratch.join("export.crt");
    let password = pair.save_as_pem_files(&key_path, &cert_path).unwrap();
    let pem = std::fs::read(&key_path).unwrap();
    PKey::private_key_from_pem_passphrase(&pem, password.as_bytes()).unwrap()
}

/// Writes the pair as a PKCS#12 container protected by `password`.
pub fn write_pkcs12(pair: &KeyCertPair, path: &Path, password: &str) {
    let scratch = tempfile::tempdir().unwrap();
    let pkey = openssl_private_key(pair, scratch.path());
    let cert = X509::from_der(&pair.certificate_der().unwrap()).unwrap();

    let p12 = Pkcs12::builder()
        .name("keycert test")
        .pkey(&pkey)
        .cert(&cert)
        .key_algorithm(Nid::AES_256_CBC)
        .cert_algorithm(Nid::AES_256_CBC)
        .mac_md(MessageDigest::sha256())
        .build2(password)
        .unwrap();
    std::fs::write(path, p12.to_der().unwrap()).unwrap();
}
