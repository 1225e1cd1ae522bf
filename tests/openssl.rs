mod util;

use keycert::pair::KeyCertPair;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::PKey;
use openssl::rsa::Padding;
use openssl::sign::{RsaPssSaltlen, Verifier};
use openssl::x509::{X509, X509NameRef, X509Req};

fn common_name(name: &X509NameRef) -> String {
    let bytes = name
        .entries_by_nid(Nid::COMMONNAME)
        .next()
        .unwrap()
        .data()
        .as_slice()
        .to_vec();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_openssl_verifies_csr() {
    let pair = KeyCertPair::generate_with(util::fast_config()).unwrap();
    let csr_der = pair.create_csr().unwrap();

    let req = X509Req::from_der(&csr_der).expect("Failed to parse CSR");
    let req_key = req.public_key().unwrap();

    assert!(req.verify(&req_key).unwrap(), "CSR self-signature is invalid");
    assert_eq!(common_name(req.subject_name()), "anonymous");
    assert_eq!(
        req_key.public_key_to_der().unwrap(),
        pair.public_key_der().unwrap()
    );
}

#[test]
fn test_openssl_verifies_pss_signature() {
    let pair = KeyCertPair::generate_with(util::fast_config()).unwrap();
    let public = PKey::public_key_from_der(&pair.public_key_der().unwrap()).unwrap();

    for data in [&b""[..], &b"arbitrary payload"[..]] {
        let signature = pair.sign(data).unwrap();

        let mut verifier = Verifier::new(MessageDigest::sha256(), &public).unwrap();
        verifier.set_rsa_padding(Padding::PKCS1_PSS).unwrap();
        verifier.set_rsa_mgf1_md(MessageDigest::sha256()).unwrap();
        verifier
            .set_rsa_pss_saltlen(RsaPssSaltlen::MAXIMUM_LENGTH)
            .unwrap();
        verifier.update(data).unwrap();
        assert!(verifier.verify(&signature).unwrap(), "PSS signature rejected");
    }
}

#[test]
fn test_openssl_reads_exported_files() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("client.key");
    let cert_path = dir.path().join("client.crt");
    let pair = util::generate_with_cert("exported.example");

    let password = pair.save_as_pem_files(&key_path, &cert_path).unwrap();

    let key_pem = std::fs::read(&key_path).unwrap();
    assert!(
        PKey::private_key_from_pem_passphrase(&key_pem, b"not the password").is_err(),
        "key decrypted with the wrong password"
    );
    let private = PKey::private_key_from_pem_passphrase(&key_pem, password.as_bytes())
        .expect("Failed to decrypt exported key");
    assert_eq!(private.bits(), 2048);
    assert_eq!(
        private.public_key_to_der().unwrap(),
        pair.public_key_der().unwrap()
    );

    let cert = X509::from_pem(&std::fs::read(&cert_path).unwrap()).expect("Failed to parse PEM");
    assert_eq!(cert.to_der().unwrap(), pair.certificate_der().unwrap());
}

#[test]
fn test_openssl_accepts_self_signed_certificate() {
    let pair = util::generate_with_cert("self.signed");

    let cert = X509::from_der(&pair.certificate_der().unwrap()).unwrap();

    assert_eq!(common_name(cert.subject_name()), "self.signed");
    assert_eq!(common_name(cert.issuer_name()), "self.signed");
    assert_eq!(cert.version(), 2, "X509 version should be 3 (0-based index)");
    let public = cert.public_key().unwrap();
    assert!(cert.verify(&public).unwrap(), "certificate signature is invalid");
    assert_eq!(
        cert.signature_algorithm().object().nid(),
        Nid::SHA256WITHRSAENCRYPTION
    );
}
