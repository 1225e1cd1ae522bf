//! # keycert - An RSA Key and Certificate Pair
//!
//! keycert wraps an RSA private key together with the X.509 certificate issued for it.
//! A pair can be generated fresh, loaded from a PKCS#12 container or from a PEM key and
//! PEM certificate, used to build a certificate signing request or to sign data, and
//! exported again as PEM with the key re-encrypted under a newly generated password.
//!
//! ## Supported Formats
//!
//! - **PKCS#12**: `.p12` / `.pfx` containers holding a key and its certificate chain
//! - **PEM keys**: `ENCRYPTED PRIVATE KEY`, `PRIVATE KEY` (PKCS#8) and `RSA PRIVATE KEY` (PKCS#1)
//! - **PEM certificates** on input, **PEM** for both key and certificate on output
//!
//! ## Password Handling
//!
//! Encrypted key material is opened through an [`unlock::Unlocker`]. It first tries the
//! password it was given (or none), then keeps asking its [`password::PasswordSource`]
//! until the material opens. Malformed files fail immediately instead of prompting.
//! What happens along the way is reported to a [`observer::LoadObserver`];
//! [`observer::TracingObserver`] turns the reports into `tracing` events.
//!
//! ## Quick Start
//!
//! ### Requesting a Certificate
//!
//! ```rust,no_run
//! use keycert::pair::KeyCertPair;
//!
//! # fn main() -> Result<(), keycert::error::KeyCertError> {
//! let mut pair = KeyCertPair::generate()?;
//!
//! // Send the request to a CA; the subject is always CN=anonymous.
//! let csr_der = pair.create_csr()?;
//! # let issued_der: Vec<u8> = csr_der;
//!
//! // Attach what the CA sends back and store everything.
//! pair.set_certificate_from_der(&issued_der)?;
//! let password = pair.save_as_pem_files("client.key", "client.crt")?;
//! println!("key password: {}", password.as_str());
//! # Ok(())
//! # }
//! ```
//!
//! ### Loading and Signing
//!
//! ```rust,no_run
//! use keycert::pair::KeyCertPair;
//! use keycert::unlock::Unlocker;
//!
//! # fn main() -> Result<(), keycert::error::KeyCertError> {
//! let mut unlocker = Unlocker::interactive();
//! let pair = KeyCertPair::from_pem_files("client.key", "client.crt", &mut unlocker)?;
//!
//! let signature = pair.sign(b"payload")?;
//! pair.verify(b"payload", &signature)?;
//! println!("signed as {}", pair.certificate_common_name()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use keycert::{error::KeyCertError, pair::KeyCertPair};
//! use keycert::password::ScriptedPasswords;
//! use keycert::observer::TracingObserver;
//! use keycert::unlock::Unlocker;
//!
//! let mut unlocker = Unlocker::new(ScriptedPasswords::default(), TracingObserver);
//! match KeyCertPair::from_pkcs12("does-not-exist.p12", &mut unlocker) {
//!     Ok(_) => println!("loaded"),
//!     Err(KeyCertError::Configuration { path }) => println!("missing {}", path.display()),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`pair`]: The key and certificate pair
//! - [`key`]: RSA key generation, decoding, signing and encrypted export
//! - [`cert`]: Certificate encoding, decoding and subject inspection
//! - [`csr`]: Certificate signing requests
//! - [`issuer`]: Self-signed certificates
//! - [`unlock`]: The password retry protocol
//! - [`password`]: Password sources and export password generation
//! - [`observer`]: Load events
//! - [`config`]: Algorithm and export policy
//! - [`error`]: Error types

pub mod cert;
pub mod config;
pub mod csr;
pub mod error;
pub mod issuer;
pub mod key;
pub mod observer;
pub mod pair;
pub mod password;
pub mod pkcs12;
pub mod unlock;

mod pem_utils;

pub use pair::KeyCertPair;
