use bon::Builder;

/// RSA public exponent used for every generated key.
pub const PUBLIC_EXPONENT: u64 = 65537;

/// Modulus size of generated keys, in bits.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Subject common name placed in certificate signing requests.
///
/// Identity is bound out-of-band once the request has been countersigned.
pub const DEFAULT_CSR_COMMON_NAME: &str = "anonymous";

/// Length of the password generated by an export.
pub const DEFAULT_EXPORT_PASSWORD_LENGTH: usize = 20;

/// PBKDF2-HMAC-SHA256 rounds used when encrypting an exported key.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 600_000;

/// Key pair policy.
///
/// # Fields
/// * `key_bits` - Modulus size for generated keys.
/// * `csr_common_name` - Subject common name of generated CSRs.
/// * `export_password_length` - Number of characters in an export password.
/// * `pbkdf2_iterations` - Work factor for the exported key's encryption.
/// * `max_password_attempts` - Optional bound on rejected passwords while unlocking.
///
/// # Example
/// ```
/// use keycert::config::KeyCertConfig;
///
/// let config = KeyCertConfig::builder()
///     .csr_common_name("device-42".to_string())
///     .build();
/// assert_eq!(config.key_bits, 2048);
/// assert_eq!(config.csr_common_name, "device-42");
/// ```
#[derive(Clone, Debug, Builder, PartialEq, Eq)]
pub struct KeyCertConfig {
    #[builder(default = DEFAULT_KEY_BITS)]
    pub key_bits: usize,
    #[builder(default = DEFAULT_CSR_COMMON_NAME.to_string())]
    pub csr_common_name: String,
    #[builder(default = DEFAULT_EXPORT_PASSWORD_LENGTH)]
    pub export_password_length: usize,
    #[builder(default = DEFAULT_PBKDF2_ITERATIONS)]
    pub pbkdf2_iterations: u32,
    pub max_password_attempts: Option<u32>,
}

impl Default for KeyCertConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
