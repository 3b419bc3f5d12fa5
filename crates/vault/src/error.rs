//! Vault error types.

/// Errors produced by key resolution and passphrase encryption.
///
/// The key-construction failures (`InvalidFormat`, `InvalidLength`, `WeakKey`)
/// are kept apart because each one calls for a different fix: re-encode the
/// key, regenerate it, or pick a better one.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Malformed Base64, or an encrypted payload that cannot be split.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Decoded key is not exactly 32 bytes.
    #[error("key must be exactly {expected} bytes (256 bits) long, but was {actual} bytes")]
    InvalidLength { expected: usize, actual: usize },

    /// Key failed the low-entropy screen.
    #[error("the key is too weak, please use a randomly generated key")]
    WeakKey,

    /// Attempt to encrypt an empty passphrase.
    #[error("passphrase must not be empty")]
    EmptyInput,

    /// GCM tag verification failed (wrong key, corrupted or tampered data).
    #[error("authentication failed: wrong key or tampered ciphertext")]
    AuthenticationFailed,

    /// No key source produced a key. The message carries the remediation steps.
    #[error("{0}")]
    KeyNotFound(String),

    /// The secure key store is present but failed.
    #[error("key store error: {0}")]
    KeyStore(String),

    /// The AEAD primitive refused to encrypt.
    #[error("cipher error: {0}")]
    Cipher(String),
}

impl From<base64::DecodeError> for VaultError {
    fn from(err: base64::DecodeError) -> Self {
        Self::InvalidFormat(format!("invalid Base64: {err}"))
    }
}
