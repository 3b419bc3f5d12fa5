//! 256-bit symmetric keys: construction, validation and generation.

use {
    base64::Engine,
    rand::RngCore,
    zeroize::{Zeroize, Zeroizing},
};

use crate::error::VaultError;

/// Key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Seed behind the deprecated development fallback key.
const DEV_FALLBACK_SEED: &[u8] = b"mcp-sqlite-default-key-development-only";

/// Returns `true` if `key` fails the low-entropy screen.
///
/// A key is weak when every byte has the same value, or when any single byte
/// value fills more than 75% of the positions. This catches placeholder and
/// misconfigured keys, it is not a statistical entropy test.
pub fn is_weak_key(key: &[u8; KEY_LEN]) -> bool {
    if key.iter().all(|b| *b == key[0]) {
        return true;
    }

    let mut counts = [0usize; 256];
    for b in key {
        counts[usize::from(*b)] += 1;
    }
    let max = counts.iter().copied().max().unwrap_or(0);

    // 75% of 32 is 24.
    max * 4 > KEY_LEN * 3
}

/// A validated 256-bit key.
///
/// The bytes are wiped when the key is dropped. `Debug` never prints them.
pub struct SymmetricKey {
    bytes: Zeroizing<[u8; KEY_LEN]>,
}

impl SymmetricKey {
    /// Build a key from raw bytes, enforcing length and weakness checks.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        if bytes.len() != KEY_LEN {
            return Err(VaultError::InvalidLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            });
        }

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(bytes);

        if is_weak_key(&key) {
            return Err(VaultError::WeakKey);
        }

        Ok(Self { bytes: key })
    }

    /// Decode a standard (padded) Base64 key.
    pub fn from_base64(encoded: &str) -> Result<Self, VaultError> {
        let decoded = Zeroizing::new(base64::engine::general_purpose::STANDARD.decode(encoded)?);
        Self::from_bytes(&decoded)
    }

    /// Draw a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        loop {
            rand::rng().fill_bytes(bytes.as_mut());
            if !is_weak_key(&bytes) {
                return Self { bytes };
            }
        }
    }

    /// Deterministic key derived from a fixed seed. Development only.
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn development_fallback() -> Result<Self, VaultError> {
        let mut bytes = [0u8; KEY_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = DEV_FALLBACK_SEED[i % DEV_FALLBACK_SEED.len()];
        }
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Base64 encoding of the key, for provisioning.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(base64::engine::general_purpose::STANDARD.encode(&self.bytes[..]))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}
