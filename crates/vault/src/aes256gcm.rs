//! AES-256-GCM implementation of the [`Cipher`] trait.

#[allow(deprecated)] // upstream generic-array 0.x deprecation
use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use {rand::RngCore, zeroize::Zeroizing};

use crate::{error::VaultError, key::SymmetricKey, traits::Cipher};

/// GCM nonce size (96 bits).
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag size (128 bits).
pub const TAG_LEN: usize = 16;

/// AES-256 in GCM mode with a 128-bit tag.
///
/// Encrypted blob layout: `[nonce: 12 bytes][ciphertext: N bytes][tag: 16 bytes]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256GcmCipher;

impl Cipher for Aes256GcmCipher {
    #[allow(deprecated)]
    fn encrypt(&self, key: &SymmetricKey, plaintext: &[u8]) -> Result<Vec<u8>, VaultError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

        // rand's thread-local generator is a CSPRNG seeded from the OS.
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| VaultError::Cipher(e.to_string()))?;

        let mut result = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    #[allow(deprecated)]
    fn decrypt(&self, key: &SymmetricKey, blob: &[u8]) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        if blob.len() < NONCE_LEN {
            return Err(VaultError::InvalidFormat(
                "encrypted payload is shorter than the nonce".to_string(),
            ));
        }

        let (nonce_bytes, ct) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

        // A remainder shorter than the tag cannot verify and lands here too.
        cipher
            .decrypt(nonce, ct)
            .map(Zeroizing::new)
            .map_err(|_| VaultError::AuthenticationFailed)
    }
}
