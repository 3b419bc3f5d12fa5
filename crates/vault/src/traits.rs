//! Seams for swappable AEAD backends and key resolvers.

use zeroize::Zeroizing;

use crate::{error::VaultError, key::SymmetricKey};

/// Authenticated encryption over a 256-bit key.
///
/// The blob layout is `[nonce || ciphertext || tag]`. Implementations must
/// draw a fresh nonce from a secure RNG on every `encrypt` call, and report a
/// blob too short to hold the nonce as [`VaultError::InvalidFormat`].
pub trait Cipher: Send + Sync {
    /// Encrypt `plaintext` under `key`.
    fn encrypt(&self, key: &SymmetricKey, plaintext: &[u8]) -> Result<Vec<u8>, VaultError>;

    /// Decrypt a blob previously produced by [`encrypt`](Self::encrypt).
    ///
    /// Any authentication failure is reported as
    /// [`VaultError::AuthenticationFailed`] without saying why.
    fn decrypt(&self, key: &SymmetricKey, blob: &[u8]) -> Result<Zeroizing<Vec<u8>>, VaultError>;
}

/// Something that can produce the passphrase encryption key on demand.
pub trait ResolveKey {
    fn resolve_key(&self) -> Result<SymmetricKey, VaultError>;
}

impl<F> ResolveKey for F
where
    F: Fn() -> Result<SymmetricKey, VaultError>,
{
    fn resolve_key(&self) -> Result<SymmetricKey, VaultError> {
        self()
    }
}
