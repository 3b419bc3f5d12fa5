//! Tagged, Base64-encoded wire format for encrypted passphrases.
//!
//! `encrypted:` + standard Base64 of `[nonce || ciphertext || tag]`.
//!
//! Format problems found before decryption (bad Base64, payload shorter than
//! the nonce) surface as [`VaultError::InvalidFormat`]; everything that reaches
//! the AEAD and fails is [`VaultError::AuthenticationFailed`], which does not
//! tell a wrong key from tampered data. The passphrase lives in a local config
//! file, so the format/authentication split is not an oracle worth hiding and
//! it gives operators a clearer message.

use {base64::Engine, secrecy::SecretString};

use crate::{aes256gcm::Aes256GcmCipher, error::VaultError, key::SymmetricKey, traits::Cipher};

/// Marks a config value as an encrypted passphrase.
pub const ENCRYPTED_PREFIX: &str = "encrypted:";

/// Whether `value` carries the encrypted-passphrase tag.
pub fn is_encrypted(value: &str) -> bool {
    value.starts_with(ENCRYPTED_PREFIX)
}

/// Remove the tag if present.
pub fn strip_prefix(value: &str) -> &str {
    value.strip_prefix(ENCRYPTED_PREFIX).unwrap_or(value)
}

/// Encrypts and decrypts passphrases in the tagged wire format.
///
/// Generic over [`Cipher`] but defaults to [`Aes256GcmCipher`].
#[derive(Debug, Clone, Default)]
pub struct PassphraseCodec<C: Cipher = Aes256GcmCipher> {
    cipher: C,
}

impl PassphraseCodec<Aes256GcmCipher> {
    pub fn new() -> Self {
        Self::with_cipher(Aes256GcmCipher)
    }
}

impl<C: Cipher> PassphraseCodec<C> {
    pub fn with_cipher(cipher: C) -> Self {
        Self { cipher }
    }

    /// Encrypt a non-empty passphrase into its tagged form.
    pub fn encrypt(&self, plaintext: &str, key: &SymmetricKey) -> Result<String, VaultError> {
        if plaintext.is_empty() {
            return Err(VaultError::EmptyInput);
        }

        let blob = self.cipher.encrypt(key, plaintext.as_bytes())?;

        let mut out = String::with_capacity(ENCRYPTED_PREFIX.len() + blob.len().div_ceil(3) * 4);
        out.push_str(ENCRYPTED_PREFIX);
        base64::engine::general_purpose::STANDARD.encode_string(&blob, &mut out);
        Ok(out)
    }

    /// Decrypt a passphrase. The tag is optional on input.
    pub fn decrypt(&self, encoded: &str, key: &SymmetricKey) -> Result<SecretString, VaultError> {
        let blob = base64::engine::general_purpose::STANDARD.decode(strip_prefix(encoded))?;
        let plaintext = self.cipher.decrypt(key, &blob)?;
        let text = std::str::from_utf8(&plaintext).map_err(|_| {
            VaultError::InvalidFormat("decrypted passphrase is not valid UTF-8".to_string())
        })?;

        Ok(SecretString::new(text.to_owned()))
    }
}

/// Encrypt with the default AES-256-GCM codec.
pub fn encrypt_passphrase(plaintext: &str, key: &SymmetricKey) -> Result<String, VaultError> {
    PassphraseCodec::new().encrypt(plaintext, key)
}

/// Decrypt with the default AES-256-GCM codec.
pub fn decrypt_passphrase(encoded: &str, key: &SymmetricKey) -> Result<SecretString, VaultError> {
    PassphraseCodec::new().decrypt(encoded, key)
}
