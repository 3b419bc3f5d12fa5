//! Turns the configured passphrase field into a usable plaintext passphrase.

use {
    mcp_sqlite_vault::{ResolveKey, VaultError, decrypt_passphrase, is_encrypted},
    secrecy::{ExposeSecret, Secret},
    tracing::debug,
};

use crate::error::{ConfigError, Result};

/// Decrypt `raw` if it carries the `encrypted:` tag, otherwise return it as is.
///
/// The resolver is only consulted for encrypted values.
pub fn decrypt_passphrase_if_needed<R>(raw: &str, resolver: &R) -> Result<Secret<String>>
where
    R: ResolveKey + ?Sized,
{
    if !is_encrypted(raw) {
        return Ok(Secret::new(raw.to_owned()));
    }

    debug!("passphrase is encrypted, resolving key");

    let key = resolver.resolve_key().map_err(|e| match e {
        VaultError::KeyNotFound(_) => ConfigError::EncryptionKeyMissing { source: e },
        other => ConfigError::decryption_failed(other),
    })?;

    let plaintext = decrypt_passphrase(raw, &key).map_err(ConfigError::decryption_failed)?;
    if plaintext.expose_secret().is_empty() {
        return Err(ConfigError::PassphraseDecryptionFailed {
            message: "decrypted passphrase is empty".to_string(),
            source: None,
        });
    }

    Ok(plaintext)
}

/// [`decrypt_passphrase_if_needed`] over an optional field. `None` stays `None`.
pub fn materialize_passphrase<R>(raw: Option<&str>, resolver: &R) -> Result<Option<Secret<String>>>
where
    R: ResolveKey + ?Sized,
{
    raw.map(|value| decrypt_passphrase_if_needed(value, resolver))
        .transpose()
}
