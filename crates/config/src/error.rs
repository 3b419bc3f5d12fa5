use std::path::PathBuf;

use mcp_sqlite_vault::{ENCRYPTION_KEY_ENV, KEYS_COMMAND, VaultError};

/// Errors raised while building a [`DatabaseConfig`](crate::DatabaseConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The passphrase is encrypted but no key source produced a key.
    #[error(
        "encrypted passphrase detected, but no encryption key is available. Set {env} \
         (export {env}=\"$({cmd} generate-key)\") or store a key with `{cmd} store-key <key>`",
        env = ENCRYPTION_KEY_ENV,
        cmd = KEYS_COMMAND
    )]
    EncryptionKeyMissing {
        #[source]
        source: VaultError,
    },

    /// Anything else that went wrong on the decryption path.
    #[error("error decrypting passphrase: {message}")]
    PassphraseDecryptionFailed {
        message: String,
        #[source]
        source: Option<VaultError>,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config format: .{0}")]
    UnsupportedFormat(String),
}

impl ConfigError {
    pub(crate) fn decryption_failed(source: VaultError) -> Self {
        Self::PassphraseDecryptionFailed {
            message: source.to_string(),
            source: Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
