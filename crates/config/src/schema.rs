//! Database configuration types.

use std::path::{Path, PathBuf};

use {
    mcp_sqlite_vault::{KeyResolver, ResolveKey},
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

use crate::{error::Result, passphrase::decrypt_passphrase_if_needed};

/// Named cipher settings for the database engine. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CipherProfile(String);

impl CipherProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CipherProfile {
    fn default() -> Self {
        Self::new("sqlcipher4")
    }
}

impl std::fmt::Display for CipherProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Database settings with a plaintext passphrase.
///
/// Decryption happens only in the `with_decrypted_passphrase*` constructors,
/// so a built value never holds an `encrypted:` passphrase that came from
/// config.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    database_path: PathBuf,
    passphrase: Secret<String>,
    cipher_profile: CipherProfile,
}

impl DatabaseConfig {
    /// Build from an already-plaintext passphrase.
    pub fn new(
        database_path: impl Into<PathBuf>,
        passphrase: Secret<String>,
        cipher_profile: CipherProfile,
    ) -> Self {
        Self {
            database_path: database_path.into(),
            passphrase,
            cipher_profile,
        }
    }

    /// Build from a passphrase that may be encrypted, resolving the key from
    /// the OS secure store or `MCP_SQLITE_ENCRYPTION_KEY`.
    pub fn with_decrypted_passphrase(
        database_path: impl Into<PathBuf>,
        passphrase: &str,
        cipher_profile: CipherProfile,
    ) -> Result<Self> {
        Self::with_decrypted_passphrase_using(
            database_path,
            passphrase,
            cipher_profile,
            &KeyResolver::from_environment(),
        )
    }

    /// Like [`with_decrypted_passphrase`](Self::with_decrypted_passphrase)
    /// with a caller-supplied key resolver.
    pub fn with_decrypted_passphrase_using<R>(
        database_path: impl Into<PathBuf>,
        passphrase: &str,
        cipher_profile: CipherProfile,
        resolver: &R,
    ) -> Result<Self>
    where
        R: ResolveKey + ?Sized,
    {
        let passphrase = decrypt_passphrase_if_needed(passphrase, resolver)?;
        Ok(Self::new(database_path, passphrase, cipher_profile))
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn passphrase(&self) -> &Secret<String> {
        &self.passphrase
    }

    pub fn cipher_profile(&self) -> &CipherProfile {
        &self.cipher_profile
    }
}

/// Root of a config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
}

/// `[database]` table as written on disk; the passphrase may be encrypted.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    pub path: PathBuf,
    pub passphrase: Secret<String>,
    #[serde(default)]
    pub cipher_profile: CipherProfile,
}

impl DatabaseSection {
    pub fn into_config<R>(self, resolver: &R) -> Result<DatabaseConfig>
    where
        R: ResolveKey + ?Sized,
    {
        DatabaseConfig::with_decrypted_passphrase_using(
            self.path,
            self.passphrase.expose_secret(),
            self.cipher_profile,
            resolver,
        )
    }
}
