//! Key sources consulted by the [`KeyResolver`](crate::resolver::KeyResolver).
//!
//! Each source hands back a Base64 candidate; key construction and validation
//! happen in the resolver so every source gets the same checks.

use zeroize::Zeroizing;

use crate::{error::VaultError, store::SecureKeyStore};

/// Environment variable holding the Base64-encoded encryption key.
pub const ENCRYPTION_KEY_ENV: &str = "MCP_SQLITE_ENCRYPTION_KEY";

/// Name of the provisioning binary referenced in remediation messages.
pub const KEYS_COMMAND: &str = "mcp-sqlite-keys";

/// Where a key came from. Diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySourceKind {
    SecureStore,
    Environment,
    DevelopmentFallback,
}

impl std::fmt::Display for KeySourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::SecureStore => "secure key store",
            Self::Environment => "environment variable",
            Self::DevelopmentFallback => "development fallback",
        })
    }
}

/// A provider of Base64 key candidates.
pub trait KeySource: Send + Sync {
    fn kind(&self) -> KeySourceKind;

    /// Fetch a candidate. `Ok(None)` means this source has nothing to offer;
    /// errors are reported by the resolver and treated the same way.
    fn try_load(&self) -> Result<Option<Zeroizing<String>>, VaultError>;

    /// One line telling the operator how to provision this source.
    fn remediation(&self) -> String;
}

/// Reads the key from a [`SecureKeyStore`], skipping it when unavailable.
pub struct StoreKeySource {
    store: Box<dyn SecureKeyStore>,
}

impl StoreKeySource {
    pub fn new(store: Box<dyn SecureKeyStore>) -> Self {
        Self { store }
    }
}

impl KeySource for StoreKeySource {
    fn kind(&self) -> KeySourceKind {
        KeySourceKind::SecureStore
    }

    fn try_load(&self) -> Result<Option<Zeroizing<String>>, VaultError> {
        if !self.store.is_available() {
            return Ok(None);
        }
        self.store.load_key()
    }

    fn remediation(&self) -> String {
        format!(
            "store a key in the {}: {KEYS_COMMAND} store-key <key>",
            self.store.name()
        )
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads the key from an environment variable.
pub struct EnvKeySource {
    var: String,
    lookup: EnvLookup,
}

impl EnvKeySource {
    /// Read `var` from the process environment.
    pub fn new(var: impl Into<String>) -> Self {
        Self::with_lookup(var, |name| std::env::var(name).ok())
    }

    /// Read `var` through a custom lookup function instead of the process
    /// environment.
    pub fn with_lookup(
        var: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            var: var.into(),
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvKeySource {
    fn default() -> Self {
        Self::new(ENCRYPTION_KEY_ENV)
    }
}

impl KeySource for EnvKeySource {
    fn kind(&self) -> KeySourceKind {
        KeySourceKind::Environment
    }

    fn try_load(&self) -> Result<Option<Zeroizing<String>>, VaultError> {
        Ok((self.lookup)(&self.var).map(Zeroizing::new))
    }

    fn remediation(&self) -> String {
        format!(
            "set the environment variable: export {}=\"$({KEYS_COMMAND} generate-key)\"",
            self.var
        )
    }
}
