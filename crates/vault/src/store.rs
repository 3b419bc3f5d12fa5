//! OS secure key stores.
//!
//! The resolver only needs "is it there" and "load the key". Storing is used
//! by the provisioning CLI.

use zeroize::Zeroizing;

use crate::error::VaultError;

/// Keyring service name the encryption key is filed under.
pub const KEY_STORE_SERVICE: &str = "mcp-sqlite";

/// Keyring account (entry) name of the encryption key.
pub const KEY_STORE_ACCOUNT: &str = "encryption-key";

/// A platform secret store holding the Base64-encoded encryption key.
pub trait SecureKeyStore: Send + Sync {
    /// Human-readable backend name, for messages.
    fn name(&self) -> &'static str;

    /// Whether the backend exists on this platform. Cheap, never fails.
    fn is_available(&self) -> bool;

    /// Whether a stored key survives a reboot.
    fn is_persistent(&self) -> bool {
        true
    }

    /// Load the Base64 key. `Ok(None)` when no key has been stored.
    fn load_key(&self) -> Result<Option<Zeroizing<String>>, VaultError>;

    /// Save the Base64 key, replacing any existing one.
    fn store_key(&self, key_b64: &str) -> Result<(), VaultError>;
}

/// Store for platforms (and builds) without a secure key store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopKeyStore;

impl SecureKeyStore for NoopKeyStore {
    fn name(&self) -> &'static str {
        "secure key store"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn is_persistent(&self) -> bool {
        false
    }

    fn load_key(&self) -> Result<Option<Zeroizing<String>>, VaultError> {
        Ok(None)
    }

    fn store_key(&self, _key_b64: &str) -> Result<(), VaultError> {
        Err(VaultError::KeyStore(
            "no secure key store is available in this build".to_string(),
        ))
    }
}

/// OS keychain / credential manager via the `keyring` crate.
#[cfg(feature = "keyring")]
#[derive(Debug, Clone)]
pub struct KeyringKeyStore {
    service: String,
    account: String,
}

#[cfg(feature = "keyring")]
impl KeyringKeyStore {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, VaultError> {
        keyring::Entry::new(&self.service, &self.account)
            .map_err(|e| VaultError::KeyStore(e.to_string()))
    }
}

#[cfg(feature = "keyring")]
impl Default for KeyringKeyStore {
    fn default() -> Self {
        Self::new(KEY_STORE_SERVICE, KEY_STORE_ACCOUNT)
    }
}

#[cfg(feature = "keyring")]
impl SecureKeyStore for KeyringKeyStore {
    fn name(&self) -> &'static str {
        "OS keychain"
    }

    fn is_available(&self) -> bool {
        cfg!(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "windows",
            target_os = "linux",
            target_os = "freebsd",
        ))
    }

    fn is_persistent(&self) -> bool {
        use keyring::credential::CredentialPersistence;

        !matches!(
            keyring::default::default_credential_builder().persistence(),
            CredentialPersistence::EntryOnly
                | CredentialPersistence::ProcessOnly
                | CredentialPersistence::UntilReboot
        )
    }

    fn load_key(&self) -> Result<Option<Zeroizing<String>>, VaultError> {
        match self.entry()?.get_password() {
            Ok(key) => Ok(Some(Zeroizing::new(key))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(VaultError::KeyStore(e.to_string())),
        }
    }

    fn store_key(&self, key_b64: &str) -> Result<(), VaultError> {
        self.entry()?
            .set_password(key_b64)
            .map_err(|e| VaultError::KeyStore(e.to_string()))
    }
}

/// The platform's secure key store.
#[cfg(feature = "keyring")]
pub fn default_key_store() -> Box<dyn SecureKeyStore> {
    Box::new(KeyringKeyStore::default())
}

/// Without the `keyring` feature there is no secure store.
#[cfg(not(feature = "keyring"))]
pub fn default_key_store() -> Box<dyn SecureKeyStore> {
    Box::new(NoopKeyStore)
}
