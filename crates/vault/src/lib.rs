//! Encryption of the database passphrase with AES-256-GCM.
//!
//! The key is resolved per operation from an ordered list of [`KeySource`]s
//! (OS secure store, then `MCP_SQLITE_ENCRYPTION_KEY`), screened for weak
//! values, and used to seal the passphrase as `encrypted:<base64>`.
//! Trait-based [`Cipher`] design allows swapping the encryption backend.

pub mod aes256gcm;
pub mod codec;
pub mod error;
pub mod key;
pub mod resolver;
pub mod source;
pub mod store;
pub mod traits;

#[cfg(feature = "keyring")]
pub use store::KeyringKeyStore;
pub use {
    aes256gcm::Aes256GcmCipher,
    codec::{
        ENCRYPTED_PREFIX, PassphraseCodec, decrypt_passphrase, encrypt_passphrase, is_encrypted,
        strip_prefix,
    },
    error::VaultError,
    key::{KEY_LEN, SymmetricKey, is_weak_key},
    resolver::KeyResolver,
    source::{ENCRYPTION_KEY_ENV, EnvKeySource, KEYS_COMMAND, KeySource, KeySourceKind, StoreKeySource},
    store::{NoopKeyStore, SecureKeyStore, default_key_store},
    traits::{Cipher, ResolveKey},
};
