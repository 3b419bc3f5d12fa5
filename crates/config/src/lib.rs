//! Database configuration with transparent passphrase decryption.
//!
//! A passphrase written as `encrypted:<base64>` is decrypted while the
//! [`DatabaseConfig`] is built; plain passphrases pass through untouched.
//! Config files: TOML, YAML or JSON with a `[database]` table.

pub mod error;
pub mod loader;
pub mod passphrase;
pub mod schema;

pub use {
    error::ConfigError,
    loader::{load_database_config, load_database_config_with},
    passphrase::{decrypt_passphrase_if_needed, materialize_passphrase},
    schema::{CipherProfile, ConfigFile, DatabaseConfig, DatabaseSection},
};
