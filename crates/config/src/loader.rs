use std::path::Path;

use {
    mcp_sqlite_vault::{KeyResolver, ResolveKey},
    tracing::debug,
};

use crate::{
    error::{ConfigError, Result},
    schema::{ConfigFile, DatabaseConfig},
};

/// Load a database config file, decrypting the passphrase with the default
/// key resolver.
///
/// The format follows the extension: `.toml`, `.yaml`/`.yml` or `.json`.
pub fn load_database_config(path: &Path) -> Result<DatabaseConfig> {
    load_database_config_with(path, &KeyResolver::from_environment())
}

/// Load a database config file with a caller-supplied key resolver.
pub fn load_database_config_with<R>(path: &Path, resolver: &R) -> Result<DatabaseConfig>
where
    R: ResolveKey + ?Sized,
{
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = parse_config(&raw, path)?;
    debug!(
        path = %path.display(),
        database = %file.database.path.display(),
        cipher_profile = %file.database.cipher_profile,
        "loaded database config"
    );
    file.database.into_config(resolver)
}

fn parse_config(raw: &str, path: &Path) -> Result<ConfigFile> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    let parse_err = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "json" => serde_json::from_str(raw).map_err(|e| parse_err(e.to_string())),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        mcp_sqlite_vault::{SymmetricKey, VaultError, encrypt_passphrase},
        secrecy::ExposeSecret,
        std::io::Write,
    };

    fn key() -> SymmetricKey {
        let bytes: Vec<u8> = (0..32u8).map(|i| i.wrapping_mul(15).wrapping_add(4)).collect();
        SymmetricKey::from_bytes(&bytes).unwrap()
    }

    fn resolver() -> impl Fn() -> std::result::Result<SymmetricKey, VaultError> {
        || Ok(key())
    }

    fn write_config(name: &str, body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_toml_with_encrypted_passphrase() {
        let encrypted = encrypt_passphrase("from-toml", &key()).unwrap();
        let (_dir, path) = write_config(
            "db.toml",
            &format!(
                "[database]\npath = \"data/app.db\"\npassphrase = \"{encrypted}\"\ncipher_profile = \"sqlcipher3\"\n"
            ),
        );

        let cfg = load_database_config_with(&path, &resolver()).unwrap();
        assert_eq!(cfg.passphrase().expose_secret(), "from-toml");
        assert_eq!(cfg.database_path(), Path::new("data/app.db"));
        assert_eq!(cfg.cipher_profile().as_str(), "sqlcipher3");
    }

    #[test]
    fn loads_yaml_with_plain_passphrase() {
        let (_dir, path) = write_config(
            "db.yaml",
            "database:\n  path: app.db\n  passphrase: plain-yaml\n",
        );

        let cfg = load_database_config_with(&path, &resolver()).unwrap();
        assert_eq!(cfg.passphrase().expose_secret(), "plain-yaml");
        assert_eq!(cfg.cipher_profile().as_str(), "sqlcipher4");
    }

    #[test]
    fn loads_json() {
        let encrypted = encrypt_passphrase("from-json", &key()).unwrap();
        let (_dir, path) = write_config(
            "db.json",
            &format!(r#"{{"database": {{"path": "app.db", "passphrase": "{encrypted}"}}}}"#),
        );

        let cfg = load_database_config_with(&path, &resolver()).unwrap();
        assert_eq!(cfg.passphrase().expose_secret(), "from-json");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let (_dir, path) = write_config("db.ini", "[database]\n");
        let err = load_database_config_with(&path, &resolver()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "ini"));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let (_dir, path) = write_config("db.toml", "[database]\npath = \n");
        let err = load_database_config_with(&path, &resolver()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            load_database_config_with(&dir.path().join("absent.toml"), &resolver()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
