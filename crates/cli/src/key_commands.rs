use std::io::{BufRead, IsTerminal, Write};

use {
    anyhow::{Context, bail},
    mcp_sqlite_vault::{
        KeyResolver, ResolveKey, SecureKeyStore, SymmetricKey, default_key_store,
        encrypt_passphrase,
    },
    tracing::info,
    zeroize::Zeroizing,
};

pub fn generate_key() -> anyhow::Result<()> {
    let key = SymmetricKey::generate();
    println!("{}", key.to_base64().as_str());
    Ok(())
}

pub fn store_key(key: Option<String>, generate: bool) -> anyhow::Result<()> {
    let key = Zeroizing::new(key);
    let store = default_key_store();
    store_key_in(store.as_ref(), key.as_deref(), generate)?;
    eprintln!("Key stored in the {}.", store.name());
    if !store.is_persistent() {
        eprintln!(
            "warning: the {} on this system keeps the key only until reboot",
            store.name()
        );
    }
    Ok(())
}

fn store_key_in(
    store: &dyn SecureKeyStore,
    encoded: Option<&str>,
    generate: bool,
) -> anyhow::Result<()> {
    let key = match (encoded, generate) {
        (_, true) => SymmetricKey::generate(),
        (Some(encoded), false) => {
            SymmetricKey::from_base64(encoded).context("refusing to store an invalid key")?
        },
        (None, false) => bail!("a key or --generate is required"),
    };

    if !store.is_available() {
        bail!(
            "the {} is not available on this platform; set the environment variable instead",
            store.name()
        );
    }
    store
        .store_key(&key.to_base64())
        .with_context(|| format!("failed to write to the {}", store.name()))?;
    info!(store = store.name(), "encryption key stored");
    Ok(())
}

pub fn encrypt(passphrase: Option<String>) -> anyhow::Result<()> {
    let passphrase = Zeroizing::new(match passphrase {
        Some(p) => p,
        None => read_passphrase()?,
    });

    encrypt_with(
        &passphrase,
        &KeyResolver::from_environment(),
        &mut std::io::stdout().lock(),
    )
}

fn encrypt_with<R: ResolveKey + ?Sized>(
    passphrase: &str,
    resolver: &R,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let key = resolver.resolve_key()?;
    let encrypted = encrypt_passphrase(passphrase, &key)?;
    writeln!(out, "{encrypted}")?;
    Ok(())
}

fn read_passphrase() -> anyhow::Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Passphrase: ");
    }
    let mut line = Zeroizing::new(String::new());
    stdin
        .lock()
        .read_line(&mut line)
        .context("failed to read passphrase from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        mcp_sqlite_vault::{NoopKeyStore, VaultError, decrypt_passphrase},
        secrecy::ExposeSecret,
        std::sync::Mutex,
    };

    fn key() -> SymmetricKey {
        let bytes: Vec<u8> = (0..32u8).map(|i| i.wrapping_mul(7).wrapping_add(3)).collect();
        SymmetricKey::from_bytes(&bytes).unwrap()
    }

    #[derive(Default)]
    struct MemoryStore {
        saved: Mutex<Option<String>>,
    }

    impl SecureKeyStore for MemoryStore {
        fn name(&self) -> &'static str {
            "memory store"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn load_key(&self) -> Result<Option<Zeroizing<String>>, VaultError> {
            Ok(self.saved.lock().unwrap().clone().map(Zeroizing::new))
        }

        fn store_key(&self, key_b64: &str) -> Result<(), VaultError> {
            *self.saved.lock().unwrap() = Some(key_b64.to_string());
            Ok(())
        }
    }

    #[test]
    fn encrypt_prints_a_decryptable_passphrase() {
        let mut out = Vec::new();
        encrypt_with("s3cr3t-pw", &|| Ok::<_, VaultError>(key()), &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("encrypted:"));
        assert!(!printed.contains("s3cr3t-pw"));

        let decrypted = decrypt_passphrase(printed.trim_end(), &key()).unwrap();
        assert_eq!(decrypted.expose_secret(), "s3cr3t-pw");
    }

    #[test]
    fn encrypt_without_key_fails() {
        let mut out = Vec::new();
        let missing = || Err::<SymmetricKey, _>(VaultError::KeyNotFound("none".into()));
        assert!(encrypt_with("s3cr3t-pw", &missing, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn store_key_saves_a_valid_key() {
        let store = MemoryStore::default();
        let encoded = key().to_base64();
        store_key_in(&store, Some(encoded.as_str()), false).unwrap();
        assert_eq!(store.saved.lock().unwrap().as_deref(), Some(encoded.as_str()));
    }

    #[test]
    fn store_key_generates_when_asked() {
        let store = MemoryStore::default();
        store_key_in(&store, None, true).unwrap();

        let saved = store.saved.lock().unwrap().clone().unwrap();
        assert!(SymmetricKey::from_base64(&saved).is_ok());
    }

    #[test]
    fn store_key_rejects_invalid_key() {
        let store = MemoryStore::default();
        assert!(store_key_in(&store, Some("not a key"), false).is_err());
        assert!(store.saved.lock().unwrap().is_none());
    }

    #[test]
    fn store_key_fails_without_a_store() {
        let err = store_key_in(&NoopKeyStore, None, true).unwrap_err();
        assert!(err.to_string().contains("not available"));
    }
}
