#![allow(clippy::unwrap_used, clippy::expect_used)]
use {
    base64::{Engine, engine::general_purpose::STANDARD},
    mcp_sqlite_vault::{
        ENCRYPTION_KEY_ENV, EnvKeySource, KeyResolver, NoopKeyStore, ResolveKey, StoreKeySource,
        SymmetricKey, VaultError, decrypt_passphrase, encrypt_passphrase, is_encrypted,
    },
    secrecy::ExposeSecret,
    std::thread,
};

/// Mostly `0x01` with a handful of distinct bytes: 24 repeats, the most the
/// weak-key screen tolerates.
fn provisioned_key_b64() -> String {
    let mut bytes = [0x01u8; 32];
    bytes[31] = 0x02;
    for (i, b) in bytes.iter_mut().take(7).enumerate() {
        *b = 0x10 + i as u8;
    }
    STANDARD.encode(bytes)
}

fn env_resolver(value: Option<String>) -> KeyResolver {
    KeyResolver::new(vec![
        Box::new(StoreKeySource::new(Box::new(NoopKeyStore))),
        Box::new(EnvKeySource::with_lookup(ENCRYPTION_KEY_ENV, move |_| {
            value.clone()
        })),
    ])
}

#[test]
fn encrypt_then_decrypt_with_environment_key() {
    let resolver = env_resolver(Some(provisioned_key_b64()));

    let encrypted = encrypt_passphrase("s3cr3t-pw", &resolver.resolve_key().unwrap()).unwrap();
    assert!(is_encrypted(&encrypted));

    let decrypted = decrypt_passphrase(&encrypted, &resolver.resolve_key().unwrap()).unwrap();
    assert_eq!(decrypted.expose_secret(), "s3cr3t-pw");
}

#[test]
fn thirty_one_identical_bytes_are_rejected_as_weak() {
    let mut bytes = [0x01u8; 32];
    bytes[31] = 0x02;
    let resolver = env_resolver(Some(STANDARD.encode(bytes)));
    assert!(matches!(resolver.resolve_key(), Err(VaultError::WeakKey)));
}

#[test]
fn missing_key_names_the_environment_variable() {
    let err = env_resolver(None).resolve_key().unwrap_err();
    assert!(matches!(err, VaultError::KeyNotFound(_)));
    assert!(err.to_string().contains(ENCRYPTION_KEY_ENV));
}

#[test]
fn concurrent_round_trips() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let key = SymmetricKey::generate();
                let plaintext = format!("passphrase-{i}");
                let encrypted = encrypt_passphrase(&plaintext, &key).unwrap();
                let decrypted = decrypt_passphrase(&encrypted, &key).unwrap();
                assert_eq!(decrypted.expose_secret(), &plaintext);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn ciphertext_from_one_key_fails_under_another() {
    let k1 = SymmetricKey::generate();
    let k2 = SymmetricKey::generate();
    let encrypted = encrypt_passphrase("s3cr3t-pw", &k1).unwrap();
    assert!(matches!(
        decrypt_passphrase(&encrypted, &k2),
        Err(VaultError::AuthenticationFailed)
    ));
}
