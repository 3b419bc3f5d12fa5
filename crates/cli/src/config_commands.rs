use std::{io::Write, path::Path};

use {
    anyhow::Context,
    mcp_sqlite_config::{DatabaseConfig, load_database_config_with},
    mcp_sqlite_vault::{KeyResolver, ResolveKey, is_encrypted},
    secrecy::ExposeSecret,
};

/// Load `path` and report whether the passphrase could be materialized.
/// The passphrase itself is never printed.
pub fn check(path: &Path) -> anyhow::Result<()> {
    check_with(
        path,
        &KeyResolver::from_environment(),
        &mut std::io::stdout().lock(),
    )
}

fn check_with<R: ResolveKey + ?Sized>(
    path: &Path,
    resolver: &R,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let config = load_database_config_with(path, resolver)
        .with_context(|| format!("config check failed for {}", path.display()))?;
    report(path, &config, out)
}

fn report(path: &Path, config: &DatabaseConfig, out: &mut impl Write) -> anyhow::Result<()> {
    // A decrypted value that still looks encrypted means it was encrypted twice.
    if is_encrypted(config.passphrase().expose_secret()) {
        eprintln!("warning: the decrypted passphrase is itself tagged as encrypted");
    }

    writeln!(out, "Config OK: {}", path.display())?;
    writeln!(out, "  database:       {}", config.database_path().display())?;
    writeln!(out, "  cipher profile: {}", config.cipher_profile())?;
    Ok(())
}
