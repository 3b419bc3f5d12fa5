mod config_commands;
mod key_commands;

use {
    clap::{Parser, Subcommand},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "mcp-sqlite-keys",
    about = "Provision the encryption key for database passphrases"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Verbose diagnostics, including where the encryption key was found.
    /// Overrides `RUST_LOG` and `--log-level`.
    #[arg(long, global = true, env = "MCP_SQLITE_DEBUG", default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a fresh random key, Base64-encoded.
    GenerateKey,
    /// Save a key in the OS secure key store.
    StoreKey {
        /// Base64-encoded 256-bit key.
        #[arg(required_unless_present = "generate")]
        key: Option<String>,
        /// Generate a new key instead of taking one.
        #[arg(long, conflicts_with = "key")]
        generate: bool,
    },
    /// Encrypt a passphrase for use in a config file.
    Encrypt {
        /// Passphrase to encrypt. Read from stdin when omitted.
        passphrase: Option<String>,
    },
    /// Load a config file and verify its passphrase can be decrypted.
    Check {
        /// Path to a `.toml`, `.yaml` or `.json` config file.
        config: std::path::PathBuf,
    },
}

/// `--debug` beats `RUST_LOG`, which beats `--log-level`.
fn filter_directives(debug: bool, log_level: &str, rust_log: Option<String>) -> String {
    if debug {
        return "debug".to_string();
    }
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| log_level.to_string())
}

fn init_telemetry(cli: &Cli) {
    let directives = filter_directives(
        cli.debug,
        &cli.log_level,
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Diagnostics go to stderr so stdout stays clean for keys and ciphertext.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    match cli.command {
        Commands::GenerateKey => key_commands::generate_key(),
        Commands::StoreKey { key, generate } => key_commands::store_key(key, generate),
        Commands::Encrypt { passphrase } => key_commands::encrypt(passphrase),
        Commands::Check { config } => config_commands::check(&config),
    }
}
