use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{self, EnvFilter};

use agw_sdk::session::{self, SessionConfig};
use agw_sdk::types::{Address, Bytes};
use agw_sdk::Config;

#[derive(Parser)]
#[command(name = "agw")]
#[command(about = "Abstract Global Wallet session and chain tooling", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// ABI-encode a session configuration
    EncodeSession {
        /// Path to a session configuration in JSON
        file: PathBuf,
    },

    /// Compute the keccak256 session hash
    SessionHash {
        /// Path to a session configuration in JSON
        file: PathBuf,
    },

    /// Compute the usage period ids for a transaction
    PeriodIds {
        /// Path to a session configuration in JSON
        file: PathBuf,

        /// Transaction target
        #[arg(long)]
        target: Address,

        /// Function selector, omitted for plain transfers
        #[arg(long)]
        selector: Option<Bytes>,

        /// Unix timestamp, defaults to now
        #[arg(long)]
        timestamp: Option<u64>,
    },

    /// List configured chains
    Chains {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::EncodeSession { file } => {
            let config = load_session(&file)?;
            let encoded = session::encode_session(&config)?;
            println!("{:x}", encoded);
        }

        Commands::SessionHash { file } => {
            let config = load_session(&file)?;
            let hash = session::get_session_hash(&config)?;
            println!("{:#x}", hash);
        }

        Commands::PeriodIds {
            file,
            target,
            selector,
            timestamp,
        } => {
            let config = load_session(&file)?;
            let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp().max(0) as u64);
            let ids = session::period_ids_for_transaction(
                &config,
                target,
                selector.as_ref().map(|s| s.as_slice()),
                timestamp,
            )?;
            let rendered: Vec<String> = ids.iter().map(u64::to_string).collect();
            println!("[{}]", rendered.join(", "));
        }

        Commands::Chains { config } => {
            let config = match config {
                Some(path) => Config::from_file(&path)?,
                None => Config::default(),
            };
            for chain in config.chain_registry().chains() {
                println!("{} ({})", chain.name, chain.chain_id);
                println!("  eoa validator:         {:x}", chain.eoa_validator);
                println!("  session key validator: {:x}", chain.session_key_validator);
                println!("  account factory:       {:x}", chain.account_factory);
                println!("  contract deployer:     {:x}", chain.contract_deployer);
                println!("  gas per pubdata:       {}", chain.default_gas_per_pubdata);
            }
        }
    }

    Ok(())
}

fn load_session(path: &Path) -> Result<SessionConfig> {
    info!("Loading session configuration from {:?}", path);
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: SessionConfig = serde_json::from_str(&content)
        .context("Failed to parse session configuration")?;
    debug!(
        call_policies = config.call_policies.len(),
        transfer_policies = config.transfer_policies.len(),
        "Parsed session configuration"
    );
    Ok(config)
}
