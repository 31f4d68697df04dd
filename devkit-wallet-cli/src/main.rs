//! DevKit Wallet CLI
//!
//! Create or import an HD wallet, manage its accounts, and use the Solana
//! devnet faucet, transfer and token tools from the command line.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devkit_wallet::WalletConfig;

mod commands;

#[derive(Parser)]
#[command(name = "devkit-wallet")]
#[command(about = "HD wallet for Solana and Ethereum developers")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding wallet-storage.json
    #[arg(long, global = true, env = "DEVKIT_WALLET_DIR")]
    data_dir: Option<PathBuf>,

    /// Solana JSON-RPC endpoint
    #[arg(long, global = true, env = "SOLANA_RPC_URL")]
    rpc_url: Option<String>,

    /// Wallet password; prompted for when omitted
    #[arg(long, global = true, env = "DEVKIT_WALLET_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new wallet with a fresh recovery phrase
    Create {
        /// Network to derive accounts for (solana or ethereum)
        #[arg(long, default_value = "solana")]
        network: String,

        /// Number of recovery phrase words (12 or 24)
        #[arg(long, default_value_t = 12)]
        words: usize,

        /// Accept the terms of service
        #[arg(long)]
        accept_terms: bool,

        /// Skip the "phrase saved" confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Restore a wallet from an existing recovery phrase
    Import {
        /// Network to derive accounts for (solana or ethereum)
        #[arg(long, default_value = "solana")]
        network: String,

        /// Recovery phrase; read from stdin when omitted
        #[arg(long)]
        phrase: Option<String>,

        /// Accept the terms of service
        #[arg(long)]
        accept_terms: bool,
    },

    /// Unlock the wallet and list its accounts
    #[command(alias = "unlock")]
    Show {
        /// Also print the recovery phrase and private keys
        #[arg(long)]
        reveal: bool,
    },

    /// Add the next account
    Add,

    /// Remove the account at a display position (0-based)
    Remove { position: usize },

    /// Irreversibly delete the wallet and all accounts
    DeleteAll {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show wallet status without unlocking
    Status,

    /// Show the SOL balance of an address
    Balance { address: String },

    /// Request a devnet airdrop
    Airdrop {
        address: String,

        /// Amount in SOL
        #[arg(long, default_value = "0.1")]
        amount: String,
    },

    /// Send SOL from one of the wallet's accounts
    Send {
        /// Display position of the sending account
        #[arg(long)]
        account: usize,

        /// Recipient address
        #[arg(long)]
        to: String,

        /// Amount in SOL
        #[arg(long)]
        amount: String,
    },

    /// Create an SPL token and mint its initial supply to an account
    MintToken {
        /// Display position of the owning account
        #[arg(long)]
        account: usize,

        #[arg(long)]
        name: String,

        #[arg(long)]
        symbol: String,

        /// Metadata JSON URI
        #[arg(long)]
        uri: String,

        #[arg(long, default_value_t = 6)]
        decimals: u8,

        /// Keep a freeze authority on the mint
        #[arg(long)]
        freeze: bool,

        /// Initial supply in whole tokens
        #[arg(long)]
        supply: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = WalletConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(url) = cli.rpc_url {
        config.rpc_url = url;
    }
    let password = cli.password.as_deref();

    match cli.command {
        Commands::Create {
            network,
            words,
            accept_terms,
            yes,
        } => commands::create(&config, &network, words, password, accept_terms, yes),
        Commands::Import {
            network,
            phrase,
            accept_terms,
        } => commands::import(&config, &network, phrase, password, accept_terms),
        Commands::Show { reveal } => commands::show(&config, password, reveal),
        Commands::Add => commands::add(&config, password),
        Commands::Remove { position } => commands::remove(&config, password, position),
        Commands::DeleteAll { yes } => commands::delete_all(&config, password, yes),
        Commands::Status => commands::status(&config),
        Commands::Balance { address } => commands::balance(&config, &address).await,
        Commands::Airdrop { address, amount } => {
            commands::airdrop(&config, &address, &amount).await
        }
        Commands::Send { account, to, amount } => {
            commands::send(&config, password, account, &to, &amount).await
        }
        Commands::MintToken {
            account,
            name,
            symbol,
            uri,
            decimals,
            freeze,
            supply,
        } => {
            let mut token = devkit_wallet::rpc::TokenSpec::new(name, symbol, uri, supply);
            token.decimals = decimals;
            token.freezable = freeze;
            commands::mint_token(&config, password, account, &token).await
        }
    }
}
