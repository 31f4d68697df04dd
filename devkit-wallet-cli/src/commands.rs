//! CLI commands

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing::info;
use zeroize::Zeroizing;

use devkit_wallet::account::abbreviate_address;
use devkit_wallet::crypto::mnemonic::{split_phrase, MnemonicStrength};
use devkit_wallet::crypto::password::PasswordStrength;
use devkit_wallet::rpc::{self, TokenSpec};
use devkit_wallet::{AccountStore, FileStore, FlowKind, WalletConfig, WalletFlow, WalletSession};
use devkit_wallet_solana::SolanaRpc;

fn open_store(config: &WalletConfig) -> Result<AccountStore<FileStore>> {
    AccountStore::open(FileStore::new(&config.data_dir))
        .with_context(|| format!("Failed to open wallet in {}", config.data_dir.display()))
}

/// Prompt for password input (hidden)
fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;
    Ok(Zeroizing::new(rpassword::read_password()?))
}

/// Prompt for confirmation
fn prompt_confirm(message: &str) -> Result<bool> {
    print!("{} [y/N]: ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y") || input.trim().eq_ignore_ascii_case("yes"))
}

fn password_or_prompt(password: Option<&str>) -> Result<Zeroizing<String>> {
    match password {
        Some(password) => Ok(Zeroizing::new(password.to_string())),
        None => prompt_password("Password: "),
    }
}

/// Ask twice for a new password unless one was given
fn new_password(password: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(password) = password {
        return Ok(Zeroizing::new(password.to_string()));
    }

    let first = prompt_password("New password: ")?;
    let strength = PasswordStrength::of(&first);
    println!("Password strength: {}/5", strength.score());

    let second = prompt_password("Confirm password: ")?;
    if *first != *second {
        bail!("Passwords do not match");
    }
    Ok(first)
}

fn unlocked_session(
    config: &WalletConfig,
    password: Option<&str>,
) -> Result<WalletSession<FileStore>> {
    let store = open_store(config)?;
    if !store.is_wallet_created() {
        bail!("No wallet found in {}; run `create` or `import` first", config.data_dir.display());
    }

    let mut session = WalletSession::new(store);
    let password = password_or_prompt(password)?;
    session.unlock(&password)?;
    Ok(session)
}

fn ensure_no_wallet(store: &AccountStore<FileStore>) -> Result<()> {
    if store.is_wallet_created() {
        bail!("A wallet already exists; run `delete-all --yes` first");
    }
    Ok(())
}

pub fn create(
    config: &WalletConfig,
    network: &str,
    words: usize,
    password: Option<&str>,
    accept_terms: bool,
    yes: bool,
) -> Result<()> {
    let mut store = open_store(config)?;
    ensure_no_wallet(&store)?;
    let strength = MnemonicStrength::from_word_count(words)?;

    let mut flow = WalletFlow::new(FlowKind::Create);
    flow.choose_network(&mut store, network)?;
    let password = new_password(password)?;
    flow.set_password(&mut store, &password, accept_terms)?;

    let phrase = flow.generate_phrase(strength)?;
    println!("\nRecovery phrase (write it down and keep it offline):\n");
    for (i, word) in phrase.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, word);
    }
    println!();

    if !yes && !prompt_confirm("Have you saved your recovery phrase?")? {
        bail!("Recovery phrase not confirmed; nothing was saved");
    }
    flow.confirm_phrase(&mut store, true)?;
    flow.complete(&mut store)?;

    println!("Wallet created in {}", config.data_dir.display());
    Ok(())
}

pub fn import(
    config: &WalletConfig,
    network: &str,
    phrase: Option<String>,
    password: Option<&str>,
    accept_terms: bool,
) -> Result<()> {
    let mut store = open_store(config)?;
    ensure_no_wallet(&store)?;

    let mut flow = WalletFlow::new(FlowKind::Import);
    flow.choose_network(&mut store, network)?;
    let password = new_password(password)?;
    flow.set_password(&mut store, &password, accept_terms)?;

    let phrase = match phrase {
        Some(phrase) => Zeroizing::new(phrase),
        None => {
            print!("Recovery phrase: ");
            io::stdout().flush()?;
            let mut line = Zeroizing::new(String::new());
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };
    flow.import_phrase(&mut store, split_phrase(&phrase))?;
    flow.complete(&mut store)?;

    println!("Wallet imported into {}", config.data_dir.display());
    Ok(())
}

pub fn show(config: &WalletConfig, password: Option<&str>, reveal: bool) -> Result<()> {
    let session = unlocked_session(config, password)?;
    let chain = session.store().selected_chain()?;
    println!("Network: {}", chain);

    if reveal {
        println!("Recovery phrase: {}", session.recovery_phrase()?.join(" "));
    }

    for (position, account) in session.accounts()?.into_iter().enumerate() {
        match account {
            Ok(account) => {
                println!(
                    "[{}] {}  {}  {}",
                    position,
                    account.label(),
                    account.path(),
                    account.public_key()
                );
                if reveal {
                    println!("    private key: {}", account.private_key());
                }
            }
            Err(e) => println!("[{}] derivation failed: {}", position, e),
        }
    }
    Ok(())
}

pub fn add(config: &WalletConfig, password: Option<&str>) -> Result<()> {
    let mut session = unlocked_session(config, password)?;
    let index = session.add_account()?;
    let account = session.derive_account(index)?;
    println!("Added {} ({})", account.label(), account.public_key());
    Ok(())
}

pub fn remove(config: &WalletConfig, password: Option<&str>, position: usize) -> Result<()> {
    let mut session = unlocked_session(config, password)?;
    let index = session.remove_account(position)?;
    println!("Removed account at position {} (index {})", position, index);
    Ok(())
}

pub fn delete_all(config: &WalletConfig, password: Option<&str>, yes: bool) -> Result<()> {
    if !yes {
        bail!("Deleting the wallet cannot be undone; pass --yes to confirm");
    }
    let mut session = unlocked_session(config, password)?;
    session.delete_all()?;
    println!("All wallets deleted");
    Ok(())
}

pub fn status(config: &WalletConfig) -> Result<()> {
    let store = open_store(config)?;
    let state = store.state();

    println!("Data directory: {}", config.data_dir.display());
    println!("Wallet created: {}", state.is_wallet_created);
    if !state.selected_network.is_empty() {
        println!("Network: {}", state.selected_network);
    }
    println!("Accounts: {}", state.wallet_paths.len());
    println!("RPC endpoint: {}", config.rpc_url);
    Ok(())
}

pub async fn balance(config: &WalletConfig, address: &str) -> Result<()> {
    let client = SolanaRpc::from_config(config);
    let lamports = rpc::balance(&client, address).await?;
    println!("{}: {} SOL", abbreviate_address(address), rpc::format_sol(lamports));
    Ok(())
}

pub async fn airdrop(config: &WalletConfig, address: &str, amount: &str) -> Result<()> {
    let client = SolanaRpc::from_config(config);
    let lamports = rpc::parse_sol(amount)?;

    info!(rpc = %client.url(), "requesting airdrop");
    let signature = rpc::airdrop(&client, address, lamports).await?;
    println!("Airdropped {} SOL to {}", rpc::format_sol(lamports), abbreviate_address(address));
    println!("Signature: {}", signature);
    Ok(())
}

pub async fn send(
    config: &WalletConfig,
    password: Option<&str>,
    position: usize,
    to: &str,
    amount: &str,
) -> Result<()> {
    let session = unlocked_session(config, password)?;
    let from = session.account_at(position)?;
    let lamports = rpc::parse_sol(amount)?;

    let client = SolanaRpc::from_config(config);
    let signature = rpc::send_sol(&client, &from, to, lamports).await?;
    println!(
        "Sent {} SOL from {} to {}",
        rpc::format_sol(lamports),
        abbreviate_address(from.public_key()),
        abbreviate_address(to)
    );
    println!("Signature: {}", signature);
    Ok(())
}

pub async fn mint_token(
    config: &WalletConfig,
    password: Option<&str>,
    position: usize,
    token: &TokenSpec,
) -> Result<()> {
    let session = unlocked_session(config, password)?;
    let owner = session.account_at(position)?;

    let client = SolanaRpc::from_config(config);
    let minted = rpc::mint_token(&client, &owner, token).await?;
    println!("Created {} ({})", token.name, token.symbol);
    println!("Mint: {}", minted.mint);
    println!("Token account: {}", minted.token_account);
    println!("Signature: {}", minted.signature);
    Ok(())
}
