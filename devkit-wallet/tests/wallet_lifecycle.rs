//! End to end wallet lifecycle against the file store

use devkit_wallet::crypto::mnemonic::{split_phrase, MnemonicStrength};
use devkit_wallet::crypto::password::legacy_sha256_digest;
use devkit_wallet::rpc::{self, mock::MockRpc, TokenSpec, LAMPORTS_PER_SOL};
use devkit_wallet::{AccountStore, Chain, Error, FileStore, FlowKind, WalletFlow, WalletSession};

const PASSWORD: &str = "Str0ng!Pass";

fn create_wallet(dir: &std::path::Path, network: &str) -> Vec<String> {
    let mut store = AccountStore::open(FileStore::new(dir)).unwrap();
    let mut flow = WalletFlow::new(FlowKind::Create);
    flow.choose_network(&mut store, network).unwrap();
    flow.set_password(&mut store, PASSWORD, true).unwrap();
    let words = flow.generate_phrase(MnemonicStrength::Words12).unwrap().to_vec();
    flow.confirm_phrase(&mut store, true).unwrap();
    flow.complete(&mut store).unwrap();
    words
}

#[test]
fn test_three_accounts_are_distinct() {
    let dir = tempfile::tempdir().unwrap();
    create_wallet(dir.path(), "solana");

    let store = AccountStore::open(FileStore::new(dir.path())).unwrap();
    let mut session = WalletSession::new(store);
    session.unlock(PASSWORD).unwrap();
    session.add_account().unwrap();
    session.add_account().unwrap();
    assert_eq!(session.store().wallet_paths(), &[0, 1, 2]);

    let accounts: Vec<_> = session.accounts().unwrap().into_iter().map(|a| a.unwrap()).collect();
    assert_ne!(accounts[1].public_key(), accounts[0].public_key());
    assert_ne!(accounts[1].public_key(), accounts[2].public_key());
    assert_eq!(accounts[2].label(), "Wallet 3");
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    create_wallet(dir.path(), "ethereum");

    let first = {
        let store = AccountStore::open(FileStore::new(dir.path())).unwrap();
        let mut session = WalletSession::new(store);
        session.unlock(PASSWORD).unwrap();
        session.add_account().unwrap();
        session.remove_account(0).unwrap();
        session.derive_account(1).unwrap().public_key().to_string()
    };

    let mut session = WalletSession::new(AccountStore::open(FileStore::new(dir.path())).unwrap());
    assert!(!session.is_unlocked());
    session.unlock(PASSWORD).unwrap();
    assert_eq!(session.store().wallet_paths(), &[1]);
    assert_eq!(session.store().selected_chain().unwrap(), Chain::Ethereum);
    assert_eq!(session.account_at(0).unwrap().public_key(), first);
}

#[test]
fn test_import_reproduces_created_accounts() {
    let created_dir = tempfile::tempdir().unwrap();
    let words = create_wallet(created_dir.path(), "solana");
    let created_store = AccountStore::open(FileStore::new(created_dir.path())).unwrap();
    let mut created = WalletSession::new(created_store);
    created.unlock(PASSWORD).unwrap();

    let imported_dir = tempfile::tempdir().unwrap();
    let mut store = AccountStore::open(FileStore::new(imported_dir.path())).unwrap();
    let mut flow = WalletFlow::new(FlowKind::Import);
    flow.choose_network(&mut store, "solana").unwrap();
    flow.set_password(&mut store, "An0ther!Pass", true).unwrap();
    flow.import_phrase(&mut store, split_phrase(&words.join(" "))).unwrap();
    flow.complete(&mut store).unwrap();

    let mut imported = WalletSession::new(store);
    imported.unlock("An0ther!Pass").unwrap();

    assert_eq!(
        imported.derive_account(0).unwrap().public_key(),
        created.derive_account(0).unwrap().public_key()
    );
}

#[test]
fn test_delete_all_clears_the_file() {
    let dir = tempfile::tempdir().unwrap();
    create_wallet(dir.path(), "solana");
    let backend = FileStore::new(dir.path());
    assert!(backend.path().exists());

    let mut session = WalletSession::new(AccountStore::open(backend.clone()).unwrap());
    session.unlock(PASSWORD).unwrap();
    session.delete_all().unwrap();

    assert!(!backend.path().exists());
    let reopened = AccountStore::open(backend).unwrap();
    assert!(!reopened.is_wallet_created());
    assert!(reopened.wallet_paths().is_empty());
    assert!(reopened.state().recovery_phrase.is_empty());
}

#[test]
fn test_legacy_password_digest_still_unlocks() {
    let dir = tempfile::tempdir().unwrap();
    create_wallet(dir.path(), "solana");

    let mut store = AccountStore::open(FileStore::new(dir.path())).unwrap();
    store.set_password_hash(legacy_sha256_digest(PASSWORD)).unwrap();

    let mut session = WalletSession::new(store);
    assert!(matches!(session.unlock("wrong-password"), Err(Error::PasswordMismatch)));
    session.unlock(PASSWORD).unwrap();
}

#[tokio::test]
async fn test_faucet_and_transfer() {
    let dir = tempfile::tempdir().unwrap();
    create_wallet(dir.path(), "solana");
    let mut session = WalletSession::new(AccountStore::open(FileStore::new(dir.path())).unwrap());
    session.unlock(PASSWORD).unwrap();
    session.add_account().unwrap();

    let payer = session.account_at(0).unwrap();
    let payee = session.account_at(1).unwrap();
    let rpc = MockRpc::new();

    let signature = rpc::airdrop(&rpc, payer.public_key(), rpc::DEFAULT_AIRDROP_LAMPORTS)
        .await
        .unwrap();
    assert!(rpc.is_confirmed(&signature));
    assert_eq!(rpc::balance(&rpc, payer.public_key()).await.unwrap(), LAMPORTS_PER_SOL / 10);

    let amount = rpc::parse_sol("0.04").unwrap();
    rpc::send_sol(&rpc, &payer, payee.public_key(), amount).await.unwrap();
    assert_eq!(rpc::balance(&rpc, payee.public_key()).await.unwrap(), 40_000_000);
    assert_eq!(rpc::balance(&rpc, payer.public_key()).await.unwrap(), 60_000_000);
}

#[tokio::test]
async fn test_faucet_limits() {
    let rpc = MockRpc::new();
    let address = "11111111111111111111111111111111";

    assert!(matches!(rpc::airdrop(&rpc, address, 0).await, Err(Error::InvalidInput(_))));
    assert!(matches!(
        rpc::airdrop(&rpc, address, 2 * LAMPORTS_PER_SOL + 1).await,
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        rpc::airdrop(&rpc, "0xabc", LAMPORTS_PER_SOL).await,
        Err(Error::InvalidInput(_))
    ));
    rpc::airdrop(&rpc, address, 2 * LAMPORTS_PER_SOL).await.unwrap();

    let limited = MockRpc::rate_limited();
    match rpc::airdrop(&limited, address, LAMPORTS_PER_SOL).await {
        Err(Error::Rpc(message)) => assert!(message.contains("airdrop limit")),
        other => panic!("expected rate limit error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_mint_token() {
    let dir = tempfile::tempdir().unwrap();
    create_wallet(dir.path(), "solana");
    let mut session = WalletSession::new(AccountStore::open(FileStore::new(dir.path())).unwrap());
    session.unlock(PASSWORD).unwrap();
    let owner = session.account_at(0).unwrap();
    let rpc = MockRpc::new();

    let token = TokenSpec::new("Dev Token", "DEV", "https://example.com/dev.json", 500);
    let minted = rpc::mint_token(&rpc, &owner, &token).await.unwrap();

    assert!(rpc.is_confirmed(&minted.signature));
    assert_eq!(rpc.token_balance(&minted.mint, owner.public_key()), 500_000_000);
}

#[tokio::test]
async fn test_ethereum_accounts_cannot_sign_solana_transfers() {
    let dir = tempfile::tempdir().unwrap();
    create_wallet(dir.path(), "ethereum");
    let mut session = WalletSession::new(AccountStore::open(FileStore::new(dir.path())).unwrap());
    session.unlock(PASSWORD).unwrap();
    let account = session.account_at(0).unwrap();

    let rpc = MockRpc::new();
    let result = rpc::send_sol(&rpc, &account, "11111111111111111111111111111111", 1).await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}
