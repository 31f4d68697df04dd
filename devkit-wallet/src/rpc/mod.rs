//! Network collaborator for the faucet, transfer and token pages
//!
//! The core never talks to a cluster directly. Everything that needs one goes
//! through [`ChainRpc`], implemented over JSON-RPC by `devkit-wallet-solana`
//! and by [`mock::MockRpc`] in tests.

mod amount;
mod actions;
pub mod mock;

pub use amount::*;
pub use actions::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::account::WalletAccount;
use crate::error::Result;

/// A mint created by [`ChainRpc::create_token`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintedToken {
    /// Mint account address
    pub mint: String,
    /// Owner's associated token account holding the initial supply
    pub token_account: String,
    pub signature: String,
}

/// Solana cluster operations used by the wallet
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Balance of an address in lamports
    async fn get_balance(&self, address: &str) -> Result<u64>;

    /// Ask the faucet for lamports, returning the transaction signature
    async fn request_airdrop(&self, address: &str, lamports: u64) -> Result<String>;

    /// Wait for a signature to reach the configured commitment
    async fn confirm_transaction(&self, signature: &str) -> Result<()>;

    /// Transfer lamports from a derived account
    async fn transfer(&self, from: &WalletAccount, to: &str, lamports: u64) -> Result<String>;

    /// Create a mint owned by `owner` and mint the raw initial supply to it
    async fn create_token(&self, owner: &WalletAccount, token: &TokenSpec) -> Result<MintedToken>;
}
