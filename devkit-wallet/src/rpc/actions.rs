use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{ChainRpc, MintedToken, LAMPORTS_PER_SOL};
use crate::account::{validate_address, WalletAccount};
use crate::crypto::keys::Chain;
use crate::error::{Error, Result};

/// Smallest airdrop the faucet form accepts, in lamports
pub const MIN_AIRDROP_LAMPORTS: u64 = 1;

/// Largest airdrop the faucet form accepts, in lamports
pub const MAX_AIRDROP_LAMPORTS: u64 = 2 * LAMPORTS_PER_SOL;

/// Default airdrop, 0.1 SOL
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = LAMPORTS_PER_SOL / 10;

/// Default mint decimals
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;

/// Parameters for a new fungible token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSpec {
    pub name: String,
    pub symbol: String,
    /// Metadata JSON location
    pub uri: String,
    pub decimals: u8,
    /// Keep the owner as freeze authority
    pub freezable: bool,
    /// Initial supply in whole tokens
    pub supply: u64,
}

impl TokenSpec {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        uri: impl Into<String>,
        supply: u64,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            uri: uri.into(),
            decimals: DEFAULT_TOKEN_DECIMALS,
            freezable: false,
            supply,
        }
    }

    /// Check the form fields
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("name", &self.name), ("symbol", &self.symbol), ("uri", &self.uri)] {
            if value.trim().is_empty() {
                return Err(Error::InvalidInput(format!("Token {} is required", field)));
            }
        }
        self.raw_supply().map(|_| ())
    }

    /// Initial supply in base units, `supply * 10^decimals`
    pub fn raw_supply(&self) -> Result<u64> {
        10u64
            .checked_pow(u32::from(self.decimals))
            .and_then(|scale| self.supply.checked_mul(scale))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Supply {} with {} decimals does not fit in 64 bits",
                    self.supply, self.decimals
                ))
            })
    }
}

/// Balance of an address in lamports
pub async fn balance<R: ChainRpc + ?Sized>(rpc: &R, address: &str) -> Result<u64> {
    require_solana_address(address)?;
    rpc.get_balance(address).await
}

/// Request a devnet airdrop and wait for it to confirm
pub async fn airdrop<R: ChainRpc + ?Sized>(
    rpc: &R,
    address: &str,
    lamports: u64,
) -> Result<String> {
    require_solana_address(address)?;
    if !(MIN_AIRDROP_LAMPORTS..=MAX_AIRDROP_LAMPORTS).contains(&lamports) {
        return Err(Error::InvalidInput(
            "Airdrop amount must be between 0.000000001 and 2 SOL".to_string(),
        ));
    }

    let signature = rpc.request_airdrop(address, lamports).await.map_err(|e| {
        warn!(error = %e, "airdrop request failed");
        e
    })?;
    rpc.confirm_transaction(&signature).await?;

    info!(%address, lamports, %signature, "airdrop confirmed");
    Ok(signature)
}

/// Send lamports from a derived Solana account and wait for confirmation
pub async fn send_sol<R: ChainRpc + ?Sized>(
    rpc: &R,
    from: &WalletAccount,
    to: &str,
    lamports: u64,
) -> Result<String> {
    require_solana_signer(from)?;
    require_solana_address(to)?;
    if lamports == 0 {
        return Err(Error::InvalidInput("Amount must be greater than zero".to_string()));
    }

    let signature = rpc.transfer(from, to, lamports).await?;
    rpc.confirm_transaction(&signature).await?;

    info!(from = %from.public_key(), %to, lamports, %signature, "transfer confirmed");
    Ok(signature)
}

/// Create a token owned by a derived Solana account
pub async fn mint_token<R: ChainRpc + ?Sized>(
    rpc: &R,
    owner: &WalletAccount,
    token: &TokenSpec,
) -> Result<MintedToken> {
    require_solana_signer(owner)?;
    token.validate()?;

    let minted = rpc.create_token(owner, token).await?;
    rpc.confirm_transaction(&minted.signature).await?;

    info!(mint = %minted.mint, symbol = %token.symbol, "token created");
    Ok(minted)
}

fn require_solana_address(address: &str) -> Result<()> {
    if !validate_address(address, Chain::Solana) {
        return Err(Error::InvalidInput(format!("Invalid Solana address: {}", address)));
    }
    Ok(())
}

fn require_solana_signer(account: &WalletAccount) -> Result<()> {
    if account.chain() != Chain::Solana {
        return Err(Error::InvalidInput(format!(
            "{} accounts cannot sign Solana transactions",
            account.chain()
        )));
    }
    Ok(())
}
