//! In-memory cluster for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChainRpc, MintedToken, TokenSpec};
use crate::account::WalletAccount;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct Ledger {
    balances: HashMap<String, u64>,
    /// Raw token amounts keyed by (mint, holder)
    tokens: HashMap<(String, String), u64>,
    confirmed: Vec<String>,
    next_signature: u64,
    next_mint: u64,
}

impl Ledger {
    fn signature(&mut self, prefix: &str) -> String {
        self.next_signature += 1;
        format!("{}-{}", prefix, self.next_signature)
    }
}

/// Mock [`ChainRpc`] with a balance ledger and optional faucet rate limiting
#[derive(Debug, Default)]
pub struct MockRpc {
    ledger: Mutex<Ledger>,
    rate_limited: bool,
}

impl MockRpc {
    pub fn new() -> Self {
        Self::default()
    }

    /// A faucet that rejects every airdrop like a 429 response
    pub fn rate_limited() -> Self {
        Self {
            rate_limited: true,
            ..Self::default()
        }
    }

    pub fn fund(&self, address: &str, lamports: u64) {
        if let Ok(mut ledger) = self.ledger.lock() {
            *ledger.balances.entry(address.to_string()).or_default() += lamports;
        }
    }

    pub fn is_confirmed(&self, signature: &str) -> bool {
        self.ledger
            .lock()
            .map(|ledger| ledger.confirmed.iter().any(|s| s == signature))
            .unwrap_or(false)
    }

    /// Raw token balance of `holder` for `mint`
    pub fn token_balance(&self, mint: &str, holder: &str) -> u64 {
        self.ledger
            .lock()
            .ok()
            .and_then(|ledger| ledger.tokens.get(&(mint.to_string(), holder.to_string())).copied())
            .unwrap_or(0)
    }

    fn ledger(&self) -> Result<std::sync::MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|_| Error::Rpc("mock ledger poisoned".to_string()))
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn get_balance(&self, address: &str) -> Result<u64> {
        Ok(self.ledger()?.balances.get(address).copied().unwrap_or(0))
    }

    async fn request_airdrop(&self, address: &str, lamports: u64) -> Result<String> {
        if self.rate_limited {
            return Err(Error::Rpc(
                "429 Too Many Requests: You've either reached your airdrop limit today or the airdrop faucet has run dry."
                    .to_string(),
            ));
        }
        let mut ledger = self.ledger()?;
        *ledger.balances.entry(address.to_string()).or_default() += lamports;
        Ok(ledger.signature("airdrop"))
    }

    async fn confirm_transaction(&self, signature: &str) -> Result<()> {
        let mut ledger = self.ledger()?;
        ledger.confirmed.push(signature.to_string());
        Ok(())
    }

    async fn transfer(&self, from: &WalletAccount, to: &str, lamports: u64) -> Result<String> {
        let mut ledger = self.ledger()?;
        let available = ledger.balances.get(from.public_key()).copied().unwrap_or(0);
        if available < lamports {
            return Err(Error::Rpc(format!(
                "insufficient funds: {} has {} lamports, needs {}",
                from.public_key(),
                available,
                lamports
            )));
        }

        ledger.balances.insert(from.public_key().to_string(), available - lamports);
        *ledger.balances.entry(to.to_string()).or_default() += lamports;
        Ok(ledger.signature("transfer"))
    }

    async fn create_token(&self, owner: &WalletAccount, token: &TokenSpec) -> Result<MintedToken> {
        let raw_supply = token.raw_supply()?;
        let mut ledger = self.ledger()?;

        ledger.next_mint += 1;
        let mint = format!("mint-{}", ledger.next_mint);
        ledger
            .tokens
            .insert((mint.clone(), owner.public_key().to_string()), raw_supply);

        Ok(MintedToken {
            token_account: format!("{}-ata-{}", mint, owner.public_key()),
            mint,
            signature: ledger.signature("mint"),
        })
    }
}
