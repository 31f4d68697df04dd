//! Password-gated dashboard session
//!
//! A session always starts `Locked`. Nothing secret (recovery phrase, private
//! keys) and no account mutation is reachable until [`WalletSession::unlock`]
//! succeeds. The gate state is never persisted.

use tracing::{info, warn};

use crate::account::WalletAccount;
use crate::error::{Error, Result};
use crate::store::{AccountStore, StateStore};

/// Credential gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Locked,
    Unlocked,
}

/// Dashboard over an active wallet
pub struct WalletSession<S> {
    store: AccountStore<S>,
    gate: GateState,
    /// Per-position private key visibility, parallel to `walletPaths`
    visible_private_keys: Vec<bool>,
}

impl<S: StateStore> WalletSession<S> {
    pub fn new(store: AccountStore<S>) -> Self {
        let visible_private_keys = vec![false; store.wallet_paths().len()];
        Self {
            store,
            gate: GateState::Locked,
            visible_private_keys,
        }
    }

    pub fn gate(&self) -> GateState {
        self.gate
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate == GateState::Unlocked
    }

    /// Read-only view of the underlying store
    pub fn store(&self) -> &AccountStore<S> {
        &self.store
    }

    pub fn into_store(self) -> AccountStore<S> {
        self.store
    }

    /// Check a password without changing the gate
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.store.verify_password(candidate)
    }

    /// Open the gate
    ///
    /// The first unlock of a wallet without accounts creates account 0.
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        if !self.store.is_wallet_created() {
            return Err(Error::InvalidState("wallet setup is not complete".to_string()));
        }
        if !self.store.verify_password(password) {
            warn!("unlock rejected");
            return Err(Error::PasswordMismatch);
        }

        if self.store.wallet_paths().is_empty() {
            self.store.add_account()?;
            self.visible_private_keys.push(false);
        }

        self.gate = GateState::Unlocked;
        info!("session unlocked");
        Ok(())
    }

    pub fn lock(&mut self) {
        self.gate = GateState::Locked;
        self.visible_private_keys.iter_mut().for_each(|v| *v = false);
    }

    /// The recovery phrase, only while unlocked
    pub fn recovery_phrase(&self) -> Result<&[String]> {
        self.ensure_unlocked()?;
        Ok(&self.store.state().recovery_phrase)
    }

    /// Derive one account by derivation index
    pub fn derive_account(&self, index: u32) -> Result<WalletAccount> {
        self.ensure_unlocked()?;
        self.store.derive_account(index)
    }

    /// Derive every account, in display order
    pub fn accounts(&self) -> Result<Vec<Result<WalletAccount>>> {
        self.ensure_unlocked()?;
        Ok(self.store.derive_all())
    }

    /// Account at a display position
    pub fn account_at(&self, position: usize) -> Result<WalletAccount> {
        self.ensure_unlocked()?;
        let index = *self.store.wallet_paths().get(position).ok_or_else(|| {
            Error::InvalidInput(format!("no account at position {}", position))
        })?;
        self.store.derive_account(index)
    }

    pub fn add_account(&mut self) -> Result<u32> {
        self.ensure_unlocked()?;
        let index = self.store.add_account()?;
        self.visible_private_keys.push(false);
        Ok(index)
    }

    /// Remove by display position, together with its visibility flag
    pub fn remove_account(&mut self, position: usize) -> Result<u32> {
        self.ensure_unlocked()?;
        let index = self.store.remove_account(position)?;
        if position < self.visible_private_keys.len() {
            self.visible_private_keys.remove(position);
        }
        Ok(index)
    }

    /// Flip private key visibility for a position, returning the new value
    pub fn toggle_private_key(&mut self, position: usize) -> Result<bool> {
        self.ensure_unlocked()?;
        let visible = self
            .visible_private_keys
            .get_mut(position)
            .ok_or_else(|| Error::InvalidInput(format!("no account at position {}", position)))?;
        *visible = !*visible;
        Ok(*visible)
    }

    pub fn is_private_key_visible(&self, position: usize) -> bool {
        self.is_unlocked() && self.visible_private_keys.get(position).copied().unwrap_or(false)
    }

    /// Irreversibly delete every account and the wallet itself
    pub fn delete_all(&mut self) -> Result<()> {
        self.ensure_unlocked()?;
        self.store.clear_all()?;
        self.visible_private_keys.clear();
        self.gate = GateState::Locked;
        info!("all wallets deleted");
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<()> {
        match self.gate {
            GateState::Unlocked => Ok(()),
            GateState::Locked => Err(Error::InvalidState("session is locked".to_string())),
        }
    }
}
