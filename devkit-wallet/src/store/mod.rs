//! Persisted wallet state and the account store
//!
//! The store owns the only mutable wallet record of a session. Every mutation
//! is applied to a copy, persisted through the [`StateStore`] adapter, and only
//! then committed in memory, so a failed write leaves the previous state intact.

mod backend;

pub use backend::{FileStore, MemoryStore, StateStore, STORAGE_KEY};

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use zeroize::Zeroize;

use crate::account::WalletAccount;
use crate::crypto::keys::{derive_account, Chain};
use crate::crypto::mnemonic::mnemonic_to_seed;
use crate::crypto::password::verify_password;
use crate::error::{Error, Result};

/// The persisted wallet record
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    /// Chain identifier, empty until chosen
    #[serde(default)]
    pub selected_network: String,
    #[serde(default)]
    pub recovery_phrase: Vec<String>,
    #[serde(default)]
    pub hashed_password: String,
    /// Derivation indices of the accounts, in display order
    #[serde(default)]
    pub wallet_paths: Vec<u32>,
    #[serde(default)]
    pub is_wallet_created: bool,
}

impl Drop for WalletState {
    fn drop(&mut self) {
        self.recovery_phrase.zeroize();
        self.hashed_password.zeroize();
    }
}

impl fmt::Debug for WalletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletState")
            .field("selected_network", &self.selected_network)
            .field("recovery_phrase", &format_args!("<{} words>", self.recovery_phrase.len()))
            .field("hashed_password", &!self.hashed_password.is_empty())
            .field("wallet_paths", &self.wallet_paths)
            .field("is_wallet_created", &self.is_wallet_created)
            .finish()
    }
}

/// Session owned account store backed by a persistence adapter
pub struct AccountStore<S> {
    backend: S,
    state: WalletState,
}

impl<S: StateStore> AccountStore<S> {
    /// Open the store, loading the last committed record if there is one
    pub fn open(backend: S) -> Result<Self> {
        let state = backend.load()?.unwrap_or_default();
        Ok(Self { backend, state })
    }

    /// Current committed state
    pub fn state(&self) -> &WalletState {
        &self.state
    }

    /// Derivation indices, in display order
    pub fn wallet_paths(&self) -> &[u32] {
        &self.state.wallet_paths
    }

    pub fn is_wallet_created(&self) -> bool {
        self.state.is_wallet_created
    }

    /// Chain parsed from `selectedNetwork`
    pub fn selected_chain(&self) -> Result<Chain> {
        if self.state.selected_network.is_empty() {
            return Err(Error::InvalidState("no network selected".to_string()));
        }
        self.state.selected_network.parse()
    }

    pub fn set_network(&mut self, chain: Chain) -> Result<()> {
        self.update(|state| state.selected_network = chain.id().to_string())
    }

    /// Store the recovery phrase; callers validate it first
    pub fn set_recovery_phrase(&mut self, words: Vec<String>) -> Result<()> {
        self.update(|state| state.recovery_phrase = words)
    }

    /// Store the password digest produced by the credential gate
    pub fn set_password_hash(&mut self, digest: String) -> Result<()> {
        self.update(|state| state.hashed_password = digest)
    }

    pub fn set_wallet_created(&mut self, created: bool) -> Result<()> {
        self.update(|state| state.is_wallet_created = created)
    }

    /// Append the next derivation index and return it
    ///
    /// The next index is one past the largest index still present, which equals
    /// the list length as long as nothing was removed, and never collides with
    /// an index that is still referenced.
    pub fn add_account(&mut self) -> Result<u32> {
        let next = match self.state.wallet_paths.iter().max() {
            Some(&max) => max
                .checked_add(1)
                .ok_or_else(|| Error::InvalidState("account indices exhausted".to_string()))?,
            None => 0,
        };

        self.update(|state| state.wallet_paths.push(next))?;
        info!(index = next, "account added");
        Ok(next)
    }

    /// Remove the account at `position` (not by value) and return its index
    pub fn remove_account(&mut self, position: usize) -> Result<u32> {
        let index = *self.state.wallet_paths.get(position).ok_or_else(|| {
            Error::InvalidInput(format!(
                "no account at position {} ({} accounts)",
                position,
                self.state.wallet_paths.len()
            ))
        })?;

        self.update(|state| {
            state.wallet_paths.remove(position);
        })?;
        info!(position, index, "account removed");
        Ok(index)
    }

    /// Irreversibly reset the whole record, including `isWalletCreated`
    pub fn clear_all(&mut self) -> Result<()> {
        self.backend.clear()?;
        self.state = WalletState::default();
        info!("wallet store cleared");
        Ok(())
    }

    /// Check a candidate password against the stored digest
    pub fn verify_password(&self, candidate: &str) -> bool {
        if self.state.hashed_password.is_empty() {
            return false;
        }
        verify_password(candidate, &self.state.hashed_password)
    }

    /// Derive the account with derivation index `index` on the selected chain
    pub fn derive_account(&self, index: u32) -> Result<WalletAccount> {
        let chain = self.selected_chain()?;
        if self.state.recovery_phrase.is_empty() {
            return Err(Error::InvalidState("recovery phrase not available".to_string()));
        }

        let seed = mnemonic_to_seed(&self.state.recovery_phrase, None)?;
        derive_account(seed.as_bytes(), chain, index)
    }

    /// Derive every stored account; a failure affects only its own entry
    pub fn derive_all(&self) -> Vec<Result<WalletAccount>> {
        if self.state.wallet_paths.is_empty() {
            return Vec::new();
        }
        let chain = match self.selected_chain() {
            Ok(chain) => chain,
            Err(e) => return vec![Err(e)],
        };
        let seed = match mnemonic_to_seed(&self.state.recovery_phrase, None) {
            Ok(seed) => seed,
            Err(e) => return vec![Err(e)],
        };

        self.state
            .wallet_paths
            .iter()
            .map(|&index| derive_account(seed.as_bytes(), chain, index))
            .collect()
    }

    fn update(&mut self, mutate: impl FnOnce(&mut WalletState)) -> Result<()> {
        let mut next = self.state.clone();
        mutate(&mut next);

        if let Err(e) = self.backend.save(&next) {
            warn!(error = %e, "failed to persist wallet state");
            return Err(e);
        }
        self.state = next;
        Ok(())
    }
}
