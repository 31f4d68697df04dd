//! Wallet creation and import wizard
//!
//! The wizard only ever moves forward: network, then password, then recovery
//! phrase, then completion. Each step validates its input before anything is
//! written to the [`AccountStore`].

use std::fmt;

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::crypto::keys::Chain;
use crate::crypto::mnemonic::{generate_mnemonic, validate_mnemonic, MnemonicStrength};
use crate::crypto::password::{check_password_policy, hash_password};
use crate::error::{Error, Result};
use crate::store::{AccountStore, StateStore};

/// Whether the wallet is freshly generated or restored from a phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Create,
    Import,
}

/// Wizard progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetupStep {
    Start,
    NetworkChosen,
    PasswordSet,
    PhraseEstablished,
    /// Terminal until the wallet is reset
    Active,
}

/// Drives a store through wallet creation or import
pub struct WalletFlow {
    kind: FlowKind,
    step: SetupStep,
    pending_phrase: Option<Zeroizing<Vec<String>>>,
}

impl fmt::Debug for WalletFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletFlow")
            .field("kind", &self.kind)
            .field("step", &self.step)
            .field("phrase_pending", &self.pending_phrase.is_some())
            .finish()
    }
}

impl WalletFlow {
    pub fn new(kind: FlowKind) -> Self {
        Self {
            kind,
            step: SetupStep::Start,
            pending_phrase: None,
        }
    }

    /// Pick up where a persisted store left off
    ///
    /// A completed wallet resumes as `Active`; anything else restarts from
    /// `Start`, since partial wizard progress is not persisted.
    pub fn resume<S: StateStore>(kind: FlowKind, store: &AccountStore<S>) -> Self {
        let mut flow = Self::new(kind);
        if store.is_wallet_created() {
            flow.step = SetupStep::Active;
        }
        flow
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    pub fn step(&self) -> SetupStep {
        self.step
    }

    /// Step 1: choose the chain
    pub fn choose_network<S: StateStore>(
        &mut self,
        store: &mut AccountStore<S>,
        network: &str,
    ) -> Result<Chain> {
        self.expect_step(SetupStep::Start)?;
        let chain: Chain = network.parse()?;

        store.set_network(chain)?;
        self.step = SetupStep::NetworkChosen;
        info!(%chain, "network selected");
        Ok(chain)
    }

    /// Step 2: set the unlock password
    pub fn set_password<S: StateStore>(
        &mut self,
        store: &mut AccountStore<S>,
        password: &str,
        accepted_terms: bool,
    ) -> Result<()> {
        self.expect_step(SetupStep::NetworkChosen)?;
        check_password_policy(password)?;
        if !accepted_terms {
            return Err(Error::InvalidInput("terms of service must be accepted".to_string()));
        }

        store.set_password_hash(hash_password(password)?)?;
        self.step = SetupStep::PasswordSet;
        info!("password set");
        Ok(())
    }

    /// Step 3 (create): generate a phrase for the user to write down
    ///
    /// Calling this again replaces the pending phrase.
    pub fn generate_phrase(&mut self, strength: MnemonicStrength) -> Result<&[String]> {
        self.expect_kind(FlowKind::Create)?;
        self.expect_step(SetupStep::PasswordSet)?;

        let words = self.pending_phrase.insert(Zeroizing::new(generate_mnemonic(strength)?));
        Ok(words.as_slice())
    }

    /// Step 3 (create): commit the generated phrase once the user saved it
    pub fn confirm_phrase<S: StateStore>(
        &mut self,
        store: &mut AccountStore<S>,
        saved: bool,
    ) -> Result<()> {
        self.expect_kind(FlowKind::Create)?;
        self.expect_step(SetupStep::PasswordSet)?;
        if !saved {
            return Err(Error::InvalidInput(
                "confirm that the recovery phrase was saved".to_string(),
            ));
        }

        let words = self
            .pending_phrase
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no recovery phrase generated".to_string()))?;
        store.set_recovery_phrase(words.to_vec())?;

        self.pending_phrase = None;
        self.step = SetupStep::PhraseEstablished;
        info!("recovery phrase saved");
        Ok(())
    }

    /// Step 3 (import): restore from an existing phrase
    pub fn import_phrase<S: StateStore>(
        &mut self,
        store: &mut AccountStore<S>,
        words: Vec<String>,
    ) -> Result<()> {
        self.expect_kind(FlowKind::Import)?;
        self.expect_step(SetupStep::PasswordSet)?;

        let words: Vec<String> = words.iter().map(|w| w.trim().to_lowercase()).collect();
        if let Err(e) = validate_mnemonic(&words) {
            warn!(error = %e, "rejected imported recovery phrase");
            return Err(e);
        }

        store.set_recovery_phrase(words)?;
        self.step = SetupStep::PhraseEstablished;
        info!("recovery phrase imported");
        Ok(())
    }

    /// Step 4: mark the wallet as created
    pub fn complete<S: StateStore>(&mut self, store: &mut AccountStore<S>) -> Result<()> {
        self.expect_step(SetupStep::PhraseEstablished)?;

        store.set_wallet_created(true)?;
        self.step = SetupStep::Active;
        info!("wallet setup complete");
        Ok(())
    }

    /// Wipe the store and restart from the first step
    pub fn reset<S: StateStore>(&mut self, store: &mut AccountStore<S>) -> Result<()> {
        store.clear_all()?;
        self.pending_phrase = None;
        self.step = SetupStep::Start;
        Ok(())
    }

    fn expect_step(&self, expected: SetupStep) -> Result<()> {
        if self.step != expected {
            return Err(Error::InvalidState(format!(
                "expected step {:?}, wizard is at {:?}",
                expected, self.step
            )));
        }
        Ok(())
    }

    fn expect_kind(&self, expected: FlowKind) -> Result<()> {
        if self.kind != expected {
            return Err(Error::InvalidState(format!(
                "not available in the {:?} flow",
                self.kind
            )));
        }
        Ok(())
    }
}
