//! Derived wallet accounts

use std::fmt;

use zeroize::Zeroizing;

use crate::crypto::keys::{Chain, DerivationPath};

/// An account derived from the wallet seed
///
/// Accounts are recomputed from the mnemonic whenever they are needed; only
/// the index is ever persisted.
#[derive(Clone)]
pub struct WalletAccount {
    chain: Chain,
    index: u32,
    path: DerivationPath,
    public_key: String,
    private_key: Zeroizing<String>,
}

impl WalletAccount {
    /// Create a new account record
    pub fn new(
        chain: Chain,
        index: u32,
        path: DerivationPath,
        public_key: String,
        private_key: String,
    ) -> Self {
        Self {
            chain,
            index,
            path,
            public_key,
            private_key: Zeroizing::new(private_key),
        }
    }

    /// Chain the account belongs to
    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// Derivation index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Derivation path, e.g. `m/44'/501'/0'/0'`
    pub fn path(&self) -> String {
        self.path.to_string()
    }

    /// Address in the chain's native format
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Secret key in the chain's export format
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Display label, numbered from one
    pub fn label(&self) -> String {
        format!("Wallet {}", u64::from(self.index) + 1)
    }
}

impl fmt::Debug for WalletAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletAccount")
            .field("chain", &self.chain)
            .field("index", &self.index)
            .field("path", &self.path.to_string())
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
