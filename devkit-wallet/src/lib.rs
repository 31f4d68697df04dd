//! DevKit Wallet Core - HD wallet for Solana and Ethereum
//!
//! This library provides the core of a developer wallet: BIP-39 mnemonic
//! generation, SLIP-0010 account derivation on `m/44'/{coin}'/0'/{index}'`,
//! a password gate, a persisted account store and the create/import wizard.

pub mod error;
pub mod crypto;
pub mod account;
pub mod store;
pub mod flow;
pub mod session;
pub mod config;
pub mod rpc;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use account::WalletAccount;
pub use config::WalletConfig;
pub use crypto::keys::Chain;
pub use flow::{FlowKind, SetupStep, WalletFlow};
pub use session::{GateState, WalletSession};
pub use store::{AccountStore, FileStore, MemoryStore, StateStore, WalletState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
