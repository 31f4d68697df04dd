//! Key derivation and management
//!
//! This module provides functionality for deriving per-chain accounts from a
//! BIP-39 seed.

pub mod ethereum;
pub mod solana;
mod derivation;

pub use derivation::*;
pub use ethereum::EthereumDerivation;
pub use solana::SolanaDerivation;
