//! Cryptographic primitives and operations
//!
//! This module provides functionality for mnemonic generation, key derivation,
//! and password hashing required for wallet management.

pub mod mnemonic;
pub mod keys;
pub mod password;

pub use mnemonic::*;
pub use keys::*;
pub use password::*;
