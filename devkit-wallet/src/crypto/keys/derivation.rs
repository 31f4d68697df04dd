//! Common key derivation functionality
//!
//! Every account lives on a fully hardened SLIP-0010 Ed25519 path
//! `m/44'/{coin_type}'/0'/{index}'`. The 32 bytes found at that node are then
//! interpreted per chain: as an Ed25519 seed for Solana, or as a secp256k1
//! secret key for Ethereum.

use std::fmt;
use std::str::FromStr;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::account::WalletAccount;
use crate::error::{Error, Result};
use super::ethereum::EthereumDerivation;
use super::solana::SolanaDerivation;

/// BIP-44 purpose field
pub const PURPOSE: u32 = 44;

/// Offset marking a hardened child index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const ED25519_CURVE_KEY: &[u8] = b"ed25519 seed";

/// Supported chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Solana (Ed25519)
    Solana,
    /// Ethereum and EVM compatible chains (secp256k1)
    Ethereum,
}

impl Chain {
    /// All supported chains, in display order
    pub const ALL: [Chain; 2] = [Chain::Solana, Chain::Ethereum];

    /// SLIP-44 coin type used in the derivation path
    pub fn coin_type(&self) -> u32 {
        match self {
            Self::Solana => 501,
            Self::Ethereum => 60,
        }
    }

    /// Identifier stored as `selectedNetwork`
    pub fn id(&self) -> &'static str {
        match self {
            Self::Solana => "solana",
            Self::Ethereum => "ethereum",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Chain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solana" => Ok(Self::Solana),
            "ethereum" => Ok(Self::Ethereum),
            "" => Err(Error::InvalidInput("network is empty".to_string())),
            other => Err(Error::InvalidInput(format!("unsupported network: {}", other))),
        }
    }
}

/// A fully hardened derivation path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    /// Child indices without the hardened offset
    components: Vec<u32>,
}

impl DerivationPath {
    /// Path of account `index` on `chain`: `m/44'/{coin}'/0'/{index}'`
    pub fn for_account(chain: Chain, index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::Derivation(format!(
                "account index {} exceeds the hardened range",
                index
            )));
        }
        Ok(Self {
            components: vec![PURPOSE, chain.coin_type(), 0, index],
        })
    }

    /// Parse a path such as `m/44'/501'/0'/0'`; every component must be hardened
    pub fn parse(path: &str) -> Result<Self> {
        let rest = path
            .strip_prefix("m/")
            .ok_or_else(|| Error::Derivation(format!("Invalid derivation path: {}", path)))?;

        let mut components = Vec::new();
        for component in rest.split('/') {
            let index = component
                .strip_suffix('\'')
                .ok_or_else(|| {
                    Error::Derivation(format!("Component is not hardened: {}", component))
                })?
                .parse::<u32>()
                .map_err(|_| {
                    Error::Derivation(format!("Invalid derivation path component: {}", component))
                })?;
            if index >= HARDENED_OFFSET {
                return Err(Error::Derivation(format!(
                    "Derivation path component out of range: {}",
                    component
                )));
            }
            components.push(index);
        }

        Ok(Self { components })
    }

    /// Child indices without the hardened offset
    pub fn components(&self) -> &[u32] {
        &self.components
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.components {
            write!(f, "/{}'", index)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Derive the 32-byte SLIP-0010 Ed25519 private key at `path`
pub fn derive_ed25519_private_key(
    seed: &[u8],
    path: &DerivationPath,
) -> Result<Zeroizing<[u8; 32]>> {
    if seed.is_empty() {
        return Err(Error::Derivation("seed is empty".to_string()));
    }
    if !(16..=64).contains(&seed.len()) {
        return Err(Error::Derivation(format!(
            "seed must be between 16 and 64 bytes, got {}",
            seed.len()
        )));
    }

    let (mut secret_key, mut chain_code) = derive_master_key(seed)?;
    for &index in path.components() {
        let (child_key, child_chain_code) =
            derive_hardened_child(&secret_key, &chain_code, index + HARDENED_OFFSET)?;
        secret_key = child_key;
        chain_code = child_chain_code;
    }

    Ok(secret_key)
}

/// Derive the master key from a seed
fn derive_master_key(seed: &[u8]) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>)> {
    let mut hmac = <Hmac<Sha512> as KeyInit>::new_from_slice(ED25519_CURVE_KEY)
        .map_err(|_| Error::Derivation("HMAC error".to_string()))?;
    hmac.update(seed);

    split_hmac_output(hmac)
}

/// Derive a hardened child key from a parent key
fn derive_hardened_child(
    parent_key: &[u8; 32],
    parent_chain_code: &[u8; 32],
    index: u32,
) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>)> {
    let mut data = Zeroizing::new(Vec::with_capacity(37));
    data.push(0);
    data.extend_from_slice(parent_key);
    data.extend_from_slice(&index.to_be_bytes());

    let mut hmac = <Hmac<Sha512> as KeyInit>::new_from_slice(parent_chain_code)
        .map_err(|_| Error::Derivation("HMAC error".to_string()))?;
    hmac.update(&data);

    split_hmac_output(hmac)
}

fn split_hmac_output(hmac: Hmac<Sha512>) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>)> {
    let mut result = Zeroizing::new([0u8; 64]);
    result.copy_from_slice(&hmac.finalize().into_bytes());

    let mut key = Zeroizing::new([0u8; 32]);
    let mut chain_code = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&result[0..32]);
    chain_code.copy_from_slice(&result[32..64]);

    Ok((key, chain_code))
}

/// Chain specific account derivation
pub trait AccountDeriver {
    /// Chain this deriver produces accounts for
    fn chain(&self) -> Chain;

    /// Derive account `index` from a BIP-39 seed
    fn derive(&self, seed: &[u8], index: u32) -> Result<WalletAccount>;
}

/// Closed set of supported derivations, selected by chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainDerivation {
    Solana(SolanaDerivation),
    Ethereum(EthereumDerivation),
}

impl ChainDerivation {
    pub fn for_chain(chain: Chain) -> Self {
        match chain {
            Chain::Solana => Self::Solana(SolanaDerivation),
            Chain::Ethereum => Self::Ethereum(EthereumDerivation),
        }
    }
}

impl AccountDeriver for ChainDerivation {
    fn chain(&self) -> Chain {
        match self {
            Self::Solana(d) => d.chain(),
            Self::Ethereum(d) => d.chain(),
        }
    }

    fn derive(&self, seed: &[u8], index: u32) -> Result<WalletAccount> {
        match self {
            Self::Solana(d) => d.derive(seed, index),
            Self::Ethereum(d) => d.derive(seed, index),
        }
    }
}

/// Derive account `index` on `chain` from a seed
pub fn derive_account(seed: &[u8], chain: Chain, index: u32) -> Result<WalletAccount> {
    ChainDerivation::for_chain(chain).derive(seed, index)
}
