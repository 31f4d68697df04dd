//! Ethereum key derivation

use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use crate::account::WalletAccount;
use crate::error::{Error, Result};
use super::derivation::{derive_ed25519_private_key, AccountDeriver, Chain, DerivationPath};

/// Derives Ethereum accounts: the SLIP-0010 node is used as the secp256k1 secret key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EthereumDerivation;

impl AccountDeriver for EthereumDerivation {
    fn chain(&self) -> Chain {
        Chain::Ethereum
    }

    fn derive(&self, seed: &[u8], index: u32) -> Result<WalletAccount> {
        let path = DerivationPath::for_account(Chain::Ethereum, index)?;
        let node = derive_ed25519_private_key(seed, &path)?;

        let secret_key = SecretKey::from_slice(&node[..])
            .map_err(|e| Error::Derivation(format!("Invalid secret key: {}", e)))?;
        let address = secret_key_to_address(&secret_key);

        let secret_bytes = Zeroizing::new(secret_key.secret_bytes());
        let private_key = format!("0x{}", hex::encode(&secret_bytes[..]));

        tracing::debug!(%path, %address, "derived ethereum account");

        Ok(WalletAccount::new(Chain::Ethereum, index, path, address, private_key))
    }
}

/// Get the checksummed Ethereum address of a secret key
pub fn secret_key_to_address(secret_key: &SecretKey) -> String {
    let secp = Secp256k1::signing_only();
    let public_key = PublicKey::from_secret_key(&secp, secret_key);
    public_key_to_address(&public_key)
}

/// Get the checksummed Ethereum address from a public key
pub fn public_key_to_address(public_key: &PublicKey) -> String {
    // Skip the 0x04 prefix of the uncompressed encoding
    let uncompressed = public_key.serialize_uncompressed();
    let key_hash = keccak256(&uncompressed[1..]);

    to_checksum_address(&hex::encode(&key_hash[12..]))
}

/// Apply EIP-55 mixed-case checksum to a 40 character hex address
pub fn to_checksum_address(address: &str) -> String {
    let lower = address.trim_start_matches("0x").to_ascii_lowercase();
    let hash = keccak256(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }
    checksummed
}

/// Calculate the Keccak-256 hash of data
fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
