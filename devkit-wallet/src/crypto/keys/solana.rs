//! Solana key derivation

use ed25519_dalek::{SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::account::WalletAccount;
use crate::error::{Error, Result};
use super::derivation::{derive_ed25519_private_key, AccountDeriver, Chain, DerivationPath};

/// Derives Solana accounts: the SLIP-0010 node is used as the Ed25519 seed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolanaDerivation;

impl AccountDeriver for SolanaDerivation {
    fn chain(&self) -> Chain {
        Chain::Solana
    }

    fn derive(&self, seed: &[u8], index: u32) -> Result<WalletAccount> {
        let path = DerivationPath::for_account(Chain::Solana, index)?;
        let secret_key = derive_ed25519_private_key(seed, &path)?;

        let signing_key = SigningKey::from_bytes(&secret_key);
        let address = public_key_to_address(&signing_key.verifying_key());

        // Secret key in the 64-byte `secret || public` layout wallets export
        let keypair_bytes = Zeroizing::new(signing_key.to_keypair_bytes());
        let private_key = bs58::encode(&keypair_bytes[..]).into_string();

        tracing::debug!(%path, %address, "derived solana account");

        Ok(WalletAccount::new(Chain::Solana, index, path, address, private_key))
    }
}

/// Get the Solana address from a public key
pub fn public_key_to_address(public_key: &VerifyingKey) -> String {
    bs58::encode(public_key.to_bytes()).into_string()
}

/// Rebuild a signing key from a base58 encoded 64-byte secret key
pub fn signing_key_from_private_key(private_key: &str) -> Result<SigningKey> {
    let bytes = Zeroizing::new(
        bs58::decode(private_key)
            .into_vec()
            .map_err(|e| Error::InvalidInput(format!("Invalid Solana secret key: {}", e)))?,
    );

    let keypair_bytes: &[u8; 64] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::InvalidInput("Solana secret key must be 64 bytes".to_string()))?;

    SigningKey::from_keypair_bytes(keypair_bytes)
        .map_err(|e| Error::InvalidInput(format!("Inconsistent Solana keypair: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_seed() -> Vec<u8> {
        (0u8..64).collect()
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let seed = test_seed();
        let a = SolanaDerivation.derive(&seed, 0).unwrap();
        let b = SolanaDerivation.derive(&seed, 0).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.private_key(), b.private_key());
        assert_eq!(a.path(), "m/44'/501'/0'/0'");
    }

    #[test]
    fn test_distinct_indices() {
        let seed = test_seed();
        let a = SolanaDerivation.derive(&seed, 0).unwrap();
        let b = SolanaDerivation.derive(&seed, 1).unwrap();
        assert_ne!(a.public_key(), b.public_key());
        assert_ne!(a.private_key(), b.private_key());
    }

    #[test]
    fn test_key_encodings() {
        let account = SolanaDerivation.derive(&test_seed(), 2).unwrap();

        let public = bs58::decode(account.public_key()).into_vec().unwrap();
        assert_eq!(public.len(), 32);

        let secret = bs58::decode(account.private_key()).into_vec().unwrap();
        assert_eq!(secret.len(), 64);
        assert_eq!(&secret[32..], public.as_slice());
    }

    #[test]
    fn test_signing_key_round_trip() {
        let account = SolanaDerivation.derive(&test_seed(), 0).unwrap();
        let signing_key = signing_key_from_private_key(account.private_key()).unwrap();
        assert_eq!(public_key_to_address(&signing_key.verifying_key()), account.public_key());

        assert!(signing_key_from_private_key("not-base58-0OIl").is_err());
        assert!(signing_key_from_private_key(account.public_key()).is_err());
    }
}
