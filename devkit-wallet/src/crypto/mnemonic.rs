//! Mnemonic phrase generation and handling

use std::fmt;

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Length in bytes of a BIP-39 seed
pub const SEED_LEN: usize = 64;

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Map a word count onto a strength
    pub fn from_word_count(count: usize) -> Result<Self> {
        match count {
            12 => Ok(Self::Words12),
            24 => Ok(Self::Words24),
            other => Err(Error::InvalidMnemonic(format!(
                "expected 12 or 24 words, got {}",
                other
            ))),
        }
    }

    /// Number of words in a phrase of this strength
    pub fn word_count(&self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words24 => 24,
        }
    }

    /// Get entropy length in bytes
    fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16, // 128 bits
            Self::Words24 => 32, // 256 bits
        }
    }
}

impl Default for MnemonicStrength {
    fn default() -> Self {
        Self::Words12
    }
}

/// A 64-byte BIP-39 seed, wiped from memory on drop
#[derive(Clone)]
pub struct Seed([u8; SEED_LEN]);

impl Drop for Seed {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl Seed {
    /// Get the raw seed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// Generate a new random mnemonic with the specified strength
///
/// The words are returned in canonical order.
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<Vec<String>> {
    let mut entropy = vec![0u8; strength.entropy_bytes()];
    OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| Error::EntropyUnavailable(e.to_string()))?;

    let mnemonic = Mnemonic::from_entropy(&entropy);
    entropy.zeroize();
    let mnemonic = mnemonic.map_err(|e| Error::InvalidMnemonic(e.to_string()))?;

    Ok(mnemonic_words(&mnemonic))
}

/// Split pasted text into normalized phrase words
pub fn split_phrase(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Validate a mnemonic phrase strictly: word count, wordlist and checksum
pub fn validate_mnemonic<S: AsRef<str>>(words: &[S]) -> Result<MnemonicStrength> {
    parse_mnemonic(words).map(|(_, strength)| strength)
}

/// Generate a seed from a mnemonic phrase and optional passphrase
pub fn mnemonic_to_seed<S: AsRef<str>>(words: &[S], passphrase: Option<&str>) -> Result<Seed> {
    let (mnemonic, _) = parse_mnemonic(words)?;
    Ok(Seed(mnemonic.to_seed(passphrase.unwrap_or(""))))
}

fn parse_mnemonic<S: AsRef<str>>(words: &[S]) -> Result<(Mnemonic, MnemonicStrength)> {
    let strength = MnemonicStrength::from_word_count(words.len())?;

    let phrase = words
        .iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mnemonic = Mnemonic::parse_normalized(&phrase).map_err(|e| match e {
        bip39::Error::UnknownWord(position) => Error::InvalidMnemonic(format!(
            "word {} is not in the wordlist",
            position + 1
        )),
        bip39::Error::InvalidChecksum => {
            Error::InvalidMnemonic("checksum does not match".to_string())
        }
        other => Error::InvalidMnemonic(other.to_string()),
    })?;

    Ok((mnemonic, strength))
}

fn mnemonic_words(mnemonic: &Mnemonic) -> Vec<String> {
    mnemonic.to_string().split(' ').map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_mnemonic() {
        for strength in [MnemonicStrength::Words12, MnemonicStrength::Words24] {
            let words = generate_mnemonic(strength).unwrap();
            assert_eq!(words.len(), strength.word_count());
            assert_eq!(validate_mnemonic(&words).unwrap(), strength);
        }
    }

    #[test]
    fn test_generated_mnemonics_differ() {
        let a = generate_mnemonic(MnemonicStrength::Words12).unwrap();
        let b = generate_mnemonic(MnemonicStrength::Words12).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_mnemonic() {
        let valid = split_phrase(ABANDON);
        assert_eq!(validate_mnemonic(&valid).unwrap(), MnemonicStrength::Words12);

        let bad_checksum = split_phrase(&ABANDON.replace("about", "abandon"));
        assert!(matches!(validate_mnemonic(&bad_checksum), Err(Error::InvalidMnemonic(_))));

        let unknown_word = split_phrase(&ABANDON.replace("about", "zzzz"));
        let err = validate_mnemonic(&unknown_word).unwrap_err();
        assert!(err.to_string().contains("word 12"));

        let short = &valid[..11];
        assert!(matches!(validate_mnemonic(short), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_split_phrase_normalizes() {
        let words = split_phrase("  Abandon\tABANDON \n about ");
        assert_eq!(words, vec!["abandon", "abandon", "about"]);
    }

    #[test]
    fn test_mnemonic_to_seed() {
        let words = split_phrase(ABANDON);
        let seed = mnemonic_to_seed(&words, None).unwrap();

        assert_eq!(seed.as_bytes().len(), SEED_LEN);
        // BIP-39 reference vector for this phrase with an empty passphrase
        assert_eq!(hex::encode(&seed.as_bytes()[0..8]), "5eb00bbddcf06908");

        let again = mnemonic_to_seed(&words, Some("")).unwrap();
        assert_eq!(seed.as_bytes(), again.as_bytes());

        let salted = mnemonic_to_seed(&words, Some("TREZOR")).unwrap();
        assert_ne!(seed.as_bytes(), salted.as_bytes());
    }

    #[test]
    fn test_seed_debug_is_redacted() {
        let seed = mnemonic_to_seed(&split_phrase(ABANDON), None).unwrap();
        assert_eq!(format!("{:?}", seed), "Seed(<redacted>)");
    }
}
