//! Address validation

use crate::crypto::keys::ethereum::to_checksum_address;
use crate::crypto::keys::Chain;

/// Validate an address for a specific chain
///
/// Ethereum addresses in mixed case must carry a valid EIP-55 checksum;
/// all-lowercase and all-uppercase forms are accepted as unchecksummed.
pub fn validate_address(address: &str, chain: Chain) -> bool {
    match chain {
        Chain::Ethereum => {
            let Some(body) = address.strip_prefix("0x") else {
                return false;
            };
            if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
                return false;
            }

            let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
            let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
            if has_lower && has_upper {
                return to_checksum_address(body) == address;
            }
            true
        }
        Chain::Solana => {
            if address.len() < 32 || address.len() > 44 {
                return false;
            }

            match bs58::decode(address).into_vec() {
                Ok(bytes) => bytes.len() == 32,
                Err(_) => false,
            }
        }
    }
}

/// Shorten an address for display as `abcd...wxyz`
pub fn abbreviate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
