use crate::error::{Error, Result};

/// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

const SOL_DECIMALS: usize = 9;

/// Parse a decimal SOL amount such as `"0.5"` into lamports
///
/// Parsing is exact: more than nine fractional digits is an error rather than
/// a rounding.
pub fn parse_sol(amount: &str) -> Result<u64> {
    let amount = amount.trim();
    let invalid = || Error::InvalidInput(format!("Invalid SOL amount: {:?}", amount));

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > SOL_DECIMALS {
        return Err(Error::InvalidInput(format!(
            "SOL amounts have at most {} decimal places",
            SOL_DECIMALS
        )));
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let fraction: u64 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = SOL_DECIMALS);
        padded.parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(LAMPORTS_PER_SOL)
        .and_then(|lamports| lamports.checked_add(fraction))
        .ok_or_else(invalid)
}

/// Render lamports as a SOL amount without trailing zeros
pub fn format_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let fraction = lamports % LAMPORTS_PER_SOL;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:09}", fraction);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sol() {
        assert_eq!(parse_sol("1").unwrap(), LAMPORTS_PER_SOL);
        assert_eq!(parse_sol("0.1").unwrap(), 100_000_000);
        assert_eq!(parse_sol(".5").unwrap(), 500_000_000);
        assert_eq!(parse_sol("2.").unwrap(), 2 * LAMPORTS_PER_SOL);
        assert_eq!(parse_sol("0.000000001").unwrap(), 1);
        assert_eq!(parse_sol(" 1.25 ").unwrap(), 1_250_000_000);
    }

    #[test]
    fn test_parse_sol_rejects_garbage() {
        let inputs = ["", ".", "-1", "1e3", "abc", "1.2.3", "0.0000000001", "99999999999999999999"];
        for input in inputs {
            assert!(parse_sol(input).is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_format_sol() {
        assert_eq!(format_sol(0), "0");
        assert_eq!(format_sol(LAMPORTS_PER_SOL), "1");
        assert_eq!(format_sol(1_500_000_000), "1.5");
        assert_eq!(format_sol(1), "0.000000001");
    }
}
