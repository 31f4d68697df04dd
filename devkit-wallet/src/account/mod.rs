//! Account management functionality
//!
//! Derived account records and address handling.

mod wallet;
pub mod address;

pub use wallet::*;
pub use address::{abbreviate_address, validate_address};
