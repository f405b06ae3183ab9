// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Typed identifiers and amounts. Every constructor validates, so a value of
//! one of these types is always canonical.

pub mod id;
pub mod scalar;

pub use id::{ContentHash, PostId, TxId};
pub use scalar::{MicroStx, TipTotals};

/// Lowercases `raw` and accepts it only if it is exactly 64 hex characters.
pub(crate) fn parse_hex_id(raw: &str) -> Option<String> {
    let lowered = raw.to_ascii_lowercase();
    let valid = lowered.len() == crate::config::HEX_ID_LEN
        && lowered.bytes().all(|b| b.is_ascii_hexdigit());
    valid.then_some(lowered)
}

/// Parses an unsigned decimal string. Signs, whitespace and empty input are rejected.
pub(crate) fn parse_decimal(raw: &str) -> Option<u128> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u128>().ok()
}

/// Same as [`parse_decimal`] but zero is rejected.
pub(crate) fn parse_positive(raw: &str) -> Option<u128> {
    parse_decimal(raw).filter(|v| *v > 0)
}
