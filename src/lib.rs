// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! frog-tips: tip-claim validation, content hashing and on-chain tip verification.
//!
//! Everything in this crate is pure. Fetching transactions and touching storage
//! belongs to `frog-tips-node`.

pub mod config;
pub mod error;
pub mod types;
pub mod claim;
pub mod post;
pub mod clarity;
pub mod verify;
pub mod receipt;

pub use claim::TipClaim;
pub use error::{Rejection, TipError, TipResult};
pub use types::{ContentHash, MicroStx, PostId, TipTotals, TxId};

#[cfg(test)]
pub mod tests;
