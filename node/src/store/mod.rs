// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Content Store, Tip Receipt Ledger and Totals Aggregator.
//!
//! Implementations must make each call atomic on the store side. The
//! application never read-modify-writes totals and never takes locks of its
//! own; double-credit protection rests on the txid uniqueness constraint.

pub mod memory;
pub mod postgrest;

use async_trait::async_trait;
use frog_tips::receipt::{PostRecord, TipReceipt};
use frog_tips::types::{ContentHash, TipTotals, TxId};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A row with the same key already exists.
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("row not found")]
    NotFound,
    #[error("totals overflow")]
    Overflow,
    #[error("backend error: {0}")]
    Backend(String),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] crate::persistence::SnapshotError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Same content hash already present. Nothing was written.
    AlreadyExists,
}

#[async_trait]
pub trait TipStore: Send + Sync {
    async fn get_post(&self, hash: &ContentHash) -> Result<Option<PostRecord>, StoreError>;

    async fn insert_post(&self, post: &PostRecord) -> Result<InsertOutcome, StoreError>;

    /// Returns whether a row was removed.
    async fn delete_post(&self, hash: &ContentHash) -> Result<bool, StoreError>;

    async fn get_receipt(&self, txid: &TxId) -> Result<Option<TipReceipt>, StoreError>;

    /// Fails with [`StoreError::UniqueViolation`] if the txid is already recorded.
    async fn insert_receipt(&self, receipt: &TipReceipt) -> Result<(), StoreError>;

    async fn delete_receipt(&self, txid: &TxId) -> Result<(), StoreError>;

    /// Credits a pending receipt: adds its amount to the post's total and 1
    /// to its count, and marks the receipt credited, in one atomic step.
    /// Returns the totals as stored. Crediting an already credited receipt
    /// changes nothing. Unknown post or receipt is [`StoreError::NotFound`].
    async fn increment_tip_totals(&self, receipt: &TipReceipt) -> Result<TipTotals, StoreError>;
}
