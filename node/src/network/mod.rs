// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Chain API access.

pub mod client;

use async_trait::async_trait;
use frog_tips::types::TxId;
use frog_tips::verify::ChainTx;
use thiserror::Error;

pub use client::HiroClient;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed transaction record: {0}")]
    Decode(String),
}

/// Source of transaction records, keyed by txid.
#[async_trait]
pub trait TxSource: Send + Sync {
    async fn fetch_tx(&self, txid: &TxId) -> Result<ChainTx, ChainError>;
}
