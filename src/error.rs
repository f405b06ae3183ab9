// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

/// Failure taxonomy for a tip claim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TipError {
    /// Malformed request field. Never reaches storage.
    #[error("{0}")]
    InvalidInput(String),
    /// Unknown content hash.
    #[error("post not found")]
    NotFound,
    /// No receipt recorded for the txid.
    #[error("receipt not found")]
    ReceiptNotFound,
    /// Another claim for the same txid holds a receipt that is not credited yet.
    #[error("tip claim for this txid is still being processed")]
    ClaimInProgress,
    /// Transaction id already claimed with a different intent.
    #[error("txid already claimed with a different payload")]
    PayloadMismatch,
    /// The transaction exists but does not prove the claimed tip.
    #[error("tip tx verification failed: {0}")]
    VerificationFailed(Rejection),
    /// The chain API could not be queried. Callers may retry.
    #[error("tip tx verification unavailable: {0}")]
    VerificationUnavailable(String),
    /// Storage failure or failed compensation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TipError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        TipError::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        TipError::Internal(msg.into())
    }

    /// True for outcomes a caller may retry with the same txid.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TipError::VerificationUnavailable(_) | TipError::ClaimInProgress | TipError::Internal(_)
        )
    }
}

impl From<Rejection> for TipError {
    fn from(r: Rejection) -> Self {
        TipError::VerificationFailed(r)
    }
}

/// Why a fetched transaction does not satisfy a tip claim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("tx not successful (status: {status})")]
    NotSuccessful { status: String },
    #[error("wrong tx type (expected contract_call, got {tx_type})")]
    WrongTxType { tx_type: String },
    #[error("contract mismatch (expected {expected}, got {got})")]
    ContractMismatch { expected: String, got: String },
    #[error("function mismatch (expected {expected}, got {got})")]
    FunctionMismatch { expected: String, got: String },
    #[error("postId mismatch (expected {expected}, got {})", display_arg(.got))]
    PostIdMismatch { expected: u128, got: Option<u128> },
    #[error("amount mismatch (expected {expected}, got {})", display_arg(.got))]
    AmountMismatch { expected: u128, got: Option<u128> },
}

fn display_arg(got: &Option<u128>) -> String {
    match got {
        Some(v) => v.to_string(),
        None => "none".to_string(),
    }
}

pub type TipResult<T> = core::result::Result<T, TipError>;
