// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use frog_tips::error::TipError;
use serde_json::json;
use thiserror::Error;

use crate::network::ChainError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error(transparent)]
    Tip(#[from] TipError),
    #[error("Invalid request body: {0}")]
    BadRequest(String),
    #[error("Missing or invalid bearer token")]
    Unauthorized,
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Blob storage error: {0}")]
    Blob(#[from] opendal::Error),
    #[error("Chain API error: {0}")]
    Chain(#[from] ChainError),
}

impl NodeError {
    pub fn status(&self) -> StatusCode {
        match self {
            NodeError::Tip(TipError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            NodeError::Tip(TipError::NotFound | TipError::ReceiptNotFound) => StatusCode::NOT_FOUND,
            NodeError::Tip(TipError::ClaimInProgress) => StatusCode::SERVICE_UNAVAILABLE,
            NodeError::Tip(TipError::PayloadMismatch) => StatusCode::CONFLICT,
            NodeError::Tip(TipError::VerificationFailed(_)) => StatusCode::BAD_REQUEST,
            NodeError::Tip(TipError::VerificationUnavailable(_)) => StatusCode::BAD_REQUEST,
            NodeError::Chain(_) => StatusCode::BAD_REQUEST,
            NodeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            NodeError::Unauthorized => StatusCode::UNAUTHORIZED,
            NodeError::Tip(TipError::Internal(_)) | NodeError::Store(_) | NodeError::Blob(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message shown to clients. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            NodeError::Tip(TipError::VerificationUnavailable(_)) | NodeError::Chain(_) => {
                "tip tx verification failed: chain api unavailable".to_string()
            }
            NodeError::Tip(TipError::Internal(_)) | NodeError::Store(_) | NodeError::Blob(_) => {
                "internal error".to_string()
            }
            NodeError::Tip(e) => e.to_string(),
            NodeError::BadRequest(msg) => msg.clone(),
            NodeError::Unauthorized => "unauthorized".to_string(),
        }
    }
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(json!({
            "error": self.public_message()
        }));

        (status, body).into_response()
    }
}
