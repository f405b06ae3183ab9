// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::time::Duration;

use async_trait::async_trait;
use frog_tips::types::TxId;
use frog_tips::verify::ChainTx;
use reqwest::Client;

use super::{ChainError, TxSource};

/// Stacks blockchain API client (`/extended/v1/tx/{txid}`).
///
/// Every request is bounded by the client timeout. Nothing is retried here.
#[derive(Debug, Clone)]
pub struct HiroClient {
    base_url: String,
    client: Client,
}

impl HiroClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ChainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::Network(e.to_string()))?;
        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tx_url(&self, txid: &TxId) -> String {
        format!("{}/extended/v1/tx/{}", self.base_url, txid)
    }
}

fn classify(e: reqwest::Error) -> ChainError {
    if e.is_timeout() {
        ChainError::Timeout
    } else if e.is_decode() {
        ChainError::Decode(e.to_string())
    } else {
        ChainError::Network(e.to_string())
    }
}

#[async_trait]
impl TxSource for HiroClient {
    async fn fetch_tx(&self, txid: &TxId) -> Result<ChainTx, ChainError> {
        let url = self.tx_url(txid);
        tracing::debug!(%txid, "fetching transaction");

        let resp = self.client.get(&url).send().await.map_err(classify)?;

        if !resp.status().is_success() {
            tracing::warn!(%txid, status = resp.status().as_u16(), "chain api returned non-success");
            return Err(ChainError::Status(resp.status().as_u16()));
        }

        resp.json::<ChainTx>().await.map_err(classify)
    }
}
