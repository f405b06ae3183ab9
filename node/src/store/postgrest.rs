// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Hosted Postgres reached through its REST gateway (`/rest/v1`).
//!
//! Expected schema: `posts` keyed by `content_hash`, `tip_receipts` with a
//! unique `txid` and a `status` column (`pending` | `credited`, default
//! `credited`), and a SQL function `increment_post_tip_totals(p_txid,
//! p_content_hash, p_amount_micro_stx)` that, in one transaction, flips a
//! pending receipt to `credited`, updates both counters, and returns
//! `total_tip_micro_stx, tip_count`. For an already credited receipt it
//! returns the current totals unchanged.

use std::time::Duration;

use async_trait::async_trait;
use frog_tips::receipt::{PostRecord, TipReceipt};
use frog_tips::types::{ContentHash, TipTotals, TxId};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{InsertOutcome, StoreError, TipStore};
use crate::config::Secret;

pub const POSTS_TABLE: &str = "posts";
pub const RECEIPTS_TABLE: &str = "tip_receipts";
pub const INCREMENT_RPC: &str = "rpc/increment_post_tip_totals";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Deserialize)]
struct GatewayError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct PostgrestStore {
    rest_url: String,
    service_key: Secret,
    client: Client,
}

impl PostgrestStore {
    pub fn new(project_url: &str, service_key: Secret) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self {
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            service_key,
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_url, path))
            .header("apikey", self.service_key.expose())
            .bearer_auth(self.service_key.expose())
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let parsed: Option<GatewayError> = serde_json::from_str(&body).ok();
        let code = parsed.as_ref().and_then(|e| e.code.as_deref());
        if status == StatusCode::CONFLICT || code == Some(PG_UNIQUE_VIOLATION) {
            return Err(StoreError::UniqueViolation);
        }

        let message = parsed
            .and_then(|e| e.message)
            .unwrap_or(body);
        Err(StoreError::Backend(format!("{}: {}", status.as_u16(), message)))
    }

    async fn rows<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Vec<T>, StoreError> {
        self.send(builder)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// The increment function may come back as a row, a one-row set, or null.
fn totals_from_rpc(value: Value) -> Result<TipTotals, StoreError> {
    let row = match value {
        Value::Array(rows) => rows.into_iter().next().ok_or(StoreError::NotFound)?,
        obj @ Value::Object(_) => obj,
        _ => return Err(StoreError::NotFound),
    };
    if row.get("total_tip_micro_stx").map_or(true, Value::is_null) {
        return Err(StoreError::NotFound);
    }
    serde_json::from_value(row).map_err(|e| StoreError::Backend(format!("bad increment result: {}", e)))
}

#[async_trait]
impl TipStore for PostgrestStore {
    async fn get_post(&self, hash: &ContentHash) -> Result<Option<PostRecord>, StoreError> {
        let req = self
            .request(Method::GET, POSTS_TABLE)
            .query(&[("content_hash", eq(hash)), ("select", "*".to_string()), ("limit", "1".to_string())]);
        Ok(self.rows::<PostRecord>(req).await?.into_iter().next())
    }

    async fn insert_post(&self, post: &PostRecord) -> Result<InsertOutcome, StoreError> {
        let req = self
            .request(Method::POST, POSTS_TABLE)
            .query(&[("on_conflict", "content_hash")])
            .header("Prefer", "resolution=ignore-duplicates,return=representation")
            .json(post);
        let inserted: Vec<Value> = self.rows(req).await?;
        Ok(if inserted.is_empty() {
            InsertOutcome::AlreadyExists
        } else {
            InsertOutcome::Inserted
        })
    }

    async fn delete_post(&self, hash: &ContentHash) -> Result<bool, StoreError> {
        let req = self
            .request(Method::DELETE, POSTS_TABLE)
            .query(&[("content_hash", eq(hash))])
            .header("Prefer", "return=representation");
        let removed: Vec<Value> = self.rows(req).await?;
        Ok(!removed.is_empty())
    }

    async fn get_receipt(&self, txid: &TxId) -> Result<Option<TipReceipt>, StoreError> {
        let req = self
            .request(Method::GET, RECEIPTS_TABLE)
            .query(&[("txid", eq(txid)), ("select", "*".to_string()), ("limit", "1".to_string())]);
        Ok(self.rows::<TipReceipt>(req).await?.into_iter().next())
    }

    async fn insert_receipt(&self, receipt: &TipReceipt) -> Result<(), StoreError> {
        let req = self
            .request(Method::POST, RECEIPTS_TABLE)
            .header("Prefer", "return=minimal")
            .json(receipt);
        self.send(req).await?;
        Ok(())
    }

    async fn delete_receipt(&self, txid: &TxId) -> Result<(), StoreError> {
        let req = self
            .request(Method::DELETE, RECEIPTS_TABLE)
            .query(&[("txid", eq(txid))]);
        self.send(req).await?;
        Ok(())
    }

    async fn increment_tip_totals(&self, receipt: &TipReceipt) -> Result<TipTotals, StoreError> {
        let req = self.request(Method::POST, INCREMENT_RPC).json(&json!({
            "p_txid": receipt.txid,
            "p_content_hash": receipt.content_hash,
            "p_amount_micro_stx": receipt.amount,
        }));
        let value: Value = self
            .send(req)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        totals_from_rpc(value)
    }
}
