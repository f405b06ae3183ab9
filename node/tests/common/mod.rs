// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use frog_tips::clarity::FunctionArg;
use frog_tips::post::PostPayload;
use frog_tips::receipt::{PostRecord, TipReceipt};
use frog_tips::types::{ContentHash, TipTotals, TxId};
use frog_tips::verify::{ChainTx, ContractCall};
use frog_tips_node::blobs::PostArchive;
use frog_tips_node::config::Secret;
use frog_tips_node::network::{ChainError, TxSource};
use frog_tips_node::server::{build_router, AppState};
use frog_tips_node::store::{InsertOutcome, MemoryStore, StoreError, TipStore};
use serde_json::Value;
use tokio::sync::Barrier;
use tower::util::ServiceExt;

pub const CONTRACT: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.frog-tips";
pub const FUNCTION: &str = "tip-post";

pub fn hex64(c: char) -> String {
    c.to_string().repeat(64)
}

/// A successful `tip-post` call with the given uint arguments.
pub fn tip_tx(txid: &str, post_id: u128, amount: u128) -> ChainTx {
    let uint = |v: u128| FunctionArg {
        repr: Some(format!("u{}", v)),
        ..Default::default()
    };
    ChainTx {
        tx_id: Some(format!("0x{}", txid)),
        tx_status: "success".into(),
        tx_type: "contract_call".into(),
        contract_call: Some(ContractCall {
            contract_id: CONTRACT.into(),
            function_name: FUNCTION.into(),
            function_args: vec![uint(post_id), uint(amount)],
        }),
        block_height: Some(150_000),
    }
}

/// Chain API stand-in. Unknown txids answer 404.
#[derive(Default)]
pub struct MockChain {
    txs: HashMap<String, Result<ChainTx, ChainError>>,
    calls: AtomicUsize,
    barrier: Option<Barrier>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tx(mut self, txid: &str, tx: ChainTx) -> Self {
        self.txs.insert(txid.to_string(), Ok(tx));
        self
    }

    pub fn with_error(mut self, txid: &str, err: ChainError) -> Self {
        self.txs.insert(txid.to_string(), Err(err));
        self
    }

    /// Every fetch waits until `n` fetches are in flight.
    pub fn with_barrier(mut self, n: usize) -> Self {
        self.barrier = Some(Barrier::new(n));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TxSource for MockChain {
    async fn fetch_tx(&self, txid: &TxId) -> Result<ChainTx, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.txs
            .get(txid.as_str())
            .cloned()
            .unwrap_or(Err(ChainError::Status(404)))
    }
}

/// Memory store with switchable failures and a slow credit step.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_increment: AtomicBool,
    pub fail_delete_receipt: AtomicBool,
    pub fail_insert_receipt: AtomicBool,
    /// Milliseconds `increment_tip_totals` sleeps before doing anything.
    pub increment_delay_ms: AtomicU64,
}

impl FlakyStore {
    pub fn slow_increment(ms: u64) -> Self {
        let store = Self::default();
        store.increment_delay_ms.store(ms, Ordering::SeqCst);
        store
    }
}

#[async_trait]
impl TipStore for FlakyStore {
    async fn get_post(&self, hash: &ContentHash) -> Result<Option<PostRecord>, StoreError> {
        self.inner.get_post(hash).await
    }

    async fn insert_post(&self, post: &PostRecord) -> Result<InsertOutcome, StoreError> {
        self.inner.insert_post(post).await
    }

    async fn delete_post(&self, hash: &ContentHash) -> Result<bool, StoreError> {
        self.inner.delete_post(hash).await
    }

    async fn get_receipt(&self, txid: &TxId) -> Result<Option<TipReceipt>, StoreError> {
        self.inner.get_receipt(txid).await
    }

    async fn insert_receipt(&self, receipt: &TipReceipt) -> Result<(), StoreError> {
        if self.fail_insert_receipt.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection reset".into()));
        }
        self.inner.insert_receipt(receipt).await
    }

    async fn delete_receipt(&self, txid: &TxId) -> Result<(), StoreError> {
        if self.fail_delete_receipt.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection reset".into()));
        }
        self.inner.delete_receipt(txid).await
    }

    async fn increment_tip_totals(&self, receipt: &TipReceipt) -> Result<TipTotals, StoreError> {
        let delay = self.increment_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_increment.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("statement timeout".into()));
        }
        self.inner.increment_tip_totals(receipt).await
    }
}

pub async fn seed_post(store: &dyn TipStore, text: &str) -> ContentHash {
    let normalized = PostPayload {
        text: text.into(),
        ..Default::default()
    }
    .normalize()
    .unwrap();
    let record = PostRecord::new(normalized, Utc::now());
    store.insert_post(&record).await.unwrap();
    record.content_hash
}

pub fn app(store: Arc<dyn TipStore>, chain: Arc<dyn TxSource>, token: Option<&str>) -> Router {
    app_with_archive(store, chain, PostArchive::memory().unwrap(), token)
}

pub fn app_with_archive(
    store: Arc<dyn TipStore>,
    chain: Arc<dyn TxSource>,
    archive: PostArchive,
    token: Option<&str>,
) -> Router {
    let state = AppState::new(store, chain, archive, CONTRACT, FUNCTION);
    build_router(state, token.map(|t| Secret(t.to_string())))
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}
