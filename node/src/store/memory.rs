// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use frog_tips::receipt::{PostRecord, ReceiptStatus, TipReceipt};
use frog_tips::types::{ContentHash, TipTotals, TxId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{InsertOutcome, StoreError, TipStore};
use crate::persistence::{SnapshotManager, SnapshotMeta, SCHEMA_VERSION};

#[derive(Default, Serialize, Deserialize)]
struct Tables {
    posts: BTreeMap<ContentHash, PostRecord>,
    receipts: BTreeMap<TxId, TipReceipt>,
}

/// Both tables behind one lock. Every trait call is one critical section,
/// which is what makes insert-unique and increment atomic here.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    snapshot_path: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            snapshot_path: None,
        }
    }

    /// Store backed by a snapshot file, restored now if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let tables = if path.exists() {
            let (meta, body) = SnapshotManager::load(&path)?;
            let tables: Tables = serde_json::from_slice(&body)
                .map_err(crate::persistence::SnapshotError::from)?;
            tracing::info!(
                path = %path.display(),
                posts = meta.post_count,
                receipts = meta.receipt_count,
                "store snapshot restored"
            );
            tables
        } else {
            tracing::info!(path = %path.display(), "no snapshot found, starting empty");
            Tables::default()
        };
        Ok(Self {
            tables: RwLock::new(tables),
            snapshot_path: Some(path),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Writes both tables to the snapshot file. `None` when no path is configured.
    pub async fn save_snapshot(&self) -> Result<Option<u64>, StoreError> {
        let Some(path) = self.snapshot_path.as_deref() else {
            return Ok(None);
        };

        // Serialize under the read lock so posts and receipts are captured together.
        let (body, mut meta) = {
            let tables = self.tables.read().await;
            let body = serde_json::to_vec(&*tables).map_err(crate::persistence::SnapshotError::from)?;
            let meta = SnapshotMeta {
                version: SCHEMA_VERSION,
                timestamp: chrono::Utc::now().timestamp(),
                post_count: tables.posts.len() as u64,
                receipt_count: tables.receipts.len() as u64,
                body_len: 0,
            };
            (body, meta)
        };

        let size = SnapshotManager::save(path, &mut meta, &body)?;
        metrics::gauge!(crate::telemetry::SNAPSHOT_SIZE, size as f64);
        Ok(Some(size))
    }

    pub async fn counts(&self) -> (usize, usize) {
        let tables = self.tables.read().await;
        (tables.posts.len(), tables.receipts.len())
    }
}

#[async_trait]
impl TipStore for MemoryStore {
    async fn get_post(&self, hash: &ContentHash) -> Result<Option<PostRecord>, StoreError> {
        Ok(self.tables.read().await.posts.get(hash).cloned())
    }

    async fn insert_post(&self, post: &PostRecord) -> Result<InsertOutcome, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.content_hash) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        tables.posts.insert(post.content_hash.clone(), post.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn delete_post(&self, hash: &ContentHash) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.posts.remove(hash).is_some())
    }

    async fn get_receipt(&self, txid: &TxId) -> Result<Option<TipReceipt>, StoreError> {
        Ok(self.tables.read().await.receipts.get(txid).cloned())
    }

    async fn insert_receipt(&self, receipt: &TipReceipt) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.receipts.contains_key(&receipt.txid) {
            return Err(StoreError::UniqueViolation);
        }
        tables.receipts.insert(receipt.txid.clone(), receipt.clone());
        Ok(())
    }

    async fn delete_receipt(&self, txid: &TxId) -> Result<(), StoreError> {
        self.tables.write().await.receipts.remove(txid);
        Ok(())
    }

    async fn increment_tip_totals(&self, credit: &TipReceipt) -> Result<TipTotals, StoreError> {
        let mut guard = self.tables.write().await;
        let Tables { posts, receipts } = &mut *guard;
        let receipt = receipts.get_mut(&credit.txid).ok_or(StoreError::NotFound)?;
        let post = posts.get_mut(&credit.content_hash).ok_or(StoreError::NotFound)?;
        if receipt.is_credited() {
            return Ok(post.totals);
        }
        post.totals = post.totals.credited(credit.amount).ok_or(StoreError::Overflow)?;
        receipt.status = ReceiptStatus::Credited;
        Ok(post.totals)
    }
}
