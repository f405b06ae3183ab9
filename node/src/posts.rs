// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use chrono::Utc;
use frog_tips::error::TipError;
use frog_tips::post::PostPayload;
use frog_tips::receipt::PostRecord;
use frog_tips::types::ContentHash;

use crate::blobs::PostArchive;
use crate::errors::NodeError;
use crate::store::{InsertOutcome, TipStore};
use crate::telemetry::POSTS_CREATED;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub content_hash: ContentHash,
    /// False when an identical post already existed.
    pub created: bool,
}

pub struct PostService {
    store: Arc<dyn TipStore>,
    archive: PostArchive,
}

impl PostService {
    pub fn new(store: Arc<dyn TipStore>, archive: PostArchive) -> Self {
        Self { store, archive }
    }

    /// Normalizes and stores a post. The payload is archived before the row
    /// is inserted, so a row never points at a missing archive.
    pub async fn submit(&self, payload: &PostPayload) -> Result<Submitted, NodeError> {
        let normalized = payload.normalize()?;
        let record = PostRecord::new(normalized.clone(), Utc::now());
        let hash = record.content_hash.clone();

        if self.store.get_post(&hash).await?.is_some() {
            tracing::debug!(content_hash = %hash, "post already stored");
            return Ok(Submitted { content_hash: hash, created: false });
        }

        self.archive.put(&hash, &normalized).await?;

        let created = match self.store.insert_post(&record).await? {
            InsertOutcome::Inserted => {
                metrics::increment_counter!(POSTS_CREATED);
                tracing::info!(content_hash = %hash, "post created");
                true
            }
            InsertOutcome::AlreadyExists => false,
        };

        Ok(Submitted { content_hash: hash, created })
    }

    pub async fn get(&self, hash: &ContentHash) -> Result<PostRecord, NodeError> {
        self.store
            .get_post(hash)
            .await?
            .ok_or(NodeError::Tip(TipError::NotFound))
    }

    /// Removes the row, then the archived payload. Receipts are kept.
    pub async fn delete(&self, hash: &ContentHash) -> Result<(), NodeError> {
        if !self.store.delete_post(hash).await? {
            return Err(TipError::NotFound.into());
        }
        if let Err(e) = self.archive.delete(hash).await {
            tracing::warn!(content_hash = %hash, error = %e, "post row deleted but archive removal failed");
        }
        tracing::info!(content_hash = %hash, "post deleted");
        Ok(())
    }
}
