// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Stored rows: tip receipts and posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::claim::TipClaim;
use crate::post::NormalizedPost;
use crate::types::{ContentHash, MicroStx, PostId, TipTotals, TxId};
use crate::verify::VerifiedTip;

/// Where a receipt is in the credit sequence. A receipt is written
/// `Pending` and flipped to `Credited` by the same store operation that
/// increments the post totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Pending,
    #[default]
    Credited,
}

/// Durable proof that a transaction has been credited. At most one per txid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipReceipt {
    pub txid: TxId,
    pub content_hash: ContentHash,
    pub post_id: PostId,
    #[serde(rename = "amount_micro_stx")]
    pub amount: MicroStx,
    #[serde(default)]
    pub block_height: Option<u64>,
    pub verified_at: DateTime<Utc>,
    /// Rows written before statuses existed were all credited.
    #[serde(default)]
    pub status: ReceiptStatus,
}

impl TipReceipt {
    pub fn new(claim: &TipClaim, verified: &VerifiedTip, verified_at: DateTime<Utc>) -> Self {
        Self {
            txid: claim.txid.clone(),
            content_hash: claim.content_hash.clone(),
            post_id: claim.post_id,
            amount: claim.amount,
            block_height: verified.block_height,
            verified_at,
            status: ReceiptStatus::Pending,
        }
    }

    pub fn is_credited(&self) -> bool {
        self.status == ReceiptStatus::Credited
    }

    /// Same tip intent: identical post, post id and amount.
    pub fn matches(&self, claim: &TipClaim) -> bool {
        self.content_hash == claim.content_hash
            && self.post_id == claim.post_id
            && self.amount == claim.amount
    }
}

/// A post row with its running totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub content_hash: ContentHash,
    pub text: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub totals: TipTotals,
    pub created_at: DateTime<Utc>,
}

impl PostRecord {
    pub fn new(post: NormalizedPost, created_at: DateTime<Utc>) -> Self {
        let content_hash = post.content_hash();
        Self {
            content_hash,
            text: post.text,
            links: post.links,
            images: post.images,
            totals: TipTotals::default(),
            created_at,
        }
    }
}
