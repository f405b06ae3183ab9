// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use chrono::{DateTime, Utc};
use frog_tips::claim::TipClaim;
use frog_tips::error::TipError;
use frog_tips::receipt::{PostRecord, ReceiptStatus, TipReceipt};
use serde::{Deserialize, Serialize};

use crate::ledger::Credit;
use crate::posts::Submitted;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Tip claim as sent by the client. Every field is a string and is validated
/// into a [`TipClaim`] before anything else runs.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TipClaimRequest {
    pub content_hash: String,
    pub post_id: String,
    pub amount_micro_stx: String,
    pub txid: String,
}

impl TipClaimRequest {
    pub fn validate(&self) -> Result<TipClaim, TipError> {
        TipClaim::parse(&self.content_hash, &self.post_id, &self.amount_micro_stx, &self.txid)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TipClaimResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub duplicate: bool,
    pub txid: String,
    pub content_hash: String,
    pub total_tip_micro_stx: String,
    pub tip_count: u64,
}

impl From<Credit> for TipClaimResponse {
    fn from(c: Credit) -> Self {
        Self {
            ok: true,
            duplicate: c.duplicate,
            txid: c.txid.into(),
            content_hash: c.content_hash.into(),
            total_tip_micro_stx: c.totals.total.to_string(),
            tip_count: c.totals.count,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TipReceiptResponse {
    pub txid: String,
    pub content_hash: String,
    pub post_id: String,
    pub amount_micro_stx: String,
    pub block_height: Option<u64>,
    pub verified_at: DateTime<Utc>,
    pub status: ReceiptStatus,
}

impl From<TipReceipt> for TipReceiptResponse {
    fn from(r: TipReceipt) -> Self {
        Self {
            txid: r.txid.into(),
            content_hash: r.content_hash.into(),
            post_id: r.post_id.to_string(),
            amount_micro_stx: r.amount.to_string(),
            block_height: r.block_height,
            verified_at: r.verified_at,
            status: r.status,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostSubmitResponse {
    pub ok: bool,
    pub content_hash: String,
    pub created: bool,
}

impl From<Submitted> for PostSubmitResponse {
    fn from(s: Submitted) -> Self {
        Self {
            ok: true,
            content_hash: s.content_hash.into(),
            created: s.created,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub content_hash: String,
    pub text: String,
    pub links: Vec<String>,
    pub images: Vec<String>,
    pub total_tip_micro_stx: String,
    pub tip_count: u64,
    pub created_at: DateTime<Utc>,
}

impl From<PostRecord> for PostResponse {
    fn from(p: PostRecord) -> Self {
        Self {
            content_hash: p.content_hash.into(),
            text: p.text,
            links: p.links,
            images: p.images,
            total_tip_micro_stx: p.totals.total.to_string(),
            tip_count: p.totals.count,
            created_at: p.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OkResponse {
    pub ok: bool,
}
