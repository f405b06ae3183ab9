// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Tip claim normalization.

use crate::error::TipResult;
use crate::types::{ContentHash, MicroStx, PostId, TxId};

/// A validated tip claim: "transaction `txid` tipped `amount` to on-chain post
/// `post_id`, whose content is `content_hash`".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TipClaim {
    pub content_hash: ContentHash,
    pub post_id: PostId,
    pub amount: MicroStx,
    pub txid: TxId,
}

impl TipClaim {
    /// Validates raw request fields in order and reports the first bad one.
    pub fn parse(content_hash: &str, post_id: &str, amount: &str, txid: &str) -> TipResult<Self> {
        Ok(Self {
            content_hash: ContentHash::parse(content_hash)?,
            post_id: PostId::parse(post_id)?,
            amount: MicroStx::parse(amount)?,
            txid: TxId::parse(txid)?,
        })
    }
}
