// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use chrono::{TimeZone, Utc};

use crate::claim::TipClaim;
use crate::post::PostPayload;
use crate::receipt::{PostRecord, ReceiptStatus, TipReceipt};
use crate::types::{MicroStx, TipTotals, TxId};
use crate::verify::VerifiedTip;

fn claim(post_id: &str, amount: &str) -> TipClaim {
    TipClaim::parse(&"a".repeat(64), post_id, amount, &"b".repeat(64)).unwrap()
}

fn receipt_for(c: &TipClaim) -> TipReceipt {
    let verified = VerifiedTip {
        txid: c.txid.clone(),
        block_height: Some(9),
    };
    TipReceipt::new(c, &verified, Utc.timestamp_opt(1_700_000_000, 0).unwrap())
}

#[test]
fn test_receipt_matches_same_intent_only() {
    let original = claim("1", "100");
    let receipt = receipt_for(&original);
    assert!(receipt.matches(&original));
    assert!(!receipt.matches(&claim("2", "100")));
    assert!(!receipt.matches(&claim("1", "101")));

    let mut other_post = original.clone();
    other_post.content_hash = crate::types::ContentHash::parse(&"c".repeat(64)).unwrap();
    assert!(!receipt.matches(&other_post));
}

#[test]
fn test_receipt_row_shape() {
    let receipt = receipt_for(&claim("1", "100"));
    let row = serde_json::to_value(&receipt).unwrap();
    assert_eq!(row["txid"], "b".repeat(64));
    assert_eq!(row["post_id"], "1");
    assert_eq!(row["amount_micro_stx"], "100");
    assert_eq!(row["block_height"], 9);
    assert_eq!(row["status"], "pending");

    let back: TipReceipt = serde_json::from_value(row).unwrap();
    assert_eq!(back, receipt);
    assert_eq!(back.txid, TxId::parse(&"b".repeat(64)).unwrap());
}

#[test]
fn test_new_receipt_is_pending_and_legacy_rows_are_credited() {
    let receipt = receipt_for(&claim("1", "100"));
    assert_eq!(receipt.status, ReceiptStatus::Pending);
    assert!(!receipt.is_credited());

    let mut row = serde_json::to_value(&receipt).unwrap();
    row.as_object_mut().unwrap().remove("status");
    let legacy: TipReceipt = serde_json::from_value(row).unwrap();
    assert!(legacy.is_credited());
}

#[test]
fn test_post_row_accepts_numeric_columns() {
    let json = serde_json::json!({
        "content_hash": "a".repeat(64),
        "text": "ribbit",
        "links": [],
        "images": [],
        "total_tip_micro_stx": 250000,
        "tip_count": 3,
        "created_at": "2025-01-01T00:00:00Z"
    });
    let row: PostRecord = serde_json::from_value(json).unwrap();
    assert_eq!(row.totals, TipTotals { total: 250_000, count: 3 });
}

#[test]
fn test_new_post_starts_at_zero() {
    let post = PostPayload {
        text: "ribbit".into(),
        ..Default::default()
    }
    .normalize()
    .unwrap();
    let hash = post.content_hash();
    let row = PostRecord::new(post, Utc::now());
    assert_eq!(row.content_hash, hash);
    assert_eq!(row.totals, TipTotals::default());
}

#[test]
fn test_totals_credit() {
    let t = TipTotals { total: 10, count: 1 }.credited(MicroStx(5)).unwrap();
    assert_eq!(t, TipTotals { total: 15, count: 2 });
    assert!(TipTotals { total: u128::MAX, count: 0 }.credited(MicroStx(1)).is_none());
}
