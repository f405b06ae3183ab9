// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::*;
use frog_tips::types::{ContentHash, TxId};
use frog_tips_node::network::ChainError;
use frog_tips_node::store::{MemoryStore, TipStore};
use serde_json::json;

fn claim(hash: &ContentHash, post_id: &str, amount: &str, txid: &str) -> serde_json::Value {
    json!({
        "contentHash": hash.as_str(),
        "postId": post_id,
        "amountMicroStx": amount,
        "txid": txid,
    })
}

#[tokio::test]
async fn test_valid_claim_is_credited_once() {
    let store = Arc::new(MemoryStore::new());
    let hash = seed_post(store.as_ref(), "ribbit").await;
    let txid = hex64('a');
    let chain = Arc::new(MockChain::new().with_tx(&txid, tip_tx(&txid, 1, 100_000)));
    let app = app(store.clone(), chain.clone(), None);

    let (status, body) = send(&app, json_request("POST", "/tips", &claim(&hash, "1", "100000", &txid))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert!(body.get("duplicate").is_none());
    assert_eq!(body["txid"], txid);
    assert_eq!(body["contentHash"], hash.as_str());
    assert_eq!(body["totalTipMicroStx"], "100000");
    assert_eq!(body["tipCount"], 1);

    // Replay: same intent is a duplicate, nothing is added.
    let (status, body) = send(&app, json_request("POST", "/tips", &claim(&hash, "1", "100000", &txid))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duplicate"], true);
    assert_eq!(body["totalTipMicroStx"], "100000");
    assert_eq!(body["tipCount"], 1);

    assert_eq!(chain.calls(), 1, "replay must not hit the chain api");
    let post = store.get_post(&hash).await.unwrap().unwrap();
    assert_eq!(post.totals.total, 100_000);
    assert_eq!(post.totals.count, 1);
}

#[tokio::test]
async fn test_uppercase_and_leading_zero_claim_is_the_same_intent() {
    let store = Arc::new(MemoryStore::new());
    let hash = seed_post(store.as_ref(), "ribbit").await;
    let txid = hex64('a');
    let chain = Arc::new(MockChain::new().with_tx(&txid, tip_tx(&txid, 1, 100_000)));
    let app = app(store.clone(), chain, None);

    let (status, _) = send(&app, json_request("POST", "/tips", &claim(&hash, "1", "100000", &txid))).await;
    assert_eq!(status, StatusCode::OK);

    let upper = json!({
        "contentHash": hash.as_str().to_uppercase(),
        "postId": "01",
        "amountMicroStx": "100000",
        "txid": txid.to_uppercase(),
    });
    let (status, body) = send(&app, json_request("POST", "/tips", &upper)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duplicate"], true);
    assert_eq!(body["txid"], txid);
}

#[tokio::test]
async fn test_reused_txid_with_different_amount_conflicts() {
    let store = Arc::new(MemoryStore::new());
    let hash = seed_post(store.as_ref(), "ribbit").await;
    let txid = hex64('a');
    let chain = Arc::new(MockChain::new().with_tx(&txid, tip_tx(&txid, 1, 100_000)));
    let app = app(store.clone(), chain, None);

    send(&app, json_request("POST", "/tips", &claim(&hash, "1", "100000", &txid))).await;
    let (status, body) = send(&app, json_request("POST", "/tips", &claim(&hash, "1", "200000", &txid))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "txid already claimed with a different payload");

    let post = store.get_post(&hash).await.unwrap().unwrap();
    assert_eq!(post.totals.total, 100_000);
    assert_eq!(post.totals.count, 1);
}

#[tokio::test]
async fn test_reused_txid_against_another_post_conflicts() {
    let store = Arc::new(MemoryStore::new());
    let first = seed_post(store.as_ref(), "ribbit").await;
    let second = seed_post(store.as_ref(), "croak").await;
    let txid = hex64('a');
    let chain = Arc::new(MockChain::new().with_tx(&txid, tip_tx(&txid, 1, 100_000)));
    let app = app(store.clone(), chain, None);

    send(&app, json_request("POST", "/tips", &claim(&first, "1", "100000", &txid))).await;
    let (status, _) = send(&app, json_request("POST", "/tips", &claim(&second, "1", "100000", &txid))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let untouched = store.get_post(&second).await.unwrap().unwrap();
    assert_eq!(untouched.totals.count, 0);
}

#[tokio::test]
async fn test_post_id_mismatch_is_rejected_with_reason() {
    let store = Arc::new(MemoryStore::new());
    let hash = seed_post(store.as_ref(), "ribbit").await;
    let txid = hex64('a');
    let chain = Arc::new(MockChain::new().with_tx(&txid, tip_tx(&txid, 1, 100_000)));
    let app = app(store.clone(), chain, None);

    let (status, body) = send(&app, json_request("POST", "/tips", &claim(&hash, "2", "100000", &txid))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tip tx verification failed: postId mismatch (expected 2, got 1)");

    let txid = TxId::parse(&txid).unwrap();
    assert!(store.get_receipt(&txid).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_tx_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let hash = seed_post(store.as_ref(), "ribbit").await;
    let txid = hex64('a');
    let mut tx = tip_tx(&txid, 1, 100_000);
    tx.tx_status = "abort_by_response".into();
    let chain = Arc::new(MockChain::new().with_tx(&txid, tx));
    let app = app(store, chain, None);

    let (status, body) = send(&app, json_request("POST", "/tips", &claim(&hash, "1", "100000", &txid))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tip tx verification failed: tx not successful (status: abort_by_response)");
}

#[tokio::test]
async fn test_unknown_post_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let txid = hex64('a');
    let chain = Arc::new(MockChain::new().with_tx(&txid, tip_tx(&txid, 1, 100_000)));
    let app = app(store, chain.clone(), None);

    let hash = ContentHash::parse(&hex64('c')).unwrap();
    let (status, body) = send(&app, json_request("POST", "/tips", &claim(&hash, "1", "100000", &txid))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "post not found");
    assert_eq!(chain.calls(), 0);
}

#[tokio::test]
async fn test_invalid_fields_never_reach_the_chain() {
    let store = Arc::new(MemoryStore::new());
    let hash = seed_post(store.as_ref(), "ribbit").await;
    let chain = Arc::new(MockChain::new());
    let app = app(store, chain.clone(), None);

    let cases = [
        (claim(&hash, "1", "100000", "xyz"), "invalid txid"),
        (claim(&hash, "0", "100000", &hex64('a')), "invalid postId"),
        (claim(&hash, "1", "0", &hex64('a')), "invalid amountMicroStx"),
        (claim(&hash, "1", "-5", &hex64('a')), "invalid amountMicroStx"),
        (
            json!({"contentHash": "abc", "postId": "1", "amountMicroStx": "1", "txid": hex64('a')}),
            "invalid contentHash",
        ),
    ];
    for (body, message) in cases {
        let (status, resp) = send(&app, json_request("POST", "/tips", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", message);
        assert_eq!(resp["error"], message);
    }
    assert_eq!(chain.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_a_json_400() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store, Arc::new(MockChain::new()), None);

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/tips")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));

    let (status, body) = send(&app, json_request("POST", "/tips", &json!({"txid": hex64('a')}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_chain_outage_is_reported_and_retryable() {
    let store = Arc::new(MemoryStore::new());
    let hash = seed_post(store.as_ref(), "ribbit").await;
    let txid = hex64('a');
    let chain = Arc::new(MockChain::new().with_error(&txid, ChainError::Timeout));
    let app = app(store.clone(), chain, None);

    let (status, body) = send(&app, json_request("POST", "/tips", &claim(&hash, "1", "100000", &txid))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tip tx verification failed: chain api unavailable");
    assert!(store.get_receipt(&TxId::parse(&txid).unwrap()).await.unwrap().is_none());

    // Chain recovers: the same txid goes through.
    let chain = Arc::new(MockChain::new().with_tx(&txid, tip_tx(&txid, 1, 100_000)));
    let app = common::app(store, chain, None);
    let (status, body) = send(&app, json_request("POST", "/tips", &claim(&hash, "1", "100000", &txid))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tipCount"], 1);
}

#[tokio::test]
async fn test_receipt_lookup() {
    let store = Arc::new(MemoryStore::new());
    let hash = seed_post(store.as_ref(), "ribbit").await;
    let txid = hex64('a');
    let chain = Arc::new(MockChain::new().with_tx(&txid, tip_tx(&txid, 7, 2_500)));
    let app = app(store, chain, None);

    let (status, body) = send(&app, empty_request("GET", &format!("/tips/{}", txid))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "receipt not found");

    send(&app, json_request("POST", "/tips", &claim(&hash, "7", "2500", &txid))).await;

    let (status, body) = send(&app, empty_request("GET", &format!("/tips/{}", txid))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["txid"], txid);
    assert_eq!(body["contentHash"], hash.as_str());
    assert_eq!(body["postId"], "7");
    assert_eq!(body["amountMicroStx"], "2500");
    assert_eq!(body["blockHeight"], 150_000);
    assert!(body["verifiedAt"].is_string());
    assert_eq!(body["status"], "credited");

    let (status, _) = send(&app, empty_request("GET", "/tips/nothex")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_uncredited_receipt_reports_in_progress() {
    let store = Arc::new(MemoryStore::new());
    let hash = seed_post(store.as_ref(), "ribbit").await;
    let txid = hex64('a');
    let chain = Arc::new(MockChain::new().with_tx(&txid, tip_tx(&txid, 1, 100_000)));
    let app = app(store.clone(), chain, None);

    let claim_req = claim(&hash, "1", "100000", &txid);
    let parsed = frog_tips::claim::TipClaim::parse(hash.as_str(), "1", "100000", &txid).unwrap();
    let pending = frog_tips::receipt::TipReceipt::new(
        &parsed,
        &frog_tips::verify::VerifiedTip {
            txid: parsed.txid.clone(),
            block_height: None,
        },
        chrono::Utc::now(),
    );
    store.insert_receipt(&pending).await.unwrap();

    let (status, body) = send(&app, json_request("POST", "/tips", &claim_req)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "tip claim for this txid is still being processed");

    let (status, body) = send(&app, empty_request("GET", &format!("/tips/{}", txid))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
}
