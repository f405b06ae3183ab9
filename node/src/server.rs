// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use axum_extra::TypedHeader;
use frog_tips::post::PostPayload;
use frog_tips::types::{ContentHash, TxId};
use headers::authorization::Bearer;
use headers::Authorization;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::*;
use crate::blobs::PostArchive;
use crate::errors::NodeError;
use crate::ledger::TipLedger;
use crate::network::TxSource;
use crate::posts::PostService;
use crate::store::TipStore;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<TipLedger>,
    pub posts: Arc<PostService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TipStore>,
        chain: Arc<dyn TxSource>,
        archive: PostArchive,
        contract_id: &str,
        function_name: &str,
    ) -> Self {
        Self {
            ledger: Arc::new(TipLedger::new(store.clone(), chain, contract_id, function_name)),
            posts: Arc::new(PostService::new(store, archive)),
        }
    }
}

async fn auth_guard(
    State(token): State<Arc<crate::config::Secret>>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    req: Request,
    next: Next,
) -> Result<Response, NodeError> {
    match auth {
        Some(TypedHeader(Authorization(bearer))) if bearer.token() == token.expose() => {
            Ok(next.run(req).await)
        }
        _ => Err(NodeError::Unauthorized),
    }
}

pub fn build_router(state: AppState, auth_token: Option<crate::config::Secret>) -> Router {
    let mut delete_post_route = delete(delete_post);
    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required for post deletion");
        delete_post_route = delete_post_route.route_layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: No token configured, post deletion is open");
    }

    Router::new()
        .route("/tips", post(submit_tip))
        .route("/tips/:txid", get(get_tip))
        .route("/posts", post(submit_post))
        .route("/posts/:content_hash", get(get_post).merge(delete_post_route))
        // Observability
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Malformed bodies get the same `{error}` shape as every other failure.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, NodeError> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| NodeError::BadRequest(format!("invalid request body: {}", rejection.body_text())))
}

async fn submit_tip(
    State(state): State<AppState>,
    payload: Result<Json<TipClaimRequest>, JsonRejection>,
) -> Result<Json<TipClaimResponse>, NodeError> {
    let claim = body(payload)?.validate()?;
    let credit = state.ledger.claim(&claim).await?;
    Ok(Json(credit.into()))
}

async fn get_tip(
    State(state): State<AppState>,
    Path(txid): Path<String>,
) -> Result<Json<TipReceiptResponse>, NodeError> {
    let txid = TxId::parse(&txid)?;
    let receipt = state.ledger.receipt(&txid).await?;
    Ok(Json(receipt.into()))
}

async fn submit_post(
    State(state): State<AppState>,
    payload: Result<Json<PostPayload>, JsonRejection>,
) -> Result<Json<PostSubmitResponse>, NodeError> {
    let payload = body(payload)?;
    let submitted = state.posts.submit(&payload).await?;
    Ok(Json(submitted.into()))
}

async fn get_post(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<PostResponse>, NodeError> {
    let hash = ContentHash::parse(&hash)?;
    let record = state.posts.get(&hash).await?;
    Ok(Json(record.into()))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<OkResponse>, NodeError> {
    let hash = ContentHash::parse(&hash)?;
    state.posts.delete(&hash).await?;
    Ok(Json(OkResponse { ok: true }))
}

async fn health() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
