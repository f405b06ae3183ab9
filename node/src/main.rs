// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;
use std::time::Duration;

use frog_tips_node::blobs::PostArchive;
use frog_tips_node::config::{NodeConfig, StoreBackend};
use frog_tips_node::network::HiroClient;
use frog_tips_node::server::{build_router, AppState};
use frog_tips_node::store::memory::MemoryStore;
use frog_tips_node::store::postgrest::PostgrestStore;
use frog_tips_node::store::TipStore;
use frog_tips_node::telemetry::init_telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_telemetry()?;

    let cfg = NodeConfig::from_env()?;
    tracing::info!("Initializing FROG tips node with config: {:?}", cfg);

    let (store, memory): (Arc<dyn TipStore>, Option<Arc<MemoryStore>>) = match &cfg.store {
        StoreBackend::Memory => {
            let mem = Arc::new(match &cfg.snapshot_path {
                Some(path) => MemoryStore::open(path)?,
                None => MemoryStore::new(),
            });
            (mem.clone() as Arc<dyn TipStore>, Some(mem))
        }
        StoreBackend::Postgrest { url, service_key } => {
            tracing::info!(%url, "using hosted store");
            (Arc::new(PostgrestStore::new(url, service_key.clone())?), None)
        }
    };

    let chain = Arc::new(HiroClient::new(
        &cfg.chain_api_url,
        Duration::from_secs(cfg.chain_timeout_secs),
    )?);
    let archive = PostArchive::from_config(&cfg.blob)?;
    let state = AppState::new(store, chain, archive, &cfg.tips_contract_id, &cfg.tip_function);

    // Spawn Persistence Task
    if let (Some(mem), Some(secs)) = (memory.clone(), cfg.auto_snapshot_interval_secs) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(secs));
            // First tick fires immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                tracing::debug!("Auto-snapshotting...");
                match mem.save_snapshot().await {
                    Ok(Some(bytes)) => tracing::info!(bytes, "snapshot saved"),
                    Ok(None) => {}
                    Err(e) => tracing::error!(error = %e, "snapshot failed"),
                }
            }
        });
    }

    let app = build_router(state, cfg.auth_token.clone());

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(mem) = memory {
        if let Some(bytes) = mem.save_snapshot().await? {
            tracing::info!(bytes, "final snapshot saved");
        }
    }
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
