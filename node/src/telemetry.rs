// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const TIP_CLAIMS: &str = "frog_tip_claims_total";
pub const TIP_VERIFICATION_SECONDS: &str = "frog_tip_verification_seconds";
pub const TIP_ROLLBACKS: &str = "frog_tip_rollbacks_total";
pub const POSTS_CREATED: &str = "frog_posts_created_total";
pub const SNAPSHOT_SIZE: &str = "frog_snapshot_size_bytes";

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() -> Result<(), BuildError> {
    // 1. Initialize Tracing (Logs)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "frog_tips_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Initialize Metrics (Prometheus)
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Store handle for /metrics endpoint
    if PROM_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
    }

    metrics::describe_counter!(TIP_CLAIMS, "Tip claims by outcome");
    metrics::describe_histogram!(TIP_VERIFICATION_SECONDS, "Time spent fetching and verifying a tip transaction");
    metrics::describe_counter!(TIP_ROLLBACKS, "Receipts removed after a failed totals increment");
    metrics::describe_counter!(POSTS_CREATED, "Posts stored for the first time");
    metrics::describe_gauge!(SNAPSHOT_SIZE, "Size of the last saved store snapshot in bytes");

    metrics::gauge!("frog_node_up", 1.0);
    Ok(())
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
