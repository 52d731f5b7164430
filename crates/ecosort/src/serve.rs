// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ecosort serve` command implementation.
//!
//! Wires the SQLite progress store, the vision classifier, and optional
//! Prometheus metrics into the scan service, then serves the HTTP API until
//! SIGINT or SIGTERM.

use std::sync::Arc;

use ecosort_config::EcosortConfig;
use ecosort_core::{EcosortError, PluginAdapter, ProgressStore};
use ecosort_gateway::{start_server, GatewayState, HealthState, ServerConfig};
use ecosort_scan::ScanService;
use ecosort_storage::SqliteProgressStore;
use ecosort_vision::VisionClassifier;
use tracing::{debug, info, warn};

use crate::shutdown;

type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

pub async fn run_serve(config: EcosortConfig) -> Result<(), EcosortError> {
    init_tracing(&config.service.log_level);

    info!("starting ecosort serve");

    let prometheus_render = init_metrics(&config);

    let store = Arc::new(SqliteProgressStore::new(config.storage.clone()));
    store.initialize().await?;

    let classifier = Arc::new(VisionClassifier::new(&config)?);
    let scans = Arc::new(ScanService::new(classifier.clone(), store.clone()));

    let cancel = shutdown::install_signal_handler();
    let state = GatewayState {
        scans,
        health: HealthState::new(prometheus_render),
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let served = start_server(&server_config, state, cancel).await;

    if let Err(e) = classifier.shutdown().await {
        warn!(error = %e, "classifier shutdown error");
    }
    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "storage shutdown error");
    }
    log_allocator_stats();

    served?;
    info!("ecosort serve shutdown complete");
    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics(config: &EcosortConfig) -> Option<MetricsRender> {
    if !config.metrics.enabled {
        debug!("prometheus metrics disabled by configuration");
        return None;
    }
    match ecosort_prometheus::PrometheusAdapter::new() {
        Ok(adapter) => {
            info!("prometheus metrics enabled");
            let adapter = Arc::new(adapter);
            Some(Arc::new(move || adapter.render()))
        }
        Err(e) => {
            warn!(error = %e, "prometheus initialization failed, continuing without metrics");
            None
        }
    }
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics(_config: &EcosortConfig) -> Option<MetricsRender> {
    debug!("prometheus support not compiled in");
    None
}

#[cfg(not(target_env = "msvc"))]
fn log_allocator_stats() {
    if tikv_jemalloc_ctl::epoch::advance().is_err() {
        return;
    }
    let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
    let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
    debug!(
        allocated_mb = allocated / (1024 * 1024),
        resident_mb = resident / (1024 * 1024),
        "allocator stats at shutdown"
    );
}

#[cfg(target_env = "msvc")]
fn log_allocator_stats() {}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the configured level.
///
/// Output goes to stderr so that one-shot commands keep stdout for JSON.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ecosort={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
