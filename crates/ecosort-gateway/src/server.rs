// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use ecosort_core::EcosortError;
use ecosort_scan::ScanService;

use crate::handlers;

/// Largest accepted request body. Phone camera frames arrive base64-encoded.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Process-level state for `/health` and `/metrics`.
#[derive(Clone)]
pub struct HealthState {
    pub start_time: Instant,
    /// Renders the Prometheus exposition; `None` disables `/metrics`.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl HealthState {
    pub fn new(prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>) -> Self {
        Self {
            start_time: Instant::now(),
            prometheus_render,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub scans: Arc<ScanService>,
    pub health: HealthState,
}

/// Bind address for the gateway (mirrors `[server]` in the config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// All routes with CORS, tracing, and the body limit applied.
pub fn build_router(state: GatewayState) -> Router {
    let api = Router::new()
        .route("/v1/scans", post(handlers::post_scan))
        .route("/v1/profiles/{user_id}", get(handlers::get_profile))
        .route(
            "/v1/profiles/{user_id}/display-name",
            put(handlers::put_display_name),
        )
        .route(
            "/v1/profiles/{user_id}/badges",
            get(handlers::get_earned_badges),
        )
        .route(
            "/v1/profiles/{user_id}/scans",
            get(handlers::get_scan_history),
        )
        .route("/v1/badges", get(handlers::get_badge_catalog))
        .route("/v1/leaderboard", get(handlers::get_leaderboard));

    let public = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics));

    Router::new()
        .merge(api)
        .merge(public)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the gateway until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), EcosortError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| EcosortError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| EcosortError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
