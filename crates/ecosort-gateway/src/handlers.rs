// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use ecosort_core::{
    Badge, EarnedBadge, HealthStatus, LeaderboardEntry, PluginAdapter, Profile, ScanHistoryEntry,
    UserId,
};
use ecosort_scan::context::CancelOnDrop;
use ecosort_scan::{
    effective_limit, ScanContext, ScanOutcome, ScanRequest, DEFAULT_HISTORY_LIMIT,
    DEFAULT_LEADERBOARD_LIMIT,
};

use crate::error::ApiError;
use crate::server::GatewayState;

/// `?limit=` on listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Body of `PUT /v1/profiles/{user_id}/display-name`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNameRequest {
    pub display_name: String,
}

/// A profile with the derived level progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub points_to_next_level: u32,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let points_to_next_level = profile.points_to_next_level();
        Self {
            profile,
            points_to_next_level,
        }
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// POST /v1/scans
///
/// The scan is cancelled if the client disconnects before it completes.
pub async fn post_scan(
    State(state): State<GatewayState>,
    body: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ScanOutcome>, ApiError> {
    let Json(request) = body.map_err(bad_json)?;
    let cancel = CancellationToken::new();
    let _guard = CancelOnDrop(cancel.clone());
    let ctx = ScanContext::new(cancel);

    state
        .scans
        .submit(&ctx, request)
        .await
        .map(Json)
        .map_err(ApiError::from_scan)
}

/// GET /v1/profiles/{user_id}
pub async fn get_profile(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user_id = UserId(user_id);
    match state.scans.profile(&user_id).await {
        Ok(Some(profile)) => Ok(Json(profile.into())),
        Ok(None) => Err(ApiError::not_found(format!("No profile for user {user_id}"))),
        Err(e) => Err(ApiError::from_query(e)),
    }
}

/// PUT /v1/profiles/{user_id}/display-name
pub async fn put_display_name(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
    body: Result<Json<DisplayNameRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(body) = body.map_err(bad_json)?;
    state
        .scans
        .set_display_name(&UserId(user_id), &body.display_name)
        .await
        .map(|profile| Json(profile.into()))
        .map_err(ApiError::from_query)
}

/// GET /v1/profiles/{user_id}/badges
pub async fn get_earned_badges(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<EarnedBadge>>, ApiError> {
    state
        .scans
        .earned_badges(&UserId(user_id))
        .await
        .map(Json)
        .map_err(ApiError::from_query)
}

/// GET /v1/profiles/{user_id}/scans?limit=
pub async fn get_scan_history(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ScanHistoryEntry>>, ApiError> {
    let limit = effective_limit(query.limit, DEFAULT_HISTORY_LIMIT);
    state
        .scans
        .history(&UserId(user_id), limit)
        .await
        .map(Json)
        .map_err(ApiError::from_query)
}

/// GET /v1/badges
pub async fn get_badge_catalog(
    State(state): State<GatewayState>,
) -> Result<Json<Vec<Badge>>, ApiError> {
    state
        .scans
        .badge_catalog()
        .await
        .map(Json)
        .map_err(ApiError::from_query)
}

/// GET /v1/leaderboard?limit=
pub async fn get_leaderboard(
    State(state): State<GatewayState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let limit = effective_limit(query.limit, DEFAULT_LEADERBOARD_LIMIT);
    state
        .scans
        .leaderboard(limit)
        .await
        .map(Json)
        .map_err(ApiError::from_query)
}

/// GET /health
///
/// 200 while the store is healthy or degraded, 503 otherwise.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let (code, status, detail) = match state.scans.store().health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "ok", None),
        Ok(HealthStatus::Degraded(reason)) => (StatusCode::OK, "degraded", Some(reason)),
        Ok(HealthStatus::Unhealthy(reason)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(reason))
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "unhealthy",
            Some(e.to_string()),
        ),
    };
    let body = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        detail,
    };
    (code, Json(body)).into_response()
}

/// GET /metrics
///
/// Prometheus text exposition, or 404 when metrics are disabled.
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => ApiError::not_found("metrics disabled").into_response(),
    }
}
