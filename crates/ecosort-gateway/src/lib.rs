// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API for EcoSort.
//!
//! Routes:
//! - `POST /v1/scans`
//! - `GET /v1/profiles/{user_id}`, `PUT /v1/profiles/{user_id}/display-name`
//! - `GET /v1/profiles/{user_id}/badges`, `GET /v1/profiles/{user_id}/scans`
//! - `GET /v1/badges`, `GET /v1/leaderboard`
//! - `GET /health`, `GET /metrics`

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState, HealthState, ServerConfig};
