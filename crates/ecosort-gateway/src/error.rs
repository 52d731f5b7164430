// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of [`EcosortError`] onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use ecosort_core::EcosortError;

/// Shown for any scan failure that is not the caller's to fix.
pub const SCAN_FAILED_MESSAGE: &str = "Failed to analyze image";

/// Shown when a progress query fails on the server side.
pub const QUERY_FAILED_MESSAGE: &str = "Failed to load progress";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error already mapped to a status and a user-facing message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Map a scan pipeline failure.
    ///
    /// Rate limiting and quota messages pass through unchanged; internal
    /// details never reach the client.
    pub fn from_scan(err: EcosortError) -> Self {
        match err {
            EcosortError::InvalidInput(message) => Self::new(StatusCode::BAD_REQUEST, message),
            EcosortError::RateLimited { message } => {
                Self::new(StatusCode::TOO_MANY_REQUESTS, message)
            }
            EcosortError::QuotaExhausted { message } => {
                Self::new(StatusCode::PAYMENT_REQUIRED, message)
            }
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, SCAN_FAILED_MESSAGE),
        }
    }

    /// Map a progress query failure.
    pub fn from_query(err: EcosortError) -> Self {
        match err {
            EcosortError::InvalidInput(message) => Self::new(StatusCode::BAD_REQUEST, message),
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, QUERY_FAILED_MESSAGE),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_errors_map_to_statuses() {
        let cases = [
            (
                EcosortError::InvalidInput("No image provided".into()),
                StatusCode::BAD_REQUEST,
                "No image provided",
            ),
            (
                EcosortError::RateLimited {
                    message: "slow down".into(),
                },
                StatusCode::TOO_MANY_REQUESTS,
                "slow down",
            ),
            (
                EcosortError::QuotaExhausted {
                    message: "no credits".into(),
                },
                StatusCode::PAYMENT_REQUIRED,
                "no credits",
            ),
            (
                EcosortError::Upstream {
                    message: "HTTP 503 from gateway".into(),
                    source: None,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                SCAN_FAILED_MESSAGE,
            ),
            (
                EcosortError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                SCAN_FAILED_MESSAGE,
            ),
        ];
        for (err, status, message) in cases {
            let api = ApiError::from_scan(err);
            assert_eq!(api.status, status);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn query_storage_errors_hide_details() {
        let api = ApiError::from_query(EcosortError::Storage {
            source: "disk I/O error at /var/lib/ecosort".into(),
        });
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, QUERY_FAILED_MESSAGE);
    }

    #[test]
    fn error_response_serializes() {
        let json = serde_json::to_string(&ErrorResponse {
            error: "something went wrong".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"error":"something went wrong"}"#);
    }
}
