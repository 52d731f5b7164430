// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for EcoSort.

use thiserror::Error;

/// The primary error type used across all EcoSort adapter traits and core operations.
///
/// Malformed model output is deliberately absent: the classifier recovers from
/// it locally and never reports it as an error.
#[derive(Debug, Error)]
pub enum EcosortError {
    /// Configuration errors (invalid TOML, missing API key, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller sent an unusable request (e.g. no image).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The classification service rejected the call because of rate limiting.
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// The classification service account has run out of credits.
    #[error("quota exhausted: {message}")]
    QuotaExhausted { message: String },

    /// Any other classification service failure (non-2xx status, network error).
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (connection, query failure, constraint violation).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The caller abandoned the operation before it completed.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EcosortError {
    /// Whether a human may reasonably try the same request again later.
    ///
    /// Quota exhaustion is not retryable until billing is resolved.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Upstream { .. })
    }

    /// Short stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::RateLimited { .. } => "rate_limited",
            Self::QuotaExhausted { .. } => "quota_exhausted",
            Self::Upstream { .. } => "upstream",
            Self::Storage { .. } => "storage",
            Self::Cancelled => "cancelled",
            Self::Internal(_) => "internal",
        }
    }
}
