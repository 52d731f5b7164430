// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scan pipeline for EcoSort.
//!
//! [`ScanService`] turns one captured image into a classification and, when
//! the caller is signed in, credits the user's progress. Both the HTTP
//! gateway and the CLI drive scans through it.

pub mod context;
pub mod outcome;
pub mod service;

pub use context::ScanContext;
pub use outcome::{ScanOutcome, ScanRequest};
pub use service::ScanService;

/// History entries returned when the caller gives no limit.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Leaderboard rows returned when the caller gives no limit.
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 50;

/// Upper bound for any caller-supplied listing limit.
pub const MAX_LIST_LIMIT: u32 = 200;

/// Resolves an optional caller limit against a default, capped at [`MAX_LIST_LIMIT`].
pub fn effective_limit(requested: Option<u32>, default: u32) -> u32 {
    match requested {
        Some(0) | None => default,
        Some(n) => n.min(MAX_LIST_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_fall_back_and_cap() {
        assert_eq!(effective_limit(None, DEFAULT_HISTORY_LIMIT), 50);
        assert_eq!(effective_limit(Some(0), 20), 20);
        assert_eq!(effective_limit(Some(7), 50), 7);
        assert_eq!(effective_limit(Some(10_000), 50), MAX_LIST_LIMIT);
    }
}
