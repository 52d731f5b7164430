// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for EcoSort.
//!
//! This crate provides the error type, the domain types shared by every
//! crate in the workspace, and the capability traits that the classifier
//! and the progress store implement.

pub mod error;
pub mod traits;
pub mod types;

pub use error::EcosortError;
pub use types::{
    AdapterType, Badge, CategoryPolicy, ClassificationResult, EarnedBadge, HealthStatus,
    ImagePayload, LeaderboardEntry, Profile, ScanEvent, ScanHistoryEntry, ScoringOutcome,
    ScoringUpdate, UserId, WasteCategory,
};

pub use traits::{ClassificationProvider, PluginAdapter, ProgressStore};
