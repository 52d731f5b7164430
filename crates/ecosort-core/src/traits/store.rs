// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Progress store trait for user profiles, badges, and scan history.

use async_trait::async_trait;

use crate::error::EcosortError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Badge, EarnedBadge, LeaderboardEntry, Profile, ScanEvent, ScanHistoryEntry, ScoringOutcome,
    ScoringUpdate, UserId,
};

/// Adapter for the datastore that owns user progress.
///
/// `apply_scoring` carries the hard contract: it must be atomic with respect
/// to concurrent updates for the same user, and a badge may be reported as
/// newly earned at most once per user.
#[async_trait]
pub trait ProgressStore: PluginAdapter {
    /// Prepares the backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), EcosortError>;

    /// Returns the user's profile, if one exists.
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, EcosortError>;

    /// Sets the public display name, creating the profile when missing.
    async fn set_display_name(
        &self,
        user_id: &UserId,
        display_name: &str,
    ) -> Result<Profile, EcosortError>;

    /// The full badge catalog, ordered by points required (nulls first).
    async fn get_badge_catalog(&self) -> Result<Vec<Badge>, EcosortError>;

    /// Badges the user holds.
    async fn get_earned_badges(&self, user_id: &UserId) -> Result<Vec<EarnedBadge>, EcosortError>;

    /// Most recent scans first, at most `limit` entries.
    async fn get_scan_history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<ScanHistoryEntry>, EcosortError>;

    /// Appends a scan to the user's history.
    async fn record_scan(&self, event: &ScanEvent) -> Result<i64, EcosortError>;

    /// Credits points, advances totals and streak, and awards new badges.
    async fn apply_scoring(&self, update: &ScoringUpdate) -> Result<ScoringOutcome, EcosortError>;

    /// Appends the scan and applies its scoring update as one atomic unit.
    ///
    /// On error neither the history row nor the profile change is visible.
    async fn record_scored_scan(&self, event: &ScanEvent) -> Result<ScoringOutcome, EcosortError>;

    /// Named profiles ranked by eco points.
    async fn get_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, EcosortError>;
}
