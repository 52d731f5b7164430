// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`ProgressStore`] for pipeline tests.
//!
//! Shares the scoring arithmetic with the SQLite store through
//! `ecosort_scoring::apply_update`. A single mutex guards all state, which
//! gives the same per-update atomicity as the SQLite transaction.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use ecosort_core::types::normalize_display_name;
use ecosort_core::{
    AdapterType, Badge, EarnedBadge, EcosortError, HealthStatus, LeaderboardEntry, PluginAdapter,
    Profile, ProgressStore, ScanEvent, ScanHistoryEntry, ScoringOutcome, ScoringUpdate, UserId,
    WasteCategory,
};
use ecosort_scoring::{apply_update, CategoryCounts};

#[derive(Default)]
struct State {
    profiles: HashMap<UserId, Profile>,
    earned: HashMap<UserId, Vec<(String, DateTime<Utc>)>>,
    counts: HashMap<UserId, CategoryCounts>,
    history: Vec<ScanHistoryEntry>,
}

pub struct MemoryProgressStore {
    catalog: Vec<Badge>,
    state: Mutex<State>,
    fail_writes: AtomicBool,
    fail_scoring: AtomicBool,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::with_catalog(default_catalog())
    }

    pub fn with_catalog(catalog: Vec<Badge>) -> Self {
        Self {
            catalog,
            state: Mutex::new(State::default()),
            fail_writes: AtomicBool::new(false),
            fail_scoring: AtomicBool::new(false),
        }
    }

    /// Make `record_scan` and `apply_scoring` fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make only the scoring step fail, leaving plain history appends working.
    pub fn set_fail_scoring(&self, fail: bool) {
        self.fail_scoring.store(fail, Ordering::SeqCst);
    }

    /// Every recorded scan, oldest first.
    pub async fn all_scans(&self) -> Vec<ScanHistoryEntry> {
        self.state.lock().await.history.clone()
    }

    fn check_writable(&self) -> Result<(), EcosortError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(EcosortError::Storage {
                source: "simulated write failure".into(),
            });
        }
        Ok(())
    }

    fn check_scorable(&self) -> Result<(), EcosortError> {
        self.check_writable()?;
        if self.fail_scoring.load(Ordering::SeqCst) {
            return Err(EcosortError::Storage {
                source: "simulated scoring failure".into(),
            });
        }
        Ok(())
    }

    fn score(&self, state: &mut State, update: &ScoringUpdate) -> ScoringOutcome {
        let user_id = update.user_id.clone();

        let before = state
            .profiles
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Profile::new(user_id.clone(), update.scanned_at));
        let earned: HashSet<String> = state
            .earned
            .get(&user_id)
            .map(|list| list.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default();
        let counts = state.counts.get(&user_id).cloned().unwrap_or_default();

        let (outcome, counts_after) =
            apply_update(&before, &counts, &earned, &self.catalog, update);

        state.profiles.insert(user_id.clone(), outcome.profile.clone());
        state.counts.insert(user_id.clone(), counts_after);
        state.earned.entry(user_id).or_default().extend(
            outcome
                .new_badge_ids
                .iter()
                .map(|id| (id.clone(), update.scanned_at)),
        );
        outcome
    }
}

fn push_scan(state: &mut State, event: &ScanEvent) -> i64 {
    let id = state.history.len() as i64 + 1;
    state.history.push(ScanHistoryEntry {
        id,
        event: event.clone(),
    });
    id
}

impl Default for MemoryProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

fn badge(
    id: &str,
    name: &str,
    points: Option<u32>,
    scans: Option<u32>,
    category: Option<WasteCategory>,
) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: name.to_string(),
        icon: "🏅".to_string(),
        points_required: points,
        scans_required: scans,
        category_required: category,
    }
}

/// A small catalog covering each kind of requirement.
pub fn default_catalog() -> Vec<Badge> {
    vec![
        badge("first_scan", "First Steps", None, Some(1), None),
        badge("recycling_hero", "Recycling Hero", None, None, Some(WasteCategory::DryRecyclable)),
        badge("eco_starter", "Eco Starter", Some(50), None, None),
        badge("century", "Century Sorter", Some(100), None, None),
    ]
}

#[async_trait]
impl PluginAdapter for MemoryProgressStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, EcosortError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Degraded("writes failing".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EcosortError> {
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn initialize(&self) -> Result<(), EcosortError> {
        Ok(())
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, EcosortError> {
        Ok(self.state.lock().await.profiles.get(user_id).cloned())
    }

    async fn set_display_name(
        &self,
        user_id: &UserId,
        display_name: &str,
    ) -> Result<Profile, EcosortError> {
        let name = normalize_display_name(display_name)?;
        let now = Utc::now();
        let mut state = self.state.lock().await;
        let profile = state
            .profiles
            .entry(user_id.clone())
            .or_insert_with(|| Profile::new(user_id.clone(), now));
        profile.display_name = Some(name);
        profile.updated_at = now;
        Ok(profile.clone())
    }

    async fn get_badge_catalog(&self) -> Result<Vec<Badge>, EcosortError> {
        let mut catalog = self.catalog.clone();
        catalog.sort_by_key(|b| b.points_required.map_or((false, 0), |p| (true, p)));
        Ok(catalog)
    }

    async fn get_earned_badges(&self, user_id: &UserId) -> Result<Vec<EarnedBadge>, EcosortError> {
        let state = self.state.lock().await;
        let earned = state.earned.get(user_id).map(Vec::as_slice).unwrap_or_default();
        Ok(earned
            .iter()
            .filter_map(|(id, earned_at)| {
                self.catalog.iter().find(|b| &b.id == id).map(|badge| EarnedBadge {
                    badge: badge.clone(),
                    earned_at: *earned_at,
                })
            })
            .collect())
    }

    async fn get_scan_history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<ScanHistoryEntry>, EcosortError> {
        let state = self.state.lock().await;
        let mut entries: Vec<_> = state
            .history
            .iter()
            .filter(|h| &h.event.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            b.event
                .scanned_at
                .cmp(&a.event.scanned_at)
                .then(b.id.cmp(&a.id))
        });
        entries.truncate(limit as usize);
        Ok(entries)
    }

    async fn record_scan(&self, event: &ScanEvent) -> Result<i64, EcosortError> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        Ok(push_scan(&mut state, event))
    }

    async fn apply_scoring(&self, update: &ScoringUpdate) -> Result<ScoringOutcome, EcosortError> {
        self.check_scorable()?;
        let mut state = self.state.lock().await;
        Ok(self.score(&mut state, update))
    }

    async fn record_scored_scan(&self, event: &ScanEvent) -> Result<ScoringOutcome, EcosortError> {
        self.check_scorable()?;
        let mut state = self.state.lock().await;
        push_scan(&mut state, event);
        Ok(self.score(&mut state, &ScoringUpdate::from(event)))
    }

    async fn get_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, EcosortError> {
        let state = self.state.lock().await;
        let mut named: Vec<&Profile> = state
            .profiles
            .values()
            .filter(|p| p.display_name.as_deref().is_some_and(|n| !n.trim().is_empty()))
            .collect();
        named.sort_by(|a, b| {
            b.eco_points
                .cmp(&a.eco_points)
                .then(b.total_scans.cmp(&a.total_scans))
                .then(a.user_id.cmp(&b.user_id))
        });
        Ok((1u32..)
            .zip(named.into_iter().take(limit as usize))
            .map(|(rank, p)| LeaderboardEntry {
                rank,
                user_id: p.user_id.clone(),
                display_name: p.display_name.clone().unwrap_or_default(),
                eco_points: p.eco_points,
                level: p.level,
                total_scans: p.total_scans,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(points: u32, category: WasteCategory) -> ScoringUpdate {
        ScoringUpdate {
            user_id: UserId::from("u1"),
            points_earned: points,
            category,
            scanned_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn scoring_awards_each_badge_once() {
        let store = MemoryProgressStore::new();
        let first = store
            .apply_scoring(&update(12, WasteCategory::DryRecyclable))
            .await
            .unwrap();
        assert_eq!(first.new_badge_ids, vec!["first_scan", "recycling_hero"]);

        let second = store
            .apply_scoring(&update(12, WasteCategory::DryRecyclable))
            .await
            .unwrap();
        assert!(second.new_badge_ids.is_empty());
        assert_eq!(second.profile.eco_points, 24);
        assert_eq!(store.get_earned_badges(&UserId::from("u1")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn write_failures_can_be_simulated() {
        let store = MemoryProgressStore::new();
        store.set_fail_writes(true);
        assert!(store
            .apply_scoring(&update(5, WasteCategory::WetOrganic))
            .await
            .is_err());
        assert!(store.get_profile(&UserId::from("u1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn scoring_failure_leaves_no_history() {
        let store = MemoryProgressStore::new();
        store.set_fail_scoring(true);
        let event = ScanEvent {
            user_id: UserId::from("u1"),
            item_name: "Bottle".to_string(),
            category: WasteCategory::DryRecyclable,
            bin_color: "blue".to_string(),
            bin_type: "Dry Waste".to_string(),
            disposal_tip: String::new(),
            confidence: 0.8,
            points_earned: 12,
            scanned_at: Utc::now(),
        };
        assert!(store.record_scored_scan(&event).await.is_err());
        assert!(store.all_scans().await.is_empty());

        store.set_fail_scoring(false);
        let outcome = store.record_scored_scan(&event).await.unwrap();
        assert_eq!(outcome.profile.eco_points, 12);
        assert_eq!(store.all_scans().await.len(), 1);
    }

    #[tokio::test]
    async fn catalog_sorted_nulls_first() {
        let store = MemoryProgressStore::new();
        let ids: Vec<_> = store
            .get_badge_catalog()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["first_scan", "recycling_hero", "eco_starter", "century"]);
    }
}
