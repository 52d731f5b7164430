// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The scoring update applied to a profile.
//!
//! [`apply_update`] is the single definition of what a scan does to a user's
//! progress. Callers are responsible for running it against a consistent
//! snapshot (inside a transaction or under a per-user lock) and for
//! persisting its result atomically.

use std::collections::{BTreeMap, HashSet};

use ecosort_core::{Badge, Profile, ScoringOutcome, ScoringUpdate, WasteCategory};
use tracing::debug;

use crate::badges::newly_earned;
use crate::points::level_for_points;
use crate::streak::next_streak;

/// Cumulative scored-scan counts per category for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts(BTreeMap<WasteCategory, u32>);

impl CategoryCounts {
    pub fn get(&self, category: WasteCategory) -> u32 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn set(&mut self, category: WasteCategory, count: u32) {
        self.0.insert(category, count);
    }

    pub fn increment(&mut self, category: WasteCategory) {
        *self.0.entry(category).or_insert(0) += 1;
    }
}

impl FromIterator<(WasteCategory, u32)> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = (WasteCategory, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Apply one scan's update to a snapshot of the user's progress.
///
/// `counts` must exclude the scan being applied; it is advanced here. The
/// returned outcome carries the updated profile and the badges this update
/// unlocked that were not in `already_earned`.
pub fn apply_update(
    before: &Profile,
    counts: &CategoryCounts,
    already_earned: &HashSet<String>,
    catalog: &[Badge],
    update: &ScoringUpdate,
) -> (ScoringOutcome, CategoryCounts) {
    let today = update.scanned_at.date_naive();

    let mut after = before.clone();
    after.eco_points = before.eco_points.saturating_add(update.points_earned);
    after.total_scans = before.total_scans.saturating_add(1);
    after.level = level_for_points(after.eco_points);
    after.streak_days = next_streak(before.streak_days, before.last_scan_date, today);
    after.last_scan_date = Some(before.last_scan_date.map_or(today, |last| last.max(today)));
    after.updated_at = update.scanned_at;

    let mut counts_after = counts.clone();
    counts_after.increment(update.category);

    let new_badge_ids = newly_earned(catalog, already_earned, &after, &counts_after);

    debug!(
        user_id = %update.user_id,
        points = update.points_earned,
        eco_points = after.eco_points,
        level = after.level,
        streak = after.streak_days,
        new_badges = new_badge_ids.len(),
        "scoring update computed"
    );

    (
        ScoringOutcome {
            profile: after,
            new_badge_ids,
        },
        counts_after,
    )
}
