// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily streak transitions.

use chrono::NaiveDate;

/// Streak after a scan on `today`, given the previous streak and last scan day.
///
/// - no previous scan, or a gap of two or more days: 1
/// - previous scan yesterday: `current + 1`
/// - previous scan today: unchanged
///
/// A scan dated before the last recorded one (clock skew between writers)
/// leaves the streak unchanged.
pub fn next_streak(current: u32, last_scan: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(last) = last_scan else {
        return 1;
    };
    match (today - last).num_days() {
        days if days <= 0 => current.max(1),
        1 => current.saturating_add(1),
        _ => 1,
    }
}
