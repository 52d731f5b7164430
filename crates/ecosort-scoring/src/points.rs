// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Points earned per scan and the level curve.

use ecosort_core::types::{clamp_confidence, POINTS_PER_LEVEL};
use ecosort_core::WasteCategory;

use crate::policy::policy_for;

/// Points earned for one scan: `round(base_points * confidence)`.
///
/// Confidence is clamped into `[0, 1]` first, so the result never exceeds the
/// category's base value. `Unknown` has a base of 0 and always scores 0.
pub fn score(category: WasteCategory, confidence: f64) -> u32 {
    let base = policy_for(category).base_points;
    (f64::from(base) * clamp_confidence(confidence)).round() as u32
}

/// Level for a point total: one level per 100 points, starting at 1.
pub fn level_for_points(eco_points: u32) -> u32 {
    eco_points / POINTS_PER_LEVEL + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recyclable_at_eighty_percent_earns_twelve() {
        assert_eq!(score(WasteCategory::DryRecyclable, 0.8), 12);
    }

    #[test]
    fn unknown_never_scores() {
        assert_eq!(score(WasteCategory::Unknown, 0.9), 0);
        assert_eq!(score(WasteCategory::Unknown, 1.0), 0);
    }

    #[test]
    fn half_points_round_up() {
        // 15 * 0.5 = 7.5
        assert_eq!(score(WasteCategory::DryRecyclable, 0.5), 8);
    }

    #[test]
    fn out_of_range_confidence_is_clamped() {
        assert_eq!(score(WasteCategory::Hazardous, 1.7), 25);
        assert_eq!(score(WasteCategory::Hazardous, -0.5), 0);
    }

    #[test]
    fn level_curve() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(99), 1);
        assert_eq!(level_for_points(100), 2);
        assert_eq!(level_for_points(250), 3);
    }
}
