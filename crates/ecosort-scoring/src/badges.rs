// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Badge unlock evaluation.

use std::collections::HashSet;

use ecosort_core::{Badge, Profile};

use crate::progress::CategoryCounts;

/// Whether a badge's unlock predicate holds.
///
/// The predicate is an OR over the non-null requirements. A badge with no
/// requirements never unlocks. A category requirement holds once the user
/// has at least one scored scan in that category.
pub fn is_unlocked(badge: &Badge, profile: &Profile, counts: &CategoryCounts) -> bool {
    let by_points = badge
        .points_required
        .is_some_and(|required| profile.eco_points >= required);
    let by_scans = badge
        .scans_required
        .is_some_and(|required| profile.total_scans >= required);
    let by_category = badge
        .category_required
        .is_some_and(|category| !category.is_unknown() && counts.get(category) > 0);
    by_points || by_scans || by_category
}

/// Ids of catalog badges unlocked by `profile` that are not already earned.
///
/// Order follows the catalog.
pub fn newly_earned(
    catalog: &[Badge],
    already_earned: &HashSet<String>,
    profile: &Profile,
    counts: &CategoryCounts,
) -> Vec<String> {
    catalog
        .iter()
        .filter(|badge| !already_earned.contains(&badge.id))
        .filter(|badge| is_unlocked(badge, profile, counts))
        .map(|badge| badge.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ecosort_core::{UserId, WasteCategory};

    fn badge(id: &str) -> Badge {
        Badge {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            icon: "*".to_string(),
            points_required: None,
            scans_required: None,
            category_required: None,
        }
    }

    fn profile(points: u32, scans: u32) -> Profile {
        let mut p = Profile::new(UserId::from("u1"), Utc::now());
        p.eco_points = points;
        p.total_scans = scans;
        p
    }

    #[test]
    fn points_threshold() {
        let b = Badge {
            points_required: Some(100),
            ..badge("century")
        };
        assert!(!is_unlocked(&b, &profile(99, 0), &CategoryCounts::default()));
        assert!(is_unlocked(&b, &profile(100, 0), &CategoryCounts::default()));
    }

    #[test]
    fn requirements_are_ored() {
        let b = Badge {
            points_required: Some(1000),
            scans_required: Some(5),
            ..badge("either")
        };
        assert!(is_unlocked(&b, &profile(0, 5), &CategoryCounts::default()));
        assert!(is_unlocked(&b, &profile(1000, 0), &CategoryCounts::default()));
        assert!(!is_unlocked(&b, &profile(999, 4), &CategoryCounts::default()));
    }

    #[test]
    fn category_requirement_needs_one_scan() {
        let b = Badge {
            category_required: Some(WasteCategory::EWaste),
            ..badge("e_waste_hero")
        };
        let mut counts = CategoryCounts::default();
        assert!(!is_unlocked(&b, &profile(0, 0), &counts));
        counts.increment(WasteCategory::EWaste);
        assert!(is_unlocked(&b, &profile(0, 1), &counts));
    }

    #[test]
    fn unknown_category_badges_never_unlock() {
        let b = Badge {
            category_required: Some(WasteCategory::Unknown),
            ..badge("mystery")
        };
        let mut counts = CategoryCounts::default();
        counts.increment(WasteCategory::Unknown);
        assert!(!is_unlocked(&b, &profile(0, 1), &counts));
    }

    #[test]
    fn badge_without_requirements_never_unlocks() {
        assert!(!is_unlocked(
            &badge("empty"),
            &profile(10_000, 10_000),
            &CategoryCounts::default()
        ));
    }

    #[test]
    fn already_earned_badges_are_skipped() {
        let catalog = vec![
            Badge {
                scans_required: Some(1),
                ..badge("first_scan")
            },
            Badge {
                points_required: Some(10),
                ..badge("ten_points")
            },
        ];
        let earned: HashSet<String> = ["first_scan".to_string()].into();
        let ids = newly_earned(&catalog, &earned, &profile(10, 1), &CategoryCounts::default());
        assert_eq!(ids, vec!["ten_points".to_string()]);
    }
}
