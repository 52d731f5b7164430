// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static bin policy table.
//!
//! Bin colors follow the municipal segregation scheme the app was built for:
//! green organic, blue recyclable, red hazardous, black e-waste, yellow sanitary.

use ecosort_core::{CategoryPolicy, WasteCategory};

const WET_ORGANIC: CategoryPolicy = CategoryPolicy {
    bin_color: "green",
    bin_type: "Biodegradable Bin",
    default_tip: "Dispose in the green bin. Avoid plastic bags.",
    base_points: 10,
};

const DRY_RECYCLABLE: CategoryPolicy = CategoryPolicy {
    bin_color: "blue",
    bin_type: "Recyclable Bin",
    default_tip: "Rinse and clean before disposal.",
    base_points: 15,
};

const HAZARDOUS: CategoryPolicy = CategoryPolicy {
    bin_color: "red",
    bin_type: "Hazardous Waste Bin",
    default_tip: "Handle with care. Do not mix with regular waste.",
    base_points: 25,
};

const E_WASTE: CategoryPolicy = CategoryPolicy {
    bin_color: "black",
    bin_type: "E-Waste Collection Bin",
    default_tip: "Remove batteries if possible. Take to certified collection centers.",
    base_points: 20,
};

const REJECT_SANITARY: CategoryPolicy = CategoryPolicy {
    bin_color: "yellow",
    bin_type: "Incineration / Sanitary Bin",
    default_tip: "Wrap securely before disposal.",
    base_points: 10,
};

const UNKNOWN: CategoryPolicy = CategoryPolicy {
    bin_color: "gray",
    bin_type: "Unknown",
    default_tip: "Please try again with a clearer image.",
    base_points: 0,
};

/// Look up the disposal policy for a category. Total over the enum.
pub fn policy_for(category: WasteCategory) -> &'static CategoryPolicy {
    match category {
        WasteCategory::WetOrganic => &WET_ORGANIC,
        WasteCategory::DryRecyclable => &DRY_RECYCLABLE,
        WasteCategory::Hazardous => &HAZARDOUS,
        WasteCategory::EWaste => &E_WASTE,
        WasteCategory::RejectSanitary => &REJECT_SANITARY,
        WasteCategory::Unknown => &UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_policy() {
        for category in WasteCategory::ALL {
            let policy = policy_for(category);
            assert!(!policy.bin_color.is_empty());
            assert!(!policy.bin_type.is_empty());
            assert!(!policy.default_tip.is_empty());
        }
    }

    #[test]
    fn unknown_is_worth_nothing() {
        assert_eq!(policy_for(WasteCategory::Unknown).base_points, 0);
    }

    #[test]
    fn known_categories_are_worth_something() {
        for category in WasteCategory::ALL.iter().filter(|c| !c.is_unknown()) {
            assert!(policy_for(*category).base_points > 0, "{category}");
        }
    }

    #[test]
    fn recyclables_go_in_the_blue_bin() {
        let policy = policy_for(WasteCategory::DryRecyclable);
        assert_eq!(policy.bin_color, "blue");
        assert_eq!(policy.base_points, 15);
    }
}
