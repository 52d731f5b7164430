// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the EcoSort pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::EcosortError;

/// Eco points needed to climb one level.
pub const POINTS_PER_LEVEL: u32 = 100;

/// Unique identifier for a user of the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Classifier,
    Storage,
    Observability,
}

/// The closed waste taxonomy.
///
/// Any tag outside this set coming back from the model is coerced to
/// [`WasteCategory::Unknown`] by [`WasteCategory::parse_lenient`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WasteCategory {
    WetOrganic,
    DryRecyclable,
    Hazardous,
    #[serde(rename = "e_waste")]
    #[strum(serialize = "e_waste")]
    EWaste,
    RejectSanitary,
    Unknown,
}

impl WasteCategory {
    /// Every category, in taxonomy order.
    pub const ALL: [WasteCategory; 6] = [
        WasteCategory::WetOrganic,
        WasteCategory::DryRecyclable,
        WasteCategory::Hazardous,
        WasteCategory::EWaste,
        WasteCategory::RejectSanitary,
        WasteCategory::Unknown,
    ];

    /// Parse a tag as produced by the model, mapping anything unrecognized to `Unknown`.
    ///
    /// Matching is exact: `"E_Waste"` or `" hazardous"` are not in the taxonomy.
    pub fn parse_lenient(tag: &str) -> Self {
        tag.parse().unwrap_or(WasteCategory::Unknown)
    }

    /// Wire/database tag, e.g. `e_waste`.
    pub fn as_str(&self) -> &'static str {
        match self {
            WasteCategory::WetOrganic => "wet_organic",
            WasteCategory::DryRecyclable => "dry_recyclable",
            WasteCategory::Hazardous => "hazardous",
            WasteCategory::EWaste => "e_waste",
            WasteCategory::RejectSanitary => "reject_sanitary",
            WasteCategory::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, WasteCategory::Unknown)
    }
}

/// Disposal rules and reward value for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPolicy {
    pub bin_color: &'static str,
    pub bin_type: &'static str,
    pub default_tip: &'static str,
    pub base_points: u32,
}

/// Clamp a model-reported confidence into `[0, 1]`. NaN maps to 0.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Normalized answer for a single scanned item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub item_name: String,
    pub category: WasteCategory,
    pub confidence: f64,
    pub disposal_tip: String,
}

impl ClassificationResult {
    /// Builds a result, clamping `confidence` into `[0, 1]`.
    pub fn new(
        item_name: impl Into<String>,
        category: WasteCategory,
        confidence: f64,
        disposal_tip: impl Into<String>,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            category,
            confidence: clamp_confidence(confidence),
            disposal_tip: disposal_tip.into(),
        }
    }
}

/// A captured image, carried as base64-encoded JPEG data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    base64: String,
}

impl ImagePayload {
    /// Accepts raw base64 or a full `data:` URL (the prefix is stripped).
    pub fn from_base64(input: &str) -> Result<Self, EcosortError> {
        let trimmed = input.trim();
        let data = match trimmed.strip_prefix("data:") {
            Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(""),
            None => trimmed,
        };
        if data.is_empty() {
            return Err(EcosortError::InvalidInput("No image provided".to_string()));
        }
        Ok(Self {
            base64: data.to_string(),
        })
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    /// The image as a `data:image/jpeg;base64,...` URL.
    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.base64)
    }

    /// Size of the encoded payload in bytes.
    pub fn encoded_len(&self) -> usize {
        self.base64.len()
    }
}

/// An append-only record of one scored scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    pub user_id: UserId,
    pub item_name: String,
    pub category: WasteCategory,
    pub bin_color: String,
    pub bin_type: String,
    pub disposal_tip: String,
    pub confidence: f64,
    pub points_earned: u32,
    pub scanned_at: DateTime<Utc>,
}

/// A [`ScanEvent`] as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanHistoryEntry {
    pub id: i64,
    #[serde(flatten)]
    pub event: ScanEvent,
}

/// Per-user progress aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub eco_points: u32,
    pub total_scans: u32,
    pub streak_days: u32,
    pub level: u32,
    pub last_scan_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh profile with no progress.
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            display_name: None,
            eco_points: 0,
            total_scans: 0,
            streak_days: 0,
            level: 1,
            last_scan_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Points still needed to reach the next level.
    pub fn points_to_next_level(&self) -> u32 {
        POINTS_PER_LEVEL - self.eco_points % POINTS_PER_LEVEL
    }
}

/// Longest display name accepted, in characters.
pub const MAX_DISPLAY_NAME_CHARS: usize = 50;

/// Trim a user-chosen display name and check its length.
pub fn normalize_display_name(name: &str) -> Result<String, EcosortError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EcosortError::InvalidInput(
            "Display name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(EcosortError::InvalidInput(format!(
            "Display name must be at most {MAX_DISPLAY_NAME_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Static catalog entry describing an achievement.
///
/// The badge unlocks when ANY of its non-null requirements holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub points_required: Option<u32>,
    pub scans_required: Option<u32>,
    pub category_required: Option<WasteCategory>,
}

/// A badge a user holds, with the moment it was earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    #[serde(flatten)]
    pub badge: Badge,
    pub earned_at: DateTime<Utc>,
}

/// Input to a scoring update.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringUpdate {
    pub user_id: UserId,
    pub points_earned: u32,
    pub category: WasteCategory,
    pub scanned_at: DateTime<Utc>,
}

impl From<&ScanEvent> for ScoringUpdate {
    fn from(event: &ScanEvent) -> Self {
        Self {
            user_id: event.user_id.clone(),
            points_earned: event.points_earned,
            category: event.category,
            scanned_at: event.scanned_at,
        }
    }
}

/// Result of a scoring update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringOutcome {
    /// The profile after the update was applied.
    pub profile: Profile,
    /// Badges first earned by this exact update.
    pub new_badge_ids: Vec<String>,
}

/// One row of the public leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub display_name: String,
    pub eco_points: u32,
    pub level: u32,
    pub total_scans: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_tags_roundtrip_through_strum_and_serde() {
        for category in WasteCategory::ALL {
            assert_eq!(category.to_string(), category.as_str());
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            assert_eq!(WasteCategory::parse_lenient(category.as_str()), category);
        }
    }

    #[test]
    fn unrecognized_tags_become_unknown() {
        assert_eq!(WasteCategory::parse_lenient("plastic"), WasteCategory::Unknown);
        assert_eq!(WasteCategory::parse_lenient(""), WasteCategory::Unknown);
    }

    #[test]
    fn tags_must_match_exactly() {
        assert_eq!(WasteCategory::parse_lenient("e_waste"), WasteCategory::EWaste);
        assert_eq!(WasteCategory::parse_lenient("E_Waste"), WasteCategory::Unknown);
        assert_eq!(WasteCategory::parse_lenient(" hazardous"), WasteCategory::Unknown);
        assert_eq!(WasteCategory::parse_lenient("Wet_Organic"), WasteCategory::Unknown);
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(clamp_confidence(-0.5), 0.0);
        assert_eq!(clamp_confidence(1.7), 1.0);
        assert_eq!(clamp_confidence(0.42), 0.42);
        assert_eq!(clamp_confidence(f64::NAN), 0.0);

        let result = ClassificationResult::new("bottle", WasteCategory::DryRecyclable, 3.0, "");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn image_payload_strips_data_url_prefix() {
        let payload = ImagePayload::from_base64("data:image/png;base64,QUJD").unwrap();
        assert_eq!(payload.as_base64(), "QUJD");
        assert_eq!(payload.data_url(), "data:image/jpeg;base64,QUJD");
    }

    #[test]
    fn empty_image_is_invalid_input() {
        for input in ["", "   ", "data:image/jpeg;base64,"] {
            let err = ImagePayload::from_base64(input).unwrap_err();
            assert!(matches!(err, EcosortError::InvalidInput(_)), "{input:?}");
        }
    }

    #[test]
    fn points_to_next_level_counts_remainder() {
        let mut profile = Profile::new(UserId::from("u1"), Utc::now());
        assert_eq!(profile.points_to_next_level(), 100);
        profile.eco_points = 137;
        assert_eq!(profile.points_to_next_level(), 63);
    }

    #[test]
    fn display_names_are_trimmed_and_bounded() {
        assert_eq!(normalize_display_name("  Rita ").unwrap(), "Rita");
        assert!(normalize_display_name("   ").is_err());
        assert!(normalize_display_name(&"x".repeat(51)).is_err());
        assert!(normalize_display_name(&"é".repeat(50)).is_ok());
    }

    #[test]
    fn classification_result_uses_camel_case() {
        let result = ClassificationResult::new(
            "banana peel",
            WasteCategory::WetOrganic,
            0.9,
            "Compost it.",
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["itemName"], "banana peel");
        assert_eq!(json["category"], "wet_organic");
        assert_eq!(json["disposalTip"], "Compost it.");
    }
}
