// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire shapes of a scan submission and its answer.

use serde::{Deserialize, Serialize};

use ecosort_core::{Badge, CategoryPolicy, ClassificationResult, UserId};

/// `{ imageBase64, userId? }`. The image may be raw base64 or a data URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    #[serde(default)]
    pub image_base64: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Classification plus bin instructions, and the reward when progress was saved.
///
/// `points_earned` and `new_badges` are absent for anonymous scans and when
/// persisting the scan failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    #[serde(flatten)]
    pub classification: ClassificationResult,
    pub bin_color: String,
    pub bin_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_badges: Option<Vec<Badge>>,
}

impl ScanOutcome {
    pub fn classified(classification: ClassificationResult, policy: &CategoryPolicy) -> Self {
        Self {
            classification,
            bin_color: policy.bin_color.to_string(),
            bin_type: policy.bin_type.to_string(),
            points_earned: None,
            new_badges: None,
        }
    }
}
