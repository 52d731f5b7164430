// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization of free-form model output into a [`ClassificationResult`].
//!
//! Parsing never fails. Anything that is not JSON degrades to
//! [`unidentified`]; individual missing fields fall back to defaults.

use std::sync::LazyLock;

use ecosort_core::{ClassificationResult, WasteCategory};
use ecosort_scoring::policy_for;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").unwrap());
static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*([\s\S]*?)\s*```").unwrap());

pub const UNIDENTIFIED_NAME: &str = "Unidentified Item";
pub const UNIDENTIFIED_CONFIDENCE: f64 = 0.3;
pub const UNIDENTIFIED_TIP: &str =
    "Could not analyze the image clearly. Please try again with a clearer photo.";

pub const DEFAULT_ITEM_NAME: &str = "Unknown Item";
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Result used when the model's answer cannot be read at all.
pub fn unidentified() -> ClassificationResult {
    ClassificationResult::new(
        UNIDENTIFIED_NAME,
        WasteCategory::Unknown,
        UNIDENTIFIED_CONFIDENCE,
        UNIDENTIFIED_TIP,
    )
}

/// Strip a ```` ```json ```` or bare ```` ``` ```` fence, if present.
pub fn extract_json(content: &str) -> &str {
    JSON_FENCE
        .captures(content)
        .or_else(|| ANY_FENCE.captures(content))
        .and_then(|caps| caps.get(1))
        .map_or(content, |m| m.as_str())
        .trim()
}

/// Turn raw model text into a normalized classification.
pub fn parse_classification(content: &str) -> ClassificationResult {
    let json = extract_json(content);
    match serde_json::from_str::<Value>(json) {
        Ok(value) => normalize(&value),
        Err(e) => {
            warn!(error = %e, "model output is not valid JSON, using unidentified result");
            unidentified()
        }
    }
}

/// Apply field defaults and the closed-world category check.
///
/// A `confidence` that is missing, zero, or not a number falls back to
/// [`DEFAULT_CONFIDENCE`]. Numeric strings are accepted.
fn normalize(value: &Value) -> ClassificationResult {
    let category = value
        .get("category")
        .and_then(Value::as_str)
        .map_or(WasteCategory::Unknown, WasteCategory::parse_lenient);

    let item_name = non_empty_str(value, "itemName").unwrap_or(DEFAULT_ITEM_NAME);
    let disposal_tip =
        non_empty_str(value, "disposalTip").unwrap_or(policy_for(category).default_tip);
    let confidence = value
        .get("confidence")
        .and_then(confidence_value)
        .filter(|c| *c != 0.0 && !c.is_nan())
        .unwrap_or(DEFAULT_CONFIDENCE);

    ClassificationResult::new(item_name, category, confidence, disposal_tip)
}

fn confidence_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
