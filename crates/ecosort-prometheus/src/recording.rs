// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric descriptions and recording helpers.
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed.

use ecosort_core::WasteCategory;
use metrics::{describe_counter, describe_histogram, Unit};

pub const SCANS_TOTAL: &str = "ecosort_scans_total";
pub const POINTS_AWARDED_TOTAL: &str = "ecosort_points_awarded_total";
pub const BADGES_AWARDED_TOTAL: &str = "ecosort_badges_awarded_total";
pub const CLASSIFICATION_FAILURES_TOTAL: &str = "ecosort_classification_failures_total";
pub const PERSISTENCE_FAILURES_TOTAL: &str = "ecosort_persistence_failures_total";
pub const CLASSIFICATION_LATENCY_SECONDS: &str = "ecosort_classification_latency_seconds";

/// Register all EcoSort metric descriptions. Call once after installing a recorder.
pub fn register_metrics() {
    describe_counter!(SCANS_TOTAL, "Classified scans by category");
    describe_counter!(POINTS_AWARDED_TOTAL, "Eco points credited to users");
    describe_counter!(BADGES_AWARDED_TOTAL, "Badges newly earned");
    describe_counter!(
        CLASSIFICATION_FAILURES_TOTAL,
        "Classification calls that failed, by error kind"
    );
    describe_counter!(
        PERSISTENCE_FAILURES_TOTAL,
        "Scans whose scoring or history write failed"
    );
    describe_histogram!(
        CLASSIFICATION_LATENCY_SECONDS,
        Unit::Seconds,
        "Round-trip time of the classification call"
    );
}

pub fn record_scan(category: WasteCategory) {
    metrics::counter!(SCANS_TOTAL, "category" => category.as_str()).increment(1);
}

pub fn record_points(points: u32) {
    metrics::counter!(POINTS_AWARDED_TOTAL).increment(u64::from(points));
}

pub fn record_badges(count: usize) {
    metrics::counter!(BADGES_AWARDED_TOTAL).increment(count as u64);
}

/// `kind` is an [`ecosort_core::EcosortError::kind`] label.
pub fn record_classification_failure(kind: &'static str) {
    metrics::counter!(CLASSIFICATION_FAILURES_TOTAL, "kind" => kind).increment(1);
}

pub fn record_persistence_failure() {
    metrics::counter!(PERSISTENCE_FAILURES_TOTAL).increment(1);
}

pub fn record_classification_latency(seconds: f64) {
    metrics::histogram!(CLASSIFICATION_LATENCY_SECONDS).record(seconds);
}
