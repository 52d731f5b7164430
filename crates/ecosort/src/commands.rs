// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot CLI commands: `classify`, `profile`, `leaderboard`.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tokio_util::sync::CancellationToken;

use ecosort_config::EcosortConfig;
use ecosort_core::{EcosortError, LeaderboardEntry, PluginAdapter, ProgressStore, UserId};
use ecosort_scan::{ScanContext, ScanRequest, ScanService};
use ecosort_storage::SqliteProgressStore;
use ecosort_vision::VisionClassifier;

async fn open_store(config: &EcosortConfig) -> Result<Arc<SqliteProgressStore>, EcosortError> {
    let store = Arc::new(SqliteProgressStore::new(config.storage.clone()));
    store.initialize().await?;
    Ok(store)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, EcosortError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| EcosortError::Internal(format!("failed to encode output: {e}")))
}

/// Classify one image file; Ctrl+C abandons the call.
pub async fn run_classify(
    config: &EcosortConfig,
    image: &Path,
    user: Option<String>,
) -> Result<(), EcosortError> {
    let bytes = tokio::fs::read(image).await.map_err(|e| {
        EcosortError::InvalidInput(format!("cannot read {}: {e}", image.display()))
    })?;

    let store = open_store(config).await?;
    let classifier = Arc::new(VisionClassifier::new(config)?);
    let service = ScanService::new(classifier, store.clone());

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let request = ScanRequest {
        image_base64: STANDARD.encode(&bytes),
        user_id: user.map(UserId),
    };
    let outcome = service.submit(&ScanContext::new(cancel), request).await;
    store.shutdown().await?;

    println!("{}", to_json(&outcome?)?);
    Ok(())
}

pub async fn run_profile(config: &EcosortConfig, user: &str) -> Result<(), EcosortError> {
    let store = open_store(config).await?;
    let user_id = UserId::from(user);

    let profile = store.get_profile(&user_id).await?;
    let badges = store.get_earned_badges(&user_id).await?;
    store.shutdown().await?;

    match profile {
        Some(profile) => {
            let view = serde_json::json!({
                "profile": profile,
                "pointsToNextLevel": profile.points_to_next_level(),
                "badges": badges,
            });
            println!("{}", to_json(&view)?);
        }
        None => println!("no profile for user {user_id}"),
    }
    Ok(())
}

pub async fn run_leaderboard(config: &EcosortConfig, limit: u32) -> Result<(), EcosortError> {
    let store = open_store(config).await?;
    let entries = store
        .get_leaderboard(ecosort_scan::effective_limit(
            Some(limit),
            ecosort_scan::DEFAULT_LEADERBOARD_LIMIT,
        ))
        .await?;
    store.shutdown().await?;

    print!("{}", render_leaderboard(&entries));
    Ok(())
}

/// Plain-text table, one row per entry.
fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "no ranked users yet\n".to_string();
    }
    let width = entries
        .iter()
        .map(|e| e.display_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<width$}  {:>8}  {:>5}  {:>5}",
        "RANK", "NAME", "POINTS", "LEVEL", "SCANS"
    );
    for e in entries {
        let _ = writeln!(
            out,
            "{:>4}  {:<width$}  {:>8}  {:>5}  {:>5}",
            e.rank, e.display_name, e.eco_points, e.level, e.total_scans
        );
    }
    out
}
