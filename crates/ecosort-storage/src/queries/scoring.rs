// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The transactional scoring update.
//!
//! Runs under `BEGIN IMMEDIATE` on the writer thread, so two updates for the
//! same user can never read the same snapshot. Badge inserts use
//! `INSERT OR IGNORE` against the `(user_id, badge_id)` unique key.

use std::collections::HashSet;

use ecosort_core::{EcosortError, ScanEvent, ScoringOutcome, ScoringUpdate};
use ecosort_scoring::{apply_update, CategoryCounts};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use tracing::debug;

use crate::database::{map_tr_err, Database};
use crate::queries::badges::select_catalog;
use crate::queries::profiles::select_profile;
use crate::queries::scans::insert_scan;
use crate::rows::{category_at, date_to_sql, timestamp_to_sql};

fn earned_badge_ids(conn: &Connection, user_id: &str) -> rusqlite::Result<HashSet<String>> {
    let mut stmt = conn.prepare_cached("SELECT badge_id FROM user_badges WHERE user_id = ?1")?;
    let rows = stmt.query_map(params![user_id], |row| row.get(0))?;
    rows.collect()
}

fn category_counts(conn: &Connection, user_id: &str) -> rusqlite::Result<CategoryCounts> {
    let mut stmt = conn
        .prepare_cached("SELECT category, scan_count FROM category_counts WHERE user_id = ?1")?;
    let rows = stmt.query_map(params![user_id], |row| {
        Ok((category_at(row, 0)?, row.get::<_, u32>(1)?))
    })?;
    rows.collect()
}

/// Reads, updates, and writes one user's progress inside `tx`.
///
/// Badge ids in the outcome are only those whose insert actually landed.
fn score_in_tx(tx: &Transaction<'_>, update: &ScoringUpdate) -> rusqlite::Result<ScoringOutcome> {
    let user_id = update.user_id.as_str();
    let now = timestamp_to_sql(&update.scanned_at);

    tx.execute(
        "INSERT OR IGNORE INTO profiles (user_id, created_at, updated_at)
         VALUES (?1, ?2, ?2)",
        params![user_id, now],
    )?;
    let before = select_profile(tx, user_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
    let earned = earned_badge_ids(tx, user_id)?;
    let counts = category_counts(tx, user_id)?;
    let catalog = select_catalog(tx)?;

    let (outcome, counts_after) = apply_update(&before, &counts, &earned, &catalog, update);
    let after = &outcome.profile;

    tx.execute(
        "UPDATE profiles SET eco_points = ?2, total_scans = ?3, streak_days = ?4,
             level = ?5, last_scan_date = ?6, updated_at = ?7
         WHERE user_id = ?1",
        params![
            user_id,
            after.eco_points,
            after.total_scans,
            after.streak_days,
            after.level,
            after.last_scan_date.as_ref().map(date_to_sql),
            timestamp_to_sql(&after.updated_at),
        ],
    )?;
    tx.execute(
        "INSERT INTO category_counts (user_id, category, scan_count) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, category) DO UPDATE SET scan_count = excluded.scan_count",
        params![
            user_id,
            update.category.as_str(),
            counts_after.get(update.category)
        ],
    )?;
    let mut new_badge_ids = Vec::with_capacity(outcome.new_badge_ids.len());
    for badge_id in &outcome.new_badge_ids {
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO user_badges (user_id, badge_id, earned_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, badge_id, now],
        )?;
        if inserted == 1 {
            new_badge_ids.push(badge_id.clone());
        }
    }
    Ok(ScoringOutcome {
        profile: outcome.profile,
        new_badge_ids,
    })
}

pub async fn apply_scoring(
    db: &Database,
    update: &ScoringUpdate,
) -> Result<ScoringOutcome, EcosortError> {
    let update = update.clone();
    db.connection()
        .call(move |conn| -> Result<ScoringOutcome, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let outcome = score_in_tx(&tx, &update)?;
            tx.commit()?;

            debug!(
                user_id = update.user_id.as_str(),
                eco_points = outcome.profile.eco_points,
                new_badges = outcome.new_badge_ids.len(),
                "scoring update committed"
            );
            Ok(outcome)
        })
        .await
        .map_err(map_tr_err)
}

/// History row and scoring update in one transaction.
///
/// Either both land or neither does, so a stored `points_earned` is always
/// reflected in the profile.
pub async fn record_scored_scan(
    db: &Database,
    event: &ScanEvent,
) -> Result<ScoringOutcome, EcosortError> {
    let event = event.clone();
    db.connection()
        .call(move |conn| -> Result<ScoringOutcome, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let scan_id = insert_scan(&tx, &event)?;
            let outcome = score_in_tx(&tx, &ScoringUpdate::from(&event))?;
            tx.commit()?;

            debug!(
                user_id = event.user_id.as_str(),
                scan_id,
                eco_points = outcome.profile.eco_points,
                new_badges = outcome.new_badge_ids.len(),
                "scored scan committed"
            );
            Ok(outcome)
        })
        .await
        .map_err(map_tr_err)
}
