// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only scan history.

use ecosort_core::{EcosortError, ScanEvent, ScanHistoryEntry, UserId};
use rusqlite::{params, Connection};

use crate::database::{map_tr_err, Database};
use crate::rows::{category_at, timestamp_at, timestamp_to_sql};

pub(crate) fn insert_scan(conn: &Connection, event: &ScanEvent) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO scan_history (user_id, item_name, category, bin_color, bin_type,
             disposal_tip, confidence, points_earned, scanned_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            event.user_id.as_str(),
            event.item_name,
            event.category.as_str(),
            event.bin_color,
            event.bin_type,
            event.disposal_tip,
            event.confidence,
            event.points_earned,
            timestamp_to_sql(&event.scanned_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Append a scan. Returns the new row id.
pub async fn record_scan(db: &Database, event: &ScanEvent) -> Result<i64, EcosortError> {
    let event = event.clone();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> { insert_scan(conn, &event) })
        .await
        .map_err(map_tr_err)
}

/// Most recent scans first.
pub async fn get_scan_history(
    db: &Database,
    user_id: &UserId,
    limit: u32,
) -> Result<Vec<ScanHistoryEntry>, EcosortError> {
    let user_id = user_id.as_str().to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<ScanHistoryEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, item_name, category, bin_color, bin_type,
                        disposal_tip, confidence, points_earned, scanned_at
                 FROM scan_history
                 WHERE user_id = ?1
                 ORDER BY scanned_at DESC, id DESC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![user_id, limit], |row| {
                Ok(ScanHistoryEntry {
                    id: row.get(0)?,
                    event: ScanEvent {
                        user_id: UserId(row.get(1)?),
                        item_name: row.get(2)?,
                        category: category_at(row, 3)?,
                        bin_color: row.get(4)?,
                        bin_type: row.get(5)?,
                        disposal_tip: row.get(6)?,
                        confidence: row.get(7)?,
                        points_earned: row.get(8)?,
                        scanned_at: timestamp_at(row, 9)?,
                    },
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
