// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Public ranking of named profiles.

use ecosort_core::{EcosortError, LeaderboardEntry, UserId};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

/// Top `limit` named profiles by eco points. Ties go to more scans, then user id.
pub async fn get_leaderboard(
    db: &Database,
    limit: u32,
) -> Result<Vec<LeaderboardEntry>, EcosortError> {
    db.connection()
        .call(move |conn| -> Result<Vec<LeaderboardEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT user_id, display_name, eco_points, level, total_scans
                 FROM profiles
                 WHERE display_name IS NOT NULL AND TRIM(display_name) <> ''
                 ORDER BY eco_points DESC, total_scans DESC, user_id
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok((
                    UserId(row.get(0)?),
                    row.get::<_, String>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, u32>(4)?,
                ))
            })?;
            let mut entries = Vec::new();
            for (rank, row) in (1u32..).zip(rows) {
                let (user_id, display_name, eco_points, level, total_scans) = row?;
                entries.push(LeaderboardEntry {
                    rank,
                    user_id,
                    display_name,
                    eco_points,
                    level,
                    total_scans,
                });
            }
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}
