// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Badge catalog and earned-badge reads.

use ecosort_core::{Badge, EarnedBadge, EcosortError, UserId};
use rusqlite::{params, Connection};

use crate::database::{map_tr_err, Database};
use crate::rows::{badge_from_row, timestamp_at, BADGE_COLUMNS};

/// Full catalog, `points_required` ascending with nulls first.
pub(crate) fn select_catalog(conn: &Connection) -> rusqlite::Result<Vec<Badge>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {BADGE_COLUMNS} FROM badges
         ORDER BY points_required IS NOT NULL, points_required, rowid"
    ))?;
    let rows = stmt.query_map([], |row| badge_from_row(row, 0))?;
    rows.collect()
}

pub async fn get_badge_catalog(db: &Database) -> Result<Vec<Badge>, EcosortError> {
    db.connection()
        .call(|conn| select_catalog(conn))
        .await
        .map_err(map_tr_err)
}

/// Badges held by a user, oldest first.
pub async fn get_earned_badges(
    db: &Database,
    user_id: &UserId,
) -> Result<Vec<EarnedBadge>, EcosortError> {
    let user_id = user_id.as_str().to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<EarnedBadge>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT ub.earned_at, b.id, b.name, b.description, b.icon,
                        b.points_required, b.scans_required, b.category_required
                 FROM user_badges ub
                 JOIN badges b ON b.id = ub.badge_id
                 WHERE ub.user_id = ?1
                 ORDER BY ub.earned_at, ub.id",
            )?;
            let rows = stmt.query_map(params![user_id], |row| {
                Ok(EarnedBadge {
                    earned_at: timestamp_at(row, 0)?,
                    badge: badge_from_row(row, 1)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
