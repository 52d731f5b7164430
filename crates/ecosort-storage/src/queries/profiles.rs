// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile reads and display-name updates.

use chrono::Utc;
use ecosort_core::{EcosortError, Profile, UserId};
use rusqlite::{params, Connection, OptionalExtension};

use crate::database::{map_tr_err, Database};
use crate::rows::{profile_from_row, timestamp_to_sql, PROFILE_COLUMNS};

/// Load a profile on an already-borrowed connection or transaction.
pub(crate) fn select_profile(conn: &Connection, user_id: &str) -> rusqlite::Result<Option<Profile>> {
    conn.query_row(
        &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
        params![user_id],
        profile_from_row,
    )
    .optional()
}

pub async fn get_profile(db: &Database, user_id: &UserId) -> Result<Option<Profile>, EcosortError> {
    let user_id = user_id.as_str().to_string();
    db.connection()
        .call(move |conn| select_profile(conn, &user_id))
        .await
        .map_err(map_tr_err)
}

/// Set the public name, creating an empty profile if the user has none yet.
///
/// `name` must already be normalized.
pub async fn set_display_name(
    db: &Database,
    user_id: &UserId,
    name: &str,
) -> Result<Profile, EcosortError> {
    let user_id = user_id.as_str().to_string();
    let name = name.to_string();
    let now = timestamp_to_sql(&Utc::now());
    db.connection()
        .call(move |conn| -> Result<Profile, rusqlite::Error> {
            conn.execute(
                "INSERT INTO profiles (user_id, display_name, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET
                     display_name = excluded.display_name,
                     updated_at = excluded.updated_at",
                params![user_id, name, now],
            )?;
            select_profile(conn, &user_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
        })
        .await
        .map_err(map_tr_err)
}
