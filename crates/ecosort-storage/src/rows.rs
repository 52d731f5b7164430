// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping and text encodings for timestamps, dates, and categories.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use ecosort_core::{Badge, Profile, UserId, WasteCategory};
use rusqlite::types::Type;
use rusqlite::Row;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) const PROFILE_COLUMNS: &str = "user_id, display_name, eco_points, total_scans, \
     streak_days, level, last_scan_date, created_at, updated_at";

pub(crate) const BADGE_COLUMNS: &str =
    "id, name, description, icon, points_required, scans_required, category_required";

pub(crate) fn timestamp_to_sql(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn date_to_sql(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn conversion_err<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

pub(crate) fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, e))
}

fn date_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| NaiveDate::parse_from_str(&t, DATE_FORMAT).map_err(|e| conversion_err(idx, e)))
        .transpose()
}

pub(crate) fn category_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<WasteCategory> {
    let text: String = row.get(idx)?;
    text.parse().map_err(|e| conversion_err(idx, e))
}

fn optional_category_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<WasteCategory>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| t.parse().map_err(|e| conversion_err(idx, e)))
        .transpose()
}

/// Map a row selected with [`PROFILE_COLUMNS`].
pub(crate) fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        user_id: UserId(row.get(0)?),
        display_name: row.get(1)?,
        eco_points: row.get(2)?,
        total_scans: row.get(3)?,
        streak_days: row.get(4)?,
        level: row.get(5)?,
        last_scan_date: date_at(row, 6)?,
        created_at: timestamp_at(row, 7)?,
        updated_at: timestamp_at(row, 8)?,
    })
}

/// Map a row selected with [`BADGE_COLUMNS`], starting at column `offset`.
pub(crate) fn badge_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Badge> {
    Ok(Badge {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        description: row.get(offset + 2)?,
        icon: row.get(offset + 3)?,
        points_required: row.get(offset + 4)?,
        scans_required: row.get(offset + 5)?,
        category_required: optional_category_at(row, offset + 6)?,
    })
}
