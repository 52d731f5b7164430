// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`ProgressStore`].

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use ecosort_config::model::StorageConfig;
use ecosort_core::types::normalize_display_name;
use ecosort_core::{
    AdapterType, Badge, EarnedBadge, EcosortError, HealthStatus, LeaderboardEntry, PluginAdapter,
    Profile, ProgressStore, ScanEvent, ScanHistoryEntry, ScoringOutcome, ScoringUpdate, UserId,
};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed progress store.
///
/// The database is opened by [`ProgressStore::initialize`], not by `new`.
pub struct SqliteProgressStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteProgressStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already-open database. `initialize` becomes an error.
    pub fn with_database(db: Database) -> Self {
        Self {
            config: StorageConfig {
                database_path: ":memory:".to_string(),
                wal_mode: false,
            },
            db: OnceCell::new_with(Some(db)),
        }
    }

    fn db(&self) -> Result<&Database, EcosortError> {
        self.db.get().ok_or_else(|| EcosortError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteProgressStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, EcosortError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("not initialized".to_string()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EcosortError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for SqliteProgressStore {
    async fn initialize(&self) -> Result<(), EcosortError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| EcosortError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite progress store initialized");
        Ok(())
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, EcosortError> {
        queries::profiles::get_profile(self.db()?, user_id).await
    }

    async fn set_display_name(
        &self,
        user_id: &UserId,
        display_name: &str,
    ) -> Result<Profile, EcosortError> {
        let name = normalize_display_name(display_name)?;
        queries::profiles::set_display_name(self.db()?, user_id, &name).await
    }

    async fn get_badge_catalog(&self) -> Result<Vec<Badge>, EcosortError> {
        queries::badges::get_badge_catalog(self.db()?).await
    }

    async fn get_earned_badges(&self, user_id: &UserId) -> Result<Vec<EarnedBadge>, EcosortError> {
        queries::badges::get_earned_badges(self.db()?, user_id).await
    }

    async fn get_scan_history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<ScanHistoryEntry>, EcosortError> {
        queries::scans::get_scan_history(self.db()?, user_id, limit).await
    }

    async fn record_scan(&self, event: &ScanEvent) -> Result<i64, EcosortError> {
        queries::scans::record_scan(self.db()?, event).await
    }

    async fn apply_scoring(&self, update: &ScoringUpdate) -> Result<ScoringOutcome, EcosortError> {
        queries::scoring::apply_scoring(self.db()?, update).await
    }

    async fn record_scored_scan(&self, event: &ScanEvent) -> Result<ScoringOutcome, EcosortError> {
        queries::scoring::record_scored_scan(self.db()?, event).await
    }

    async fn get_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, EcosortError> {
        queries::leaderboard::get_leaderboard(self.db()?, limit).await
    }
}
