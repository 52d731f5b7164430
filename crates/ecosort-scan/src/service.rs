// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The scan pipeline and the progress queries served next to it.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use ecosort_core::{
    Badge, ClassificationProvider, ClassificationResult, EarnedBadge, EcosortError, ImagePayload,
    LeaderboardEntry, Profile, ProgressStore, ScanEvent, ScanHistoryEntry, UserId,
};
use ecosort_prometheus::recording;
use ecosort_scoring::{policy_for, score};

use crate::context::ScanContext;
use crate::outcome::{ScanOutcome, ScanRequest};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Reward credited for a persisted scan.
struct Reward {
    points: u32,
    badges: Vec<Badge>,
}

/// Classifies images and credits user progress.
pub struct ScanService {
    classifier: Arc<dyn ClassificationProvider>,
    store: Arc<dyn ProgressStore>,
    catalog: OnceCell<Vec<Badge>>,
    clock: Clock,
}

impl ScanService {
    pub fn new(classifier: Arc<dyn ClassificationProvider>, store: Arc<dyn ProgressStore>) -> Self {
        Self {
            classifier,
            store,
            catalog: OnceCell::new(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used to stamp scans.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn store(&self) -> &Arc<dyn ProgressStore> {
        &self.store
    }

    /// Run one scan.
    ///
    /// Classification errors are returned to the caller. Once an image has
    /// been classified, storage failures are logged and the classification is
    /// still returned, without `points_earned` or `new_badges`.
    pub async fn submit(
        &self,
        ctx: &ScanContext,
        request: ScanRequest,
    ) -> Result<ScanOutcome, EcosortError> {
        let image = ImagePayload::from_base64(&request.image_base64)?;
        let user_id = request.user_id.filter(|id| !id.as_str().trim().is_empty());
        debug!(
            request_id = %ctx.request_id,
            image_bytes = image.encoded_len(),
            signed_in = user_id.is_some(),
            "scan received"
        );

        let classification = self.classify(ctx, &image).await?;
        recording::record_scan(classification.category);
        let policy = policy_for(classification.category);
        let mut outcome = ScanOutcome::classified(classification, policy);

        let Some(user_id) = user_id else {
            return Ok(outcome);
        };
        if ctx.cancel.is_cancelled() {
            info!(request_id = %ctx.request_id, "caller went away before persistence, discarding scan");
            return Err(EcosortError::Cancelled);
        }

        match self.persist(&user_id, &outcome).await {
            Ok(reward) => {
                outcome.points_earned = Some(reward.points);
                outcome.new_badges = Some(reward.badges);
            }
            Err(e) => {
                warn!(
                    request_id = %ctx.request_id,
                    user_id = %user_id,
                    error = %e,
                    "failed to save scan progress, returning classification only"
                );
                recording::record_persistence_failure();
            }
        }
        Ok(outcome)
    }

    async fn classify(
        &self,
        ctx: &ScanContext,
        image: &ImagePayload,
    ) -> Result<ClassificationResult, EcosortError> {
        let started = Instant::now();
        let result = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                info!(request_id = %ctx.request_id, "scan cancelled during classification");
                return Err(EcosortError::Cancelled);
            }
            result = self.classifier.classify(image) => result,
        };
        recording::record_classification_latency(started.elapsed().as_secs_f64());

        match result {
            Ok(classification) => {
                info!(
                    request_id = %ctx.request_id,
                    category = %classification.category,
                    confidence = classification.confidence,
                    "item classified"
                );
                Ok(classification)
            }
            Err(e) => {
                warn!(request_id = %ctx.request_id, kind = e.kind(), error = %e, "classification failed");
                recording::record_classification_failure(e.kind());
                Err(e)
            }
        }
    }

    async fn persist(&self, user_id: &UserId, outcome: &ScanOutcome) -> Result<Reward, EcosortError> {
        let classification = &outcome.classification;
        let points = score(classification.category, classification.confidence);
        let scanned_at = (self.clock)();

        let event = ScanEvent {
            user_id: user_id.clone(),
            item_name: classification.item_name.clone(),
            category: classification.category,
            bin_color: outcome.bin_color.clone(),
            bin_type: outcome.bin_type.clone(),
            disposal_tip: classification.disposal_tip.clone(),
            confidence: classification.confidence,
            points_earned: points,
            scanned_at,
        };

        if classification.category.is_unknown() {
            self.store.record_scan(&event).await?;
            debug!(user_id = %user_id, "unknown item recorded without scoring");
            return Ok(Reward {
                points: 0,
                badges: Vec::new(),
            });
        }

        let scored = self.store.record_scored_scan(&event).await?;
        recording::record_points(points);
        recording::record_badges(scored.new_badge_ids.len());
        if !scored.new_badge_ids.is_empty() {
            info!(user_id = %user_id, badges = ?scored.new_badge_ids, "badges earned");
        }

        Ok(Reward {
            points,
            badges: self.resolve_badges(&scored.new_badge_ids).await,
        })
    }

    /// Full records for the given ids, in the given order.
    ///
    /// The reward is already committed at this point, so a catalog read
    /// failure only drops the badge details.
    async fn resolve_badges(&self, ids: &[String]) -> Vec<Badge> {
        if ids.is_empty() {
            return Vec::new();
        }
        let catalog = match self
            .catalog
            .get_or_try_init(|| self.store.get_badge_catalog())
            .await
        {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "failed to load badge catalog for new badges");
                return Vec::new();
            }
        };
        ids.iter()
            .filter_map(|id| catalog.iter().find(|badge| &badge.id == id).cloned())
            .collect()
    }

    pub async fn profile(&self, user_id: &UserId) -> Result<Option<Profile>, EcosortError> {
        self.store.get_profile(user_id).await
    }

    pub async fn set_display_name(
        &self,
        user_id: &UserId,
        display_name: &str,
    ) -> Result<Profile, EcosortError> {
        self.store.set_display_name(user_id, display_name).await
    }

    pub async fn badge_catalog(&self) -> Result<Vec<Badge>, EcosortError> {
        self.store.get_badge_catalog().await
    }

    pub async fn earned_badges(&self, user_id: &UserId) -> Result<Vec<EarnedBadge>, EcosortError> {
        self.store.get_earned_badges(user_id).await
    }

    pub async fn history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<ScanHistoryEntry>, EcosortError> {
        self.store.get_scan_history(user_id, limit).await
    }

    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, EcosortError> {
        self.store.get_leaderboard(limit).await
    }
}
