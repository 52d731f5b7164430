// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock classification provider.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ecosort_core::types::{AdapterType, ClassificationResult, HealthStatus, ImagePayload};
use ecosort_core::{ClassificationProvider, EcosortError, PluginAdapter, WasteCategory};

/// A classifier that replays queued outcomes in FIFO order.
///
/// When the queue is empty it answers with [`MockClassifier::default_result`].
pub struct MockClassifier {
    replies: Arc<Mutex<VecDeque<Result<ClassificationResult, EcosortError>>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_results(results: Vec<ClassificationResult>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(results.into_iter().map(Ok).collect())),
            ..Self::new()
        }
    }

    /// Sleep before answering, to exercise cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_result(&self, result: ClassificationResult) {
        self.replies.lock().await.push_back(Ok(result));
    }

    pub async fn push_error(&self, error: EcosortError) {
        self.replies.lock().await.push_back(Err(error));
    }

    /// Number of `classify` calls that reached the classifier.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The answer used when nothing is queued.
    pub fn default_result() -> ClassificationResult {
        ClassificationResult::new(
            "Plastic bottle",
            WasteCategory::DryRecyclable,
            0.8,
            "Rinse and clean before disposal.",
        )
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockClassifier {
    fn name(&self) -> &str {
        "mock-classifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, EcosortError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EcosortError> {
        Ok(())
    }
}

#[async_trait]
impl ClassificationProvider for MockClassifier {
    async fn classify(&self, _image: &ImagePayload) -> Result<ClassificationResult, EcosortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Self::default_result()))
    }
}
