// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vision-model waste classifier for EcoSort.
//!
//! Implements [`ClassificationProvider`] against an OpenAI-compatible chat
//! completions gateway. The image goes out as a base64 JPEG data URL next to
//! a fixed instruction prompt; the reply is normalized by [`parse`].

pub mod client;
pub mod parse;
pub mod prompt;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use ecosort_config::EcosortConfig;
use ecosort_core::error::EcosortError;
use ecosort_core::traits::{ClassificationProvider, PluginAdapter};
use ecosort_core::types::{AdapterType, ClassificationResult, HealthStatus, ImagePayload};
use tracing::{debug, info, warn};

use crate::client::GatewayClient;

/// Classifier backed by a multimodal chat model.
pub struct VisionClassifier {
    client: GatewayClient,
    model: String,
}

impl VisionClassifier {
    /// Builds a classifier from configuration.
    ///
    /// The API key comes from `classifier.api_key`, then `AI_GATEWAY_API_KEY`.
    pub fn new(config: &EcosortConfig) -> Result<Self, EcosortError> {
        let api_key = ecosort_config::resolve_api_key(config)?;
        let classifier = Self::with_key(
            &api_key,
            &config.classifier.base_url,
            &config.classifier.model,
            Duration::from_secs(config.classifier.timeout_secs),
        )?;
        info!(
            model = %config.classifier.model,
            endpoint = %classifier.client.endpoint(),
            "vision classifier initialized"
        );
        Ok(classifier)
    }

    /// Builds a classifier from explicit settings.
    pub fn with_key(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, EcosortError> {
        Ok(Self {
            client: GatewayClient::new(api_key, base_url, timeout)?,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl PluginAdapter for VisionClassifier {
    fn name(&self) -> &str {
        "vision"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, EcosortError> {
        // Probing the model would be billed.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EcosortError> {
        debug!("vision classifier shutting down");
        Ok(())
    }
}

#[async_trait]
impl ClassificationProvider for VisionClassifier {
    async fn classify(&self, image: &ImagePayload) -> Result<ClassificationResult, EcosortError> {
        let request = prompt::build_request(&self.model, image);
        debug!(bytes = image.encoded_len(), model = %self.model, "classifying image");

        let response = self.client.complete(&request).await?;
        let result = match response.first_content() {
            Some(content) => {
                debug!(content = %content, "model answer");
                parse::parse_classification(content)
            }
            None => {
                warn!("model returned no content, using unidentified result");
                parse::unidentified()
            }
        };

        info!(
            item = %result.item_name,
            category = %result.category,
            confidence = result.confidence,
            "image classified"
        );
        Ok(result)
    }
}
