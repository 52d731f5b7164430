// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification provider trait for vision-model integrations.

use async_trait::async_trait;

use crate::error::EcosortError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ClassificationResult, ImagePayload};

/// Adapter for the external multimodal model that identifies a waste item.
///
/// Implementations must normalize whatever the model says into the closed
/// taxonomy and must recover from malformed output on their own. Only
/// transport-level failures are reported as errors:
/// [`EcosortError::RateLimited`], [`EcosortError::QuotaExhausted`], or
/// [`EcosortError::Upstream`].
#[async_trait]
pub trait ClassificationProvider: PluginAdapter {
    /// Classifies a single captured image.
    async fn classify(&self, image: &ImagePayload) -> Result<ClassificationResult, EcosortError>;
}
