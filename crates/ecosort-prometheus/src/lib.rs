// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics for EcoSort.
//!
//! Installs the `metrics-exporter-prometheus` recorder and renders the text
//! exposition served at `/metrics`.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use ecosort_core::traits::adapter::PluginAdapter;
use ecosort_core::types::{AdapterType, HealthStatus};
use ecosort_core::EcosortError;

pub use recording::{
    record_badges, record_classification_failure, record_classification_latency,
    record_persistence_failure, record_points, record_scan, register_metrics,
};

/// Owner of the process-wide Prometheus recorder.
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Install the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process; a second call errors.
    pub fn new() -> Result<Self, EcosortError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            EcosortError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();
        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, EcosortError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EcosortError> {
        Ok(())
    }
}
