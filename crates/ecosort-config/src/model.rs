// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! Every section uses `#[serde(deny_unknown_fields)]` so typos are rejected
//! at startup instead of silently falling back to defaults.

use serde::{Deserialize, Serialize};

/// Top-level EcoSort configuration. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EcosortConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Vision classification service.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Progress store.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Prometheus exposition.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Vision classification service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Bearer token. `None` falls back to the `AI_GATEWAY_API_KEY` env var.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible gateway (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Vision-capable model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://ai.gateway.lovable.dev/v1".to_string()
}

fn default_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// SQLite progress store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journaling.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("ecosort").join("ecosort.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("ecosort.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
        }
    }
}

fn default_metrics_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_gateway() {
        let config = EcosortConfig::default();
        assert_eq!(config.classifier.model, "google/gemini-2.5-flash");
        assert!(config.classifier.base_url.starts_with("https://"));
        assert!(config.classifier.api_key.is_none());
        assert_eq!(config.server.port, 8080);
        assert!(config.storage.wal_mode);
        assert!(config.storage.database_path.ends_with("ecosort.db"));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: EcosortConfig = toml::from_str("[server]\nport = 3000\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(toml::from_str::<EcosortConfig>("[telemetry]\nenabled = true\n").is_err());
    }
}
