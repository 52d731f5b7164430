// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the EcoSort scanner service.
//!
//! TOML configuration with strict `deny_unknown_fields` parsing, an XDG file
//! hierarchy, `ECOSORT_*` environment overrides, and miette diagnostics with
//! typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use ecosort_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use ecosort_core::EcosortError;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::EcosortConfig;

/// Environment variable consulted when `classifier.api_key` is unset.
pub const API_KEY_ENV: &str = "AI_GATEWAY_API_KEY";

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<EcosortConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources();
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<EcosortConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<EcosortConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Resolve the classification service key: config first, then `AI_GATEWAY_API_KEY`.
pub fn resolve_api_key(config: &EcosortConfig) -> Result<String, EcosortError> {
    resolve_api_key_with(config, std::env::var(API_KEY_ENV).ok())
}

fn resolve_api_key_with(
    config: &EcosortConfig,
    env_value: Option<String>,
) -> Result<String, EcosortError> {
    config
        .classifier
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| env_value.filter(|key| !key.trim().is_empty()))
        .ok_or_else(|| {
            EcosortError::Config(format!(
                "classification API key not found: set classifier.api_key or {API_KEY_ENV}"
            ))
        })
}

fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string("ecosort.toml") {
        let path = std::env::current_dir()
            .map(|d| d.join("ecosort.toml").display().to_string())
            .unwrap_or_else(|_| "ecosort.toml".to_string());
        sources.push((path, content));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("ecosort/ecosort.toml");
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    let system_path = std::path::Path::new("/etc/ecosort/ecosort.toml");
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_key_wins_over_env() {
        let mut config = EcosortConfig::default();
        config.classifier.api_key = Some("from-config".into());
        let key = resolve_api_key_with(&config, Some("from-env".into())).unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn env_key_used_when_config_unset() {
        let config = EcosortConfig::default();
        let key = resolve_api_key_with(&config, Some("from-env".into())).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn blank_keys_are_missing() {
        let mut config = EcosortConfig::default();
        config.classifier.api_key = Some("  ".into());
        let err = resolve_api_key_with(&config, Some(String::new())).unwrap_err();
        assert!(matches!(err, EcosortError::Config(msg) if msg.contains(API_KEY_ENV)));
    }
}
