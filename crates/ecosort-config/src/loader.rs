// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading with Figment.
//!
//! `./ecosort.toml` > `~/.config/ecosort/ecosort.toml` > `/etc/ecosort/ecosort.toml`,
//! with `ECOSORT_*` environment variables on top.

#![allow(clippy::result_large_err)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::EcosortConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ecosort/ecosort.toml`
/// 3. `~/.config/ecosort/ecosort.toml`
/// 4. `./ecosort.toml`
/// 5. `ECOSORT_*` environment variables
pub fn load_config() -> Result<EcosortConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<EcosortConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EcosortConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EcosortConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EcosortConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(EcosortConfig::default()))
        .merge(Toml::file("/etc/ecosort/ecosort.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ecosort/ecosort.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ecosort.toml"))
        .merge(env_provider())
}

/// `ECOSORT_CLASSIFIER_API_KEY` must become `classifier.api_key`, so sections
/// are mapped explicitly instead of splitting on every underscore.
fn env_provider() -> Env {
    Env::prefixed("ECOSORT_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 5] = ["service", "server", "classifier", "storage", "metrics"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("classifier_api_key"), "classifier.api_key");
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("service_log_level"), "service.log_level");
    }

    #[test]
    fn unmapped_keys_pass_through() {
        assert_eq!(map_env_key("unrelated"), "unrelated");
        assert_eq!(map_env_key("serverless"), "serverless");
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("ecosort.toml", "[server]\nport = 9000\n")?;
            jail.set_env("ECOSORT_SERVER_PORT", "9100");
            jail.set_env("ECOSORT_CLASSIFIER_MODEL", "google/gemini-2.5-pro");
            let config = load_config_from_path(Path::new("ecosort.toml"))?;
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.classifier.model, "google/gemini-2.5-pro");
            Ok(())
        });
    }
}
