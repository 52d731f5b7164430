// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks run after deserialization.

use crate::diagnostic::ConfigError;
use crate::model::EcosortConfig;

const MAX_TIMEOUT_SECS: u64 = 600;

/// Validate a deserialized configuration.
///
/// Collects every problem rather than stopping at the first.
pub fn validate_config(config: &EcosortConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::invalid("server.host", "must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err() && !is_hostname(host) {
        errors.push(ConfigError::invalid(
            "server.host",
            format!("`{host}` is not a valid IP address or hostname"),
        ));
    }

    if config.server.port == 0 {
        errors.push(ConfigError::invalid("server.port", "must be between 1 and 65535"));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::invalid("storage.database_path", "must not be empty"));
    }

    let timeout = config.classifier.timeout_secs;
    if !(1..=MAX_TIMEOUT_SECS).contains(&timeout) {
        errors.push(ConfigError::invalid(
            "classifier.timeout_secs",
            format!("must be between 1 and {MAX_TIMEOUT_SECS}, got {timeout}"),
        ));
    }

    let base_url = config.classifier.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::invalid(
            "classifier.base_url",
            format!("`{base_url}` must start with http:// or https://"),
        ));
    }

    if config.classifier.model.trim().is_empty() {
        errors.push(ConfigError::invalid("classifier.model", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_hostname(host: &str) -> bool {
    host.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(errors: &[ConfigError]) -> Vec<&str> {
        errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::Validation { field, .. } => Some(field.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&EcosortConfig::default()).is_ok());
    }

    #[test]
    fn hostnames_and_addresses_accepted() {
        for host in ["0.0.0.0", "::1", "localhost", "scanner.internal"] {
            let mut config = EcosortConfig::default();
            config.server.host = host.to_string();
            assert!(validate_config(&config).is_ok(), "{host}");
        }
    }

    #[test]
    fn bad_host_rejected() {
        let mut config = EcosortConfig::default();
        config.server.host = "not a host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(fields(&errors), vec!["server.host"]);
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = EcosortConfig::default();
        config.server.port = 0;
        config.storage.database_path = "  ".to_string();
        config.classifier.timeout_secs = 0;
        config.classifier.base_url = "ftp://gateway".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec![
                "server.port",
                "storage.database_path",
                "classifier.timeout_secs",
                "classifier.base_url",
            ]
        );
    }

    #[test]
    fn timeout_upper_bound() {
        let mut config = EcosortConfig::default();
        config.classifier.timeout_secs = 600;
        assert!(validate_config(&config).is_ok());
        config.classifier.timeout_secs = 601;
        assert!(validate_config(&config).is_err());
    }
}
