// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! EcoSort - waste-sorting scanner service.
//!
//! This is the binary entry point: the HTTP service plus a few one-shot
//! commands for classifying a photo and inspecting progress from a shell.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod serve;
mod shutdown;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ecosort_config::EcosortConfig;

/// EcoSort - classify waste items and track eco points.
#[derive(Parser, Debug)]
#[command(name = "ecosort", version, about, long_about = None)]
struct Cli {
    /// Load this TOML file instead of the standard config locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API.
    Serve,
    /// Classify a photo and print the result as JSON.
    Classify {
        /// JPEG image to classify.
        image: PathBuf,
        /// Credit the scan to this user.
        #[arg(long)]
        user: Option<String>,
    },
    /// Print a user's profile and badges.
    Profile {
        user: String,
    },
    /// Print the top named users.
    Leaderboard {
        #[arg(long, default_value_t = ecosort_scan::DEFAULT_LEADERBOARD_LIMIT)]
        limit: u32,
    },
}

fn load_config(path: Option<&PathBuf>) -> Option<EcosortConfig> {
    let loaded = match path {
        Some(path) => ecosort_config::load_and_validate_path(path),
        None => ecosort_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => Some(config),
        Err(errors) => {
            ecosort_config::render_errors(&errors);
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(config) = load_config(cli.config.as_ref()) else {
        return ExitCode::FAILURE;
    };

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Classify { image, user } => {
            serve::init_tracing(&config.service.log_level);
            commands::run_classify(&config, &image, user).await
        }
        Commands::Profile { user } => {
            serve::init_tracing(&config.service.log_level);
            commands::run_profile(&config, &user).await
        }
        Commands::Leaderboard { limit } => {
            serve::init_tracing(&config.service.log_level);
            commands::run_leaderboard(&config, limit).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ecosort: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = ecosort_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn classify_accepts_optional_user() {
        let cli = Cli::try_parse_from(["ecosort", "classify", "bottle.jpg", "--user", "alice"])
            .unwrap();
        match cli.command {
            Commands::Classify { image, user } => {
                assert_eq!(image, PathBuf::from("bottle.jpg"));
                assert_eq!(user.as_deref(), Some("alice"));
            }
            other => panic!("expected classify, got {other:?}"),
        }
    }

    #[test]
    fn leaderboard_limit_defaults() {
        let cli = Cli::try_parse_from(["ecosort", "leaderboard"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Leaderboard { limit } if limit == ecosort_scan::DEFAULT_LEADERBOARD_LIMIT
        ));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["ecosort", "serve", "--config", "/tmp/ecosort.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/ecosort.toml")));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["ecosort"]).is_err());
    }
}
