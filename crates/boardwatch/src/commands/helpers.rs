use std::path::{Path, PathBuf};

use boardwatch_config::{BoardwatchConfig, load_config_file, merge_configs};
use clap::ArgMatches;
use tracing::{info, warn};

/// Load the config hierarchy and apply the global `--config` and `--state` flags.
///
/// Unlike a missing file, a config that fails to parse or validate is an
/// error: polling the wrong boards silently is worse than not starting.
pub(crate) fn load_config(
    matches: &ArgMatches,
) -> Result<BoardwatchConfig, Box<dyn std::error::Error>> {
    let config = match BoardwatchConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Could not load config: {}", e);
            eprintln!(
                "   Tip: Check ~/.boardwatch/config.toml and ./.boardwatch/config.toml for syntax errors."
            );
            warn!(event = "cli.config.load_failed", error = %e);
            return Err(e.into());
        }
    };

    let extra = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let state = matches.get_one::<PathBuf>("state").cloned();
    let config = apply_overrides(config, extra, state)?;

    if let Err(e) = config.validate() {
        eprintln!("❌ Invalid configuration: {}", e);
        warn!(event = "cli.config.invalid", error = %e);
        return Err(e.into());
    }

    info!(
        event = "cli.config.load_completed",
        boards = config.boards.len(),
    );
    Ok(config)
}

/// Layer an explicit config file and a state path override over `config`.
pub(crate) fn apply_overrides(
    config: BoardwatchConfig,
    extra: Option<&Path>,
    state: Option<PathBuf>,
) -> Result<BoardwatchConfig, Box<dyn std::error::Error>> {
    let mut config = match extra {
        Some(path) => match load_config_file(path) {
            Ok(Some(file)) => merge_configs(config, file),
            Ok(None) => {
                eprintln!("❌ Config file not found: {}", path.display());
                return Err(format!("config file not found: {}", path.display()).into());
            }
            Err(e) => {
                eprintln!("❌ Could not load config: {}", e);
                return Err(e.into());
            }
        },
        None => config,
    };

    if let Some(path) = state {
        config.state.path = Some(path);
    }
    Ok(config)
}

/// Truncate to `max` characters, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
