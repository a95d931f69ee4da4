//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.boardwatch/config.toml` (global user preferences)
//! 3. **Project config** - `./.boardwatch/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority, applied by the binary)

use std::fs;
use std::path::Path;

use boardwatch_paths::BoardwatchPaths;

use crate::errors::ConfigError;
use crate::types::{BoardwatchConfig, PollingConfig, SourceConfig, StateConfig};
use crate::validation::validate_config;

/// Load configuration from the hierarchy of config files.
///
/// Missing config files are not errors; parse and validation failures are.
pub fn load_hierarchy() -> Result<BoardwatchConfig, ConfigError> {
    let paths = BoardwatchPaths::resolve_or_tmp();
    let project_root = std::env::current_dir()?;
    load_hierarchy_from(&paths.user_config(), &BoardwatchPaths::project_config(&project_root))
}

/// Load and merge an explicit user/project pair of config files.
pub fn load_hierarchy_from(
    user_path: &Path,
    project_path: &Path,
) -> Result<BoardwatchConfig, ConfigError> {
    let mut config = BoardwatchConfig::default();

    if let Some(user_config) = load_config_file(user_path)? {
        config = merge_configs(config, user_config);
    }

    if let Some(project_config) = load_config_file(project_path)? {
        config = merge_configs(config, project_config);
    }

    validate_config(&config)?;

    tracing::debug!(
        event = "config.load_completed",
        boards = config.boards.len(),
        user_config = %user_path.display(),
        project_config = %project_path.display(),
    );

    Ok(config)
}

/// Load a single configuration file. Returns `Ok(None)` when the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<BoardwatchConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(config))
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional scalars are replaced only when the override sets them. A non-empty
/// override board list replaces the base list wholesale so board order stays
/// under the control of a single file.
pub fn merge_configs(base: BoardwatchConfig, override_config: BoardwatchConfig) -> BoardwatchConfig {
    BoardwatchConfig {
        tracker_url: override_config.tracker_url.or(base.tracker_url),
        boards: if override_config.boards.is_empty() {
            base.boards
        } else {
            override_config.boards
        },
        polling: PollingConfig {
            refresh_interval_secs: override_config
                .polling
                .refresh_interval_secs
                .or(base.polling.refresh_interval_secs),
            sweep_interval_secs: override_config
                .polling
                .sweep_interval_secs
                .or(base.polling.sweep_interval_secs),
            request_timeout_secs: override_config
                .polling
                .request_timeout_secs
                .or(base.polling.request_timeout_secs),
            auto_switch: override_config.polling.auto_switch.or(base.polling.auto_switch),
            auto_switch_delay_ms: override_config
                .polling
                .auto_switch_delay_ms
                .or(base.polling.auto_switch_delay_ms),
        },
        state: StateConfig {
            path: override_config.state.path.or(base.state.path),
        },
        source: SourceConfig {
            export_dir: override_config.source.export_dir.or(base.source.export_dir),
        },
    }
}
