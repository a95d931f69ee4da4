//! Configuration validation logic.
//!
//! Ensures values are usable before the poller starts.

use std::collections::HashSet;

use crate::errors::ConfigError;
use crate::types::BoardwatchConfig;

/// Validate a BoardwatchConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - Board ids must be non-empty and unique
/// - Refresh interval, sweep interval and request timeout must be positive
pub fn validate_config(config: &BoardwatchConfig) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for board in &config.boards {
        if board.id.trim().is_empty() {
            return Err(ConfigError::InvalidConfiguration {
                message: "board id cannot be empty".to_string(),
            });
        }
        if !seen.insert(board.id.as_str()) {
            return Err(ConfigError::DuplicateBoard {
                id: board.id.clone(),
            });
        }
    }

    let polling = &config.polling;
    for (name, value) in [
        ("refresh_interval_secs", polling.refresh_interval_secs),
        ("sweep_interval_secs", polling.sweep_interval_secs),
        ("request_timeout_secs", polling.request_timeout_secs),
    ] {
        if value == Some(0) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("polling.{} must be > 0", name),
            });
        }
    }

    Ok(())
}
