//! Configuration types.
//!
//! Every section is optional in the TOML file. Scalar settings are stored as
//! `Option` so the user/project hierarchy can tell "unset" from "set to the
//! default value"; accessor methods apply the defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Top-level configuration (`~/.boardwatch/config.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardwatchConfig {
    /// Base URL of the issue tracker. Informational; sources may use it for links.
    #[serde(default)]
    pub tracker_url: Option<String>,

    /// Boards to poll, in display order.
    #[serde(default)]
    pub boards: Vec<BoardConfig>,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub source: SourceConfig,
}

/// One polled board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl BoardConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
        }
    }

    /// Name shown to users; falls back to the id when no name is configured.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// `[polling]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between timer-driven refreshes of every board. Default: 300
    #[serde(default)]
    pub refresh_interval_secs: Option<u64>,

    /// Seconds between aging sweeps of the change queue. Default: 30
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,

    /// Per-request timeout for tracker calls. Default: 30
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Redirect the active board to boards that report new changes. Default: true
    #[serde(default)]
    pub auto_switch: Option<bool>,

    /// Delay before an automatic board switch, in milliseconds. Default: 1000
    #[serde(default)]
    pub auto_switch_delay_ms: Option<u64>,
}

impl PollingConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(
            self.refresh_interval_secs
                .unwrap_or_else(defaults::refresh_interval_secs),
        )
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(
            self.sweep_interval_secs
                .unwrap_or_else(defaults::sweep_interval_secs),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or_else(defaults::request_timeout_secs),
        )
    }

    pub fn auto_switch(&self) -> bool {
        self.auto_switch.unwrap_or_else(defaults::auto_switch)
    }

    pub fn auto_switch_delay(&self) -> Duration {
        Duration::from_millis(
            self.auto_switch_delay_ms
                .unwrap_or_else(defaults::auto_switch_delay_ms),
        )
    }
}

/// `[state]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    /// State file location. Default: `~/.boardwatch/state.json`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StateConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| boardwatch_paths::BoardwatchPaths::resolve_or_tmp().state_file())
    }
}

/// `[source]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding per-board exports. Default: `~/.boardwatch/exports`
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl SourceConfig {
    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| boardwatch_paths::BoardwatchPaths::resolve_or_tmp().exports_dir())
    }
}
