//! # boardwatch-config
//!
//! TOML configuration types, loading, and validation for boardwatch.
//!
//! Depends only on `boardwatch-paths`.

mod defaults;
mod loading;
mod validation;

pub mod errors;
pub mod types;

// Public API re-exports
pub use errors::ConfigError;
pub use loading::{load_config_file, load_hierarchy, load_hierarchy_from, merge_configs};
pub use types::{BoardConfig, BoardwatchConfig, PollingConfig, SourceConfig, StateConfig};
pub use validation::validate_config;

impl BoardwatchConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }

    /// Index of a board in display order.
    pub fn board_index(&self, board_id: &str) -> Option<usize> {
        self.boards.iter().position(|b| b.id == board_id)
    }
}
