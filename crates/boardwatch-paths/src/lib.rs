use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("home directory not found: set the $HOME environment variable")]
    HomeNotFound,
}

/// Centralized path construction for the `~/.boardwatch/` directory layout.
///
/// Single source of truth for every path under `~/.boardwatch/`. Use `resolve()`
/// in production code and `from_dir()` in tests.
#[derive(Debug, Clone)]
pub struct BoardwatchPaths {
    base_dir: PathBuf,
}

impl BoardwatchPaths {
    /// Resolve paths from the user's home directory (`~/.boardwatch`).
    pub fn resolve() -> Result<Self, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeNotFound)?;
        Ok(Self {
            base_dir: home.join(".boardwatch"),
        })
    }

    /// Create paths from an explicit base directory. Use in tests.
    pub fn from_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve `~/.boardwatch`, falling back to `/tmp/.boardwatch` when the
    /// home directory cannot be determined.
    pub fn resolve_or_tmp() -> Self {
        Self::resolve().unwrap_or_else(|_| Self::from_dir(PathBuf::from("/tmp/.boardwatch")))
    }

    /// The base `~/.boardwatch` directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    // --- Top-level files ---

    /// Persisted snapshot store (`state.json`).
    pub fn state_file(&self) -> PathBuf {
        self.base_dir.join("state.json")
    }

    pub fn user_config(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    // --- Top-level subdirectories ---

    /// Default directory for board exports read by the export-dir issue source.
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    // --- Project-level paths ---

    pub fn project_config(project_root: &Path) -> PathBuf {
        project_root.join(".boardwatch").join("config.toml")
    }
}
