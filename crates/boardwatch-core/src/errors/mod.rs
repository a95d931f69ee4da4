use std::error::Error;

/// Base trait for all application errors
pub trait BoardwatchError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

impl BoardwatchError for boardwatch_config::ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            boardwatch_config::ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            boardwatch_config::ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            boardwatch_config::ConfigError::DuplicateBoard { .. } => "DUPLICATE_BOARD",
            boardwatch_config::ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        !matches!(self, boardwatch_config::ConfigError::IoError { .. })
    }
}
