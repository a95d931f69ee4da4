use crate::errors::BoardwatchError;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Board '{board_id}' not found in source")]
    BoardNotFound { board_id: String },

    #[error("Request to {source_name} timed out after {seconds}s")]
    Timeout { source_name: String, seconds: u64 },

    #[error("Failed to parse {what}: {message}")]
    ParseFailed { what: String, message: String },

    #[error("Source request failed: {message}")]
    RequestFailed { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl BoardwatchError for SourceError {
    fn error_code(&self) -> &'static str {
        match self {
            SourceError::BoardNotFound { .. } => "SOURCE_BOARD_NOT_FOUND",
            SourceError::Timeout { .. } => "SOURCE_TIMEOUT",
            SourceError::ParseFailed { .. } => "SOURCE_PARSE_FAILED",
            SourceError::RequestFailed { .. } => "SOURCE_REQUEST_FAILED",
            SourceError::IoError { .. } => "SOURCE_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, SourceError::BoardNotFound { .. })
    }
}
