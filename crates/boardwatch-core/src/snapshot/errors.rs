use crate::errors::BoardwatchError;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to serialize state: {source}")]
    SerializeFailed {
        #[from]
        source: serde_json::Error,
    },

    #[error("Failed to write state file '{}': {source}", path.display())]
    WriteFailed {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

impl BoardwatchError for StateError {
    fn error_code(&self) -> &'static str {
        match self {
            StateError::SerializeFailed { .. } => "STATE_SERIALIZE_FAILED",
            StateError::WriteFailed { .. } => "STATE_WRITE_FAILED",
        }
    }
}
