use std::io;

use boardwatch_core::{SourceError, StateError};

/// All error types for the boardwatch-daemon crate.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("board index {index} out of range ({count} boards configured)")]
    BoardIndexOutOfRange { index: usize, count: usize },

    #[error("board not configured: {0}")]
    UnknownBoard(String),

    #[error("no boards configured")]
    NoBoards,

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("background task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DaemonError {
    /// Stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            DaemonError::BoardIndexOutOfRange { .. } => "board_index_out_of_range",
            DaemonError::UnknownBoard(_) => "unknown_board",
            DaemonError::NoBoards => "no_boards",
            DaemonError::Source(_) => "source_error",
            DaemonError::State(_) => "state_error",
            DaemonError::TaskFailed(_) => "task_failed",
            DaemonError::Io(_) => "io_error",
        }
    }

    /// Whether this error is caused by user input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DaemonError::BoardIndexOutOfRange { .. }
                | DaemonError::UnknownBoard(_)
                | DaemonError::NoBoards
        )
    }
}

impl From<tokio::task::JoinError> for DaemonError {
    fn from(e: tokio::task::JoinError) -> Self {
        DaemonError::TaskFailed(e.to_string())
    }
}
