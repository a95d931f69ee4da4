use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a notification stays highlighted.
pub fn highlight_window() -> Duration {
    Duration::hours(2)
}

/// How long a notification stays in the queue at all.
pub fn retention_window() -> Duration {
    Duration::hours(24)
}

/// Retention stage of a notification, ordered by age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionState {
    Highlighted,
    Historical,
    Purged,
}

impl RetentionState {
    /// Stage of something detected at `detected_at`, evaluated at `now`.
    pub fn at(detected_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let age = now - detected_at;
        if age >= retention_window() {
            RetentionState::Purged
        } else if age >= highlight_window() {
            RetentionState::Historical
        } else {
            RetentionState::Highlighted
        }
    }
}

impl std::fmt::Display for RetentionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetentionState::Highlighted => write!(f, "highlighted"),
            RetentionState::Historical => write!(f, "historical"),
            RetentionState::Purged => write!(f, "purged"),
        }
    }
}

/// One detected difference between two snapshots of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub board_id: String,
    pub issue_key: String,
    /// Issue summary as it was when the change was detected.
    pub summary: String,
    /// Human-readable description of the new state.
    pub change: String,
    pub detected_at: DateTime<Utc>,
    pub highlighted: bool,
}

impl ChangeNotification {
    pub fn new(
        board_id: impl Into<String>,
        issue_key: impl Into<String>,
        summary: impl Into<String>,
        status: &str,
        assignee: &str,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            issue_key: issue_key.into(),
            summary: summary.into(),
            change: describe_change(status, assignee),
            detected_at,
            highlighted: true,
        }
    }

    /// Retention stage at `now`, ignoring the stored flag.
    pub fn retention_at(&self, now: DateTime<Utc>) -> RetentionState {
        RetentionState::at(self.detected_at, now)
    }

    /// Highlighted only while the flag is set and the entry is younger than the window.
    ///
    /// Between sweeps the stored flag can lag behind the clock; this never does.
    pub fn is_highlighted_at(&self, now: DateTime<Utc>) -> bool {
        self.highlighted && self.retention_at(now) == RetentionState::Highlighted
    }
}

pub fn describe_change(status: &str, assignee: &str) -> String {
    format!("Status: {}, Assignee: {}", status, assignee)
}
