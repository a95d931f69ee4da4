use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last observed state of one issue on one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSnapshot {
    pub key: String,
    pub status: String,
    pub assignee: String,
    /// Tracker-reported last-modified timestamp, stored verbatim.
    pub last_update: String,
    /// When this process last wrote the snapshot.
    pub last_seen: DateTime<Utc>,
}

/// All issue snapshots of one board, keyed by issue key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    #[serde(default)]
    pub board_id: String,
    #[serde(default)]
    pub issues: HashMap<String, IssueSnapshot>,
}

impl BoardSnapshot {
    pub fn new(board_id: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            issues: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn get(&self, key: &str) -> Option<&IssueSnapshot> {
        self.issues.get(key)
    }
}

/// Snapshots of every board plus the time of the last successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub boards: HashMap<String, BoardSnapshot>,
    #[serde(default = "Utc::now")]
    pub last_run: DateTime<Utc>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            boards: HashMap::new(),
            last_run: Utc::now(),
        }
    }
}

impl AppState {
    /// The board's snapshot, registering an empty one if none exists yet.
    pub fn board(&mut self, board_id: &str) -> &BoardSnapshot {
        self.board_mut(board_id)
    }

    fn board_mut(&mut self, board_id: &str) -> &mut BoardSnapshot {
        self.boards
            .entry(board_id.to_string())
            .or_insert_with(|| BoardSnapshot::new(board_id))
    }

    /// Read-only lookup that never registers a board.
    pub fn peek_board(&self, board_id: &str) -> Option<&BoardSnapshot> {
        self.boards.get(board_id)
    }

    /// Insert or replace the snapshot for `key`, stamping `last_seen` with now.
    pub fn update(
        &mut self,
        board_id: &str,
        key: &str,
        status: &str,
        assignee: &str,
        last_update: &str,
    ) {
        self.update_at(board_id, key, status, assignee, last_update, Utc::now());
    }

    pub(crate) fn update_at(
        &mut self,
        board_id: &str,
        key: &str,
        status: &str,
        assignee: &str,
        last_update: &str,
        seen_at: DateTime<Utc>,
    ) {
        self.board_mut(board_id).issues.insert(
            key.to_string(),
            IssueSnapshot {
                key: key.to_string(),
                status: status.to_string(),
                assignee: assignee.to_string(),
                last_update: last_update.to_string(),
                last_seen: seen_at,
            },
        );
    }

    /// True when no snapshot exists for `key` or its status/assignee differ.
    pub fn has_changed(&self, board_id: &str, key: &str, status: &str, assignee: &str) -> bool {
        match self.peek_board(board_id).and_then(|b| b.get(key)) {
            Some(prev) => prev.status != status || prev.assignee != assignee,
            None => true,
        }
    }
}
