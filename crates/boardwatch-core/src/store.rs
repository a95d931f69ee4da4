//! Shared state holder for snapshots, the change queue and fetched issues.
//!
//! Every mutation happens under one lock, so concurrent board refreshes
//! serialize their detect + sweep + persist step and never lose updates.
//! Read accessors hand out owned copies.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::activity::{ActivityEntry, build_timeline};
use crate::changes::{ChangeNotification, ChangeQueue, SweepOutcome};
use crate::detector::{DetectionOutcome, detect_changes};
use crate::snapshot::{AppState, BoardSnapshot, IssueSnapshot, StateError, load_state, save_state};
use crate::tracker::Issue;

/// Result of applying one board's fetched batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub board_id: String,
    pub detection: DetectionOutcome,
    /// False when the store has a state file and writing it failed.
    pub persisted: bool,
}

impl RefreshOutcome {
    pub fn has_notifications(&self) -> bool {
        self.detection.has_notifications()
    }
}

/// Per-board counts for overview displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub board_id: String,
    pub issues: usize,
    pub highlighted: usize,
    pub by_status: BTreeMap<String, usize>,
}

#[derive(Debug, Default)]
struct Inner {
    state: AppState,
    queue: ChangeQueue,
    latest_issues: HashMap<String, Vec<Issue>>,
    last_refresh: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct BoardStore {
    inner: Mutex<Inner>,
    state_path: Option<PathBuf>,
}

impl BoardStore {
    /// Open the store backed by the state file at `path`.
    ///
    /// A missing or unreadable file starts from an empty state.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = load_state(&path);
        Self {
            inner: Mutex::new(Inner {
                state,
                ..Default::default()
            }),
            state_path: Some(path),
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            state_path: None,
        }
    }

    pub fn state_path(&self) -> Option<&Path> {
        self.state_path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!(event = "core.store.lock_poisoned");
                poisoned.into_inner()
            }
        }
    }

    /// Detect changes for a freshly fetched batch, age the queue and persist.
    pub fn apply_refresh(&self, board_id: &str, issues: Vec<Issue>) -> RefreshOutcome {
        self.apply_refresh_at(board_id, issues, Utc::now())
    }

    pub fn apply_refresh_at(
        &self,
        board_id: &str,
        issues: Vec<Issue>,
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        let mut inner = self.lock();
        let Inner {
            state,
            queue,
            latest_issues,
            last_refresh,
        } = &mut *inner;

        let detection = detect_changes(state, queue, board_id, &issues, now);
        latest_issues.insert(board_id.to_string(), issues);
        *last_refresh = Some(now);

        let persisted = match self.state_path.as_deref() {
            Some(path) => save_or_log(state, path),
            None => true,
        };

        info!(
            event = "core.store.refresh_applied",
            board_id = board_id,
            issues = detection.issues_seen,
            notifications = detection.notifications,
            first_poll = detection.first_poll,
            persisted = persisted,
        );

        RefreshOutcome {
            board_id: board_id.to_string(),
            detection,
            persisted,
        }
    }

    /// Age the change queue at the current time.
    pub fn sweep(&self) -> SweepOutcome {
        self.sweep_at(Utc::now())
    }

    pub fn sweep_at(&self, now: DateTime<Utc>) -> SweepOutcome {
        let outcome = self.lock().queue.sweep_at(now);
        if outcome.changed() {
            debug!(
                event = "core.store.sweep_completed",
                demoted = outcome.demoted,
                purged = outcome.purged,
            );
        }
        outcome
    }

    /// Write the snapshot store to its state file. A no-op for in-memory stores.
    pub fn persist(&self) -> Result<(), StateError> {
        let Some(path) = self.state_path.as_deref() else {
            return Ok(());
        };
        let mut inner = self.lock();
        save_state(&mut inner.state, path)
    }

    pub fn board_snapshot(&self, board_id: &str) -> Option<BoardSnapshot> {
        self.lock().state.peek_board(board_id).cloned()
    }

    pub fn issue_snapshot(&self, board_id: &str, issue_key: &str) -> Option<IssueSnapshot> {
        self.lock()
            .state
            .peek_board(board_id)
            .and_then(|b| b.get(issue_key))
            .cloned()
    }

    /// Ids of every board with a snapshot, sorted.
    pub fn board_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().state.boards.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The whole change queue, oldest first.
    pub fn changes(&self) -> Vec<ChangeNotification> {
        self.lock().queue.entries().to_vec()
    }

    pub fn recent_changes(
        &self,
        board_id: &str,
        limit: usize,
        include_historical: bool,
    ) -> Vec<ChangeNotification> {
        self.lock()
            .queue
            .recent_for_board(board_id, limit, include_historical, Utc::now())
    }

    pub fn has_highlighted(&self, board_id: &str) -> bool {
        self.lock().queue.has_highlighted(board_id, Utc::now())
    }

    pub fn is_issue_highlighted(&self, board_id: &str, issue_key: &str) -> bool {
        self.lock()
            .queue
            .is_issue_highlighted(board_id, issue_key, Utc::now())
    }

    /// Issues from the board's most recent successful fetch.
    pub fn latest_issues(&self, board_id: &str) -> Vec<Issue> {
        self.lock()
            .latest_issues
            .get(board_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Last-day activity for a board, newest first.
    pub fn activity(&self, board_id: &str) -> Vec<ActivityEntry> {
        self.activity_at(board_id, Utc::now())
    }

    pub fn activity_at(&self, board_id: &str, now: DateTime<Utc>) -> Vec<ActivityEntry> {
        let inner = self.lock();
        let historical = inner.queue.historical_for_board(board_id, now);
        let issues = inner
            .latest_issues
            .get(board_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        build_timeline(issues, &historical, now)
    }

    /// Issue and highlight counts for each of `board_ids`, in order.
    pub fn board_summaries(&self, board_ids: &[String]) -> Vec<BoardSummary> {
        let now = Utc::now();
        let inner = self.lock();
        board_ids
            .iter()
            .map(|id| {
                let mut summary = BoardSummary {
                    board_id: id.clone(),
                    highlighted: inner.queue.highlighted_count(id, now),
                    ..Default::default()
                };
                if let Some(board) = inner.state.peek_board(id) {
                    summary.issues = board.len();
                    for issue in board.issues.values() {
                        *summary.by_status.entry(issue.status.clone()).or_default() += 1;
                    }
                }
                summary
            })
            .collect()
    }

    /// Issue counts per assignee and status across every stored board.
    pub fn assignee_status_counts(&self) -> BTreeMap<String, BTreeMap<String, usize>> {
        let inner = self.lock();
        let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for board in inner.state.boards.values() {
            for issue in board.issues.values() {
                *counts
                    .entry(issue.assignee.clone())
                    .or_default()
                    .entry(issue.status.clone())
                    .or_default() += 1;
            }
        }
        counts
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.lock().last_refresh
    }

    /// A copy of the snapshot store as it would be persisted.
    pub fn export_state(&self) -> AppState {
        self.lock().state.clone()
    }
}

fn save_or_log(state: &mut AppState, path: &Path) -> bool {
    match save_state(state, path) {
        Ok(()) => true,
        Err(e) => {
            error!(
                event = "core.store.save_failed",
                path = %path.display(),
                error = %e,
            );
            false
        }
    }
}
