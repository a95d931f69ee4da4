//! Change detection: diff a fetched issue batch against the snapshot store.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::changes::{ChangeNotification, ChangeQueue, SweepOutcome};
use crate::snapshot::AppState;
use crate::tracker::Issue;

/// Result of diffing one board's batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionOutcome {
    /// Notifications appended to the queue by this batch.
    pub notifications: usize,
    /// Issues in the batch.
    pub issues_seen: usize,
    /// The board held no snapshots before this batch, so nothing was reported.
    pub first_poll: bool,
    /// The aging pass run after the batch.
    pub sweep: SweepOutcome,
}

impl DetectionOutcome {
    pub fn has_notifications(&self) -> bool {
        self.notifications > 0
    }
}

/// Diff `issues` for `board_id` against `state`, append notifications to
/// `queue`, bring `state` up to date and age the queue, all as of `now`.
///
/// A board with no stored issues before the batch is on its first poll: its
/// snapshots are recorded but no notifications are produced.
pub fn detect_changes(
    state: &mut AppState,
    queue: &mut ChangeQueue,
    board_id: &str,
    issues: &[Issue],
    now: DateTime<Utc>,
) -> DetectionOutcome {
    let first_poll = state.board(board_id).is_empty();
    let mut outcome = DetectionOutcome {
        issues_seen: issues.len(),
        first_poll,
        ..Default::default()
    };

    for issue in issues {
        let status = issue.status();
        let assignee = issue.assignee_or_unassigned();

        if !first_poll && state.has_changed(board_id, &issue.key, status, assignee) {
            debug!(
                event = "core.detector.change_detected",
                board_id = board_id,
                issue_key = %issue.key,
                status = status,
                assignee = assignee,
            );
            queue.push(ChangeNotification::new(
                board_id,
                &issue.key,
                &issue.fields.summary,
                status,
                assignee,
                now,
            ));
            outcome.notifications += 1;
        }

        state.update_at(
            board_id,
            &issue.key,
            status,
            assignee,
            &issue.fields.updated,
            now,
        );
    }

    outcome.sweep = queue.sweep_at(now);
    outcome
}
