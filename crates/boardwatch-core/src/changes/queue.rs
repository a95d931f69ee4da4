//! Append-ordered change queue with two-stage aging.
//!
//! Entries are kept oldest first. A sweep only flips `highlighted` off and
//! removes expired entries; it never reorders what remains.

use chrono::{DateTime, Utc};

use crate::changes::types::{ChangeNotification, RetentionState};

/// What one aging pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Entries moved from highlighted to historical.
    pub demoted: usize,
    /// Entries removed from the queue.
    pub purged: usize,
}

impl SweepOutcome {
    pub fn changed(&self) -> bool {
        self.demoted > 0 || self.purged > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChangeQueue {
    entries: Vec<ChangeNotification>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: ChangeNotification) {
        self.entries.push(change);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[ChangeNotification] {
        &self.entries
    }

    /// Apply the aging rules at `now`. Idempotent for a fixed `now`.
    pub fn sweep_at(&mut self, now: DateTime<Utc>) -> SweepOutcome {
        let mut outcome = SweepOutcome::default();

        for entry in self.entries.iter_mut() {
            if entry.highlighted && entry.retention_at(now) != RetentionState::Highlighted {
                entry.highlighted = false;
                outcome.demoted += 1;
            }
        }

        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.retention_at(now) != RetentionState::Purged);
        outcome.purged = before - self.entries.len();

        outcome
    }

    /// Most recent `limit` notifications for a board, newest first.
    ///
    /// With `include_historical == false` only entries still inside the
    /// highlight window are returned.
    pub fn recent_for_board(
        &self,
        board_id: &str,
        limit: usize,
        include_historical: bool,
        now: DateTime<Utc>,
    ) -> Vec<ChangeNotification> {
        self.entries
            .iter()
            .rev()
            .filter(|c| c.board_id == board_id)
            .filter(|c| match c.retention_at(now) {
                RetentionState::Highlighted => true,
                RetentionState::Historical => include_historical,
                RetentionState::Purged => false,
            })
            .take(limit)
            .cloned()
            .collect()
    }

    /// Entries aged between the highlight and retention windows, newest first.
    pub fn historical_for_board(&self, board_id: &str, now: DateTime<Utc>) -> Vec<ChangeNotification> {
        self.entries
            .iter()
            .rev()
            .filter(|c| {
                c.board_id == board_id && c.retention_at(now) == RetentionState::Historical
            })
            .cloned()
            .collect()
    }

    pub fn has_highlighted(&self, board_id: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .iter()
            .any(|c| c.board_id == board_id && c.is_highlighted_at(now))
    }

    pub fn is_issue_highlighted(&self, board_id: &str, issue_key: &str, now: DateTime<Utc>) -> bool {
        self.entries.iter().any(|c| {
            c.board_id == board_id && c.issue_key == issue_key && c.is_highlighted_at(now)
        })
    }

    pub fn highlighted_count(&self, board_id: &str, now: DateTime<Utc>) -> usize {
        self.entries
            .iter()
            .filter(|c| c.board_id == board_id && c.is_highlighted_at(now))
            .count()
    }
}
