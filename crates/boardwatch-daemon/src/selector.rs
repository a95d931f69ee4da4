//! Active-board selection.
//!
//! Every successful switch bumps a generation counter. A delayed automatic
//! switch captures the generation when it is armed and only applies if the
//! counter has not moved, so a user switch in between always wins.

use std::sync::{Mutex, MutexGuard};

use tracing::{error, info};

use crate::errors::DaemonError;
use crate::types::ActiveView;

#[derive(Debug)]
struct Selection {
    view: ActiveView,
    generation: u64,
}

#[derive(Debug)]
pub struct BoardSelector {
    selection: Mutex<Selection>,
    board_count: usize,
}

impl BoardSelector {
    /// Start on the first board, or the aggregate view when there are no boards.
    pub fn new(board_count: usize) -> Self {
        let view = if board_count > 0 {
            ActiveView::Board(0)
        } else {
            ActiveView::Aggregate
        };
        Self {
            selection: Mutex::new(Selection {
                view,
                generation: 0,
            }),
            board_count,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Selection> {
        match self.selection.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!(event = "daemon.selector.lock_poisoned");
                poisoned.into_inner()
            }
        }
    }

    pub fn board_count(&self) -> usize {
        self.board_count
    }

    pub fn current(&self) -> ActiveView {
        self.lock().view
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Map an index to a view: `0..board_count` are boards, `board_count` is
    /// the aggregate view.
    pub fn view_for_index(&self, index: usize) -> Result<ActiveView, DaemonError> {
        match index {
            i if i < self.board_count => Ok(ActiveView::Board(i)),
            i if i == self.board_count => Ok(ActiveView::Aggregate),
            _ => Err(DaemonError::BoardIndexOutOfRange {
                index,
                count: self.board_count,
            }),
        }
    }

    /// Switch unconditionally. Returns the new view and generation.
    pub fn set(&self, index: usize) -> Result<(ActiveView, u64), DaemonError> {
        let view = self.view_for_index(index)?;
        let mut selection = self.lock();
        selection.view = view;
        selection.generation += 1;
        info!(
            event = "daemon.selector.switch_completed",
            view = %view,
            generation = selection.generation,
        );
        Ok((view, selection.generation))
    }

    /// Switch only if no other switch happened since `expected` was read.
    ///
    /// Returns `Ok(None)` when the switch was superseded.
    pub fn set_if_generation(
        &self,
        index: usize,
        expected: u64,
    ) -> Result<Option<(ActiveView, u64)>, DaemonError> {
        let view = self.view_for_index(index)?;
        let mut selection = self.lock();
        if selection.generation != expected {
            info!(
                event = "daemon.selector.switch_superseded",
                view = %view,
                expected = expected,
                generation = selection.generation,
            );
            return Ok(None);
        }
        selection.view = view;
        selection.generation += 1;
        info!(
            event = "daemon.selector.switch_completed",
            view = %view,
            generation = selection.generation,
        );
        Ok(Some((view, selection.generation)))
    }
}
