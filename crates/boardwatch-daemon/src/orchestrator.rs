//! Board refresh orchestration.
//!
//! Each refresh fetches a board's active iterations and their issues, then
//! hands the batch to the shared [`BoardStore`] on a blocking thread. Boards
//! refresh on independent tasks; a failure on one board never touches the
//! others or the stored state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use boardwatch_core::{BoardStore, Issue, IssueSource, RefreshOutcome, SourceError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::errors::DaemonError;
use crate::redraw::request_redraw;
use crate::selector::BoardSelector;
use crate::types::{ActiveView, RedrawRequest, RefreshTrigger, WatchConfig};

struct Inner<S> {
    source: S,
    store: Arc<BoardStore>,
    selector: BoardSelector,
    config: WatchConfig,
    redraw_tx: mpsc::Sender<RedrawRequest>,
}

/// Drives board refreshes, view switches and automatic switching.
///
/// Cheap to clone; clones share the same source, store and selector.
pub struct PollOrchestrator<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for PollOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: IssueSource> PollOrchestrator<S> {
    pub fn new(
        source: S,
        store: Arc<BoardStore>,
        config: WatchConfig,
        redraw_tx: mpsc::Sender<RedrawRequest>,
    ) -> Self {
        let selector = BoardSelector::new(config.boards.len());
        Self {
            inner: Arc::new(Inner {
                source,
                store,
                selector,
                config,
                redraw_tx,
            }),
        }
    }

    pub fn store(&self) -> &Arc<BoardStore> {
        &self.inner.store
    }

    pub fn selector(&self) -> &BoardSelector {
        &self.inner.selector
    }

    pub fn config(&self) -> &WatchConfig {
        &self.inner.config
    }

    pub fn redraw_sender(&self) -> mpsc::Sender<RedrawRequest> {
        self.inner.redraw_tx.clone()
    }

    async fn with_timeout<T>(
        &self,
        request: impl Future<Output = Result<T, SourceError>>,
    ) -> Result<T, SourceError> {
        let limit: Duration = self.inner.config.request_timeout;
        match tokio::time::timeout(limit, request).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                source_name: self.inner.source.name().to_string(),
                seconds: limit.as_secs(),
            }),
        }
    }

    /// Every issue of every active iteration of the board, concatenated.
    async fn fetch_board(&self, board_id: &str) -> Result<Vec<Issue>, SourceError> {
        let source = &self.inner.source;
        let iterations = self
            .with_timeout(source.active_iterations(board_id))
            .await?;

        let mut issues = Vec::new();
        for iteration in &iterations {
            let batch = self
                .with_timeout(source.iteration_issues(board_id, iteration.id))
                .await?;
            issues.extend(batch);
        }
        Ok(issues)
    }

    /// Refresh one board.
    ///
    /// A fetch failure abandons the board for this cycle and leaves the
    /// store untouched. A batch that produced notifications may arm an
    /// automatic switch to this board, unless the refresh itself came from
    /// a switch.
    pub async fn refresh_board(
        &self,
        board_id: &str,
        trigger: RefreshTrigger,
    ) -> Result<RefreshOutcome, DaemonError> {
        info!(
            event = "daemon.orchestrator.refresh_started",
            board_id = board_id,
            trigger = %trigger,
        );

        let issues = match self.fetch_board(board_id).await {
            Ok(issues) => issues,
            Err(e) => {
                warn!(
                    event = "daemon.orchestrator.refresh_failed",
                    board_id = board_id,
                    trigger = %trigger,
                    error = %e,
                );
                return Err(e.into());
            }
        };

        let store = Arc::clone(&self.inner.store);
        let board = board_id.to_string();
        let outcome =
            tokio::task::spawn_blocking(move || store.apply_refresh(&board, issues)).await?;

        request_redraw(
            &self.inner.redraw_tx,
            RedrawRequest::BoardRefreshed {
                board_id: board_id.to_string(),
            },
        );

        info!(
            event = "daemon.orchestrator.refresh_completed",
            board_id = board_id,
            trigger = %trigger,
            notifications = outcome.detection.notifications,
        );

        if outcome.has_notifications() && trigger != RefreshTrigger::Switch {
            self.auto_switch_on_change(board_id);
        }

        Ok(outcome)
    }

    /// Refresh one board on its own task.
    pub fn spawn_refresh(
        &self,
        board_id: String,
        trigger: RefreshTrigger,
    ) -> JoinHandle<Result<RefreshOutcome, DaemonError>> {
        let this = self.clone();
        tokio::spawn(async move { this.refresh_board(&board_id, trigger).await })
    }

    /// Start a refresh task for every configured board without waiting.
    pub fn spawn_all(
        &self,
        trigger: RefreshTrigger,
    ) -> Vec<(String, JoinHandle<Result<RefreshOutcome, DaemonError>>)> {
        self.inner
            .config
            .board_ids()
            .into_iter()
            .map(|id| {
                let handle = self.spawn_refresh(id.clone(), trigger);
                (id, handle)
            })
            .collect()
    }

    /// Refresh every configured board concurrently and wait for all of them.
    ///
    /// Results are in board order; one board failing does not affect the rest.
    pub async fn refresh_all(
        &self,
        trigger: RefreshTrigger,
    ) -> Vec<(String, Result<RefreshOutcome, DaemonError>)> {
        let mut results = Vec::new();
        for (id, handle) in self.spawn_all(trigger) {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(DaemonError::from(e)),
            };
            results.push((id, result));
        }
        results
    }

    /// Make `index` the active view.
    ///
    /// Switching to a board also refreshes it. Index `board_count` is the
    /// aggregate view.
    pub fn switch_to(&self, index: usize) -> Result<ActiveView, DaemonError> {
        let (view, _) = self.inner.selector.set(index)?;
        self.after_switch(view);
        Ok(view)
    }

    /// Make a configured board the active view, looked up by id.
    pub fn switch_to_board(&self, board_id: &str) -> Result<ActiveView, DaemonError> {
        let index = self
            .inner
            .config
            .board_index(board_id)
            .ok_or_else(|| DaemonError::UnknownBoard(board_id.to_string()))?;
        self.switch_to(index)
    }

    fn after_switch(&self, view: ActiveView) {
        request_redraw(&self.inner.redraw_tx, RedrawRequest::ViewChanged(view));
        if let Some(board) = view
            .board_index()
            .and_then(|i| self.inner.config.boards.get(i))
        {
            // Detached; failures are logged by refresh_board.
            drop(self.spawn_refresh(board.id.clone(), RefreshTrigger::Switch));
        }
    }

    /// Arm a delayed switch to a board that just reported changes.
    ///
    /// Nothing is armed when auto-switching is disabled, the board is not
    /// configured, or it is already active. The returned task resolves to
    /// whether the switch was applied; it is skipped if any other switch
    /// happened during the delay.
    pub fn auto_switch_on_change(&self, board_id: &str) -> Option<JoinHandle<bool>> {
        if !self.inner.config.auto_switch {
            return None;
        }
        let index = self.inner.config.board_index(board_id)?;
        if self.inner.selector.current() == ActiveView::Board(index) {
            return None;
        }

        let armed_generation = self.inner.selector.generation();
        let delay = self.inner.config.auto_switch_delay;
        let this = self.clone();
        let board_id = board_id.to_string();

        info!(
            event = "daemon.orchestrator.auto_switch_armed",
            board_id = %board_id,
            delay_ms = delay.as_millis() as u64,
        );

        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match this.inner.selector.set_if_generation(index, armed_generation) {
                Ok(Some((view, _))) => {
                    info!(
                        event = "daemon.orchestrator.auto_switch_completed",
                        board_id = %board_id,
                    );
                    this.after_switch(view);
                    true
                }
                Ok(None) => false,
                Err(e) => {
                    warn!(
                        event = "daemon.orchestrator.auto_switch_failed",
                        board_id = %board_id,
                        error = %e,
                    );
                    false
                }
            }
        }))
    }
}
