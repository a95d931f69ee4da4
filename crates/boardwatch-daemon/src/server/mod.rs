pub mod shutdown;

use std::sync::Arc;

use boardwatch_core::{BoardStore, IssueSource};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::errors::DaemonError;
use crate::orchestrator::PollOrchestrator;
use crate::sweeper::run_sweeper;
use crate::types::{RedrawRequest, RefreshTrigger, WatchConfig};

/// Run the poller until `shutdown` is cancelled.
///
/// This is the main entrypoint called by `boardwatch watch`. It:
/// 1. Refreshes every board immediately, then on every refresh interval
/// 2. Ages the change queue on the independent sweep interval
/// 3. Waits for the shutdown token
/// 4. Writes the state file one last time
///
/// Callers that switch views themselves build a [`PollOrchestrator`] and use
/// [`run_orchestrator`] instead.
pub async fn run_watch<S: IssueSource>(
    config: WatchConfig,
    source: S,
    store: Arc<BoardStore>,
    redraw_tx: mpsc::Sender<RedrawRequest>,
    shutdown: CancellationToken,
) -> Result<(), DaemonError> {
    if config.boards.is_empty() {
        return Err(DaemonError::NoBoards);
    }
    let orchestrator = PollOrchestrator::new(source, store, config, redraw_tx);
    run_orchestrator(orchestrator, shutdown).await
}

/// Drive an existing orchestrator's refresh timer and sweeper until shutdown.
pub async fn run_orchestrator<S: IssueSource>(
    orchestrator: PollOrchestrator<S>,
    shutdown: CancellationToken,
) -> Result<(), DaemonError> {
    let config = orchestrator.config().clone();
    let store = Arc::clone(orchestrator.store());

    info!(
        event = "daemon.server.started",
        boards = config.boards.len(),
        refresh_interval_secs = config.refresh_interval.as_secs(),
        sweep_interval_secs = config.sweep_interval.as_secs(),
    );

    let sweeper = tokio::spawn(run_sweeper(
        Arc::clone(&store),
        config.sweep_interval,
        orchestrator.redraw_sender(),
        shutdown.clone(),
    ));
    let refresher = tokio::spawn(run_refresh_timer(orchestrator, shutdown.clone()));

    shutdown.cancelled().await;
    info!(event = "daemon.server.shutdown_started");

    for (task, result) in [("sweeper", sweeper.await), ("refresher", refresher.await)] {
        if let Err(e) = result {
            error!(
                event = "daemon.server.task_failed",
                task = task,
                error = %e,
            );
        }
    }

    let persist_store = Arc::clone(&store);
    let persisted = tokio::task::spawn_blocking(move || persist_store.persist()).await?;
    if let Err(e) = persisted {
        error!(event = "daemon.server.final_save_failed", error = %e);
        return Err(e.into());
    }

    info!(event = "daemon.server.shutdown_completed");
    Ok(())
}

async fn run_refresh_timer<S: IssueSource>(
    orchestrator: PollOrchestrator<S>,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(orchestrator.config().refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            // The first tick completes immediately, giving the startup refresh.
            _ = ticker.tick() => {
                // Refresh tasks run detached; failures are logged per board.
                drop(orchestrator.spawn_all(RefreshTrigger::Timer));
            }
        }
    }
}
