use std::sync::Arc;
use std::time::Duration;

use boardwatch_core::BoardStore;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::redraw::request_redraw;
use crate::types::RedrawRequest;

/// Age the change queue every `period` until `shutdown` is cancelled.
///
/// Runs on its own schedule, independent of board refreshes. A redraw is
/// requested only when a sweep demoted or purged something.
pub async fn run_sweeper(
    store: Arc<BoardStore>,
    period: Duration,
    redraw_tx: mpsc::Sender<RedrawRequest>,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    info!(
        event = "daemon.sweeper.started",
        period_secs = period.as_secs(),
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let outcome = store.sweep();
                if outcome.changed() {
                    debug!(
                        event = "daemon.sweeper.queue_aged",
                        demoted = outcome.demoted,
                        purged = outcome.purged,
                    );
                    request_redraw(&redraw_tx, RedrawRequest::QueueAged);
                }
            }
        }
    }

    info!(event = "daemon.sweeper.stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redraw::redraw_channel;
    use boardwatch_core::Issue;
    use chrono::Utc;

    fn issue(status: &str) -> Issue {
        Issue::new("X-1", "s", status, None, "")
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_requests_redraw_only_on_change() {
        let store = Arc::new(BoardStore::in_memory());
        let then = Utc::now() - chrono::Duration::hours(3);
        store.apply_refresh_at("A", vec![issue("Open")], then);
        store.apply_refresh_at("A", vec![issue("Done")], then);

        let (tx, mut rx) = redraw_channel(8);
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(run_sweeper(
            Arc::clone(&store),
            Duration::from_secs(30),
            tx,
            shutdown.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(rx.try_recv().ok(), Some(RedrawRequest::QueueAged));
        assert!(!store.changes()[0].highlighted);

        // Nothing left to age: no further redraws.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(rx.try_recv().is_err());

        shutdown.cancel();
        task.await.unwrap();
    }
}
