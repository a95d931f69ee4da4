//! Integration tests for board refresh orchestration.
//!
//! These drive a `PollOrchestrator` against an in-process mock source and
//! exercise refresh, failure isolation, automatic switching and the watch loop.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use boardwatch_config::BoardConfig;
use boardwatch_core::{BoardStore, Issue, IssueSource, Iteration, SourceError};
use boardwatch_daemon::{
    ActiveView, DaemonError, PollOrchestrator, RedrawRequest, RefreshTrigger, WatchConfig,
    redraw_channel,
};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct MockState {
    iterations: Mutex<HashMap<String, Vec<(u64, Vec<Issue>)>>>,
    failing: Mutex<HashSet<String>>,
    failing_iterations: Mutex<HashSet<(String, u64)>>,
    slow: Mutex<HashSet<String>>,
}

/// Source serving canned issues per active iteration of each board.
#[derive(Clone, Default)]
struct MockSource {
    state: Arc<MockState>,
}

impl MockSource {
    /// Serve `issues` as the board's single active iteration.
    fn set_issues(&self, board_id: &str, issues: Vec<Issue>) {
        self.set_iterations(board_id, vec![(1, issues)]);
    }

    fn set_iterations(&self, board_id: &str, iterations: Vec<(u64, Vec<Issue>)>) {
        self.state
            .iterations
            .lock()
            .unwrap()
            .insert(board_id.to_string(), iterations);
    }

    fn fail(&self, board_id: &str) {
        self.state
            .failing
            .lock()
            .unwrap()
            .insert(board_id.to_string());
    }

    fn fail_iteration(&self, board_id: &str, iteration_id: u64) {
        self.state
            .failing_iterations
            .lock()
            .unwrap()
            .insert((board_id.to_string(), iteration_id));
    }

    fn hang(&self, board_id: &str) {
        self.state.slow.lock().unwrap().insert(board_id.to_string());
    }
}

impl IssueSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn active_iterations(&self, board_id: &str) -> Result<Vec<Iteration>, SourceError> {
        let slow = self.state.slow.lock().unwrap().contains(board_id);
        if slow {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        let failing = self.state.failing.lock().unwrap().contains(board_id);
        if failing {
            return Err(SourceError::RequestFailed {
                message: format!("board {} unavailable", board_id),
            });
        }
        let iterations = self
            .state
            .iterations
            .lock()
            .unwrap()
            .get(board_id)
            .map(|its| {
                its.iter()
                    .map(|(id, _)| Iteration::new(*id, format!("Sprint {id}")))
                    .collect()
            })
            .unwrap_or_else(|| vec![Iteration::new(1, "Sprint 1")]);
        Ok(iterations)
    }

    async fn iteration_issues(
        &self,
        board_id: &str,
        iteration_id: u64,
    ) -> Result<Vec<Issue>, SourceError> {
        let failing = self
            .state
            .failing_iterations
            .lock()
            .unwrap()
            .contains(&(board_id.to_string(), iteration_id));
        if failing {
            return Err(SourceError::RequestFailed {
                message: format!("iteration {} of board {} unavailable", iteration_id, board_id),
            });
        }
        let issues = self
            .state
            .iterations
            .lock()
            .unwrap()
            .get(board_id)
            .and_then(|its| its.iter().find(|(id, _)| *id == iteration_id))
            .map(|(_, issues)| issues.clone())
            .unwrap_or_default();
        Ok(issues)
    }
}

fn issue(key: &str, status: &str, assignee: Option<&str>) -> Issue {
    Issue::new(key, format!("{key} summary"), status, assignee, "2024-01-01T00:00:00.000+0000")
}

fn watch_config(boards: &[&str]) -> WatchConfig {
    WatchConfig {
        boards: boards.iter().map(|id| BoardConfig::new(*id, *id)).collect(),
        request_timeout: Duration::from_secs(5),
        auto_switch_delay: Duration::from_secs(1),
        ..WatchConfig::default()
    }
}

fn orchestrator(
    source: &MockSource,
    boards: &[&str],
) -> (
    PollOrchestrator<MockSource>,
    tokio::sync::mpsc::Receiver<RedrawRequest>,
) {
    let (tx, rx) = redraw_channel(64);
    let orchestrator = PollOrchestrator::new(
        source.clone(),
        Arc::new(BoardStore::in_memory()),
        watch_config(boards),
        tx,
    );
    (orchestrator, rx)
}

#[tokio::test]
async fn test_first_refresh_is_silent_then_changes_are_reported() {
    let source = MockSource::default();
    source.set_issues("A", vec![issue("X-1", "Open", Some("Alice"))]);
    let (orch, mut rx) = orchestrator(&source, &["A"]);

    let first = orch.refresh_board("A", RefreshTrigger::Manual).await.unwrap();
    assert!(first.detection.first_poll);
    assert!(!first.has_notifications());
    assert_eq!(
        rx.recv().await,
        Some(RedrawRequest::BoardRefreshed {
            board_id: "A".to_string()
        })
    );

    source.set_issues("A", vec![issue("X-1", "In Progress", Some("Alice"))]);
    let second = orch.refresh_board("A", RefreshTrigger::Manual).await.unwrap();
    assert_eq!(second.detection.notifications, 1);

    let store = orch.store();
    assert!(store.is_issue_highlighted("A", "X-1"));
    assert_eq!(
        store.issue_snapshot("A", "X-1").unwrap().status,
        "In Progress"
    );
    assert_eq!(
        store.changes()[0].change,
        "Status: In Progress, Assignee: Alice"
    );
}

#[tokio::test]
async fn test_failing_board_is_isolated() {
    let source = MockSource::default();
    source.set_issues("A", vec![issue("X-1", "Open", None)]);
    source.set_issues("B", vec![issue("Y-1", "Open", None)]);
    source.fail("B");
    let (orch, _rx) = orchestrator(&source, &["A", "B"]);

    let results = orch.refresh_all(RefreshTrigger::Manual).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, "A");
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(DaemonError::Source(_))));
    assert!(orch.store().board_snapshot("A").is_some());
    assert!(orch.store().board_snapshot("B").is_none());
}

#[tokio::test]
async fn test_failed_refresh_leaves_state_untouched() {
    let source = MockSource::default();
    source.set_issues("A", vec![issue("X-1", "Open", None)]);
    let (orch, _rx) = orchestrator(&source, &["A"]);
    orch.refresh_board("A", RefreshTrigger::Manual).await.unwrap();
    let before = orch.store().board_snapshot("A").unwrap();

    source.set_issues("A", vec![issue("X-1", "Done", None)]);
    source.fail("A");
    assert!(orch.refresh_board("A", RefreshTrigger::Manual).await.is_err());

    assert_eq!(orch.store().board_snapshot("A").unwrap(), before);
    assert!(orch.store().changes().is_empty());
}

#[tokio::test]
async fn test_issues_from_every_active_iteration_are_merged() {
    let source = MockSource::default();
    source.set_iterations(
        "A",
        vec![
            (10, vec![issue("X-1", "Open", Some("Alice"))]),
            (11, vec![issue("X-2", "Done", None), issue("X-3", "Open", None)]),
        ],
    );
    let (orch, _rx) = orchestrator(&source, &["A"]);

    let outcome = orch.refresh_board("A", RefreshTrigger::Manual).await.unwrap();

    assert_eq!(outcome.detection.issues_seen, 3);
    let board = orch.store().board_snapshot("A").unwrap();
    assert_eq!(board.len(), 3);
    assert_eq!(board.get("X-2").unwrap().status, "Done");
}

#[tokio::test]
async fn test_failing_later_iteration_abandons_whole_board() {
    let source = MockSource::default();
    source.set_iterations(
        "A",
        vec![
            (10, vec![issue("X-1", "Open", None)]),
            (11, vec![issue("X-2", "Open", None)]),
        ],
    );
    let (orch, _rx) = orchestrator(&source, &["A"]);
    orch.refresh_board("A", RefreshTrigger::Manual).await.unwrap();
    let before = orch.store().board_snapshot("A").unwrap();

    source.set_iterations(
        "A",
        vec![
            (10, vec![issue("X-1", "In Progress", None)]),
            (11, vec![issue("X-2", "Done", None)]),
        ],
    );
    source.fail_iteration("A", 11);
    let err = orch
        .refresh_board("A", RefreshTrigger::Manual)
        .await
        .unwrap_err();

    assert!(matches!(err, DaemonError::Source(_)));
    assert_eq!(orch.store().board_snapshot("A").unwrap(), before);
    assert!(orch.store().changes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_hung_request_times_out() {
    let source = MockSource::default();
    source.hang("A");
    let (orch, _rx) = orchestrator(&source, &["A"]);

    let err = orch
        .refresh_board("A", RefreshTrigger::Manual)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DaemonError::Source(SourceError::Timeout { seconds: 5, .. })
    ));
    assert!(orch.store().board_snapshot("A").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refreshes_commute() {
    let boards = ["A", "B", "C", "D"];
    let source = MockSource::default();
    for (i, board) in boards.iter().enumerate() {
        let dev = format!("dev{i}");
        source.set_issues(
            board,
            (0..5)
                .map(|n| issue(&format!("{board}-{n}"), "Open", Some(dev.as_str())))
                .collect(),
        );
    }

    let (sequential, _rx1) = orchestrator(&source, &boards);
    for board in boards.iter().rev() {
        sequential
            .refresh_board(board, RefreshTrigger::Manual)
            .await
            .unwrap();
    }

    let (concurrent, _rx2) = orchestrator(&source, &boards);
    let results = concurrent.refresh_all(RefreshTrigger::Manual).await;
    assert!(results.iter().all(|(_, r)| r.is_ok()));

    for board in boards {
        let a = sequential.store().board_snapshot(board).unwrap();
        let b = concurrent.store().board_snapshot(board).unwrap();
        assert_eq!(a.len(), b.len());
        for (key, snap) in &a.issues {
            let other = b.get(key).unwrap();
            assert_eq!(snap.status, other.status);
            assert_eq!(snap.assignee, other.assignee);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_changes_on_inactive_board_auto_switch() {
    let source = MockSource::default();
    source.set_issues("A", vec![issue("X-1", "Open", None)]);
    source.set_issues("B", vec![issue("Y-1", "Open", None)]);
    let (orch, _rx) = orchestrator(&source, &["A", "B"]);
    orch.refresh_all(RefreshTrigger::Timer).await;
    assert_eq!(orch.selector().current(), ActiveView::Board(0));

    source.set_issues("B", vec![issue("Y-1", "Done", None)]);
    orch.refresh_board("B", RefreshTrigger::Timer).await.unwrap();
    assert_eq!(orch.selector().current(), ActiveView::Board(0));

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(orch.selector().current(), ActiveView::Board(1));
}

#[tokio::test(start_paused = true)]
async fn test_switch_refresh_never_auto_switches() {
    let source = MockSource::default();
    source.set_issues("B", vec![issue("Y-1", "Open", None)]);
    let (orch, _rx) = orchestrator(&source, &["A", "B"]);
    orch.refresh_board("B", RefreshTrigger::Timer).await.unwrap();

    source.set_issues("B", vec![issue("Y-1", "Done", None)]);
    let outcome = orch.refresh_board("B", RefreshTrigger::Switch).await.unwrap();
    assert!(outcome.has_notifications());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(orch.selector().current(), ActiveView::Board(0));
    assert_eq!(orch.selector().generation(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_user_switch_supersedes_pending_auto_switch() {
    let source = MockSource::default();
    let (orch, _rx) = orchestrator(&source, &["A", "B"]);

    let pending = orch.auto_switch_on_change("B").unwrap();
    assert_eq!(orch.switch_to(2).unwrap(), ActiveView::Aggregate);

    assert!(!pending.await.unwrap());
    assert_eq!(orch.selector().current(), ActiveView::Aggregate);
}

#[tokio::test(start_paused = true)]
async fn test_auto_switch_preconditions() {
    let source = MockSource::default();
    let (orch, _rx) = orchestrator(&source, &["A", "B"]);

    // Already active, or not configured.
    assert!(orch.auto_switch_on_change("A").is_none());
    assert!(orch.auto_switch_on_change("Z").is_none());

    let (tx, _rx2) = redraw_channel(4);
    let disabled = PollOrchestrator::new(
        source.clone(),
        Arc::new(BoardStore::in_memory()),
        WatchConfig {
            auto_switch: false,
            ..watch_config(&["A", "B"])
        },
        tx,
    );
    assert!(disabled.auto_switch_on_change("B").is_none());

    let pending = orch.auto_switch_on_change("B").unwrap();
    assert!(pending.await.unwrap());
    assert_eq!(orch.selector().current(), ActiveView::Board(1));
}

#[tokio::test]
async fn test_switch_to_validates_index() {
    let source = MockSource::default();
    let (orch, mut rx) = orchestrator(&source, &["A", "B"]);

    let err = orch.switch_to(3).unwrap_err();
    assert!(matches!(
        err,
        DaemonError::BoardIndexOutOfRange { index: 3, count: 2 }
    ));
    assert_eq!(orch.selector().current(), ActiveView::Board(0));

    assert_eq!(orch.switch_to(1).unwrap(), ActiveView::Board(1));
    assert_eq!(
        rx.recv().await,
        Some(RedrawRequest::ViewChanged(ActiveView::Board(1)))
    );
}

#[tokio::test]
async fn test_switch_to_board_resolves_configured_id() {
    let source = MockSource::default();
    source.set_issues("B", vec![issue("Y-1", "Open", None)]);
    let (orch, mut rx) = orchestrator(&source, &["A", "B"]);

    let err = orch.switch_to_board("Z").unwrap_err();
    assert!(matches!(err, DaemonError::UnknownBoard(ref id) if id == "Z"));
    assert!(err.is_user_error());
    assert_eq!(orch.selector().current(), ActiveView::Board(0));

    assert_eq!(orch.switch_to_board("B").unwrap(), ActiveView::Board(1));
    assert_eq!(
        rx.recv().await,
        Some(RedrawRequest::ViewChanged(ActiveView::Board(1)))
    );
}

#[tokio::test]
async fn test_run_watch_refreshes_and_persists_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    let source = MockSource::default();
    source.set_issues("A", vec![issue("X-1", "Open", Some("Alice"))]);

    let store = Arc::new(BoardStore::load(&state_path));
    let (tx, mut rx) = redraw_channel(8);
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(boardwatch_daemon::run_watch(
        watch_config(&["A"]),
        source,
        Arc::clone(&store),
        tx,
        shutdown.clone(),
    ));

    let redraw = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap();
    assert_eq!(
        redraw,
        Some(RedrawRequest::BoardRefreshed {
            board_id: "A".to_string()
        })
    );

    shutdown.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());

    let reopened = BoardStore::load(&state_path);
    assert_eq!(reopened.issue_snapshot("A", "X-1").unwrap().assignee, "Alice");
}

#[tokio::test]
async fn test_run_watch_requires_boards() {
    let (tx, _rx) = redraw_channel(1);
    let result = boardwatch_daemon::run_watch(
        WatchConfig::default(),
        MockSource::default(),
        Arc::new(BoardStore::in_memory()),
        tx,
        CancellationToken::new(),
    )
    .await;
    assert!(matches!(result, Err(DaemonError::NoBoards)));
}
