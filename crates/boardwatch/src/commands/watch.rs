use std::path::PathBuf;
use std::sync::Arc;

use boardwatch_config::BoardConfig;
use boardwatch_core::{ActivityEntry, BoardStore};
use boardwatch_daemon::{
    ExportDirSource, PollOrchestrator, RedrawRequest, RefreshTrigger, WatchConfig,
    redraw_channel, run_orchestrator, wait_for_shutdown_signal,
};
use chrono::Local;
use clap::ArgMatches;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::helpers::{load_config, truncate};

/// Highlighted changes printed under each refreshed board.
const RECENT_CHANGES_SHOWN: usize = 5;

/// Prints board summaries for the headless watch output.
#[derive(Clone)]
struct BoardPrinter {
    store: Arc<BoardStore>,
    boards: Vec<BoardConfig>,
    show_activity: bool,
}

pub(crate) fn handle_watch_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(matches)?;
    if let Some(dir) = matches.get_one::<PathBuf>("export-dir") {
        config.source.export_dir = Some(dir.clone());
    }
    if matches.get_flag("no-auto-switch") {
        config.polling.auto_switch = Some(false);
    }
    let once = matches.get_flag("once");
    let start_board = matches.get_one::<String>("board").cloned();
    let show_activity = matches.get_flag("activity");

    if config.boards.is_empty() {
        eprintln!("❌ No boards configured.");
        eprintln!("   Add [[boards]] entries to ~/.boardwatch/config.toml and try again.");
        error!(event = "cli.watch_failed", reason = "no_boards");
        return Err("no boards configured".into());
    }

    let export_dir = config.source.resolved_export_dir();
    let state_path = config.state.resolved_path();
    let watch_config = WatchConfig::from_config(&config);

    info!(
        event = "cli.watch_started",
        boards = watch_config.boards.len(),
        export_dir = %export_dir.display(),
        state = %state_path.display(),
        once = once
    );

    let source = ExportDirSource::new(export_dir);
    let store = Arc::new(BoardStore::load(state_path));
    let printer = BoardPrinter {
        store: Arc::clone(&store),
        boards: watch_config.boards.clone(),
        show_activity,
    };
    let rt = tokio::runtime::Runtime::new()?;

    if once {
        rt.block_on(refresh_once(watch_config, source, store, printer))
    } else {
        println!(
            "👀 Watching {} board(s), refreshing every {}s. Ctrl-C to stop.",
            watch_config.boards.len(),
            watch_config.refresh_interval.as_secs()
        );
        rt.block_on(watch_foreground(
            watch_config,
            source,
            store,
            printer,
            start_board,
        ))
    }
}

async fn refresh_once(
    config: WatchConfig,
    source: ExportDirSource,
    store: Arc<BoardStore>,
    printer: BoardPrinter,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, _rx) = redraw_channel(config.redraw_capacity);
    let orchestrator = PollOrchestrator::new(
        source,
        store,
        WatchConfig {
            auto_switch: false,
            ..config
        },
        tx,
    );

    let results = orchestrator.refresh_all(RefreshTrigger::Manual).await;
    let mut failed = 0;
    for (board_id, result) in &results {
        match result {
            Ok(outcome) => {
                printer.board(board_id);
                if !outcome.persisted {
                    eprintln!("⚠️  State for board '{}' could not be saved.", board_id);
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("❌ {}: {}", printer.board_name(board_id), e);
            }
        }
    }

    info!(
        event = "cli.watch_completed",
        boards = results.len(),
        failed = failed
    );

    if failed == results.len() {
        return Err("every board failed to refresh".into());
    }
    Ok(())
}

async fn watch_foreground(
    config: WatchConfig,
    source: ExportDirSource,
    store: Arc<BoardStore>,
    printer: BoardPrinter,
    start_board: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = redraw_channel(config.redraw_capacity);
    let printer = tokio::spawn(print_redraws(rx, printer));
    let orchestrator = PollOrchestrator::new(source, store, config, tx);

    if let Some(board_id) = start_board
        && let Err(e) = orchestrator.switch_to_board(&board_id)
    {
        printer.abort();
        eprintln!("❌ {}", e);
        eprintln!("   See 'boardwatch boards' for the configured board ids.");
        error!(event = "cli.watch_failed", error = %e, error_code = e.error_code());
        return Err(e.into());
    }

    let shutdown = CancellationToken::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal(signal_shutdown).await {
            error!(
                event = "cli.watch.signal_handler_failed",
                error = %e,
            );
        }
    });

    let result = run_orchestrator(orchestrator, shutdown).await;
    printer.abort();

    match result {
        Ok(()) => {
            println!("👋 Stopped. State saved.");
            info!(event = "cli.watch_completed");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Watch stopped with an error: {}", e);
            error!(event = "cli.watch_failed", error = %e);
            Err(e.into())
        }
    }
}

/// Headless presentation: print a line per redraw request.
async fn print_redraws(mut rx: mpsc::Receiver<RedrawRequest>, printer: BoardPrinter) {
    while let Some(request) = rx.recv().await {
        match request {
            RedrawRequest::BoardRefreshed { board_id } => printer.board(&board_id),
            RedrawRequest::QueueAged => {
                println!("[{}] change queue aged", Local::now().format("%H:%M:%S"));
            }
            RedrawRequest::ViewChanged(view) => {
                let label = view
                    .board_index()
                    .and_then(|i| printer.boards.get(i))
                    .map(|b| b.display_name().to_string())
                    .unwrap_or_else(|| "all boards".to_string());
                println!("[{}] now showing {}", Local::now().format("%H:%M:%S"), label);
            }
        }
    }
}

impl BoardPrinter {
    fn board_name(&self, board_id: &str) -> String {
        self.boards
            .iter()
            .find(|b| b.id == board_id)
            .map(|b| b.display_name().to_string())
            .unwrap_or_else(|| board_id.to_string())
    }

    fn board(&self, board_id: &str) {
        let summary = self
            .store
            .board_summaries(&[board_id.to_string()])
            .into_iter()
            .next()
            .unwrap_or_default();
        println!(
            "[{}] {}: {} issues, {} highlighted",
            Local::now().format("%H:%M:%S"),
            self.board_name(board_id),
            summary.issues,
            summary.highlighted
        );
        for change in self
            .store
            .recent_changes(board_id, RECENT_CHANGES_SHOWN, false)
        {
            println!(
                "  ★ {} {} - {}",
                change.issue_key,
                truncate(&change.summary, 40),
                change.change
            );
        }

        if self.show_activity {
            let entries = self.store.activity(board_id);
            if !entries.is_empty() {
                println!("  Activity:");
            }
            for entry in &entries {
                println!("    {}", activity_line(entry));
            }
        }
    }
}

fn activity_line(entry: &ActivityEntry) -> String {
    format!(
        "{} {:<8} {:<10} {}",
        entry.at.with_timezone(&Local).format("%H:%M"),
        entry.kind.to_string(),
        entry.issue_key,
        truncate(&entry.detail, 60)
    )
}
