use std::collections::BTreeMap;

use boardwatch_config::BoardwatchConfig;
use boardwatch_core::{BoardStore, BoardSummary};
use chrono::{DateTime, Utc};
use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info};

use super::helpers::{load_config, truncate};

#[derive(Serialize)]
struct StatusResponse {
    last_run: DateTime<Utc>,
    boards: Vec<BoardSummary>,
    assignees: BTreeMap<String, BTreeMap<String, usize>>,
}

/// Configured boards first, in order, then boards only present in the state file.
fn board_order(config: &BoardwatchConfig, stored: Vec<String>) -> Vec<String> {
    let mut ids: Vec<String> = config.boards.iter().map(|b| b.id.clone()).collect();
    for id in stored {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

pub(crate) fn handle_status_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let board = matches.get_one::<String>("board");
    let config = load_config(matches)?;
    let state_path = config.state.resolved_path();

    info!(
        event = "cli.status_started",
        state = %state_path.display(),
        board = ?board,
        json_output = json_output
    );

    let store = BoardStore::load(&state_path);

    if let Some(board_id) = board {
        return print_board(&store, &config, board_id, json_output);
    }

    let ids = board_order(&config, store.board_ids());
    let response = StatusResponse {
        last_run: store.export_state().last_run,
        boards: store.board_summaries(&ids),
        assignees: store.assignee_status_counts(),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&response)?);
        info!(event = "cli.status_completed", boards = response.boards.len());
        return Ok(());
    }

    println!("📊 boardwatch status ({})", state_path.display());
    if state_path.exists() {
        println!("   Last saved: {}", response.last_run.to_rfc3339());
    } else {
        println!("   No state saved yet. Run 'boardwatch watch' first.");
    }
    println!();
    for summary in &response.boards {
        let name = config
            .boards
            .iter()
            .find(|b| b.id == summary.board_id)
            .map(|b| b.display_name().to_string())
            .unwrap_or_else(|| format!("{} (not configured)", summary.board_id));
        let statuses: Vec<String> = summary
            .by_status
            .iter()
            .map(|(status, count)| format!("{}: {}", status, count))
            .collect();
        println!(
            "{:<28} {:>4} issues   {}",
            truncate(&name, 28),
            summary.issues,
            statuses.join(", ")
        );
    }

    if !response.assignees.is_empty() {
        println!();
        println!("By assignee:");
        for (assignee, statuses) in &response.assignees {
            let total: usize = statuses.values().sum();
            println!("  {:<24} {:>4}", truncate(assignee, 24), total);
        }
    }

    info!(event = "cli.status_completed", boards = response.boards.len());
    Ok(())
}

fn print_board(
    store: &BoardStore,
    config: &BoardwatchConfig,
    board_id: &str,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(snapshot) = store.board_snapshot(board_id) else {
        eprintln!("❌ No stored state for board '{}'", board_id);
        if config.board_index(board_id).is_none() {
            eprintln!("   Hint: board '{}' is not configured either. See 'boardwatch boards'.", board_id);
        }
        error!(event = "cli.status_failed", board = board_id, reason = "not_found");
        return Err(format!("no stored state for board '{}'", board_id).into());
    };

    let mut issues: Vec<_> = snapshot.issues.into_values().collect();
    issues.sort_by(|a, b| a.key.cmp(&b.key));

    if json_output {
        println!("{}", serde_json::to_string_pretty(&issues)?);
        info!(event = "cli.status_completed", board = board_id, issues = issues.len());
        return Ok(());
    }

    println!("{:<12} {:<18} {:<20} Updated", "Key", "Status", "Assignee");
    for issue in &issues {
        println!(
            "{:<12} {:<18} {:<20} {}",
            issue.key,
            truncate(&issue.status, 18),
            truncate(&issue.assignee, 20),
            issue.last_update
        );
    }

    info!(event = "cli.status_completed", board = board_id, issues = issues.len());
    Ok(())
}
