use clap::ArgMatches;
use tracing::info;

use super::helpers::{load_config, truncate};

pub(crate) fn handle_boards_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let config = load_config(matches)?;

    info!(
        event = "cli.boards_started",
        count = config.boards.len(),
        json_output = json_output
    );

    if json_output {
        println!("{}", serde_json::to_string_pretty(&config.boards)?);
        return Ok(());
    }

    if config.boards.is_empty() {
        println!("No boards configured.");
        println!("Add [[boards]] entries to ~/.boardwatch/config.toml or ./.boardwatch/config.toml.");
        return Ok(());
    }

    let id_width = config
        .boards
        .iter()
        .map(|b| b.id.len())
        .max()
        .unwrap_or(0)
        .max("Id".len());
    println!("{:<3} {:<id_width$} {:<24} Description", "#", "Id", "Name");
    for (index, board) in config.boards.iter().enumerate() {
        println!(
            "{:<3} {:<id_width$} {:<24} {}",
            index,
            board.id,
            truncate(board.display_name(), 24),
            board.description
        );
    }

    info!(event = "cli.boards_completed");
    Ok(())
}
