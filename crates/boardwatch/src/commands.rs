use clap::ArgMatches;
use tracing::error;

mod boards;
mod helpers;
mod status;
mod watch;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches),
        Some(("status", sub_matches)) => status::handle_status_command(sub_matches),
        Some(("boards", sub_matches)) => boards::handle_boards_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
