mod global;
mod query;
mod watch;


use clap::Command;

pub fn build_cli() -> Command {
    global::root_command()
        .subcommand(watch::watch_command())
        .subcommand(query::status_command())
        .subcommand(query::boards_command())
}
