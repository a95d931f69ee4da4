use clap::{Arg, ArgAction, Command};

pub fn root_command() -> Command {
    Command::new("boardwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Poll issue boards and surface what changed")
        .long_about("boardwatch polls a set of issue boards, remembers the last state of every issue, and reports status or assignee changes. Changes stay highlighted for two hours and are kept for a day.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Extra config file applied on top of ~/.boardwatch and ./.boardwatch")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .help("State file to read and write (overrides [state] path)")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}
