use clap::{Arg, ArgAction, Command};

pub fn watch_command() -> Command {
    Command::new("watch")
        .about("Poll every configured board until interrupted")
        .arg(
            Arg::new("export-dir")
                .long("export-dir")
                .help("Directory of board exports to read (overrides [source] export_dir)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("once")
                .long("once")
                .help("Refresh every board once, print the result and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("board")
                .long("board")
                .help("Board id to show first (defaults to the first configured board)"),
        )
        .arg(
            Arg::new("activity")
                .long("activity")
                .help("Print the last day of issue activity under each refreshed board")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-auto-switch")
                .long("no-auto-switch")
                .help("Do not follow boards that report new changes")
                .action(ArgAction::SetTrue),
        )
}
