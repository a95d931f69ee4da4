use clap::{Arg, ArgAction, Command};

pub fn status_command() -> Command {
    Command::new("status")
        .about("Show the stored snapshot of every board")
        .arg(
            Arg::new("board")
                .help("Only show this board, issue by issue")
                .index(1),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Output in JSON format")
                .action(ArgAction::SetTrue),
        )
}

pub fn boards_command() -> Command {
    Command::new("boards")
        .about("List configured boards")
        .arg(
            Arg::new("json")
                .long("json")
                .help("Output in JSON format")
                .action(ArgAction::SetTrue),
        )
}
