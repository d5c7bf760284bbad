use explorer_core::{ManifestId, Msg, Tab};

/// One line typed on the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Dispatch(Msg),
    Help,
    Quit,
    Unknown(String),
}

pub(crate) const HELP: &str = "\
commands:
  explorer        show the Explorer tab
  config          show the Config tab
  search <text>   edit the search box
  refresh         re-run the manifest query
  open <id>       reload one manifest
  help            show this text
  quit            exit";

pub(crate) fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Command::Dispatch(Msg::NoOp),
        "explorer" | "e" => Command::Dispatch(Msg::TabSelected(Tab::Explorer)),
        "config" | "c" => Command::Dispatch(Msg::TabSelected(Tab::Config)),
        "search" | "s" => Command::Dispatch(Msg::SearchChanged(rest.to_string())),
        "refresh" | "r" => Command::Dispatch(Msg::RefreshClicked),
        "open" | "o" => match rest.trim_start_matches('#').parse::<u64>() {
            Ok(id) => Command::Dispatch(Msg::OpenManifest(ManifestId(id))),
            Err(_) => Command::Unknown(line.to_string()),
        },
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}
