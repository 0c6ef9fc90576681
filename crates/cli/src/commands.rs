/// One line of user input at the `>` prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tree,
    /// Search box contents. Empty reloads the full tree.
    Find(String),
    ToggleContentSearch,
    /// Open the numbered entry from the last listing.
    Open(usize),
    Show,
    Edit,
    Append(String),
    Save,
    ToggleMode,
    Refresh,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  tree            show the notes tree
  find [query]    search names (and contents, see `content`); empty query reloads
  content         toggle searching inside notes
  open <n>        open entry <n> from the last listing
  show            print the open note (rendered in markdown mode)
  edit            replace the buffer; finish with a line containing only `.`
  append <text>   add a line to the buffer
  save            save the buffer to the open note
  mode            toggle markdown rendering
  refresh         rescan the notes directory
  help            this text
  quit            exit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "tree" | "ls" => Ok(Command::Tree),
        "find" | "/" => Ok(Command::Find(rest.to_string())),
        "content" => Ok(Command::ToggleContentSearch),
        "open" | "o" => rest
            .parse()
            .map(Command::Open)
            .map_err(|_| format!("expected an entry number, got {:?}", rest)),
        "show" | "cat" => Ok(Command::Show),
        "edit" => Ok(Command::Edit),
        "append" | "a" => Ok(Command::Append(rest.to_string())),
        "save" | "w" => Ok(Command::Save),
        "mode" => Ok(Command::ToggleMode),
        "refresh" => Ok(Command::Refresh),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command {:?}, try `help`", other)),
    }
}
