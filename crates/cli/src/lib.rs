pub mod commands;
pub mod settings;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use quire_core::{
    Decision, EntryKind, Error, NotesApi, Result, Selection, TreeEntry, WatcherEvent,
    setup_watcher,
};

use commands::{Command, HELP, parse_command};
use settings::{NOTES_DIR_ENV, Settings, resolve_notes_dir};

/// Terminal stand-in for the notes window: a numbered listing in place of
/// the tree widget and a text buffer in place of the editor.
pub struct App {
    api: NotesApi,
    /// Entries of the last listing with their display depth. `open <n>` indexes this.
    listing: Vec<(usize, TreeEntry)>,
    query: String,
    buffer: String,
    settings: Settings,
    settings_path: Option<PathBuf>,
    changes: Option<Receiver<WatcherEvent>>,
}

impl App {
    pub fn new(mut api: NotesApi, settings: Settings, settings_path: Option<PathBuf>) -> Self {
        api.set_search_content(settings.search_content);
        api.session_mut().set_markdown_mode(settings.markdown_mode);

        let mut app = Self {
            api,
            listing: Vec::new(),
            query: String::new(),
            buffer: String::new(),
            settings,
            settings_path,
            changes: None,
        };
        app.list_tree();
        app
    }

    /// Watcher events arrive here and are applied on the next prompt.
    pub fn set_change_feed(&mut self, changes: Receiver<WatcherEvent>) {
        self.changes = Some(changes);
    }

    pub fn run_loop<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        self.print_listing(out)?;

        loop {
            self.prompt(out)?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(msg) => {
                    writeln!(out, "{}", msg)?;
                    continue;
                }
            };

            match self.handle(command, input, out) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => writeln!(out, "error: {}", e)?,
            }
        }

        Ok(())
    }

    /// Executes one command. Returns `false` when the user asked to quit.
    fn handle<R: BufRead, W: Write>(
        &mut self,
        command: Command,
        input: &mut R,
        out: &mut W,
    ) -> Result<bool> {
        match command {
            Command::Tree => {
                self.query.clear();
                self.list_tree();
                self.print_listing(out)?;
            }
            Command::Find(query) => {
                self.query = query;
                self.run_query(out)?;
            }
            Command::ToggleContentSearch => {
                let enabled = !self.api.search_content();
                self.api.set_search_content(enabled);
                self.settings.search_content = enabled;
                self.persist_settings();
                writeln!(out, "content search {}", on_off(enabled))?;
                if !self.query.trim().is_empty() {
                    self.run_query(out)?;
                }
            }
            Command::Open(n) => self.open(n, input, out)?,
            Command::Show => self.print_note(out)?,
            Command::Edit => {
                self.buffer = read_until_dot(input)?;
            }
            Command::Append(text) => {
                if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
                    self.buffer.push('\n');
                }
                self.buffer.push_str(&text);
            }
            Command::Save => match self.api.save(&self.buffer) {
                Ok(()) => self.buffer = self.api.session().loaded_content().to_string(),
                Err(Error::NoActiveNote) => {}
                Err(e) => return Err(e),
            },
            Command::ToggleMode => {
                let enabled = self.api.toggle_markdown_mode();
                self.settings.markdown_mode = enabled;
                self.persist_settings();
                writeln!(out, "markdown rendering {}", on_off(enabled))?;
                if self.api.session().current_path().is_some() {
                    self.print_note(out)?;
                }
            }
            Command::Refresh => {
                self.api.refresh()?;
                self.query.clear();
                self.list_tree();
                self.print_listing(out)?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(false),
        }

        Ok(true)
    }

    fn open<R: BufRead, W: Write>(&mut self, n: usize, input: &mut R, out: &mut W) -> Result<()> {
        let Some((_, entry)) = self.listing.get(n).cloned() else {
            writeln!(out, "no entry {}", n)?;
            return Ok(());
        };

        let selection = self
            .api
            .select(&entry, &self.buffer, |current| ask_unsaved(current, input, out))?;

        match selection {
            Selection::Loaded { content, .. } => {
                self.buffer = content;
                writeln!(out, "{}", self.api.session().title())?;
                self.print_note(out)?;
            }
            Selection::Cancelled => {
                writeln!(out, "kept {}", self.api.session().title())?;
            }
            Selection::Ignored => {}
        }
        Ok(())
    }

    fn run_query<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.requery()?;
        self.print_listing(out)?;
        Ok(())
    }

    /// Recomputes the listing for the current query so numbered entries
    /// point at what is on disk now.
    fn requery(&mut self) -> Result<()> {
        let results = self.api.search(&self.query)?;
        self.listing = if self.query.trim().is_empty() {
            results.first().map(flatten).unwrap_or_default()
        } else {
            results.iter().map(|entry| (0, detach(entry))).collect()
        };
        Ok(())
    }

    fn list_tree(&mut self) {
        self.listing = flatten(self.api.tree());
    }

    fn print_listing<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.listing.is_empty() {
            return writeln!(out, "no matches");
        }
        for (i, (depth, entry)) in self.listing.iter().enumerate() {
            let suffix = match entry.kind {
                EntryKind::Folder => "/",
                EntryKind::Note => "",
            };
            writeln!(out, "{:>3} {}{}{}", i, "  ".repeat(*depth), entry.name, suffix)?;
        }
        Ok(())
    }

    fn print_note<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.api.session().current_path().is_none() {
            return writeln!(out, "no note open");
        }
        if self.api.session().markdown_mode() {
            writeln!(out, "{}", render_markdown(&self.buffer))
        } else {
            writeln!(out, "{}", self.buffer)
        }
    }

    fn prompt<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if let Some(changes) = &self.changes
            && changes.try_iter().count() > 0
        {
            self.api.refresh()?;
            if self.query.trim().is_empty() {
                self.list_tree();
            } else {
                self.requery()?;
            }
            writeln!(out, "(notes changed on disk, index refreshed)")?;
        }

        let status = self
            .api
            .notification(Instant::now())
            .map(|message| format!("[{}] ", message))
            .unwrap_or_default();
        let dirty = if self.api.is_dirty(&self.buffer) { "*" } else { "" };
        write!(out, "{}{}{}> ", status, self.api.session().title(), dirty)?;
        out.flush()?;
        Ok(())
    }

    fn persist_settings(&self) {
        if let Some(path) = &self.settings_path
            && let Err(e) = self.settings.save(path)
        {
            log::warn!("Failed to save settings {}: {}", path.display(), e);
        }
    }
}

/// Entry point of the `quire` binary.
pub fn run() -> Result<()> {
    let notes_dir = resolve_notes_dir(std::env::args().nth(1), std::env::var(NOTES_DIR_ENV).ok());
    let api = match notes_dir {
        Some(dir) => NotesApi::new(dir)?,
        None => NotesApi::with_default_path(cfg!(debug_assertions))?,
    };
    log::info!("Using notes directory {}", api.notes_root().display());

    let settings_path = Settings::default_path();
    let settings = settings_path
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();

    let (tx, rx) = mpsc::channel();
    // Dropping the watcher stops it, so it lives until the loop ends
    let _watcher = match setup_watcher(api.notes_root(), move |event| {
        let _ = tx.send(event);
    }) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            log::warn!("Not watching notes directory: {}", e);
            None
        }
    };

    let mut app = App::new(api, settings, settings_path);
    app.set_change_feed(rx);

    let stdin = io::stdin();
    let stdout = io::stdout();
    app.run_loop(&mut stdin.lock(), &mut stdout.lock())
}

fn ask_unsaved<R: BufRead, W: Write>(current: Option<&Path>, input: &mut R, out: &mut W) -> Decision {
    let name = current
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "The current note".to_string());

    loop {
        let _ = write!(out, "{} has unsaved changes. [s]ave, [d]iscard or [c]ancel? ", name);
        let _ = out.flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return Decision::Cancel,
            Ok(_) => {}
        }

        match line.trim().to_lowercase().as_str() {
            "s" | "save" | "y" | "yes" => return Decision::Save,
            "d" | "discard" | "n" | "no" => return Decision::Discard,
            "c" | "cancel" | "" => return Decision::Cancel,
            _ => continue,
        }
    }
}

fn read_until_dot<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if line == "." {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(lines.join("\n"))
}

fn render_markdown(markdown: &str) -> String {
    use pulldown_cmark::{Options, Parser, html};

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut body = String::new();
    html::push_html(&mut body, Parser::new_ext(markdown, options));
    body
}

/// Copies an entry without its subtree.
fn detach(entry: &TreeEntry) -> TreeEntry {
    match entry.kind {
        EntryKind::Folder => TreeEntry::folder(entry.name.clone(), entry.path.clone()),
        EntryKind::Note => TreeEntry::note(entry.name.clone(), entry.path.clone()),
    }
}

fn flatten(root: &TreeEntry) -> Vec<(usize, TreeEntry)> {
    root.iter().map(|(depth, entry)| (depth, detach(entry))).collect()
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
