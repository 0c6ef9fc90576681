use std::path::Path;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::filesystem::TreeEntry;
use crate::index::NoteIndex;
use crate::notification::Notifier;
use crate::selection::{Decision, Selection, select_entry};
use crate::session::EditorSession;

/// Application state of a notes window, without the widgets.
///
/// Owns the index of the notes directory, the open document and the
/// transient notification, plus the "search file contents" toggle.
/// Everything runs on the caller's thread.
pub struct NotesApi {
    index: NoteIndex,
    session: EditorSession,
    notifier: Notifier,
    search_content: bool,
}

impl NotesApi {
    /// Creates a new NotesApi instance.
    ///
    /// Creates the notes directory if it doesn't exist and builds the initial index.
    pub fn new<P: AsRef<Path>>(notes_root: P) -> Result<Self> {
        Ok(Self {
            index: NoteIndex::new(notes_root)?,
            session: EditorSession::new(),
            notifier: Notifier::new(),
            search_content: false,
        })
    }

    /// Creates a new NotesApi instance using the platform default notes directory.
    ///
    /// # Arguments
    /// * `debug` - Whether the application is running in debug mode (uses separate directory)
    ///
    /// # Example
    /// ```no_run
    /// use quire_core::NotesApi;
    ///
    /// let api = NotesApi::with_default_path(cfg!(debug_assertions))?;
    /// println!("{} notes", api.tree().note_count());
    /// # Ok::<(), quire_core::Error>(())
    /// ```
    pub fn with_default_path(debug: bool) -> Result<Self> {
        let notes_root = crate::default_paths::get_default_notes_path(debug).ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine default notes path (home directory not found)",
            ))
        })?;

        Self::new(notes_root)
    }

    /// Returns the root path of the notes directory.
    pub fn notes_root(&self) -> &Path {
        self.index.notes_root()
    }

    /// The full notes tree as of the last rebuild.
    pub fn tree(&self) -> &TreeEntry {
        self.index.root()
    }

    pub fn path_for_name(&self, name: &str) -> Option<&Path> {
        self.index.path_for_name(name)
    }

    /// Rescans the notes directory.
    pub fn refresh(&mut self) -> Result<()> {
        self.index.rebuild()
    }

    pub fn search_content(&self) -> bool {
        self.search_content
    }

    pub fn set_search_content(&mut self, enabled: bool) {
        self.search_content = enabled;
    }

    /// Runs the search box query using the current content toggle.
    ///
    /// See [`NoteIndex::filter`]: an empty query reloads and returns the tree,
    /// anything else returns a flat list of matches.
    pub fn search(&mut self, query: &str) -> Result<Vec<TreeEntry>> {
        self.index.filter(query, self.search_content)
    }

    /// Opens `entry` in the editor, resolving unsaved edits through `decide`.
    ///
    /// Raises a "note saved" notification when the previous note was saved
    /// on the way.
    pub fn select<F>(&mut self, entry: &TreeEntry, editor_text: &str, decide: F) -> Result<Selection>
    where
        F: FnOnce(Option<&Path>) -> Decision,
    {
        let selection = select_entry(&mut self.session, entry, editor_text, decide)?;
        if let Selection::Loaded {
            saved: Some(saved), ..
        } = &selection
        {
            self.notify_saved(saved);
        }
        Ok(selection)
    }

    /// Saves the editor text over the open note and raises a notification.
    ///
    /// Returns `Error::NoActiveNote` when nothing is open; callers treat that
    /// as a no-op.
    pub fn save(&mut self, editor_text: &str) -> Result<()> {
        self.session.save(editor_text)?;
        if let Some(path) = self.session.current_path().map(Path::to_path_buf) {
            self.notify_saved(&path);
        }
        Ok(())
    }

    pub fn is_dirty(&self, editor_text: &str) -> bool {
        self.session.is_dirty(editor_text)
    }

    pub fn toggle_markdown_mode(&mut self) -> bool {
        self.session.toggle_markdown_mode()
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    /// The notification to show at `now`, if one is still visible.
    pub fn notification(&mut self, now: Instant) -> Option<&str> {
        self.notifier.current(now)
    }

    fn notify_saved(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.notifier.show(format!("Note saved: {}", name));
    }
}
