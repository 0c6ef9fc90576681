use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::filesystem::is_note_name;

const APP_TITLE: &str = "Quire";

/// The single document open in the editor.
///
/// `loaded_content` is the clean snapshot: the exact text read at load time
/// or written by the last save. Dirtiness is always derived from it.
#[derive(Debug, Default)]
pub struct EditorSession {
    current_path: Option<PathBuf>,
    loaded_content: String,
    markdown_mode: bool,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn loaded_content(&self) -> &str {
        &self.loaded_content
    }

    pub fn markdown_mode(&self) -> bool {
        self.markdown_mode
    }

    pub fn set_markdown_mode(&mut self, enabled: bool) {
        self.markdown_mode = enabled;
    }

    /// Flips between raw editing and rendered view. Returns the new mode.
    pub fn toggle_markdown_mode(&mut self) -> bool {
        self.markdown_mode = !self.markdown_mode;
        self.markdown_mode
    }

    /// Window title for the open note, e.g. `Quire - ideas.md`.
    pub fn title(&self) -> String {
        match self.current_path.as_deref().and_then(Path::file_name) {
            Some(name) => format!("{} - {}", APP_TITLE, name.to_string_lossy()),
            None => APP_TITLE.to_string(),
        }
    }

    pub fn load(&mut self, path: &Path) -> Result<String> {
        let is_note = path
            .file_name()
            .is_some_and(|name| is_note_name(&name.to_string_lossy()));
        if !is_note || !path.is_file() {
            return Err(Error::NotANote(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        self.loaded_content = content.clone();
        self.current_path = Some(path.to_path_buf());
        Ok(content)
    }

    /// Writes the trimmed editor text over the open note.
    pub fn save(&mut self, editor_text: &str) -> Result<()> {
        let path = self.current_path.as_ref().ok_or(Error::NoActiveNote)?;
        let content = editor_text.trim();

        fs::write(path, content)?;
        log::info!("Saved {}", path.display());

        self.loaded_content = content.to_string();
        Ok(())
    }

    /// Compares the trimmed editor text with the snapshot as stored. A note
    /// loaded with surrounding whitespace stays dirty until it is saved.
    pub fn is_dirty(&self, editor_text: &str) -> bool {
        editor_text.trim() != self.loaded_content
    }
}
