use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::filesystem::{EntryKind, TreeEntry};
use crate::session::EditorSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Clean,
    Dirty,
}

impl EditorState {
    pub fn of(session: &EditorSession, editor_text: &str) -> Self {
        if session.is_dirty(editor_text) {
            EditorState::Dirty
        } else {
            EditorState::Clean
        }
    }
}

/// Answer to "you have unsaved changes" when switching notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Save the open note, then open the new one.
    Save,
    /// Open the new note and drop the edits.
    Discard,
    /// Stay on the current note.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The note was opened. `saved` names the note persisted before switching.
    Loaded {
        path: PathBuf,
        content: String,
        saved: Option<PathBuf>,
    },
    /// The user kept the current note; the UI should restore its selection.
    Cancelled,
    /// The entry cannot be opened (a folder or a vanished file).
    Ignored,
}

/// Switches the editor to `entry`, asking `decide` what to do with unsaved
/// edits. `decide` is only called when the editor is dirty and receives the
/// path of the note that holds those edits.
pub fn select_entry<F>(
    session: &mut EditorSession,
    entry: &TreeEntry,
    editor_text: &str,
    decide: F,
) -> Result<Selection>
where
    F: FnOnce(Option<&Path>) -> Decision,
{
    match entry.kind {
        EntryKind::Folder => return Ok(Selection::Ignored),
        EntryKind::Note => {}
    }

    let mut saved = None;
    if EditorState::of(session, editor_text) == EditorState::Dirty {
        match decide(session.current_path()) {
            Decision::Cancel => return Ok(Selection::Cancelled),
            Decision::Discard => {}
            Decision::Save => match session.save(editor_text) {
                Ok(()) => saved = session.current_path().map(Path::to_path_buf),
                // Nothing open means nothing to lose
                Err(Error::NoActiveNote) => {}
                Err(e) => return Err(e),
            },
        }
    }

    match session.load(&entry.path) {
        Ok(content) => Ok(Selection::Loaded {
            path: entry.path.clone(),
            content,
            saved,
        }),
        Err(Error::NotANote(path)) => {
            log::debug!("Ignoring selection of {}", path.display());
            Ok(Selection::Ignored)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        note1: TreeEntry,
        note2: TreeEntry,
        folder: TreeEntry,
    }

    fn setup() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("a/note1.md"), "hello world").unwrap();
        fs::write(root.join("b/note2.md"), "goodbye").unwrap();

        Fixture {
            note1: TreeEntry::note("note1.md", root.join("a/note1.md")),
            note2: TreeEntry::note("note2.md", root.join("b/note2.md")),
            folder: TreeEntry::folder("b", root.join("b")),
            _temp_dir: temp_dir,
        }
    }

    fn never_asked(_: Option<&Path>) -> Decision {
        panic!("clean editor should not prompt");
    }

    #[test]
    fn test_clean_editor_loads_directly() {
        let fx = setup();
        let mut session = EditorSession::new();

        let selection = select_entry(&mut session, &fx.note1, "", never_asked).unwrap();
        assert_eq!(
            selection,
            Selection::Loaded {
                path: fx.note1.path.clone(),
                content: "hello world".to_string(),
                saved: None,
            }
        );
        assert_eq!(session.current_path(), Some(fx.note1.path.as_path()));
    }

    #[test]
    fn test_dirty_discard_leaves_disk_untouched() {
        let fx = setup();
        let mut session = EditorSession::new();
        select_entry(&mut session, &fx.note1, "", never_asked).unwrap();

        let asked = Cell::new(false);
        let selection = select_entry(&mut session, &fx.note2, "hi", |current| {
            asked.set(true);
            assert_eq!(current, Some(fx.note1.path.as_path()));
            Decision::Discard
        })
        .unwrap();

        assert!(asked.get());
        assert!(matches!(selection, Selection::Loaded { saved: None, .. }));
        assert_eq!(session.current_path(), Some(fx.note2.path.as_path()));
        assert_eq!(session.loaded_content(), "goodbye");
        assert_eq!(fs::read_to_string(&fx.note1.path).unwrap(), "hello world");
    }

    #[test]
    fn test_dirty_save_then_load() {
        let fx = setup();
        let mut session = EditorSession::new();
        select_entry(&mut session, &fx.note1, "", never_asked).unwrap();

        let selection =
            select_entry(&mut session, &fx.note2, "hi\n", |_| Decision::Save).unwrap();

        assert_eq!(
            selection,
            Selection::Loaded {
                path: fx.note2.path.clone(),
                content: "goodbye".to_string(),
                saved: Some(fx.note1.path.clone()),
            }
        );
        assert_eq!(fs::read_to_string(&fx.note1.path).unwrap(), "hi");
        assert!(!session.is_dirty("goodbye"));
    }

    #[test]
    fn test_dirty_cancel_keeps_current_note() {
        let fx = setup();
        let mut session = EditorSession::new();
        select_entry(&mut session, &fx.note1, "", never_asked).unwrap();

        let selection = select_entry(&mut session, &fx.note2, "hi", |_| Decision::Cancel).unwrap();

        assert_eq!(selection, Selection::Cancelled);
        assert_eq!(session.current_path(), Some(fx.note1.path.as_path()));
        assert!(session.is_dirty("hi"));
        assert_eq!(fs::read_to_string(&fx.note1.path).unwrap(), "hello world");
    }

    #[test]
    fn test_folder_selection_is_ignored_without_prompt() {
        let fx = setup();
        let mut session = EditorSession::new();
        select_entry(&mut session, &fx.note1, "", never_asked).unwrap();

        let selection = select_entry(&mut session, &fx.folder, "unsaved", never_asked).unwrap();
        assert_eq!(selection, Selection::Ignored);
        assert_eq!(session.current_path(), Some(fx.note1.path.as_path()));
    }

    #[test]
    fn test_vanished_note_is_ignored() {
        let fx = setup();
        let mut session = EditorSession::new();
        fs::remove_file(&fx.note2.path).unwrap();

        let selection = select_entry(&mut session, &fx.note2, "", never_asked).unwrap();
        assert_eq!(selection, Selection::Ignored);
        assert!(session.current_path().is_none());
    }

    #[test]
    fn test_editor_state() {
        let fx = setup();
        let mut session = EditorSession::new();
        session.load(&fx.note1.path).unwrap();

        assert_eq!(EditorState::of(&session, "hello world\n"), EditorState::Clean);
        assert_eq!(EditorState::of(&session, "hello"), EditorState::Dirty);
    }

    #[test]
    fn test_unedited_note_with_trailing_newline_prompts() {
        let fx = setup();
        fs::write(&fx.note1.path, "hello world\n").unwrap();
        let mut session = EditorSession::new();
        let Selection::Loaded { content, .. } =
            select_entry(&mut session, &fx.note1, "", never_asked).unwrap()
        else {
            panic!("note1 should load");
        };
        assert_eq!(EditorState::of(&session, &content), EditorState::Dirty);

        let asked = Cell::new(false);
        let selection = select_entry(&mut session, &fx.note2, &content, |_| {
            asked.set(true);
            Decision::Discard
        })
        .unwrap();

        assert!(asked.get());
        assert!(matches!(selection, Selection::Loaded { .. }));
        assert_eq!(fs::read_to_string(&fx.note1.path).unwrap(), "hello world\n");
    }
}
