pub mod default_paths;
pub mod error;
pub mod filesystem;
pub mod index;
pub mod matcher;
pub mod notes;
pub mod notification;
pub mod selection;
pub mod session;
pub mod watcher;

// Re-export main types for convenience
pub use default_paths::get_default_notes_path;
pub use error::{Error, Result};
pub use filesystem::{EntryKind, NOTE_EXTENSION, NoteFilesystem, ScanResult, TreeEntry};
pub use index::NoteIndex;
pub use notes::NotesApi;
pub use notification::{NOTIFICATION_DURATION, Notification, Notifier};
pub use selection::{Decision, EditorState, Selection, select_entry};
pub use session::EditorSession;
pub use watcher::{WatcherEvent, setup_watcher};
