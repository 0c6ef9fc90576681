use std::path::Path;

use notify::event::{ModifyKind, RemoveKind};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::Result;
use crate::filesystem::is_note_name;

/// Event type emitted by the filesystem watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherEvent {
    /// Notes or folders were created, modified or deleted
    NotesChanged,
    /// Notes or folders were renamed or moved
    NotesRenamed,
}

/// Sets up a filesystem watcher for the notes directory.
///
/// The watcher never touches the index itself. `on_change` runs on the
/// watcher's own thread, so callers should forward the event (for example
/// over a channel) and refresh the index from their control thread.
///
/// Returns a `RecommendedWatcher` that must be kept alive for the duration
/// of watching. Dropping it stops filesystem monitoring.
///
/// # Example
///
/// ```no_run
/// use std::sync::mpsc;
/// use quire_core::{setup_watcher, WatcherEvent};
///
/// let (tx, rx) = mpsc::channel::<WatcherEvent>();
/// let _watcher = setup_watcher("/path/to/notes", move |event| {
///     let _ = tx.send(event);
/// })?;
/// // Drain `rx` on the UI thread and call `refresh()` when something arrives
/// # Ok::<(), quire_core::Error>(())
/// ```
pub fn setup_watcher<P, F>(notes_root: P, on_change: F) -> Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: Fn(WatcherEvent) + Send + 'static,
{
    let mut watcher = RecommendedWatcher::new(
        move |result: std::result::Result<Event, notify::Error>| match result {
            Ok(event) => {
                if let Some(watcher_event) = classify_event(&event) {
                    on_change(watcher_event);
                }
            }
            Err(e) => log::error!("Filesystem watcher error: {:?}", e),
        },
        Config::default(),
    )?;

    watcher.watch(notes_root.as_ref(), RecursiveMode::Recursive)?;
    Ok(watcher)
}

/// Maps a raw notify event to what the notes tree cares about.
fn classify_event(event: &Event) -> Option<WatcherEvent> {
    let folder_removed = matches!(event.kind, EventKind::Remove(RemoveKind::Folder));
    // The old side of a move no longer exists, so a folder can only be told
    // apart by its missing extension
    let folder_renamed = matches!(event.kind, EventKind::Modify(ModifyKind::Name(_)))
        && event.paths.iter().any(|p| p.extension().is_none());
    let note_related =
        folder_removed || folder_renamed || event.paths.iter().any(|p| is_note_path(p));
    if !note_related {
        return None;
    }

    match event.kind {
        EventKind::Modify(ModifyKind::Name(_)) => Some(WatcherEvent::NotesRenamed),
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {
            Some(WatcherEvent::NotesChanged)
        }
        _ => None,
    }
}

fn is_note_path(path: &Path) -> bool {
    let is_note_file = path
        .file_name()
        .is_some_and(|name| is_note_name(&name.to_string_lossy()));
    is_note_file || path.is_dir()
}
