use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::filesystem::{EntryKind, NoteFilesystem, TreeEntry, classify};
use crate::matcher::{matches_content, matches_name};

/// In-memory view of the notes directory: the folder tree and a flat
/// file-name lookup, both produced by the same scan.
#[derive(Debug)]
pub struct NoteIndex {
    fs: NoteFilesystem,
    root: TreeEntry,
    by_name: HashMap<String, PathBuf>,
}

impl NoteIndex {
    /// Opens (creating if needed) the notes root and performs the initial scan.
    pub fn new<P: AsRef<Path>>(notes_root: P) -> Result<Self> {
        let fs = NoteFilesystem::new(notes_root)?;
        let scan = fs.scan()?;
        Ok(Self {
            fs,
            root: scan.root,
            by_name: scan.by_name,
        })
    }

    pub fn notes_root(&self) -> &Path {
        self.fs.root_path()
    }

    pub fn filesystem(&self) -> &NoteFilesystem {
        &self.fs
    }

    pub fn root(&self) -> &TreeEntry {
        &self.root
    }

    pub fn path_for_name(&self, name: &str) -> Option<&Path> {
        self.by_name.get(name).map(PathBuf::as_path)
    }

    /// Number of note leaves in the tree, counting notes that share a name.
    pub fn note_count(&self) -> usize {
        self.root.note_count()
    }

    /// Rescans the root and swaps in the new tree and lookup together.
    /// If the scan fails the previous index is left untouched.
    pub fn rebuild(&mut self) -> Result<()> {
        let scan = self.fs.scan()?;
        self.root = scan.root;
        self.by_name = scan.by_name;
        log::debug!(
            "Rebuilt index of {}: {} notes",
            self.notes_root().display(),
            self.note_count()
        );
        Ok(())
    }

    /// Answers a search box query.
    ///
    /// An empty (or whitespace-only) query reloads the index and returns the
    /// full tree as a single root entry. Anything else walks the directory
    /// afresh and returns a flat list: folders whose own name matches, and
    /// notes whose name matches or, with `search_content`, whose text does.
    ///
    /// A folder is listed only when its own name matches; matching
    /// descendants do not pull their parent folder into the results.
    pub fn filter(&mut self, query: &str, search_content: bool) -> Result<Vec<TreeEntry>> {
        let query = query.trim();
        if query.is_empty() {
            self.rebuild()?;
            return Ok(vec![self.root.clone()]);
        }

        // Surface an unreadable root instead of returning an empty result
        fs::read_dir(self.notes_root())?;

        let mut results = Vec::new();
        for entry in WalkDir::new(self.notes_root()).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry during search: {}", e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            match classify(&name, entry.path(), entry.file_type()) {
                Some(EntryKind::Folder) => {
                    if matches_name(&name, query) {
                        results.push(TreeEntry::folder(name, entry.path()));
                    }
                }
                Some(EntryKind::Note) => {
                    let hit = matches_name(&name, query)
                        || (search_content && matches_content(entry.path(), query));
                    if hit {
                        results.push(TreeEntry::note(name, entry.path()));
                    }
                }
                None => {}
            }
        }

        log::debug!("Query {:?} matched {} entries", query, results.len());
        Ok(results)
    }
}
