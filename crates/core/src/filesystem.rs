use std::collections::HashMap;
use std::fs::{self, FileType};
use std::io;
use std::path::{Path, PathBuf};

/// File name suffix that marks a note. Matched case-sensitively.
pub const NOTE_EXTENSION: &str = ".md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    Note,
}

/// One node of the notes hierarchy. Folders own their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub children: Vec<TreeEntry>,
}

impl TreeEntry {
    pub fn folder(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Folder,
            children: Vec::new(),
        }
    }

    pub fn note(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Note,
            children: Vec::new(),
        }
    }

    pub fn is_note(&self) -> bool {
        self.kind == EntryKind::Note
    }

    /// Pre-order traversal with the depth of each entry (this entry is depth 0).
    pub fn iter(&self) -> impl Iterator<Item = (usize, &TreeEntry)> {
        let mut stack = vec![(0, self)];
        std::iter::from_fn(move || {
            let (depth, entry) = stack.pop()?;
            stack.extend(entry.children.iter().rev().map(|child| (depth + 1, child)));
            Some((depth, entry))
        })
    }

    pub fn note_count(&self) -> usize {
        self.iter().filter(|(_, entry)| entry.is_note()).count()
    }
}

/// Output of a full scan: the tree and the flat name lookup built alongside it.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub root: TreeEntry,
    pub by_name: HashMap<String, PathBuf>,
}

/// Decides what a directory entry is. Anything that is neither a directory
/// nor a `.md` file is not part of the notes tree.
///
/// A symlink counts as a note when its target is a regular `.md`-named
/// file. Symlinked directories are never folders, so walks do not follow them.
pub fn classify(name: &str, path: &Path, file_type: FileType) -> Option<EntryKind> {
    if file_type.is_dir() {
        Some(EntryKind::Folder)
    } else if !is_note_name(name) {
        None
    } else if file_type.is_file() {
        Some(EntryKind::Note)
    } else if file_type.is_symlink() && fs::metadata(path).is_ok_and(|m| m.is_file()) {
        Some(EntryKind::Note)
    } else {
        None
    }
}

pub fn is_note_name(name: &str) -> bool {
    name.ends_with(NOTE_EXTENSION)
}

#[derive(Debug)]
pub struct NoteFilesystem {
    root_path: PathBuf,
}

impl NoteFilesystem {
    pub fn new<P: AsRef<Path>>(root_path: P) -> io::Result<Self> {
        let root_path = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root_path)?;
        Ok(Self { root_path })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn scan(&self) -> io::Result<ScanResult> {
        let mut by_name = HashMap::new();
        let mut root = TreeEntry::folder(
            self.root_path.to_string_lossy().to_string(),
            &self.root_path,
        );
        Self::scan_dir(&self.root_path, &mut root.children, &mut by_name)?;
        Ok(ScanResult { root, by_name })
    }

    fn scan_dir(
        dir: &Path,
        children: &mut Vec<TreeEntry>,
        by_name: &mut HashMap<String, PathBuf>,
    ) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();

            match classify(&name, &path, entry.file_type()?) {
                Some(EntryKind::Folder) => {
                    let mut folder = TreeEntry::folder(name, &path);
                    Self::scan_dir(&path, &mut folder.children, by_name)?;
                    children.push(folder);
                }
                Some(EntryKind::Note) => {
                    // Later duplicates replace earlier ones
                    by_name.insert(name.clone(), path.clone());
                    children.push(TreeEntry::note(name, path));
                }
                None => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_new_creates_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("Notes");

        let fs = NoteFilesystem::new(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(fs.root_path(), root);
    }

    #[test]
    fn test_scan_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        let fs = NoteFilesystem::new(temp_dir.path()).unwrap();

        let scan = fs.scan().unwrap();
        assert_eq!(scan.root.kind, EntryKind::Folder);
        assert_eq!(scan.root.path, temp_dir.path());
        assert!(scan.root.children.is_empty());
        assert!(scan.by_name.is_empty());
    }

    #[test]
    fn test_scan_counts_notes_and_folders() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "inbox.md", "Inbox");
        write(root, "projects/rust.md", "Rust");
        write(root, "projects/deep/nested/idea.md", "Idea");
        fs::create_dir_all(root.join("empty")).unwrap();

        let fs = NoteFilesystem::new(root).unwrap();
        let scan = fs.scan().unwrap();

        assert_eq!(scan.root.note_count(), 3);
        let folders: Vec<_> = scan
            .root
            .iter()
            .skip(1)
            .filter(|(_, e)| e.kind == EntryKind::Folder)
            .map(|(_, e)| e.name.as_str())
            .collect();
        assert_eq!(folders.len(), 4);
        assert!(folders.contains(&"empty"));
        assert!(folders.contains(&"nested"));
    }

    #[test]
    fn test_scan_skips_non_note_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "todo.txt", "nope");
        write(root, "README.MD", "wrong case");
        write(root, "keep.md", "yes");

        let fs = NoteFilesystem::new(root).unwrap();
        let scan = fs.scan().unwrap();

        let names: Vec<_> = scan.root.children.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["keep.md"]);
        assert_eq!(scan.by_name.len(), 1);
    }

    #[test]
    fn test_scan_nests_children_under_folders() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a/note1.md", "hello world");

        let fs = NoteFilesystem::new(root).unwrap();
        let scan = fs.scan().unwrap();

        assert_eq!(scan.root.children.len(), 1);
        let folder = &scan.root.children[0];
        assert_eq!(folder.name, "a");
        assert_eq!(folder.kind, EntryKind::Folder);
        assert_eq!(folder.children.len(), 1);
        assert_eq!(folder.children[0].path, root.join("a/note1.md"));
        assert!(folder.children[0].is_note());
    }

    #[test]
    fn test_scan_by_name_last_seen_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a/dup.md", "first");
        write(root, "b/dup.md", "second");

        let fs = NoteFilesystem::new(root).unwrap();
        let scan = fs.scan().unwrap();

        let notes: Vec<_> = scan
            .root
            .iter()
            .filter(|(_, e)| e.is_note())
            .map(|(_, e)| e.path.clone())
            .collect();
        assert_eq!(notes.len(), 2);
        assert_eq!(scan.by_name.len(), 1);
        assert_eq!(scan.by_name["dup.md"], *notes.last().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_includes_symlinked_notes() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "real.md", "linked content");
        fs::create_dir_all(temp_dir.path().join("elsewhere")).unwrap();
        write(temp_dir.path(), "elsewhere/inner.md", "not walked");
        let root = temp_dir.path().join("notes");
        fs::create_dir_all(&root).unwrap();
        symlink(temp_dir.path().join("real.md"), root.join("link.md")).unwrap();
        symlink(temp_dir.path().join("elsewhere"), root.join("dir-link")).unwrap();
        symlink(temp_dir.path().join("missing.md"), root.join("dangling.md")).unwrap();

        let fs = NoteFilesystem::new(&root).unwrap();
        let scan = fs.scan().unwrap();

        let names: Vec<_> = scan.root.children.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["link.md"]);
        assert!(scan.root.children[0].is_note());
        assert_eq!(scan.by_name["link.md"], root.join("link.md"));
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("gone");
        let fs = NoteFilesystem::new(&root).unwrap();
        fs::remove_dir(&root).unwrap();

        assert!(fs.scan().is_err());
    }

    #[test]
    fn test_iter_reports_depth() {
        let mut root = TreeEntry::folder("root", "/r");
        let mut sub = TreeEntry::folder("sub", "/r/sub");
        sub.children.push(TreeEntry::note("n.md", "/r/sub/n.md"));
        root.children.push(sub);
        root.children.push(TreeEntry::note("top.md", "/r/top.md"));

        let walked: Vec<_> = root.iter().map(|(d, e)| (d, e.name.as_str())).collect();
        assert_eq!(
            walked,
            vec![(0, "root"), (1, "sub"), (2, "n.md"), (1, "top.md")]
        );
    }

    #[test]
    fn test_is_note_name() {
        assert!(is_note_name("a.md"));
        assert!(is_note_name(".md"));
        assert!(!is_note_name("a.MD"));
        assert!(!is_note_name("a.md.txt"));
    }
}
