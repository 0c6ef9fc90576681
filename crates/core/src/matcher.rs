use std::fs;
use std::path::Path;

/// Case-insensitive substring test against an entry name.
pub fn matches_name(entry_name: &str, query: &str) -> bool {
    entry_name.to_lowercase().contains(&query.to_lowercase())
}

/// Case-insensitive substring test against the full UTF-8 text of a file.
///
/// Never fails: an unreadable or non-UTF-8 file is logged and counts as a
/// non-match so one bad file cannot abort a search.
pub fn matches_content(path: &Path, query: &str) -> bool {
    match fs::read_to_string(path) {
        Ok(content) => content.to_lowercase().contains(&query.to_lowercase()),
        Err(e) => {
            log::warn!("Failed to read {} while searching: {}", path.display(), e);
            false
        }
    }
}
