use std::path::PathBuf;

/// Returns the platform default notes directory: `~/Notes`, or `~/Notes-dev`
/// for debug builds so development never touches real notes.
///
/// Returns `None` when the home directory cannot be determined.
pub fn get_default_notes_path(debug: bool) -> Option<PathBuf> {
    let dir_name = if debug { "Notes-dev" } else { "Notes" };
    dirs::home_dir().map(|home| home.join(dir_name))
}
