use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// The notes root or a note file could not be listed, read or written.
    Io(std::io::Error),
    /// A selection resolved to something that is not a `.md` regular file.
    NotANote(PathBuf),
    /// Save was requested with no note open.
    NoActiveNote,
    /// The filesystem watcher could not be started.
    Watch(notify::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "notes unavailable: {}", err),
            Error::NotANote(path) => write!(f, "not a note: {}", path.display()),
            Error::NoActiveNote => write!(f, "no note is open"),
            Error::Watch(err) => write!(f, "failed to watch notes directory: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Watch(err) => Some(err),
            Error::NotANote(_) | Error::NoActiveNote => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
