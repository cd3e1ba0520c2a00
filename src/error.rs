use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The report JSON could not be parsed.
    Json(serde_json::Error),
    /// The configured report font could not be read or parsed.
    Font(String),
    /// The file store rejected an upload or lookup.
    Store(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Json(e) => write!(f, "Invalid report: {e}"),
            Error::Font(msg) => write!(f, "Font error: {msg}"),
            Error::Store(msg) => write!(f, "File store error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
