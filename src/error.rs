use thiserror::Error;

/// Classifies lexicon load failures for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Source file or directory does not exist
    NotFound,
    /// File open/read failure
    Io,
    /// Source content is not valid UTF-8
    InvalidData,
    /// Remote fetch failure
    DownloadFailed,
}

impl LoadErrorKind {
    /// Map an I/O error onto a load error kind.
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => LoadErrorKind::NotFound,
            std::io::ErrorKind::InvalidData => LoadErrorKind::InvalidData,
            _ => LoadErrorKind::Io,
        }
    }
}

/// A named lexicon source could not be read.
///
/// Fatal to the load attempt: a partially loaded lexicon is never returned.
#[derive(Error, Debug)]
#[error("Failed to load lexicon source '{source_name}': {message}")]
pub struct LexiconLoadError {
    pub source_name: String,
    pub kind: LoadErrorKind,
    pub message: String,
}

impl LexiconLoadError {
    pub fn new(
        source_name: impl Into<String>,
        kind: LoadErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            kind,
            message: message.into(),
        }
    }

    /// Wrap an I/O error raised while reading `source_name`.
    pub fn from_io(source_name: impl Into<String>, err: std::io::Error) -> Self {
        Self::new(source_name, LoadErrorKind::from_io(&err), err.to_string())
    }
}

/// Lexicon guard error types
#[derive(Error, Debug)]
pub enum GuardError {
    #[error(transparent)]
    Load(#[from] LexiconLoadError),

    #[error("Empty keyword")]
    EmptyKeyword,

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, GuardError>;
