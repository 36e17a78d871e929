use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnipitError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file is corrupt; check {}: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid import file {}: {source}", .path.display())]
    InvalidImport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A file or folder already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Snippet ids exhausted: no id above {0}")]
    IdOverflow(i64),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

impl SnipitError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnipitError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SnipitError>;
