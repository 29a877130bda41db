use crate::domain::TaskId;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a remote store call
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed collection document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write collection: {0:#}")]
    Write(anyhow::Error),

    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("subscription closed")]
    Closed,
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
