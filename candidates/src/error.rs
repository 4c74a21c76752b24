//! Error types for the candidate store.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for candidate store operations.
pub type Result<T> = std::result::Result<T, CandidateError>;

/// Errors that can occur while loading or persisting the candidate store.
#[derive(Error, Debug)]
pub enum CandidateError {
    /// The store file exists but could not be read, decompressed, or parsed.
    #[error("failed to load candidate store {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<CandidateError>,
    },

    /// The store could not be encoded or written.
    #[error("failed to persist candidate store {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: Box<CandidateError>,
    },

    /// Decoded content does not describe a valid store.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CandidateError {
    pub(crate) fn load(path: impl Into<PathBuf>, source: CandidateError) -> Self {
        Self::Load {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn persist(path: impl Into<PathBuf>, source: CandidateError) -> Self {
        Self::Persist {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
