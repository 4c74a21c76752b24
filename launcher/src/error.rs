//! Error types for the launcher.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for launcher operations.
pub type Result<T> = std::result::Result<T, LauncherError>;

/// Errors that end an open or update cycle.
#[derive(Error, Debug)]
pub enum LauncherError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Candidate store could not be loaded or persisted.
    #[error(transparent)]
    Candidates(#[from] xdmenu_candidates::CandidateError),

    /// The picker could not be run.
    #[error("picker {program} failed: {source}")]
    Picker {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    /// A dispatch rule's target is not a valid regular expression.
    #[error("invalid command target {pattern:?}: {source}")]
    InvalidRule {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}

/// Errors raised while launching a selection.
///
/// These are reported but never undo the score update or skip persistence.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The handler could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The handler exited unsuccessfully.
    #[error("{program} exited with {status}")]
    ExitStatus { program: String, status: String },

    /// A directory was selected but no directory handler is configured.
    #[error("no commandForDirectory configured for directory {0}")]
    NoDirectoryHandler(String),
}
