//! Error types for candidate discovery.

use thiserror::Error;

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors raised by a single discovery task.
///
/// These never abort a discovery cycle; the failing task simply contributes
/// no candidates.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The external program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external program exited unsuccessfully.
    #[error("{program} exited with {status}{}", format_stderr(.stderr))]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    match stderr.lines().next() {
        Some(line) if !line.trim().is_empty() => format!(": {}", line.trim()),
        _ => String::new(),
    }
}
