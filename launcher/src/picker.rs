//! The interactive picker collaborator.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{LauncherError, Result};

/// Presents candidates and returns the user's choice.
#[async_trait]
pub trait Picker: Send + Sync {
    /// Show `input` (one candidate per line) and wait for a selection.
    ///
    /// Returns `None` when the user made no selection.
    async fn pick(&self, input: String) -> Result<Option<String>>;
}

/// [`Picker`] that runs `dmenu` (or a compatible program).
///
/// Candidates are written to the program's stdin, the selection is read from
/// its stdout, and its stderr goes straight to ours.
#[derive(Debug, Clone)]
pub struct DmenuPicker {
    program: String,
    args: Vec<String>,
}

impl DmenuPicker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl Picker for DmenuPicker {
    async fn pick(&self, input: String) -> Result<Option<String>> {
        let spawn_error = |source| LauncherError::Picker {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin from a separate task so a long list cannot fill the pipe
        // while we are not yet reading stdout.
        let writer = child.stdin.take().map(|mut stdin| {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    debug!("Picker closed its input early: {e}");
                }
            })
        });

        let output = child.wait_with_output().await.map_err(spawn_error)?;
        if let Some(writer) = writer {
            if let Err(e) = writer.await {
                debug!("Picker input writer did not finish: {e}");
            }
        }
        debug!("Picker exited with {}", output.status);

        Ok(parse_selection(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// The first line of picker output, or `None` when that line is empty.
pub fn parse_selection(output: &str) -> Option<String> {
    output
        .lines()
        .next()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}
