//! Launching a selected candidate.
//!
//! A selection is classified by what it names on the filesystem:
//!
//! - nothing: it is run directly as a command, attached to our terminal
//! - a directory: `commandForDirectory` is run on it
//! - a file: the first `command` rule whose pattern matches is run on it

use std::fmt;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use regex_lite::Regex;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{CommandRule, LauncherConfig};
use crate::error::{ConfigError, DispatchError};

/// What a selection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// Not an existing path; treated as a command.
    Command,
    Directory,
    File,
}

impl SelectionKind {
    /// Classify a selection by looking it up on the filesystem.
    pub async fn classify(selection: &str) -> Self {
        match fs::metadata(Path::new(selection)).await {
            Ok(metadata) if metadata.is_dir() => Self::Directory,
            Ok(_) => Self::File,
            Err(_) => Self::Command,
        }
    }
}

/// How a launched program is wired to our standard streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStdio {
    /// Shares stdin, stdout, and stderr with the launcher.
    Inherit,

    /// No stdin or stdout; stderr is still shared for diagnostics.
    Handler,
}

/// A program to run for a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: String,
    pub args: Vec<String>,
    pub stdio: LaunchStdio,
}

impl LaunchRequest {
    /// Run `selection` itself as a command.
    pub fn direct(selection: &str) -> Self {
        Self {
            program: selection.to_string(),
            args: Vec::new(),
            stdio: LaunchStdio::Inherit,
        }
    }

    /// Run `program` with `selection` as its only argument.
    pub fn handler(program: &str, selection: &str) -> Self {
        Self {
            program: program.to_string(),
            args: vec![selection.to_string()],
            stdio: LaunchStdio::Handler,
        }
    }
}

impl fmt::Display for LaunchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Compiled `{target, command}` rule.
#[derive(Debug, Clone)]
pub struct DispatchRule {
    pattern: Regex,
    command: String,
}

impl DispatchRule {
    pub fn compile(rule: &CommandRule) -> Result<Self, ConfigError> {
        let pattern = Regex::new(&rule.target).map_err(|source| ConfigError::InvalidRule {
            pattern: rule.target.clone(),
            source,
        })?;
        Ok(Self {
            pattern,
            command: rule.command.clone(),
        })
    }

    /// Whether the pattern matches anywhere in `selection`.
    pub fn matches(&self, selection: &str) -> bool {
        self.pattern.is_match(selection)
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Decides which program handles a selection.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    directory_handler: Option<String>,
    rules: Vec<DispatchRule>,
}

impl DispatchTable {
    /// Build the table from configuration, compiling every rule.
    pub fn from_config(config: &LauncherConfig) -> Result<Self, ConfigError> {
        let rules = config
            .command
            .iter()
            .map(DispatchRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            directory_handler: config.command_for_directory.clone(),
            rules,
        })
    }

    /// The request for `selection`, or `None` when a file matches no rule.
    pub fn plan(
        &self,
        selection: &str,
        kind: SelectionKind,
    ) -> Result<Option<LaunchRequest>, DispatchError> {
        match kind {
            SelectionKind::Command => Ok(Some(LaunchRequest::direct(selection))),
            SelectionKind::Directory => match &self.directory_handler {
                Some(handler) => Ok(Some(LaunchRequest::handler(handler, selection))),
                None => Err(DispatchError::NoDirectoryHandler(selection.to_string())),
            },
            SelectionKind::File => Ok(self
                .rules
                .iter()
                .find(|rule| rule.matches(selection))
                .map(|rule| LaunchRequest::handler(rule.command(), selection))),
        }
    }
}

/// Result of dispatching a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The request ran and exited successfully.
    Launched(LaunchRequest),

    /// The selection is a file that no rule matched; nothing ran.
    NoMatchingRule,

    /// Dispatch failed; the message is the rendered error.
    Failed(String),
}

/// Starts programs for selections.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Run `request` and wait for it to exit.
    async fn launch(&self, request: &LaunchRequest) -> Result<(), DispatchError>;
}

/// [`Launcher`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, request: &LaunchRequest) -> Result<(), DispatchError> {
        info!("Launching {request}");

        let mut command = Command::new(&request.program);
        command.args(&request.args);
        match request.stdio {
            LaunchStdio::Inherit => {
                command
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            LaunchStdio::Handler => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::inherit());
            }
        }

        let status = command
            .status()
            .await
            .map_err(|source| DispatchError::Spawn {
                program: request.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DispatchError::ExitStatus {
                program: request.program.clone(),
                status: status.to_string(),
            });
        }
        debug!("{} exited successfully", request.program);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn table() -> DispatchTable {
        let config = LauncherConfig {
            command_for_directory: Some("thunar".to_string()),
            command: vec![
                CommandRule::new("\\.pdf$", "zathura"),
                CommandRule::new("\\.(png|jpe?g)$", "feh"),
                CommandRule::new("report", "libreoffice"),
            ],
            ..LauncherConfig::default()
        };
        DispatchTable::from_config(&config).unwrap()
    }

    #[test]
    fn test_command_runs_directly() {
        assert_eq!(
            table().plan("firefox", SelectionKind::Command).unwrap(),
            Some(LaunchRequest::direct("firefox"))
        );
        assert_eq!(LaunchRequest::direct("firefox").stdio, LaunchStdio::Inherit);
    }

    #[test]
    fn test_directory_uses_directory_handler() {
        assert_eq!(
            table().plan("/home/u/proj", SelectionKind::Directory).unwrap(),
            Some(LaunchRequest::handler("thunar", "/home/u/proj"))
        );
    }

    #[test]
    fn test_directory_without_handler_fails() {
        let table = DispatchTable::from_config(&LauncherConfig::default()).unwrap();
        assert!(matches!(
            table.plan("/home/u/proj", SelectionKind::Directory),
            Err(DispatchError::NoDirectoryHandler(_))
        ));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let request = table()
            .plan("/home/u/report.pdf", SelectionKind::File)
            .unwrap()
            .unwrap();
        assert_eq!(request.program, "zathura");
        assert_eq!(request.args, vec!["/home/u/report.pdf"]);

        let request = table()
            .plan("/home/u/report.odt", SelectionKind::File)
            .unwrap()
            .unwrap();
        assert_eq!(request.program, "libreoffice");
    }

    #[test]
    fn test_unmatched_file_runs_nothing() {
        assert_eq!(table().plan("/home/u/notes.txt", SelectionKind::File).unwrap(), None);
    }

    #[test]
    fn test_invalid_rule_is_config_error() {
        let config = LauncherConfig {
            command: vec![CommandRule::new("(unclosed", "x")],
            ..LauncherConfig::default()
        };
        assert!(matches!(
            DispatchTable::from_config(&config),
            Err(ConfigError::InvalidRule { .. })
        ));
    }

    #[tokio::test]
    async fn test_classify() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.pdf");
        std::fs::write(&file, b"%PDF").unwrap();

        let dir = temp_dir.path().to_string_lossy().into_owned();
        let file = file.to_string_lossy().into_owned();
        assert_eq!(SelectionKind::classify(&dir).await, SelectionKind::Directory);
        assert_eq!(SelectionKind::classify(&file).await, SelectionKind::File);
        assert_eq!(
            SelectionKind::classify("xdmenu-not-a-path").await,
            SelectionKind::Command
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_launcher_reports_exit_status() {
        let ok = LaunchRequest::handler("true", "ignored");
        ProcessLauncher.launch(&ok).await.unwrap();

        let failing = LaunchRequest::handler("false", "ignored");
        assert!(matches!(
            ProcessLauncher.launch(&failing).await,
            Err(DispatchError::ExitStatus { .. })
        ));

        let missing = LaunchRequest::direct("xdmenu-no-such-command");
        assert!(matches!(
            ProcessLauncher.launch(&missing).await,
            Err(DispatchError::Spawn { .. })
        ));
    }
}
