//! Launcher configuration.
//!
//! The file is TOML with camelCase keys:
//!
//! ```toml
//! candidateFilePath = ".extended-dmenu/candidates.json.gz"
//! dmenuArguments = ["-i", "-l", "20"]
//! commandForDirectory = "thunar"
//! findArguments = ["-L"]
//!
//! [[command]]
//! target = "\\.pdf$"
//! command = "zathura"
//!
//! [[target]]
//! path = ["src", "/opt/work"]
//! vcs = ["git"]
//! directory = ["notes"]
//! file = ["*.pdf"]
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use xdmenu_discovery::{DiscoveryConfig, TargetConfig, config as discovery_config, resolve_path};

use crate::error::ConfigError;

/// Store location used when `candidateFilePath` is not set, relative to home.
pub const DEFAULT_CANDIDATE_FILE_PATH: &str = ".extended-dmenu/candidates.json.gz";

/// Config location used when neither `--config` nor `XDMENU_CONFIG` is set.
pub const DEFAULT_CONFIG_FILE_PATH: &str = ".extended-dmenu/config.toml";

/// Environment variable overriding the config location.
pub const CONFIG_ENV_VAR: &str = "XDMENU_CONFIG";

/// Default picker program.
pub const DEFAULT_PICKER_PROGRAM: &str = "dmenu";

/// A `{target, command}` dispatch rule for selected files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRule {
    /// Regular expression tested against the selected path.
    pub target: String,

    /// Program run with the selected path as its only argument.
    pub command: String,
}

impl CommandRule {
    pub fn new(target: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            command: command.into(),
        }
    }
}

/// Configuration for the launcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LauncherConfig {
    /// Store file; relative paths are resolved against home.
    pub candidate_file_path: Option<String>,

    /// Extra arguments for the picker.
    pub dmenu_arguments: Vec<String>,

    /// Program run on a selected directory.
    pub command_for_directory: Option<String>,

    /// Ordered dispatch rules for selected files; first match wins.
    pub command: Vec<CommandRule>,

    /// Discovery targets.
    pub target: Vec<TargetConfig>,

    /// Arguments placed before the starting points of every `find` call.
    pub find_arguments: Vec<String>,

    /// Picker program, `dmenu` when unset.
    pub picker_command: Option<String>,

    /// Filesystem search program, `find` when unset.
    pub find_command: Option<String>,

    /// Search-path listing program, `dmenu_path` when unset.
    pub command_path_command: Option<String>,
}

impl LauncherConfig {
    /// Load configuration.
    ///
    /// `explicit` (from the command line) wins, then `$XDMENU_CONFIG`, then
    /// `~/.extended-dmenu/config.toml`. An explicitly named file must exist;
    /// a missing default file yields the default configuration.
    pub fn load(explicit: Option<&Path>, home: &Path) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match env::var_os(CONFIG_ENV_VAR) {
                Some(path) => (PathBuf::from(path), true),
                None => (home.join(DEFAULT_CONFIG_FILE_PATH), false),
            },
        };
        Self::load_from(&path, required)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Absolute location of the candidate store.
    pub fn candidate_file_path(&self, home: &Path) -> PathBuf {
        let raw = self
            .candidate_file_path
            .as_deref()
            .unwrap_or(DEFAULT_CANDIDATE_FILE_PATH);
        resolve_path(raw, home)
    }

    /// Picker program.
    pub fn picker_program(&self) -> &str {
        self.picker_command.as_deref().unwrap_or(DEFAULT_PICKER_PROGRAM)
    }

    /// Settings for the discovery cycle.
    pub fn discovery(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            targets: self.target.clone(),
            find_arguments: self.find_arguments.clone(),
            find_program: self
                .find_command
                .clone()
                .unwrap_or_else(|| discovery_config::DEFAULT_FIND_PROGRAM.to_string()),
            command_path_program: self
                .command_path_command
                .clone()
                .unwrap_or_else(|| discovery_config::DEFAULT_COMMAND_PATH_PROGRAM.to_string()),
        }
    }
}

/// The current user's home directory.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)
}
