//! Configuration types for candidate discovery.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default program that lists executables on the search path.
pub const DEFAULT_COMMAND_PATH_PROGRAM: &str = "dmenu_path";

/// Default filesystem search program.
pub const DEFAULT_FIND_PROGRAM: &str = "find";

/// A set of starting paths and what to look for beneath them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Starting points. Relative paths are resolved against the home directory.
    pub path: Vec<String>,

    /// Version control kinds whose repositories become candidates.
    #[serde(default)]
    pub vcs: Vec<String>,

    /// Directory names to collect. `""` collects every directory.
    #[serde(default)]
    pub directory: Vec<String>,

    /// File names to collect. `""` collects every file.
    #[serde(default)]
    pub file: Vec<String>,
}

impl TargetConfig {
    /// Create a target rooted at the given paths.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Collect repositories of the given VCS kind.
    pub fn with_vcs(mut self, vcs: impl Into<String>) -> Self {
        self.vcs.push(vcs.into());
        self
    }

    /// Collect directories with the given name.
    pub fn with_directory(mut self, name: impl Into<String>) -> Self {
        self.directory.push(name.into());
        self
    }

    /// Collect files with the given name.
    pub fn with_file(mut self, name: impl Into<String>) -> Self {
        self.file.push(name.into());
        self
    }

    /// Starting points with relative entries resolved against `home`.
    pub fn resolved_paths(&self, home: &Path) -> Vec<String> {
        self.path
            .iter()
            .map(|p| resolve_path(p, home).to_string_lossy().into_owned())
            .collect()
    }
}

/// Everything a discovery cycle needs to build its scan plan.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Targets to scan.
    pub targets: Vec<TargetConfig>,

    /// Arguments placed before the starting points of every `find` call.
    pub find_arguments: Vec<String>,

    /// Filesystem search program.
    pub find_program: String,

    /// Program listing executables on the search path.
    pub command_path_program: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            find_arguments: Vec::new(),
            find_program: DEFAULT_FIND_PROGRAM.to_string(),
            command_path_program: DEFAULT_COMMAND_PATH_PROGRAM.to_string(),
        }
    }
}

/// Supported version control kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsKind {
    Git,
}

impl VcsKind {
    /// Parse a configured VCS name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "git" => Some(Self::Git),
            _ => None,
        }
    }

    /// Name of the metadata directory marking a repository root.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Git => ".git",
        }
    }
}

/// Resolve a configured path: absolute paths are kept, anything else is
/// taken relative to `home`.
pub fn resolve_path(raw: &str, home: &Path) -> PathBuf {
    if raw.starts_with('/') {
        PathBuf::from(raw)
    } else {
        home.join(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_path() {
        let home = Path::new("/home/u");

        assert_eq!(resolve_path("/etc", home), PathBuf::from("/etc"));
        assert_eq!(resolve_path("src", home), PathBuf::from("/home/u/src"));
        assert_eq!(
            resolve_path(".extended-dmenu/candidates.json.gz", home),
            PathBuf::from("/home/u/.extended-dmenu/candidates.json.gz")
        );
    }

    #[test]
    fn test_target_resolved_paths() {
        let target = TargetConfig::new(["src", "/opt/work"]);

        assert_eq!(
            target.resolved_paths(Path::new("/home/u")),
            vec!["/home/u/src".to_string(), "/opt/work".to_string()]
        );
    }

    #[test]
    fn test_vcs_kind_parse() {
        assert_eq!(VcsKind::parse("git"), Some(VcsKind::Git));
        assert_eq!(VcsKind::parse("hg"), None);
    }
}
