//! Scan tasks and the plan that expands configuration into them.

use std::fmt;
use std::path::Path;

use tracing::warn;

use crate::config::{DiscoveryConfig, TargetConfig, VcsKind};

/// What a scan task looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanKind {
    /// Executables on the search path.
    CommandPath,

    /// Repository roots of the given VCS.
    Repository(VcsKind),

    /// Directories; `None` matches every directory.
    Directory(Option<String>),

    /// Files; `None` matches every file.
    File(Option<String>),
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandPath => write!(f, "commands on the search path"),
            Self::Repository(VcsKind::Git) => write!(f, "git repositories"),
            Self::Directory(None) => write!(f, "all directories"),
            Self::Directory(Some(name)) => write!(f, "directories named {name:?}"),
            Self::File(None) => write!(f, "all files"),
            Self::File(Some(name)) => write!(f, "files named {name:?}"),
        }
    }
}

/// One external invocation whose output lines become candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTask {
    pub kind: ScanKind,

    /// Program to run.
    pub program: String,

    /// Full argument list.
    pub args: Vec<String>,

    /// Starting points, for diagnostics. Empty for the command-path task.
    pub roots: Vec<String>,
}

impl ScanTask {
    /// Task listing executables on the search path.
    pub fn command_path(program: impl Into<String>) -> Self {
        Self {
            kind: ScanKind::CommandPath,
            program: program.into(),
            args: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// `find` task: `<find_arguments> <roots> <expression>`.
    pub fn find(
        kind: ScanKind,
        program: impl Into<String>,
        find_arguments: &[String],
        roots: Vec<String>,
    ) -> Self {
        let mut args = find_arguments.to_vec();
        args.extend(roots.iter().cloned());
        args.extend(find_expression(&kind));
        Self {
            kind,
            program: program.into(),
            args,
            roots,
        }
    }

    /// Human-readable description used when reporting failures.
    pub fn label(&self) -> String {
        if self.roots.is_empty() {
            self.kind.to_string()
        } else {
            format!("{} under {}", self.kind, self.roots.join(", "))
        }
    }

    /// Turn raw program output into candidate keys.
    pub fn collect(&self, output: &str) -> Vec<String> {
        let lines = output.lines().filter(|line| !line.is_empty());
        match &self.kind {
            ScanKind::Repository(vcs) => lines
                .map(|line| repository_root(line, vcs.marker()))
                .filter(|root| !root.is_empty())
                .collect(),
            _ => lines.map(str::to_string).collect(),
        }
    }
}

/// Predicate expression for a `find` scan.
fn find_expression(kind: &ScanKind) -> Vec<String> {
    let expression: Vec<&str> = match kind {
        ScanKind::CommandPath => Vec::new(),
        ScanKind::Repository(vcs) => vec!["-name", vcs.marker(), "-and", "-type", "d"],
        ScanKind::Directory(None) => vec!["-type", "d"],
        ScanKind::Directory(Some(name)) => vec!["-type", "d", "-and", "-name", name.as_str()],
        ScanKind::File(None) => vec!["-type", "f"],
        ScanKind::File(Some(name)) => vec!["-type", "f", "-and", "-name", name.as_str()],
    };
    expression.into_iter().map(str::to_string).collect()
}

/// Strip the trailing marker from a match, keeping the `/` before it.
///
/// `/home/u/proj/.git` becomes `/home/u/proj/`, the key form existing stores
/// already hold for repositories.
fn repository_root(path: &str, marker: &str) -> String {
    match path.strip_suffix(marker) {
        Some(rest) if rest.is_empty() || rest.ends_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

/// The full set of tasks for one discovery cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPlan {
    tasks: Vec<ScanTask>,
}

impl ScanPlan {
    /// Expand configuration into tasks.
    ///
    /// The command-path task always comes first; target tasks follow in
    /// configuration order. Unknown VCS kinds are skipped.
    pub fn build(config: &DiscoveryConfig, home: &Path) -> Self {
        let mut tasks = vec![ScanTask::command_path(&config.command_path_program)];
        for target in &config.targets {
            tasks.extend(target_tasks(target, config, home));
        }
        Self { tasks }
    }

    /// Plan from explicit tasks.
    pub fn from_tasks(tasks: Vec<ScanTask>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[ScanTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn target_tasks(target: &TargetConfig, config: &DiscoveryConfig, home: &Path) -> Vec<ScanTask> {
    let roots = target.resolved_paths(home);
    if roots.is_empty() {
        warn!("Skipping discovery target without paths");
        return Vec::new();
    }

    let mut kinds = Vec::new();
    for name in &target.vcs {
        match VcsKind::parse(name) {
            Some(vcs) => kinds.push(ScanKind::Repository(vcs)),
            None => warn!("Ignoring unsupported vcs {name:?} for {}", roots.join(", ")),
        }
    }
    kinds.extend(target.directory.iter().map(|name| ScanKind::Directory(non_empty(name))));
    kinds.extend(target.file.iter().map(|name| ScanKind::File(non_empty(name))));

    kinds
        .into_iter()
        .map(|kind| {
            ScanTask::find(
                kind,
                &config.find_program,
                &config.find_arguments,
                roots.clone(),
            )
        })
        .collect()
}

fn non_empty(name: &str) -> Option<String> {
    (!name.is_empty()).then(|| name.to_string())
}
