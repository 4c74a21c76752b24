//! Concurrent execution of a scan plan.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::runner::{CommandRunner, ProcessRunner};
use crate::task::ScanPlan;

/// A task that produced no candidates because it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// What the task was scanning, e.g. `git repositories under /home/u/src`.
    pub label: String,

    /// Rendered error.
    pub error: String,
}

/// Combined result of a discovery cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Deduplicated candidate keys from every successful task.
    pub keys: BTreeSet<String>,

    /// Number of tasks that completed successfully.
    pub succeeded: usize,

    /// Tasks that failed and contributed nothing.
    pub failures: Vec<TaskFailure>,
}

/// Runs every task of a [`ScanPlan`] concurrently and collects the results.
#[derive(Clone)]
pub struct Discovery {
    runner: Arc<dyn CommandRunner>,
}

impl Discovery {
    /// Create a discovery engine over the given runner.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Run all tasks, wait for every one of them, and merge their output.
    ///
    /// A failing task is logged and recorded in the report; it never aborts
    /// the other tasks.
    pub async fn run(&self, plan: &ScanPlan) -> DiscoveryReport {
        let mut join_set = JoinSet::new();
        let mut labels = HashMap::new();
        for task in plan.tasks().iter().cloned() {
            let runner = Arc::clone(&self.runner);
            let label = task.label();
            let handle = join_set.spawn(async move {
                let result = runner.run(&task.program, &task.args).await;
                (task, result)
            });
            labels.insert(handle.id(), label);
        }

        let mut report = DiscoveryReport::default();
        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((_, (task, Ok(output)))) => {
                    let keys = task.collect(&output);
                    debug!("{}: {} candidates", task.label(), keys.len());
                    report.keys.extend(keys);
                    report.succeeded += 1;
                }
                Ok((_, (task, Err(e)))) => {
                    record_failure(&mut report, task.label(), e.to_string());
                }
                Err(e) => {
                    // Panicked or cancelled; the label is only known by task id.
                    let label = labels
                        .remove(&e.id())
                        .unwrap_or_else(|| "discovery task".to_string());
                    record_failure(&mut report, label, e.to_string());
                }
            }
        }

        info!(
            "Discovered {} candidates ({} tasks ok, {} failed)",
            report.keys.len(),
            report.succeeded,
            report.failures.len()
        );
        report
    }
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new(Arc::new(ProcessRunner))
    }
}

fn record_failure(report: &mut DiscoveryReport, label: String, error: String) {
    warn!("Discovery of {label} failed: {error}");
    report.failures.push(TaskFailure { label, error });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DiscoveryError, Result};
    use crate::task::{ScanKind, ScanTask};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Canned output per program + first root.
    struct FakeRunner {
        outputs: HashMap<String, String>,
    }

    impl FakeRunner {
        fn new(outputs: &[(&str, &str)]) -> Self {
            Self {
                outputs: outputs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, program: &str, args: &[String]) -> Result<String> {
            let key = match args.first() {
                Some(root) => format!("{program} {root}"),
                None => program.to_string(),
            };
            self.outputs
                .get(&key)
                .cloned()
                .ok_or_else(|| DiscoveryError::ExitStatus {
                    program: program.to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: String::new(),
                })
        }
    }

    fn find_task(kind: ScanKind, root: &str) -> ScanTask {
        ScanTask::find(kind, "find", &[], vec![root.to_string()])
    }

    #[tokio::test]
    async fn test_results_are_deduplicated() {
        let runner = FakeRunner::new(&[
            ("dmenu_path", "vim\nxterm\n"),
            ("find /home/u", "/home/u/proj/.git\n"),
            ("find /srv", "/home/u/proj/\nvim\n"),
        ]);
        let plan = ScanPlan::from_tasks(vec![
            ScanTask::command_path("dmenu_path"),
            find_task(ScanKind::Repository(crate::VcsKind::Git), "/home/u"),
            find_task(ScanKind::Directory(None), "/srv"),
        ]);

        let report = Discovery::new(Arc::new(runner)).run(&plan).await;

        let keys: Vec<&str> = report.keys.iter().map(String::as_str).collect();
        assert_eq!(keys, vec!["/home/u/proj/", "vim", "xterm"]);
        assert_eq!(report.succeeded, 3);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failing_task_contributes_nothing() {
        let runner = FakeRunner::new(&[("dmenu_path", "vim\n")]);
        let plan = ScanPlan::from_tasks(vec![
            ScanTask::command_path("dmenu_path"),
            find_task(ScanKind::File(None), "/missing"),
        ]);

        let report = Discovery::new(Arc::new(runner)).run(&plan).await;

        assert_eq!(report.keys.len(), 1);
        assert!(report.keys.contains("vim"));
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].label, "all files under /missing");
    }

    /// Panics on `find`, answers everything else.
    struct PanickingRunner;

    #[async_trait]
    impl CommandRunner for PanickingRunner {
        async fn run(&self, program: &str, _args: &[String]) -> Result<String> {
            if program == "find" {
                panic!("find runner crashed");
            }
            Ok("vim\n".to_string())
        }
    }

    #[tokio::test]
    async fn test_panicked_task_is_reported_with_its_label() {
        let plan = ScanPlan::from_tasks(vec![
            ScanTask::command_path("dmenu_path"),
            find_task(ScanKind::Directory(None), "/srv"),
        ]);

        let report = Discovery::new(Arc::new(PanickingRunner)).run(&plan).await;

        assert_eq!(report.keys.len(), 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].label, "all directories under /srv");
    }

    #[tokio::test]
    async fn test_empty_plan() {
        let report = Discovery::new(Arc::new(FakeRunner::new(&[])))
            .run(&ScanPlan::default())
            .await;
        assert_eq!(report, DiscoveryReport::default());
    }
}
