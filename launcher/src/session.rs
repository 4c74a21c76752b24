//! Open and update cycles.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use xdmenu_candidates::{Candidate, CandidateStore, codec, picker_input, rank};
use xdmenu_discovery::{
    CommandRunner, Discovery, DiscoveryReport, ProcessRunner, ScanPlan, TaskFailure,
};

use crate::config::LauncherConfig;
use crate::dispatch::{
    DispatchOutcome, DispatchTable, Launcher, ProcessLauncher, SelectionKind,
};
use crate::error::Result;
use crate::picker::{DmenuPicker, Picker};

/// Stages of an open cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenState {
    Loading,
    Ranking,
    AwaitingSelection,
    Dispatching,
    Updating,
    Done,
}

impl fmt::Display for OpenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::Ranking => "ranking",
            Self::AwaitingSelection => "awaiting-selection",
            Self::Dispatching => "dispatching",
            Self::Updating => "updating",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What an open cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOutcome {
    /// The picked candidate, `None` if the picker was dismissed.
    pub selection: Option<String>,

    /// How the selection was launched.
    pub dispatch: Option<DispatchOutcome>,

    /// Score after the update, `None` if the selection is not in the store.
    pub score: Option<u64>,
}

impl OpenOutcome {
    fn cancelled() -> Self {
        Self {
            selection: None,
            dispatch: None,
            score: None,
        }
    }
}

/// What an update cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Candidates learned in this cycle.
    pub added: usize,

    /// Candidates in the store after the merge.
    pub total: usize,

    /// Discovery tasks that failed and contributed nothing.
    pub failures: Vec<TaskFailure>,
}

/// Drives open and update cycles against one candidate store file.
pub struct SessionController {
    candidate_path: PathBuf,
    picker: Arc<dyn Picker>,
    launcher: Arc<dyn Launcher>,
    discovery: Discovery,
    plan: ScanPlan,
    dispatch: DispatchTable,
}

impl SessionController {
    /// Start building a controller for `config`, resolving paths against `home`.
    pub fn builder(config: LauncherConfig, home: impl Into<PathBuf>) -> SessionBuilder {
        SessionBuilder::new(config, home)
    }

    /// Location of the candidate store.
    pub fn candidate_path(&self) -> &Path {
        &self.candidate_path
    }

    /// Discovery tasks run by [`Self::update`].
    pub fn plan(&self) -> &ScanPlan {
        &self.plan
    }

    /// Load the store and run an open cycle on it.
    pub async fn open(&self) -> Result<OpenOutcome> {
        enter(OpenState::Loading);
        let store = codec::load(&self.candidate_path).await?;
        self.open_with(store).await
    }

    /// Run an open cycle on an already loaded store.
    ///
    /// An empty selection ends the cycle without launching anything and
    /// without touching the store file. Otherwise the selection is launched,
    /// its score is bumped if it is a known candidate, and the store is saved.
    /// A failed launch is reported in the outcome and does not prevent the save.
    pub async fn open_with(&self, mut store: CandidateStore) -> Result<OpenOutcome> {
        enter(OpenState::Ranking);
        let input = picker_input(&store);

        enter(OpenState::AwaitingSelection);
        let Some(selection) = self.picker.pick(input).await? else {
            info!("No selection");
            enter(OpenState::Done);
            return Ok(OpenOutcome::cancelled());
        };

        enter(OpenState::Dispatching);
        let dispatch = self.dispatch(&selection).await;

        enter(OpenState::Updating);
        let score = store.increment(&selection);
        match score {
            Some(score) => debug!("{selection} now has score {score}"),
            None => debug!("{selection} is not a known candidate"),
        }
        codec::save(&self.candidate_path, &store).await?;

        enter(OpenState::Done);
        Ok(OpenOutcome {
            selection: Some(selection),
            dispatch: Some(dispatch),
            score,
        })
    }

    /// Discover candidates, merge them into the store, and save it.
    ///
    /// The store load and all discovery tasks run concurrently; the merge
    /// starts once every one of them has finished.
    pub async fn update(&self) -> Result<UpdateOutcome> {
        let (loaded, report) = tokio::join!(
            codec::load(&self.candidate_path),
            self.discovery.run(&self.plan)
        );
        let mut store = loaded?;
        let DiscoveryReport { keys, failures, .. } = report;

        let added = store.merge(keys);
        codec::save(&self.candidate_path, &store).await?;

        info!(
            "Update complete: {added} new candidates, {} total",
            store.len()
        );
        Ok(UpdateOutcome {
            added,
            total: store.len(),
            failures,
        })
    }

    /// Ranked contents of the store, without running the picker.
    pub async fn list(&self) -> Result<Vec<Candidate>> {
        let store = codec::load(&self.candidate_path).await?;
        Ok(rank(&store))
    }

    async fn dispatch(&self, selection: &str) -> DispatchOutcome {
        let kind = SelectionKind::classify(selection).await;
        debug!("Selection {selection} classified as {kind:?}");

        let request = match self.dispatch.plan(selection, kind) {
            Ok(Some(request)) => request,
            Ok(None) => {
                info!("No command matches {selection}");
                return DispatchOutcome::NoMatchingRule;
            }
            Err(e) => {
                warn!("Dispatch failed: {e}");
                return DispatchOutcome::Failed(e.to_string());
            }
        };

        match self.launcher.launch(&request).await {
            Ok(()) => DispatchOutcome::Launched(request),
            Err(e) => {
                warn!("Dispatch failed: {e}");
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }
}

fn enter(state: OpenState) {
    debug!(state = %state, "open cycle");
}

/// Builder for [`SessionController`].
///
/// External programs default to real processes configured from
/// [`LauncherConfig`]; each can be replaced.
pub struct SessionBuilder {
    config: LauncherConfig,
    home: PathBuf,
    picker: Option<Arc<dyn Picker>>,
    launcher: Option<Arc<dyn Launcher>>,
    runner: Option<Arc<dyn CommandRunner>>,
}

impl SessionBuilder {
    fn new(config: LauncherConfig, home: impl Into<PathBuf>) -> Self {
        Self {
            config,
            home: home.into(),
            picker: None,
            launcher: None,
            runner: None,
        }
    }

    /// Use a custom picker.
    pub fn with_picker(mut self, picker: Arc<dyn Picker>) -> Self {
        self.picker = Some(picker);
        self
    }

    /// Use a custom launcher for selections.
    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    /// Use a custom runner for discovery programs.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Build the controller. Fails if a dispatch rule does not compile.
    pub fn build(self) -> Result<SessionController> {
        let dispatch = DispatchTable::from_config(&self.config)?;
        let plan = ScanPlan::build(&self.config.discovery(), &self.home);

        let picker = self.picker.unwrap_or_else(|| {
            Arc::new(DmenuPicker::new(
                self.config.picker_program(),
                self.config.dmenu_arguments.clone(),
            ))
        });
        let launcher = self
            .launcher
            .unwrap_or_else(|| Arc::new(ProcessLauncher));
        let runner = self.runner.unwrap_or_else(|| Arc::new(ProcessRunner));

        Ok(SessionController {
            candidate_path: self.config.candidate_file_path(&self.home),
            picker,
            launcher,
            discovery: Discovery::new(runner),
            plan,
            dispatch,
        })
    }
}
