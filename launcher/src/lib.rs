//! # Launcher
//!
//! Orchestrates the two cycles of the frequency-ranked launcher:
//!
//! - **Open**: rank candidates, let the user pick one in `dmenu`, launch it,
//!   bump its score, save the store
//! - **Update**: scan configured locations, merge new candidates, save
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       SessionController                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  open:   load ──► rank ──► Picker ──► DispatchTable ──► Launcher│
//! │                                  └──────► increment ──► save    │
//! │                                                                 │
//! │  update: load ─┐                                                │
//! │                ├──► merge ──► save                              │
//! │  Discovery ────┘                                                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod picker;
pub mod session;

pub use config::{CommandRule, LauncherConfig, home_dir};
pub use dispatch::{
    DispatchOutcome, DispatchRule, DispatchTable, LaunchRequest, LaunchStdio, Launcher,
    ProcessLauncher, SelectionKind,
};
pub use error::{ConfigError, DispatchError, LauncherError, Result};
pub use picker::{DmenuPicker, Picker};
pub use session::{OpenOutcome, OpenState, SessionBuilder, SessionController, UpdateOutcome};
