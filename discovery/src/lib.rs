//! # Candidate Discovery
//!
//! This crate finds launchable things on the machine and reports them as
//! candidate keys for the store.
//!
//! ## Sources
//!
//! - **Command path**: executables on `$PATH`, via `dmenu_path`
//! - **Repositories**: directories containing a `.git` directory
//! - **Directories / files**: `find` by name, or everything under a target
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Candidate Discovery                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  TargetConfig ──► ScanPlan ──► ScanTask × N                    │
//! │                                    │  (JoinSet fan-out)         │
//! │                                    ▼                            │
//! │                  CommandRunner ──► DiscoveryReport              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod runner;
pub mod task;

pub use config::{DiscoveryConfig, TargetConfig, VcsKind, resolve_path};
pub use discovery::{Discovery, DiscoveryReport, TaskFailure};
pub use error::{DiscoveryError, Result};
pub use runner::{CommandRunner, ProcessRunner};
pub use task::{ScanKind, ScanPlan, ScanTask};
