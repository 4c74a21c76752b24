//! # Candidate Store
//!
//! This crate owns the launcher's memory: every path, directory, and command
//! name it has ever learned, together with how often each one was picked.
//!
//! - **Store**: key → usage score, grown by discovery and bumped on selection
//! - **Codec**: gzip-compressed JSON on disk, replaced wholesale on save
//! - **Ranking**: most used first, shorter keys first on ties
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Candidate Store                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  candidates.json.gz ──► codec::load ──► CandidateStore         │
//! │                                             │                   │
//! │                          merge / increment ◄┤                   │
//! │                                             ▼                   │
//! │  candidates.json.gz ◄── codec::save     rank ──► picker input  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod error;
pub mod rank;
pub mod store;

pub use codec::{decode, encode, load, save};
pub use error::{CandidateError, Result};
pub use rank::{Candidate, picker_input, rank};
pub use store::CandidateStore;
