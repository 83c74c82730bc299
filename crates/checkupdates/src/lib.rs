//! checkupdates: Typed access to `artix-checkupdates`
//!
//! Runs the external update scanner, parses its table into [`UpdateRecord`]s,
//! optionally rewrites package basenames into a compliant form and clears the
//! scanner's stale lock directory when a run times out or finds the database
//! locked.

pub mod client;
pub mod compliance;
pub mod config;
pub mod error;
pub mod lockfile;
pub mod parse;
pub mod types;

pub use client::Checkupdates;
pub use compliance::{ComplianceRule, apply_compliance, is_compliant};
pub use config::CheckupdatesConfig;
pub use error::CheckupdatesError;
pub use lockfile::{CleanupOutcome, clean_up_lockfiles, default_lock_dir};
pub use parse::parse_output;
pub use types::{ArchRepo, ArtixRepo, FetchMode, UpdateRecord};
