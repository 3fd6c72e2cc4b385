//! # backdater-core
//!
//! Core library for backdater - commits files to a git repository with
//! sequential, backdated timestamps.
//!
//! The last date used is kept in a small JSON state file so a later run
//! continues the sequence one day after where the previous run stopped.

pub mod backdater;
pub mod error;
pub mod models;
pub mod repo;
pub mod storage;

pub use backdater::{Backdater, BackdaterOptions};
pub use error::{Error, Result};
pub use models::{
    format_date, midnight_utc, parse_date, CommitReport, CommitSummary, Identity, SequenceState,
    DATE_FORMAT, DEFAULT_EMAIL, DEFAULT_NAME,
};
pub use repo::{GitRepo, RepoOrigin};
pub use storage::{StateFile, STATE_FILE_NAME};
