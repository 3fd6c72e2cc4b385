use crate::error::Result;
use crate::models::{midnight_utc, CommitReport, CommitSummary, Identity, SequenceState};
use crate::repo::{GitRepo, RepoOrigin};
use crate::storage::{StateFile, STATE_FILE_NAME};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct BackdaterOptions {
    pub repo_dir: PathBuf,
    pub state_path: PathBuf,
    pub identity: Identity,
}

impl BackdaterOptions {
    pub fn new<P: Into<PathBuf>>(repo_dir: P) -> Self {
        let repo_dir = repo_dir.into();
        Self {
            state_path: repo_dir.join(STATE_FILE_NAME),
            repo_dir,
            identity: Identity::default(),
        }
    }

    pub fn with_state_path<P: Into<PathBuf>>(mut self, state_path: P) -> Self {
        self.state_path = state_path.into();
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }
}

pub struct Backdater {
    repo: GitRepo,
    origin: RepoOrigin,
    state_file: StateFile,
    state: SequenceState,
    identity: Identity,
}

impl Backdater {
    /// Does not touch the repository identity; see [`Backdater::ensure_identity`].
    pub fn initialize(options: BackdaterOptions) -> Result<Self> {
        let state_file = StateFile::new(options.state_path);
        let state = state_file.load()?;
        let (repo, origin) = GitRepo::open_or_init(&options.repo_dir)?;

        Ok(Self {
            repo,
            origin,
            state_file,
            state,
            identity: options.identity,
        })
    }

    pub fn origin(&self) -> RepoOrigin {
        self.origin
    }

    pub fn workdir(&self) -> Result<&Path> {
        self.repo.workdir()
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn state_path(&self) -> &Path {
        self.state_file.path()
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn ensure_identity(&self) -> Result<()> {
        self.repo.ensure_identity(&self.identity)
    }

    /// The in-memory state moves forward immediately; only
    /// [`Backdater::commit_file`] persists it.
    pub fn next_commit_date<F>(&mut self, start: F) -> Result<DateTime<Utc>>
    where
        F: FnOnce() -> Result<NaiveDate>,
    {
        self.state.advance(start).map(midnight_utc)
    }

    pub fn commit_file<F>(&mut self, path: &Path, message: Option<&str>, start: F) -> Result<CommitReport>
    where
        F: FnOnce() -> Result<NaiveDate>,
    {
        self.repo.stage(path)?;

        let when = self.next_commit_date(start)?;
        let message = message
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Updated {}", path.display()));

        let id = self.repo.commit_at(&message, &self.identity, when)?;
        self.state_file.save(&self.state)?;

        info!("Committed {:?} as {} on {}", path, id, when.date_naive());

        Ok(CommitReport {
            id,
            path: path.to_path_buf(),
            message,
            date: when.date_naive(),
        })
    }

    pub fn history(&self, limit: Option<usize>) -> Result<Vec<CommitSummary>> {
        self.repo.history(limit)
    }
}
