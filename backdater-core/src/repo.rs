use crate::error::{Error, Result};
use crate::models::{CommitSummary, Identity};
use chrono::{DateTime, TimeZone, Utc};
use git2::{ConfigLevel, ErrorCode, Repository, Signature, Sort, Time};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoOrigin {
    Opened,
    Initialized,
}

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Parent directories are not searched.
    pub fn open_or_init<P: AsRef<Path>>(path: P) -> Result<(Self, RepoOrigin)> {
        let path = path.as_ref();
        match Repository::open(path) {
            Ok(repo) => {
                info!("Opened repository at {:?}", path);
                Ok((Self { repo }, RepoOrigin::Opened))
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                let repo = Repository::init(path)?;
                info!("Initialized repository at {:?}", path);
                Ok((Self { repo }, RepoOrigin::Initialized))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| Error::BareRepository(self.repo.path().display().to_string()))
    }

    pub fn ensure_identity(&self, identity: &Identity) -> Result<()> {
        let mut config = self.repo.config()?.open_level(ConfigLevel::Local)?;
        config.set_str("user.name", &identity.name)?;
        config.set_str("user.email", &identity.email)?;
        debug!("Set repository identity to {} <{}>", identity.name, identity.email);
        Ok(())
    }

    pub fn stage(&self, path: &Path) -> Result<PathBuf> {
        let relative = self.relative_path(path)?;
        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;
        debug!("Staged {:?}", relative);
        Ok(relative)
    }

    pub fn commit_at(&self, message: &str, identity: &Identity, when: DateTime<Utc>) -> Result<String> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let signature = Signature::new(&identity.name, &identity.email, &Time::new(when.timestamp(), 0))?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        info!("Created commit {} dated {}", oid, when);
        Ok(oid.to_string())
    }

    /// Commits reachable from HEAD, newest first.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<CommitSummary>> {
        if self.repo.is_empty()? {
            return Ok(Vec::new());
        }
        let head = match self.repo.head() {
            Ok(head) => head.peel_to_commit()?.id(),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut walk = self.repo.revwalk()?;
        // Sorting resets the walker, so it has to come before push.
        walk.set_sorting(Sort::TOPOLOGICAL)?;
        walk.push(head)?;

        let mut commits = Vec::new();
        for oid in walk.take(limit.unwrap_or(usize::MAX)) {
            let commit = self.repo.find_commit(oid?)?;
            let author = commit.author();
            commits.push(CommitSummary {
                id: commit
                    .as_object()
                    .short_id()?
                    .as_str()
                    .unwrap_or_default()
                    .to_string(),
                summary: commit.summary().unwrap_or_default().to_string(),
                author: author.name().unwrap_or_default().to_string(),
                timestamp: Utc
                    .timestamp_opt(commit.time().seconds(), 0)
                    .single()
                    .unwrap_or(DateTime::<Utc>::MIN_UTC),
            });
        }
        Ok(commits)
    }

    fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        let path = if path.is_absolute() {
            let workdir = self.workdir()?;
            match path.strip_prefix(workdir) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => {
                    let canonical = path.canonicalize()?;
                    let workdir = workdir.canonicalize()?;
                    canonical
                        .strip_prefix(&workdir)
                        .map_err(|_| Error::OutsideRepository(path.display().to_string()))?
                        .to_path_buf()
                }
            }
        } else {
            path.to_path_buf()
        };

        Ok(path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn when(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        crate::models::midnight_utc(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_open_or_init() {
        let dir = TempDir::new().unwrap();

        let (_, origin) = GitRepo::open_or_init(dir.path()).unwrap();
        assert_eq!(origin, RepoOrigin::Initialized);
        assert!(dir.path().join(".git").exists());

        let (_, origin) = GitRepo::open_or_init(dir.path()).unwrap();
        assert_eq!(origin, RepoOrigin::Opened);
    }

    #[test]
    fn test_ensure_identity_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let (repo, _) = GitRepo::open_or_init(dir.path()).unwrap();

        repo.ensure_identity(&Identity::new("Someone Else", "else@example.com"))
            .unwrap();
        repo.ensure_identity(&Identity::default()).unwrap();

        let config = Repository::open(dir.path())
            .unwrap()
            .config()
            .unwrap()
            .open_level(ConfigLevel::Local)
            .unwrap();
        assert_eq!(config.get_string("user.name").unwrap(), "Your Name");
        assert_eq!(config.get_string("user.email").unwrap(), "your.email@example.com");
    }

    #[test]
    fn test_stage_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let (repo, _) = GitRepo::open_or_init(dir.path()).unwrap();
        assert!(matches!(repo.stage(Path::new("missing.txt")), Err(Error::Git(_))));
    }

    #[test]
    fn test_stage_normalizes_paths() {
        let dir = TempDir::new().unwrap();
        let (repo, _) = GitRepo::open_or_init(dir.path()).unwrap();
        fs::create_dir(dir.path().join("notes")).unwrap();
        fs::write(dir.path().join("notes").join("a.txt"), "a").unwrap();

        let staged = repo.stage(Path::new("./notes/a.txt")).unwrap();
        assert_eq!(staged, PathBuf::from("notes").join("a.txt"));

        let absolute = dir.path().join("notes").join("a.txt");
        assert_eq!(repo.stage(&absolute).unwrap(), staged);
    }

    #[test]
    fn test_stage_outside_repository_fails() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let (repo, _) = GitRepo::open_or_init(dir.path()).unwrap();
        let outside = other.path().join("x.txt");
        fs::write(&outside, "x").unwrap();

        assert!(matches!(repo.stage(&outside), Err(Error::OutsideRepository(_))));
    }

    #[test]
    fn test_commit_at_sets_both_timestamps() {
        let dir = TempDir::new().unwrap();
        let (repo, _) = GitRepo::open_or_init(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        repo.stage(Path::new("a.txt")).unwrap();

        let identity = Identity::default();
        let id = repo.commit_at("first", &identity, when(2020, 5, 17)).unwrap();

        let raw = Repository::open(dir.path()).unwrap();
        let commit = raw.find_commit(git2::Oid::from_str(&id).unwrap()).unwrap();
        assert_eq!(commit.author().when().seconds(), when(2020, 5, 17).timestamp());
        assert_eq!(commit.committer().when().seconds(), when(2020, 5, 17).timestamp());
        assert_eq!(commit.author().when().offset_minutes(), 0);
        assert_eq!(commit.author().name(), Some("Your Name"));
        assert_eq!(commit.committer().email(), Some("your.email@example.com"));
        assert_eq!(commit.parent_count(), 0);
    }

    #[test]
    fn test_history_of_fresh_repository_is_empty() {
        let dir = TempDir::new().unwrap();
        let (repo, _) = GitRepo::open_or_init(dir.path()).unwrap();

        assert!(repo.history(None).unwrap().is_empty());
        assert!(repo.history(Some(5)).unwrap().is_empty());
    }

    #[test]
    fn test_history_uses_short_ids() {
        let dir = TempDir::new().unwrap();
        let (repo, _) = GitRepo::open_or_init(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        repo.stage(Path::new("a.txt")).unwrap();
        let full = repo.commit_at("first", &Identity::default(), when(2020, 5, 17)).unwrap();

        let history = repo.history(None).unwrap();
        assert!(history[0].id.len() >= 7 && history[0].id.len() < full.len());
        assert!(full.starts_with(&history[0].id));
    }

    #[test]
    fn test_history_follows_parents() {
        let dir = TempDir::new().unwrap();
        let (repo, _) = GitRepo::open_or_init(dir.path()).unwrap();
        assert!(repo.history(None).unwrap().is_empty());

        let identity = Identity::default();
        for (i, day) in [1, 2, 3].into_iter().enumerate() {
            fs::write(dir.path().join("log.txt"), format!("entry {i}")).unwrap();
            repo.stage(Path::new("log.txt")).unwrap();
            repo.commit_at(&format!("commit {i}"), &identity, when(2021, 1, day))
                .unwrap();
        }

        let history = repo.history(None).unwrap();
        let summaries: Vec<_> = history.iter().map(|c| c.summary.as_str()).collect();
        assert_eq!(summaries, vec!["commit 2", "commit 1", "commit 0"]);
        assert_eq!(history[0].timestamp, when(2021, 1, 3));

        assert_eq!(repo.history(Some(1)).unwrap().len(), 1);
    }
}
