use crate::error::{Error, Result};
use crate::models::{format_date, parse_date, SequenceState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const STATE_FILE_NAME: &str = "commit_config.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_commit_date: Option<String>,
}

/// Writes `{"key": "value"}` with a space after the colon.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// The JSON file holding the last commit date.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the sequence state.
    ///
    /// A missing file, missing key, `null` or empty string all give an empty
    /// state. Malformed JSON and unparseable dates are errors.
    pub fn load(&self) -> Result<SequenceState> {
        if !self.path.exists() {
            debug!("No state file at {:?}", self.path);
            return Ok(SequenceState::default());
        }

        let raw = fs::read_to_string(&self.path)?;
        let record: StateRecord = serde_json::from_str(&raw)?;

        let last_commit_date = match record.last_commit_date.as_deref() {
            None | Some("") => None,
            Some(s) => Some(parse_date(s).ok_or_else(|| Error::InvalidDate(s.to_string()))?),
        };

        debug!("Loaded state from {:?}: {:?}", self.path, last_commit_date);
        Ok(SequenceState::new(last_commit_date))
    }

    pub fn save(&self, state: &SequenceState) -> Result<()> {
        let record = StateRecord {
            last_commit_date: state.last_commit_date().map(format_date),
        };
        let mut buf = Vec::new();
        record.serialize(&mut serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter))?;
        fs::write(&self.path, buf)?;
        debug!("Saved state to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn state_file(dir: &TempDir) -> StateFile {
        StateFile::new(dir.path().join(STATE_FILE_NAME))
    }

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let state = state_file(&dir).load().unwrap();
        assert!(!state.is_started());
    }

    #[test]
    fn test_load_stored_date() {
        let dir = TempDir::new().unwrap();
        let file = state_file(&dir);
        fs::write(file.path(), r#"{"last_commit_date": "2024-01-05"}"#).unwrap();

        let state = file.load().unwrap();
        assert_eq!(state.last_commit_date(), NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn test_empty_and_null_values_are_empty_state() {
        let dir = TempDir::new().unwrap();
        let file = state_file(&dir);

        for raw in [r#"{}"#, r#"{"last_commit_date": null}"#, r#"{"last_commit_date": ""}"#] {
            fs::write(file.path(), raw).unwrap();
            assert!(!file.load().unwrap().is_started(), "{raw}");
        }
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let dir = TempDir::new().unwrap();
        let file = state_file(&dir);
        fs::write(
            file.path(),
            r#"{"last_commit_date": "2024-01-05", "note": "hand edited"}"#,
        )
        .unwrap();
        assert!(file.load().unwrap().is_started());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = state_file(&dir);
        fs::write(file.path(), "{not json").unwrap();
        assert!(matches!(file.load(), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_unparseable_date_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = state_file(&dir);
        fs::write(file.path(), r#"{"last_commit_date": "05/01/2024"}"#).unwrap();
        assert!(matches!(file.load(), Err(Error::InvalidDate(s)) if s == "05/01/2024"));
    }

    #[test]
    fn test_save_writes_plain_date() {
        let dir = TempDir::new().unwrap();
        let file = state_file(&dir);
        let state = SequenceState::new(NaiveDate::from_ymd_opt(2024, 1, 6));

        file.save(&state).unwrap();

        let raw = fs::read_to_string(file.path()).unwrap();
        assert_eq!(raw, r#"{"last_commit_date": "2024-01-06"}"#);
        assert_eq!(file.load().unwrap(), state);
    }
}
