use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_NAME: &str = "Your Name";
pub const DEFAULT_EMAIL: &str = "your.email@example.com";

/// Surrounding whitespace is ignored.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// The last date handed out to a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceState {
    last_commit_date: Option<NaiveDate>,
}

impl SequenceState {
    pub fn new(last_commit_date: Option<NaiveDate>) -> Self {
        Self { last_commit_date }
    }

    pub fn last_commit_date(&self) -> Option<NaiveDate> {
        self.last_commit_date
    }

    pub fn is_started(&self) -> bool {
        self.last_commit_date.is_some()
    }

    pub fn peek_next(&self) -> Option<NaiveDate> {
        self.last_commit_date.and_then(|d| d.succ_opt())
    }

    /// `start` is only called when the sequence has not started yet.
    pub fn advance<F>(&mut self, start: F) -> Result<NaiveDate>
    where
        F: FnOnce() -> Result<NaiveDate>,
    {
        let next = match self.last_commit_date {
            Some(last) => last.succ_opt().ok_or(Error::DateOverflow(last))?,
            None => start()?,
        };
        self.last_commit_date = Some(next);
        Ok(next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_EMAIL)
    }
}

#[derive(Debug, Clone)]
pub struct CommitReport {
    pub id: String,
    pub path: PathBuf,
    pub message: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct CommitSummary {
    pub id: String,
    pub summary: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}
