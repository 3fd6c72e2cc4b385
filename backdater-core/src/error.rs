use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid date in state file: {0}")]
    InvalidDate(String),

    #[error("Repository has no working directory: {0}")]
    BareRepository(String),

    #[error("Path is outside the repository: {0}")]
    OutsideRepository(String),

    #[error("No starting date was provided")]
    NoStartDate,

    #[error("Cannot advance past {0}")]
    DateOverflow(NaiveDate),
}
