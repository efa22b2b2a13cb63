use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimetableError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    #[error("Invalid date (expected yyyy-mm-dd): {0}")]
    InvalidDate(String),

    #[error("Invalid time (expected hh:mm): {0}")]
    InvalidTime(String),

    #[error("Invalid time range: {start} is not before {end}")]
    InvalidTimeRange { start: String, end: String },
}
