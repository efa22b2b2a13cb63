use thiserror::Error;
use timetable_common::TimetableError;

pub type Result<T> = std::result::Result<T, UntisError>;

#[derive(Debug, Error)]
pub enum UntisError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status: expected {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Timetable(#[from] TimetableError),
}

impl From<reqwest::Error> for UntisError {
    fn from(err: reqwest::Error) -> Self {
        UntisError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for UntisError {
    fn from(err: serde_json::Error) -> Self {
        UntisError::Parse(err.to_string())
    }
}
