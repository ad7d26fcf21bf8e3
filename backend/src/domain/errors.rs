use chrono::NaiveDate;

/// Errors raised by the aggregation and rendering engine.
///
/// Validation errors are never swallowed: the caller decides whether to skip
/// the offending record or abort the whole operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid record field '{field}': {reason}")]
    InvalidRecord { field: String, reason: String },
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid date window {start}..{end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}

impl EngineError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidRecord {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        EngineError::MalformedRecord(reason.into())
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        EngineError::Configuration(reason.into())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
