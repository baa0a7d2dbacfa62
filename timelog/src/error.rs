use thiserror::Error;

/// A raw work item could not be turned into a [`TimeLogRecord`](crate::TimeLogRecord).
///
/// Conversion failures abort the whole retrieval rather than producing a
/// silently partial result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataConversionError {
    #[error("work item {id} is missing required field {field}")]
    MissingField { id: i32, field: &'static str },
    #[error("work item {id} has non-numeric value {value:?} in field {field}")]
    InvalidNumber {
        id: i32,
        field: &'static str,
        value: String,
    },
}

/// Failure reported by a [`WorkItemSource`](crate::WorkItemSource).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("connection to the work item service failed: {0}")]
    Connection(String),
    #[error("query execution failed: {0}")]
    Query(String),
}

/// Errors surfaced by [`WorkItemReconciler::load_data`](crate::WorkItemReconciler::load_data).
///
/// Nothing is retried or swallowed; every failure bubbles to the caller.
#[derive(Debug, Error)]
pub enum TimeLogError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("connection to the work item service failed: {0}")]
    Connection(String),
    #[error("query execution failed: {0}")]
    Query(String),
    #[error(transparent)]
    Conversion(#[from] DataConversionError),
}

impl From<SourceError> for TimeLogError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Connection(message) => Self::Connection(message),
            SourceError::Query(message) => Self::Query(message),
        }
    }
}
