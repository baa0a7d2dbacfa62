mod convert;
mod error;
pub mod fields;
mod reconciler;
mod record;
pub mod source;

pub use convert::to_time_log_record;
pub use error::{DataConversionError, SourceError, TimeLogError};
pub use reconciler::WorkItemReconciler;
pub use record::TimeLogRecord;
pub use source::{AdoWorkItemSource, QueryScope, WorkItemSource};
