use derive_more::Display;
use serde::{Deserialize, Serialize};
use tallydb_core::error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Return true when the failure came from the data source and the
    /// caller may retry the whole plan.
    #[must_use]
    pub const fn is_source_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::Source(_))
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::State => ErrorKind::Execution(ExecutionErrorKind::InvalidState),
            ErrorClass::NoSuchElement => ErrorKind::Execution(ExecutionErrorKind::Exhausted),
            ErrorClass::Overflow => ErrorKind::Execution(ExecutionErrorKind::Overflow),
            ErrorClass::ResourceLimit => ErrorKind::Execution(ExecutionErrorKind::ResourceLimit),
            ErrorClass::Unsupported => ErrorKind::Execution(ExecutionErrorKind::Unsupported),
            ErrorClass::Config => ErrorKind::Execution(ExecutionErrorKind::InvalidConfig),
            ErrorClass::TypeMismatch => ErrorKind::Schema(SchemaErrorKind::TypeMismatch),
            ErrorClass::NoSuchField => ErrorKind::Schema(SchemaErrorKind::NoSuchField),
            ErrorClass::DataAccess => ErrorKind::Source(SourceErrorKind::DataAccess),
            ErrorClass::TransactionAborted => {
                ErrorKind::Source(SourceErrorKind::TransactionAborted)
            }
            ErrorClass::InvariantViolation => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Execution(ExecutionErrorKind),
    Schema(SchemaErrorKind),
    Source(SourceErrorKind),

    /// The caller cannot remediate this.
    Internal,
}

///
/// ExecutionErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ExecutionErrorKind {
    /// Operator method called in the wrong lifecycle state.
    InvalidState,

    /// `next` called on an exhausted iterator.
    Exhausted,

    /// Running aggregate left the 64-bit range.
    Overflow,

    /// Grouped execution exceeded its configured limits.
    ResourceLimit,

    Unsupported,
    InvalidConfig,
}

///
/// SchemaErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SchemaErrorKind {
    TypeMismatch,
    NoSuchField,
}

///
/// SourceErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SourceErrorKind {
    DataAccess,

    /// The source aborted the enclosing transaction; the plan may be retried.
    TransactionAborted,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Aggregator,
    Config,
    Iterator,
    Operator,
    Schema,
    Source,
    Tuple,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Aggregator => Self::Aggregator,
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Iterator => Self::Iterator,
            CoreErrorOrigin::Operator => Self::Operator,
            CoreErrorOrigin::Schema => Self::Schema,
            CoreErrorOrigin::Source => Self::Source,
            CoreErrorOrigin::Tuple => Self::Tuple,
        }
    }
}

///
/// TESTS
///
