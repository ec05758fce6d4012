use crate::{
    config::ConfigError,
    executor::{aggregate::AggregateOpParseError, group::GroupError},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; the facade crate maps it onto its public taxonomy.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a lifecycle violation (method called in the wrong state).
    pub fn state(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::State, origin, message)
    }

    /// Construct a type mismatch between a declared and an observed type.
    pub fn type_mismatch(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::TypeMismatch, origin, message)
    }

    /// Construct an exhausted-iterator error.
    pub fn no_such_element(origin: ErrorOrigin) -> Self {
        Self::new(
            ErrorClass::NoSuchElement,
            origin,
            "no more tuples in iterator",
        )
    }

    /// Construct an out-of-range field lookup error.
    pub fn no_such_field(origin: ErrorOrigin, index: usize, arity: usize) -> Self {
        Self {
            class: ErrorClass::NoSuchField,
            origin,
            message: format!("field index {index} out of range for arity {arity}"),
            detail: Some(ErrorDetail::Field(FieldError::OutOfRange { index, arity })),
        }
    }

    /// Construct a data-access failure raised by a tuple source.
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::DataAccess, ErrorOrigin::Source, message)
    }

    /// Construct a transaction abort raised by a tuple source.
    pub fn transaction_aborted(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::TransactionAborted, ErrorOrigin::Source, message)
    }

    /// Construct an arithmetic overflow during accumulation.
    pub(crate) fn aggregator_overflow(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Overflow, ErrorOrigin::Aggregator, message)
    }

    /// Construct an operator-origin invariant violation.
    pub(crate) fn operator_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Operator,
            message,
        )
    }

    #[must_use]
    pub const fn is_state(&self) -> bool {
        matches!(self.class, ErrorClass::State)
    }

    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self.class, ErrorClass::TypeMismatch)
    }

    #[must_use]
    pub const fn is_no_such_element(&self) -> bool {
        matches!(self.class, ErrorClass::NoSuchElement)
    }

    #[must_use]
    pub const fn is_no_such_field(&self) -> bool {
        matches!(self.class, ErrorClass::NoSuchField)
    }

    /// Return true when the error came from the tuple source rather than
    /// from the operator itself.
    #[must_use]
    pub const fn is_source_failure(&self) -> bool {
        matches!(
            self.class,
            ErrorClass::DataAccess | ErrorClass::TransactionAborted
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Field(FieldError),
    #[error("{0}")]
    Group(GroupError),
    #[error("{0}")]
    Config(ConfigError),
}

///
/// FieldError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum FieldError {
    #[error("field index {index} out of range for arity {arity}")]
    OutOfRange { index: usize, arity: usize },
}

impl From<GroupError> for InternalError {
    fn from(err: GroupError) -> Self {
        let class = match err {
            GroupError::MemoryLimitExceeded { .. } => ErrorClass::ResourceLimit,
        };

        Self {
            class,
            origin: ErrorOrigin::Aggregator,
            message: err.to_string(),
            detail: Some(ErrorDetail::Group(err)),
        }
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::Config,
            origin: ErrorOrigin::Config,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

impl From<AggregateOpParseError> for InternalError {
    fn from(err: AggregateOpParseError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Aggregator, err.to_string())
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    State,
    TypeMismatch,
    NoSuchElement,
    NoSuchField,
    DataAccess,
    TransactionAborted,
    Overflow,
    ResourceLimit,
    Unsupported,
    Config,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::State => "state",
            Self::TypeMismatch => "type_mismatch",
            Self::NoSuchElement => "no_such_element",
            Self::NoSuchField => "no_such_field",
            Self::DataAccess => "data_access",
            Self::TransactionAborted => "transaction_aborted",
            Self::Overflow => "overflow",
            Self::ResourceLimit => "resource_limit",
            Self::Unsupported => "unsupported",
            Self::Config => "config",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Schema,
    Tuple,
    Iterator,
    Aggregator,
    Operator,
    Source,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Schema => "schema",
            Self::Tuple => "tuple",
            Self::Iterator => "iterator",
            Self::Aggregator => "aggregator",
            Self::Operator => "operator",
            Self::Source => "source",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
