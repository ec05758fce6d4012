//! Module: value
//! Responsibility: scalar field values and their declared field types.
//! Does not own: schema layout or tuple arity validation.
//! Boundary: the only value surface seen by operators and accumulators.


use serde::{Deserialize, Serialize};
use std::fmt;

///
/// FieldType
///
/// Declared type of one schema field.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum FieldType {
    Int,
    Text,
}

impl FieldType {
    /// Return true when values of this type support arithmetic aggregates.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Int => "INT",
            Self::Text => "TEXT",
        };
        write!(f, "{label}")
    }
}

///
/// Value
///
/// One scalar field value. Ordering is total within a variant; mixed-variant
/// ordering is rank-only (`Int` before `Text`) and stays deterministic.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    /// Return the declared type this value conforms to.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::Int(_) => FieldType::Int,
            Self::Text(_) => FieldType::Text,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            Self::Int(_) => None,
        }
    }

    /// Approximate heap footprint, used by grouped memory accounting.
    #[must_use]
    pub fn heap_bytes(&self) -> usize {
        match self {
            Self::Int(_) => 0,
            Self::Text(v) => v.capacity(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}
