use crate::value::FieldType;
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// AggregateOp
///
/// Aggregate function applied to one column.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AggregateOp {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateOp {
    pub const ALL: [Self; 5] = [Self::Count, Self::Sum, Self::Avg, Self::Min, Self::Max];

    /// Display name used to decorate output column names (`avg(salary)`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Return true when this function can aggregate fields of `field_type`.
    ///
    /// Text columns only support COUNT: every output column is INT.
    #[must_use]
    pub const fn supports(self, field_type: FieldType) -> bool {
        match field_type {
            FieldType::Int => true,
            FieldType::Text => matches!(self, Self::Count),
        }
    }

    /// Output column name for an aggregate over `field_name`.
    #[must_use]
    pub fn column_name(self, field_name: &str) -> String {
        format!("{}({field_name})", self.name())
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// AggregateOpParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown aggregate function: '{0}'")]
pub struct AggregateOpParseError(pub String);

impl FromStr for AggregateOp {
    type Err = AggregateOpParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AggregateOpParseError(s.to_string()))
    }
}

///
/// TESTS
///
