//! Module: executor::aggregate::state
//! Responsibility: per-group running state and its finalization.
//! Does not own: group lookup, budget accounting, or output tuple shape.
//! Boundary: one accumulator per distinct group key.

use crate::{
    error::{ErrorOrigin, InternalError},
    executor::aggregate::AggregateOp,
    value::{FieldType, Value},
};

///
/// Accumulator
///
/// Per-group running tally for one aggregate function. Implementations are
/// bound to one declared field type and reject values of any other type.
///

pub trait Accumulator: Sized {
    /// Declared aggregate field type this accumulator consumes.
    const FIELD_TYPE: FieldType;

    /// Build the state for a group from its first value.
    fn start(op: AggregateOp, value: &Value) -> Result<Self, InternalError>;

    /// Fold one further value into the state.
    fn update(&mut self, op: AggregateOp, value: &Value) -> Result<(), InternalError>;

    /// Finalize the aggregate result; the group is never empty here.
    fn finalize(&self, op: AggregateOp) -> i64;
}

fn mismatch(expected: FieldType, value: &Value) -> InternalError {
    InternalError::type_mismatch(
        ErrorOrigin::Aggregator,
        format!(
            "aggregate field expects {expected}, found {}",
            value.field_type()
        ),
    )
}

///
/// NumericAccumulator
///
/// Running count, sum, min, and max over INT values. Only the tallies the
/// function reads are updated, so COUNT/MIN/MAX never overflow on sum.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NumericAccumulator {
    count: i64,
    sum: i64,
    min: i64,
    max: i64,
}

impl NumericAccumulator {
    fn int(value: &Value) -> Result<i64, InternalError> {
        value.as_int().ok_or_else(|| mismatch(FieldType::Int, value))
    }

    #[must_use]
    pub const fn count(&self) -> i64 {
        self.count
    }

    #[must_use]
    pub const fn sum(&self) -> i64 {
        self.sum
    }
}

impl Accumulator for NumericAccumulator {
    const FIELD_TYPE: FieldType = FieldType::Int;

    fn start(_: AggregateOp, value: &Value) -> Result<Self, InternalError> {
        let value = Self::int(value)?;

        Ok(Self {
            count: 1,
            sum: value,
            min: value,
            max: value,
        })
    }

    fn update(&mut self, op: AggregateOp, value: &Value) -> Result<(), InternalError> {
        let value = Self::int(value)?;
        self.count = self.count.saturating_add(1);

        match op {
            AggregateOp::Count => {}
            AggregateOp::Sum | AggregateOp::Avg => {
                self.sum = self.sum.checked_add(value).ok_or_else(|| {
                    InternalError::aggregator_overflow(format!(
                        "{op} overflowed i64 after {} values",
                        self.count
                    ))
                })?;
            }
            AggregateOp::Min => self.min = self.min.min(value),
            AggregateOp::Max => self.max = self.max.max(value),
        }

        Ok(())
    }

    fn finalize(&self, op: AggregateOp) -> i64 {
        match op {
            AggregateOp::Count => self.count,
            AggregateOp::Sum => self.sum,
            // Integer division, truncating toward zero.
            AggregateOp::Avg => self.sum / self.count,
            AggregateOp::Min => self.min,
            AggregateOp::Max => self.max,
        }
    }
}

///
/// TextAccumulator
///
/// Row count over TEXT values; the content itself is irrelevant.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TextAccumulator {
    count: i64,
}

impl TextAccumulator {
    fn ensure_text(value: &Value) -> Result<(), InternalError> {
        match value {
            Value::Text(_) => Ok(()),
            Value::Int(_) => Err(mismatch(FieldType::Text, value)),
        }
    }
}

impl Accumulator for TextAccumulator {
    const FIELD_TYPE: FieldType = FieldType::Text;

    fn start(op: AggregateOp, value: &Value) -> Result<Self, InternalError> {
        Self::ensure_text(value)?;
        if !op.supports(FieldType::Text) {
            return Err(InternalError::type_mismatch(
                ErrorOrigin::Aggregator,
                format!("{op} is not supported on TEXT fields"),
            ));
        }

        Ok(Self { count: 1 })
    }

    fn update(&mut self, _: AggregateOp, value: &Value) -> Result<(), InternalError> {
        Self::ensure_text(value)?;
        self.count = self.count.saturating_add(1);

        Ok(())
    }

    fn finalize(&self, _: AggregateOp) -> i64 {
        self.count
    }
}

///
/// TESTS
///
