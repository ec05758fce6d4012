//! Module: executor::aggregate::spec
//! Responsibility: resolved aggregation parameters and output-shape derivation.
//! Does not own: accumulator state or operator lifecycle.
//! Boundary: built once from a child schema; consumed by aggregators.

use crate::{
    error::{ErrorOrigin, InternalError},
    executor::aggregate::AggregateOp,
    model::{Schema, SchemaField},
    value::FieldType,
};

///
/// GroupBy
///
/// Resolved grouping column. Absence of a `GroupBy` means no grouping.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupBy {
    pub field: usize,
    pub field_type: FieldType,
    pub name: String,
}

///
/// AggregateTarget
///
/// Resolved aggregated column.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregateTarget {
    pub field: usize,
    pub field_type: FieldType,
    pub name: String,
}

///
/// AggregatorSpec
///
/// Canonical aggregation parameters: optional group column, aggregated
/// column, and function. Field types are fixed here and select the
/// aggregator variant.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregatorSpec {
    pub group: Option<GroupBy>,
    pub target: AggregateTarget,
    pub op: AggregateOp,
}

impl AggregatorSpec {
    /// Resolve field types and names from `schema`.
    ///
    /// Out-of-range indices fail with a no-such-field error; an unsupported
    /// function/type pairing fails with a type mismatch.
    pub fn resolve(
        schema: &Schema,
        aggregate_field: usize,
        group_field: Option<usize>,
        op: AggregateOp,
    ) -> Result<Self, InternalError> {
        let target = AggregateTarget {
            field: aggregate_field,
            field_type: schema.field_type(aggregate_field)?,
            name: schema.field_name(aggregate_field)?.to_string(),
        };
        let group = group_field
            .map(|field| -> Result<GroupBy, InternalError> {
                Ok(GroupBy {
                    field,
                    field_type: schema.field_type(field)?,
                    name: schema.field_name(field)?.to_string(),
                })
            })
            .transpose()?;

        let spec = Self { group, target, op };
        spec.ensure_supported()?;

        Ok(spec)
    }

    /// Validate the function against the aggregated column type.
    pub fn ensure_supported(&self) -> Result<(), InternalError> {
        if self.op.supports(self.target.field_type) {
            return Ok(());
        }

        Err(InternalError::type_mismatch(
            ErrorOrigin::Aggregator,
            format!(
                "{} is not supported on {} field '{}'",
                self.op, self.target.field_type, self.target.name
            ),
        ))
    }

    /// Return true when the replacement spec makes the same variant and
    /// key-type decisions as `self`.
    #[must_use]
    pub fn is_dispatch_compatible(&self, other: &Self) -> bool {
        self.op == other.op
            && self.target.field_type == other.target.field_type
            && self.group.as_ref().map(|group| group.field_type)
                == other.group.as_ref().map(|group| group.field_type)
    }

    /// Output column name of the aggregate value (`avg(salary)`).
    #[must_use]
    pub fn aggregate_column_name(&self) -> String {
        self.op.column_name(&self.target.name)
    }

    /// Output shape: `(group, op(field))` when grouping, `(op(field))` otherwise.
    /// The aggregate column is always INT.
    #[must_use]
    pub fn output_schema(&self) -> Schema {
        let mut fields = Vec::with_capacity(2);
        if let Some(group) = &self.group {
            fields.push(SchemaField::new(group.name.clone(), group.field_type));
        }
        fields.push(SchemaField::new(
            self.aggregate_column_name(),
            FieldType::Int,
        ));

        Schema::new(fields)
    }
}
