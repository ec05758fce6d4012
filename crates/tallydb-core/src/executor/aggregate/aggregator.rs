//! Module: executor::aggregate::aggregator
//! Responsibility: per-group accumulation and result-set snapshots.
//! Does not own: child scanning or operator lifecycle.
//! Boundary: variants are chosen once from the aggregated field type.

use crate::{
    config::ExecutionConfig,
    error::{ErrorOrigin, InternalError},
    executor::{
        TupleIterator,
        aggregate::{
            AggregateOp, AggregatorSpec,
            state::{Accumulator, NumericAccumulator, TextAccumulator},
        },
        group::{ExecutionBudget, GroupKey},
    },
    model::{Schema, Tuple},
    value::{FieldType, Value},
};
use std::{collections::BTreeMap, sync::Arc};

///
/// GroupedAggregator
///
/// Accumulator mapping for one aggregation pass: exactly one state per
/// distinct group key, created lazily and never removed while merging.
/// Groups are finalized in ascending key order.
///

#[derive(Debug)]
pub struct GroupedAggregator<A: Accumulator> {
    spec: AggregatorSpec,
    config: ExecutionConfig,
    output_schema: Arc<Schema>,
    groups: BTreeMap<GroupKey, A>,
    budget: ExecutionBudget,
}

pub type NumericAggregator = GroupedAggregator<NumericAccumulator>;
pub type TextAggregator = GroupedAggregator<TextAccumulator>;

impl<A: Accumulator> GroupedAggregator<A> {
    /// Build an empty aggregator, rejecting specs whose aggregated field type
    /// does not match this variant or whose function is unsupported.
    pub fn new(spec: AggregatorSpec, config: ExecutionConfig) -> Result<Self, InternalError> {
        if spec.target.field_type != A::FIELD_TYPE {
            return Err(InternalError::type_mismatch(
                ErrorOrigin::Aggregator,
                format!(
                    "{} aggregator cannot aggregate {} field '{}'",
                    A::FIELD_TYPE,
                    spec.target.field_type,
                    spec.target.name
                ),
            ));
        }
        spec.ensure_supported()?;
        let output_schema = Arc::new(spec.output_schema());

        Ok(Self {
            spec,
            config,
            output_schema,
            groups: BTreeMap::new(),
            budget: ExecutionBudget::new(),
        })
    }

    #[must_use]
    pub const fn spec(&self) -> &AggregatorSpec {
        &self.spec
    }

    #[must_use]
    pub const fn output_schema(&self) -> &Arc<Schema> {
        &self.output_schema
    }

    #[must_use]
    pub const fn budget(&self) -> &ExecutionBudget {
        &self.budget
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Drop all groups and budget usage for a fresh accumulation pass.
    pub fn reset(&mut self) {
        self.groups.clear();
        self.budget = ExecutionBudget::new();
    }

    /// Merge one input tuple into its group.
    pub fn merge_tuple_into_group(&mut self, tuple: &Tuple) -> Result<(), InternalError> {
        let key = self.group_key(tuple)?;
        let value = tuple.field(self.spec.target.field)?;
        let op = self.spec.op;

        // Phase 1: update an existing group in place.
        if let Some(state) = self.groups.get_mut(&key) {
            return state.update(op, value);
        }

        // Phase 2: charge and insert a new group.
        let state = A::start(op, value)?;
        self.budget
            .record_new_group(&self.config, &key, size_of::<A>())?;
        self.groups.insert(key, state);

        Ok(())
    }

    /// Snapshot the current results as an unopened tuple iterator.
    ///
    /// Later merges do not affect an iterator already returned.
    pub fn iterator(&self) -> Result<TupleIterator, InternalError> {
        let op = self.spec.op;
        let mut rows = self
            .groups
            .iter()
            .map(|(key, state)| {
                let aggregate = Value::Int(state.finalize(op));
                match key.value() {
                    Some(group) => vec![group.clone(), aggregate],
                    None => vec![aggregate],
                }
            })
            .collect::<Vec<_>>();

        // Ungrouped COUNT over no input is one row of zero; other functions
        // have no value to report without a NULL.
        if rows.is_empty() && self.spec.group.is_none() && op == AggregateOp::Count {
            rows.push(vec![Value::Int(0)]);
        }

        TupleIterator::from_rows(Arc::clone(&self.output_schema), rows)
    }

    fn group_key(&self, tuple: &Tuple) -> Result<GroupKey, InternalError> {
        let Some(group) = &self.spec.group else {
            return Ok(GroupKey::Ungrouped);
        };

        let value = tuple.field(group.field)?;
        if value.field_type() != group.field_type {
            return Err(InternalError::type_mismatch(
                ErrorOrigin::Aggregator,
                format!(
                    "group field '{}' expects {}, found {}",
                    group.name,
                    group.field_type,
                    value.field_type()
                ),
            ));
        }

        Ok(GroupKey::Value(value.clone()))
    }
}

///
/// Aggregator
///
/// Closed set of aggregator variants selected once from the aggregated
/// field's declared type. Both expose the same merge/iterator contract.
///

#[derive(Debug)]
pub enum Aggregator {
    Numeric(NumericAggregator),
    Text(TextAggregator),
}

impl Aggregator {
    /// Select and build the variant for `spec.target.field_type`.
    pub fn new(spec: AggregatorSpec, config: ExecutionConfig) -> Result<Self, InternalError> {
        match spec.target.field_type {
            FieldType::Int => NumericAggregator::new(spec, config).map(Self::Numeric),
            FieldType::Text => TextAggregator::new(spec, config).map(Self::Text),
        }
    }

    pub fn merge_tuple_into_group(&mut self, tuple: &Tuple) -> Result<(), InternalError> {
        match self {
            Self::Numeric(inner) => inner.merge_tuple_into_group(tuple),
            Self::Text(inner) => inner.merge_tuple_into_group(tuple),
        }
    }

    pub fn iterator(&self) -> Result<TupleIterator, InternalError> {
        match self {
            Self::Numeric(inner) => inner.iterator(),
            Self::Text(inner) => inner.iterator(),
        }
    }

    #[must_use]
    pub const fn spec(&self) -> &AggregatorSpec {
        match self {
            Self::Numeric(inner) => inner.spec(),
            Self::Text(inner) => inner.spec(),
        }
    }

    #[must_use]
    pub const fn output_schema(&self) -> &Arc<Schema> {
        match self {
            Self::Numeric(inner) => inner.output_schema(),
            Self::Text(inner) => inner.output_schema(),
        }
    }

    #[must_use]
    pub const fn budget(&self) -> &ExecutionBudget {
        match self {
            Self::Numeric(inner) => inner.budget(),
            Self::Text(inner) => inner.budget(),
        }
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        match self {
            Self::Numeric(inner) => inner.group_count(),
            Self::Text(inner) => inner.group_count(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::Numeric(inner) => inner.reset(),
            Self::Text(inner) => inner.reset(),
        }
    }
}
