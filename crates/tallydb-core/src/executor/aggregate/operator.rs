//! Module: executor::aggregate::operator
//! Responsibility: the `Aggregate` pull operator over one child iterator.
//! Does not own: accumulation rules (see `aggregator`) or budget policy.
//! Boundary: construction is pure; the child is scanned only inside `open`.

use crate::{
    config::ExecutionConfig,
    error::{ErrorOrigin, InternalError},
    executor::{
        OpIterator, OperatorCursor, TupleIterator,
        aggregate::{AggregateOp, Aggregator, AggregatorSpec},
    },
    model::{Schema, Tuple},
    obs::sink::Span,
};
use std::{mem, sync::Arc};

const OPERATOR_NAME: &str = "aggregate";

///
/// Aggregate
///
/// Computes one aggregate over a single column, optionally grouped by one
/// other column. `open` drains the child into a fresh aggregator and then
/// replays a frozen snapshot of the results; `rewind` re-scans the child.
///

pub struct Aggregate {
    child: Box<dyn OpIterator>,
    spec: AggregatorSpec,
    config: ExecutionConfig,
    schema: Arc<Schema>,
    results: Option<TupleIterator>,
    cursor: OperatorCursor,
}

impl Aggregate {
    /// Build an aggregate over `child` with no grouped-execution limits.
    ///
    /// Field indices are resolved against the child's schema; the child is
    /// not opened.
    pub fn new(
        child: Box<dyn OpIterator>,
        aggregate_field: usize,
        group_field: Option<usize>,
        op: AggregateOp,
    ) -> Result<Self, InternalError> {
        Self::with_config(
            child,
            aggregate_field,
            group_field,
            op,
            ExecutionConfig::unbounded(),
        )
    }

    /// Build an aggregate with explicit grouped-execution limits. Exceeding
    /// them fails `open` with a resource-limit error.
    pub fn with_config(
        child: Box<dyn OpIterator>,
        aggregate_field: usize,
        group_field: Option<usize>,
        op: AggregateOp,
        config: ExecutionConfig,
    ) -> Result<Self, InternalError> {
        let spec = AggregatorSpec::resolve(child.schema(), aggregate_field, group_field, op)?;
        let schema = Arc::new(spec.output_schema());

        Ok(Self {
            child,
            spec,
            config,
            schema,
            results: None,
            cursor: OperatorCursor::new(ErrorOrigin::Operator),
        })
    }

    #[must_use]
    pub const fn spec(&self) -> &AggregatorSpec {
        &self.spec
    }

    #[must_use]
    pub const fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.cursor.is_open()
    }

    /// Grouping column index, absent for ungrouped aggregation.
    #[must_use]
    pub fn group_field(&self) -> Option<usize> {
        self.spec.group.as_ref().map(|group| group.field)
    }

    /// Grouping column name in the child schema, absent for ungrouped
    /// aggregation.
    #[must_use]
    pub fn group_field_name(&self) -> Option<&str> {
        self.spec.group.as_ref().map(|group| group.name.as_str())
    }

    #[must_use]
    pub const fn aggregate_field(&self) -> usize {
        self.spec.target.field
    }

    /// Aggregated column name in the child schema (`salary`).
    #[must_use]
    pub fn aggregate_field_name(&self) -> &str {
        &self.spec.target.name
    }

    /// Aggregate output column name (`avg(salary)`).
    #[must_use]
    pub fn aggregate_column_name(&self) -> String {
        self.spec.aggregate_column_name()
    }

    #[must_use]
    pub const fn aggregate_op(&self) -> AggregateOp {
        self.spec.op
    }

    #[must_use]
    pub fn child(&self) -> &dyn OpIterator {
        self.child.as_ref()
    }

    /// Replace the child, returning the previous one.
    ///
    /// Only allowed while closed. The replacement must resolve the same
    /// field indices to the same types so the aggregator variant and group
    /// key type stay valid; column names may differ.
    pub fn set_child(
        &mut self,
        child: Box<dyn OpIterator>,
    ) -> Result<Box<dyn OpIterator>, InternalError> {
        self.cursor.ensure_closed("set_child")?;

        let spec = AggregatorSpec::resolve(
            child.schema(),
            self.spec.target.field,
            self.group_field(),
            self.spec.op,
        )?;
        if !self.spec.is_dispatch_compatible(&spec) {
            return Err(InternalError::type_mismatch(
                ErrorOrigin::Operator,
                format!(
                    "replacement child schema ({}) changes aggregate field types",
                    child.schema()
                ),
            ));
        }

        self.schema = Arc::new(spec.output_schema());
        self.spec = spec;

        Ok(mem::replace(&mut self.child, child))
    }

    // Open the child, fold every tuple into a fresh aggregator, and close the
    // child once it was opened here. `scanned` holds the rows read so far,
    // including on failure.
    fn scan(&mut self, scanned: &mut u64) -> Result<TupleIterator, InternalError> {
        let mut aggregator = Aggregator::new(self.spec.clone(), self.config)?;

        self.child.open()?;
        let merged = merge_child(self.child.as_mut(), &mut aggregator, scanned);
        self.child.close();
        merged?;

        let mut results = aggregator.iterator()?;
        results.open()?;

        Ok(results)
    }
}

fn merge_child(
    child: &mut dyn OpIterator,
    aggregator: &mut Aggregator,
    scanned: &mut u64,
) -> Result<(), InternalError> {
    while child.has_next()? {
        let tuple = child.next()?;
        *scanned = scanned.saturating_add(1);
        aggregator.merge_tuple_into_group(&tuple)?;
    }

    Ok(())
}

fn fetch_next(results: Option<&mut TupleIterator>) -> Result<Option<Tuple>, InternalError> {
    let Some(results) = results else {
        return Err(InternalError::operator_invariant(
            "aggregate results missing while open",
        ));
    };

    if results.has_next()? {
        results.next().map(Some)
    } else {
        Ok(None)
    }
}

impl OpIterator for Aggregate {
    fn open(&mut self) -> Result<(), InternalError> {
        self.cursor.ensure_closed("open")?;

        let mut span = Span::new(OPERATOR_NAME);
        let mut scanned = 0;
        let results = self.scan(&mut scanned);
        span.set_rows_scanned(scanned);
        let results = results?;
        span.set_rows_emitted(u64::try_from(results.len()).unwrap_or(u64::MAX));
        span.complete();

        self.results = Some(results);
        self.cursor.mark_open()
    }

    fn has_next(&mut self) -> Result<bool, InternalError> {
        self.cursor.has_next(|| fetch_next(self.results.as_mut()))
    }

    fn next(&mut self) -> Result<Tuple, InternalError> {
        self.cursor.next(|| fetch_next(self.results.as_mut()))
    }

    /// Re-scan the child. A failed re-scan leaves the operator closed.
    fn rewind(&mut self) -> Result<(), InternalError> {
        self.cursor.ensure_open("rewind")?;
        self.close();

        self.open()
    }

    fn close(&mut self) {
        self.cursor.mark_closed();
        self.results = None;
    }

    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}
