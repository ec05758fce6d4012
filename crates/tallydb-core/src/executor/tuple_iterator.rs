use crate::{
    error::{ErrorOrigin, InternalError},
    executor::OpIterator,
    model::{Schema, Tuple},
    value::Value,
};
use std::sync::Arc;

///
/// TupleIterator
///
/// Materialized tuple sequence exposed through the `OpIterator` contract.
/// Owns its tuples, so it is a snapshot independent of whatever produced
/// them; rewinding is a cursor reset.
///

#[derive(Clone, Debug)]
pub struct TupleIterator {
    schema: Arc<Schema>,
    tuples: Vec<Tuple>,
    index: usize,
    open: bool,
}

impl TupleIterator {
    /// Build an iterator over tuples that must all conform to `schema`.
    pub fn new(schema: Arc<Schema>, tuples: Vec<Tuple>) -> Result<Self, InternalError> {
        if let Some((position, tuple)) = tuples
            .iter()
            .enumerate()
            .find(|(_, tuple)| tuple.schema().as_ref() != schema.as_ref())
        {
            return Err(InternalError::type_mismatch(
                ErrorOrigin::Iterator,
                format!(
                    "tuple {position} has schema ({}) but iterator expects ({schema})",
                    tuple.schema()
                ),
            ));
        }

        Ok(Self {
            schema,
            tuples,
            index: 0,
            open: false,
        })
    }

    /// Build an iterator from raw rows, validating each against `schema`.
    pub fn from_rows(
        schema: Arc<Schema>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> Result<Self, InternalError> {
        let tuples = rows
            .into_iter()
            .map(|values| Tuple::new(Arc::clone(&schema), values))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(schema, tuples)
    }

    #[must_use]
    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.tuples.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    fn ensure_open(&self, method: &str) -> Result<(), InternalError> {
        if self.open {
            return Ok(());
        }

        Err(InternalError::state(
            ErrorOrigin::Iterator,
            format!("{method} called on a closed tuple iterator"),
        ))
    }
}

impl OpIterator for TupleIterator {
    fn open(&mut self) -> Result<(), InternalError> {
        if self.open {
            return Err(InternalError::state(
                ErrorOrigin::Iterator,
                "open called on an open tuple iterator",
            ));
        }
        self.open = true;
        self.index = 0;

        Ok(())
    }

    fn has_next(&mut self) -> Result<bool, InternalError> {
        self.ensure_open("has_next")?;

        Ok(self.index < self.tuples.len())
    }

    fn next(&mut self) -> Result<Tuple, InternalError> {
        self.ensure_open("next")?;
        let Some(tuple) = self.tuples.get(self.index) else {
            return Err(InternalError::no_such_element(ErrorOrigin::Iterator));
        };
        self.index = self.index.saturating_add(1);

        Ok(tuple.clone())
    }

    fn rewind(&mut self) -> Result<(), InternalError> {
        self.ensure_open("rewind")?;
        self.index = 0;

        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}

///
/// TESTS
///
