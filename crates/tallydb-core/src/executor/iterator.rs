use crate::{
    error::{ErrorOrigin, InternalError},
    model::{Schema, Tuple},
};
use std::sync::Arc;

///
/// OpIterator
///
/// Pull-based lifecycle contract shared by every execution operator.
///
/// State machine: `CLOSED --open--> OPEN`, `OPEN --close--> CLOSED`,
/// `OPEN --rewind--> OPEN`. `has_next`, `next`, and `rewind` fail with a
/// state error while closed; `schema` is callable in any state.
///

pub trait OpIterator {
    /// Transition from closed to open, performing any first-time setup.
    fn open(&mut self) -> Result<(), InternalError>;

    /// Return true iff a subsequent `next` would succeed. Never consumes.
    fn has_next(&mut self) -> Result<bool, InternalError>;

    /// Return the next tuple, or a no-such-element error when exhausted.
    fn next(&mut self) -> Result<Tuple, InternalError>;

    /// Restart iteration at the first output tuple.
    fn rewind(&mut self) -> Result<(), InternalError>;

    /// Release iteration resources. Closing a closed iterator is a no-op.
    fn close(&mut self);

    /// Output shape of every tuple this iterator yields.
    fn schema(&self) -> &Arc<Schema>;
}

impl<T> OpIterator for Box<T>
where
    T: OpIterator + ?Sized,
{
    fn open(&mut self) -> Result<(), InternalError> {
        self.as_mut().open()
    }

    fn has_next(&mut self) -> Result<bool, InternalError> {
        self.as_mut().has_next()
    }

    fn next(&mut self) -> Result<Tuple, InternalError> {
        self.as_mut().next()
    }

    fn rewind(&mut self) -> Result<(), InternalError> {
        self.as_mut().rewind()
    }

    fn close(&mut self) {
        self.as_mut().close();
    }

    fn schema(&self) -> &Arc<Schema> {
        self.as_ref().schema()
    }
}

///
/// OperatorCursor
///
/// Lifecycle flag plus a one-tuple lookahead buffer. Operators that produce
/// tuples through a `fetch_next` hook use it to honor `has_next`/`next`
/// without consuming on `has_next`.
///

#[derive(Debug)]
pub struct OperatorCursor {
    origin: ErrorOrigin,
    open: bool,
    lookahead: Option<Tuple>,
}

impl OperatorCursor {
    #[must_use]
    pub const fn new(origin: ErrorOrigin) -> Self {
        Self {
            origin,
            open: false,
            lookahead: None,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Fail with a state error unless the cursor is open.
    pub fn ensure_open(&self, method: &str) -> Result<(), InternalError> {
        if self.open {
            return Ok(());
        }

        Err(InternalError::state(
            self.origin,
            format!("{method} called on a closed iterator"),
        ))
    }

    /// Fail with a state error unless the cursor is closed.
    pub fn ensure_closed(&self, method: &str) -> Result<(), InternalError> {
        if !self.open {
            return Ok(());
        }

        Err(InternalError::state(
            self.origin,
            format!("{method} called on an open iterator"),
        ))
    }

    /// Transition closed -> open.
    pub fn mark_open(&mut self) -> Result<(), InternalError> {
        self.ensure_closed("open")?;
        self.open = true;
        self.lookahead = None;

        Ok(())
    }

    /// Transition to closed and drop any buffered tuple.
    pub fn mark_closed(&mut self) {
        self.open = false;
        self.lookahead = None;
    }

    /// Report whether another tuple exists, buffering it when fetched.
    pub fn has_next(
        &mut self,
        fetch_next: impl FnOnce() -> Result<Option<Tuple>, InternalError>,
    ) -> Result<bool, InternalError> {
        self.ensure_open("has_next")?;
        if self.lookahead.is_none() {
            self.lookahead = fetch_next()?;
        }

        Ok(self.lookahead.is_some())
    }

    /// Return the buffered tuple, or fetch one from the source.
    pub fn next(
        &mut self,
        fetch_next: impl FnOnce() -> Result<Option<Tuple>, InternalError>,
    ) -> Result<Tuple, InternalError> {
        self.ensure_open("next")?;
        if let Some(tuple) = self.lookahead.take() {
            return Ok(tuple);
        }

        fetch_next()?.ok_or_else(|| InternalError::no_such_element(self.origin))
    }
}

/// Pull every remaining tuple from an open iterator.
pub fn drain(iter: &mut dyn OpIterator) -> Result<Vec<Tuple>, InternalError> {
    let mut out = Vec::new();
    while iter.has_next()? {
        out.push(iter.next()?);
    }

    Ok(out)
}

///
/// TESTS
///
