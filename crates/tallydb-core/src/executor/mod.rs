//! Module: executor
//! Responsibility: pull-based operators and the aggregation runtime.
//! Does not own: value/schema definitions or metrics state.
//! Boundary: every operator here satisfies the `OpIterator` contract.

pub mod aggregate;
pub mod group;
mod iterator;
mod tuple_iterator;

pub use iterator::{OpIterator, OperatorCursor, drain};
pub use tuple_iterator::TupleIterator;
