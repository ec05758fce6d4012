//! Module: executor::aggregate
//! Responsibility: single-column grouped aggregation and the Aggregate operator.
//! Does not own: group budget accounting or limit policy.
//! Boundary: `Aggregate` is the only operator surface; `Aggregator` is usable
//! standalone by callers that drive merging themselves.

mod aggregator;
mod kind;
mod operator;
mod spec;
mod state;

#[cfg(test)]
mod tests;

pub use aggregator::{Aggregator, GroupedAggregator, NumericAggregator, TextAggregator};
pub use kind::{AggregateOp, AggregateOpParseError};
pub use operator::Aggregate;
pub use spec::{AggregateTarget, AggregatorSpec, GroupBy};
pub use state::{Accumulator, NumericAccumulator, TextAccumulator};
