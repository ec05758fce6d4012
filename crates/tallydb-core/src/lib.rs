//! Core runtime for TallyDB: values, schemas, the pull iterator contract,
//! grouped aggregation, execution limits, and observability.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod executor;
pub mod model;
pub mod obs;
pub mod value;

///
/// Prelude
///
/// Prelude contains the operator vocabulary needed to build and drive a
/// plan. Errors, metrics, and budget internals stay behind their modules.
///

pub mod prelude {
    pub use crate::{
        config::ExecutionConfig,
        executor::{
            OpIterator, TupleIterator,
            aggregate::{Aggregate, AggregateOp},
        },
        model::{Schema, SchemaField, Tuple},
        value::{FieldType, Value},
    };
}
