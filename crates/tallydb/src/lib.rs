//! ## Crate layout
//! - `core`: runtime values, schemas, operators, limits, and observability.
//! - `error`: public error taxonomy mapped from runtime errors.
//!
//! The `prelude` module carries what a caller needs to assemble and pull an
//! operator plan.

pub use tallydb_core as core;

pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        config::ExecutionConfig,
        executor::{
            OpIterator, TupleIterator,
            aggregate::{Aggregate, AggregateOp},
        },
        model::{Schema, Tuple},
        value::{FieldType, Value},
    };
    pub use crate::Error;
}
