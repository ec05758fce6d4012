//! Module: model
//! Responsibility: schema and tuple value objects shared by every operator.
//! Does not own: operator lifecycle or accumulation.
//! Boundary: immutable shape + row containers passed between operators.

mod schema;
mod tuple;


pub use schema::{Schema, SchemaField};
pub use tuple::Tuple;
