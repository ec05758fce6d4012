use crate::{
    error::{ErrorOrigin, InternalError},
    model::Schema,
    value::Value,
};
use std::sync::Arc;

///
/// Tuple
///
/// Fixed-arity row conforming to its schema. Immutable once built.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tuple {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Tuple {
    /// Build a tuple, validating arity and per-field types against `schema`.
    pub fn new(schema: Arc<Schema>, values: Vec<Value>) -> Result<Self, InternalError> {
        if values.len() != schema.len() {
            return Err(InternalError::type_mismatch(
                ErrorOrigin::Tuple,
                format!(
                    "tuple arity {} does not match schema arity {}",
                    values.len(),
                    schema.len()
                ),
            ));
        }

        for (index, (value, field)) in values.iter().zip(schema.iter()).enumerate() {
            if value.field_type() != field.field_type {
                return Err(InternalError::type_mismatch(
                    ErrorOrigin::Tuple,
                    format!(
                        "field {index} ({}) expects {}, found {}",
                        field.name,
                        field.field_type,
                        value.field_type()
                    ),
                ));
            }
        }

        Ok(Self { schema, values })
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Return the value at `index`.
    pub fn field(&self, index: usize) -> Result<&Value, InternalError> {
        self.values
            .get(index)
            .ok_or_else(|| InternalError::no_such_field(ErrorOrigin::Tuple, index, self.len()))
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
