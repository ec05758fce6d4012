use crate::{
    error::{ErrorOrigin, InternalError},
    value::FieldType,
};
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// SchemaField
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
}

impl SchemaField {
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

///
/// Schema
///
/// Ordered `(name, type)` description of a tuple's shape.
/// Field indices are stable positions into this sequence.
///

#[derive(Clone, Debug, Default, Deref, Deserialize, Eq, PartialEq, Serialize)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    #[must_use]
    pub const fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    /// Build a schema from `(name, type)` pairs.
    pub fn from_pairs<N>(pairs: impl IntoIterator<Item = (N, FieldType)>) -> Self
    where
        N: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, field_type)| SchemaField::new(name, field_type))
                .collect(),
        )
    }

    #[must_use]
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Return the declared type at `index`.
    pub fn field_type(&self, index: usize) -> Result<FieldType, InternalError> {
        self.field(index).map(|field| field.field_type)
    }

    /// Return the field name at `index`.
    pub fn field_name(&self, index: usize) -> Result<&str, InternalError> {
        self.field(index).map(|field| field.name.as_str())
    }

    /// Resolve the first field with the given name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    fn field(&self, index: usize) -> Result<&SchemaField, InternalError> {
        self.fields
            .get(index)
            .ok_or_else(|| InternalError::no_such_field(ErrorOrigin::Schema, index, self.len()))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, field) in self.fields.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}({})", field.name, field.field_type)?;
        }

        Ok(())
    }
}
