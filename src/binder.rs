//! Ordered, type-tagged parameter storage.
//!
//! The binder is the only place where values enter a statement; clause methods in
//! [`crate::statement`] append here in the same order they write `?` into the SQL.

use crate::types::{RowValues, TypeTag};

/// Holds `(value, tag)` pairs in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBinder {
    values: Vec<RowValues>,
    tags: Vec<TypeTag>,
}

impl ParameterBinder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value and return its zero-based position.
    pub fn append(&mut self, value: impl Into<RowValues>) -> usize {
        let value = value.into();
        self.tags.push(Self::type_tag_for(&value));
        self.values.push(value);
        self.values.len() - 1
    }

    /// Append every value, preserving iteration order.
    pub fn extend<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        for value in values {
            self.append(value);
        }
    }

    /// Infer the wire tag for a value.
    #[must_use]
    pub fn type_tag_for(value: &RowValues) -> TypeTag {
        value.type_tag()
    }

    /// Concatenate the tags of all appended values, e.g. `"sid"`.
    #[must_use]
    pub fn render_type_tags(&self) -> String {
        self.tags.iter().map(|t| t.as_char()).collect()
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    #[must_use]
    pub fn tags(&self) -> &[TypeTag] {
        &self.tags
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Split into the tag string and the owned values.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<RowValues>) {
        let tags = self.render_type_tags();
        (tags, self.values)
    }
}
