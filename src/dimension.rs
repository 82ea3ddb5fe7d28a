//! Dimensions: named, ordered lists of candidate values.
//!
//! A dimension optionally carries one filter source per value. Filters are
//! compiled by the engine that receives the dimension, never here.

use crate::value::Value;
use crate::{err_msg, CombinatoriaError};

/// A named axis of variation with its ordered candidate values.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    name: String,
    values: Vec<Value>,
    filters: Option<Vec<Option<String>>>,
}

impl Dimension {
    /// Creates a dimension without filters.
    pub fn new<V: Into<Value>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, CombinatoriaError> {
        Self::build(name.into(), values.into_iter().map(Into::into).collect(), None)
    }

    /// Creates a dimension with one filter slot per value.
    ///
    /// `None` and empty slots are unconditional.
    pub fn with_filters<V, F>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
        filters: impl IntoIterator<Item = Option<F>>,
    ) -> Result<Self, CombinatoriaError>
    where
        V: Into<Value>,
        F: Into<String>,
    {
        let filters = filters.into_iter().map(|f| f.map(Into::into)).collect();
        Self::build(
            name.into(),
            values.into_iter().map(Into::into).collect(),
            Some(filters),
        )
    }

    fn build(
        name: String,
        values: Vec<Value>,
        filters: Option<Vec<Option<String>>>,
    ) -> Result<Self, CombinatoriaError> {
        if name.is_empty() {
            return Err(err_msg!(Shape, "no name defined for the dimension"));
        }
        if values.is_empty() {
            return Err(err_msg!(
                Shape,
                "no values have been defined for dimension '{}'",
                name
            ));
        }
        if let Some(filters) = &filters {
            if filters.len() != values.len() {
                return Err(err_msg!(
                    Shape,
                    "dimension '{}' declares {} filters for {} values",
                    name,
                    filters.len(),
                    values.len()
                ));
            }
        }
        Ok(Self {
            name,
            values,
            filters,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; a dimension is rejected at construction if it has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Filter source for the value at `index`, if one was declared.
    pub fn filter(&self, index: usize) -> Option<&str> {
        self.filters
            .as_ref()
            .and_then(|f| f.get(index))
            .and_then(|f| f.as_deref())
    }

    /// Whether the dimension declared a filter list at all.
    pub fn has_filters(&self) -> bool {
        self.filters.is_some()
    }
}
