//! Single output row builder.

use indexmap::IndexMap;
use serde_json::Value;

/// One output row under construction.
///
/// Fields keep their insertion order; the order in which fields are first set
/// across all row kinds becomes the column order of the final TSV block.
/// A field may be set to an explicit null, which is distinct from an empty
/// string (the consuming tool treats them differently).
///
/// # Example
///
/// ```rust,ignore
/// let row = Row::new()
///     .set("name", format!("Gini coefficient ({title})"))
///     .set("slug", format!("gini_{wel}_{eq}"))
///     .set_null("unit")
///     .set("type", "Numeric");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Later sets of the same field overwrite the value but
    /// keep the original position.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Set a field to the explicit null marker.
    pub fn set_null(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), Value::Null);
        self
    }

    /// Set a field from an optional value; `None` becomes null.
    pub fn set_opt(mut self, field: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        let value = value.map(Into::into).unwrap_or(Value::Null);
        self.fields.insert(field.into(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn into_fields(self) -> IndexMap<String, Value> {
        self.fields
    }
}
