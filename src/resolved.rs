//! The output record of a resolution call.

use std::ops::Index;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::env::EnvMap;
use crate::error::EnvcastError;

/// Resolved fields, keyed by output name, plus any diagnostics collected
/// under [`Verbosity::Log`](crate::Verbosity::Log).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    values: Map<String, Value>,
    diagnostics: Vec<String>,
}

impl Resolved {
    /// Every environment entry as a string value, unmodified.
    pub fn verbatim(env: EnvMap) -> Self {
        Self {
            values: env
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
            diagnostics: Vec::new(),
        }
    }

    /// Assign a field. Assigning an existing field replaces it.
    pub(crate) fn set(&mut self, field: String, value: Value) {
        tracing::debug!(field = %field, value = %value, "set");
        self.values.insert(field, value);
    }

    pub(crate) fn with_diagnostics(mut self, diagnostics: Vec<String>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// The field as a string slice, if it resolved to a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Diagnostic messages for failures that were logged and recovered.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    /// Deserialize the record into an application type.
    ///
    /// ```ignore
    /// #[derive(Deserialize)]
    /// struct Server { host: String, port: u16 }
    ///
    /// let server: Server = resolved.deserialize_into()?;
    /// ```
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, EnvcastError> {
        serde_json::from_value(Value::Object(self.values.clone()))
            .map_err(EnvcastError::Deserialize)
    }
}

impl Index<&str> for Resolved {
    type Output = Value;

    /// Panics if the field is missing, like indexing a map.
    fn index(&self, field: &str) -> &Value {
        &self.values[field]
    }
}

impl IntoIterator for Resolved {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
