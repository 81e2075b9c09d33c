use serde::{Serialize, Serializer};
use std::sync::Arc;

use crate::value::Value;

/// Opaque caller configuration handed unchanged to every nested presenter.
///
/// Cloning is cheap: nested presenters share the same document.
#[derive(Debug, Clone, PartialEq)]
pub struct Options(Arc<serde_json::Value>);

impl Options {
    pub fn new(document: serde_json::Value) -> Self {
        Self(Arc::new(document))
    }

    pub fn document(&self) -> &serde_json::Value {
        &self.0
    }

    /// Walks nested object keys, returning `None` as soon as a step is missing.
    pub fn dig(&self, path: &[&str]) -> Option<&serde_json::Value> {
        path.iter()
            .try_fold(self.0.as_ref(), |current, key| current.get(*key))
    }

    /// Like [`Options::dig`], converted into a presentable value.
    pub fn dig_value(&self, path: &[&str]) -> Value {
        self.dig(path).cloned().map(Value::from).unwrap_or_default()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(serde_json::Value::Object(serde_json::Map::new()))
    }
}

impl From<serde_json::Value> for Options {
    fn from(document: serde_json::Value) -> Self {
        Self::new(document)
    }
}

impl Serialize for Options {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_ref().serialize(serializer)
    }
}
