//! The protocol presenters use to read source objects.
//!
//! A source object only has to answer two questions: does it expose a member
//! with a given name, and what is that member's value. Both are folded into
//! [`Source::member`], which returns `None` when the member is not exposed.

use indexmap::IndexMap;
use std::fmt;

use crate::value::{Fields, Value};

/// An object exposing named attributes and associations.
pub trait Source: fmt::Debug + Send + Sync {
    /// Returns the member value, or `None` when the object does not expose it.
    fn member(&self, name: &str) -> Option<Value>;

    /// Member names in a stable order, used when the object itself is
    /// serialized.
    fn member_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether the object counts as empty for blank/present checks.
    fn is_empty(&self) -> bool {
        false
    }
}

/// A lazily evaluated ordered collection, e.g. a database relation.
///
/// Nested presenters materialize it through [`Relation::to_ordered_sequence`]
/// before mapping each element.
pub trait Relation: fmt::Debug + Send + Sync {
    fn to_ordered_sequence(&self) -> Vec<Value>;
}

/// A plain keyed source object. Every key it holds is an exposed member,
/// including keys whose value is `Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    members: Fields,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.members.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let members = map
            .into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect::<IndexMap<_, _>>();
        Self { members }
    }
}

impl Source for Record {
    fn member(&self, name: &str) -> Option<Value> {
        self.members.get(name).cloned()
    }

    fn member_names(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }

    fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let members = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { members }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_members_are_still_exposed() {
        let record = Record::new().with("manager", Value::Null);

        assert_eq!(record.member("manager"), Some(Value::Null));
        assert_eq!(record.member("boss"), None);
    }

    #[test]
    fn test_reinsert_keeps_member_position() {
        let mut record = Record::new().with("id", 1).with("name", "matt");
        record.insert("id", 2);

        assert_eq!(record.member_names(), vec!["id", "name"]);
        assert_eq!(record.get("id"), Some(&Value::Int(2)));
    }
}
