use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::source::{Record, Relation, Source};

/// Ordered field storage shared by records and presented data.
pub type Fields = IndexMap<String, Value>;

/// A tagged value flowing through the resolution pipeline.
///
/// `Null` doubles as the "no value" marker: manual fields, missing attributes
/// and broken cycles all resolve to it. It stays distinguishable from
/// legitimately empty values such as `""` or an empty list.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    List(Vec<Value>),
    /// A source object exposing named members.
    Object(Arc<dyn Source>),
    /// A lazily materialized ordered collection.
    Relation(Arc<dyn Relation>),
    /// The resolved data of a nested presenter.
    Presented(Box<Presented>),
}

/// Output of a presenter once it is embedded into another one.
#[derive(Debug, Clone, PartialEq)]
pub struct Presented {
    class: Arc<str>,
    fields: Fields,
}

impl Presented {
    pub fn new(class: Arc<str>, fields: Fields) -> Self {
        Self { class, fields }
    }

    /// Name of the presenter class that produced this data.
    pub fn class_name(&self) -> &str {
        &self.class
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

impl Value {
    pub fn object<S: Source + 'static>(source: S) -> Self {
        Value::Object(Arc::new(source))
    }

    pub fn relation<R: Relation + 'static>(relation: R) -> Self {
        Value::Relation(Arc::new(relation))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Ruby-style truthiness: only `Null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_presented(&self) -> Option<&Presented> {
        match self {
            Value::Presented(presented) => Some(presented),
            _ => None,
        }
    }

    /// Looks up a named member, returning `None` when the value does not
    /// expose it. Only objects and presented data have members.
    pub fn member(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(source) => source.member(name),
            Value::Presented(presented) => presented.get(name).cloned(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Relation(a), Value::Relation(b)) => Arc::ptr_eq(a, b),
            (Value::Presented(a), Value::Presented(b)) => a == b,
            _ => false,
        }
    }
}

/// String form used by masking and other text formatting.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            other => {
                let json = serde_json::to_string(other).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Value::List(items) => serialize_items(items, serializer),
            Value::Relation(relation) => {
                serialize_items(&relation.to_ordered_sequence(), serializer)
            }
            Value::Object(source) => {
                let names = source.member_names();
                let mut map = serializer.serialize_map(Some(names.len()))?;
                for name in names {
                    let value = source.member(&name).unwrap_or_default();
                    map.serialize_entry(&name, &value)?;
                }
                map.end()
            }
            Value::Presented(presented) => presented.serialize(serializer),
        }
    }
}

impl Serialize for Presented {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

fn serialize_items<S: Serializer>(items: &[Value], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Object(Arc::new(value))
    }
}

impl From<Presented> for Value {
    fn from(value: Presented) -> Self {
        Value::Presented(Box::new(value))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// JSON objects become [`Record`] sources so hashes present like objects.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or_default(),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::from(Record::from_json_map(map)),
        }
    }
}
