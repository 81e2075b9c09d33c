//! Per-field resolution rules and the pipeline that applies them.
//!
//! Stages run in a fixed order, each one skipped unless configured:
//! manual check, value acquisition (method or for/through traversal),
//! transform, alias substitution, nested presenter wrapping, percent
//! formatting and masking.

use glaze_types::Value;
use glaze_types::formatting::{self, DEFAULT_MASK_CHAR, DEFAULT_MASK_LEN};
use tracing::{debug, warn};

use crate::presenter::Presenter;
use crate::{Error, Result};

/// Which presenter method (or transform) a resolver calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// The method named like the field itself
    SameName,
    /// An explicitly named method
    Named(String),
}

impl Accessor {
    pub fn name<'a>(&'a self, field: &'a str) -> &'a str {
        match self {
            Accessor::SameName => field,
            Accessor::Named(name) => name,
        }
    }
}

/// Configuration for resolving one declared field.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    method: Option<Accessor>,
    attribute: Option<String>,
    through: Vec<String>,
    manual: bool,
    transform: Option<Accessor>,
    true_alias: Option<Value>,
    false_alias: Option<Value>,
    null_alias: Option<Value>,
    blank_alias: Option<Value>,
    present_alias: Option<Value>,
    target: Option<String>,
    percent: bool,
    mask: bool,
    mask_char: Option<String>,
    mask_len: Option<usize>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a resolver from an option map such as `{"for": "name",
    /// "through": ["manager"]}`.
    ///
    /// Unrecognized keys are rejected with [`Error::IllegalOption`].
    pub fn from_options(options: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let mut resolver = Resolver::default();

        for (key, value) in options {
            match key.as_str() {
                "method" => resolver.method = accessor_option(key, value)?,
                "for" => resolver.attribute = Some(string_option(key, value)?),
                "through" => resolver.through = names_option(key, value)?,
                "manual" => resolver.manual = flag_option(key, value)?,
                "transform" => resolver.transform = accessor_option(key, value)?,
                "true_alias" => resolver.true_alias = Some(Value::from(value.clone())),
                "false_alias" => resolver.false_alias = Some(Value::from(value.clone())),
                "null" => resolver.null_alias = Some(Value::from(value.clone())),
                "blank" => resolver.blank_alias = Some(Value::from(value.clone())),
                "present" => resolver.present_alias = Some(Value::from(value.clone())),
                "as" => resolver.target = Some(string_option(key, value)?),
                "percent" => resolver.percent = flag_option(key, value)?,
                "mask" => resolver.mask = flag_option(key, value)?,
                "mask_char" => resolver.mask_char = Some(string_option(key, value)?),
                "mask_len" => {
                    let len = value.as_u64().ok_or_else(|| Error::InvalidOption {
                        key: key.clone(),
                        reason: "expected a non-negative integer".to_string(),
                    })?;
                    resolver.mask_len = Some(len as usize);
                }
                other => return Err(Error::IllegalOption(other.to_string())),
            }
        }

        Ok(resolver)
    }

    /// Computes the value with the presenter method named like the field.
    pub fn method(mut self) -> Self {
        self.method = Some(Accessor::SameName);
        self
    }

    pub fn method_named(mut self, name: impl Into<String>) -> Self {
        self.method = Some(Accessor::Named(name.into()));
        self
    }

    /// Reads this attribute instead of the field name (the `for` option).
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = Some(name.into());
        self
    }

    pub fn through<I, S>(mut self, associations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.through = associations.into_iter().map(Into::into).collect();
        self
    }

    pub fn manual(mut self) -> Self {
        self.manual = true;
        self
    }

    pub fn transform(mut self) -> Self {
        self.transform = Some(Accessor::SameName);
        self
    }

    pub fn transform_with(mut self, name: impl Into<String>) -> Self {
        self.transform = Some(Accessor::Named(name.into()));
        self
    }

    pub fn true_alias(mut self, alias: impl Into<Value>) -> Self {
        self.true_alias = Some(alias.into());
        self
    }

    pub fn false_alias(mut self, alias: impl Into<Value>) -> Self {
        self.false_alias = Some(alias.into());
        self
    }

    pub fn null_alias(mut self, alias: impl Into<Value>) -> Self {
        self.null_alias = Some(alias.into());
        self
    }

    pub fn blank_alias(mut self, alias: impl Into<Value>) -> Self {
        self.blank_alias = Some(alias.into());
        self
    }

    pub fn present_alias(mut self, alias: impl Into<Value>) -> Self {
        self.present_alias = Some(alias.into());
        self
    }

    /// Wraps the value in a nested presenter of the named class (the `as`
    /// option).
    pub fn presented_as(mut self, class: impl Into<String>) -> Self {
        self.target = Some(class.into());
        self
    }

    pub fn percent(mut self) -> Self {
        self.percent = true;
        self
    }

    pub fn mask(mut self) -> Self {
        self.mask = true;
        self
    }

    pub fn mask_char(mut self, mask_char: impl Into<String>) -> Self {
        self.mask_char = Some(mask_char.into());
        self
    }

    pub fn mask_len(mut self, keep_last: usize) -> Self {
        self.mask_len = Some(keep_last);
        self
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    pub fn method_accessor(&self) -> Option<&Accessor> {
        self.method.as_ref()
    }

    pub fn transform_accessor(&self) -> Option<&Accessor> {
        self.transform.as_ref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Runs the full pipeline for `key` against `presenter`.
    pub fn resolve(&self, presenter: &Presenter, key: &str) -> Result<Value> {
        if self.manual {
            return Ok(Value::Null);
        }

        let value = self.resolve_value(presenter, key)?;
        let value = self.resolve_transform(presenter, key, value)?;

        let value = self.resolve_alias(value);
        let value = self.resolve_as(presenter, value)?;

        let value = self.resolve_percent(value);
        Ok(self.resolve_mask(value))
    }

    // method and for/through are mutually exclusive; method wins.
    fn resolve_value(&self, presenter: &Presenter, key: &str) -> Result<Value> {
        if let Some(method) = &self.method {
            return presenter.call_method(method.name(key));
        }

        let model_key = self.attribute.as_deref().unwrap_or(key);
        let mut model = presenter.source().clone();

        for association in &self.through {
            model = model.member(association).unwrap_or_default();
            if !model.is_truthy() {
                break;
            }
        }

        Ok(model.member(model_key).unwrap_or_default())
    }

    fn resolve_transform(&self, presenter: &Presenter, key: &str, value: Value) -> Result<Value> {
        match &self.transform {
            Some(transform) => presenter.call_transform(transform.name(key), value),
            None => Ok(value),
        }
    }

    fn resolve_alias(&self, value: Value) -> Value {
        if let Some(alias) = &self.true_alias
            && matches!(value, Value::Bool(true))
        {
            alias.clone()
        } else if let Some(alias) = &self.false_alias
            && matches!(value, Value::Bool(false))
        {
            alias.clone()
        } else if let Some(alias) = &self.null_alias
            && value.is_null()
        {
            alias.clone()
        } else if let Some(alias) = &self.blank_alias
            && formatting::is_blank(&value)
        {
            alias.clone()
        } else if let Some(alias) = &self.present_alias
            && formatting::is_present(&value)
        {
            alias.clone()
        } else {
            value
        }
    }

    fn resolve_as(&self, presenter: &Presenter, value: Value) -> Result<Value> {
        let Some(target) = &self.target else {
            return Ok(value);
        };
        if !value.is_truthy() {
            return Ok(Value::Null);
        }

        let registry = presenter.registry();
        if registry.class(target).is_none() {
            warn!(
                presenter = presenter.class_name(),
                target = target.as_str(),
                "nested presenter class is not registered"
            );
            return Ok(Value::Null);
        }

        // cycle breaker
        if presenter.visited().contains(target) {
            debug!(
                presenter = presenter.class_name(),
                target = target.as_str(),
                "presenter class already on the resolution path, leaving field absent"
            );
            return Ok(Value::Null);
        }

        let visited = presenter.visited().descend(presenter.class_name(), target);
        let present = |source: Value| {
            Presenter::construct(
                registry,
                target,
                source,
                presenter.options().clone(),
                visited.clone(),
            )
            .map(Presenter::into_value)
        };

        match value {
            Value::Relation(relation) => relation
                .to_ordered_sequence()
                .into_iter()
                .map(present)
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Value::List(items) => items
                .into_iter()
                .map(present)
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            single => present(single),
        }
    }

    fn resolve_percent(&self, value: Value) -> Value {
        if self.percent {
            Value::String(formatting::percent(&value))
        } else {
            value
        }
    }

    fn resolve_mask(&self, value: Value) -> Value {
        if self.mask {
            Value::String(formatting::mask(
                &value,
                self.mask_len.unwrap_or(DEFAULT_MASK_LEN),
                self.mask_char.as_deref().unwrap_or(DEFAULT_MASK_CHAR),
            ))
        } else {
            value
        }
    }
}

fn accessor_option(key: &str, value: &serde_json::Value) -> Result<Option<Accessor>> {
    match value {
        serde_json::Value::Bool(true) => Ok(Some(Accessor::SameName)),
        serde_json::Value::Bool(false) | serde_json::Value::Null => Ok(None),
        serde_json::Value::String(name) if name.is_empty() => Ok(None),
        serde_json::Value::String(name) => Ok(Some(Accessor::Named(name.clone()))),
        _ => Err(invalid(key, "expected true or a method name")),
    }
}

fn string_option(key: &str, value: &serde_json::Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(key, "expected a string"))
}

fn flag_option(key: &str, value: &serde_json::Value) -> Result<bool> {
    match value {
        serde_json::Value::Bool(flag) => Ok(*flag),
        serde_json::Value::Null => Ok(false),
        _ => Err(invalid(key, "expected a boolean")),
    }
}

fn names_option(key: &str, value: &serde_json::Value) -> Result<Vec<String>> {
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::String(name) => Ok(vec![name.clone()]),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| string_option(key, item))
            .collect(),
        _ => Err(invalid(key, "expected a name or a list of names")),
    }
}

fn invalid(key: &str, reason: &str) -> Error {
    Error::InvalidOption {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_from_options_rejects_unknown_keys() {
        let err = Resolver::from_options(&options(json!({"for": "name", "colour": "red"})))
            .expect_err("unknown key must fail");

        assert!(matches!(err, Error::IllegalOption(ref key) if key == "colour"));
    }

    #[test]
    fn test_from_options_reads_every_stage() {
        let resolver = Resolver::from_options(&options(json!({
            "for": "name",
            "through": "manager",
            "transform": true,
            "null": "I am null.",
            "as": "EmployeePresenter",
            "mask": true,
            "mask_len": 2
        })))
        .expect("valid options");

        assert_eq!(resolver.attribute.as_deref(), Some("name"));
        assert_eq!(resolver.through, vec!["manager"]);
        assert_eq!(resolver.transform_accessor(), Some(&Accessor::SameName));
        assert_eq!(resolver.null_alias, Some(Value::from("I am null.")));
        assert_eq!(resolver.target(), Some("EmployeePresenter"));
        assert!(resolver.mask);
        assert_eq!(resolver.mask_len, Some(2));
    }

    #[test]
    fn test_from_options_rejects_ill_typed_values() {
        let err = Resolver::from_options(&options(json!({"manual": "yes"})))
            .expect_err("manual must be a boolean");

        assert!(matches!(err, Error::InvalidOption { ref key, .. } if key == "manual"));
    }

    #[test]
    fn test_null_alias_configured_with_null_value() {
        let resolver =
            Resolver::from_options(&options(json!({"present": null}))).expect("valid options");

        assert_eq!(resolver.resolve_alias(Value::from("matt")), Value::Null);
        assert_eq!(resolver.resolve_alias(Value::from("")), Value::from(""));
    }

    #[test]
    fn test_alias_precedence_true_before_present() {
        let resolver = Resolver::new()
            .true_alias("I am true alias.")
            .present_alias("I am present.");

        assert_eq!(
            resolver.resolve_alias(Value::Bool(true)),
            Value::from("I am true alias.")
        );
        assert_eq!(
            resolver.resolve_alias(Value::from("x")),
            Value::from("I am present.")
        );
    }

    #[test]
    fn test_unconfigured_true_alias_falls_through_to_present() {
        let resolver = Resolver::new().present_alias("I am present.");

        assert_eq!(
            resolver.resolve_alias(Value::Bool(true)),
            Value::from("I am present.")
        );
    }

    #[test]
    fn test_false_is_blank_but_false_alias_wins() {
        let resolver = Resolver::new()
            .false_alias("I am false alias.")
            .blank_alias("I am blank.");

        assert_eq!(
            resolver.resolve_alias(Value::Bool(false)),
            Value::from("I am false alias.")
        );
        assert_eq!(resolver.resolve_alias(Value::Null), Value::from("I am blank."));
    }

    #[test]
    fn test_formatting_applies_after_alias() {
        let resolver = Resolver::new().null_alias(0.5).percent();
        let value = resolver.resolve_alias(Value::Null);

        assert_eq!(resolver.resolve_percent(value), Value::from("0.50 %"));
    }

    #[test]
    fn test_mask_defaults() {
        let resolver = Resolver::new().mask();

        assert_eq!(
            resolver.resolve_mask(Value::from("1234567890")),
            Value::from("XXXXXX7890")
        );
    }
}
