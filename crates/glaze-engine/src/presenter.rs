use glaze_types::{Fields, Options, Presented, Value};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Deref, Index};
use std::sync::Arc;
use tracing::trace;

use crate::registry::Registry;
use crate::specification::Specification;
use crate::visited::Visited;
use crate::{Error, Result};

/// A source object resolved through its class's effective specification.
///
/// Fully resolved once construction returns. Afterwards the data can only be
/// read; hydration callbacks are the sole writers, through [`Hydration`].
pub struct Presenter {
    registry: Arc<Registry>,
    class: Arc<str>,
    source: Value,
    options: Options,
    visited: Visited,
    data: Fields,
}

impl Presenter {
    /// Resolves every field of `class` against `source`, then runs the
    /// hydration callbacks.
    pub fn construct(
        registry: &Arc<Registry>,
        class: &str,
        source: Value,
        options: Options,
        visited: Visited,
    ) -> Result<Self> {
        let specification = registry.compose(class)?;
        let class = registry
            .class(class)
            .map(|class| Arc::clone(class.shared_name()))
            .ok_or_else(|| Error::UnknownClass(class.to_string()))?;

        let mut presenter = Presenter {
            registry: Arc::clone(registry),
            class,
            source,
            options,
            visited,
            data: Fields::with_capacity(specification.len()),
        };

        presenter.materialize_data(&specification)?;
        presenter.execute_hydrations(&specification)?;

        trace!(
            class = presenter.class_name(),
            depth = presenter.visited.len(),
            "presenter constructed"
        );
        Ok(presenter)
    }

    fn materialize_data(&mut self, specification: &Specification) -> Result<()> {
        for (key, resolver) in specification.fields() {
            let value = resolver.resolve(self, key)?;
            self.data.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn execute_hydrations(&mut self, specification: &Specification) -> Result<()> {
        for hydrate in specification.hydrations() {
            hydrate(&mut Hydration {
                presenter: &mut *self,
            })?;
        }
        Ok(())
    }

    pub fn class_name(&self) -> &str {
        &self.class
    }

    pub fn source(&self) -> &Value {
        &self.source
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Shorthand for digging into the options document.
    pub fn dig_opt(&self, path: &[&str]) -> Value {
        self.options.dig_value(path)
    }

    pub fn visited(&self) -> &Visited {
        &self.visited
    }

    pub fn data(&self) -> &Fields {
        &self.data
    }

    /// Reads a declared field. Undeclared names are an error.
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.data
            .get(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }

    /// JSON view of the presented data.
    pub fn as_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.data).unwrap_or_default()
    }

    pub fn into_presented(self) -> Presented {
        Presented::new(self.class, self.data)
    }

    pub fn into_value(self) -> Value {
        Value::from(self.into_presented())
    }

    pub(crate) fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub(crate) fn call_method(&self, name: &str) -> Result<Value> {
        let method = self
            .registry
            .method(&self.class, name)
            .ok_or_else(|| self.unknown_method(name))?;
        method(self)
    }

    pub(crate) fn call_transform(&self, name: &str, value: Value) -> Result<Value> {
        let transform = self
            .registry
            .transform(&self.class, name)
            .ok_or_else(|| self.unknown_method(name))?;
        transform(self, value)
    }

    fn unknown_method(&self, name: &str) -> Error {
        Error::UnknownMethod {
            class: self.class.to_string(),
            method: name.to_string(),
        }
    }
}

impl Index<&str> for Presenter {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.data.get(name) {
            Some(value) => value,
            None => panic!("unknown field '{}' on presenter '{}'", name, self.class),
        }
    }
}

impl Serialize for Presenter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("class", &self.class)
            .field("source", &self.source)
            .field("visited", &self.visited)
            .field("data", &self.data)
            .finish()
    }
}

/// Handle given to hydration callbacks: read access to the presenter plus
/// the ability to overwrite declared fields.
pub struct Hydration<'a> {
    presenter: &'a mut Presenter,
}

impl Hydration<'_> {
    /// Overwrites a declared field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match self.presenter.data.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(Error::UnknownField(name.to_string())),
        }
    }

    /// Message-style access: a declared field name reads the field, and
    /// `set_<field>` writes `argument` into it and returns it.
    pub fn send(&mut self, message: &str, argument: Option<Value>) -> Result<Value> {
        if let Some(value) = self.presenter.data.get(message) {
            return Ok(value.clone());
        }

        match message.strip_prefix("set_") {
            Some(field) if self.presenter.data.contains_key(field) => {
                let value = argument.unwrap_or_default();
                self.set(field, value.clone())?;
                Ok(value)
            }
            _ => Err(Error::UnknownField(message.to_string())),
        }
    }
}

impl Deref for Hydration<'_> {
    type Target = Presenter;

    fn deref(&self) -> &Presenter {
        &*self.presenter
    }
}

impl fmt::Debug for Hydration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hydration").field(&self.presenter).finish()
    }
}
