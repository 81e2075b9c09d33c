//! Class registry and inheritance composer.
//!
//! Classes reference their parent and nested `as` targets by name, so the
//! registry is the single place names are resolved. Each class's effective
//! specification is composed on first use and memoized for the lifetime of
//! the registry.

use glaze_types::{Options, Value};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::class::{MethodFn, PresenterClass, TransformFn};
use crate::config::Declarations;
use crate::presenter::Presenter;
use crate::specification::Specification;
use crate::visited::Visited;
use crate::{Error, Result};

#[derive(Debug)]
struct Entry {
    class: PresenterClass,
    effective: OnceCell<Arc<Specification>>,
}

/// Collects class declarations before they are frozen into a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    classes: IndexMap<String, PresenterClass>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, class: impl Into<PresenterClass>) -> Result<Self> {
        let class = class.into();
        if self.classes.contains_key(class.name()) {
            return Err(Error::DuplicateClass(class.name().to_string()));
        }
        self.classes.insert(class.name().to_string(), class);
        Ok(self)
    }

    /// Registers every class of a declaration file.
    pub fn declare(self, declarations: Declarations) -> Result<Self> {
        declarations
            .into_builders()?
            .into_iter()
            .try_fold(self, |builder, class| builder.register(class))
    }

    /// Checks that every parent exists and that no class inherits from
    /// itself, then freezes the registry.
    pub fn build(self) -> Result<Arc<Registry>> {
        for class in self.classes.values() {
            let mut seen = HashSet::from([class.name()]);
            let mut current = class;

            while let Some(parent) = current.parent() {
                current = self
                    .classes
                    .get(parent)
                    .ok_or_else(|| Error::UnknownClass(parent.to_string()))?;
                if !seen.insert(current.name()) {
                    return Err(Error::InheritanceCycle(class.name().to_string()));
                }
            }
        }

        let classes = self
            .classes
            .into_iter()
            .map(|(name, class)| {
                let entry = Entry {
                    class,
                    effective: OnceCell::new(),
                };
                (name, entry)
            })
            .collect();

        Ok(Arc::new(Registry { classes }))
    }
}

/// Frozen set of presenter classes.
#[derive(Debug)]
pub struct Registry {
    classes: IndexMap<String, Entry>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn class(&self, name: &str) -> Option<&PresenterClass> {
        self.classes.get(name).map(|entry| &entry.class)
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    /// The class followed by its ancestors, most derived first.
    fn lineage(&self, name: &str) -> Vec<&PresenterClass> {
        let mut lineage = Vec::new();
        let mut next = self.class(name);
        while let Some(class) = next {
            lineage.push(class);
            next = class.parent().and_then(|parent| self.class(parent));
        }
        lineage
    }

    /// Ancestor chain from the root class down to `name` itself.
    pub fn ancestors(&self, name: &str) -> Vec<&PresenterClass> {
        let mut lineage = self.lineage(name);
        lineage.reverse();
        lineage
    }

    /// Finds a method on the class or its nearest ancestor defining it.
    pub fn method(&self, class: &str, name: &str) -> Option<&MethodFn> {
        self.lineage(class)
            .into_iter()
            .find_map(|class| class.method(name))
    }

    pub fn transform(&self, class: &str, name: &str) -> Option<&TransformFn> {
        self.lineage(class)
            .into_iter()
            .find_map(|class| class.transform(name))
    }

    /// Effective specification of `name`: every ancestor's own specification
    /// merged root first. Computed once per class.
    pub fn compose(&self, name: &str) -> Result<Arc<Specification>> {
        let entry = self
            .classes
            .get(name)
            .ok_or_else(|| Error::UnknownClass(name.to_string()))?;

        entry
            .effective
            .get_or_try_init(|| self.compose_uncached(name).map(Arc::new))
            .cloned()
    }

    fn compose_uncached(&self, name: &str) -> Result<Specification> {
        let mut composed = Specification::new();
        for ancestor in self.ancestors(name) {
            composed.merge(ancestor.specification());
        }

        self.validate_accessors(name, &composed)?;

        debug!(
            class = name,
            fields = composed.len(),
            hydrations = composed.hydrations().len(),
            "composed effective specification"
        );
        Ok(composed)
    }

    fn validate_accessors(&self, class: &str, specification: &Specification) -> Result<()> {
        for (key, resolver) in specification.fields() {
            if resolver.is_manual() {
                continue;
            }
            if let Some(method) = resolver.method_accessor() {
                let method = method.name(key);
                if self.method(class, method).is_none() {
                    return Err(Error::UnknownMethod {
                        class: class.to_string(),
                        method: method.to_string(),
                    });
                }
            }
            if let Some(transform) = resolver.transform_accessor() {
                let transform = transform.name(key);
                if self.transform(class, transform).is_none() {
                    return Err(Error::UnknownMethod {
                        class: class.to_string(),
                        method: transform.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Presents a single source object with the named class.
    pub fn present(
        self: &Arc<Self>,
        class: &str,
        source: impl Into<Value>,
        options: &Options,
    ) -> Result<Presenter> {
        Presenter::construct(self, class, source.into(), options.clone(), Visited::new())
    }

    /// Presents each source in order, sharing `options`.
    pub fn map<I, V>(
        self: &Arc<Self>,
        class: &str,
        sources: I,
        options: &Options,
    ) -> Result<Vec<Presenter>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        sources
            .into_iter()
            .map(|source| self.present(class, source, options))
            .collect()
    }
}
