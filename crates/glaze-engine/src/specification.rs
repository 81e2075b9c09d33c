use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::presenter::Hydration;
use crate::resolver::Resolver;
use crate::{Error, Result};

/// Post-resolution callback allowed to overwrite declared fields.
pub type HydrateFn = Arc<dyn Fn(&mut Hydration<'_>) -> Result<()> + Send + Sync>;

/// A class's declared fields and hydration callbacks.
///
/// Fields keep declaration order. Re-declaring a field replaces its resolver
/// but keeps the position of the first declaration.
#[derive(Clone, Default)]
pub struct Specification {
    fields: IndexMap<String, Arc<Resolver>>,
    hydrations: Vec<HydrateFn>,
}

impl Specification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares every key in `keys` with a shared resolver.
    pub fn set<I, S>(&mut self, keys: I, resolver: Resolver) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(Error::EmptyKeys);
        }

        let resolver = Arc::new(resolver);
        for key in keys {
            self.fields.insert(key, Arc::clone(&resolver));
        }
        Ok(())
    }

    pub fn hydrate<F>(&mut self, callback: F)
    where
        F: Fn(&mut Hydration<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.hydrations.push(Arc::new(callback));
    }

    /// Folds `other` on top of `self`: its resolvers win for shared names,
    /// new names are appended and its callbacks run after ours.
    pub fn merge(&mut self, other: &Specification) {
        for (key, resolver) in &other.fields {
            self.fields.insert(key.clone(), Arc::clone(resolver));
        }
        self.hydrations.extend(other.hydrations.iter().cloned());
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Resolver)> {
        self.fields
            .iter()
            .map(|(key, resolver)| (key.as_str(), resolver.as_ref()))
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn resolver(&self, key: &str) -> Option<&Resolver> {
        self.fields.get(key).map(Arc::as_ref)
    }

    pub fn contains_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn hydrations(&self) -> &[HydrateFn] {
        &self.hydrations
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("fields", &self.fields)
            .field("hydrations", &self.hydrations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_empty_keys() {
        let mut spec = Specification::new();
        let err = spec
            .set(Vec::<String>::new(), Resolver::new())
            .expect_err("empty keys must fail");

        assert!(matches!(err, Error::EmptyKeys));
    }

    #[test]
    fn test_redeclaring_keeps_position() {
        let mut spec = Specification::new();
        spec.set(["id", "name", "job"], Resolver::new()).unwrap();
        spec.set(["name"], Resolver::new().manual()).unwrap();

        assert_eq!(spec.field_names(), vec!["id", "name", "job"]);
        assert!(spec.resolver("name").unwrap().is_manual());
    }

    #[test]
    fn test_merge_appends_new_fields_and_callbacks() {
        let mut base = Specification::new();
        base.set(["id", "name"], Resolver::new()).unwrap();
        base.hydrate(|_| Ok(()));

        let mut derived = Specification::new();
        derived.set(["job", "id"], Resolver::new().manual()).unwrap();
        derived.hydrate(|_| Ok(()));

        base.merge(&derived);

        assert_eq!(base.field_names(), vec!["id", "name", "job"]);
        assert!(base.resolver("id").unwrap().is_manual());
        assert_eq!(base.hydrations().len(), 2);
    }
}
