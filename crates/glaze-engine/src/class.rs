use glaze_types::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::Result;
use crate::presenter::{Hydration, Presenter};
use crate::resolver::Resolver;
use crate::specification::Specification;

/// Computes a field value from the presenter itself.
pub type MethodFn = Arc<dyn Fn(&Presenter) -> Result<Value> + Send + Sync>;

/// Post-processes a raw field value.
pub type TransformFn = Arc<dyn Fn(&Presenter, Value) -> Result<Value> + Send + Sync>;

/// A presenter class declaration: its own specification, the methods and
/// transforms its resolvers may call, and an optional parent class name.
#[derive(Clone)]
pub struct PresenterClass {
    name: Arc<str>,
    parent: Option<String>,
    specification: Specification,
    methods: HashMap<String, MethodFn>,
    transforms: HashMap<String, TransformFn>,
}

impl PresenterClass {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// The class's own declarations, without anything inherited.
    pub fn specification(&self) -> &Specification {
        &self.specification
    }

    pub fn method(&self, name: &str) -> Option<&MethodFn> {
        self.methods.get(name)
    }

    pub fn transform(&self, name: &str) -> Option<&TransformFn> {
        self.transforms.get(name)
    }
}

impl fmt::Debug for PresenterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.methods.keys().collect();
        methods.sort();
        let mut transforms: Vec<_> = self.transforms.keys().collect();
        transforms.sort();

        f.debug_struct("PresenterClass")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("specification", &self.specification)
            .field("methods", &methods)
            .field("transforms", &transforms)
            .finish()
    }
}

/// Declares a presenter class.
///
/// ```
/// use glaze_engine::{ClassBuilder, Resolver};
///
/// let class = ClassBuilder::new("EmployeeListPresenter")
///     .fields(["id", "name"], Resolver::new())?
///     .fields(["manager_name"], Resolver::new().attribute("name").through(["manager"]))?
///     .build();
///
/// assert_eq!(class.specification().field_names(), vec!["id", "name", "manager_name"]);
/// # Ok::<(), glaze_engine::Error>(())
/// ```
#[derive(Debug)]
pub struct ClassBuilder {
    class: PresenterClass,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            class: PresenterClass {
                name: Arc::from(name),
                parent: None,
                specification: Specification::new(),
                methods: HashMap::new(),
                transforms: HashMap::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        self.class.name()
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.class.parent = Some(parent.into());
        self
    }

    /// Declares fields sharing one resolver. Fails on an empty key list.
    pub fn fields<I, S>(mut self, keys: I, resolver: Resolver) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class.specification.set(keys, resolver)?;
        Ok(self)
    }

    pub fn hydrate<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Hydration<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.class.specification.hydrate(callback);
        self
    }

    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&Presenter) -> Result<Value> + Send + Sync + 'static,
    {
        self.class.methods.insert(name.into(), Arc::new(method));
        self
    }

    pub fn transform<F>(mut self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&Presenter, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.class.transforms.insert(name.into(), Arc::new(transform));
        self
    }

    pub fn build(self) -> PresenterClass {
        self.class
    }
}

impl From<ClassBuilder> for PresenterClass {
    fn from(builder: ClassBuilder) -> Self {
        builder.build()
    }
}
