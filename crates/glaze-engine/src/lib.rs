//! Presentation engine: resolves source objects into ordered field maps
//! through per-field resolvers, inheritance-aware specifications and
//! cycle-safe nested presenters.
//!
//! ```
//! use glaze_engine::{ClassBuilder, Registry, Resolver};
//! use glaze_types::{Options, Record};
//!
//! let registry = Registry::builder()
//!     .register(
//!         ClassBuilder::new("EmployeePresenter")
//!             .fields(["id", "name"], Resolver::new())?
//!             .fields(["account"], Resolver::new().mask())?,
//!     )?
//!     .build()?;
//!
//! let employee = Record::new()
//!     .with("id", 1)
//!     .with("name", "matt")
//!     .with("account", "98765443322111");
//! let presenter = registry.present("EmployeePresenter", employee, &Options::default())?;
//!
//! assert_eq!(
//!     presenter.as_json(),
//!     serde_json::json!({"id": 1, "name": "matt", "account": "XXXXXXXXXX2111"})
//! );
//! # Ok::<(), glaze_engine::Error>(())
//! ```

pub mod class;
pub mod config;
pub mod error;
pub mod presenter;
pub mod registry;
pub mod resolver;
pub mod specification;
pub mod visited;

pub use class::{ClassBuilder, MethodFn, PresenterClass, TransformFn};
pub use config::{Declarations, FieldDeclaration, PresenterDeclaration};
pub use error::{Error, Result};
pub use presenter::{Hydration, Presenter};
pub use registry::{Registry, RegistryBuilder};
pub use resolver::{Accessor, Resolver};
pub use specification::{HydrateFn, Specification};
pub use visited::Visited;

// Re-exported so callers only need one dependency.
pub use glaze_types::{Fields, Options, Presented, Record, Relation, Source, Value};
