//! Presenter declarations loaded from TOML.
//!
//! ```toml
//! [presenters.EmployeeListPresenter]
//!
//! [[presenters.EmployeeListPresenter.fields]]
//! keys = ["id", "name"]
//!
//! [[presenters.EmployeeListPresenter.fields]]
//! keys = ["manager_name"]
//! for = "name"
//! through = ["manager"]
//!
//! [presenters.EmployeePresenter]
//! extends = "EmployeeListPresenter"
//! ```
//!
//! Every key of a field entry other than `keys` is a resolver option.
//! Methods, transforms and hydration callbacks cannot be written in TOML;
//! attach them to the builders returned by [`Declarations::into_builders`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;
use crate::class::ClassBuilder;
use crate::resolver::Resolver;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declarations {
    #[serde(default)]
    pub presenters: IndexMap<String, PresenterDeclaration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresenterDeclaration {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub keys: Vec<String>,
    #[serde(flatten)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl Declarations {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads declarations from a file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// One builder per declared presenter, in file order.
    pub fn into_builders(self) -> Result<Vec<ClassBuilder>> {
        self.presenters
            .into_iter()
            .map(|(name, declaration)| declaration.into_builder(name))
            .collect()
    }
}

impl PresenterDeclaration {
    pub fn into_builder(self, name: impl Into<String>) -> Result<ClassBuilder> {
        let mut builder = ClassBuilder::new(name);
        if let Some(parent) = self.extends {
            builder = builder.extends(parent);
        }

        for field in self.fields {
            let resolver = Resolver::from_options(&field.options)?;
            builder = builder.fields(field.keys, resolver)?;
        }

        Ok(builder)
    }
}
