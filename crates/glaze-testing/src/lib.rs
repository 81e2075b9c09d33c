//! Testing infrastructure for glaze integration tests.
//!
//! - `fixtures`: sample source objects, options and employee presenter classes
//! - `assertions`: custom assertions over presenter output

pub mod assertions;
pub mod fixtures;
