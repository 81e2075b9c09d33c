//! Custom assertions for presenter output.
//!
//! Provides high-level checks that keep integration tests readable:
//! - Field order validation
//! - Absent ("no value") fields
//! - Nested presenter access

use anyhow::{Context, Result};
use glaze_engine::{Presented, Presenter, Value};

/// Assert that the presenter's fields appear in exactly this order.
pub fn assert_field_order(presenter: &Presenter, expected: &[&str]) -> Result<()> {
    let actual: Vec<&str> = presenter.data().keys().map(String::as_str).collect();

    if actual != expected {
        anyhow::bail!("Expected fields {:?}, got {:?}", expected, actual);
    }

    Ok(())
}

/// Assert that a declared field resolved to no value.
pub fn assert_absent(presenter: &Presenter, field: &str) -> Result<()> {
    let value = presenter
        .data()
        .get(field)
        .with_context(|| format!("Field '{}' is not declared", field))?;

    if !value.is_null() {
        anyhow::bail!("Expected '{}' to be absent, got {:?}", field, value);
    }

    Ok(())
}

/// Borrow the nested presenter data stored under `field`.
pub fn nested<'a>(presenter: &'a Presenter, field: &str) -> Result<&'a Presented> {
    presenter
        .data()
        .get(field)
        .and_then(Value::as_presented)
        .with_context(|| format!("Expected '{}' to hold a nested presenter", field))
}

/// Borrow every nested presenter of a collection field, in order.
pub fn nested_list<'a>(presenter: &'a Presenter, field: &str) -> Result<Vec<&'a Presented>> {
    let items = presenter
        .data()
        .get(field)
        .and_then(Value::as_list)
        .with_context(|| format!("Expected '{}' to hold a list", field))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_presented()
                .with_context(|| format!("Element {} of '{}' is not a nested presenter", i, field))
        })
        .collect()
}
