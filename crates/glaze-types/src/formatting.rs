//! Presence predicates and text formatting used by the resolver's alias and
//! formatting stages.

use crate::value::Value;

/// Default number of trailing characters left visible by [`mask`].
pub const DEFAULT_MASK_LEN: usize = 4;

/// Default replacement used by [`mask`].
pub const DEFAULT_MASK_CHAR: &str = "X";

/// Null, `false`, whitespace-only strings and empty collections are blank.
/// Numbers, dates and `true` never are.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Int(_) | Value::Float(_) | Value::Date(_) => false,
        Value::String(s) => s.trim().is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Object(source) => source.is_empty(),
        Value::Relation(relation) => relation.to_ordered_sequence().is_empty(),
        Value::Presented(_) => false,
    }
}

pub fn is_present(value: &Value) -> bool {
    !is_blank(value)
}

/// Only shows the last `keep_last` characters of the value's string form,
/// replacing the rest with `mask_with`.
///
/// - `123-45-6789` becomes `XXXXXXX6789`
/// - `ABCDEFG` becomes `XXXDEFG`
///
/// Blank strings and strings no longer than `keep_last` come back unmasked.
pub fn mask(value: &Value, keep_last: usize, mask_with: &str) -> String {
    let text = value.to_string();
    let len = text.chars().count();
    if text.trim().is_empty() || len <= keep_last {
        return text;
    }

    let visible: String = text.chars().skip(len - keep_last).collect();
    format!("{}{}", mask_with.repeat(len - keep_last), visible)
}

/// Formats a number with two decimals followed by ` %`. Blank values
/// format as an empty string; non-numeric values keep their string form.
pub fn percent(value: &Value) -> String {
    if is_blank(value) {
        return String::new();
    }
    match value.as_f64() {
        Some(number) => format!("{:.2} %", number),
        None => value.to_string(),
    }
}
