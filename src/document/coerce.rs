//! Tolerant readers over host-supplied JSON.
//!
//! Every reader returns a value of the expected shape: missing fields take
//! their default, scalars are wrapped where a list is expected, and values of
//! the wrong type fall back instead of failing.

use super::section::DetailEntry;
use serde_json::{Map, Value};

/// Read a text field. Numbers and booleans are stringified, anything else is empty.
pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Read a text field, falling back to `default` when it is absent or blank.
pub fn text_or(value: Option<&Value>, default: &str) -> String {
    let s = text(value);
    if s.trim().is_empty() {
        default.to_string()
    } else {
        s
    }
}

/// Read an optional string such as a data-URI. Empty strings count as absent.
pub fn optional_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

pub fn flag(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        _ => default,
    }
}

pub fn object(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value.and_then(Value::as_object)
}

/// View a field as a list, wrapping a lone scalar or object.
pub fn list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Read a list of rich-text rows. Never returns an empty list.
pub fn text_rows(value: Option<&Value>) -> Vec<String> {
    let rows: Vec<String> = list(value)
        .into_iter()
        .map(|item| text(Some(item)))
        .collect();
    if rows.is_empty() {
        vec![String::new()]
    } else {
        rows
    }
}

/// Read dynamic-section details in either the record-list form or the legacy
/// single record/string form. Never returns an empty list.
pub fn detail_entries(value: Option<&Value>) -> Vec<DetailEntry> {
    let entries: Vec<DetailEntry> = list(value)
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => DetailEntry::new(text(record.get("value"))),
            scalar => DetailEntry::new(text(Some(scalar))),
        })
        .collect();
    if entries.is_empty() {
        vec![DetailEntry::default()]
    } else {
        entries
    }
}

/// Read an identifier that may have been stored as a string or a number.
pub fn identifier(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_rows_wraps_scalars() {
        assert_eq!(text_rows(None), vec![""]);
        assert_eq!(text_rows(Some(&json!("Flight"))), vec!["Flight"]);
        assert_eq!(text_rows(Some(&json!([]))), vec![""]);
        assert_eq!(text_rows(Some(&json!(["a", null, 3]))), vec!["a", "", "3"]);
    }

    #[test]
    fn test_detail_entries_migrates_legacy_shapes() {
        assert_eq!(
            detail_entries(Some(&json!({"value": "<p>x</p>"}))),
            vec![DetailEntry::new("<p>x</p>")]
        );
        assert_eq!(
            detail_entries(Some(&json!("plain"))),
            vec![DetailEntry::new("plain")]
        );
        assert_eq!(
            detail_entries(Some(&json!([{"value": "a"}, "b", {}]))),
            vec![
                DetailEntry::new("a"),
                DetailEntry::new("b"),
                DetailEntry::default()
            ]
        );
        assert_eq!(detail_entries(None), vec![DetailEntry::default()]);
    }

    #[test]
    fn test_flag_and_text_defaults() {
        assert!(flag(None, true));
        assert!(!flag(Some(&json!(false)), true));
        assert!(flag(Some(&json!("no")), true));
        assert_eq!(text_or(Some(&json!("  ")), "Drop"), "Drop");
        assert_eq!(optional_text(Some(&json!(""))), None);
    }
}
