//! Field extraction helpers for loosely-typed declarations.
//!
//! Declarations may be empty (`foo:` decodes to `null`) or missing entirely, so
//! every helper accepts an optional value and falls back to "absent" instead of
//! failing. An explicit `null` is treated the same as a missing key.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::config::Config;
use crate::diagnostics::ErrorSink;
use crate::error::{EntityKind, Result, ValidationError};

/// Look up `key` in `data` if `data` is a mapping.
pub fn get<'a>(data: Option<&'a JsonValue>, key: &str) -> Option<&'a JsonValue> {
    data?.as_object()?.get(key).filter(|v| !v.is_null())
}

/// Fetch a textual field. Numbers and booleans are rendered to text.
pub fn get_str(data: Option<&JsonValue>, key: &str) -> Option<String> {
    get(data, key).and_then(scalar_to_string)
}

/// Fetch a mapping field.
pub fn get_map<'a>(data: Option<&'a JsonValue>, key: &str) -> Option<&'a JsonMap<String, JsonValue>> {
    get(data, key).and_then(JsonValue::as_object)
}

/// Render a scalar as text; mappings and sequences yield `None`.
pub fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "sequence",
        JsonValue::Object(_) => "mapping",
    }
}

/// Typed field reads that report a diagnostic when the value has the wrong
/// type. A rejected value is dropped, so the attribute stays unset.
pub(crate) struct Typed<'a, 'v> {
    pub entity: EntityKind,
    pub name: &'a str,
    pub data: Option<&'v JsonValue>,
    pub config: &'a Config,
    pub errors: &'a mut ErrorSink,
}

impl<'a, 'v> Typed<'a, 'v> {
    fn reject<T>(&mut self, field: &str, expected: &str, value: &JsonValue) -> Result<Option<T>> {
        self.errors.report(
            self.config,
            ValidationError::constraint(
                self.entity,
                self.name,
                &[field],
                format!("{} must be {}, got {}", field, expected, json_type(value)),
            ),
        )?;
        Ok(None)
    }

    /// Text field; numbers and booleans are rendered to text.
    pub fn string(&mut self, field: &str) -> Result<Option<String>> {
        match get(self.data, field) {
            None => Ok(None),
            Some(v) => match scalar_to_string(v) {
                Some(s) => Ok(Some(s)),
                None => self.reject(field, "text", v),
            },
        }
    }

    pub fn boolean(&mut self, field: &str) -> Result<Option<bool>> {
        match get(self.data, field) {
            None => Ok(None),
            Some(JsonValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => self.reject(field, "a boolean", other),
        }
    }

    pub fn unsigned(&mut self, field: &str) -> Result<Option<u64>> {
        match get(self.data, field) {
            None => Ok(None),
            Some(v) => match v.as_u64() {
                Some(n) => Ok(Some(n)),
                None => self.reject(field, "a non-negative integer", v),
            },
        }
    }

    /// Numeric field, kept exactly as written (integers stay integers).
    pub fn number(&mut self, field: &str) -> Result<Option<Number>> {
        match get(self.data, field) {
            None => Ok(None),
            Some(JsonValue::Number(n)) => Ok(Some(n.clone())),
            Some(other) => self.reject(field, "a number", other),
        }
    }

    pub fn sequence(&mut self, field: &str) -> Result<Option<Vec<JsonValue>>> {
        match get(self.data, field) {
            None => Ok(None),
            Some(JsonValue::Array(items)) => Ok(Some(items.clone())),
            Some(other) => self.reject(field, "a sequence", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_get_tolerates_missing_and_non_mapping() {
        assert!(get(None, "type").is_none());
        assert!(get(Some(&json!(null)), "type").is_none());
        assert!(get(Some(&json!("string")), "type").is_none());
        assert!(get(Some(&json!({"type": null})), "type").is_none());
        assert_eq!(get(Some(&json!({"type": "integer"})), "type"), Some(&json!("integer")));
    }

    #[test]
    fn test_get_str_renders_scalars() {
        let data = json!({"a": "x", "b": 3, "c": true, "d": [1]});
        assert_eq!(get_str(Some(&data), "a").as_deref(), Some("x"));
        assert_eq!(get_str(Some(&data), "b").as_deref(), Some("3"));
        assert_eq!(get_str(Some(&data), "c").as_deref(), Some("true"));
        assert_eq!(get_str(Some(&data), "d"), None);
    }

    #[test]
    fn test_typed_string_reports_non_scalars() {
        let data = json!({"description": ["not", "text"], "title": "ok", "version": 2});
        let config = Config::default();
        let mut errors = ErrorSink::new();
        let mut fields = Typed {
            entity: EntityKind::Documentation,
            name: "doc",
            data: Some(&data),
            config: &config,
            errors: &mut errors,
        };
        assert_eq!(fields.string("title").unwrap().as_deref(), Some("ok"));
        assert_eq!(fields.string("version").unwrap().as_deref(), Some("2"));
        assert_eq!(fields.string("missing").unwrap(), None);
        assert_eq!(fields.string("description").unwrap(), None);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].kind, ErrorKind::Constraint);
        assert_eq!(errors.errors()[0].fields, vec!["description".to_string()]);
    }

    #[test]
    fn test_typed_number_keeps_integers() {
        let data = json!({"minimum": 9007199254740993u64, "maximum": 2.5, "bad": "1"});
        let config = Config::default();
        let mut errors = ErrorSink::new();
        let mut fields = Typed {
            entity: EntityKind::QueryParameter,
            name: "q",
            data: Some(&data),
            config: &config,
            errors: &mut errors,
        };
        assert_eq!(
            fields.number("minimum").unwrap(),
            Some(Number::from(9007199254740993u64))
        );
        assert_eq!(fields.number("maximum").unwrap().and_then(|n| n.as_f64()), Some(2.5));
        assert_eq!(fields.number("bad").unwrap(), None);
        assert_eq!(errors.len(), 1);
    }
}
