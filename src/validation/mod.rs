//! Request/response schemas checked at the API boundary.
//!
//! Each schema parses a raw JSON value into a typed struct and reports every
//! offending field at once, zod-style, instead of stopping at the first one.

pub mod selected_calendar;

use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

pub use selected_calendar::{parse_user_ids, SelectedCalendarBodyParams, SelectedCalendarPublic};

/// Which side of the boundary a schema guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaTarget {
    /// Client supplied data (request body, query string)
    Input,
    /// Data we are about to hand back to the client
    Output,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub target: SchemaTarget,
    pub message: String,
    pub field_errors: HashMap<String, String>,
}

impl ValidationError {
    pub fn input(field_errors: HashMap<String, String>) -> Self {
        Self {
            target: SchemaTarget::Input,
            message: "Invalid request body".to_string(),
            field_errors,
        }
    }

    pub fn output(field_errors: HashMap<String, String>) -> Self {
        Self {
            target: SchemaTarget::Output,
            message: "Invalid response payload".to_string(),
            field_errors,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Name of a JSON value's type as it appears in error messages
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accumulates field errors while a schema walks an object
#[derive(Debug, Default)]
pub(crate) struct FieldCollector {
    errors: HashMap<String, String>,
}

impl FieldCollector {
    pub fn object<'a>(&mut self, raw: &'a Value) -> Option<&'a Map<String, Value>> {
        match raw {
            Value::Object(map) => Some(map),
            other => {
                self.errors.insert(
                    "_root".to_string(),
                    format!("Expected object, received {}", type_name(other)),
                );
                None
            }
        }
    }

    pub fn required_string(&mut self, map: &Map<String, Value>, field: &str) -> Option<String> {
        match map.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.errors.insert(
                    field.to_string(),
                    format!("Expected string, received {}", type_name(other)),
                );
                None
            }
            None => {
                self.errors.insert(field.to_string(), "Required".to_string());
                None
            }
        }
    }

    pub fn required_int(&mut self, map: &Map<String, Value>, field: &str) -> Option<i32> {
        match map.get(field) {
            Some(value) => self.int(field, value),
            None => {
                self.errors.insert(field.to_string(), "Required".to_string());
                None
            }
        }
    }

    /// Absent is fine; present must be an integer (null included as a type error)
    pub fn optional_int(&mut self, map: &Map<String, Value>, field: &str) -> Option<i32> {
        map.get(field).and_then(|value| self.int(field, value))
    }

    /// Absent or null are both fine
    pub fn nullable_int(&mut self, map: &Map<String, Value>, field: &str) -> Option<i32> {
        match map.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.int(field, value),
        }
    }

    fn int(&mut self, field: &str, value: &Value) -> Option<i32> {
        let parsed = value.as_i64().and_then(|n| i32::try_from(n).ok());
        if parsed.is_none() {
            let message = match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => "Number out of range".to_string(),
                other => format!("Expected integer, received {}", type_name(other)),
            };
            self.errors.insert(field.to_string(), message);
        }
        parsed
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> HashMap<String, String> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_names_distinguish_integers_from_floats() {
        assert_eq!(type_name(&json!(3)), "integer");
        assert_eq!(type_name(&json!(3.5)), "float");
        assert_eq!(type_name(&json!(null)), "null");
    }

    #[test]
    fn collector_reports_every_bad_field() {
        let raw = json!({ "a": 1, "c": "x" });
        let mut fields = FieldCollector::default();
        let map = fields.object(&raw).unwrap();

        assert_eq!(fields.required_string(map, "a"), None);
        assert_eq!(fields.required_string(map, "b"), None);
        assert_eq!(fields.optional_int(map, "c"), None);
        assert_eq!(fields.optional_int(map, "d"), None);

        let errors = fields.into_errors();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["a"], "Expected string, received integer");
        assert_eq!(errors["b"], "Required");
        assert_eq!(errors["c"], "Expected integer, received string");
    }

    #[test]
    fn int_out_of_range_is_rejected() {
        let raw = json!({ "n": 9_999_999_999i64 });
        let mut fields = FieldCollector::default();
        let map = fields.object(&raw).unwrap();
        assert_eq!(fields.required_int(map, "n"), None);
        assert_eq!(fields.into_errors()["n"], "Number out of range");
    }
}
