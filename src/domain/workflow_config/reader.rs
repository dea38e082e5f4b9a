//! Field access over raw documents with error collection
//!
//! Every accessor reports problems into the caller's error list instead of
//! returning early, so a single pass surfaces every bad field of an object.
//! `null` is treated the same as an absent key.

use serde_json::{Map, Value};

use super::error::FieldError;
use super::path::FieldPath;

/// Borrowed view of one mapping in a raw document
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: FieldPath,
}

impl<'a> Fields<'a> {
    /// Open `value` as a mapping, reporting a structural error otherwise
    pub fn open(value: &'a Value, path: FieldPath, errors: &mut Vec<FieldError>) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self { map, path }),
            other => {
                let reason = format!("expected a mapping, found {}", type_name(other));
                errors.push(FieldError::structural(&path, reason).with_value(other.clone()));
                None
            }
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn child(&self, key: &str) -> FieldPath {
        self.path.key(key)
    }

    /// Raw value of a populated key
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Whether the key is present at all, even with a `null` value
    pub fn has_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Populated keys, in key order
    pub fn populated_keys(&self) -> impl Iterator<Item = &'a str> {
        self.map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, _)| k.as_str())
    }

    pub fn required_str(&self, key: &str, errors: &mut Vec<FieldError>) -> Option<String> {
        match self.get(key) {
            Some(value) => self.as_str(key, value, errors),
            None => {
                errors.push(missing(&self.child(key)));
                None
            }
        }
    }

    pub fn optional_str(&self, key: &str, errors: &mut Vec<FieldError>) -> Option<String> {
        self.get(key).and_then(|value| self.as_str(key, value, errors))
    }

    pub fn optional_bool(&self, key: &str, errors: &mut Vec<FieldError>) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            other => {
                errors.push(wrong_type(&self.child(key), "a boolean", other));
                None
            }
        }
    }

    /// Integer value; fractional numbers are rejected
    pub fn optional_int(&self, key: &str, errors: &mut Vec<FieldError>) -> Option<i64> {
        let value = self.get(key)?;
        match value.as_i64() {
            Some(n) => Some(n),
            None => {
                let reason = if value.is_u64() {
                    "integer is out of range".to_string()
                } else {
                    format!("expected an integer, found {}", type_name(value))
                };
                errors.push(
                    FieldError::structural(&self.child(key), reason).with_value(value.clone()),
                );
                None
            }
        }
    }

    pub fn required_int(&self, key: &str, errors: &mut Vec<FieldError>) -> Option<i64> {
        if !self.contains(key) {
            errors.push(missing(&self.child(key)));
            return None;
        }
        self.optional_int(key, errors)
    }

    pub fn optional_number(&self, key: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
        let value = self.get(key)?;
        match value.as_f64() {
            Some(n) => Some(n),
            None => {
                errors.push(wrong_type(&self.child(key), "a number", value));
                None
            }
        }
    }

    pub fn required_str_list(
        &self,
        key: &str,
        errors: &mut Vec<FieldError>,
    ) -> Option<Vec<String>> {
        let path = self.child(key);
        let items = match self.get(key) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                errors.push(wrong_type(&path, "a list of strings", other));
                return None;
            }
            None => {
                errors.push(missing(&path));
                return None;
            }
        };

        let before = errors.len();
        let strings: Vec<String> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match item {
                Value::String(s) => Some(s.clone()),
                other => {
                    errors.push(wrong_type(&path.index(i), "a string", other));
                    None
                }
            })
            .collect();

        (errors.len() == before).then_some(strings)
    }

    /// Elements of a list field
    pub fn optional_list(&self, key: &str, errors: &mut Vec<FieldError>) -> Option<&'a [Value]> {
        match self.get(key)? {
            Value::Array(items) => Some(items.as_slice()),
            other => {
                errors.push(wrong_type(&self.child(key), "a list", other));
                None
            }
        }
    }

    pub fn optional_object(
        &self,
        key: &str,
        errors: &mut Vec<FieldError>,
    ) -> Option<Map<String, Value>> {
        match self.get(key)? {
            Value::Object(map) => Some(map.clone()),
            other => {
                errors.push(wrong_type(&self.child(key), "a mapping", other));
                None
            }
        }
    }

    /// String value restricted to a fixed set of spellings
    pub fn optional_choice<T: Copy>(
        &self,
        key: &str,
        choices: &[(&str, T)],
        errors: &mut Vec<FieldError>,
    ) -> Option<T> {
        let raw = self.optional_str(key, errors)?;
        match choices.iter().find(|(name, _)| *name == raw) {
            Some((_, choice)) => Some(*choice),
            None => {
                let allowed: Vec<&str> = choices.iter().map(|(name, _)| *name).collect();
                errors.push(FieldError::constraint(
                    &self.child(key),
                    Value::String(raw),
                    format!("must be one of: {}", allowed.join(", ")),
                ));
                None
            }
        }
    }

    fn as_str(&self, key: &str, value: &Value, errors: &mut Vec<FieldError>) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                errors.push(wrong_type(&self.child(key), "a string", other));
                None
            }
        }
    }
}

/// Run a parse step and keep its result only if it raised no new errors
pub(crate) fn checked<T>(
    errors: &mut Vec<FieldError>,
    parse: impl FnOnce(&mut Vec<FieldError>) -> Option<T>,
) -> Option<T> {
    let before = errors.len();
    let parsed = parse(errors);
    if errors.len() > before { None } else { parsed }
}

pub(crate) fn missing(path: &FieldPath) -> FieldError {
    let field = path.as_str().rsplit('.').next().unwrap_or_default();
    FieldError::structural(path, format!("{} is required", field))
}

fn wrong_type(path: &FieldPath, expected: &str, found: &Value) -> FieldError {
    FieldError::structural(path, format!("expected {}, found {}", expected, type_name(found)))
        .with_value(found.clone())
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
