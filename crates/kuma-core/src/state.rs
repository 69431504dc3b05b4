//! Terraform attribute values
//!
//! A [`State`] is the object a resource receives as plan, prior state or
//! configuration, keyed by attribute name. Unset attributes are either
//! absent or `null`; accessors treat both the same way.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute values of one resource or data source instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Map<String, Value>);

impl State {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Borrow the underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying JSON object
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Raw value of an attribute, `None` when absent or null
    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.0.get(attr).filter(|v| !v.is_null())
    }

    /// Whether the attribute holds a non-null value
    pub fn is_set(&self, attr: &str) -> bool {
        self.get(attr).is_some()
    }

    /// Set an attribute
    pub fn set(&mut self, attr: &str, value: impl Into<Value>) {
        self.0.insert(attr.to_string(), value.into());
    }

    /// Set an attribute, storing `null` for `None`
    pub fn set_opt<T: Into<Value>>(&mut self, attr: &str, value: Option<T>) {
        self.0
            .insert(attr.to_string(), value.map(Into::into).unwrap_or(Value::Null));
    }

    /// Remove an attribute
    pub fn remove(&mut self, attr: &str) -> Option<Value> {
        self.0.remove(attr)
    }

    /// String attribute
    pub fn string(&self, attr: &str) -> Result<Option<String>> {
        match self.get(attr) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(type_error(attr, "string", other)),
        }
    }

    /// Required string attribute
    pub fn require_string(&self, attr: &str) -> Result<String> {
        self.string(attr)?.ok_or_else(|| missing(attr))
    }

    /// Integer attribute
    ///
    /// Whole floating point numbers are accepted since Terraform numbers
    /// have no integer/float distinction.
    pub fn int(&self, attr: &str) -> Result<Option<i64>> {
        match self.get(attr) {
            None => Ok(None),
            Some(v) => as_int(v).map(Some).ok_or_else(|| type_error(attr, "number", v)),
        }
    }

    /// Required integer attribute
    pub fn require_int(&self, attr: &str) -> Result<i64> {
        self.int(attr)?.ok_or_else(|| missing(attr))
    }

    /// Boolean attribute
    pub fn bool(&self, attr: &str) -> Result<Option<bool>> {
        match self.get(attr) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(type_error(attr, "bool", other)),
        }
    }

    /// Boolean attribute with a fallback for unset values
    pub fn bool_or(&self, attr: &str, fallback: bool) -> Result<bool> {
        Ok(self.bool(attr)?.unwrap_or(fallback))
    }

    /// List of strings, empty when unset
    pub fn string_list(&self, attr: &str) -> Result<Vec<String>> {
        self.list(attr)?
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(type_error(attr, "list of strings", other)),
            })
            .collect()
    }

    /// List of integers, empty when unset
    pub fn int_list(&self, attr: &str) -> Result<Vec<i64>> {
        self.list(attr)?
            .iter()
            .map(|v| as_int(v).ok_or_else(|| type_error(attr, "list of numbers", v)))
            .collect()
    }

    /// List of nested objects, empty when unset
    pub fn object_list(&self, attr: &str) -> Result<Vec<State>> {
        self.list(attr)?
            .iter()
            .map(|v| match v {
                Value::Object(map) => Ok(State(map.clone())),
                other => Err(type_error(attr, "list of objects", other)),
            })
            .collect()
    }

    /// Numeric `id` attribute
    pub fn id(&self) -> Result<i64> {
        self.require_int("id")
    }

    fn list(&self, attr: &str) -> Result<&[Value]> {
        match self.get(attr) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(type_error(attr, "list", other)),
        }
    }
}

impl From<Map<String, Value>> for State {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<State> for Value {
    fn from(state: State) -> Self {
        Value::Object(state.0)
    }
}

/// Interpret a JSON value as an integer
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        _ => None,
    }
}

fn type_error(attr: &str, expected: &str, got: &Value) -> Error {
    Error::invalid_input(format!("attribute \"{attr}\" must be a {expected}, got {got}"))
}

fn missing(attr: &str) -> Error {
    Error::invalid_input(format!("attribute \"{attr}\" is required"))
}
