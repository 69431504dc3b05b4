//! Declarative attribute tables
//!
//! Monitor and notification kinds differ mostly in a flat list of settings.
//! Each setting is described once by a [`Field`]: its attribute name, the
//! key Kuma uses on the wire, its type and an optional default. The tables
//! drive schema generation and both directions of the state/wire mapping.

use kuma_core::model::wire::value_to_bool;
use kuma_core::state::as_int;
use kuma_core::{Attribute, AttributeType, Result, Schema, State};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int,
    Bool,
    StringList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Str(&'static str),
    Int(i64),
    Bool(bool),
    StringList(&'static [&'static str]),
}

impl FieldDefault {
    fn to_value(self) -> Value {
        match self {
            Self::Str(s) => Value::from(s),
            Self::Int(i) => Value::from(i),
            Self::Bool(b) => Value::from(b),
            Self::StringList(items) => Value::from(items.to_vec()),
        }
    }
}

/// One attribute backed by a single wire key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub attr: &'static str,
    pub wire: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub sensitive: bool,
    pub default: Option<FieldDefault>,
    pub description: &'static str,
}

impl Field {
    const fn new(attr: &'static str, wire: &'static str, kind: FieldKind) -> Self {
        Self {
            attr,
            wire,
            kind,
            required: false,
            sensitive: false,
            default: None,
            description: "",
        }
    }

    pub const fn string(attr: &'static str, wire: &'static str) -> Self {
        Self::new(attr, wire, FieldKind::String)
    }

    pub const fn int(attr: &'static str, wire: &'static str) -> Self {
        Self::new(attr, wire, FieldKind::Int)
    }

    pub const fn bool(attr: &'static str, wire: &'static str) -> Self {
        Self::new(attr, wire, FieldKind::Bool)
    }

    pub const fn string_list(attr: &'static str, wire: &'static str) -> Self {
        Self::new(attr, wire, FieldKind::StringList)
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    pub const fn sensitive(self) -> Self {
        Self { sensitive: true, ..self }
    }

    pub const fn default_str(self, value: &'static str) -> Self {
        Self {
            default: Some(FieldDefault::Str(value)),
            ..self
        }
    }

    pub const fn default_int(self, value: i64) -> Self {
        Self {
            default: Some(FieldDefault::Int(value)),
            ..self
        }
    }

    pub const fn default_bool(self, value: bool) -> Self {
        Self {
            default: Some(FieldDefault::Bool(value)),
            ..self
        }
    }

    pub const fn default_list(self, value: &'static [&'static str]) -> Self {
        Self {
            default: Some(FieldDefault::StringList(value)),
            ..self
        }
    }

    pub const fn describe(self, description: &'static str) -> Self {
        Self { description, ..self }
    }

    pub fn attribute_type(&self) -> AttributeType {
        match self.kind {
            FieldKind::String => AttributeType::String,
            FieldKind::Int => AttributeType::Number,
            FieldKind::Bool => AttributeType::Bool,
            FieldKind::StringList => AttributeType::list(AttributeType::String),
        }
    }

    pub fn attribute(&self) -> Attribute {
        let kind = self.attribute_type();
        let mut attribute = match (self.required, self.default) {
            (true, _) => Attribute::required(kind),
            (false, Some(default)) => Attribute::optional(kind).with_default(default.to_value()),
            (false, None) => Attribute::optional(kind),
        };
        if self.sensitive {
            attribute = attribute.sensitive();
        }
        attribute.describe(self.description)
    }

    /// Convert a wire value into this field's attribute value
    ///
    /// Kuma stores booleans as 0/1 and numbers occasionally as strings, so
    /// conversion is lenient. Values that cannot be converted read as null.
    fn from_wire(&self, value: &Value) -> Value {
        match (self.kind, value) {
            (_, Value::Null) => Value::Null,
            (FieldKind::String, Value::String(_)) => value.clone(),
            (FieldKind::String, Value::Number(n)) => Value::String(n.to_string()),
            (FieldKind::Int, Value::String(s)) => s.trim().parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            (FieldKind::Int, v) => as_int(v).map(Value::from).unwrap_or(Value::Null),
            (FieldKind::Bool, v) => value_to_bool(v).map(Value::from).unwrap_or(Value::Null),
            (FieldKind::StringList, Value::Array(items)) => Value::Array(
                items
                    .iter()
                    .filter_map(|i| match i {
                        Value::String(s) => Some(Value::String(s.clone())),
                        Value::Number(n) => Some(Value::String(n.to_string())),
                        _ => None,
                    })
                    .collect(),
            ),
            (FieldKind::StringList, Value::String(raw)) => serde_json::from_str::<Value>(raw)
                .ok()
                .filter(Value::is_array)
                .map(|parsed| self.from_wire(&parsed))
                .unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

/// Add every field of `tables` to `schema`
pub fn add_fields(mut schema: Schema, tables: &[&[Field]]) -> Schema {
    for field in tables.iter().flat_map(|t| t.iter()) {
        schema = schema.attribute(field.attr, field.attribute());
    }
    schema
}

/// Write set attributes to their wire keys
///
/// Unset attributes fall back to the field default, or are sent as null so
/// that clearing an attribute clears it on the server.
pub fn to_wire(tables: &[&[Field]], state: &State, out: &mut Map<String, Value>) -> Result<()> {
    for field in tables.iter().flat_map(|t| t.iter()) {
        let value = match field.kind {
            FieldKind::String => state.string(field.attr)?.map(Value::from),
            FieldKind::Int => state.int(field.attr)?.map(Value::from),
            FieldKind::Bool => state.bool(field.attr)?.map(Value::from),
            FieldKind::StringList => state
                .is_set(field.attr)
                .then(|| state.string_list(field.attr))
                .transpose()?
                .map(Value::from),
        };
        let value = value
            .or_else(|| field.default.map(FieldDefault::to_value))
            .unwrap_or(Value::Null);
        out.insert(field.wire.to_string(), value);
    }
    Ok(())
}

/// Read wire keys back into attributes
///
/// `prior` is the state the read refreshes. An empty string from the server
/// reads as null when the attribute was unset before, and sensitive fields
/// the server omits keep their prior value.
pub fn from_wire(tables: &[&[Field]], wire: &Map<String, Value>, prior: &State, state: &mut State) {
    for field in tables.iter().flat_map(|t| t.iter()) {
        let value = match wire.get(field.wire) {
            None if field.sensitive => prior.get(field.attr).cloned().unwrap_or(Value::Null),
            None => Value::Null,
            Some(raw) => field.from_wire(raw),
        };
        let value = match value {
            Value::String(s) if s.is_empty() && !prior.is_set(field.attr) => Value::Null,
            other => other,
        };
        state.set(field.attr, value);
    }
}

/// Keep `prior`'s ordering when `actual` holds the same elements
///
/// Kuma returns ID lists in its own order; Terraform compares lists
/// positionally. Duplicates count, so `[1, 1]` and `[1, 2]` differ.
pub fn preserve_order<T: Ord + Clone>(prior: &[T], actual: Vec<T>) -> Vec<T> {
    let mut expected = prior.to_vec();
    let mut received = actual.clone();
    expected.sort();
    received.sort();
    if expected == received { prior.to_vec() } else { actual }
}

/// Store a list, keeping an unset attribute unset when the list is empty
pub fn set_list<T: Into<Value>>(state: &mut State, prior: &State, attr: &str, items: Vec<T>) {
    if items.is_empty() && !prior.is_set(attr) {
        state.set(attr, Value::Null);
    } else {
        state.set(attr, items.into_iter().map(Into::into).collect::<Vec<Value>>());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TABLE: &[Field] = &[
        Field::string("url", "url").required(),
        Field::int("timeout", "timeout").default_int(48),
        Field::bool("ignore_tls", "ignoreTls").default_bool(false),
        Field::string("password", "basic_auth_pass").sensitive(),
        Field::string_list("accepted_status_codes", "accepted_statuscodes").default_list(&["200-299"]),
        Field::string("method", "method"),
    ];

    fn state(value: Value) -> State {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn schema_reflects_table() {
        let schema = add_fields(Schema::new("t"), &[TABLE]);
        assert_eq!(schema.get("url").unwrap().presence, kuma_core::Presence::Required);
        assert_eq!(schema.get("timeout").unwrap().default, Some(json!(48)));
        assert!(schema.get("password").unwrap().sensitive);
        assert_eq!(
            schema.get("accepted_status_codes").unwrap().default,
            Some(json!(["200-299"]))
        );
    }

    #[test]
    fn writes_wire_keys_with_defaults() {
        let mut out = Map::new();
        to_wire(&[TABLE], &state(json!({ "url": "https://a", "ignore_tls": true })), &mut out).unwrap();

        assert_eq!(out["url"], json!("https://a"));
        assert_eq!(out["timeout"], json!(48));
        assert_eq!(out["ignoreTls"], json!(true));
        assert_eq!(out["accepted_statuscodes"], json!(["200-299"]));
        assert_eq!(out["method"], Value::Null);
    }

    #[test]
    fn reads_lenient_wire_values() {
        let wire = json!({
            "url": "https://a",
            "timeout": "30",
            "ignoreTls": 1,
            "accepted_statuscodes": "[\"200-299\",\"301\"]",
            "method": ""
        });
        let prior = state(json!({ "password": "hunter2" }));
        let mut out = State::new();
        from_wire(&[TABLE], wire.as_object().unwrap(), &prior, &mut out);

        assert_eq!(out.int("timeout").unwrap(), Some(30));
        assert_eq!(out.bool("ignore_tls").unwrap(), Some(true));
        assert_eq!(out.string_list("accepted_status_codes").unwrap(), vec!["200-299", "301"]);
        assert_eq!(out.string("password").unwrap().as_deref(), Some("hunter2"));
        assert!(!out.is_set("method"));
    }

    #[test]
    fn empty_string_kept_when_configured() {
        let wire = json!({ "method": "" });
        let prior = state(json!({ "method": "" }));
        let mut out = State::new();
        from_wire(&[TABLE], wire.as_object().unwrap(), &prior, &mut out);
        assert_eq!(out.get("method"), Some(&json!("")));
    }

    #[test]
    fn order_preserved_for_same_elements() {
        assert_eq!(preserve_order(&[3, 1], vec![1, 3]), vec![3, 1]);
        assert_eq!(preserve_order(&[3, 1], vec![1, 4]), vec![1, 4]);
    }

    #[test]
    fn order_preserved_only_for_equal_multisets() {
        assert_eq!(preserve_order(&[1, 1], vec![1, 2]), vec![1, 2]);
        assert_eq!(preserve_order(&[2, 1, 1], vec![1, 2, 1]), vec![2, 1, 1]);
        assert_eq!(preserve_order(&[2, 1, 2], vec![1, 2, 1]), vec![1, 2, 1]);
    }
}
