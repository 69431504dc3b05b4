//! Resource and data source schemas

use crate::error::{Error, Result};
use crate::state::{State, as_int};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Number,
    Bool,
    List(Box<AttributeType>),
    Object(BTreeMap<String, AttributeType>),
}

impl AttributeType {
    /// List of `element`
    pub fn list(element: AttributeType) -> Self {
        Self::List(Box::new(element))
    }

    /// Object with the given attribute types
    pub fn object<const N: usize>(fields: [(&str, AttributeType); N]) -> Self {
        Self::Object(
            fields
                .into_iter()
                .map(|(name, kind)| (name.to_string(), kind))
                .collect(),
        )
    }

    /// Whether `value` conforms to this type (`null` always conforms)
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Number, Value::Number(_)) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::List(element), Value::Array(items)) => items.iter().all(|i| element.accepts(i)),
            (Self::Object(fields), Value::Object(map)) => map
                .iter()
                .all(|(k, v)| fields.get(k).is_some_and(|kind| kind.accepts(v))),
            _ => false,
        }
    }
}

/// Who supplies an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Must be set in configuration
    Required,
    /// May be set in configuration
    Optional,
    /// Set by the provider only
    Computed,
    /// Set in configuration or filled by the provider
    OptionalComputed,
}

/// One attribute of a schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub presence: Presence,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    /// Changing this attribute replaces the resource
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: String,
}

impl Attribute {
    fn with_presence(kind: AttributeType, presence: Presence) -> Self {
        Self {
            kind,
            presence,
            sensitive: false,
            force_new: false,
            default: None,
            description: String::new(),
        }
    }

    pub fn required(kind: AttributeType) -> Self {
        Self::with_presence(kind, Presence::Required)
    }

    pub fn optional(kind: AttributeType) -> Self {
        Self::with_presence(kind, Presence::Optional)
    }

    pub fn computed(kind: AttributeType) -> Self {
        Self::with_presence(kind, Presence::Computed)
    }

    pub fn optional_computed(kind: AttributeType) -> Self {
        Self::with_presence(kind, Presence::OptionalComputed)
    }

    /// Fill the attribute with `value` when unset
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.presence = Presence::OptionalComputed;
        self.default = Some(value.into());
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the provider may fill this attribute
    pub fn is_computed(&self) -> bool {
        matches!(self.presence, Presence::Computed | Presence::OptionalComputed)
    }
}

/// Schema of a resource, data source or the provider block
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub version: u32,
    pub description: String,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            version: 0,
            description: description.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute
    pub fn attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    /// Look up an attribute definition
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Validate user configuration against the schema
    pub fn validate(&self, config: &State) -> Result<()> {
        for (name, value) in config.as_map() {
            let attribute = self
                .attributes
                .get(name)
                .ok_or_else(|| Error::invalid_input(format!("unsupported attribute \"{name}\"")))?;

            if value.is_null() {
                continue;
            }
            if attribute.presence == Presence::Computed {
                return Err(Error::invalid_input(format!(
                    "attribute \"{name}\" is read-only and cannot be configured"
                )));
            }
            if !attribute.kind.accepts(value) {
                return Err(Error::invalid_input(format!(
                    "attribute \"{name}\" has the wrong type: {value}"
                )));
            }
            if attribute.kind == AttributeType::Number && as_int(value).is_none() {
                return Err(Error::invalid_input(format!(
                    "attribute \"{name}\" must be a whole number"
                )));
            }
        }

        for (name, attribute) in &self.attributes {
            if attribute.presence == Presence::Required && !config.is_set(name) {
                return Err(Error::invalid_input(format!(
                    "missing required attribute \"{name}\""
                )));
            }
        }

        Ok(())
    }

    /// Fill unset attributes that declare a default
    pub fn apply_defaults(&self, state: &mut State) {
        for (name, attribute) in &self.attributes {
            if let Some(default) = &attribute.default
                && !state.is_set(name)
            {
                state.set(name, default.clone());
            }
        }
    }

    /// Names of attributes whose change replaces the resource
    pub fn force_new_attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|(_, a)| a.force_new)
            .map(|(n, _)| n.as_str())
    }

    /// Names of computed attributes without a static default
    pub fn provider_filled_attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|(_, a)| a.is_computed() && a.default.is_none())
            .map(|(n, _)| n.as_str())
    }
}
