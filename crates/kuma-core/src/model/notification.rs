//! Notifications
//!
//! Kuma lists notifications as database records whose provider settings
//! are a JSON document stored as a string in `config`. Writes send the
//! settings inline next to `name`, `type`, `isDefault` and `applyExisting`.

use super::wire;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Keys owned by the notification itself rather than its provider settings
pub const RESERVED_KEYS: &[&str] = &[
    "id",
    "name",
    "type",
    "isDefault",
    "applyExisting",
    "active",
    "userId",
    "user_id",
];

/// A notification channel
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Option<i64>,
    pub name: String,
    /// Provider type as named on the wire (`slack`, `smtp`, `PagerDuty`, ...)
    pub notification_type: String,
    pub is_default: bool,
    /// Attach to all existing monitors when saved
    pub apply_existing: bool,
    pub active: bool,
    /// Provider-specific settings keyed by wire name
    pub settings: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationRecord {
    id: i64,
    name: String,
    #[serde(default = "default_true", deserialize_with = "wire::flexible_bool")]
    active: bool,
    #[serde(default, deserialize_with = "wire::flexible_bool")]
    is_default: bool,
    #[serde(default)]
    config: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Notification {
    pub fn new(name: impl Into<String>, notification_type: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            notification_type: notification_type.into(),
            is_default: false,
            apply_existing: false,
            active: true,
            settings: Map::new(),
        }
    }

    pub fn with_setting(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.settings.insert(key.to_string(), value.into());
        self
    }

    /// Parse an entry of the pushed `notificationList`
    pub fn from_record(record: &Value) -> Result<Self> {
        let record: NotificationRecord = serde_json::from_value(record.clone())?;

        let config = match record.config.as_deref() {
            None | Some("") => Map::new(),
            Some(raw) => match serde_json::from_str::<Value>(raw)? {
                Value::Object(map) => map,
                other => {
                    return Err(Error::protocol(format!(
                        "notification {} config is not an object: {other}",
                        record.id
                    )));
                }
            },
        };

        let notification_type = config
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let apply_existing = config
            .get("applyExisting")
            .and_then(wire::value_to_bool)
            .unwrap_or(false);

        let settings = config
            .into_iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
            .collect();

        Ok(Self {
            id: Some(record.id),
            name: record.name,
            notification_type,
            is_default: record.is_default,
            apply_existing,
            active: record.active,
            settings,
        })
    }

    /// Payload for `addNotification`
    pub fn to_payload(&self) -> Value {
        let mut payload = self.settings.clone();
        payload.insert("name".into(), Value::String(self.name.clone()));
        payload.insert("type".into(), Value::String(self.notification_type.clone()));
        payload.insert("isDefault".into(), Value::Bool(self.is_default));
        payload.insert("applyExisting".into(), Value::Bool(self.apply_existing));
        Value::Object(payload)
    }
}
