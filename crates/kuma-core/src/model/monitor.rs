//! Monitors

use super::wire;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Monitor type as named on the wire
///
/// Types this provider does not manage are preserved verbatim so that
/// data sources can still see them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MonitorType {
    Http,
    Keyword,
    JsonQuery,
    Group,
    Ping,
    Port,
    Dns,
    Push,
    Docker,
    Postgres,
    MySql,
    SqlServer,
    MongoDb,
    Redis,
    RealBrowser,
    GrpcKeyword,
    Mqtt,
    Other(String),
}

impl MonitorType {
    /// Wire name of the type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Http => "http",
            Self::Keyword => "keyword",
            Self::JsonQuery => "json-query",
            Self::Group => "group",
            Self::Ping => "ping",
            Self::Port => "port",
            Self::Dns => "dns",
            Self::Push => "push",
            Self::Docker => "docker",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::SqlServer => "sqlserver",
            Self::MongoDb => "mongodb",
            Self::Redis => "redis",
            Self::RealBrowser => "real-browser",
            Self::GrpcKeyword => "grpc-keyword",
            Self::Mqtt => "mqtt",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for MonitorType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "http" => Self::Http,
            "keyword" => Self::Keyword,
            "json-query" => Self::JsonQuery,
            "group" => Self::Group,
            "ping" => Self::Ping,
            "port" => Self::Port,
            "dns" => Self::Dns,
            "push" => Self::Push,
            "docker" => Self::Docker,
            "postgres" => Self::Postgres,
            "mysql" => Self::MySql,
            "sqlserver" => Self::SqlServer,
            "mongodb" => Self::MongoDb,
            "redis" => Self::Redis,
            "real-browser" => Self::RealBrowser,
            "grpc-keyword" => Self::GrpcKeyword,
            "mqtt" => Self::Mqtt,
            _ => Self::Other(name),
        }
    }
}

impl From<MonitorType> for String {
    fn from(kind: MonitorType) -> Self {
        match kind {
            MonitorType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tag attached to a monitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorTag {
    pub tag_id: i64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,

    /// Tag name, filled by the server on reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tag color, filled by the server on reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl MonitorTag {
    pub fn new(tag_id: i64, value: impl Into<String>) -> Self {
        Self {
            tag_id,
            value: value.into(),
            name: None,
            color: None,
        }
    }

    /// Identity of the attachment, ignoring server-filled fields
    pub fn key(&self) -> (i64, &str) {
        (self.tag_id, self.value.as_str())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A monitor
///
/// Common attributes are typed; everything type-specific (URL, hostname,
/// intervals, database connection strings, ...) lives in `settings` under
/// its wire key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub name: String,

    #[serde(rename = "type")]
    pub monitor_type: MonitorType,

    #[serde(default)]
    pub description: Option<String>,

    /// Parent group monitor
    #[serde(default)]
    pub parent: Option<i64>,

    #[serde(default = "default_active", deserialize_with = "wire::flexible_bool")]
    pub active: bool,

    #[serde(rename = "notificationIDList", default, with = "wire::id_set")]
    pub notification_ids: Vec<i64>,

    /// Tags are attached through separate calls, never in the monitor payload
    #[serde(default, skip_serializing)]
    pub tags: Vec<MonitorTag>,

    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

fn default_active() -> bool {
    true
}

impl Monitor {
    /// Create a monitor with empty settings
    pub fn new(name: impl Into<String>, monitor_type: MonitorType) -> Self {
        Self {
            id: None,
            name: name.into(),
            monitor_type,
            description: None,
            parent: None,
            active: true,
            notification_ids: Vec::new(),
            tags: Vec::new(),
            settings: Map::new(),
        }
    }

    /// Set a type-specific wire setting
    pub fn with_setting(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.settings.insert(key.to_string(), value.into());
        self
    }

    /// Type-specific wire setting
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key).filter(|v| !v.is_null())
    }
}
