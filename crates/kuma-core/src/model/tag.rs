//! Tags, proxies and docker hosts

use super::wire;
use serde::{Deserialize, Serialize};

/// A tag that can be attached to monitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: color.into(),
        }
    }
}

/// An outbound proxy used by HTTP monitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proxy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub protocol: String,
    pub host: String,
    pub port: u16,
    #[serde(default, deserialize_with = "wire::flexible_bool")]
    pub auth: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_true", deserialize_with = "wire::flexible_bool")]
    pub active: bool,
    #[serde(rename = "default", default, deserialize_with = "wire::flexible_bool")]
    pub is_default: bool,
    /// Attach to all existing monitors when saved; write-only
    #[serde(default, skip_deserializing)]
    pub apply_existing: bool,
}

impl Proxy {
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            id: None,
            protocol: protocol.into(),
            host: host.into(),
            port,
            auth: false,
            username: None,
            password: None,
            active: true,
            is_default: false,
            apply_existing: false,
        }
    }
}

/// A docker daemon used by docker container monitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerHost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    /// `socket` or `tcp`
    pub docker_type: String,
    /// Socket path or `tcp://host:port`
    pub docker_daemon: String,
}

fn default_true() -> bool {
    true
}
