//! Serde helpers for Uptime Kuma's loosely typed JSON
//!
//! Kuma stores booleans in SQLite and, depending on the code path, sends
//! them back as `true`/`false` or `1`/`0`. ID sets are sent as
//! `{"<id>": true}` maps, ID references inside lists as `[{"id": n}]`.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::Deserialize;
use serde_json::Value;

/// Deserialize a boolean that may arrive as a number or string
pub fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_bool(&value).ok_or_else(|| de::Error::custom(format!("expected boolean, got {value}")))
}

/// Interpret a loose JSON boolean, `null` reads as `false`
pub fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Null => Some(false),
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Entries of a pushed list: Kuma sends either an array or an id-keyed object
pub fn entries(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map.values().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Integer list that skips entries which are not whole numbers
///
/// Day-of-month lists may carry symbolic entries such as `lastDay1`.
pub fn lenient_ints<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .iter()
        .filter_map(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
        .collect())
}

/// `Vec<i64>` <-> `{"<id>": true}`
pub mod id_set {
    use super::*;

    pub fn serialize<S>(ids: &[i64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(ids.len()))?;
        for id in ids {
            map.serialize_entry(&id.to_string(), &true)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let mut ids = match value {
            Value::Null => Vec::new(),
            Value::Object(map) => map
                .into_iter()
                .filter(|(_, enabled)| value_to_bool(enabled).unwrap_or(false))
                .map(|(id, _)| {
                    id.parse::<i64>()
                        .map_err(|_| de::Error::custom(format!("invalid id key {id:?}")))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Value::Array(items) => items
                .iter()
                .map(|v| {
                    v.as_i64()
                        .ok_or_else(|| de::Error::custom(format!("invalid id {v}")))
                })
                .collect::<Result<Vec<_>, _>>()?,
            other => return Err(de::Error::custom(format!("expected id set, got {other}"))),
        };
        ids.sort_unstable();
        Ok(ids)
    }
}

/// `Vec<i64>` <-> `[{"id": n}, ...]`
pub mod id_objects {
    use super::*;

    pub fn serialize<S>(ids: &[i64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(ids.len()))?;
        for id in ids {
            seq.serialize_element(&serde_json::json!({ "id": id }))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
        items
            .iter()
            .map(|item| {
                item.get("id")
                    .and_then(Value::as_i64)
                    .ok_or_else(|| de::Error::custom(format!("expected object with id, got {item}")))
            })
            .collect()
    }
}
