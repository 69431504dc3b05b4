//! Notification resources
//!
//! Typed resources exist for the common providers. Any other provider Kuma
//! supports can be managed through `uptimekuma_notification`, which takes
//! the provider settings as a JSON document.

pub mod kinds;

use crate::fields::{Field, add_fields, from_wire, to_wire};
use async_trait::async_trait;
use kinds::{NOTIFICATION_KINDS, NotificationKind};
use kuma_core::model::Notification;
use kuma_core::model::notification::RESERVED_KEYS;
use kuma_core::{Attribute, AttributeType, Error, KumaApi, Resource, Result, Schema, State};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Attributes shared by every notification resource
fn common_schema(description: &str) -> Schema {
    Schema::new(description)
        .attribute(
            "id",
            Attribute::computed(AttributeType::Number).describe("Notification ID"),
        )
        .attribute("name", Attribute::required(AttributeType::String))
        .attribute(
            "is_default",
            Attribute::optional(AttributeType::Bool)
                .with_default(false)
                .describe("Enable for newly created monitors"),
        )
        .attribute(
            "apply_existing",
            Attribute::optional(AttributeType::Bool)
                .with_default(false)
                .describe("Attach to all existing monitors when saved"),
        )
        .attribute("active", Attribute::computed(AttributeType::Bool))
}

fn common_state(notification: &Notification, prior: &State) -> Result<State> {
    let id = notification
        .id
        .ok_or_else(|| Error::protocol("notification without an id"))?;

    let mut state = State::new();
    state.set("id", id);
    state.set("name", notification.name.as_str());
    state.set("is_default", notification.is_default);
    // Saving with apply_existing is an action, not a stored property
    state.set(
        "apply_existing",
        prior.bool("apply_existing")?.unwrap_or(notification.apply_existing),
    );
    state.set("active", notification.active);
    Ok(state)
}

fn base_notification(state: &State, notification_type: &str, id: Option<i64>) -> Result<Notification> {
    let mut notification = Notification::new(state.require_string("name")?, notification_type);
    notification.id = id;
    notification.is_default = state.bool_or("is_default", false)?;
    notification.apply_existing = state.bool_or("apply_existing", false)?;
    Ok(notification)
}

async fn read_notification(api: &dyn KumaApi, id: i64) -> Result<Option<Notification>> {
    match api.get_notification(id).await {
        Ok(n) => Ok(Some(n)),
        Err(e) if e.is_not_found() => {
            debug!("Notification {} is gone", id);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// A notification provider with typed attributes
pub struct NotificationResource {
    kind: &'static NotificationKind,
    type_name: String,
}

impl NotificationResource {
    pub fn new(kind: &'static NotificationKind) -> Self {
        Self {
            kind,
            type_name: kind.type_name(),
        }
    }

    pub fn all() -> Vec<Self> {
        NOTIFICATION_KINDS.iter().map(Self::new).collect()
    }

    fn tables(&self) -> [&'static [Field]; 1] {
        [self.kind.fields]
    }

    fn to_notification(&self, state: &State, id: Option<i64>) -> Result<Notification> {
        let mut notification = base_notification(state, self.kind.wire_type, id)?;
        to_wire(&self.tables(), state, &mut notification.settings)?;
        Ok(notification)
    }

    fn to_state(&self, notification: &Notification, prior: &State) -> Result<State> {
        if notification.notification_type != self.kind.wire_type {
            return Err(Error::invalid_input(format!(
                "notification {} uses provider {:?}, not {:?}",
                notification.id.unwrap_or_default(),
                notification.notification_type,
                self.kind.wire_type
            )));
        }
        let mut state = common_state(notification, prior)?;
        from_wire(&self.tables(), &notification.settings, prior, &mut state);
        Ok(state)
    }
}

#[async_trait]
impl Resource for NotificationResource {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn schema(&self) -> Schema {
        add_fields(common_schema(self.kind.description), &self.tables())
    }

    async fn create(&self, api: &dyn KumaApi, planned: State) -> Result<State> {
        let notification = self.to_notification(&planned, None)?;
        let id = api.create_notification(&notification).await?;
        info!("Created {} {} ({})", self.type_name, id, notification.name);
        self.to_state(&api.get_notification(id).await?, &planned)
    }

    async fn read(&self, api: &dyn KumaApi, current: State) -> Result<Option<State>> {
        match read_notification(api, current.id()?).await? {
            Some(n) => self.to_state(&n, &current).map(Some),
            None => Ok(None),
        }
    }

    async fn update(&self, api: &dyn KumaApi, prior: State, planned: State) -> Result<State> {
        let id = prior.id()?;
        api.update_notification(&self.to_notification(&planned, Some(id))?)
            .await?;
        info!("Updated {} {}", self.type_name, id);
        self.to_state(&api.get_notification(id).await?, &planned)
    }

    async fn delete(&self, api: &dyn KumaApi, current: State) -> Result<()> {
        let id = current.id()?;
        api.delete_notification(id).await?;
        info!("Deleted {} {}", self.type_name, id);
        Ok(())
    }
}

/// Any notification provider, configured with raw JSON settings
pub struct GenericNotificationResource;

impl GenericNotificationResource {
    fn parse_config(state: &State) -> Result<Map<String, Value>> {
        let Some(raw) = state.string("config_json")? else {
            return Ok(Map::new());
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(Error::invalid_input("config_json must be a JSON object")),
            Err(e) => Err(Error::invalid_input(format!("config_json is not valid JSON: {e}"))),
        }
    }

    fn to_notification(state: &State, id: Option<i64>) -> Result<Notification> {
        let mut notification = base_notification(state, &state.require_string("type")?, id)?;
        notification.settings = Self::parse_config(state)?;
        Ok(notification)
    }

    /// Keep the configured JSON text when it means the same as the server's
    fn config_json(settings: &Map<String, Value>, prior: &State) -> Result<Option<String>> {
        let actual = without_nulls(settings);
        if let Ok(configured) = Self::parse_config(prior)
            && prior.is_set("config_json")
            && without_nulls(&configured) == actual
        {
            return Ok(prior.string("config_json")?);
        }
        if actual.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string(&actual)?))
    }

    fn to_state(notification: &Notification, prior: &State) -> Result<State> {
        let mut state = common_state(notification, prior)?;
        state.set("type", notification.notification_type.as_str());
        state.set_opt("config_json", Self::config_json(&notification.settings, prior)?);
        Ok(state)
    }
}

fn without_nulls(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[async_trait]
impl Resource for GenericNotificationResource {
    fn type_name(&self) -> &str {
        "uptimekuma_notification"
    }

    fn schema(&self) -> Schema {
        common_schema("Notification for any provider Kuma supports")
            .attribute(
                "type",
                Attribute::required(AttributeType::String).describe("Kuma provider name, e.g. \"slack\""),
            )
            .attribute(
                "config_json",
                Attribute::optional(AttributeType::String)
                    .sensitive()
                    .describe("Provider settings as a JSON object"),
            )
    }

    fn validate(&self, config: &State) -> Result<()> {
        self.schema().validate(config)?;
        let settings = Self::parse_config(config)?;
        if let Some(key) = settings.keys().find(|k| RESERVED_KEYS.contains(&k.as_str())) {
            return Err(Error::invalid_input(format!(
                "config_json must not contain {key:?}; use the resource attribute instead"
            )));
        }
        Ok(())
    }

    async fn create(&self, api: &dyn KumaApi, planned: State) -> Result<State> {
        let notification = Self::to_notification(&planned, None)?;
        let id = api.create_notification(&notification).await?;
        info!("Created notification {} ({})", id, notification.name);
        Self::to_state(&api.get_notification(id).await?, &planned)
    }

    async fn read(&self, api: &dyn KumaApi, current: State) -> Result<Option<State>> {
        match read_notification(api, current.id()?).await? {
            Some(n) => Self::to_state(&n, &current).map(Some),
            None => Ok(None),
        }
    }

    async fn update(&self, api: &dyn KumaApi, prior: State, planned: State) -> Result<State> {
        let id = prior.id()?;
        api.update_notification(&Self::to_notification(&planned, Some(id))?)
            .await?;
        info!("Updated notification {}", id);
        Self::to_state(&api.get_notification(id).await?, &planned)
    }

    async fn delete(&self, api: &dyn KumaApi, current: State) -> Result<()> {
        let id = current.id()?;
        api.delete_notification(id).await?;
        info!("Deleted notification {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(value: Value) -> State {
        serde_json::from_value(value).unwrap()
    }

    fn stored(settings: Value) -> Notification {
        let mut n = Notification::new("ops", "gamedig");
        n.id = Some(9);
        n.settings = settings.as_object().unwrap().clone();
        n
    }

    #[test]
    fn equivalent_config_json_is_kept_verbatim() {
        let prior = state(json!({ "config_json": "{ \"b\": 2,  \"a\": \"x\" }" }));
        let s = GenericNotificationResource::to_state(&stored(json!({ "a": "x", "b": 2 })), &prior).unwrap();
        assert_eq!(s.string("config_json").unwrap().as_deref(), Some("{ \"b\": 2,  \"a\": \"x\" }"));
    }

    #[test]
    fn drifted_config_json_is_rewritten() {
        let prior = state(json!({ "config_json": "{\"a\":\"x\"}" }));
        let s = GenericNotificationResource::to_state(&stored(json!({ "a": "y" })), &prior).unwrap();
        assert_eq!(s.string("config_json").unwrap().as_deref(), Some("{\"a\":\"y\"}"));
    }

    #[test]
    fn config_json_must_be_an_object_without_reserved_keys() {
        let r = GenericNotificationResource;
        let base = json!({ "name": "n", "type": "webhook" });

        let mut bad = base.clone();
        bad["config_json"] = json!("[1]");
        assert!(r.validate(&state(bad)).is_err());

        let mut reserved = base.clone();
        reserved["config_json"] = json!("{\"type\":\"slack\"}");
        assert!(r.validate(&state(reserved)).is_err());

        let mut ok = base;
        ok["config_json"] = json!("{\"webhookURL\":\"https://a\"}");
        assert!(r.validate(&state(ok)).is_ok());
    }

    #[test]
    fn typed_resource_rejects_other_provider() {
        let slack = NotificationResource::new(&NOTIFICATION_KINDS[0]);
        let err = slack.to_state(&stored(json!({})), &State::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn typed_payload_uses_wire_keys() {
        let slack = NotificationResource::new(&NOTIFICATION_KINDS[0]);
        let n = slack
            .to_notification(&state(json!({ "name": "ops", "webhook_url": "https://hooks" })), None)
            .unwrap();
        assert_eq!(n.notification_type, "slack");
        assert_eq!(n.settings["slackwebhookURL"], json!("https://hooks"));
        assert_eq!(n.settings["slackchannelnotify"], json!(false));
    }
}
