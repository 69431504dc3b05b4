//! Monitor resources
//!
//! Every monitor kind is one resource type sharing a common attribute set.
//! Kind-specific attributes come from the field tables in [`kinds`].

pub mod kinds;

use crate::fields::{add_fields, from_wire, preserve_order, set_list, to_wire};
use async_trait::async_trait;
use kinds::{MONITOR_KINDS, MonitorKind};
use kuma_core::model::{Monitor, MonitorTag, MonitorType};
use kuma_core::{Attribute, AttributeType, Error, KumaApi, Resource, Result, Schema, State};
use serde_json::{Value, json};
use tracing::{debug, info};
use uuid::Uuid;

/// Minimum check interval Kuma accepts, in seconds
const MIN_INTERVAL: i64 = 20;

pub struct MonitorResource {
    kind: &'static MonitorKind,
    type_name: String,
}

impl MonitorResource {
    pub fn new(kind: &'static MonitorKind) -> Self {
        Self {
            kind,
            type_name: kind.type_name(),
        }
    }

    /// One resource per monitor kind
    pub fn all() -> Vec<Self> {
        MONITOR_KINDS.iter().map(Self::new).collect()
    }

    fn to_monitor(&self, state: &State, id: Option<i64>) -> Result<Monitor> {
        let mut monitor = Monitor::new(
            state.require_string("name")?,
            MonitorType::from(self.kind.wire_type.to_string()),
        );
        monitor.id = id;
        monitor.description = state.string("description")?;
        monitor.parent = state.int("parent")?;
        monitor.active = state.bool_or("active", true)?;
        monitor.notification_ids = state.int_list("notification_ids")?;
        monitor.tags = state
            .object_list("tags")?
            .iter()
            .map(|tag| {
                Ok(MonitorTag::new(
                    tag.require_int("tag_id")?,
                    tag.string("value")?.unwrap_or_default(),
                ))
            })
            .collect::<Result<_>>()?;

        to_wire(self.kind.fields, state, &mut monitor.settings)?;

        if self.kind.is_push() {
            let token = match state.string("push_token")? {
                Some(token) => token,
                None => Uuid::new_v4().simple().to_string(),
            };
            monitor.settings.insert("pushToken".into(), Value::String(token));
        }
        Ok(monitor)
    }

    fn to_state(&self, monitor: &Monitor, prior: &State) -> Result<State> {
        let id = monitor
            .id
            .ok_or_else(|| Error::protocol("monitor without an id"))?;
        if monitor.monitor_type.as_str() != self.kind.wire_type {
            return Err(Error::invalid_input(format!(
                "monitor {id} is a {} monitor, not {}",
                monitor.monitor_type, self.kind.wire_type
            )));
        }

        let mut state = State::new();
        state.set("id", id);
        state.set("name", monitor.name.as_str());
        state.set_opt(
            "description",
            monitor
                .description
                .clone()
                .filter(|d| !d.is_empty() || prior.is_set("description")),
        );
        state.set_opt("parent", monitor.parent);
        state.set("active", monitor.active);

        let mut notification_ids = monitor.notification_ids.clone();
        notification_ids.sort_unstable();
        let notification_ids = preserve_order(&prior.int_list("notification_ids")?, notification_ids);
        set_list(&mut state, prior, "notification_ids", notification_ids);

        let prior_tags = prior
            .object_list("tags")?
            .iter()
            .map(|t| Ok((t.require_int("tag_id")?, t.string("value")?.unwrap_or_default())))
            .collect::<Result<Vec<_>>>()?;
        let tags: Vec<(i64, String)> = monitor
            .tags
            .iter()
            .map(|t| (t.tag_id, t.value.clone()))
            .collect();
        let tags: Vec<Value> = preserve_order(&prior_tags, tags)
            .into_iter()
            .map(|(tag_id, value)| json!({ "tag_id": tag_id, "value": value }))
            .collect();
        set_list(&mut state, prior, "tags", tags);

        from_wire(self.kind.fields, &monitor.settings, prior, &mut state);

        if self.kind.is_push() {
            state.set_opt(
                "push_token",
                monitor.setting("pushToken").and_then(Value::as_str).map(str::to_string),
            );
        }
        Ok(state)
    }
}

#[async_trait]
impl Resource for MonitorResource {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn schema(&self) -> Schema {
        let mut schema = Schema::new(self.kind.description)
            .attribute("id", Attribute::computed(AttributeType::Number).describe("Monitor ID"))
            .attribute("name", Attribute::required(AttributeType::String))
            .attribute("description", Attribute::optional(AttributeType::String))
            .attribute(
                "parent",
                Attribute::optional(AttributeType::Number).describe("ID of the parent group monitor"),
            )
            .attribute(
                "active",
                Attribute::optional(AttributeType::Bool)
                    .with_default(true)
                    .describe("Whether the monitor is running"),
            )
            .attribute(
                "notification_ids",
                Attribute::optional(AttributeType::list(AttributeType::Number)),
            )
            .attribute(
                "tags",
                Attribute::optional(AttributeType::list(AttributeType::object([
                    ("tag_id", AttributeType::Number),
                    ("value", AttributeType::String),
                ]))),
            );

        if self.kind.is_push() {
            schema = schema.attribute(
                "push_token",
                Attribute::optional_computed(AttributeType::String)
                    .sensitive()
                    .describe("Token for the push URL, generated when unset"),
            );
        }
        add_fields(schema, self.kind.fields)
    }

    fn validate(&self, config: &State) -> Result<()> {
        self.schema().validate(config)?;

        if let Some(interval) = config.int("interval")?
            && interval < MIN_INTERVAL
        {
            return Err(Error::invalid_input(format!(
                "interval must be at least {MIN_INTERVAL} seconds"
            )));
        }
        if self.kind.field("port").is_some()
            && let Some(port) = config.int("port")?
            && !(1..=65535).contains(&port)
        {
            return Err(Error::invalid_input("port must be between 1 and 65535"));
        }
        if self.kind.field("url").is_some()
            && let Some(url) = config.string("url")?
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(Error::invalid_input(format!(
                "url must start with http:// or https://, got {url:?}"
            )));
        }
        for tag in config.object_list("tags")? {
            if !tag.is_set("tag_id") {
                return Err(Error::invalid_input("every tag needs a tag_id"));
            }
        }
        Ok(())
    }

    async fn create(&self, api: &dyn KumaApi, planned: State) -> Result<State> {
        let monitor = self.to_monitor(&planned, None)?;
        let id = api.create_monitor(&monitor).await?;
        info!("Created {} {} ({})", self.type_name, id, monitor.name);

        let created = api.get_monitor(id).await?;
        self.to_state(&created, &planned)
    }

    async fn read(&self, api: &dyn KumaApi, current: State) -> Result<Option<State>> {
        let id = current.id()?;
        match api.get_monitor(id).await {
            Ok(monitor) => self.to_state(&monitor, &current).map(Some),
            Err(e) if e.is_not_found() => {
                debug!("Monitor {} is gone", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, api: &dyn KumaApi, prior: State, planned: State) -> Result<State> {
        let id = prior.id()?;
        let monitor = self.to_monitor(&planned, Some(id))?;
        api.update_monitor(&monitor).await?;
        info!("Updated {} {}", self.type_name, id);

        let updated = api.get_monitor(id).await?;
        self.to_state(&updated, &planned)
    }

    async fn delete(&self, api: &dyn KumaApi, current: State) -> Result<()> {
        let id = current.id()?;
        api.delete_monitor(id).await?;
        info!("Deleted {} {}", self.type_name, id);
        Ok(())
    }
}
