//! `uptimekuma_monitor` data source

use super::{lookup_keys, lookup_schema};
use async_trait::async_trait;
use kuma_core::lookup::{EntityKind, find_unique};
use kuma_core::model::Monitor;
use kuma_core::{Attribute, AttributeType, DataSource, KumaApi, Result, Schema, State};

const MONITOR: EntityKind = EntityKind::new("monitor", "monitors");

pub struct MonitorDataSource;

#[async_trait]
impl DataSource for MonitorDataSource {
    fn type_name(&self) -> &str {
        "uptimekuma_monitor"
    }

    fn schema(&self) -> Schema {
        lookup_schema("Look up an existing monitor", "name")
            .attribute(
                "type",
                Attribute::optional_computed(AttributeType::String)
                    .describe("Only consider monitors of this Kuma type, e.g. \"http\""),
            )
            .attribute("description", Attribute::computed(AttributeType::String))
            .attribute("active", Attribute::computed(AttributeType::Bool))
            .attribute("parent", Attribute::computed(AttributeType::Number))
            .attribute("url", Attribute::computed(AttributeType::String))
            .attribute("hostname", Attribute::computed(AttributeType::String))
    }

    async fn read(&self, api: &dyn KumaApi, config: State) -> Result<State> {
        let (id, name) = lookup_keys(&config, "name")?;
        let kind = config.string("type")?;

        let monitors: Vec<Monitor> = api
            .list_monitors()
            .await?
            .into_iter()
            .filter(|m| kind.as_deref().is_none_or(|k| m.monitor_type.as_str() == k))
            .collect();
        let monitor = find_unique(MONITOR, monitors, id, name.as_deref(), |m| m.id, |m| m.name.as_str())?;

        let setting = |key: &str| monitor.setting(key).and_then(|v| v.as_str()).map(str::to_string);
        let mut state = State::new();
        state.set_opt("id", monitor.id);
        state.set("name", monitor.name.as_str());
        state.set("type", monitor.monitor_type.as_str());
        state.set_opt("description", monitor.description.clone());
        state.set("active", monitor.active);
        state.set_opt("parent", monitor.parent);
        state.set_opt("url", setting("url"));
        state.set_opt("hostname", setting("hostname"));
        Ok(state)
    }
}
