//! `uptimekuma_maintenance` data source, looked up by title

use super::{lookup_keys, lookup_schema};
use async_trait::async_trait;
use kuma_core::lookup::{EntityKind, find_unique};
use kuma_core::{Attribute, AttributeType, DataSource, KumaApi, Result, Schema, State};

const MAINTENANCE: EntityKind = EntityKind::new("maintenance", "maintenances");

pub struct MaintenanceDataSource;

#[async_trait]
impl DataSource for MaintenanceDataSource {
    fn type_name(&self) -> &str {
        "uptimekuma_maintenance"
    }

    fn schema(&self) -> Schema {
        lookup_schema("Look up an existing maintenance window", "title")
            .attribute("description", Attribute::computed(AttributeType::String))
            .attribute("strategy", Attribute::computed(AttributeType::String))
            .attribute("active", Attribute::computed(AttributeType::Bool))
    }

    async fn read(&self, api: &dyn KumaApi, config: State) -> Result<State> {
        let (id, title) = lookup_keys(&config, "title")?;
        let maintenance = find_unique(
            MAINTENANCE,
            api.list_maintenances().await?,
            id,
            title.as_deref(),
            |m| m.id,
            |m| m.title.as_str(),
        )?;

        let mut state = State::new();
        state.set_opt("id", maintenance.id);
        state.set("title", maintenance.title.as_str());
        state.set_opt("description", maintenance.description.clone());
        state.set("strategy", maintenance.strategy.as_str());
        state.set("active", maintenance.active);
        Ok(state)
    }
}
