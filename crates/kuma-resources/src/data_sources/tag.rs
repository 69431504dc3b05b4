//! `uptimekuma_tag` data source

use super::{lookup_keys, lookup_schema};
use async_trait::async_trait;
use kuma_core::lookup::{EntityKind, find_unique};
use kuma_core::{Attribute, AttributeType, DataSource, KumaApi, Result, Schema, State};

const TAG: EntityKind = EntityKind::new("tag", "tags");

pub struct TagDataSource;

#[async_trait]
impl DataSource for TagDataSource {
    fn type_name(&self) -> &str {
        "uptimekuma_tag"
    }

    fn schema(&self) -> Schema {
        lookup_schema("Look up an existing tag", "name")
            .attribute("color", Attribute::computed(AttributeType::String))
    }

    async fn read(&self, api: &dyn KumaApi, config: State) -> Result<State> {
        let (id, name) = lookup_keys(&config, "name")?;
        let tag = find_unique(TAG, api.list_tags().await?, id, name.as_deref(), |t| t.id, |t| t.name.as_str())?;

        let mut state = State::new();
        state.set_opt("id", tag.id);
        state.set("name", tag.name.as_str());
        state.set("color", tag.color.as_str());
        Ok(state)
    }
}
