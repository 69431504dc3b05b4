//! `uptimekuma_status_page` data source, looked up by slug

use async_trait::async_trait;
use kuma_core::{Attribute, AttributeType, DataSource, KumaApi, Result, Schema, State};

pub struct StatusPageDataSource;

#[async_trait]
impl DataSource for StatusPageDataSource {
    fn type_name(&self) -> &str {
        "uptimekuma_status_page"
    }

    fn schema(&self) -> Schema {
        Schema::new("Look up an existing status page")
            .attribute("slug", Attribute::required(AttributeType::String))
            .attribute("id", Attribute::computed(AttributeType::Number))
            .attribute("title", Attribute::computed(AttributeType::String))
            .attribute("description", Attribute::computed(AttributeType::String))
            .attribute("published", Attribute::computed(AttributeType::Bool))
            .attribute(
                "monitor_ids",
                Attribute::computed(AttributeType::list(AttributeType::Number))
                    .describe("Monitors shown on the page, across all groups"),
            )
    }

    async fn read(&self, api: &dyn KumaApi, config: State) -> Result<State> {
        let page = api.get_status_page(&config.require_string("slug")?).await?;

        let monitor_ids: Vec<i64> = page
            .public_groups
            .iter()
            .flat_map(|g| g.monitor_ids.iter().copied())
            .collect();

        let mut state = State::new();
        state.set("slug", page.slug.as_str());
        state.set_opt("id", page.id);
        state.set("title", page.title.as_str());
        state.set_opt("description", page.description.clone());
        state.set("published", page.published);
        state.set("monitor_ids", monitor_ids);
        Ok(state)
    }
}
