//! `uptimekuma_tag`

use async_trait::async_trait;
use kuma_core::model::Tag;
use kuma_core::{Attribute, AttributeType, Error, KumaApi, Resource, Result, Schema, State};
use tracing::{debug, info};

/// Whether `color` is a `#RRGGBB` hex color
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

pub struct TagResource;

impl TagResource {
    fn to_state(tag: &Tag) -> Result<State> {
        let mut state = State::new();
        state.set("id", tag.id.ok_or_else(|| Error::protocol("tag without an id"))?);
        state.set("name", tag.name.as_str());
        state.set("color", tag.color.as_str());
        Ok(state)
    }

    fn to_tag(state: &State, id: Option<i64>) -> Result<Tag> {
        let mut tag = Tag::new(state.require_string("name")?, state.require_string("color")?);
        tag.id = id;
        Ok(tag)
    }
}

#[async_trait]
impl Resource for TagResource {
    fn type_name(&self) -> &str {
        "uptimekuma_tag"
    }

    fn schema(&self) -> Schema {
        Schema::new("Tag that can be attached to monitors")
            .attribute("id", Attribute::computed(AttributeType::Number))
            .attribute("name", Attribute::required(AttributeType::String))
            .attribute(
                "color",
                Attribute::required(AttributeType::String).describe("Hex color, #RRGGBB"),
            )
    }

    fn validate(&self, config: &State) -> Result<()> {
        self.schema().validate(config)?;
        if let Some(color) = config.string("color")?
            && !is_hex_color(&color)
        {
            return Err(Error::invalid_input(format!(
                "color must be a #RRGGBB hex color, got {color:?}"
            )));
        }
        Ok(())
    }

    async fn create(&self, api: &dyn KumaApi, planned: State) -> Result<State> {
        let tag = api.create_tag(&Self::to_tag(&planned, None)?).await?;
        info!("Created tag {:?} ({})", tag.id, tag.name);
        Self::to_state(&tag)
    }

    async fn read(&self, api: &dyn KumaApi, current: State) -> Result<Option<State>> {
        let id = current.id()?;
        match api.get_tag(id).await {
            Ok(tag) => Self::to_state(&tag).map(Some),
            Err(e) if e.is_not_found() => {
                debug!("Tag {} is gone", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, api: &dyn KumaApi, prior: State, planned: State) -> Result<State> {
        let tag = Self::to_tag(&planned, Some(prior.id()?))?;
        api.update_tag(&tag).await?;
        info!("Updated tag {:?}", tag.id);
        Self::to_state(&tag)
    }

    async fn delete(&self, api: &dyn KumaApi, current: State) -> Result<()> {
        let id = current.id()?;
        api.delete_tag(id).await?;
        info!("Deleted tag {}", id);
        Ok(())
    }
}
