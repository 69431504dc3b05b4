//! `uptimekuma_status_page`
//!
//! Status pages are keyed by slug rather than ID: every call after creation
//! addresses the page by slug, and import takes a slug too. Changing the
//! slug replaces the page.

use crate::fields::set_list;
use async_trait::async_trait;
use kuma_core::model::status_page::is_valid_slug;
use kuma_core::model::{PublicGroup, StatusPage};
use kuma_core::{Attribute, AttributeType, Error, KumaApi, Resource, Result, Schema, State};
use serde_json::{Value, json};
use tracing::{debug, info};

const THEMES: &[&str] = &["auto", "light", "dark"];

/// Optional text attribute, reading `""` as unset unless configured
fn text(state: &mut State, prior: &State, attr: &str, value: &Option<String>) {
    state.set_opt(
        attr,
        value
            .clone()
            .filter(|v| !v.is_empty() || prior.is_set(attr)),
    );
}

pub struct StatusPageResource;

impl StatusPageResource {
    fn to_page(state: &State, id: Option<i64>) -> Result<StatusPage> {
        let mut page = StatusPage::new(state.require_string("slug")?, state.require_string("title")?);
        page.id = id;
        page.description = state.string("description")?;
        page.icon = state.string("icon")?;
        page.theme = state.string("theme")?;
        page.published = state.bool_or("published", true)?;
        page.show_tags = state.bool_or("show_tags", false)?;
        page.domain_name_list = state.string_list("domain_name_list")?;
        page.custom_css = state.string("custom_css")?;
        page.footer_text = state.string("footer_text")?;
        page.show_powered_by = state.bool_or("show_powered_by", true)?;
        page.google_analytics_id = state.string("google_analytics_id")?;
        page.show_certificate_expiry = state.bool_or("show_certificate_expiry", false)?;
        page.auto_refresh_interval = state.int("auto_refresh_interval")?;
        page.public_groups = state
            .object_list("public_groups")?
            .iter()
            .map(|group| {
                Ok(PublicGroup::new(
                    group.require_string("name")?,
                    group.int_list("monitor_ids")?,
                ))
            })
            .collect::<Result<_>>()?;
        Ok(page)
    }

    fn to_state(page: &StatusPage, prior: &State) -> Result<State> {
        let mut state = State::new();
        state.set_opt("id", page.id);
        state.set("slug", page.slug.as_str());
        state.set("title", page.title.as_str());
        text(&mut state, prior, "description", &page.description);

        // An uploaded image is stored under a server path, so a configured
        // data URL never reads back verbatim
        let icon = match prior.string("icon")? {
            Some(configured) if configured.starts_with("data:") => Some(configured),
            _ => page.icon.clone(),
        };
        state.set_opt("icon", icon);
        state.set_opt("theme", page.theme.clone());
        state.set("published", page.published);
        state.set("show_tags", page.show_tags);
        set_list(&mut state, prior, "domain_name_list", page.domain_name_list.clone());
        text(&mut state, prior, "custom_css", &page.custom_css);
        text(&mut state, prior, "footer_text", &page.footer_text);
        state.set("show_powered_by", page.show_powered_by);
        text(&mut state, prior, "google_analytics_id", &page.google_analytics_id);
        state.set("show_certificate_expiry", page.show_certificate_expiry);
        state.set_opt("auto_refresh_interval", page.auto_refresh_interval);

        let groups: Vec<Value> = page
            .public_groups
            .iter()
            .map(|g| json!({ "name": g.name, "monitor_ids": g.monitor_ids }))
            .collect();
        set_list(&mut state, prior, "public_groups", groups);
        Ok(state)
    }

    async fn fetch(api: &dyn KumaApi, slug: &str, prior: &State) -> Result<Option<State>> {
        match api.get_status_page(slug).await {
            Ok(page) => Self::to_state(&page, prior).map(Some),
            Err(e) if e.is_not_found() => {
                debug!("Status page {:?} is gone", slug);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Resource for StatusPageResource {
    fn type_name(&self) -> &str {
        "uptimekuma_status_page"
    }

    fn schema(&self) -> Schema {
        Schema::new("Public status page")
            .attribute("id", Attribute::computed(AttributeType::Number))
            .attribute(
                "slug",
                Attribute::required(AttributeType::String)
                    .force_new()
                    .describe("URL path of the page, letters, digits and dashes"),
            )
            .attribute("title", Attribute::required(AttributeType::String))
            .attribute("description", Attribute::optional(AttributeType::String))
            .attribute(
                "icon",
                Attribute::optional(AttributeType::String)
                    .with_default("/icon.svg")
                    .describe("Icon path or data URL"),
            )
            .attribute(
                "theme",
                Attribute::optional(AttributeType::String)
                    .with_default("auto")
                    .describe("auto, light or dark"),
            )
            .attribute("published", Attribute::optional(AttributeType::Bool).with_default(true))
            .attribute("show_tags", Attribute::optional(AttributeType::Bool).with_default(false))
            .attribute(
                "domain_name_list",
                Attribute::optional(AttributeType::list(AttributeType::String)),
            )
            .attribute("custom_css", Attribute::optional(AttributeType::String))
            .attribute("footer_text", Attribute::optional(AttributeType::String))
            .attribute(
                "show_powered_by",
                Attribute::optional(AttributeType::Bool).with_default(true),
            )
            .attribute("google_analytics_id", Attribute::optional(AttributeType::String))
            .attribute(
                "show_certificate_expiry",
                Attribute::optional(AttributeType::Bool).with_default(false),
            )
            .attribute(
                "auto_refresh_interval",
                Attribute::optional(AttributeType::Number)
                    .with_default(300)
                    .describe("Seconds between page refreshes"),
            )
            .attribute(
                "public_groups",
                Attribute::optional(AttributeType::list(AttributeType::object([
                    ("name", AttributeType::String),
                    ("monitor_ids", AttributeType::list(AttributeType::Number)),
                ]))),
            )
    }

    fn validate(&self, config: &State) -> Result<()> {
        self.schema().validate(config)?;
        if let Some(slug) = config.string("slug")?
            && !is_valid_slug(&slug)
        {
            return Err(Error::invalid_input(format!(
                "slug may only contain letters, digits and dashes, got {slug:?}"
            )));
        }
        if let Some(theme) = config.string("theme")?
            && !THEMES.contains(&theme.as_str())
        {
            return Err(Error::invalid_input(format!("theme must be auto, light or dark, got {theme:?}")));
        }
        if config.int("auto_refresh_interval")?.is_some_and(|i| i < 0) {
            return Err(Error::invalid_input("auto_refresh_interval must not be negative"));
        }
        for group in config.object_list("public_groups")? {
            if !group.is_set("name") {
                return Err(Error::invalid_input("every public group needs a name"));
            }
        }
        Ok(())
    }

    async fn create(&self, api: &dyn KumaApi, planned: State) -> Result<State> {
        let page = Self::to_page(&planned, None)?;
        api.create_status_page(&page.title, &page.slug).await?;
        api.save_status_page(&page).await?;
        info!("Created status page {:?}", page.slug);

        Self::fetch(api, &page.slug, &planned)
            .await?
            .ok_or_else(|| Error::not_found(format!("status page {:?} vanished after creation", page.slug)))
    }

    async fn read(&self, api: &dyn KumaApi, current: State) -> Result<Option<State>> {
        let slug = current.require_string("slug")?;
        Self::fetch(api, &slug, &current).await
    }

    async fn update(&self, api: &dyn KumaApi, prior: State, planned: State) -> Result<State> {
        let page = Self::to_page(&planned, prior.int("id")?)?;
        api.save_status_page(&page).await?;
        info!("Updated status page {:?}", page.slug);

        Self::fetch(api, &page.slug, &planned)
            .await?
            .ok_or_else(|| Error::not_found(format!("status page {:?} does not exist", page.slug)))
    }

    async fn delete(&self, api: &dyn KumaApi, current: State) -> Result<()> {
        let slug = current.require_string("slug")?;
        api.delete_status_page(&slug).await?;
        info!("Deleted status page {:?}", slug);
        Ok(())
    }

    /// Status pages import by slug
    async fn import(&self, api: &dyn KumaApi, id: &str) -> Result<Option<State>> {
        if !is_valid_slug(id) {
            return Err(Error::invalid_input(format!(
                "status pages are imported by slug, got {id:?}"
            )));
        }
        let mut current = State::new();
        current.set("slug", id);
        Self::fetch(api, id, &current).await
    }
}
