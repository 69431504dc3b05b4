//! Test doubles and common utilities for provider contract tests
//!
//! These doubles are minimal resources and factories that exercise the
//! dispatcher without depending on `kuma-resources`.

#![allow(dead_code)]

use async_trait::async_trait;
use kuma_core::error::{Error, Result};
use kuma_core::model::Tag;
use kuma_core::schema::{Attribute, AttributeType, Schema};
use kuma_core::traits::{DataSource, KumaApi, KumaApiFactory, Resource};
use kuma_core::{MemoryKumaApi, Provider, ProviderConfig, ResourceRegistry, State};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// A tag resource that maps straight onto the API
pub struct SimpleTagResource;

fn tag_state(tag: &Tag) -> State {
    let mut state = State::new();
    state.set_opt("id", tag.id);
    state.set("name", tag.name.clone());
    state.set("color", tag.color.clone());
    state
}

#[async_trait]
impl Resource for SimpleTagResource {
    fn type_name(&self) -> &str {
        "test_tag"
    }

    fn schema(&self) -> Schema {
        Schema::new("test tag")
            .attribute("id", Attribute::computed(AttributeType::Number))
            .attribute("name", Attribute::required(AttributeType::String))
            .attribute(
                "color",
                Attribute::optional(AttributeType::String).with_default("#000000"),
            )
    }

    async fn create(&self, api: &dyn KumaApi, planned: State) -> Result<State> {
        let tag = Tag::new(planned.require_string("name")?, planned.require_string("color")?);
        Ok(tag_state(&api.create_tag(&tag).await?))
    }

    async fn read(&self, api: &dyn KumaApi, current: State) -> Result<Option<State>> {
        match api.get_tag(current.id()?).await {
            Ok(tag) => Ok(Some(tag_state(&tag))),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn update(&self, api: &dyn KumaApi, prior: State, planned: State) -> Result<State> {
        let mut tag = Tag::new(planned.require_string("name")?, planned.require_string("color")?);
        tag.id = Some(prior.id()?);
        api.update_tag(&tag).await?;
        Ok(tag_state(&tag))
    }

    async fn delete(&self, api: &dyn KumaApi, current: State) -> Result<()> {
        api.delete_tag(current.id()?).await
    }
}

/// A data source echoing the configured name as `greeting`
pub struct EchoDataSource;

#[async_trait]
impl DataSource for EchoDataSource {
    fn type_name(&self) -> &str {
        "test_echo"
    }

    fn schema(&self) -> Schema {
        Schema::new("echo")
            .attribute("name", Attribute::required(AttributeType::String))
            .attribute("greeting", Attribute::computed(AttributeType::String))
    }

    async fn read(&self, _api: &dyn KumaApi, mut config: State) -> Result<State> {
        let name = config.require_string("name")?;
        config.set("greeting", format!("hello {name}"));
        Ok(config)
    }
}

/// A factory that records the configuration it was asked to connect with
#[derive(Default)]
pub struct RecordingFactory {
    pub api: MemoryKumaApi,
    pub seen: Mutex<Vec<ProviderConfig>>,
}

#[async_trait]
impl KumaApiFactory for RecordingFactory {
    async fn connect(&self, config: &ProviderConfig) -> Result<Arc<dyn KumaApi>> {
        self.seen.lock().unwrap().push(config.clone());
        self.api.connect(config).await
    }
}

/// A factory whose server rejects every login
pub struct RejectingFactory;

#[async_trait]
impl KumaApiFactory for RejectingFactory {
    async fn connect(&self, _config: &ProviderConfig) -> Result<Arc<dyn KumaApi>> {
        Err(Error::auth("Incorrect username or password."))
    }
}

pub fn registry() -> ResourceRegistry {
    let mut registry = ResourceRegistry::new();
    registry.register_resource(Arc::new(SimpleTagResource));
    registry.register_data_source(Arc::new(EchoDataSource));
    registry
}

/// An unconfigured provider over `factory` with an empty environment
pub fn provider(factory: Arc<dyn KumaApiFactory>) -> Provider {
    Provider::new(registry(), factory).with_env_lookup(|_| None)
}

pub fn state(value: Value) -> State {
    serde_json::from_value(value).expect("state is a JSON object")
}
