//! `uptimekuma_docker_host` data source

use super::{lookup_keys, lookup_schema};
use async_trait::async_trait;
use kuma_core::lookup::{EntityKind, find_unique};
use kuma_core::{Attribute, AttributeType, DataSource, KumaApi, Result, Schema, State};

const DOCKER_HOST: EntityKind = EntityKind::new("docker host", "docker hosts");

pub struct DockerHostDataSource;

#[async_trait]
impl DataSource for DockerHostDataSource {
    fn type_name(&self) -> &str {
        "uptimekuma_docker_host"
    }

    fn schema(&self) -> Schema {
        lookup_schema("Look up an existing docker host", "name")
            .attribute("docker_type", Attribute::computed(AttributeType::String))
            .attribute("docker_daemon", Attribute::computed(AttributeType::String))
    }

    async fn read(&self, api: &dyn KumaApi, config: State) -> Result<State> {
        let (id, name) = lookup_keys(&config, "name")?;
        let host = find_unique(
            DOCKER_HOST,
            api.list_docker_hosts().await?,
            id,
            name.as_deref(),
            |h| h.id,
            |h| h.name.as_str(),
        )?;

        let mut state = State::new();
        state.set_opt("id", host.id);
        state.set("name", host.name.as_str());
        state.set("docker_type", host.docker_type.as_str());
        state.set("docker_daemon", host.docker_daemon.as_str());
        Ok(state)
    }
}
