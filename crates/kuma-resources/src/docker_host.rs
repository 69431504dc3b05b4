//! `uptimekuma_docker_host`

use async_trait::async_trait;
use kuma_core::model::DockerHost;
use kuma_core::{Attribute, AttributeType, Error, KumaApi, Resource, Result, Schema, State};
use tracing::{debug, info};

pub const DOCKER_TYPES: &[&str] = &["socket", "tcp"];

pub struct DockerHostResource;

impl DockerHostResource {
    fn to_host(state: &State, id: Option<i64>) -> Result<DockerHost> {
        Ok(DockerHost {
            id,
            name: state.require_string("name")?,
            docker_type: state.require_string("docker_type")?,
            docker_daemon: state.require_string("docker_daemon")?,
        })
    }

    fn to_state(host: &DockerHost) -> Result<State> {
        let mut state = State::new();
        state.set("id", host.id.ok_or_else(|| Error::protocol("docker host without an id"))?);
        state.set("name", host.name.as_str());
        state.set("docker_type", host.docker_type.as_str());
        state.set("docker_daemon", host.docker_daemon.as_str());
        Ok(state)
    }
}

#[async_trait]
impl Resource for DockerHostResource {
    fn type_name(&self) -> &str {
        "uptimekuma_docker_host"
    }

    fn schema(&self) -> Schema {
        Schema::new("Docker daemon that docker monitors connect to")
            .attribute("id", Attribute::computed(AttributeType::Number))
            .attribute("name", Attribute::required(AttributeType::String))
            .attribute(
                "docker_type",
                Attribute::required(AttributeType::String).describe("socket or tcp"),
            )
            .attribute(
                "docker_daemon",
                Attribute::required(AttributeType::String)
                    .describe("Socket path or TCP URL, e.g. /var/run/docker.sock"),
            )
    }

    fn validate(&self, config: &State) -> Result<()> {
        self.schema().validate(config)?;
        if let Some(docker_type) = config.string("docker_type")?
            && !DOCKER_TYPES.contains(&docker_type.as_str())
        {
            return Err(Error::invalid_input(format!(
                "docker_type must be socket or tcp, got {docker_type:?}"
            )));
        }
        Ok(())
    }

    async fn create(&self, api: &dyn KumaApi, planned: State) -> Result<State> {
        let host = Self::to_host(&planned, None)?;
        let id = api.create_docker_host(&host).await?;
        info!("Created docker host {} ({})", id, host.name);
        Self::to_state(&api.get_docker_host(id).await?)
    }

    async fn read(&self, api: &dyn KumaApi, current: State) -> Result<Option<State>> {
        let id = current.id()?;
        match api.get_docker_host(id).await {
            Ok(host) => Self::to_state(&host).map(Some),
            Err(e) if e.is_not_found() => {
                debug!("Docker host {} is gone", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, api: &dyn KumaApi, prior: State, planned: State) -> Result<State> {
        let id = prior.id()?;
        api.update_docker_host(&Self::to_host(&planned, Some(id))?)
            .await?;
        info!("Updated docker host {}", id);
        Self::to_state(&api.get_docker_host(id).await?)
    }

    async fn delete(&self, api: &dyn KumaApi, current: State) -> Result<()> {
        let id = current.id()?;
        api.delete_docker_host(id).await?;
        info!("Deleted docker host {}", id);
        Ok(())
    }
}
