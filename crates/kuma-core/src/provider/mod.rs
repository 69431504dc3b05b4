//! Provider dispatcher
//!
//! The [`Provider`] owns the resource registry and, once configured, the
//! connected [`KumaApi`]. It turns each RPC into calls on the matching
//! [`Resource`](crate::traits::Resource) or
//! [`DataSource`](crate::traits::DataSource).
//!
//! ## Lifecycle
//!
//! 1. Create with [`Provider::new()`]
//! 2. Serve `get_schema` and validation requests (no connection needed)
//! 3. `configure` resolves the provider block and connects
//! 4. Plan, apply, read, import and data source reads use the connection

mod plan;

pub use plan::plan_change;

use crate::config::{ProviderConfig, ProviderSettings};
use crate::error::{Error, Result};
use crate::protocol::{Diagnostic, PlanResult, Request, Response};
use crate::registry::ResourceRegistry;
use crate::schema::{Attribute, AttributeType, Schema};
use crate::state::State;
use crate::traits::{KumaApi, KumaApiFactory};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Schemas of the provider block and every registered type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

/// Outcome of applying a resource change
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyResult {
    /// `None` after a destroy
    pub new_state: Option<State>,
    #[serde(skip)]
    pub warnings: Vec<Diagnostic>,
}

/// Schema of the provider block
pub fn provider_schema() -> Schema {
    Schema::new("Manage Uptime Kuma monitors, notifications and status pages.")
        .attribute(
            "endpoint",
            Attribute::optional(AttributeType::String)
                .describe("Uptime Kuma base URL. Falls back to UPTIMEKUMA_ENDPOINT."),
        )
        .attribute(
            "username",
            Attribute::optional(AttributeType::String)
                .describe("Login username. Falls back to UPTIMEKUMA_USERNAME."),
        )
        .attribute(
            "password",
            Attribute::optional(AttributeType::String)
                .sensitive()
                .describe("Login password. Falls back to UPTIMEKUMA_PASSWORD."),
        )
}

/// Dispatches provider RPCs to registered resources
pub struct Provider {
    registry: Arc<ResourceRegistry>,
    factory: Arc<dyn KumaApiFactory>,
    env: EnvLookup,
    api: RwLock<Option<Arc<dyn KumaApi>>>,
}

impl Provider {
    /// Create an unconfigured provider reading the process environment
    pub fn new(registry: ResourceRegistry, factory: Arc<dyn KumaApiFactory>) -> Self {
        Self {
            registry: Arc::new(registry),
            factory,
            env: Arc::new(|key| std::env::var(key).ok()),
            api: RwLock::new(None),
        }
    }

    /// Replace the environment lookup used during `configure`
    pub fn with_env_lookup<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(env);
        self
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Schemas of the provider and every registered type
    pub fn schema(&self) -> ProviderSchema {
        let mut resources = BTreeMap::new();
        for name in self.registry.list_resources() {
            if let Ok(resource) = self.registry.resource(&name) {
                resources.insert(name, resource.schema());
            }
        }

        let mut data_sources = BTreeMap::new();
        for name in self.registry.list_data_sources() {
            if let Ok(data_source) = self.registry.data_source(&name) {
                data_sources.insert(name, data_source.schema());
            }
        }

        ProviderSchema {
            provider: provider_schema(),
            resources,
            data_sources,
        }
    }

    /// Resolve the provider block and connect
    pub async fn configure(&self, settings: &ProviderSettings) -> Result<()> {
        let config = ProviderConfig::resolve_with(settings, |key| (self.env)(key))?;
        info!("Connecting to Uptime Kuma at {}", config.endpoint);

        let api = self.factory.connect(&config).await?;
        *self.api.write().await = Some(api);

        info!("Provider configured");
        Ok(())
    }

    /// Whether `configure` has succeeded
    pub async fn is_configured(&self) -> bool {
        self.api.read().await.is_some()
    }

    async fn api(&self) -> Result<Arc<dyn KumaApi>> {
        self.api
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::config("provider is not configured"))
    }

    pub fn validate_resource(&self, type_name: &str, config: &State) -> Result<()> {
        self.registry.resource(type_name)?.validate(config)
    }

    pub fn validate_data_source(&self, type_name: &str, config: &State) -> Result<()> {
        self.registry.data_source(type_name)?.validate(config)
    }

    /// Plan a change from `prior` to `proposed`
    pub fn plan(
        &self,
        type_name: &str,
        prior: Option<State>,
        proposed: Option<State>,
    ) -> Result<PlanResult> {
        let resource = self.registry.resource(type_name)?;
        let config = proposed.clone();
        let mut plan = plan_change(&resource.schema(), prior.as_ref(), proposed);
        if let Some(config) = &config {
            resource.modify_plan(config, &mut plan)?;
        }
        debug!(
            "Planned {}: replace={:?} unknown={:?}",
            type_name, plan.requires_replace, plan.unknown_attributes
        );
        Ok(plan)
    }

    /// Apply a planned change
    ///
    /// Creates when there is no prior state, deletes when there is no
    /// planned state, updates otherwise.
    pub async fn apply(
        &self,
        type_name: &str,
        prior: Option<State>,
        planned: Option<State>,
    ) -> Result<ApplyResult> {
        let resource = self.registry.resource(type_name)?;
        let api = self.api().await?;

        match (prior, planned) {
            (None, Some(planned)) => {
                info!("Creating {}", type_name);
                let state = resource.create(api.as_ref(), planned).await?;
                Ok(ApplyResult {
                    new_state: Some(state),
                    warnings: Vec::new(),
                })
            }
            (Some(prior), Some(planned)) => {
                info!("Updating {} {}", type_name, describe_id(&prior));
                let state = resource.update(api.as_ref(), prior, planned).await?;
                Ok(ApplyResult {
                    new_state: Some(state),
                    warnings: Vec::new(),
                })
            }
            (Some(prior), None) => {
                let id = describe_id(&prior);
                info!("Deleting {} {}", type_name, id);
                match resource.delete(api.as_ref(), prior).await {
                    Ok(()) => Ok(ApplyResult::default()),
                    Err(err) if err.is_not_found() => {
                        warn!("{} {} was already deleted", type_name, id);
                        Ok(ApplyResult {
                            new_state: None,
                            warnings: vec![Diagnostic::warning(
                                "Object already deleted",
                                format!("{type_name} {id} no longer exists in Uptime Kuma"),
                            )],
                        })
                    }
                    Err(err) => Err(err),
                }
            }
            (None, None) => Err(Error::invalid_input(
                "apply needs a prior state, a planned state, or both",
            )),
        }
    }

    /// Refresh a resource; `None` means it no longer exists
    pub async fn read(&self, type_name: &str, current: State) -> Result<Option<State>> {
        let resource = self.registry.resource(type_name)?;
        let api = self.api().await?;

        let id = describe_id(&current);
        let state = resource.read(api.as_ref(), current).await?;
        if state.is_none() {
            warn!("{} {} no longer exists, removing from state", type_name, id);
        }
        Ok(state)
    }

    /// Import an existing object by its import ID
    pub async fn import(&self, type_name: &str, id: &str) -> Result<State> {
        let resource = self.registry.resource(type_name)?;
        let api = self.api().await?;

        info!("Importing {} {}", type_name, id);
        resource
            .import(api.as_ref(), id)
            .await?
            .ok_or_else(|| Error::not_found(format!("cannot import {type_name}: no object with ID {id}")))
    }

    /// Read a data source
    pub async fn read_data_source(&self, type_name: &str, config: State) -> Result<State> {
        let data_source = self.registry.data_source(type_name)?;
        data_source.validate(&config)?;
        let api = self.api().await?;

        debug!("Reading data source {}", type_name);
        data_source.read(api.as_ref(), config).await
    }

    /// Serve one request
    pub async fn handle(&self, request: Request) -> Response {
        let method = request.method();
        debug!("Handling {}", method);

        let outcome = match request {
            Request::GetSchema => Ok(Response::ok(self.schema())),
            Request::ConfigureProvider { config } => {
                self.configure(&config).await.map(|()| Response::ok(json!(null)))
            }
            Request::ValidateResourceConfig { type_name, config } => self
                .validate_resource(&type_name, &config)
                .map(|()| Response::ok(json!(null))),
            Request::ValidateDataSourceConfig { type_name, config } => self
                .validate_data_source(&type_name, &config)
                .map(|()| Response::ok(json!(null))),
            Request::PlanResourceChange {
                type_name,
                prior_state,
                proposed_state,
            } => self
                .plan(&type_name, prior_state, proposed_state)
                .map(Response::ok),
            Request::ApplyResourceChange {
                type_name,
                prior_state,
                planned_state,
            } => self
                .apply(&type_name, prior_state, planned_state)
                .await
                .map(|applied| {
                    let mut response = Response::ok(&applied);
                    response.diagnostics.extend(applied.warnings);
                    response
                }),
            Request::ReadResource {
                type_name,
                current_state,
            } => self
                .read(&type_name, current_state)
                .await
                .map(|new_state| Response::ok(json!({ "new_state": new_state }))),
            Request::ImportResourceState { type_name, id } => self
                .import(&type_name, &id)
                .await
                .map(|state| Response::ok(json!({ "imported_state": state }))),
            Request::ReadDataSource { type_name, config } => self
                .read_data_source(&type_name, config)
                .await
                .map(|state| Response::ok(json!({ "state": state }))),
            Request::Stop => Ok(Response::ok(json!(null))),
        };

        outcome.unwrap_or_else(|err| {
            warn!("{} failed: {}", method, err);
            Response::failed(&err)
        })
    }
}

fn describe_id(state: &State) -> String {
    state
        .get("id")
        .or_else(|| state.get("slug"))
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}
