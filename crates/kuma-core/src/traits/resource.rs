//! Terraform resource and data source contracts
//!
//! Each implementation maps between [`State`] values and the domain model
//! and delegates to a [`KumaApi`]. The client is passed to every operation
//! rather than stored, so one resource instance serves any configured
//! provider.

use crate::error::{Error, Result};
use crate::protocol::PlanResult;
use crate::schema::Schema;
use crate::state::State;
use crate::traits::KumaApi;
use async_trait::async_trait;

/// A managed resource type
#[async_trait]
pub trait Resource: Send + Sync {
    /// Full type name, e.g. `uptimekuma_monitor_http`
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    /// Validate user configuration
    ///
    /// Defaults to schema validation; implementations add cross-attribute
    /// rules on top.
    fn validate(&self, config: &State) -> Result<()> {
        self.schema().validate(config)
    }

    /// Adjust a computed plan before it is returned
    ///
    /// `config` is the proposed state as given. Resources whose computed
    /// attributes depend on other attributes fill them in here, since the
    /// generic plan carries prior values forward unchanged.
    fn modify_plan(&self, config: &State, plan: &mut PlanResult) -> Result<()> {
        let _ = (config, plan);
        Ok(())
    }

    /// Create the object described by `planned`, returning the new state
    async fn create(&self, api: &dyn KumaApi, planned: State) -> Result<State>;

    /// Refresh `current`; `None` means the object no longer exists
    async fn read(&self, api: &dyn KumaApi, current: State) -> Result<Option<State>>;

    /// Update the object from `prior` to `planned`, returning the new state
    async fn update(&self, api: &dyn KumaApi, prior: State, planned: State) -> Result<State>;

    /// Delete the object in `current`
    async fn delete(&self, api: &dyn KumaApi, current: State) -> Result<()>;

    /// Import an existing object by its import ID
    ///
    /// Defaults to parsing a numeric ID and reading.
    async fn import(&self, api: &dyn KumaApi, id: &str) -> Result<Option<State>> {
        let id: i64 = id.trim().parse().map_err(|_| {
            Error::invalid_input(format!(
                "{} import ID must be numeric, got {id:?}",
                self.type_name()
            ))
        })?;
        let mut state = State::new();
        state.set("id", id);
        self.read(api, state).await
    }
}

/// A read-only data source type
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Full type name, e.g. `uptimekuma_notification`
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    fn validate(&self, config: &State) -> Result<()> {
        self.schema().validate(config)
    }

    /// Resolve `config` into a full state
    async fn read(&self, api: &dyn KumaApi, config: State) -> Result<State>;
}
