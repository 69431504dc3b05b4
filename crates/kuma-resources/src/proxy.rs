//! `uptimekuma_proxy`

use async_trait::async_trait;
use kuma_core::model::Proxy;
use kuma_core::{Attribute, AttributeType, Error, KumaApi, PlanResult, Resource, Result, Schema, State};
use tracing::{debug, info};

pub const PROTOCOLS: &[&str] = &["http", "https", "socks", "socks5", "socks5h", "socks4"];

pub struct ProxyResource;

fn port(state: &State) -> Result<u16> {
    let port = state.require_int("port")?;
    u16::try_from(port)
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| Error::invalid_input(format!("port must be between 1 and 65535, got {port}")))
}

/// Whether `state` carries a non-empty username or password
fn has_credentials(state: &State) -> Result<bool> {
    let filled = |attr: &str| -> Result<bool> { Ok(state.string(attr)?.is_some_and(|v| !v.is_empty())) };
    Ok(filled("username")? || filled("password")?)
}

impl ProxyResource {
    fn to_proxy(state: &State, id: Option<i64>) -> Result<Proxy> {
        let mut proxy = Proxy::new(
            state.require_string("protocol")?,
            state.require_string("host")?,
            port(state)?,
        );
        proxy.id = id;
        proxy.username = state.string("username")?;
        proxy.password = state.string("password")?;
        proxy.auth = match state.bool("auth")? {
            Some(auth) => auth,
            None => has_credentials(state)?,
        };
        proxy.active = state.bool_or("active", true)?;
        proxy.is_default = state.bool_or("default", false)?;
        proxy.apply_existing = state.bool_or("apply_existing", false)?;
        Ok(proxy)
    }

    fn to_state(proxy: &Proxy, prior: &State) -> Result<State> {
        let mut state = State::new();
        state.set("id", proxy.id.ok_or_else(|| Error::protocol("proxy without an id"))?);
        state.set("protocol", proxy.protocol.as_str());
        state.set("host", proxy.host.as_str());
        state.set("port", proxy.port);
        state.set("auth", proxy.auth);
        state.set_opt("username", proxy.username.clone().filter(|u| !u.is_empty()));
        state.set_opt(
            "password",
            proxy
                .password
                .clone()
                .filter(|p| !p.is_empty())
                .or(prior.string("password")?),
        );
        state.set("active", proxy.active);
        state.set("default", proxy.is_default);
        state.set("apply_existing", prior.bool_or("apply_existing", false)?);
        Ok(state)
    }
}

#[async_trait]
impl Resource for ProxyResource {
    fn type_name(&self) -> &str {
        "uptimekuma_proxy"
    }

    fn schema(&self) -> Schema {
        Schema::new("Proxy that HTTP monitors can route through")
            .attribute("id", Attribute::computed(AttributeType::Number))
            .attribute(
                "protocol",
                Attribute::required(AttributeType::String).describe(
                    "One of http, https, socks, socks5, socks5h or socks4",
                ),
            )
            .attribute("host", Attribute::required(AttributeType::String))
            .attribute("port", Attribute::required(AttributeType::Number))
            .attribute(
                "auth",
                Attribute::optional_computed(AttributeType::Bool)
                    .describe("Whether the proxy requires authentication, derived from the credentials when unset"),
            )
            .attribute("username", Attribute::optional(AttributeType::String))
            .attribute("password", Attribute::optional(AttributeType::String).sensitive())
            .attribute("active", Attribute::optional(AttributeType::Bool).with_default(true))
            .attribute(
                "default",
                Attribute::optional(AttributeType::Bool)
                    .with_default(false)
                    .describe("Use for newly created monitors"),
            )
            .attribute(
                "apply_existing",
                Attribute::optional(AttributeType::Bool)
                    .with_default(false)
                    .describe("Apply to all existing monitors when saved"),
            )
    }

    fn validate(&self, config: &State) -> Result<()> {
        self.schema().validate(config)?;
        if let Some(protocol) = config.string("protocol")?
            && !PROTOCOLS.contains(&protocol.as_str())
        {
            return Err(Error::invalid_input(format!(
                "unsupported proxy protocol {protocol:?}, expected one of {}",
                PROTOCOLS.join(", ")
            )));
        }
        if config.is_set("port") {
            port(config)?;
        }
        Ok(())
    }

    /// `auth` follows the planned credentials unless configured
    fn modify_plan(&self, config: &State, plan: &mut PlanResult) -> Result<()> {
        if config.is_set("auth") {
            return Ok(());
        }
        let Some(planned) = plan.planned_state.as_mut() else {
            return Ok(());
        };
        planned.set("auth", has_credentials(planned)?);
        plan.unknown_attributes.retain(|attr| attr != "auth");
        Ok(())
    }

    async fn create(&self, api: &dyn KumaApi, planned: State) -> Result<State> {
        let proxy = Self::to_proxy(&planned, None)?;
        let id = api.create_proxy(&proxy).await?;
        info!("Created proxy {} ({}:{})", id, proxy.host, proxy.port);
        Self::to_state(&api.get_proxy(id).await?, &planned)
    }

    async fn read(&self, api: &dyn KumaApi, current: State) -> Result<Option<State>> {
        let id = current.id()?;
        match api.get_proxy(id).await {
            Ok(proxy) => Self::to_state(&proxy, &current).map(Some),
            Err(e) if e.is_not_found() => {
                debug!("Proxy {} is gone", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, api: &dyn KumaApi, prior: State, planned: State) -> Result<State> {
        let id = prior.id()?;
        api.update_proxy(&Self::to_proxy(&planned, Some(id))?).await?;
        info!("Updated proxy {}", id);
        Self::to_state(&api.get_proxy(id).await?, &planned)
    }

    async fn delete(&self, api: &dyn KumaApi, current: State) -> Result<()> {
        let id = current.id()?;
        api.delete_proxy(id).await?;
        info!("Deleted proxy {}", id);
        Ok(())
    }
}
