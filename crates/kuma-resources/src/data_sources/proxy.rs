//! `uptimekuma_proxy` data source, looked up by host

use super::{lookup_keys, lookup_schema};
use async_trait::async_trait;
use kuma_core::lookup::{EntityKind, find_unique};
use kuma_core::{Attribute, AttributeType, DataSource, KumaApi, Result, Schema, State};

const PROXY: EntityKind = EntityKind::new("proxy", "proxies");

pub struct ProxyDataSource;

#[async_trait]
impl DataSource for ProxyDataSource {
    fn type_name(&self) -> &str {
        "uptimekuma_proxy"
    }

    fn schema(&self) -> Schema {
        lookup_schema("Look up an existing proxy", "host")
            .attribute("protocol", Attribute::computed(AttributeType::String))
            .attribute("port", Attribute::computed(AttributeType::Number))
            .attribute("auth", Attribute::computed(AttributeType::Bool))
            .attribute("active", Attribute::computed(AttributeType::Bool))
            .attribute("default", Attribute::computed(AttributeType::Bool))
    }

    async fn read(&self, api: &dyn KumaApi, config: State) -> Result<State> {
        let (id, host) = lookup_keys(&config, "host")?;
        let proxy = find_unique(PROXY, api.list_proxies().await?, id, host.as_deref(), |p| p.id, |p| p.host.as_str())?;

        let mut state = State::new();
        state.set_opt("id", proxy.id);
        state.set("host", proxy.host.as_str());
        state.set("protocol", proxy.protocol.as_str());
        state.set("port", proxy.port);
        state.set("auth", proxy.auth);
        state.set("active", proxy.active);
        state.set("default", proxy.is_default);
        Ok(state)
    }
}
