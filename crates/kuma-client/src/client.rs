//! Typed Uptime Kuma client
//!
//! ## API Reference
//!
//! Socket events (acknowledged with `{ok, msg, …}`):
//! - `login`, `getMonitor`, `add`, `editMonitor`, `deleteMonitor`,
//!   `pauseMonitor`, `resumeMonitor`, `addMonitorTag`, `deleteMonitorTag`
//! - `addNotification`, `deleteNotification`
//! - `getTags`, `addTag`, `editTag`, `deleteTag`
//! - `addProxy`, `deleteProxy`, `addDockerHost`, `deleteDockerHost`
//! - `addMaintenance`, `editMaintenance`, `deleteMaintenance`,
//!   `pauseMaintenance`, `resumeMaintenance`, `getMonitorMaintenance`,
//!   `addMonitorMaintenance`, `getMaintenanceStatusPage`,
//!   `addMaintenanceStatusPage`
//! - `getStatusPage`, `addStatusPage`, `saveStatusPage`, `deleteStatusPage`
//!
//! Pushed lists: `monitorList`, `notificationList`, `proxyList`,
//! `dockerHostList`, `maintenanceList`, `statusPageList`. Kuma pushes the
//! updated list before acknowledging a change, so the cached snapshot is
//! current when a call returns.
//!
//! HTTP: `GET /api/status-page/<slug>` for public groups.

use crate::connection::{Connection, socket_url};
use async_trait::async_trait;
use kuma_core::config::ProviderConfig;
use kuma_core::model::wire;
use kuma_core::model::{
    DockerHost, Maintenance, Monitor, MonitorTag, Notification, Proxy, PublicGroup, StatusPage, Tag,
};
use kuma_core::traits::{KumaApi, KumaApiFactory};
use kuma_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Status codes accepted when a monitor does not set its own
const DEFAULT_ACCEPTED_STATUS_CODES: &str = "200-299";

/// Unwrap an acknowledgement, turning `{ok: false}` into an API error
pub fn into_reply(event: &str, args: Vec<Value>) -> Result<Value> {
    let reply = args.into_iter().next().unwrap_or(Value::Null);
    if reply.get("ok").and_then(Value::as_bool) == Some(false) {
        let message = reply
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        return Err(Error::api(event, message));
    }
    Ok(reply)
}

/// A field of an acknowledgement
fn field<T: DeserializeOwned>(event: &str, reply: &Value, key: &str) -> Result<T> {
    let value = reply
        .get(key)
        .cloned()
        .ok_or_else(|| Error::protocol(format!("{event} reply has no {key:?}")))?;
    serde_json::from_value(value)
        .map_err(|e| Error::protocol(format!("{event} reply field {key:?}: {e}")))
}

/// Parse every entry of a pushed list, sorted by `id`
fn parse_list<T: DeserializeOwned>(event: &str, snapshot: &Value, id_of: impl Fn(&T) -> Option<i64>) -> Result<Vec<T>> {
    let mut items = wire::entries(snapshot)
        .into_iter()
        .map(|entry| {
            serde_json::from_value(entry).map_err(|e| Error::protocol(format!("{event} entry: {e}")))
        })
        .collect::<Result<Vec<T>>>()?;
    items.sort_by_key(|item| id_of(item));
    Ok(items)
}

/// Uptime Kuma client over Socket.IO
pub struct KumaClient {
    connection: Connection,
    http: reqwest::Client,
    endpoint: String,
}

impl std::fmt::Debug for KumaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KumaClient")
            .field("endpoint", &self.endpoint)
            .field("connection", &self.connection)
            .finish()
    }
}

impl KumaClient {
    /// Connect to the endpoint and log in when credentials are configured
    pub async fn connect(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let url = socket_url(&config.endpoint)?;
        let connection = Connection::open(&url, config.connect_timeout, config.call_timeout).await?;

        let http = reqwest::Client::builder()
            .timeout(config.call_timeout)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;

        let client = Self {
            connection,
            http,
            endpoint: config.endpoint.clone(),
        };

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            client.login(username, password).await?;
        } else {
            debug!("No credentials configured, relying on disabled authentication");
        }

        info!("Connected to Uptime Kuma at {}", client.endpoint);
        Ok(client)
    }

    async fn login(&self, username: &str, password: &str) -> Result<()> {
        debug!("Logging in as {}", username);
        let args = self
            .connection
            .call(
                "login",
                vec![json!({ "username": username, "password": password, "token": "" })],
            )
            .await?;
        let reply = args.into_iter().next().unwrap_or(Value::Null);

        if reply.get("tokenRequired").and_then(Value::as_bool) == Some(true) {
            return Err(Error::auth("two-factor authentication is enabled for this account"));
        }
        if reply.get("ok").and_then(Value::as_bool) != Some(true) {
            let message = reply
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("login rejected");
            return Err(Error::auth(message.to_string()));
        }
        Ok(())
    }

    /// Emit an event and unwrap its acknowledgement
    async fn call(&self, event: &str, args: Vec<Value>) -> Result<Value> {
        debug!("Calling {}", event);
        let reply = self.connection.call(event, args).await?;
        into_reply(event, reply)
    }

    async fn monitor_exists(&self, id: i64) -> Result<bool> {
        let snapshot = self.connection.snapshot("monitorList").await?;
        Ok(wire::entries(&snapshot)
            .iter()
            .any(|m| m.get("id").and_then(Value::as_i64) == Some(id)))
    }

    /// Payload for `add` / `editMonitor`
    fn monitor_payload(monitor: &Monitor) -> Result<Value> {
        let mut payload = serde_json::to_value(monitor)?;
        if let Value::Object(map) = &mut payload {
            map.entry("accepted_statuscodes")
                .or_insert_with(|| json!([DEFAULT_ACCEPTED_STATUS_CODES]));
            map.entry("description").and_modify(|d| {
                if d.is_null() {
                    *d = json!("");
                }
            });
        }
        Ok(payload)
    }

    async fn maintenance_state(&self, id: i64, active: bool) -> Result<()> {
        let event = if active { "resumeMaintenance" } else { "pauseMaintenance" };
        self.call(event, vec![json!(id)]).await.map(|_| ())
    }

    fn maintenance_payload(maintenance: &Maintenance) -> Result<Value> {
        let mut payload = serde_json::to_value(maintenance)?;
        if let Value::Object(map) = &mut payload
            && map.get("description").is_none_or(Value::is_null)
        {
            map.insert("description".into(), json!(""));
        }
        Ok(payload)
    }

    /// Public groups of a status page, `NotFound` when the slug is unknown
    async fn public_groups(&self, slug: &str) -> Result<Vec<PublicGroup>> {
        let url = format!("{}/api/status-page/{}", self.endpoint, slug);
        debug!("Fetching {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::not_found(format!("status page {slug:?} does not exist")));
        }
        if !status.is_success() {
            return Err(Error::api(
                "GET /api/status-page",
                format!("HTTP {status}"),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::protocol(format!("status page {slug:?}: {e}")))?;
        match body.get("publicGroupList") {
            Some(groups) => Ok(serde_json::from_value(groups.clone())?),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl KumaApi for KumaClient {
    async fn list_monitors(&self) -> Result<Vec<Monitor>> {
        let snapshot = self.connection.snapshot("monitorList").await?;
        parse_list("monitorList", &snapshot, |m: &Monitor| m.id)
    }

    /// Fresh from the database; the pushed list misses tag changes
    async fn get_monitor(&self, id: i64) -> Result<Monitor> {
        if !self.monitor_exists(id).await? {
            return Err(Error::not_found(format!("monitor {id} does not exist")));
        }
        let reply = self.call("getMonitor", vec![json!(id)]).await?;
        field("getMonitor", &reply, "monitor")
    }

    async fn create_monitor(&self, monitor: &Monitor) -> Result<i64> {
        let reply = self.call("add", vec![Self::monitor_payload(monitor)?]).await?;
        let id: i64 = field("add", &reply, "monitorID")?;
        info!("Created monitor {} ({})", id, monitor.name);

        for tag in &monitor.tags {
            self.add_monitor_tag(id, tag).await?;
        }
        if !monitor.active {
            self.pause_monitor(id).await?;
        }
        Ok(id)
    }

    async fn update_monitor(&self, monitor: &Monitor) -> Result<()> {
        let id = monitor
            .id
            .ok_or_else(|| Error::invalid_input("monitor update needs an id"))?;
        let current = self.get_monitor(id).await?;

        self.call("editMonitor", vec![Self::monitor_payload(monitor)?])
            .await?;

        for stale in current
            .tags
            .iter()
            .filter(|t| !monitor.tags.iter().any(|w| w.key() == t.key()))
        {
            self.delete_monitor_tag(id, stale).await?;
        }
        for added in monitor
            .tags
            .iter()
            .filter(|w| !current.tags.iter().any(|t| t.key() == w.key()))
        {
            self.add_monitor_tag(id, added).await?;
        }

        match (current.active, monitor.active) {
            (true, false) => self.pause_monitor(id).await?,
            (false, true) => self.resume_monitor(id).await?,
            _ => {}
        }
        info!("Updated monitor {}", id);
        Ok(())
    }

    async fn delete_monitor(&self, id: i64) -> Result<()> {
        if !self.monitor_exists(id).await? {
            return Err(Error::not_found(format!("monitor {id} does not exist")));
        }
        self.call("deleteMonitor", vec![json!(id)]).await?;
        info!("Deleted monitor {}", id);
        Ok(())
    }

    async fn pause_monitor(&self, id: i64) -> Result<()> {
        self.call("pauseMonitor", vec![json!(id)]).await.map(|_| ())
    }

    async fn resume_monitor(&self, id: i64) -> Result<()> {
        self.call("resumeMonitor", vec![json!(id)]).await.map(|_| ())
    }

    async fn add_monitor_tag(&self, monitor_id: i64, tag: &MonitorTag) -> Result<()> {
        self.call(
            "addMonitorTag",
            vec![json!(tag.tag_id), json!(monitor_id), json!(tag.value)],
        )
        .await
        .map(|_| ())
    }

    async fn delete_monitor_tag(&self, monitor_id: i64, tag: &MonitorTag) -> Result<()> {
        self.call(
            "deleteMonitorTag",
            vec![json!(tag.tag_id), json!(monitor_id), json!(tag.value)],
        )
        .await
        .map(|_| ())
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        let snapshot = self.connection.snapshot("notificationList").await?;
        let mut items = wire::entries(&snapshot)
            .iter()
            .map(Notification::from_record)
            .collect::<Result<Vec<_>>>()?;
        items.sort_by_key(|n| n.id);
        Ok(items)
    }

    async fn create_notification(&self, notification: &Notification) -> Result<i64> {
        let reply = self
            .call("addNotification", vec![notification.to_payload(), Value::Null])
            .await?;
        let id: i64 = field("addNotification", &reply, "id")?;
        info!("Created notification {} ({})", id, notification.name);
        Ok(id)
    }

    async fn update_notification(&self, notification: &Notification) -> Result<()> {
        let id = notification
            .id
            .ok_or_else(|| Error::invalid_input("notification update needs an id"))?;
        self.get_notification(id).await?;
        self.call("addNotification", vec![notification.to_payload(), json!(id)])
            .await?;
        info!("Updated notification {}", id);
        Ok(())
    }

    async fn delete_notification(&self, id: i64) -> Result<()> {
        self.get_notification(id).await?;
        self.call("deleteNotification", vec![json!(id)]).await?;
        info!("Deleted notification {}", id);
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let reply = self.call("getTags", Vec::new()).await?;
        let mut tags: Vec<Tag> = field("getTags", &reply, "tags")?;
        tags.sort_by_key(|t| t.id);
        Ok(tags)
    }

    async fn create_tag(&self, tag: &Tag) -> Result<Tag> {
        let reply = self
            .call(
                "addTag",
                vec![json!({ "name": tag.name, "color": tag.color, "new": true })],
            )
            .await?;
        let created: Tag = field("addTag", &reply, "tag")?;
        info!("Created tag {:?} ({})", created.id, created.name);
        Ok(created)
    }

    async fn update_tag(&self, tag: &Tag) -> Result<()> {
        let id = tag.id.ok_or_else(|| Error::invalid_input("tag update needs an id"))?;
        self.get_tag(id).await?;
        self.call(
            "editTag",
            vec![json!({ "id": id, "name": tag.name, "color": tag.color })],
        )
        .await?;
        info!("Updated tag {}", id);
        Ok(())
    }

    async fn delete_tag(&self, id: i64) -> Result<()> {
        self.get_tag(id).await?;
        self.call("deleteTag", vec![json!(id)]).await?;
        info!("Deleted tag {}", id);
        Ok(())
    }

    async fn list_proxies(&self) -> Result<Vec<Proxy>> {
        let snapshot = self.connection.snapshot("proxyList").await?;
        parse_list("proxyList", &snapshot, |p: &Proxy| p.id)
    }

    async fn create_proxy(&self, proxy: &Proxy) -> Result<i64> {
        let reply = self
            .call("addProxy", vec![serde_json::to_value(proxy)?, Value::Null])
            .await?;
        let id: i64 = field("addProxy", &reply, "id")?;
        info!("Created proxy {} ({}:{})", id, proxy.host, proxy.port);
        Ok(id)
    }

    async fn update_proxy(&self, proxy: &Proxy) -> Result<()> {
        let id = proxy.id.ok_or_else(|| Error::invalid_input("proxy update needs an id"))?;
        self.get_proxy(id).await?;
        self.call("addProxy", vec![serde_json::to_value(proxy)?, json!(id)])
            .await?;
        info!("Updated proxy {}", id);
        Ok(())
    }

    async fn delete_proxy(&self, id: i64) -> Result<()> {
        self.get_proxy(id).await?;
        self.call("deleteProxy", vec![json!(id)]).await?;
        info!("Deleted proxy {}", id);
        Ok(())
    }

    async fn list_docker_hosts(&self) -> Result<Vec<DockerHost>> {
        let snapshot = self.connection.snapshot("dockerHostList").await?;
        parse_list("dockerHostList", &snapshot, |h: &DockerHost| h.id)
    }

    async fn create_docker_host(&self, host: &DockerHost) -> Result<i64> {
        let reply = self
            .call("addDockerHost", vec![serde_json::to_value(host)?, Value::Null])
            .await?;
        let id: i64 = field("addDockerHost", &reply, "id")?;
        info!("Created docker host {} ({})", id, host.name);
        Ok(id)
    }

    async fn update_docker_host(&self, host: &DockerHost) -> Result<()> {
        let id = host
            .id
            .ok_or_else(|| Error::invalid_input("docker host update needs an id"))?;
        self.get_docker_host(id).await?;
        self.call("addDockerHost", vec![serde_json::to_value(host)?, json!(id)])
            .await?;
        info!("Updated docker host {}", id);
        Ok(())
    }

    async fn delete_docker_host(&self, id: i64) -> Result<()> {
        self.get_docker_host(id).await?;
        self.call("deleteDockerHost", vec![json!(id)]).await?;
        info!("Deleted docker host {}", id);
        Ok(())
    }

    async fn list_maintenances(&self) -> Result<Vec<Maintenance>> {
        let snapshot = self.connection.snapshot("maintenanceList").await?;
        parse_list("maintenanceList", &snapshot, |m: &Maintenance| m.id)
    }

    async fn create_maintenance(&self, maintenance: &Maintenance) -> Result<i64> {
        let reply = self
            .call("addMaintenance", vec![Self::maintenance_payload(maintenance)?])
            .await?;
        let id: i64 = field("addMaintenance", &reply, "maintenanceID")?;
        if !maintenance.active {
            self.maintenance_state(id, false).await?;
        }
        info!("Created maintenance {} ({})", id, maintenance.title);
        Ok(id)
    }

    async fn update_maintenance(&self, maintenance: &Maintenance) -> Result<()> {
        let id = maintenance
            .id
            .ok_or_else(|| Error::invalid_input("maintenance update needs an id"))?;
        let current = self.get_maintenance(id).await?;

        self.call("editMaintenance", vec![Self::maintenance_payload(maintenance)?])
            .await?;
        if current.active != maintenance.active {
            self.maintenance_state(id, maintenance.active).await?;
        }
        info!("Updated maintenance {}", id);
        Ok(())
    }

    async fn delete_maintenance(&self, id: i64) -> Result<()> {
        self.get_maintenance(id).await?;
        self.call("deleteMaintenance", vec![json!(id)]).await?;
        info!("Deleted maintenance {}", id);
        Ok(())
    }

    async fn get_maintenance_monitors(&self, id: i64) -> Result<Vec<i64>> {
        let reply = self.call("getMonitorMaintenance", vec![json!(id)]).await?;
        let monitors: Vec<Value> = field("getMonitorMaintenance", &reply, "monitors")?;
        let mut ids: Vec<i64> = monitors
            .iter()
            .filter_map(|m| m.get("id").and_then(Value::as_i64))
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn set_maintenance_monitors(&self, id: i64, monitor_ids: &[i64]) -> Result<()> {
        let monitors: Vec<Value> = monitor_ids.iter().map(|m| json!({ "id": m })).collect();
        self.call("addMonitorMaintenance", vec![json!(id), Value::Array(monitors)])
            .await
            .map(|_| ())
    }

    async fn get_maintenance_status_pages(&self, id: i64) -> Result<Vec<i64>> {
        let reply = self
            .call("getMaintenanceStatusPage", vec![json!(id)])
            .await?;
        let pages: Vec<Value> = field("getMaintenanceStatusPage", &reply, "statusPages")?;
        let mut ids: Vec<i64> = pages
            .iter()
            .filter_map(|p| p.get("id").and_then(Value::as_i64))
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn set_maintenance_status_pages(&self, id: i64, status_page_ids: &[i64]) -> Result<()> {
        let pages: Vec<Value> = status_page_ids.iter().map(|p| json!({ "id": p })).collect();
        self.call("addMaintenanceStatusPage", vec![json!(id), Value::Array(pages)])
            .await
            .map(|_| ())
    }

    async fn list_status_pages(&self) -> Result<Vec<StatusPage>> {
        let snapshot = self.connection.snapshot("statusPageList").await?;
        parse_list("statusPageList", &snapshot, |p: &StatusPage| p.id)
    }

    async fn get_status_page(&self, slug: &str) -> Result<StatusPage> {
        let public_groups = self.public_groups(slug).await?;
        let reply = self.call("getStatusPage", vec![json!(slug)]).await?;
        let mut page: StatusPage = field("getStatusPage", &reply, "config")?;
        page.public_groups = public_groups;
        Ok(page)
    }

    async fn create_status_page(&self, title: &str, slug: &str) -> Result<()> {
        self.call("addStatusPage", vec![json!(title), json!(slug)])
            .await?;
        info!("Created status page {}", slug);
        Ok(())
    }

    async fn save_status_page(&self, page: &StatusPage) -> Result<Vec<PublicGroup>> {
        let mut config = serde_json::to_value(page)?;
        let icon = page.icon.clone().unwrap_or_default();
        if let Value::Object(map) = &mut config {
            // saveStatusPage reads the icon from `logo`
            map.insert("logo".into(), json!(icon));
        }
        let groups = serde_json::to_value(&page.public_groups)?;

        let reply = self
            .call(
                "saveStatusPage",
                vec![json!(page.slug), config, json!(icon), groups],
            )
            .await?;
        let saved = match reply.get("publicGroupList") {
            Some(groups) => serde_json::from_value(groups.clone())?,
            None => page.public_groups.clone(),
        };
        info!("Saved status page {}", page.slug);
        Ok(saved)
    }

    async fn delete_status_page(&self, slug: &str) -> Result<()> {
        self.public_groups(slug).await?;
        self.call("deleteStatusPage", vec![json!(slug)]).await?;
        info!("Deleted status page {}", slug);
        Ok(())
    }
}

/// Factory connecting a [`KumaClient`] per provider configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct KumaClientFactory;

#[async_trait]
impl KumaApiFactory for KumaClientFactory {
    async fn connect(&self, config: &ProviderConfig) -> Result<Arc<dyn KumaApi>> {
        Ok(Arc::new(KumaClient::connect(config).await?))
    }
}
