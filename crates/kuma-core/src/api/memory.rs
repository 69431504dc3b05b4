// # Memory Kuma API
//
// In-memory implementation of KumaApi.
//
// ## Purpose
//
// Behaves like an empty Uptime Kuma server: IDs are assigned per entity kind
// starting at 1, tags are validated on attachment, status pages are keyed by
// slug and hand out public group IDs on save. Nothing is persisted.
//
// ## When to Use
//
// - Testing resources and the provider dispatcher
// - Exercising plans without a running server

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::model::{
    DockerHost, Maintenance, Monitor, MonitorTag, Notification, Proxy, PublicGroup, StatusPage, Tag,
};
use crate::traits::{KumaApi, KumaApiFactory};

#[derive(Debug, Default)]
struct Inner {
    next_ids: HashMap<&'static str, i64>,
    monitors: BTreeMap<i64, Monitor>,
    notifications: BTreeMap<i64, Notification>,
    tags: BTreeMap<i64, Tag>,
    proxies: BTreeMap<i64, Proxy>,
    docker_hosts: BTreeMap<i64, DockerHost>,
    maintenances: BTreeMap<i64, Maintenance>,
    maintenance_monitors: HashMap<i64, Vec<i64>>,
    maintenance_status_pages: HashMap<i64, Vec<i64>>,
    status_pages: BTreeMap<String, StatusPage>,
    calls: Vec<String>,
}

impl Inner {
    fn next_id(&mut self, kind: &'static str) -> i64 {
        let next = self.next_ids.entry(kind).or_insert(0);
        *next += 1;
        *next
    }

    fn record(&mut self, call: impl Into<String>) {
        self.calls.push(call.into());
    }

    /// Fill the server-owned tag fields of a monitor's attachments
    fn with_tag_details(&self, mut monitor: Monitor) -> Monitor {
        for attached in &mut monitor.tags {
            if let Some(tag) = self.tags.get(&attached.tag_id) {
                attached.name = Some(tag.name.clone());
                attached.color = Some(tag.color.clone());
            }
        }
        monitor
    }

    fn check_tags(&self, operation: &str, tags: &[MonitorTag]) -> Result<()> {
        match tags.iter().find(|t| !self.tags.contains_key(&t.tag_id)) {
            Some(missing) => Err(Error::api(
                operation,
                format!("tag {} does not exist", missing.tag_id),
            )),
            None => Ok(()),
        }
    }
}

/// In-memory Uptime Kuma
///
/// Clones share the same server state.
#[derive(Debug, Clone, Default)]
pub struct MemoryKumaApi {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryKumaApi {
    /// Create an empty server
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of mutating calls made so far, in order
    pub async fn calls(&self) -> Vec<String> {
        self.inner.read().await.calls.clone()
    }

    /// Number of stored monitors
    pub async fn monitor_count(&self) -> usize {
        self.inner.read().await.monitors.len()
    }
}

#[async_trait]
impl KumaApiFactory for MemoryKumaApi {
    async fn connect(&self, _config: &ProviderConfig) -> Result<Arc<dyn KumaApi>> {
        Ok(Arc::new(self.clone()))
    }
}

fn missing(kind: &str, id: impl std::fmt::Display) -> Error {
    Error::not_found(format!("{kind} {id} does not exist"))
}

fn require_id(kind: &str, id: Option<i64>) -> Result<i64> {
    id.ok_or_else(|| Error::invalid_input(format!("{kind} has no ID")))
}

#[async_trait]
impl KumaApi for MemoryKumaApi {
    async fn list_monitors(&self) -> Result<Vec<Monitor>> {
        let guard = self.inner.read().await;
        Ok(guard
            .monitors
            .values()
            .cloned()
            .map(|m| guard.with_tag_details(m))
            .collect())
    }

    async fn create_monitor(&self, monitor: &Monitor) -> Result<i64> {
        let mut guard = self.inner.write().await;
        guard.check_tags("addMonitorTag", &monitor.tags)?;

        let id = guard.next_id("monitor");
        let mut stored = monitor.clone();
        stored.id = Some(id);
        guard.monitors.insert(id, stored);
        guard.record(format!("add:{id}"));
        Ok(id)
    }

    async fn update_monitor(&self, monitor: &Monitor) -> Result<()> {
        let id = require_id("monitor", monitor.id)?;
        let mut guard = self.inner.write().await;
        if !guard.monitors.contains_key(&id) {
            return Err(missing("monitor", id));
        }
        guard.check_tags("addMonitorTag", &monitor.tags)?;

        guard.monitors.insert(id, monitor.clone());
        guard.record(format!("editMonitor:{id}"));
        Ok(())
    }

    async fn delete_monitor(&self, id: i64) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.monitors.remove(&id).ok_or_else(|| missing("monitor", id))?;
        for monitors in guard.maintenance_monitors.values_mut() {
            monitors.retain(|m| *m != id);
        }
        guard.record(format!("deleteMonitor:{id}"));
        Ok(())
    }

    async fn pause_monitor(&self, id: i64) -> Result<()> {
        let mut guard = self.inner.write().await;
        let monitor = guard.monitors.get_mut(&id).ok_or_else(|| missing("monitor", id))?;
        monitor.active = false;
        guard.record(format!("pauseMonitor:{id}"));
        Ok(())
    }

    async fn resume_monitor(&self, id: i64) -> Result<()> {
        let mut guard = self.inner.write().await;
        let monitor = guard.monitors.get_mut(&id).ok_or_else(|| missing("monitor", id))?;
        monitor.active = true;
        guard.record(format!("resumeMonitor:{id}"));
        Ok(())
    }

    async fn add_monitor_tag(&self, monitor_id: i64, tag: &MonitorTag) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.check_tags("addMonitorTag", std::slice::from_ref(tag))?;
        let monitor = guard
            .monitors
            .get_mut(&monitor_id)
            .ok_or_else(|| missing("monitor", monitor_id))?;
        monitor.tags.push(MonitorTag::new(tag.tag_id, tag.value.clone()));
        guard.record(format!("addMonitorTag:{monitor_id}:{}", tag.tag_id));
        Ok(())
    }

    async fn delete_monitor_tag(&self, monitor_id: i64, tag: &MonitorTag) -> Result<()> {
        let mut guard = self.inner.write().await;
        let monitor = guard
            .monitors
            .get_mut(&monitor_id)
            .ok_or_else(|| missing("monitor", monitor_id))?;
        monitor.tags.retain(|t| t.key() != tag.key());
        guard.record(format!("deleteMonitorTag:{monitor_id}:{}", tag.tag_id));
        Ok(())
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        Ok(self.inner.read().await.notifications.values().cloned().collect())
    }

    async fn create_notification(&self, notification: &Notification) -> Result<i64> {
        let mut guard = self.inner.write().await;
        let id = guard.next_id("notification");
        let mut stored = notification.clone();
        stored.id = Some(id);
        guard.notifications.insert(id, stored);
        guard.record(format!("addNotification:{id}"));
        Ok(id)
    }

    async fn update_notification(&self, notification: &Notification) -> Result<()> {
        let id = require_id("notification", notification.id)?;
        let mut guard = self.inner.write().await;
        if !guard.notifications.contains_key(&id) {
            return Err(missing("notification", id));
        }
        guard.notifications.insert(id, notification.clone());
        guard.record(format!("addNotification:{id}"));
        Ok(())
    }

    async fn delete_notification(&self, id: i64) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard
            .notifications
            .remove(&id)
            .ok_or_else(|| missing("notification", id))?;
        for monitor in guard.monitors.values_mut() {
            monitor.notification_ids.retain(|n| *n != id);
        }
        guard.record(format!("deleteNotification:{id}"));
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.inner.read().await.tags.values().cloned().collect())
    }

    async fn create_tag(&self, tag: &Tag) -> Result<Tag> {
        let mut guard = self.inner.write().await;
        let id = guard.next_id("tag");
        let mut stored = tag.clone();
        stored.id = Some(id);
        guard.tags.insert(id, stored.clone());
        guard.record(format!("addTag:{id}"));
        Ok(stored)
    }

    async fn update_tag(&self, tag: &Tag) -> Result<()> {
        let id = require_id("tag", tag.id)?;
        let mut guard = self.inner.write().await;
        if !guard.tags.contains_key(&id) {
            return Err(missing("tag", id));
        }
        guard.tags.insert(id, tag.clone());
        guard.record(format!("editTag:{id}"));
        Ok(())
    }

    async fn delete_tag(&self, id: i64) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.tags.remove(&id).ok_or_else(|| missing("tag", id))?;
        for monitor in guard.monitors.values_mut() {
            monitor.tags.retain(|t| t.tag_id != id);
        }
        guard.record(format!("deleteTag:{id}"));
        Ok(())
    }

    async fn list_proxies(&self) -> Result<Vec<Proxy>> {
        Ok(self.inner.read().await.proxies.values().cloned().collect())
    }

    async fn create_proxy(&self, proxy: &Proxy) -> Result<i64> {
        let mut guard = self.inner.write().await;
        let id = guard.next_id("proxy");
        let mut stored = proxy.clone();
        stored.id = Some(id);
        stored.apply_existing = false;
        guard.proxies.insert(id, stored);
        guard.record(format!("addProxy:{id}"));
        Ok(id)
    }

    async fn update_proxy(&self, proxy: &Proxy) -> Result<()> {
        let id = require_id("proxy", proxy.id)?;
        let mut guard = self.inner.write().await;
        if !guard.proxies.contains_key(&id) {
            return Err(missing("proxy", id));
        }
        let mut stored = proxy.clone();
        stored.apply_existing = false;
        guard.proxies.insert(id, stored);
        guard.record(format!("addProxy:{id}"));
        Ok(())
    }

    async fn delete_proxy(&self, id: i64) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.proxies.remove(&id).ok_or_else(|| missing("proxy", id))?;
        guard.record(format!("deleteProxy:{id}"));
        Ok(())
    }

    async fn list_docker_hosts(&self) -> Result<Vec<DockerHost>> {
        Ok(self.inner.read().await.docker_hosts.values().cloned().collect())
    }

    async fn create_docker_host(&self, host: &DockerHost) -> Result<i64> {
        let mut guard = self.inner.write().await;
        let id = guard.next_id("docker_host");
        let mut stored = host.clone();
        stored.id = Some(id);
        guard.docker_hosts.insert(id, stored);
        guard.record(format!("addDockerHost:{id}"));
        Ok(id)
    }

    async fn update_docker_host(&self, host: &DockerHost) -> Result<()> {
        let id = require_id("docker host", host.id)?;
        let mut guard = self.inner.write().await;
        if !guard.docker_hosts.contains_key(&id) {
            return Err(missing("docker host", id));
        }
        guard.docker_hosts.insert(id, host.clone());
        guard.record(format!("addDockerHost:{id}"));
        Ok(())
    }

    async fn delete_docker_host(&self, id: i64) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard
            .docker_hosts
            .remove(&id)
            .ok_or_else(|| missing("docker host", id))?;
        guard.record(format!("deleteDockerHost:{id}"));
        Ok(())
    }

    async fn list_maintenances(&self) -> Result<Vec<Maintenance>> {
        Ok(self.inner.read().await.maintenances.values().cloned().collect())
    }

    async fn create_maintenance(&self, maintenance: &Maintenance) -> Result<i64> {
        let mut guard = self.inner.write().await;
        let id = guard.next_id("maintenance");
        let mut stored = maintenance.clone();
        stored.id = Some(id);
        guard.maintenances.insert(id, stored);
        guard.record(format!("addMaintenance:{id}"));
        Ok(id)
    }

    async fn update_maintenance(&self, maintenance: &Maintenance) -> Result<()> {
        let id = require_id("maintenance", maintenance.id)?;
        let mut guard = self.inner.write().await;
        if !guard.maintenances.contains_key(&id) {
            return Err(missing("maintenance", id));
        }
        guard.maintenances.insert(id, maintenance.clone());
        guard.record(format!("editMaintenance:{id}"));
        Ok(())
    }

    async fn delete_maintenance(&self, id: i64) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard
            .maintenances
            .remove(&id)
            .ok_or_else(|| missing("maintenance", id))?;
        guard.maintenance_monitors.remove(&id);
        guard.maintenance_status_pages.remove(&id);
        guard.record(format!("deleteMaintenance:{id}"));
        Ok(())
    }

    async fn get_maintenance_monitors(&self, id: i64) -> Result<Vec<i64>> {
        let guard = self.inner.read().await;
        if !guard.maintenances.contains_key(&id) {
            return Err(missing("maintenance", id));
        }
        Ok(guard.maintenance_monitors.get(&id).cloned().unwrap_or_default())
    }

    async fn set_maintenance_monitors(&self, id: i64, monitor_ids: &[i64]) -> Result<()> {
        let mut guard = self.inner.write().await;
        if !guard.maintenances.contains_key(&id) {
            return Err(missing("maintenance", id));
        }
        if let Some(unknown) = monitor_ids.iter().find(|m| !guard.monitors.contains_key(*m)) {
            return Err(Error::api(
                "addMonitorMaintenance",
                format!("monitor {unknown} does not exist"),
            ));
        }
        guard.maintenance_monitors.insert(id, monitor_ids.to_vec());
        guard.record(format!("addMonitorMaintenance:{id}"));
        Ok(())
    }

    async fn get_maintenance_status_pages(&self, id: i64) -> Result<Vec<i64>> {
        let guard = self.inner.read().await;
        if !guard.maintenances.contains_key(&id) {
            return Err(missing("maintenance", id));
        }
        Ok(guard
            .maintenance_status_pages
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_maintenance_status_pages(&self, id: i64, status_page_ids: &[i64]) -> Result<()> {
        let mut guard = self.inner.write().await;
        if !guard.maintenances.contains_key(&id) {
            return Err(missing("maintenance", id));
        }
        guard.maintenance_status_pages.insert(id, status_page_ids.to_vec());
        guard.record(format!("addMaintenanceStatusPage:{id}"));
        Ok(())
    }

    async fn list_status_pages(&self) -> Result<Vec<StatusPage>> {
        let guard = self.inner.read().await;
        Ok(guard
            .status_pages
            .values()
            .map(|page| StatusPage {
                public_groups: Vec::new(),
                ..page.clone()
            })
            .collect())
    }

    async fn get_status_page(&self, slug: &str) -> Result<StatusPage> {
        self.inner
            .read()
            .await
            .status_pages
            .get(slug)
            .cloned()
            .ok_or_else(|| missing("status page", slug))
    }

    async fn create_status_page(&self, title: &str, slug: &str) -> Result<()> {
        let mut guard = self.inner.write().await;
        if guard.status_pages.contains_key(slug) {
            return Err(Error::api("addStatusPage", "Slug is already taken"));
        }
        let id = guard.next_id("status_page");
        let mut page = StatusPage::new(slug, title);
        page.id = Some(id);
        guard.status_pages.insert(slug.to_string(), page);
        guard.record(format!("addStatusPage:{slug}"));
        Ok(())
    }

    async fn save_status_page(&self, page: &StatusPage) -> Result<Vec<PublicGroup>> {
        let mut guard = self.inner.write().await;
        let id = guard
            .status_pages
            .get(&page.slug)
            .ok_or_else(|| missing("status page", &page.slug))?
            .id;

        let mut groups = page.public_groups.clone();
        for group in &mut groups {
            if group.id.is_none() {
                group.id = Some(guard.next_id("public_group"));
            }
        }

        let mut stored = page.clone();
        stored.id = id;
        stored.public_groups = groups.clone();
        guard.status_pages.insert(page.slug.clone(), stored);
        guard.record(format!("saveStatusPage:{}", page.slug));
        Ok(groups)
    }

    async fn delete_status_page(&self, slug: &str) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard
            .status_pages
            .remove(slug)
            .ok_or_else(|| missing("status page", slug))?;
        guard.record(format!("deleteStatusPage:{slug}"));
        Ok(())
    }
}
