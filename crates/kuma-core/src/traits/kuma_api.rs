// # Uptime Kuma API Trait
//
// Defines the interface resources use to talk to an Uptime Kuma server.
//
// ## Implementations
//
// - Socket.IO client: `kuma-client` crate
// - In-memory: `kuma_core::api::MemoryKumaApi` (tests, offline planning)
//
// ## Usage
//
// ```rust,ignore
// use kuma_core::KumaApi;
//
// async fn pause_all(api: &dyn KumaApi) -> kuma_core::Result<()> {
//     for monitor in api.list_monitors().await? {
//         if let Some(id) = monitor.id {
//             api.pause_monitor(id).await?;
//         }
//     }
//     Ok(())
// }
// ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::model::{
    DockerHost, Maintenance, Monitor, MonitorTag, Notification, Proxy, PublicGroup, StatusPage, Tag,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Operations on an Uptime Kuma server
///
/// `get_*` methods default to a linear scan over the matching `list_*`
/// call and return [`Error::NotFound`] when the entity is absent.
/// Implementations override them where the server offers a direct lookup.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait KumaApi: Send + Sync {
    // Monitors

    async fn list_monitors(&self) -> Result<Vec<Monitor>>;

    async fn get_monitor(&self, id: i64) -> Result<Monitor> {
        find_by_id(self.list_monitors().await?, id, |m| m.id, "monitor")
    }

    /// Create a monitor, attach its tags and apply its active flag
    ///
    /// Returns the new monitor ID.
    async fn create_monitor(&self, monitor: &Monitor) -> Result<i64>;

    /// Replace a monitor, reconciling its tags and active flag
    async fn update_monitor(&self, monitor: &Monitor) -> Result<()>;

    async fn delete_monitor(&self, id: i64) -> Result<()>;

    async fn pause_monitor(&self, id: i64) -> Result<()>;

    async fn resume_monitor(&self, id: i64) -> Result<()>;

    /// Attach a tag to a monitor
    async fn add_monitor_tag(&self, monitor_id: i64, tag: &MonitorTag) -> Result<()>;

    /// Detach a tag from a monitor
    async fn delete_monitor_tag(&self, monitor_id: i64, tag: &MonitorTag) -> Result<()>;

    // Notifications

    async fn list_notifications(&self) -> Result<Vec<Notification>>;

    async fn get_notification(&self, id: i64) -> Result<Notification> {
        find_by_id(self.list_notifications().await?, id, |n| n.id, "notification")
    }

    async fn create_notification(&self, notification: &Notification) -> Result<i64>;

    async fn update_notification(&self, notification: &Notification) -> Result<()>;

    async fn delete_notification(&self, id: i64) -> Result<()>;

    // Tags

    async fn list_tags(&self) -> Result<Vec<Tag>>;

    async fn get_tag(&self, id: i64) -> Result<Tag> {
        find_by_id(self.list_tags().await?, id, |t| t.id, "tag")
    }

    /// Create a tag, returning it with its ID filled in
    async fn create_tag(&self, tag: &Tag) -> Result<Tag>;

    async fn update_tag(&self, tag: &Tag) -> Result<()>;

    async fn delete_tag(&self, id: i64) -> Result<()>;

    // Proxies

    async fn list_proxies(&self) -> Result<Vec<Proxy>>;

    async fn get_proxy(&self, id: i64) -> Result<Proxy> {
        find_by_id(self.list_proxies().await?, id, |p| p.id, "proxy")
    }

    async fn create_proxy(&self, proxy: &Proxy) -> Result<i64>;

    async fn update_proxy(&self, proxy: &Proxy) -> Result<()>;

    async fn delete_proxy(&self, id: i64) -> Result<()>;

    // Docker hosts

    async fn list_docker_hosts(&self) -> Result<Vec<DockerHost>>;

    async fn get_docker_host(&self, id: i64) -> Result<DockerHost> {
        find_by_id(self.list_docker_hosts().await?, id, |h| h.id, "docker host")
    }

    async fn create_docker_host(&self, host: &DockerHost) -> Result<i64>;

    async fn update_docker_host(&self, host: &DockerHost) -> Result<()>;

    async fn delete_docker_host(&self, id: i64) -> Result<()>;

    // Maintenance windows

    async fn list_maintenances(&self) -> Result<Vec<Maintenance>>;

    async fn get_maintenance(&self, id: i64) -> Result<Maintenance> {
        find_by_id(self.list_maintenances().await?, id, |m| m.id, "maintenance")
    }

    /// Create a maintenance window and apply its active flag
    async fn create_maintenance(&self, maintenance: &Maintenance) -> Result<i64>;

    async fn update_maintenance(&self, maintenance: &Maintenance) -> Result<()>;

    async fn delete_maintenance(&self, id: i64) -> Result<()>;

    /// Monitors affected by a maintenance window
    async fn get_maintenance_monitors(&self, id: i64) -> Result<Vec<i64>>;

    /// Replace the monitors affected by a maintenance window
    async fn set_maintenance_monitors(&self, id: i64, monitor_ids: &[i64]) -> Result<()>;

    /// Status pages showing a maintenance window
    async fn get_maintenance_status_pages(&self, id: i64) -> Result<Vec<i64>>;

    /// Replace the status pages showing a maintenance window
    async fn set_maintenance_status_pages(&self, id: i64, status_page_ids: &[i64]) -> Result<()>;

    // Status pages

    /// Status pages without their public groups
    async fn list_status_pages(&self) -> Result<Vec<StatusPage>>;

    /// A status page including its public groups
    async fn get_status_page(&self, slug: &str) -> Result<StatusPage>;

    /// Create an empty status page
    async fn create_status_page(&self, title: &str, slug: &str) -> Result<()>;

    /// Save a status page config and its public groups
    ///
    /// Returns the public groups as stored, with IDs filled in.
    async fn save_status_page(&self, page: &StatusPage) -> Result<Vec<PublicGroup>>;

    async fn delete_status_page(&self, slug: &str) -> Result<()>;
}

/// Helper trait for constructing API clients from configuration
#[async_trait]
pub trait KumaApiFactory: Send + Sync {
    /// Connect (and log in) using a resolved configuration
    async fn connect(&self, config: &ProviderConfig) -> Result<Arc<dyn KumaApi>>;
}

/// Find an entity by ID in a listed collection
pub fn find_by_id<T>(items: Vec<T>, id: i64, id_of: impl Fn(&T) -> Option<i64>, kind: &str) -> Result<T> {
    items
        .into_iter()
        .find(|item| id_of(item) == Some(id))
        .ok_or_else(|| Error::not_found(format!("{kind} {id} does not exist")))
}
