// # Uptime Kuma resources
//
// Resource and data source implementations for the provider.
//
// ## Resources
//
// - `uptimekuma_monitor_<kind>`: one resource per monitor kind
// - `uptimekuma_notification_<kind>` and the generic `uptimekuma_notification`
// - `uptimekuma_tag`, `uptimekuma_proxy`, `uptimekuma_docker_host`
// - `uptimekuma_maintenance`, `uptimekuma_status_page`
//
// ## Data Sources
//
// Lookups by ID and/or name for monitors, notifications, tags, proxies,
// docker hosts and maintenances, and by slug for status pages.
//
// ## Conventions
//
// - Every operation talks to Kuma only through `KumaApi`
// - Create and update read the entity back, so state reflects the server
// - Read returns `None` when the entity is gone
// - Sensitive attributes are never logged

pub mod data_sources;
pub mod docker_host;
pub mod fields;
pub mod maintenance;
pub mod monitor;
pub mod notification;
pub mod proxy;
pub mod status_page;
pub mod tag;

use kuma_core::ResourceRegistry;
use std::sync::Arc;

pub use docker_host::DockerHostResource;
pub use maintenance::MaintenanceResource;
pub use monitor::MonitorResource;
pub use notification::{GenericNotificationResource, NotificationResource};
pub use proxy::ProxyResource;
pub use status_page::StatusPageResource;
pub use tag::TagResource;

/// Register every resource and data source with the registry
///
/// # Example
///
/// ```
/// use kuma_core::ResourceRegistry;
///
/// let mut registry = ResourceRegistry::new();
/// kuma_resources::register(&mut registry);
/// assert!(registry.has_resource("uptimekuma_monitor_http"));
/// ```
pub fn register(registry: &mut ResourceRegistry) {
    for monitor in MonitorResource::all() {
        registry.register_resource(Arc::new(monitor));
    }
    for notification in NotificationResource::all() {
        registry.register_resource(Arc::new(notification));
    }
    registry.register_resource(Arc::new(GenericNotificationResource));
    registry.register_resource(Arc::new(TagResource));
    registry.register_resource(Arc::new(ProxyResource));
    registry.register_resource(Arc::new(DockerHostResource));
    registry.register_resource(Arc::new(MaintenanceResource));
    registry.register_resource(Arc::new(StatusPageResource));

    registry.register_data_source(Arc::new(data_sources::MonitorDataSource));
    registry.register_data_source(Arc::new(data_sources::NotificationDataSource));
    registry.register_data_source(Arc::new(data_sources::TagDataSource));
    registry.register_data_source(Arc::new(data_sources::ProxyDataSource));
    registry.register_data_source(Arc::new(data_sources::DockerHostDataSource));
    registry.register_data_source(Arc::new(data_sources::MaintenanceDataSource));
    registry.register_data_source(Arc::new(data_sources::StatusPageDataSource));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_everything() {
        let mut registry = ResourceRegistry::new();
        register(&mut registry);

        // 17 monitor kinds, 15 notification kinds, generic notification, 5 others
        assert_eq!(registry.list_resources().len(), 38);
        assert_eq!(registry.list_data_sources().len(), 7);
        assert!(registry.has_resource("uptimekuma_notification_google_chat"));
        assert!(registry.has_data_source("uptimekuma_status_page"));
    }

    #[test]
    fn every_schema_has_an_id() {
        let mut registry = ResourceRegistry::new();
        register(&mut registry);
        for name in registry.list_resources() {
            let schema = registry.resource(&name).unwrap().schema();
            assert!(schema.get("id").is_some(), "{name} has no id");
        }
    }
}
