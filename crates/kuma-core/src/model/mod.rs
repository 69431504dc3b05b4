//! Uptime Kuma domain objects in their wire representation

pub mod maintenance;
pub mod monitor;
pub mod notification;
pub mod status_page;
pub mod tag;
pub mod wire;

pub use maintenance::{Maintenance, MaintenanceStrategy, TimeOfDay};
pub use monitor::{Monitor, MonitorTag, MonitorType};
pub use notification::Notification;
pub use status_page::{PublicGroup, StatusPage};
pub use tag::{DockerHost, Proxy, Tag};
