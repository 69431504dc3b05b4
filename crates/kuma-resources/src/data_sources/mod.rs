//! Data sources
//!
//! Each data source looks up one existing entity by `id`, by name, or by
//! both, using [`kuma_core::lookup::find_unique`]. The status page data
//! source looks up by slug instead.

mod docker_host;
mod maintenance;
mod monitor;
mod notification;
mod proxy;
mod status_page;
mod tag;

pub use docker_host::DockerHostDataSource;
pub use maintenance::MaintenanceDataSource;
pub use monitor::MonitorDataSource;
pub use notification::NotificationDataSource;
pub use proxy::ProxyDataSource;
pub use status_page::StatusPageDataSource;
pub use tag::TagDataSource;

use kuma_core::{Attribute, AttributeType, Result, Schema, State};

/// Schema with the `id` and name-like lookup keys
fn lookup_schema(description: &str, name_attr: &str) -> Schema {
    Schema::new(description)
        .attribute(
            "id",
            Attribute::optional_computed(AttributeType::Number)
                .describe(format!("ID to look up, checked against {name_attr} when both are set")),
        )
        .attribute(
            name_attr,
            Attribute::optional_computed(AttributeType::String).describe(format!("{name_attr} to look up")),
        )
}

/// The `id` and name-like keys given in configuration
fn lookup_keys(config: &State, name_attr: &str) -> Result<(Option<i64>, Option<String>)> {
    Ok((config.int("id")?, config.string(name_attr)?))
}
