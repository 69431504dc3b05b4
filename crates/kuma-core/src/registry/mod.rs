//! Resource and data source registry
//!
//! The registry maps Terraform type names to their implementations, so the
//! dispatcher never hardcodes a list of resources.
//!
//! ## Registration
//!
//! Implementation crates register themselves during initialization:
//!
//! ```rust,ignore
//! use kuma_core::registry::ResourceRegistry;
//!
//! // In kuma-resources
//! pub fn register(registry: &mut ResourceRegistry) {
//!     registry.register_resource(Arc::new(TagResource));
//!     registry.register_data_source(Arc::new(TagDataSource));
//! }
//! ```

use crate::error::{Error, Result};
use crate::traits::{DataSource, Resource};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Registry of resource and data source types
#[derive(Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, Arc<dyn Resource>>,
    data_sources: HashMap<String, Arc<dyn DataSource>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under its type name
    ///
    /// Registering the same type name twice replaces the earlier entry.
    pub fn register_resource(&mut self, resource: Arc<dyn Resource>) {
        let name = resource.type_name().to_string();
        if self.resources.insert(name.clone(), resource).is_some() {
            warn!("Resource type {} registered twice", name);
        }
    }

    /// Register a data source under its type name
    pub fn register_data_source(&mut self, data_source: Arc<dyn DataSource>) {
        let name = data_source.type_name().to_string();
        if self.data_sources.insert(name.clone(), data_source).is_some() {
            warn!("Data source type {} registered twice", name);
        }
    }

    /// Look up a resource type
    pub fn resource(&self, type_name: &str) -> Result<Arc<dyn Resource>> {
        self.resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown resource type: {type_name}")))
    }

    /// Look up a data source type
    pub fn data_source(&self, type_name: &str) -> Result<Arc<dyn DataSource>> {
        self.data_sources
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown data source type: {type_name}")))
    }

    /// List registered resource type names, sorted
    pub fn list_resources(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// List registered data source type names, sorted
    pub fn list_data_sources(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data_sources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, type_name: &str) -> bool {
        self.resources.contains_key(type_name)
    }

    /// Check if a data source type is registered
    pub fn has_data_source(&self, type_name: &str) -> bool {
        self.data_sources.contains_key(type_name)
    }
}
