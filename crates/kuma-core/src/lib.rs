// # kuma-core
//
// Core library for the Uptime Kuma Terraform provider.
//
// ## Architecture Overview
//
// This library provides everything the provider needs except the network
// client and the concrete resources:
// - **KumaApi**: Trait for operations on an Uptime Kuma server
// - **Resource / DataSource**: Traits for Terraform resource types
// - **Schema / State**: Attribute declarations and values
// - **ResourceRegistry**: Plugin-based registry of resource types
// - **Provider**: Dispatcher that serves provider RPCs
// - **lookup**: ID/name disambiguation shared by data sources
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Resources map fields, the client talks to Kuma
// 2. **Plugin-Based**: Resources are registered dynamically, no hard-coded match
// 3. **Library-First**: The dispatcher can be driven without the binary
// 4. **Testable**: `MemoryKumaApi` stands in for a server

pub mod api;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod protocol;
pub mod provider;
pub mod registry;
pub mod schema;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use api::MemoryKumaApi;
pub use config::{ProviderConfig, ProviderSettings};
pub use error::{Error, Result};
pub use protocol::{Diagnostic, PlanResult, Request, Response, Severity};
pub use provider::Provider;
pub use registry::ResourceRegistry;
pub use schema::{Attribute, AttributeType, Presence, Schema};
pub use state::State;
pub use traits::{DataSource, KumaApi, KumaApiFactory, Resource};
