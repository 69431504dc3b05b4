//! Core traits for the provider
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`KumaApi`]: Operations on an Uptime Kuma server
//! - [`Resource`]: A managed Terraform resource type
//! - [`DataSource`]: A read-only Terraform data source type

pub mod kuma_api;
pub mod resource;

pub use kuma_api::{KumaApi, KumaApiFactory, find_by_id};
pub use resource::{DataSource, Resource};
