//! Shared helpers: a provider configured against the in-memory Kuma

#![allow(dead_code)]

use kuma_core::config::ProviderSettings;
use kuma_core::{MemoryKumaApi, Provider, ResourceRegistry, State};
use serde_json::Value;
use std::sync::Arc;

/// A configured provider with every resource registered, and its backing store
pub async fn configured() -> (Provider, MemoryKumaApi) {
    let api = MemoryKumaApi::new();
    let mut registry = ResourceRegistry::new();
    kuma_resources::register(&mut registry);

    let provider = Provider::new(registry, Arc::new(api.clone())).with_env_lookup(|_| None);
    let settings = ProviderSettings {
        endpoint: Some("http://kuma.test:3001".to_string()),
        ..ProviderSettings::default()
    };
    provider.configure(&settings).await.expect("configure");
    (provider, api)
}

pub fn state(value: Value) -> State {
    serde_json::from_value(value).expect("state is a JSON object")
}

/// Validate, plan and apply a create
pub async fn create(provider: &Provider, type_name: &str, config: Value) -> State {
    let config = state(config);
    provider
        .validate_resource(type_name, &config)
        .unwrap_or_else(|e| panic!("{type_name} config rejected: {e}"));
    let plan = provider.plan(type_name, None, Some(config)).unwrap();
    provider
        .apply(type_name, None, plan.planned_state)
        .await
        .unwrap_or_else(|e| panic!("creating {type_name} failed: {e}"))
        .new_state
        .expect("created state")
}

/// Plan and apply an in-place update
pub async fn update(provider: &Provider, type_name: &str, prior: &State, config: Value) -> State {
    let plan = provider
        .plan(type_name, Some(prior.clone()), Some(state(config)))
        .unwrap();
    assert!(plan.requires_replace.is_empty(), "unexpected replacement: {:?}", plan.requires_replace);
    provider
        .apply(type_name, Some(prior.clone()), plan.planned_state)
        .await
        .unwrap_or_else(|e| panic!("updating {type_name} failed: {e}"))
        .new_state
        .expect("updated state")
}

/// Apply a destroy, returning the warnings
pub async fn destroy(provider: &Provider, type_name: &str, prior: &State) -> Vec<kuma_core::Diagnostic> {
    provider
        .apply(type_name, Some(prior.clone()), None)
        .await
        .unwrap_or_else(|e| panic!("deleting {type_name} failed: {e}"))
        .warnings
}
