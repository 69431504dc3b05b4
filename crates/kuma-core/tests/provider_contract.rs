//! Contract Test: Provider Dispatcher
//!
//! Verifies how the dispatcher drives resources:
//! - Operations needing a connection fail before configure
//! - Apply picks create/update/delete from prior/planned presence
//! - Reads report objects deleted out of band as gone
//! - Deleting an already-deleted object succeeds with a warning
//! - Errors surface as diagnostics, never as panics

mod common;

use common::*;
use kuma_core::config::ProviderSettings;
use kuma_core::{Error, KumaApi, MemoryKumaApi, Request, Severity};
use serde_json::json;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn operations_before_configure_fail() {
    let provider = provider(Arc::new(MemoryKumaApi::new()));

    let err = provider
        .apply("test_tag", None, Some(state(json!({ "name": "prod", "color": "#fff" }))))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("not configured"));

    // Validation and planning need no connection
    assert_ok!(provider.validate_resource("test_tag", &state(json!({ "name": "prod" }))));
    assert_ok!(provider.plan("test_tag", None, Some(state(json!({ "name": "prod" })))));
}

#[tokio::test]
async fn configure_prefers_explicit_settings_over_environment() {
    let factory = Arc::new(RecordingFactory::default());
    let provider = kuma_core::Provider::new(registry(), factory.clone()).with_env_lookup(|key| {
        match key {
            "UPTIMEKUMA_ENDPOINT" => Some("http://env:3001".to_string()),
            "UPTIMEKUMA_USERNAME" => Some("env-user".to_string()),
            "UPTIMEKUMA_PASSWORD" => Some("env-pass".to_string()),
            _ => None,
        }
    });

    let settings = ProviderSettings {
        endpoint: Some("https://kuma.example.com/".to_string()),
        username: Some(String::new()),
        password: None,
    };
    assert_ok!(provider.configure(&settings).await);
    assert!(provider.is_configured().await);

    let seen = factory.seen.lock().unwrap();
    assert_eq!(seen[0].endpoint, "https://kuma.example.com");
    // Empty explicit values fall through to the environment
    assert_eq!(seen[0].username.as_deref(), Some("env-user"));
    assert_eq!(seen[0].password.as_deref(), Some("env-pass"));
}

#[tokio::test]
async fn configure_without_endpoint_is_a_config_error() {
    let provider = provider(Arc::new(MemoryKumaApi::new()));
    let err = assert_err!(provider.configure(&ProviderSettings::default()).await);
    assert!(matches!(err, Error::Config(_)));
    assert!(!provider.is_configured().await);
}

#[tokio::test]
async fn rejected_login_becomes_an_error_diagnostic() {
    let provider = provider(Arc::new(RejectingFactory));

    let response = provider
        .handle(Request::ConfigureProvider {
            config: ProviderSettings {
                endpoint: Some("http://localhost:3001".to_string()),
                username: Some("admin".to_string()),
                password: Some("wrong".to_string()),
            },
        })
        .await;

    assert!(response.has_errors());
    assert_eq!(response.diagnostics[0].summary, "Authentication failed");
}

#[tokio::test]
async fn apply_runs_full_lifecycle() {
    let api = MemoryKumaApi::new();
    let provider = provider(Arc::new(api.clone()));
    provider
        .configure(&ProviderSettings {
            endpoint: Some("http://localhost:3001".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    // Create
    let plan = provider
        .plan("test_tag", None, Some(state(json!({ "name": "prod" }))))
        .unwrap();
    assert_eq!(plan.unknown_attributes, vec!["id"]);
    let created = provider
        .apply("test_tag", None, plan.planned_state)
        .await
        .unwrap()
        .new_state
        .unwrap();
    assert_eq!(created.get("id"), Some(&json!(1)));
    assert_eq!(created.get("color"), Some(&json!("#000000")));

    // Update
    let plan = provider
        .plan(
            "test_tag",
            Some(created.clone()),
            Some(state(json!({ "name": "production", "color": "#000000" }))),
        )
        .unwrap();
    let updated = provider
        .apply("test_tag", Some(created), plan.planned_state)
        .await
        .unwrap()
        .new_state
        .unwrap();
    assert_eq!(updated.get("name"), Some(&json!("production")));
    assert_eq!(api.get_tag(1).await.unwrap().name, "production");

    // Delete
    let applied = provider.apply("test_tag", Some(updated), None).await.unwrap();
    assert_eq!(applied.new_state, None);
    assert!(applied.warnings.is_empty());
    assert!(api.list_tags().await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_band_deletion_is_reported_gone() {
    let api = MemoryKumaApi::new();
    let provider = provider(Arc::new(api.clone()));
    provider
        .configure(&ProviderSettings {
            endpoint: Some("http://localhost:3001".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let created = provider
        .apply("test_tag", None, Some(state(json!({ "name": "prod", "color": "#fff" }))))
        .await
        .unwrap()
        .new_state
        .unwrap();
    api.delete_tag(1).await.unwrap();

    assert_eq!(provider.read("test_tag", created.clone()).await.unwrap(), None);

    let applied = provider.apply("test_tag", Some(created), None).await.unwrap();
    assert_eq!(applied.warnings.len(), 1);
    assert_eq!(applied.warnings[0].severity, Severity::Warning);
}

#[tokio::test]
async fn import_reads_by_numeric_id() {
    let api = MemoryKumaApi::new();
    api.create_tag(&kuma_core::model::Tag::new("prod", "#ff0000"))
        .await
        .unwrap();
    let provider = provider(Arc::new(api));
    provider
        .configure(&ProviderSettings {
            endpoint: Some("http://localhost:3001".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let imported = provider.import("test_tag", "1").await.unwrap();
    assert_eq!(imported.get("name"), Some(&json!("prod")));

    assert!(matches!(
        provider.import("test_tag", "abc").await,
        Err(Error::InvalidInput(_))
    ));
    assert!(provider.import("test_tag", "7").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn handle_serves_schema_and_data_sources() {
    let provider = provider(Arc::new(MemoryKumaApi::new()));

    let response = provider.handle(Request::GetSchema).await;
    assert!(!response.has_errors());
    assert!(response.result["resources"]["test_tag"]["attributes"]["name"].is_object());
    assert_eq!(
        response.result["provider"]["attributes"]["password"]["sensitive"],
        json!(true)
    );

    provider
        .configure(&ProviderSettings {
            endpoint: Some("http://localhost:3001".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let response = provider
        .handle(Request::ReadDataSource {
            type_name: "test_echo".to_string(),
            config: state(json!({ "name": "kuma" })),
        })
        .await;
    assert_eq!(response.result["state"]["greeting"], json!("hello kuma"));

    let response = provider
        .handle(Request::ReadResource {
            type_name: "test_unknown".to_string(),
            current_state: state(json!({ "id": 1 })),
        })
        .await;
    assert!(response.has_errors());
}
