//! Contract Test: Monitor Resources
//!
//! Verifies, against the in-memory Kuma:
//! - Create applies defaults and reads back tags and notifications
//! - Update changes settings and pauses through the active flag
//! - Push tokens are generated once and survive updates
//! - A monitor of another type cannot be read through the wrong resource
//! - Import by ID and out-of-band deletion

mod common;

use common::*;
use kuma_core::{Error, KumaApi, Severity};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn http_monitor_lifecycle() {
    let (provider, api) = configured().await;

    let tag = create(&provider, "uptimekuma_tag", json!({ "name": "prod", "color": "#2ecc71" })).await;
    let slack = create(
        &provider,
        "uptimekuma_notification_slack",
        json!({ "name": "ops", "webhook_url": "https://hooks.slack.test/x" }),
    )
    .await;

    let monitor = create(
        &provider,
        "uptimekuma_monitor_http",
        json!({
            "name": "website",
            "url": "https://example.com",
            "tags": [{ "tag_id": tag.id().unwrap(), "value": "eu" }],
            "notification_ids": [slack.id().unwrap()]
        }),
    )
    .await;

    assert_eq!(monitor.string("name").unwrap().as_deref(), Some("website"));
    assert_eq!(monitor.int("interval").unwrap(), Some(60));
    assert_eq!(monitor.int("timeout").unwrap(), Some(48));
    assert_eq!(
        monitor.string_list("accepted_status_codes").unwrap(),
        vec!["200-299"]
    );
    assert_eq!(monitor.bool("active").unwrap(), Some(true));
    assert_eq!(monitor.int_list("notification_ids").unwrap(), vec![slack.id().unwrap()]);
    assert_eq!(
        monitor.get("tags"),
        Some(&json!([{ "tag_id": tag.id().unwrap(), "value": "eu" }]))
    );
    assert!(!monitor.is_set("description"));

    let updated = update(
        &provider,
        "uptimekuma_monitor_http",
        &monitor,
        json!({
            "name": "website",
            "url": "https://example.com/health",
            "active": false,
            "max_retries": 2,
            "tags": [{ "tag_id": tag.id().unwrap(), "value": "eu" }],
            "notification_ids": [slack.id().unwrap()]
        }),
    )
    .await;

    assert_eq!(updated.id().unwrap(), monitor.id().unwrap());
    assert_eq!(updated.string("url").unwrap().as_deref(), Some("https://example.com/health"));
    assert_eq!(updated.int("max_retries").unwrap(), Some(2));
    assert_eq!(updated.bool("active").unwrap(), Some(false));

    let stored = api.get_monitor(monitor.id().unwrap()).await.unwrap();
    assert!(!stored.active);
    assert_eq!(stored.settings["maxretries"], json!(2));

    let refreshed = provider
        .read("uptimekuma_monitor_http", updated.clone())
        .await
        .unwrap()
        .expect("monitor still exists");
    assert_eq!(refreshed, updated);

    assert!(destroy(&provider, "uptimekuma_monitor_http", &updated).await.is_empty());
    assert_eq!(api.monitor_count().await, 0);
}

#[tokio::test]
async fn push_token_is_generated_and_kept() {
    let (provider, _api) = configured().await;

    let plan = provider
        .plan("uptimekuma_monitor_push", None, Some(state(json!({ "name": "backup job" }))))
        .unwrap();
    assert!(plan.unknown_attributes.contains(&"push_token".to_string()));

    let created = create(&provider, "uptimekuma_monitor_push", json!({ "name": "backup job" })).await;
    let token = created.string("push_token").unwrap().expect("token generated");
    assert_eq!(token.len(), 32);

    let updated = update(
        &provider,
        "uptimekuma_monitor_push",
        &created,
        json!({ "name": "nightly backup" }),
    )
    .await;
    assert_eq!(updated.string("push_token").unwrap(), Some(token));
}

#[tokio::test]
async fn wrong_monitor_type_is_rejected() {
    let (provider, _api) = configured().await;
    let ping = create(
        &provider,
        "uptimekuma_monitor_ping",
        json!({ "name": "gateway", "hostname": "10.0.0.1" }),
    )
    .await;

    let err = provider
        .read("uptimekuma_monitor_http", state(json!({ "id": ping.id().unwrap() })))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(ref msg) if msg.contains("ping")));
}

#[tokio::test]
async fn import_by_id() {
    let (provider, _api) = configured().await;
    let created = create(
        &provider,
        "uptimekuma_monitor_port",
        json!({ "name": "smtp", "hostname": "mail.example.com", "port": 25 }),
    )
    .await;

    let imported = assert_ok!(
        provider
            .import("uptimekuma_monitor_port", &created.id().unwrap().to_string())
            .await
    );
    assert_eq!(imported.string("hostname").unwrap().as_deref(), Some("mail.example.com"));
    assert_eq!(imported.int("port").unwrap(), Some(25));

    assert_err!(provider.import("uptimekuma_monitor_port", "42").await);
    assert_err!(provider.import("uptimekuma_monitor_port", "smtp").await);
}

#[tokio::test]
async fn deleted_out_of_band() {
    let (provider, api) = configured().await;
    let created = create(
        &provider,
        "uptimekuma_monitor_dns",
        json!({ "name": "resolver", "hostname": "example.com" }),
    )
    .await;
    assert_eq!(created.string("dns_resolve_type").unwrap().as_deref(), Some("A"));

    api.delete_monitor(created.id().unwrap()).await.unwrap();

    let read = provider.read("uptimekuma_monitor_dns", created.clone()).await.unwrap();
    assert!(read.is_none());

    let warnings = destroy(&provider, "uptimekuma_monitor_dns", &created).await;
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
}

#[tokio::test]
async fn unknown_tag_fails_create() {
    let (provider, api) = configured().await;
    let plan = provider
        .plan(
            "uptimekuma_monitor_group",
            None,
            Some(state(json!({ "name": "edge", "tags": [{ "tag_id": 99 }] }))),
        )
        .unwrap();

    let err = provider
        .apply("uptimekuma_monitor_group", None, plan.planned_state)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { .. }));
    assert_eq!(api.monitor_count().await, 0);
}
