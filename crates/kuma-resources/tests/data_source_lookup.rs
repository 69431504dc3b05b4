//! Contract Test: Data Source Lookups
//!
//! Verifies ID/name disambiguation across data sources:
//! - Neither key given is invalid input
//! - A unique name resolves; duplicates are ambiguous until an ID is given
//! - An ID with a mismatching name is rejected
//! - Type filters narrow monitor and notification lookups

mod common;

use common::*;
use kuma_core::model::{Monitor, MonitorType, Notification, Proxy};
use kuma_core::{Error, KumaApi, MemoryKumaApi};
use serde_json::json;

async fn seed_monitors(api: &MemoryKumaApi) -> (i64, i64, i64) {
    let a = api
        .create_monitor(&Monitor::new("shared", MonitorType::Http).with_setting("url", "https://a.example"))
        .await
        .unwrap();
    let b = api
        .create_monitor(&Monitor::new("shared", MonitorType::Ping).with_setting("hostname", "b.example"))
        .await
        .unwrap();
    let c = api
        .create_monitor(&Monitor::new("unique", MonitorType::Port).with_setting("hostname", "c.example"))
        .await
        .unwrap();
    (a, b, c)
}

#[tokio::test]
async fn monitor_lookup_rules() {
    let (provider, api) = configured().await;
    let (a, b, c) = seed_monitors(&api).await;

    let err = provider
        .read_data_source("uptimekuma_monitor", state(json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let found = provider
        .read_data_source("uptimekuma_monitor", state(json!({ "name": "unique" })))
        .await
        .unwrap();
    assert_eq!(found.id().unwrap(), c);
    assert_eq!(found.string("hostname").unwrap().as_deref(), Some("c.example"));
    assert_eq!(found.string("type").unwrap().as_deref(), Some("port"));

    let err = provider
        .read_data_source("uptimekuma_monitor", state(json!({ "name": "shared" })))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Ambiguous(ref msg) if msg.contains("multiple monitors")));

    let by_id = provider
        .read_data_source("uptimekuma_monitor", state(json!({ "id": b, "name": "shared" })))
        .await
        .unwrap();
    assert_eq!(by_id.string("type").unwrap().as_deref(), Some("ping"));

    let by_type = provider
        .read_data_source("uptimekuma_monitor", state(json!({ "name": "shared", "type": "http" })))
        .await
        .unwrap();
    assert_eq!(by_type.id().unwrap(), a);
    assert_eq!(by_type.string("url").unwrap().as_deref(), Some("https://a.example"));

    let err = provider
        .read_data_source("uptimekuma_monitor", state(json!({ "id": a, "name": "unique" })))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = provider
        .read_data_source("uptimekuma_monitor", state(json!({ "name": "missing" })))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(ref msg) if msg.contains("no monitor found")));
}

#[tokio::test]
async fn notification_type_filter() {
    let (provider, api) = configured().await;
    api.create_notification(&Notification::new("alerts", "slack"))
        .await
        .unwrap();
    let discord = api
        .create_notification(&Notification::new("alerts", "discord"))
        .await
        .unwrap();

    let err = provider
        .read_data_source("uptimekuma_notification", state(json!({ "name": "alerts" })))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Ambiguous(_)));

    let found = provider
        .read_data_source(
            "uptimekuma_notification",
            state(json!({ "name": "alerts", "type": "discord" })),
        )
        .await
        .unwrap();
    assert_eq!(found.id().unwrap(), discord);
}

#[tokio::test]
async fn proxy_by_host_and_tag_by_id() {
    let (provider, api) = configured().await;
    api.create_proxy(&Proxy::new("http", "squid.internal", 3128))
        .await
        .unwrap();
    let tag = create(&provider, "uptimekuma_tag", json!({ "name": "edge", "color": "#ff8800" })).await;

    let proxy = provider
        .read_data_source("uptimekuma_proxy", state(json!({ "host": "squid.internal" })))
        .await
        .unwrap();
    assert_eq!(proxy.int("port").unwrap(), Some(3128));

    let found = provider
        .read_data_source("uptimekuma_tag", state(json!({ "id": tag.id().unwrap() })))
        .await
        .unwrap();
    assert_eq!(found.string("color").unwrap().as_deref(), Some("#ff8800"));
}

#[tokio::test]
async fn status_page_by_slug() {
    let (provider, _api) = configured().await;
    let monitor = create(
        &provider,
        "uptimekuma_monitor_http",
        json!({ "name": "site", "url": "https://example.com" }),
    )
    .await;
    create(
        &provider,
        "uptimekuma_status_page",
        json!({
            "slug": "ops",
            "title": "Ops",
            "public_groups": [{ "name": "All", "monitor_ids": [monitor.id().unwrap()] }]
        }),
    )
    .await;

    let page = provider
        .read_data_source("uptimekuma_status_page", state(json!({ "slug": "ops" })))
        .await
        .unwrap();
    assert_eq!(page.string("title").unwrap().as_deref(), Some("Ops"));
    assert_eq!(page.int_list("monitor_ids").unwrap(), vec![monitor.id().unwrap()]);

    let err = provider
        .read_data_source("uptimekuma_status_page", state(json!({ "slug": "nope" })))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
