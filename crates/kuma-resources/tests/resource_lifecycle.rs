//! Contract Test: Non-Monitor Resources
//!
//! Verifies, against the in-memory Kuma:
//! - Notifications keep equivalent JSON configuration verbatim
//! - Tags, proxies and docker hosts round-trip their attributes
//! - Maintenance windows attach monitors and status pages
//! - Status pages are keyed by slug for read, import and replacement
//! - Invalid configuration surfaces as error diagnostics

mod common;

use common::*;
use kuma_core::{KumaApi, Request, Severity};
use serde_json::json;
use tokio_test::assert_ok;

#[tokio::test]
async fn generic_notification_keeps_config_text() {
    let (provider, api) = configured().await;
    let config_json = "{ \"gotifyserverurl\": \"https://push.example.com\", \"gotifyPriority\": 8 }";

    let created = create(
        &provider,
        "uptimekuma_notification",
        json!({ "name": "gotify", "type": "gotify", "config_json": config_json }),
    )
    .await;
    assert_eq!(created.string("config_json").unwrap().as_deref(), Some(config_json));
    assert_eq!(created.bool("active").unwrap(), Some(true));

    let stored = api.get_notification(created.id().unwrap()).await.unwrap();
    assert_eq!(stored.notification_type, "gotify");
    assert_eq!(stored.settings["gotifyPriority"], json!(8));

    let typed = provider
        .read("uptimekuma_notification_gotify", created.clone())
        .await
        .unwrap()
        .expect("readable through the typed resource");
    assert_eq!(typed.int("priority").unwrap(), Some(8));
}

#[tokio::test]
async fn tag_proxy_and_docker_host() {
    let (provider, _api) = configured().await;

    let tag = create(&provider, "uptimekuma_tag", json!({ "name": "db", "color": "#336699" })).await;
    let tag = update(&provider, "uptimekuma_tag", &tag, json!({ "name": "database", "color": "#336699" })).await;
    assert_eq!(tag.string("name").unwrap().as_deref(), Some("database"));

    let proxy = create(
        &provider,
        "uptimekuma_proxy",
        json!({ "protocol": "socks5", "host": "proxy.internal", "port": 1080, "username": "svc", "password": "s3cret" }),
    )
    .await;
    assert_eq!(proxy.bool("auth").unwrap(), Some(true));
    assert_eq!(proxy.string("password").unwrap().as_deref(), Some("s3cret"));
    assert_eq!(proxy.bool("apply_existing").unwrap(), Some(false));

    let host = create(
        &provider,
        "uptimekuma_docker_host",
        json!({ "name": "local", "docker_type": "socket", "docker_daemon": "/var/run/docker.sock" }),
    )
    .await;
    let docker = create(
        &provider,
        "uptimekuma_monitor_docker",
        json!({ "name": "api container", "docker_container": "api", "docker_host": host.id().unwrap() }),
    )
    .await;
    assert_eq!(docker.int("docker_host").unwrap(), Some(host.id().unwrap()));
}

#[tokio::test]
async fn proxy_auth_follows_credential_changes() {
    let (provider, api) = configured().await;
    let base = json!({ "protocol": "http", "host": "proxy.internal", "port": 3128 });

    let proxy = create(&provider, "uptimekuma_proxy", base.clone()).await;
    let id = proxy.id().unwrap();
    assert_eq!(proxy.bool("auth").unwrap(), Some(false));

    let proxy = update(
        &provider,
        "uptimekuma_proxy",
        &proxy,
        json!({ "protocol": "http", "host": "proxy.internal", "port": 3128, "username": "svc", "password": "s3cret" }),
    )
    .await;
    assert_eq!(proxy.bool("auth").unwrap(), Some(true));
    let stored = api.get_proxy(id).await.unwrap();
    assert!(stored.auth);
    assert_eq!(stored.username.as_deref(), Some("svc"));

    let proxy = update(&provider, "uptimekuma_proxy", &proxy, base).await;
    assert_eq!(proxy.bool("auth").unwrap(), Some(false));
    assert!(!api.get_proxy(id).await.unwrap().auth);

    // A configured value wins over the credentials
    let proxy = update(
        &provider,
        "uptimekuma_proxy",
        &proxy,
        json!({ "protocol": "http", "host": "proxy.internal", "port": 3128, "username": "svc", "auth": false }),
    )
    .await;
    assert_eq!(proxy.bool("auth").unwrap(), Some(false));
    assert!(!api.get_proxy(id).await.unwrap().auth);
}

#[tokio::test]
async fn maintenance_with_associations() {
    let (provider, api) = configured().await;
    let monitor = create(
        &provider,
        "uptimekuma_monitor_ping",
        json!({ "name": "db host", "hostname": "db.internal" }),
    )
    .await;
    let page = create(
        &provider,
        "uptimekuma_status_page",
        json!({ "slug": "status", "title": "Status" }),
    )
    .await;

    let window = create(
        &provider,
        "uptimekuma_maintenance",
        json!({
            "title": "Patch Tuesday",
            "strategy": "recurring-weekday",
            "weekdays": [2],
            "start_time": "02:00",
            "end_time": "04:00",
            "monitor_ids": [monitor.id().unwrap()],
            "status_page_ids": [page.int("id").unwrap().unwrap()]
        }),
    )
    .await;

    assert_eq!(window.string("start_time").unwrap().as_deref(), Some("02:00"));
    assert_eq!(window.string("timezone").unwrap().as_deref(), Some("SAME_AS_SERVER"));
    assert_eq!(window.int_list("monitor_ids").unwrap(), vec![monitor.id().unwrap()]);
    assert!(!window.is_set("start_date"));

    let id = window.id().unwrap();
    let window = update(
        &provider,
        "uptimekuma_maintenance",
        &window,
        json!({
            "title": "Patch Tuesday",
            "strategy": "recurring-weekday",
            "weekdays": [2],
            "start_time": "02:00",
            "end_time": "04:00",
            "status_page_ids": [page.int("id").unwrap().unwrap()]
        }),
    )
    .await;
    assert!(!window.is_set("monitor_ids"));
    assert!(api.get_maintenance_monitors(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn status_page_by_slug() {
    let (provider, api) = configured().await;
    let monitor = create(
        &provider,
        "uptimekuma_monitor_http",
        json!({ "name": "site", "url": "https://example.com" }),
    )
    .await;

    let page = create(
        &provider,
        "uptimekuma_status_page",
        json!({
            "slug": "public",
            "title": "Public status",
            "footer_text": "Operated by ops",
            "public_groups": [{ "name": "Web", "monitor_ids": [monitor.id().unwrap()] }]
        }),
    )
    .await;
    assert_eq!(page.string("theme").unwrap().as_deref(), Some("auto"));
    assert_eq!(
        page.get("public_groups"),
        Some(&json!([{ "name": "Web", "monitor_ids": [monitor.id().unwrap()] }]))
    );

    let imported = assert_ok!(provider.import("uptimekuma_status_page", "public").await);
    assert_eq!(imported.string("footer_text").unwrap().as_deref(), Some("Operated by ops"));

    let plan = provider
        .plan(
            "uptimekuma_status_page",
            Some(page.clone()),
            Some(state(json!({ "slug": "public-v2", "title": "Public status" }))),
        )
        .unwrap();
    assert_eq!(plan.requires_replace, vec!["slug"]);

    assert!(destroy(&provider, "uptimekuma_status_page", &page).await.is_empty());
    assert!(api.get_status_page("public").await.is_err());
    assert!(provider.read("uptimekuma_status_page", page).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_config_is_a_diagnostic() {
    let (provider, _api) = configured().await;

    let cases = [
        ("uptimekuma_tag", json!({ "name": "x", "color": "green" })),
        ("uptimekuma_proxy", json!({ "protocol": "gopher", "host": "p", "port": 70 })),
        ("uptimekuma_docker_host", json!({ "name": "d", "docker_type": "ssh", "docker_daemon": "x" })),
        ("uptimekuma_maintenance", json!({ "title": "m", "strategy": "single" })),
        ("uptimekuma_status_page", json!({ "slug": "no spaces", "title": "t" })),
        ("uptimekuma_monitor_port", json!({ "name": "p", "hostname": "h", "port": 0 })),
        ("uptimekuma_notification", json!({ "name": "n", "type": "x", "config_json": "not json" })),
    ];

    for (type_name, config) in cases {
        let response = provider
            .handle(Request::ValidateResourceConfig {
                type_name: type_name.to_string(),
                config: state(config),
            })
            .await;
        assert!(response.has_errors(), "{type_name} accepted invalid config");
        assert_eq!(response.diagnostics[0].severity, Severity::Error);
    }
}
