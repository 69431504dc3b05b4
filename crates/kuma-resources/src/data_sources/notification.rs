//! `uptimekuma_notification` data source

use super::{lookup_keys, lookup_schema};
use async_trait::async_trait;
use kuma_core::lookup::{EntityKind, find_unique};
use kuma_core::model::Notification;
use kuma_core::{Attribute, AttributeType, DataSource, KumaApi, Result, Schema, State};

const NOTIFICATION: EntityKind = EntityKind::new("notification", "notifications");

pub struct NotificationDataSource;

#[async_trait]
impl DataSource for NotificationDataSource {
    fn type_name(&self) -> &str {
        "uptimekuma_notification"
    }

    fn schema(&self) -> Schema {
        lookup_schema("Look up an existing notification", "name")
            .attribute(
                "type",
                Attribute::optional_computed(AttributeType::String)
                    .describe("Only consider notifications of this provider, e.g. \"slack\""),
            )
            .attribute("is_default", Attribute::computed(AttributeType::Bool))
            .attribute("active", Attribute::computed(AttributeType::Bool))
    }

    async fn read(&self, api: &dyn KumaApi, config: State) -> Result<State> {
        let (id, name) = lookup_keys(&config, "name")?;
        let kind = config.string("type")?;

        let notifications: Vec<Notification> = api
            .list_notifications()
            .await?
            .into_iter()
            .filter(|n| kind.as_deref().is_none_or(|k| n.notification_type == k))
            .collect();
        let notification = find_unique(
            NOTIFICATION,
            notifications,
            id,
            name.as_deref(),
            |n| n.id,
            |n| n.name.as_str(),
        )?;

        let mut state = State::new();
        state.set_opt("id", notification.id);
        state.set("name", notification.name.as_str());
        state.set("type", notification.notification_type.as_str());
        state.set("is_default", notification.is_default);
        state.set("active", notification.active);
        Ok(state)
    }
}
