//! Notification providers and their settings

use crate::fields::Field;

/// One `uptimekuma_notification_<suffix>` resource
#[derive(Debug)]
pub struct NotificationKind {
    pub suffix: &'static str,
    /// Kuma's provider name, stored as `type` in the notification config
    pub wire_type: &'static str,
    pub description: &'static str,
    pub fields: &'static [Field],
}

impl NotificationKind {
    pub fn type_name(&self) -> String {
        format!("uptimekuma_notification_{}", self.suffix)
    }
}

pub static NOTIFICATION_KINDS: &[NotificationKind] = &[
    NotificationKind {
        suffix: "slack",
        wire_type: "slack",
        description: "Slack incoming webhook",
        fields: &[
            Field::string("webhook_url", "slackwebhookURL").required().sensitive(),
            Field::string("channel", "slackchannel"),
            Field::string("username", "slackusername"),
            Field::string("icon_emoji", "slackiconemo"),
            Field::bool("channel_notify", "slackchannelnotify").default_bool(false),
        ],
    },
    NotificationKind {
        suffix: "discord",
        wire_type: "discord",
        description: "Discord webhook",
        fields: &[
            Field::string("webhook_url", "discordWebhookUrl").required().sensitive(),
            Field::string("username", "discordUsername"),
            Field::string("prefix_message", "discordPrefixMessage"),
        ],
    },
    NotificationKind {
        suffix: "webhook",
        wire_type: "webhook",
        description: "Generic HTTP webhook",
        fields: &[
            Field::string("url", "webhookURL").required(),
            Field::string("content_type", "webhookContentType")
                .default_str("json")
                .describe("json, form-data or custom"),
            Field::string("custom_body", "webhookCustomBody"),
            Field::string("additional_headers", "webhookAdditionalHeaders")
                .describe("JSON object of extra request headers"),
        ],
    },
    NotificationKind {
        suffix: "telegram",
        wire_type: "telegram",
        description: "Telegram bot",
        fields: &[
            Field::string("bot_token", "telegramBotToken").required().sensitive(),
            Field::string("chat_id", "telegramChatID").required(),
            Field::string("message_thread_id", "telegramMessageThreadID"),
            Field::bool("send_silently", "telegramSendSilently").default_bool(false),
            Field::bool("protect_content", "telegramProtectContent").default_bool(false),
        ],
    },
    NotificationKind {
        suffix: "smtp",
        wire_type: "smtp",
        description: "Email over SMTP",
        fields: &[
            Field::string("host", "smtpHost").required(),
            Field::int("port", "smtpPort").required(),
            Field::bool("secure", "smtpSecure").default_bool(false),
            Field::bool("ignore_tls_error", "smtpIgnoreTLSError").default_bool(false),
            Field::string("username", "smtpUsername"),
            Field::string("password", "smtpPassword").sensitive(),
            Field::string("from", "smtpFrom").required(),
            Field::string("to", "smtpTo"),
            Field::string("cc", "smtpCC"),
            Field::string("bcc", "smtpBCC"),
            Field::string("subject", "customSubject"),
            Field::string("body", "customBody"),
        ],
    },
    NotificationKind {
        suffix: "teams",
        wire_type: "teams",
        description: "Microsoft Teams webhook",
        fields: &[Field::string("webhook_url", "webhookUrl").required().sensitive()],
    },
    NotificationKind {
        suffix: "pushover",
        wire_type: "pushover",
        description: "Pushover",
        fields: &[
            Field::string("user_key", "pushoveruserkey").required().sensitive(),
            Field::string("app_token", "pushoverapptoken").required().sensitive(),
            Field::string("sound", "pushoversounds"),
            Field::string("priority", "pushoverpriority"),
            Field::string("title", "pushovertitle"),
            Field::string("device", "pushoverdevice"),
        ],
    },
    NotificationKind {
        suffix: "ntfy",
        wire_type: "ntfy",
        description: "ntfy topic",
        fields: &[
            Field::string("server_url", "ntfyserverurl").default_str("https://ntfy.sh"),
            Field::string("topic", "ntfytopic").required(),
            Field::int("priority", "ntfyPriority").default_int(5),
            Field::string("authentication_method", "ntfyAuthenticationMethod").default_str("none"),
            Field::string("username", "ntfyusername"),
            Field::string("password", "ntfypassword").sensitive(),
            Field::string("access_token", "ntfyaccesstoken").sensitive(),
            Field::string("icon", "ntfyIcon"),
        ],
    },
    NotificationKind {
        suffix: "gotify",
        wire_type: "gotify",
        description: "Gotify server",
        fields: &[
            Field::string("server_url", "gotifyserverurl").required(),
            Field::string("application_token", "gotifyapplicationToken")
                .required()
                .sensitive(),
            Field::int("priority", "gotifyPriority").default_int(8),
        ],
    },
    NotificationKind {
        suffix: "mattermost",
        wire_type: "mattermost",
        description: "Mattermost webhook",
        fields: &[
            Field::string("webhook_url", "mattermostWebhookUrl").required().sensitive(),
            Field::string("username", "mattermostusername"),
            Field::string("channel", "mattermostchannel"),
            Field::string("icon_url", "mattermosticonurl"),
            Field::string("icon_emoji", "mattermosticonemo"),
        ],
    },
    NotificationKind {
        suffix: "pagerduty",
        wire_type: "PagerDuty",
        description: "PagerDuty Events API",
        fields: &[
            Field::string("integration_url", "pagerdutyIntegrationUrl")
                .default_str("https://events.pagerduty.com/v2/enqueue"),
            Field::string("integration_key", "pagerdutyIntegrationKey")
                .required()
                .sensitive(),
            Field::string("priority", "pagerdutyPriority"),
            Field::string("auto_resolve", "pagerdutyAutoResolve").default_str("0"),
        ],
    },
    NotificationKind {
        suffix: "opsgenie",
        wire_type: "Opsgenie",
        description: "Opsgenie alerts",
        fields: &[
            Field::string("api_key", "opsgenieApiKey").required().sensitive(),
            Field::string("region", "opsgenieRegion")
                .default_str("us")
                .describe("us or eu"),
            Field::int("priority", "opsgeniePriority").default_int(3),
        ],
    },
    NotificationKind {
        suffix: "matrix",
        wire_type: "matrix",
        description: "Matrix room",
        fields: &[
            Field::string("homeserver_url", "homeserverUrl").required(),
            Field::string("internal_room_id", "internalRoomId").required(),
            Field::string("access_token", "accessToken").required().sensitive(),
        ],
    },
    NotificationKind {
        suffix: "signal",
        wire_type: "signal",
        description: "Signal via signal-cli-rest-api",
        fields: &[
            Field::string("url", "signalURL").required(),
            Field::string("number", "signalNumber").required(),
            Field::string("recipients", "signalRecipients")
                .required()
                .describe("Comma separated recipient numbers"),
        ],
    },
    NotificationKind {
        suffix: "google_chat",
        wire_type: "GoogleChat",
        description: "Google Chat webhook",
        fields: &[Field::string("webhook_url", "googleChatWebhookURL").required().sensitive()],
    },
];
