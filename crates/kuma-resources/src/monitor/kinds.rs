//! Monitor kinds and their settings

use crate::fields::Field;

/// One `uptimekuma_monitor_<suffix>` resource
#[derive(Debug)]
pub struct MonitorKind {
    pub suffix: &'static str,
    /// Kuma's `type` value
    pub wire_type: &'static str,
    pub description: &'static str,
    pub fields: &'static [&'static [Field]],
}

/// Scheduling settings shared by every kind
pub const BASE: &[Field] = &[
    Field::int("interval", "interval")
        .default_int(60)
        .describe("Seconds between checks"),
    Field::int("retry_interval", "retryInterval")
        .default_int(60)
        .describe("Seconds between checks while the monitor is failing"),
    Field::int("resend_interval", "resendInterval")
        .default_int(0)
        .describe("Resend a down notification every N failed checks, 0 to disable"),
    Field::int("max_retries", "maxretries")
        .default_int(0)
        .describe("Retries before the monitor is marked down"),
    Field::bool("upside_down", "upsideDown")
        .default_bool(false)
        .describe("Treat a successful check as down"),
];

const HTTP: &[Field] = &[
    Field::string("url", "url").required().describe("URL to request"),
    Field::string("method", "method").default_str("GET"),
    Field::string("body", "body"),
    Field::string("headers", "headers").describe("JSON object of request headers"),
    Field::string("http_body_encoding", "httpBodyEncoding").default_str("json"),
    Field::int("timeout", "timeout")
        .default_int(48)
        .describe("Request timeout in seconds"),
    Field::int("max_redirects", "maxredirects").default_int(10),
    Field::string_list("accepted_status_codes", "accepted_statuscodes").default_list(&["200-299"]),
    Field::bool("ignore_tls", "ignoreTls").default_bool(false),
    Field::bool("expiry_notification", "expiryNotification").default_bool(false),
    Field::int("proxy_id", "proxyId"),
    Field::string("auth_method", "authMethod").describe("basic, ntlm, mtls or oauth2-cc"),
    Field::string("basic_auth_user", "basic_auth_user"),
    Field::string("basic_auth_pass", "basic_auth_pass").sensitive(),
    Field::string("auth_domain", "authDomain"),
    Field::string("auth_workstation", "authWorkstation"),
    Field::string("tls_cert", "tlsCert").sensitive(),
    Field::string("tls_key", "tlsKey").sensitive(),
    Field::string("tls_ca", "tlsCa"),
    Field::string("oauth_auth_method", "oauth_auth_method"),
    Field::string("oauth_token_url", "oauth_token_url"),
    Field::string("oauth_client_id", "oauth_client_id"),
    Field::string("oauth_client_secret", "oauth_client_secret").sensitive(),
    Field::string("oauth_scopes", "oauth_scopes"),
];

const KEYWORD: &[Field] = &[
    Field::string("keyword", "keyword").required().describe("Text the response must contain"),
    Field::bool("invert_keyword", "invertKeyword")
        .default_bool(false)
        .describe("Fail when the keyword is present instead"),
];

const JSON_QUERY: &[Field] = &[
    Field::string("json_path", "jsonPath")
        .required()
        .describe("JSONata expression evaluated against the response"),
    Field::string("json_path_operator", "jsonPathOperator").default_str("=="),
    Field::string("expected_value", "expectedValue").required(),
];

const HOSTNAME: &[Field] = &[Field::string("hostname", "hostname").required()];

const PING: &[Field] = &[Field::int("packet_size", "packetSize").default_int(56)];

const PORT: &[Field] = &[Field::int("port", "port").required()];

const DNS: &[Field] = &[
    Field::string("dns_resolve_server", "dns_resolve_server").default_str("1.1.1.1"),
    Field::string("dns_resolve_type", "dns_resolve_type").default_str("A"),
    Field::int("port", "port").default_int(53),
];

const DOCKER: &[Field] = &[
    Field::string("docker_container", "docker_container").required(),
    Field::int("docker_host", "docker_host")
        .required()
        .describe("ID of an uptimekuma_docker_host"),
];

const DATABASE: &[Field] = &[
    Field::string("database_connection_string", "databaseConnectionString")
        .required()
        .sensitive(),
    Field::string("database_query", "databaseQuery"),
];

const REDIS: &[Field] = &[
    Field::string("database_connection_string", "databaseConnectionString")
        .required()
        .sensitive(),
    Field::bool("ignore_tls", "ignoreTls").default_bool(false),
];

const REAL_BROWSER: &[Field] = &[
    Field::string("url", "url").required(),
    Field::int("timeout", "timeout").default_int(48),
    Field::string_list("accepted_status_codes", "accepted_statuscodes").default_list(&["200-299"]),
    Field::bool("ignore_tls", "ignoreTls").default_bool(false),
    Field::int("remote_browser", "remote_browser").describe("ID of a remote browser"),
];

const GRPC: &[Field] = &[
    Field::string("grpc_url", "grpcUrl").required(),
    Field::string("grpc_protobuf", "grpcProtobuf"),
    Field::string("grpc_service_name", "grpcServiceName"),
    Field::string("grpc_method", "grpcMethod"),
    Field::string("grpc_body", "grpcBody"),
    Field::string("grpc_metadata", "grpcMetadata"),
    Field::bool("grpc_enable_tls", "grpcEnableTls").default_bool(false),
];

const MQTT: &[Field] = &[
    Field::int("port", "port").default_int(1883),
    Field::string("mqtt_topic", "mqttTopic").required(),
    Field::string("mqtt_username", "mqttUsername"),
    Field::string("mqtt_password", "mqttPassword").sensitive(),
    Field::string("mqtt_success_message", "mqttSuccessMessage"),
    Field::string("mqtt_check_type", "mqttCheckType").default_str("keyword"),
];

pub static MONITOR_KINDS: &[MonitorKind] = &[
    MonitorKind {
        suffix: "http",
        wire_type: "http",
        description: "HTTP(S) monitor",
        fields: &[BASE, HTTP],
    },
    MonitorKind {
        suffix: "http_keyword",
        wire_type: "keyword",
        description: "HTTP(S) monitor that checks the response for a keyword",
        fields: &[BASE, HTTP, KEYWORD],
    },
    MonitorKind {
        suffix: "http_json_query",
        wire_type: "json-query",
        description: "HTTP(S) monitor that evaluates a JSON query against the response",
        fields: &[BASE, HTTP, JSON_QUERY],
    },
    MonitorKind {
        suffix: "group",
        wire_type: "group",
        description: "Group of monitors",
        fields: &[BASE],
    },
    MonitorKind {
        suffix: "ping",
        wire_type: "ping",
        description: "ICMP ping monitor",
        fields: &[BASE, HOSTNAME, PING],
    },
    MonitorKind {
        suffix: "port",
        wire_type: "port",
        description: "TCP port monitor",
        fields: &[BASE, HOSTNAME, PORT],
    },
    MonitorKind {
        suffix: "dns",
        wire_type: "dns",
        description: "DNS record monitor",
        fields: &[BASE, HOSTNAME, DNS],
    },
    MonitorKind {
        suffix: "push",
        wire_type: "push",
        description: "Push monitor",
        fields: &[BASE],
    },
    MonitorKind {
        suffix: "docker",
        wire_type: "docker",
        description: "Docker container monitor",
        fields: &[BASE, DOCKER],
    },
    MonitorKind {
        suffix: "postgres",
        wire_type: "postgres",
        description: "PostgreSQL monitor",
        fields: &[BASE, DATABASE],
    },
    MonitorKind {
        suffix: "mysql",
        wire_type: "mysql",
        description: "MySQL/MariaDB monitor",
        fields: &[BASE, DATABASE],
    },
    MonitorKind {
        suffix: "sqlserver",
        wire_type: "sqlserver",
        description: "Microsoft SQL Server monitor",
        fields: &[BASE, DATABASE],
    },
    MonitorKind {
        suffix: "mongodb",
        wire_type: "mongodb",
        description: "MongoDB monitor",
        fields: &[BASE, DATABASE],
    },
    MonitorKind {
        suffix: "redis",
        wire_type: "redis",
        description: "Redis monitor",
        fields: &[BASE, REDIS],
    },
    MonitorKind {
        suffix: "real_browser",
        wire_type: "real-browser",
        description: "Monitor that loads a page in a headless browser",
        fields: &[BASE, REAL_BROWSER],
    },
    MonitorKind {
        suffix: "grpc_keyword",
        wire_type: "grpc-keyword",
        description: "gRPC monitor that checks the response for a keyword",
        fields: &[BASE, GRPC, KEYWORD],
    },
    MonitorKind {
        suffix: "mqtt",
        wire_type: "mqtt",
        description: "MQTT topic monitor",
        fields: &[BASE, HOSTNAME, MQTT],
    },
];

impl MonitorKind {
    pub fn type_name(&self) -> String {
        format!("uptimekuma_monitor_{}", self.suffix)
    }

    /// Whether this kind carries a generated push token
    pub fn is_push(&self) -> bool {
        self.wire_type == "push"
    }

    pub fn field(&self, attr: &str) -> Option<&Field> {
        self.fields.iter().flat_map(|t| t.iter()).find(|f| f.attr == attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn attribute_names_unique_per_kind() {
        for kind in MONITOR_KINDS {
            let mut seen = HashSet::new();
            for field in kind.fields.iter().flat_map(|t| t.iter()) {
                assert!(seen.insert(field.attr), "{} repeats {}", kind.suffix, field.attr);
            }
        }
    }

    #[test]
    fn all_kinds_present() {
        assert_eq!(MONITOR_KINDS.len(), 17);
        let wire: HashSet<_> = MONITOR_KINDS.iter().map(|k| k.wire_type).collect();
        assert_eq!(wire.len(), MONITOR_KINDS.len());
    }
}
