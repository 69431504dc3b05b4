//! Request/response messages served by the provider
//!
//! One JSON object per request, tagged by `method`, answered by one
//! [`Response`] carrying a `result` and any `diagnostics`.

use crate::config::ProviderSettings;
use crate::error::Error;
use crate::state::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A provider RPC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    GetSchema,
    ConfigureProvider {
        #[serde(default)]
        config: ProviderSettings,
    },
    ValidateResourceConfig {
        type_name: String,
        config: State,
    },
    ValidateDataSourceConfig {
        type_name: String,
        config: State,
    },
    PlanResourceChange {
        type_name: String,
        #[serde(default)]
        prior_state: Option<State>,
        #[serde(default)]
        proposed_state: Option<State>,
    },
    ApplyResourceChange {
        type_name: String,
        #[serde(default)]
        prior_state: Option<State>,
        #[serde(default)]
        planned_state: Option<State>,
    },
    ReadResource {
        type_name: String,
        current_state: State,
    },
    ImportResourceState {
        type_name: String,
        id: String,
    },
    ReadDataSource {
        type_name: String,
        config: State,
    },
    Stop,
}

impl Request {
    /// Method name, for logging
    pub fn method(&self) -> &'static str {
        match self {
            Self::GetSchema => "get_schema",
            Self::ConfigureProvider { .. } => "configure_provider",
            Self::ValidateResourceConfig { .. } => "validate_resource_config",
            Self::ValidateDataSourceConfig { .. } => "validate_data_source_config",
            Self::PlanResourceChange { .. } => "plan_resource_change",
            Self::ApplyResourceChange { .. } => "apply_resource_change",
            Self::ReadResource { .. } => "read_resource",
            Self::ImportResourceState { .. } => "import_resource_state",
            Self::ReadDataSource { .. } => "read_data_source",
            Self::Stop => "stop",
        }
    }
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A message shown to the Terraform user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        let summary = match err {
            Error::Config(_) => "Invalid provider configuration",
            Error::Transport(_) => "Unable to reach Uptime Kuma",
            Error::Protocol(_) => "Unexpected response from Uptime Kuma",
            Error::Api { .. } => "Uptime Kuma rejected the request",
            Error::Authentication(_) => "Authentication failed",
            Error::Timeout(_) => "Uptime Kuma did not respond in time",
            Error::NotFound(_) => "Object not found",
            Error::Ambiguous(_) => "Ambiguous lookup",
            Error::InvalidInput(_) => "Invalid configuration",
            Error::Json(_) => "Malformed JSON",
            Error::Io(_) => "I/O failure",
            Error::Other(_) => "Provider error",
        };
        Self::error(summary, err.to_string())
    }
}

/// Outcome of planning a resource change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// `None` when the resource is planned for destruction
    pub planned_state: Option<State>,
    /// Attributes whose change forces replacement
    #[serde(default)]
    pub requires_replace: Vec<String>,
    /// Attributes whose value is known only after apply
    #[serde(default)]
    pub unknown_attributes: Vec<String>,
}

/// Answer to one [`Request`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub result: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    pub fn ok(result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(result) => Self {
                result,
                diagnostics: Vec::new(),
            },
            Err(err) => Self::failed(&Error::from(err)),
        }
    }

    pub fn failed(err: &Error) -> Self {
        Self {
            result: Value::Null,
            diagnostics: vec![Diagnostic::from(err)],
        }
    }

    /// Append a warning
    pub fn with_warning(mut self, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        self.diagnostics.push(Diagnostic::warning(summary, detail));
        self
    }

    /// Whether any error diagnostic is present
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tagged_requests() {
        let req: Request = serde_json::from_value(json!({
            "method": "import_resource_state",
            "type_name": "uptimekuma_tag",
            "id": "4"
        }))
        .unwrap();
        assert_eq!(req.method(), "import_resource_state");

        let req: Request = serde_json::from_value(json!({ "method": "configure_provider" })).unwrap();
        assert_eq!(
            req,
            Request::ConfigureProvider {
                config: ProviderSettings::default()
            }
        );

        let req: Request = serde_json::from_value(json!({ "method": "stop" })).unwrap();
        assert_eq!(req, Request::Stop);
    }

    #[test]
    fn error_diagnostics_carry_detail() {
        let resp = Response::failed(&Error::ambiguous("multiple tags found"));
        assert!(resp.has_errors());
        assert_eq!(resp.diagnostics[0].summary, "Ambiguous lookup");
        assert!(resp.diagnostics[0].detail.contains("multiple tags found"));
    }

    #[test]
    fn warnings_are_not_errors() {
        let resp = Response::ok(json!(null)).with_warning("gone", "already deleted");
        assert!(!resp.has_errors());
        let wire = serde_json::to_value(&resp).unwrap();
        assert_eq!(wire["diagnostics"][0]["severity"], "warning");
    }
}
