//! Status pages

use super::wire;
use serde::{Deserialize, Serialize};

/// A group of monitors shown on a status page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(rename = "monitorList", default, with = "wire::id_objects")]
    pub monitor_ids: Vec<i64>,
}

impl PublicGroup {
    pub fn new(name: impl Into<String>, monitor_ids: Vec<i64>) -> Self {
        Self {
            id: None,
            name: name.into(),
            monitor_ids,
        }
    }
}

/// A public status page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub slug: String,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub theme: Option<String>,

    #[serde(default = "default_true", deserialize_with = "wire::flexible_bool")]
    pub published: bool,

    #[serde(default, deserialize_with = "wire::flexible_bool")]
    pub show_tags: bool,

    #[serde(default)]
    pub domain_name_list: Vec<String>,

    #[serde(rename = "customCSS", default)]
    pub custom_css: Option<String>,

    #[serde(default)]
    pub footer_text: Option<String>,

    #[serde(default = "default_true", deserialize_with = "wire::flexible_bool")]
    pub show_powered_by: bool,

    #[serde(default)]
    pub google_analytics_id: Option<String>,

    #[serde(default, deserialize_with = "wire::flexible_bool")]
    pub show_certificate_expiry: bool,

    #[serde(default)]
    pub auto_refresh_interval: Option<i64>,

    /// Sent separately from the page config in `saveStatusPage`
    #[serde(default, skip)]
    pub public_groups: Vec<PublicGroup>,
}

fn default_true() -> bool {
    true
}

impl StatusPage {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: None,
            slug: slug.into(),
            title: title.into(),
            description: None,
            icon: None,
            theme: None,
            published: true,
            show_tags: false,
            domain_name_list: Vec::new(),
            custom_css: None,
            footer_text: None,
            show_powered_by: true,
            google_analytics_id: None,
            show_certificate_expiry: false,
            auto_refresh_interval: None,
            public_groups: Vec::new(),
        }
    }
}

/// Whether `slug` is acceptable to Kuma
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_wire_names() {
        let mut page = StatusPage::new("status", "Status");
        page.custom_css = Some("body {}".into());
        page.public_groups.push(PublicGroup::new("core", vec![1]));

        let out = serde_json::to_value(&page).unwrap();
        assert_eq!(out["customCSS"], json!("body {}"));
        assert_eq!(out["showPoweredBy"], json!(true));
        assert!(out.get("publicGroups").is_none());
    }

    #[test]
    fn public_group_from_status_endpoint() {
        let group: PublicGroup = serde_json::from_value(json!({
            "id": 4,
            "name": "Services",
            "weight": 1,
            "monitorList": [{ "id": 9, "name": "api", "type": "http" }]
        }))
        .unwrap();
        assert_eq!(group.monitor_ids, vec![9]);
    }

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("team-status-2"));
        assert!(!is_valid_slug("team status"));
        assert!(!is_valid_slug(""));
    }
}
