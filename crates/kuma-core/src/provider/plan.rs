//! Plan computation
//!
//! Creates leave provider-filled attributes unknown. Updates carry them
//! forward from the prior state, unless a force-new attribute changed, in
//! which case the resource is replaced and they become unknown again.

use crate::protocol::PlanResult;
use crate::schema::{Presence, Schema};
use crate::state::State;

/// Compute the planned state for a change from `prior` to `proposed`
pub fn plan_change(schema: &Schema, prior: Option<&State>, proposed: Option<State>) -> PlanResult {
    let Some(mut planned) = proposed else {
        return PlanResult::default();
    };
    schema.apply_defaults(&mut planned);

    let requires_replace: Vec<String> = match prior {
        Some(prior) => schema
            .force_new_attributes()
            .filter(|attr| prior.get(attr) != planned.get(attr))
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };

    let mut unknown_attributes = Vec::new();
    let filled: Vec<String> = schema.provider_filled_attributes().map(str::to_string).collect();

    match prior {
        Some(prior) if requires_replace.is_empty() => {
            for attr in &filled {
                if !planned.is_set(attr)
                    && let Some(value) = prior.get(attr)
                {
                    planned.set(attr, value.clone());
                }
            }
        }
        _ => {
            for attr in &filled {
                let computed_only = schema
                    .get(attr)
                    .is_some_and(|a| a.presence == Presence::Computed);
                if computed_only {
                    planned.remove(attr);
                }
                if !planned.is_set(attr) {
                    unknown_attributes.push(attr.clone());
                }
            }
        }
    }

    PlanResult {
        planned_state: Some(planned),
        requires_replace,
        unknown_attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, AttributeType};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new("status page")
            .attribute("id", Attribute::computed(AttributeType::Number))
            .attribute("slug", Attribute::required(AttributeType::String).force_new())
            .attribute("title", Attribute::required(AttributeType::String))
            .attribute("published", Attribute::optional(AttributeType::Bool).with_default(true))
            .attribute("icon", Attribute::optional_computed(AttributeType::String))
    }

    fn state(value: serde_json::Value) -> State {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn create_marks_provider_filled_attributes_unknown() {
        let plan = plan_change(&schema(), None, Some(state(json!({ "slug": "s", "title": "T" }))));

        let planned = plan.planned_state.unwrap();
        assert_eq!(planned.get("published"), Some(&json!(true)));
        assert_eq!(plan.unknown_attributes, vec!["icon", "id"]);
        assert!(plan.requires_replace.is_empty());
    }

    #[test]
    fn update_carries_computed_values_forward() {
        let prior = state(json!({ "id": 7, "slug": "s", "title": "T", "published": true, "icon": "/i.png" }));
        let proposed = state(json!({ "id": null, "slug": "s", "title": "New", "published": null }));

        let plan = plan_change(&schema(), Some(&prior), Some(proposed));

        let planned = plan.planned_state.unwrap();
        assert_eq!(planned.get("id"), Some(&json!(7)));
        assert_eq!(planned.get("icon"), Some(&json!("/i.png")));
        assert_eq!(planned.get("title"), Some(&json!("New")));
        assert!(plan.unknown_attributes.is_empty());
    }

    #[test]
    fn force_new_change_requires_replace() {
        let prior = state(json!({ "id": 7, "slug": "s", "title": "T" }));
        let proposed = state(json!({ "id": 7, "slug": "other", "title": "T" }));

        let plan = plan_change(&schema(), Some(&prior), Some(proposed));

        assert_eq!(plan.requires_replace, vec!["slug"]);
        assert!(plan.unknown_attributes.contains(&"id".to_string()));
        assert!(!plan.planned_state.unwrap().is_set("id"));
    }

    #[test]
    fn destroy_plans_no_state() {
        let prior = state(json!({ "id": 7, "slug": "s", "title": "T" }));
        let plan = plan_change(&schema(), Some(&prior), None);
        assert_eq!(plan.planned_state, None);
    }
}
