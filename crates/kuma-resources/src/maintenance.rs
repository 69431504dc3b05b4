//! `uptimekuma_maintenance`
//!
//! A maintenance window suppresses alerts for its monitors and is shown on
//! its status pages. The window itself and its monitor/status page
//! associations are separate calls in Kuma.

use crate::fields::{preserve_order, set_list};
use async_trait::async_trait;
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use kuma_core::model::{Maintenance, MaintenanceStrategy, TimeOfDay};
use kuma_core::{Attribute, AttributeType, Error, KumaApi, Resource, Result, Schema, State};
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
const TIME_FORMAT: &str = "%H:%M";

/// Formats Kuma has been seen to return date ranges in
const SERVER_DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S%.fZ"];

const DEFAULT_TIMEZONE: &str = "SAME_AS_SERVER";

fn parse_date(attr: &str, value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        Error::invalid_input(format!("{attr} must be formatted as YYYY-MM-DD HH:MM, got {value:?}"))
    })
}

fn parse_time(attr: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| Error::invalid_input(format!("{attr} must be formatted as HH:MM, got {value:?}")))
}

/// Normalize a server date to `YYYY-MM-DD HH:MM`, passing unknown formats through
fn normalize_date(raw: &str) -> String {
    SERVER_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn strategy(state: &State) -> Result<MaintenanceStrategy> {
    let name = state.require_string("strategy")?;
    MaintenanceStrategy::parse(&name).ok_or_else(|| {
        let valid: Vec<&str> = MaintenanceStrategy::ALL.iter().map(|s| s.as_str()).collect();
        Error::invalid_input(format!(
            "unknown strategy {name:?}, expected one of {}",
            valid.join(", ")
        ))
    })
}

pub struct MaintenanceResource;

impl MaintenanceResource {
    fn to_maintenance(state: &State, id: Option<i64>) -> Result<Maintenance> {
        let mut maintenance = Maintenance::new(state.require_string("title")?, strategy(state)?);
        maintenance.id = id;
        maintenance.description = state.string("description")?;
        maintenance.active = state.bool_or("active", true)?;
        maintenance.interval_day = state.int("interval_day")?;

        let start = state.string("start_date")?;
        let end = state.string("end_date")?;
        if start.is_some() || end.is_some() {
            maintenance.date_range = vec![start, end];
        }

        let mut time_range = Vec::with_capacity(2);
        for attr in ["start_time", "end_time"] {
            let time = match state.string(attr)? {
                Some(raw) => {
                    let time = parse_time(attr, &raw)?;
                    TimeOfDay {
                        hours: time.hour(),
                        minutes: time.minute(),
                    }
                }
                None => TimeOfDay { hours: 0, minutes: 0 },
            };
            time_range.push(time);
        }
        maintenance.time_range = time_range;

        maintenance.weekdays = state.int_list("weekdays")?;
        maintenance.days_of_month = state.int_list("days_of_month")?;
        maintenance.cron = state.string("cron")?;
        maintenance.duration_minutes = state.int("duration_minutes")?;
        maintenance.timezone_option = Some(
            state
                .string("timezone")?
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        );
        Ok(maintenance)
    }

    fn to_state(
        maintenance: &Maintenance,
        monitor_ids: Vec<i64>,
        status_page_ids: Vec<i64>,
        prior: &State,
    ) -> Result<State> {
        let mut state = State::new();
        state.set(
            "id",
            maintenance
                .id
                .ok_or_else(|| Error::protocol("maintenance without an id"))?,
        );
        state.set("title", maintenance.title.as_str());
        state.set_opt(
            "description",
            maintenance
                .description
                .clone()
                .filter(|d| !d.is_empty() || prior.is_set("description")),
        );
        state.set("strategy", maintenance.strategy.as_str());
        state.set("active", maintenance.active);
        state.set_opt("interval_day", maintenance.interval_day);

        let date = |index: usize| {
            maintenance
                .date_range
                .get(index)
                .cloned()
                .flatten()
                .filter(|d| !d.is_empty())
                .map(|d| normalize_date(&d))
        };
        state.set_opt("start_date", date(0));
        state.set_opt("end_date", date(1));

        for (index, attr) in ["start_time", "end_time"].into_iter().enumerate() {
            let time = maintenance
                .time_range
                .get(index)
                .map(|t| format!("{:02}:{:02}", t.hours, t.minutes))
                .filter(|t| t != "00:00" || prior.is_set(attr));
            state.set_opt(attr, time);
        }

        let weekdays = preserve_order(&prior.int_list("weekdays")?, maintenance.weekdays.clone());
        set_list(&mut state, prior, "weekdays", weekdays);
        let days = preserve_order(&prior.int_list("days_of_month")?, maintenance.days_of_month.clone());
        set_list(&mut state, prior, "days_of_month", days);

        state.set_opt("cron", maintenance.cron.clone().filter(|c| !c.is_empty()));
        state.set_opt("duration_minutes", maintenance.duration_minutes);
        state.set(
            "timezone",
            maintenance
                .timezone_option
                .clone()
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        );

        let monitor_ids = preserve_order(&prior.int_list("monitor_ids")?, monitor_ids);
        set_list(&mut state, prior, "monitor_ids", monitor_ids);
        let status_page_ids = preserve_order(&prior.int_list("status_page_ids")?, status_page_ids);
        set_list(&mut state, prior, "status_page_ids", status_page_ids);
        Ok(state)
    }

    async fn fetch(api: &dyn KumaApi, id: i64, prior: &State) -> Result<State> {
        let maintenance = api.get_maintenance(id).await?;
        let monitors = api.get_maintenance_monitors(id).await?;
        let pages = api.get_maintenance_status_pages(id).await?;
        Self::to_state(&maintenance, monitors, pages, prior)
    }
}

#[async_trait]
impl Resource for MaintenanceResource {
    fn type_name(&self) -> &str {
        "uptimekuma_maintenance"
    }

    fn schema(&self) -> Schema {
        let number_list = || AttributeType::list(AttributeType::Number);
        Schema::new("Maintenance window")
            .attribute("id", Attribute::computed(AttributeType::Number))
            .attribute("title", Attribute::required(AttributeType::String))
            .attribute("description", Attribute::optional(AttributeType::String))
            .attribute(
                "strategy",
                Attribute::required(AttributeType::String).describe(
                    "manual, single, recurring-interval, recurring-weekday, recurring-day-of-month or cron",
                ),
            )
            .attribute("active", Attribute::optional(AttributeType::Bool).with_default(true))
            .attribute(
                "interval_day",
                Attribute::optional(AttributeType::Number).describe("Days between windows for recurring-interval"),
            )
            .attribute(
                "start_date",
                Attribute::optional(AttributeType::String).describe("YYYY-MM-DD HH:MM"),
            )
            .attribute(
                "end_date",
                Attribute::optional(AttributeType::String).describe("YYYY-MM-DD HH:MM"),
            )
            .attribute("start_time", Attribute::optional(AttributeType::String).describe("HH:MM"))
            .attribute("end_time", Attribute::optional(AttributeType::String).describe("HH:MM"))
            .attribute(
                "weekdays",
                Attribute::optional(number_list()).describe("0 (Sunday) to 6 (Saturday)"),
            )
            .attribute("days_of_month", Attribute::optional(number_list()).describe("1 to 31"))
            .attribute("cron", Attribute::optional(AttributeType::String))
            .attribute("duration_minutes", Attribute::optional(AttributeType::Number))
            .attribute(
                "timezone",
                Attribute::optional(AttributeType::String)
                    .with_default(DEFAULT_TIMEZONE)
                    .describe("IANA timezone, UTC or SAME_AS_SERVER"),
            )
            .attribute("monitor_ids", Attribute::optional(number_list()))
            .attribute("status_page_ids", Attribute::optional(number_list()))
    }

    fn validate(&self, config: &State) -> Result<()> {
        self.schema().validate(config)?;

        let mut dates = Vec::new();
        for attr in ["start_date", "end_date"] {
            if let Some(raw) = config.string(attr)? {
                dates.push(parse_date(attr, &raw)?);
            }
        }
        for attr in ["start_time", "end_time"] {
            if let Some(raw) = config.string(attr)? {
                parse_time(attr, &raw)?;
            }
        }

        let weekdays = config.int_list("weekdays")?;
        if let Some(day) = weekdays.iter().find(|d| !(0..=6).contains(*d)) {
            return Err(Error::invalid_input(format!("weekday {day} is outside 0-6")));
        }
        let days = config.int_list("days_of_month")?;
        if let Some(day) = days.iter().find(|d| !(1..=31).contains(*d)) {
            return Err(Error::invalid_input(format!("day of month {day} is outside 1-31")));
        }

        if !config.is_set("strategy") {
            return Ok(());
        }
        match strategy(config)? {
            MaintenanceStrategy::Manual => {}
            MaintenanceStrategy::Single => {
                let [start, end] = dates.as_slice() else {
                    return Err(Error::invalid_input(
                        "strategy single requires start_date and end_date",
                    ));
                };
                if end <= start {
                    return Err(Error::invalid_input("end_date must be after start_date"));
                }
            }
            MaintenanceStrategy::RecurringInterval => {
                if config.int("interval_day")?.is_none_or(|d| d < 1) {
                    return Err(Error::invalid_input(
                        "strategy recurring-interval requires interval_day of at least 1",
                    ));
                }
            }
            MaintenanceStrategy::RecurringWeekday => {
                if weekdays.is_empty() {
                    return Err(Error::invalid_input("strategy recurring-weekday requires weekdays"));
                }
            }
            MaintenanceStrategy::RecurringDayOfMonth => {
                if days.is_empty() {
                    return Err(Error::invalid_input(
                        "strategy recurring-day-of-month requires days_of_month",
                    ));
                }
            }
            MaintenanceStrategy::Cron => {
                if !config.is_set("cron") || config.int("duration_minutes")?.is_none_or(|m| m < 1) {
                    return Err(Error::invalid_input(
                        "strategy cron requires cron and a positive duration_minutes",
                    ));
                }
            }
        }
        Ok(())
    }

    async fn create(&self, api: &dyn KumaApi, planned: State) -> Result<State> {
        let maintenance = Self::to_maintenance(&planned, None)?;
        let id = api.create_maintenance(&maintenance).await?;
        info!("Created maintenance {} ({})", id, maintenance.title);

        let monitors = planned.int_list("monitor_ids")?;
        if !monitors.is_empty() {
            api.set_maintenance_monitors(id, &monitors).await?;
        }
        let pages = planned.int_list("status_page_ids")?;
        if !pages.is_empty() {
            api.set_maintenance_status_pages(id, &pages).await?;
        }
        Self::fetch(api, id, &planned).await
    }

    async fn read(&self, api: &dyn KumaApi, current: State) -> Result<Option<State>> {
        let id = current.id()?;
        match Self::fetch(api, id, &current).await {
            Ok(state) => Ok(Some(state)),
            Err(e) if e.is_not_found() => {
                debug!("Maintenance {} is gone", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, api: &dyn KumaApi, prior: State, planned: State) -> Result<State> {
        let id = prior.id()?;
        api.update_maintenance(&Self::to_maintenance(&planned, Some(id))?)
            .await?;
        api.set_maintenance_monitors(id, &planned.int_list("monitor_ids")?)
            .await?;
        api.set_maintenance_status_pages(id, &planned.int_list("status_page_ids")?)
            .await?;
        info!("Updated maintenance {}", id);
        Self::fetch(api, id, &planned).await
    }

    async fn delete(&self, api: &dyn KumaApi, current: State) -> Result<()> {
        let id = current.id()?;
        api.delete_maintenance(id).await?;
        info!("Deleted maintenance {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn state(value: Value) -> State {
        serde_json::from_value(value).unwrap()
    }

    fn check(config: Value) -> Result<()> {
        MaintenanceResource.validate(&state(config))
    }

    #[test]
    fn strategy_rules() {
        assert!(check(json!({ "title": "t", "strategy": "manual" })).is_ok());
        assert!(check(json!({ "title": "t", "strategy": "weekly" })).is_err());

        assert!(check(json!({ "title": "t", "strategy": "single", "start_date": "2025-01-01 10:00" })).is_err());
        assert!(
            check(json!({
                "title": "t",
                "strategy": "single",
                "start_date": "2025-01-01 10:00",
                "end_date": "2025-01-01 12:00"
            }))
            .is_ok()
        );
        assert!(
            check(json!({
                "title": "t",
                "strategy": "single",
                "start_date": "2025-01-01 12:00",
                "end_date": "2025-01-01 10:00"
            }))
            .is_err()
        );

        assert!(check(json!({ "title": "t", "strategy": "recurring-interval", "interval_day": 0 })).is_err());
        assert!(check(json!({ "title": "t", "strategy": "recurring-interval", "interval_day": 2 })).is_ok());
        assert!(check(json!({ "title": "t", "strategy": "recurring-weekday" })).is_err());
        assert!(check(json!({ "title": "t", "strategy": "recurring-weekday", "weekdays": [1, 5] })).is_ok());
        assert!(check(json!({ "title": "t", "strategy": "recurring-day-of-month", "days_of_month": [] })).is_err());
        assert!(check(json!({ "title": "t", "strategy": "cron", "cron": "0 2 * * *" })).is_err());
        assert!(
            check(json!({ "title": "t", "strategy": "cron", "cron": "0 2 * * *", "duration_minutes": 60 }))
                .is_ok()
        );
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(check(json!({ "title": "t", "strategy": "manual", "start_time": "25:00" })).is_err());
        assert!(check(json!({ "title": "t", "strategy": "manual", "start_date": "2025-01-01" })).is_err());
        assert!(check(json!({ "title": "t", "strategy": "manual", "weekdays": [7] })).is_err());
        assert!(check(json!({ "title": "t", "strategy": "manual", "days_of_month": [0] })).is_err());
    }

    #[test]
    fn times_and_timezone_on_the_wire() {
        let m = MaintenanceResource::to_maintenance(
            &state(json!({ "title": "t", "strategy": "recurring-weekday", "weekdays": [1], "start_time": "02:30" })),
            None,
        )
        .unwrap();
        assert_eq!(m.time_range, vec![TimeOfDay { hours: 2, minutes: 30 }, TimeOfDay { hours: 0, minutes: 0 }]);
        assert_eq!(m.timezone_option.as_deref(), Some("SAME_AS_SERVER"));
        assert!(m.date_range.is_empty());
    }

    #[test]
    fn server_dates_are_normalized() {
        assert_eq!(normalize_date("2025-03-01 04:05:00"), "2025-03-01 04:05");
        assert_eq!(normalize_date("2025-03-01 04:05"), "2025-03-01 04:05");
        assert_eq!(normalize_date("soon"), "soon");
    }

    #[test]
    fn midnight_reads_as_unset_unless_configured() {
        let mut m = Maintenance::new("t", MaintenanceStrategy::Manual);
        m.id = Some(1);
        m.time_range = vec![TimeOfDay { hours: 0, minutes: 0 }, TimeOfDay { hours: 0, minutes: 0 }];

        let s = MaintenanceResource::to_state(&m, vec![], vec![], &State::new()).unwrap();
        assert!(!s.is_set("start_time"));

        let prior = state(json!({ "start_time": "00:00" }));
        let s = MaintenanceResource::to_state(&m, vec![], vec![], &prior).unwrap();
        assert_eq!(s.string("start_time").unwrap().as_deref(), Some("00:00"));
    }
}
