//! Maintenance windows

use super::wire;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a maintenance window is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenanceStrategy {
    /// Active until switched off
    Manual,
    /// One window between two date-times
    Single,
    /// Every N days
    RecurringInterval,
    /// On selected weekdays
    RecurringWeekday,
    /// On selected days of the month
    RecurringDayOfMonth,
    /// Cron expression with a duration
    Cron,
}

impl MaintenanceStrategy {
    pub const ALL: [MaintenanceStrategy; 6] = [
        Self::Manual,
        Self::Single,
        Self::RecurringInterval,
        Self::RecurringWeekday,
        Self::RecurringDayOfMonth,
        Self::Cron,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Single => "single",
            Self::RecurringInterval => "recurring-interval",
            Self::RecurringWeekday => "recurring-weekday",
            Self::RecurringDayOfMonth => "recurring-day-of-month",
            Self::Cron => "cron",
        }
    }

    /// Parse a wire name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for MaintenanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hour and minute of a daily time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hours: u32,
    pub minutes: u32,
}

/// A maintenance window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    pub strategy: MaintenanceStrategy,

    #[serde(default = "default_true", deserialize_with = "wire::flexible_bool")]
    pub active: bool,

    #[serde(default)]
    pub interval_day: Option<i64>,

    /// `[start, end]` as `YYYY-MM-DD HH:MM`
    #[serde(default)]
    pub date_range: Vec<Option<String>>,

    /// `[start, end]` times of day
    #[serde(default)]
    pub time_range: Vec<TimeOfDay>,

    /// 0 = Sunday .. 6 = Saturday
    #[serde(default, deserialize_with = "wire::lenient_ints")]
    pub weekdays: Vec<i64>,

    #[serde(default, deserialize_with = "wire::lenient_ints")]
    pub days_of_month: Vec<i64>,

    #[serde(default)]
    pub cron: Option<String>,

    #[serde(default)]
    pub duration_minutes: Option<i64>,

    /// IANA zone name, `SAME_AS_SERVER` or `UTC`
    #[serde(default)]
    pub timezone_option: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Maintenance {
    pub fn new(title: impl Into<String>, strategy: MaintenanceStrategy) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            strategy,
            active: true,
            interval_day: None,
            date_range: Vec::new(),
            time_range: Vec::new(),
            weekdays: Vec::new(),
            days_of_month: Vec::new(),
            cron: None,
            duration_minutes: None,
            timezone_option: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strategy_wire_names() {
        for strategy in MaintenanceStrategy::ALL {
            let wire = serde_json::to_value(strategy).unwrap();
            assert_eq!(wire, json!(strategy.as_str()));
            assert_eq!(MaintenanceStrategy::parse(strategy.as_str()), Some(strategy));
        }
        assert_eq!(MaintenanceStrategy::parse("weekly"), None);
    }

    #[test]
    fn parses_server_maintenance() {
        let m: Maintenance = serde_json::from_value(json!({
            "id": 3,
            "title": "db upgrade",
            "description": null,
            "strategy": "recurring-weekday",
            "active": 1,
            "intervalDay": 1,
            "dateRange": [null],
            "timeRange": [{ "hours": 2, "minutes": 0 }, { "hours": 3, "minutes": 30 }],
            "weekdays": [1, 3],
            "daysOfMonth": [15, "lastDay1"],
            "timezoneOption": "UTC",
            "status": "scheduled"
        }))
        .unwrap();
        assert_eq!(m.strategy, MaintenanceStrategy::RecurringWeekday);
        assert_eq!(m.time_range[1], TimeOfDay { hours: 3, minutes: 30 });
        assert_eq!(m.date_range, vec![None]);
        assert_eq!(m.weekdays, vec![1, 3]);
        assert_eq!(m.days_of_month, vec![15]);
    }
}
