//! Start/end times recorded for each route run.

use crate::filter::{
    CORPORATION_ID, DAY, END_DATE, FilterSchema, PLATE, ROUTE_NUMBER, SCHEDULE, SCHOOL_ID,
    START_DATE,
};
use crate::labels::{DAYS_OF_WEEK, SCHEDULES, label};
use crate::resource::Resource;
use crate::stats::{Located, count_by, count_with_location, mean};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTimeLog {
    pub id: i64,
    #[serde(default, deserialize_with = "super::opt_string_or_number")]
    pub route_number: Option<String>,
    #[serde(default, deserialize_with = "super::opt_string_or_number")]
    pub plate: Option<String>,
    pub school_name: Option<String>,
    pub schedule: Option<String>,
    pub day: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub duration_minutes: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Located for RouteTimeLog {
    fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    fn longitude(&self) -> Option<f64> {
        self.longitude
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeLogSummary {
    pub total: usize,
    pub with_location: usize,
    pub by_schedule: BTreeMap<String, usize>,
    pub by_day: BTreeMap<String, usize>,
    pub average_duration_minutes: f64,
}

pub struct RouteTimeLogs;

impl Resource for RouteTimeLogs {
    type Row = RouteTimeLog;
    type Detail = RouteTimeLog;
    type Summary = TimeLogSummary;

    const NAME: &'static str = "route time logs";
    const PATH: &'static str = "route-time-logs";
    const ROWS_KEY: &'static str = "logs";
    // Schedule and day choices come from the selected entity's bus list.
    const FILTERS: FilterSchema = FilterSchema {
        keys: &[
            SCHOOL_ID,
            CORPORATION_ID,
            PLATE,
            ROUTE_NUMBER,
            SCHEDULE,
            DAY,
            START_DATE,
            END_DATE,
        ],
        primary: &[SCHOOL_ID, CORPORATION_ID],
        dependents: &[PLATE, ROUTE_NUMBER, SCHEDULE, DAY],
    };

    fn reduce(rows: &[RouteTimeLog]) -> TimeLogSummary {
        let durations: Vec<f64> = rows.iter().filter_map(|r| r.duration_minutes).collect();
        TimeLogSummary {
            total: rows.len(),
            with_location: count_with_location(rows),
            by_schedule: count_by(rows, |r| {
                r.schedule.as_deref().map(|c| label(SCHEDULES, c).to_string())
            }),
            by_day: count_by(rows, |r| {
                r.day.as_deref().map(|c| label(DAYS_OF_WEEK, c).to_string())
            }),
            average_duration_minutes: mean(&durations),
        }
    }
}
