//! Bus routes. The only page with create and update.

use crate::filter::{CORPORATION_ID, FilterSchema, PLATE, ROUTE_NUMBER, SCHOOL_ID};
use crate::labels::{DAYS_OF_WEEK, SCHEDULES, label};
use crate::mutation::Draft;
use crate::resource::Resource;
use crate::stats::count_by;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: i64,
    #[serde(default, deserialize_with = "super::opt_string_or_number")]
    pub route_number: Option<String>,
    pub school_id: Option<i64>,
    pub school_name: Option<String>,
    pub corporation_id: Option<i64>,
    pub bus_id: Option<i64>,
    #[serde(default, deserialize_with = "super::opt_string_or_number")]
    pub plate: Option<String>,
    pub schedule: Option<String>,
    #[serde(default)]
    pub days: Vec<String>,
}

impl Route {
    pub fn schedule_label(&self) -> Option<&str> {
        self.schedule.as_deref().map(|c| label(SCHEDULES, c))
    }

    pub fn day_labels(&self) -> Vec<&str> {
        self.days.iter().map(|d| label(DAYS_OF_WEEK, d)).collect()
    }
}

/// Editable form of a [`Route`]. `id` is `None` for a new route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub route_number: String,
    pub school_id: Option<i64>,
    pub corporation_id: Option<i64>,
    pub bus_id: Option<i64>,
    pub schedule: Option<String>,
    pub days: Vec<String>,
}

impl Draft for RouteDraft {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl From<&Route> for RouteDraft {
    fn from(route: &Route) -> Self {
        Self {
            id: Some(route.id),
            route_number: route.route_number.clone().unwrap_or_default(),
            school_id: route.school_id,
            corporation_id: route.corporation_id,
            bus_id: route.bus_id,
            schedule: route.schedule.clone(),
            days: route.days.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteSummary {
    pub total: usize,
    pub with_bus: usize,
    pub by_school: BTreeMap<String, usize>,
}

pub struct Routes;

impl Resource for Routes {
    type Row = Route;
    type Detail = Route;
    type Summary = RouteSummary;

    const NAME: &'static str = "routes";
    const PATH: &'static str = "routes";
    const ROWS_KEY: &'static str = "routes";
    const FILTERS: FilterSchema = FilterSchema {
        keys: &[SCHOOL_ID, CORPORATION_ID, PLATE, ROUTE_NUMBER],
        primary: &[SCHOOL_ID, CORPORATION_ID],
        dependents: &[PLATE, ROUTE_NUMBER],
    };

    fn reduce(rows: &[Route]) -> RouteSummary {
        RouteSummary {
            total: rows.len(),
            with_bus: rows.iter().filter(|r| r.bus_id.is_some()).count(),
            by_school: count_by(rows, |r| r.school_name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_draft_omits_id() {
        let draft = RouteDraft {
            route_number: "12".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&draft).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["routeNumber"], "12");
    }

    #[test]
    fn test_draft_from_route_keeps_id() {
        let route: Route = serde_json::from_value(json!({
            "id": 7, "routeNumber": 12, "busId": 3, "schedule": "MORNING",
            "days": ["MONDAY", "FRIDAY"]
        }))
        .unwrap();
        let draft = RouteDraft::from(&route);

        assert_eq!(draft.id(), Some(7));
        assert_eq!(draft.route_number, "12");
        assert_eq!(route.schedule_label(), Some("Morning"));
        assert_eq!(route.day_labels(), vec!["Monday", "Friday"]);
    }

    #[test]
    fn test_reduce_counts_assigned_buses() {
        let rows: Vec<Route> = serde_json::from_value(json!([
            { "id": 1, "busId": 4, "schoolName": "North" },
            { "id": 2, "schoolName": "North" },
        ]))
        .unwrap();
        let summary = Routes::reduce(&rows);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.with_bus, 1);
        assert_eq!(summary.by_school.get("North"), Some(&2));
        assert_eq!(Routes::reduce(&[]), RouteSummary::default());
    }
}
