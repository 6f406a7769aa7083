//! Bus emergencies reported by drivers.

use crate::filter::{
    CORPORATION_ID, END_DATE, FilterSchema, PLATE, ROUTE_NUMBER, SCHOOL_ID, START_DATE,
};
use crate::labels::{EMERGENCY_TYPES, label};
use crate::paging::{SortDirection, SortPolicy, SortSpec};
use crate::resource::Resource;
use crate::stats::{Located, count_by, count_with_location, most_frequent, pct};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emergency {
    pub id: i64,
    pub school_id: Option<i64>,
    pub school_name: Option<String>,
    pub corporation_id: Option<i64>,
    #[serde(default, deserialize_with = "super::opt_string_or_number")]
    pub plate: Option<String>,
    #[serde(default, deserialize_with = "super::opt_string_or_number")]
    pub route_number: Option<String>,
    pub emergency_type: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Option<String>,
}

impl Emergency {
    pub fn type_label(&self) -> Option<&str> {
        self.emergency_type.as_deref().map(|c| label(EMERGENCY_TYPES, c))
    }
}

impl Located for Emergency {
    fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    fn longitude(&self) -> Option<f64> {
        self.longitude
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencySummary {
    pub total: usize,
    pub with_location: usize,
    /// Share of rows with a GPS fix, 0-100.
    pub location_pct: f64,
    pub by_school: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    /// School with the most emergencies on the current page.
    pub most_affected_school: Option<String>,
}

pub struct BusEmergencies;

impl Resource for BusEmergencies {
    type Row = Emergency;
    type Detail = Emergency;
    type Summary = EmergencySummary;

    const NAME: &'static str = "bus emergencies";
    const PATH: &'static str = "bus-emergencies";
    const ROWS_KEY: &'static str = "data";
    const FILTERS: FilterSchema = FilterSchema {
        keys: &[SCHOOL_ID, CORPORATION_ID, PLATE, ROUTE_NUMBER, START_DATE, END_DATE],
        primary: &[SCHOOL_ID, CORPORATION_ID],
        dependents: &[PLATE, ROUTE_NUMBER],
    };
    const SORT: SortPolicy = SortPolicy::Toggle;

    fn default_sort() -> Option<SortSpec> {
        Some(SortSpec::new("createdAt", SortDirection::Desc))
    }

    fn reduce(rows: &[Emergency]) -> EmergencySummary {
        let by_school = count_by(rows, |r| r.school_name.clone());
        let most_affected_school = most_frequent(&by_school).map(|(school, _)| school);
        let with_location = count_with_location(rows);
        EmergencySummary {
            total: rows.len(),
            with_location,
            location_pct: pct(with_location, rows.len()),
            by_type: count_by(rows, |r| r.type_label().map(str::to_string)),
            by_school,
            most_affected_school,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn emergency(id: i64, school: &str, kind: &str, located: bool) -> Emergency {
        Emergency {
            id,
            school_id: None,
            school_name: Some(school.to_string()),
            corporation_id: None,
            plate: None,
            route_number: None,
            emergency_type: Some(kind.to_string()),
            description: None,
            latitude: located.then_some(-33.4),
            longitude: located.then_some(-70.6),
            created_at: None,
        }
    }

    #[test]
    fn test_reduce_empty() {
        let summary = BusEmergencies::reduce(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.with_location, 0);
        assert_eq!(summary.location_pct, 0.0);
        assert!(summary.by_school.is_empty());
        assert_eq!(summary.most_affected_school, None);
        assert_eq!(summary, EmergencySummary::default());
    }

    #[test]
    fn test_reduce_counts() {
        let rows = vec![
            emergency(1, "North", "MECHANICAL", true),
            emergency(2, "North", "ACCIDENT", false),
            emergency(3, "South", "MECHANICAL", true),
        ];
        let summary = BusEmergencies::reduce(&rows);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.with_location, 2);
        assert!((summary.location_pct - 66.666).abs() < 0.01);
        assert_eq!(summary.by_school.get("North"), Some(&2));
        assert_eq!(summary.by_type.get("Mechanical failure"), Some(&2));
        assert_eq!(summary.most_affected_school.as_deref(), Some("North"));
    }

    #[test]
    fn test_row_accepts_numeric_route_number() {
        let row: Emergency = serde_json::from_value(json!({
            "id": 4,
            "routeNumber": 12,
            "plate": "KX-22",
        }))
        .unwrap();
        assert_eq!(row.route_number.as_deref(), Some("12"));
        assert_eq!(row.plate.as_deref(), Some("KX-22"));
        assert_eq!(row.latitude, None);
    }
}
