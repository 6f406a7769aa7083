//! Fuel loads per bus. Summary cards come from the backend statistics
//! endpoint rather than from the visible page.

use crate::filter::{
    CORPORATION_ID, END_DATE, FilterSchema, PLATE, REASON, SCHOOL_ID, START_DATE,
};
use crate::labels::{FUELING_REASONS, label};
use crate::resource::{Resource, SummarySource};
use crate::stats::{Located, count_by, mean};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "super::opt_string_or_number")]
    pub plate: Option<String>,
    pub school_name: Option<String>,
    pub corporation_name: Option<String>,
    pub liters: Option<f64>,
    pub cost: Option<f64>,
    pub reason: Option<String>,
    pub fueled_at: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl FuelRecord {
    pub fn reason_label(&self) -> Option<&str> {
        self.reason.as_deref().map(|c| label(FUELING_REASONS, c))
    }
}

impl Located for FuelRecord {
    fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    fn longitude(&self) -> Option<f64> {
        self.longitude
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FuelSummary {
    pub total_records: u64,
    pub total_liters: f64,
    pub total_cost: f64,
    pub average_liters: f64,
    pub by_reason: BTreeMap<String, usize>,
}

pub struct FuelRecords;

impl Resource for FuelRecords {
    type Row = FuelRecord;
    type Detail = FuelRecord;
    type Summary = FuelSummary;

    const NAME: &'static str = "fuel records";
    const PATH: &'static str = "fuel-records";
    const ROWS_KEY: &'static str = "records";
    const FILTERS: FilterSchema = FilterSchema {
        keys: &[SCHOOL_ID, CORPORATION_ID, PLATE, REASON, START_DATE, END_DATE],
        primary: &[SCHOOL_ID, CORPORATION_ID],
        dependents: &[PLATE],
    };
    const SUMMARY: SummarySource = SummarySource::Endpoint("fuel-records/statistics");

    /// Page-level fallback with the same shape as the backend statistics.
    fn reduce(rows: &[FuelRecord]) -> FuelSummary {
        let liters: Vec<f64> = rows.iter().filter_map(|r| r.liters).collect();
        FuelSummary {
            total_records: rows.len() as u64,
            total_liters: liters.iter().sum(),
            total_cost: rows.iter().filter_map(|r| r.cost).sum(),
            average_liters: mean(&liters),
            by_reason: count_by(rows, |r| r.reason_label().map(str::to_string)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reduce_empty_guards_average() {
        let summary = FuelRecords::reduce(&[]);
        assert_eq!(summary, FuelSummary::default());
        assert_eq!(summary.average_liters, 0.0);
    }

    #[test]
    fn test_reduce_sums_known_values() {
        let rows: Vec<FuelRecord> = serde_json::from_value(json!([
            { "id": 1, "liters": 40.0, "cost": 50000.0, "reason": "ROUTE" },
            { "id": 2, "liters": 20.0, "reason": "ROUTE" },
            { "id": 3 },
        ]))
        .unwrap();
        let summary = FuelRecords::reduce(&rows);

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.total_liters, 60.0);
        assert_eq!(summary.total_cost, 50000.0);
        assert_eq!(summary.average_liters, 30.0);
        assert_eq!(summary.by_reason.get("Regular route"), Some(&2));
    }

    #[test]
    fn test_summary_tolerates_partial_backend_payload() {
        let summary: FuelSummary =
            serde_json::from_value(json!({ "totalRecords": 8, "totalLiters": 310.5 })).unwrap();
        assert_eq!(summary.total_records, 8);
        assert_eq!(summary.total_cost, 0.0);
    }
}
