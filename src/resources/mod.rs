//! The dashboard's list pages.

pub mod emergencies;
pub mod fuel_records;
pub mod routes;
pub mod time_logs;

pub use emergencies::BusEmergencies;
pub use fuel_records::FuelRecords;
pub use routes::Routes;
pub use time_logs::RouteTimeLogs;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Route numbers and plates come back as either strings or numbers.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
