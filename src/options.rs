//! Dropdown choices that depend on the selected school or corporation.
//!
//! Loading is split in three steps so the caller can run the network part
//! without holding the state: [`DependentOptions::select`] issues a ticket,
//! [`fetch_dependents`] performs both requests concurrently, and
//! [`DependentOptions::apply`] stores the results only if the ticket is
//! still the latest selection.

use crate::error::ApiResult;
use crate::fetch::{Api, HttpClient};
use crate::filter::PrimaryId;
use crate::slot::{Slot, Ticket};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusOption {
    pub id: i64,
    pub plate: String,
}

/// Results of one [`fetch_dependents`] call, tagged with its ticket.
#[derive(Debug)]
pub struct DependentFetch {
    pub ticket: Ticket<PrimaryId>,
    pub buses: ApiResult<Vec<BusOption>>,
    pub route_numbers: ApiResult<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct DependentOptions {
    slot: Slot<PrimaryId>,
    buses: Vec<BusOption>,
    route_numbers: Vec<String>,
    loading: bool,
}

impl DependentOptions {
    /// Starts a load for `primary`. With no primary the options are cleared
    /// right away, no request is needed and `None` is returned.
    pub fn select(&mut self, primary: Option<PrimaryId>) -> Option<Ticket<PrimaryId>> {
        match primary {
            None => {
                self.slot.invalidate();
                self.buses.clear();
                self.route_numbers.clear();
                self.loading = false;
                None
            }
            Some(primary) => {
                self.loading = true;
                Some(self.slot.issue(primary))
            }
        }
    }

    /// Returns `false` if the fetch belonged to a superseded selection.
    pub fn apply(&mut self, fetch: DependentFetch) -> bool {
        if !self.slot.is_current(&fetch.ticket) {
            debug!(
                primary = ?fetch.ticket.key(),
                seq = fetch.ticket.seq(),
                "Discarding stale dependent options"
            );
            return false;
        }

        self.buses = fetch.buses.unwrap_or_else(|e| {
            error!(error = %e, primary = ?fetch.ticket.key(), "Failed to load buses");
            Vec::new()
        });
        self.route_numbers = fetch.route_numbers.unwrap_or_else(|e| {
            error!(error = %e, primary = ?fetch.ticket.key(), "Failed to load route numbers");
            Vec::new()
        });
        self.loading = false;
        true
    }

    /// `select`, fetch and `apply` in one go.
    pub async fn load<C: HttpClient>(&mut self, api: &Api<C>, primary: Option<PrimaryId>) {
        if let Some(ticket) = self.select(primary) {
            let fetch = fetch_dependents(api, ticket).await;
            self.apply(fetch);
        }
    }

    pub fn buses(&self) -> &[BusOption] {
        &self.buses
    }

    pub fn route_numbers(&self) -> &[String] {
        &self.route_numbers
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected(&self) -> Option<PrimaryId> {
        self.slot.current().copied()
    }
}

/// Fetches buses and route numbers for the ticket's entity in parallel.
#[tracing::instrument(skip(api, ticket), fields(primary = ?ticket.key()))]
pub async fn fetch_dependents<C: HttpClient>(
    api: &Api<C>,
    ticket: Ticket<PrimaryId>,
) -> DependentFetch {
    let primary = *ticket.key();
    let buses_path = format!("{}/{}/buses", primary.collection(), primary.id());
    let routes_path = format!("{}/{}/route-numbers", primary.collection(), primary.id());

    let (buses, route_numbers) = tokio::join!(
        api.get_json::<Vec<BusOption>>(&buses_path, &[]),
        api.get_json::<Vec<Value>>(&routes_path, &[]),
    );

    DependentFetch {
        ticket,
        buses,
        route_numbers: route_numbers.map(|values| {
            sort_route_numbers(values.iter().filter_map(route_number_text).collect())
        }),
    }
}

/// Accepts `"12"`, `12` or `{ "routeNumber": ... }`.
fn route_number_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("routeNumber").and_then(route_number_text),
        _ => None,
    }
}

/// Ascending and deduplicated. Numeric order when every value parses as an
/// integer, plain string order otherwise.
pub fn sort_route_numbers(mut values: Vec<String>) -> Vec<String> {
    let all_numeric = values.iter().all(|v| v.trim().parse::<i64>().is_ok());
    if all_numeric {
        values.sort_by(|a, b| compare_numeric(a, b));
    } else {
        values.sort();
    }
    values.dedup();
    values
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}
