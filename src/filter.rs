//! Per-page filter state.
//!
//! A [`FilterStore`] holds the current [`FilterSet`] for one list page and is
//! mutated only through [`FilterStore::set_filter`]. Which keys exist, which
//! of them are primary selectors and which depend on the primary selection
//! is fixed per page by a [`FilterSchema`].

use crate::error::FilterError;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub const SCHOOL_ID: &str = "schoolId";
pub const CORPORATION_ID: &str = "corporationId";
pub const PLATE: &str = "plate";
pub const ROUTE_NUMBER: &str = "routeNumber";
pub const START_DATE: &str = "startDate";
pub const END_DATE: &str = "endDate";
pub const SCHEDULE: &str = "schedule";
pub const DAY: &str = "day";
pub const REASON: &str = "reason";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterValue {
    Text(String),
    Number(i64),
    Date(NaiveDate),
}

impl FilterValue {
    /// Wire form. Dates are always `YYYY-MM-DD`.
    pub fn to_query_value(&self) -> String {
        match self {
            FilterValue::Text(s) => s.trim().to_string(),
            FilterValue::Number(n) => n.to_string(),
            FilterValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, FilterValue::Text(s) if s.trim().is_empty())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FilterValue::Number(n) => Some(*n),
            FilterValue::Text(s) => s.trim().parse().ok(),
            FilterValue::Date(_) => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        FilterValue::Date(value)
    }
}

/// The entity whose dependent options (buses, route numbers) a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryId {
    School(i64),
    Corporation(i64),
}

impl PrimaryId {
    pub fn id(&self) -> i64 {
        match self {
            PrimaryId::School(id) | PrimaryId::Corporation(id) => *id,
        }
    }

    /// Collection segment used by the option endpoints.
    pub fn collection(&self) -> &'static str {
        match self {
            PrimaryId::School(_) => "schools",
            PrimaryId::Corporation(_) => "corporations",
        }
    }
}

/// Static description of a page's filters.
#[derive(Debug, Clone, Copy)]
pub struct FilterSchema {
    /// Every key the page offers, in display order.
    pub keys: &'static [&'static str],
    /// Mutually exclusive primary selectors.
    pub primary: &'static [&'static str],
    /// Keys cleared whenever the primary selection changes.
    pub dependents: &'static [&'static str],
}

impl FilterSchema {
    fn canonical(&self, key: &str) -> Option<&'static str> {
        self.keys.iter().copied().find(|k| *k == key)
    }

    fn is_primary(&self, key: &str) -> bool {
        self.primary.contains(&key)
    }
}

/// Active constraints of a list view. Unset keys are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSet {
    values: BTreeMap<&'static str, FilterValue>,
}

impl FilterSet {
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Query pairs for every set key, in key order.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_blank())
            .map(|(k, v)| (k.to_string(), v.to_query_value()))
            .collect()
    }
}

/// What a single [`FilterStore::set_filter`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterChange {
    pub changed: bool,
    pub primary_changed: bool,
}

#[derive(Debug, Clone)]
pub struct FilterStore {
    schema: FilterSchema,
    values: FilterSet,
}

impl FilterStore {
    pub fn new(schema: FilterSchema) -> Self {
        Self {
            schema,
            values: FilterSet::default(),
        }
    }

    pub fn schema(&self) -> &FilterSchema {
        &self.schema
    }

    pub fn values(&self) -> &FilterSet {
        &self.values
    }

    /// Replaces one field and keeps the others.
    ///
    /// `None` and blank text unset the key. Changing a primary selector also
    /// clears the other primary selectors and every dependent key, all in
    /// this one call.
    pub fn set_filter(
        &mut self,
        key: &str,
        value: Option<FilterValue>,
    ) -> Result<FilterChange, FilterError> {
        let key = self
            .schema
            .canonical(key)
            .ok_or_else(|| FilterError::UnknownKey(key.to_string()))?;
        let value = value.filter(|v| !v.is_blank());

        if self.values.values.get(key) == value.as_ref() {
            return Ok(FilterChange::default());
        }

        match value {
            Some(v) => {
                self.values.values.insert(key, v);
            }
            None => {
                self.values.values.remove(key);
            }
        }

        let primary_changed = self.schema.is_primary(key);
        if primary_changed {
            for other in self.schema.primary.iter().filter(|k| **k != key) {
                self.values.values.remove(other);
            }
            for dependent in self.schema.dependents {
                self.values.values.remove(dependent);
            }
        }

        Ok(FilterChange {
            changed: true,
            primary_changed,
        })
    }

    /// Removes every filter. Reports a primary change if one was set.
    pub fn clear(&mut self) -> FilterChange {
        if self.values.is_empty() {
            return FilterChange::default();
        }
        let primary_changed = self.primary().is_some();
        self.values.values.clear();
        FilterChange {
            changed: true,
            primary_changed,
        }
    }

    /// The currently selected school or corporation, if any.
    pub fn primary(&self) -> Option<PrimaryId> {
        self.schema.primary.iter().find_map(|key| {
            let id = self.values.get(key)?.as_i64()?;
            match *key {
                SCHOOL_ID => Some(PrimaryId::School(id)),
                CORPORATION_ID => Some(PrimaryId::Corporation(id)),
                _ => None,
            }
        })
    }
}
