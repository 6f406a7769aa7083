//! Building blocks for summary cards.
//!
//! Summaries are pure reductions over the rows currently held by a list, so
//! they describe the visible page, not the whole filtered dataset.

use std::collections::BTreeMap;

/// Rows that may carry a GPS fix.
pub trait Located {
    fn latitude(&self) -> Option<f64>;
    fn longitude(&self) -> Option<f64>;

    fn has_location(&self) -> bool {
        self.latitude().is_some() && self.longitude().is_some()
    }
}

/// Rows with both latitude and longitude.
pub fn count_with_location<T: Located>(rows: &[T]) -> usize {
    rows.iter().filter(|r| r.has_location()).count()
}

/// Histogram over a categorical field. Rows without a value are skipped.
pub fn count_by<T, F>(rows: &[T], key: F) -> BTreeMap<String, usize>
where
    F: Fn(&T) -> Option<String>,
{
    let mut counts = BTreeMap::new();
    for row in rows {
        if let Some(k) = key(row) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts
}

/// Key with the highest count; ties go to the smallest key.
pub fn most_frequent(counts: &BTreeMap<String, usize>) -> Option<(String, usize)> {
    counts
        .iter()
        .fold(None, |best: Option<(&String, usize)>, (k, v)| match best {
            Some((_, n)) if n >= *v => best,
            _ => Some((k, *v)),
        })
        .map(|(k, v)| (k.clone(), v))
}

/// Arithmetic mean. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
