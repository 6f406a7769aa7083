//! Per-entity configuration consumed by [`crate::controller::ListController`].

use crate::filter::FilterSchema;
use crate::paging::{SortPolicy, SortSpec};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Where a page's summary cards come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    /// [`Resource::reduce`] over the rows of the current page.
    Reduce,
    /// A backend endpoint taking the same filters as the list, without paging.
    Endpoint(&'static str),
}

pub trait Resource {
    type Row: DeserializeOwned + Serialize + Clone + Debug + Send;
    type Detail: DeserializeOwned + Serialize + Debug + Send;
    type Summary: DeserializeOwned + Serialize + Default + Clone + Debug + PartialEq + Send;

    /// Human-readable name used in logs.
    const NAME: &'static str;
    /// Collection path under the API base; records live at `{PATH}/{id}`.
    const PATH: &'static str;
    /// Key of the row array in list responses.
    const ROWS_KEY: &'static str;
    const FILTERS: FilterSchema;
    const SORT: SortPolicy = SortPolicy::Fixed;
    const SUMMARY: SummarySource = SummarySource::Reduce;

    fn default_sort() -> Option<SortSpec> {
        None
    }

    fn reduce(rows: &[Self::Row]) -> Self::Summary;
}
