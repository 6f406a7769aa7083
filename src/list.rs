//! Paginated list fetching.

use crate::error::{ApiError, ApiResult};
use crate::fetch::{Api, HttpClient};
use crate::paging::ListQuery;
use crate::slot::{Applied, Loadable, Phase, Ticket};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

/// One page of rows plus the backend's total for the whole filtered set.
/// Replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
        }
    }
}

/// Extracts `{ <rows_key>: [...], total: n }`. Falls back to `data` when the
/// named key is absent; a missing `total` means "this page is everything".
pub fn decode_list<T: DeserializeOwned>(
    mut body: Value,
    rows_key: &str,
) -> Result<ListResult<T>, String> {
    let object = body
        .as_object_mut()
        .ok_or_else(|| "list response is not a JSON object".to_string())?;
    let rows = object
        .remove(rows_key)
        .or_else(|| object.remove("data"))
        .ok_or_else(|| format!("list response has no `{rows_key}` array"))?;
    let total = object.get("total").and_then(Value::as_u64);

    let rows = Vec::<T>::deserialize(rows).map_err(|e| e.to_string())?;
    let total_count = total.unwrap_or(rows.len() as u64);
    Ok(ListResult { rows, total_count })
}

#[tracing::instrument(skip(api, query))]
pub async fn fetch_list<C, T>(
    api: &Api<C>,
    path: &str,
    rows_key: &str,
    query: &ListQuery,
) -> ApiResult<ListResult<T>>
where
    C: HttpClient,
    T: DeserializeOwned,
{
    let body: Value = api.get_json(path, &query.to_query_pairs()).await?;
    decode_list(body, rows_key).map_err(|reason| ApiError::Decode {
        url: path.to_string(),
        reason,
    })
}

/// What a list view should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Loaded,
    /// The fetch succeeded with zero rows.
    Empty,
    /// The last fetch failed; previously fetched rows are still shown.
    Error,
}

pub type ListTicket = Ticket<ListQuery>;

#[derive(Debug)]
pub struct ListState<T> {
    inner: Loadable<ListQuery, ListResult<T>>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            inner: Loadable::default(),
        }
    }
}

impl<T> ListState<T> {
    pub fn begin(&mut self, query: ListQuery) -> ListTicket {
        self.inner.begin(query)
    }

    /// Stores a fresh page, or logs the failure and keeps the old rows.
    pub fn apply(&mut self, ticket: &ListTicket, outcome: ApiResult<ListResult<T>>) -> Applied {
        if let Err(e) = &outcome {
            error!(error = %e, "List fetch failed");
        }
        self.inner.apply(ticket, outcome)
    }

    pub fn rows(&self) -> &[T] {
        self.inner.value().map(|r| r.rows.as_slice()).unwrap_or(&[])
    }

    pub fn total_count(&self) -> u64 {
        self.inner.value().map(|r| r.total_count).unwrap_or(0)
    }

    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.inner.error()
    }

    pub fn status(&self) -> ListStatus {
        match self.inner.phase() {
            Phase::Idle => ListStatus::Idle,
            Phase::Loading => ListStatus::Loading,
            Phase::Error => ListStatus::Error,
            Phase::Loaded if self.rows().is_empty() => ListStatus::Empty,
            Phase::Loaded => ListStatus::Loaded,
        }
    }

    /// Query of the most recently issued fetch.
    pub fn last_query(&self) -> Option<&ListQuery> {
        self.inner.current_key()
    }
}
