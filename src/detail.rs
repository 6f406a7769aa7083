//! On-demand loading of a single record for a detail dialog.

use crate::error::ApiResult;
use crate::fetch::{Api, HttpClient};
use crate::notify::Notifications;
use crate::slot::{Applied, Loadable, Phase, Ticket};
use serde::de::DeserializeOwned;
use tracing::error;

/// What the dialog should render.
#[derive(Debug, PartialEq)]
pub enum DetailView<'a, D> {
    Closed,
    Loading,
    Loaded(&'a D),
    /// Open, but the record could not be loaded.
    Unavailable,
}

#[derive(Debug)]
pub struct DetailDialog<D> {
    open: bool,
    record: Loadable<i64, D>,
}

impl<D> Default for DetailDialog<D> {
    fn default() -> Self {
        Self {
            open: false,
            record: Loadable::default(),
        }
    }
}

impl<D> DetailDialog<D> {
    /// Opens the dialog for `id`, discarding whatever it showed before.
    pub fn open(&mut self, id: i64) -> Ticket<i64> {
        self.record.reset();
        self.open = true;
        self.record.begin(id)
    }

    pub fn apply(
        &mut self,
        ticket: &Ticket<i64>,
        outcome: ApiResult<D>,
        notifications: &mut Notifications,
    ) -> Applied {
        if let Err(e) = &outcome {
            error!(error = %e, id = *ticket.key(), "Detail fetch failed");
        }
        let message = outcome.as_ref().err().map(|e| e.user_message());
        let applied = self.record.apply(ticket, outcome);
        if let (Applied::Failed, Some(message)) = (applied, message) {
            notifications.error(format!("Could not load record {}: {message}", ticket.key()));
        }
        applied
    }

    /// Closes the dialog. A response still in flight is dropped on arrival.
    pub fn close(&mut self) {
        self.open = false;
        self.record.reset();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.record.is_loading()
    }

    pub fn record(&self) -> Option<&D> {
        self.record.value()
    }

    pub fn view(&self) -> DetailView<'_, D> {
        if !self.open {
            return DetailView::Closed;
        }
        match (self.record.phase(), self.record.value()) {
            (Phase::Loading, _) => DetailView::Loading,
            (_, Some(record)) => DetailView::Loaded(record),
            _ => DetailView::Unavailable,
        }
    }
}

pub async fn fetch_detail<C, D>(api: &Api<C>, path: &str, id: i64) -> ApiResult<D>
where
    C: HttpClient,
    D: DeserializeOwned,
{
    api.get_json(&format!("{path}/{id}"), &[]).await
}
