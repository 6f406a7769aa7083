//! Deletes behind an explicit confirmation step, and create/update saves
//! from an edit dialog.
//!
//! Both flows follow the same begin / execute / apply split as list and
//! detail loads: `begin_*` marks the flow busy and hands out the request,
//! the request runs without borrowing the state, and `apply_*` settles it.
//! Neither flow refreshes the list on its own; the outcome tells the owning
//! controller whether a refetch is due.

use crate::error::ApiResult;
use crate::fetch::{Api, HttpClient};
use crate::notify::Notifications;
use crate::slot::{Slot, Ticket};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    NothingPending,
    Deleted(i64),
    Failed(i64),
}

/// The "are you sure?" step in front of a delete.
#[derive(Debug, Default)]
pub struct DeleteConfirmation {
    pending: Option<i64>,
    in_flight: Slot<i64>,
    deleting: bool,
}

impl DeleteConfirmation {
    /// Ignored while a delete is in flight.
    pub fn request(&mut self, id: i64) {
        if !self.deleting {
            self.pending = Some(id);
        }
    }

    pub fn cancel(&mut self) {
        if !self.deleting {
            self.pending = None;
        }
    }

    pub fn pending(&self) -> Option<i64> {
        self.pending
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Starts deleting the pending id. `None` when nothing is pending or a
    /// delete is already running.
    pub fn begin(&mut self) -> Option<Ticket<i64>> {
        if self.deleting {
            debug!(id = ?self.pending, "Delete already in flight");
            return None;
        }
        let id = self.pending?;
        self.deleting = true;
        Some(self.in_flight.issue(id))
    }

    /// Success closes the confirmation; failure notifies and leaves it open so
    /// the user can retry or cancel.
    pub fn apply(
        &mut self,
        ticket: &Ticket<i64>,
        result: ApiResult<()>,
        notifications: &mut Notifications,
    ) -> DeleteOutcome {
        if !self.in_flight.is_current(ticket) {
            debug!(seq = ticket.seq(), "Discarding stale delete result");
            return DeleteOutcome::NothingPending;
        }
        self.deleting = false;
        self.in_flight.invalidate();

        let id = *ticket.key();
        match result {
            Ok(()) => {
                info!(id, "Record deleted");
                self.pending = None;
                notifications.success("Record deleted");
                DeleteOutcome::Deleted(id)
            }
            Err(e) => {
                error!(error = %e, id, "Delete failed");
                let message = format!("Could not delete record {id}: {}", e.user_message());
                notifications.error(message);
                DeleteOutcome::Failed(id)
            }
        }
    }
}

pub async fn delete_record<C: HttpClient>(api: &Api<C>, path: &str, id: i64) -> ApiResult<()> {
    api.delete(&format!("{path}/{id}")).await
}

/// A record that can be created (no id yet) or updated (has an id).
pub trait Draft: Serialize + Clone {
    fn id(&self) -> Option<i64>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    NotOpen,
    Created(Value),
    Updated(Value),
    Failed,
}

/// Snapshot of a draft taken when a save starts.
#[derive(Debug, Clone)]
pub struct SaveRequest<D> {
    draft: D,
}

impl<D: Draft> SaveRequest<D> {
    pub fn draft(&self) -> &D {
        &self.draft
    }

    /// POST when the draft has no id, PUT otherwise.
    pub async fn send<C: HttpClient>(&self, api: &Api<C>, path: &str) -> ApiResult<Value> {
        match self.draft.id() {
            None => api.send_json(Method::POST, path, &self.draft).await,
            Some(id) => api.send_json(Method::PUT, &format!("{path}/{id}"), &self.draft).await,
        }
    }
}

#[derive(Debug)]
pub struct EditDialog<D> {
    draft: Option<D>,
    saving: bool,
}

impl<D> Default for EditDialog<D> {
    fn default() -> Self {
        Self {
            draft: None,
            saving: false,
        }
    }
}

impl<D: Draft> EditDialog<D> {
    pub fn open(&mut self, draft: D) {
        self.draft = Some(draft);
    }

    pub fn close(&mut self) {
        if !self.saving {
            self.draft = None;
        }
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn draft(&self) -> Option<&D> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        self.draft.as_mut()
    }

    /// Snapshots the draft for sending. `None` when the dialog is closed or a
    /// save is already running.
    pub fn begin_save(&mut self) -> Option<SaveRequest<D>> {
        if self.saving {
            return None;
        }
        let draft = self.draft.clone()?;
        self.saving = true;
        Some(SaveRequest { draft })
    }

    /// On failure the dialog stays open with the entered values.
    pub fn apply_save(
        &mut self,
        request: SaveRequest<D>,
        result: ApiResult<Value>,
        notifications: &mut Notifications,
    ) -> SaveOutcome {
        self.saving = false;
        let id = request.draft.id();
        match result {
            Ok(body) => {
                self.draft = None;
                if id.is_some() {
                    notifications.success("Changes saved");
                    SaveOutcome::Updated(body)
                } else {
                    notifications.success("Record created");
                    SaveOutcome::Created(body)
                }
            }
            Err(e) => {
                error!(error = %e, id = ?id, "Save failed");
                notifications.error(format!("Could not save: {}", e.user_message()));
                SaveOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[derive(Debug, Clone, Serialize)]
    struct Note {
        id: Option<i64>,
    }

    impl Draft for Note {
        fn id(&self) -> Option<i64> {
            self.id
        }
    }

    fn conflict() -> ApiError {
        ApiError::Status {
            url: "http://x/routes/3".to_string(),
            status: 409,
            body: String::new(),
        }
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut confirm = DeleteConfirmation::default();
        confirm.request(3);
        assert_eq!(confirm.pending(), Some(3));
        confirm.cancel();
        assert_eq!(confirm.pending(), None);
    }

    #[test]
    fn test_begin_without_request_does_nothing() {
        let mut confirm = DeleteConfirmation::default();
        assert!(confirm.begin().is_none());
        assert!(!confirm.is_deleting());
    }

    #[test]
    fn test_delete_in_flight_is_visible_and_locked() {
        let mut confirm = DeleteConfirmation::default();
        let mut notes = Notifications::default();
        confirm.request(3);

        let ticket = confirm.begin().unwrap();
        assert!(confirm.is_deleting());
        assert!(confirm.begin().is_none());
        confirm.cancel();
        confirm.request(4);
        assert_eq!(confirm.pending(), Some(3));

        assert_eq!(confirm.apply(&ticket, Ok(()), &mut notes), DeleteOutcome::Deleted(3));
        assert!(!confirm.is_deleting());
        assert_eq!(confirm.pending(), None);
    }

    #[test]
    fn test_failed_delete_can_be_retried() {
        let mut confirm = DeleteConfirmation::default();
        let mut notes = Notifications::default();
        confirm.request(3);

        let first = confirm.begin().unwrap();
        assert_eq!(confirm.apply(&first, Err(conflict()), &mut notes), DeleteOutcome::Failed(3));
        assert_eq!(confirm.pending(), Some(3));

        let second = confirm.begin().unwrap();
        assert_eq!(confirm.apply(&first, Ok(()), &mut notes), DeleteOutcome::NothingPending);
        assert!(confirm.is_deleting());
        assert_eq!(confirm.apply(&second, Ok(()), &mut notes), DeleteOutcome::Deleted(3));
    }

    #[test]
    fn test_edit_dialog_open_close() {
        let mut dialog = EditDialog::default();
        dialog.open(Note { id: None });
        assert!(dialog.is_open());
        dialog.draft_mut().unwrap().id = Some(5);
        assert_eq!(dialog.draft().unwrap().id, Some(5));
        dialog.close();
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_save_in_flight_keeps_dialog_open() {
        let mut dialog = EditDialog::default();
        let mut notes = Notifications::default();
        assert!(dialog.begin_save().is_none());

        dialog.open(Note { id: Some(5) });
        let request = dialog.begin_save().unwrap();
        assert!(dialog.is_saving());
        assert!(dialog.begin_save().is_none());
        dialog.close();
        assert!(dialog.is_open());

        let outcome = dialog.apply_save(request, Ok(Value::Null), &mut notes);
        assert_eq!(outcome, SaveOutcome::Updated(Value::Null));
        assert!(!dialog.is_saving());
        assert!(!dialog.is_open());
    }
}
