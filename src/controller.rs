//! One list page: filters, paging, sorting, the fetched rows, their summary,
//! dependent dropdowns, a detail dialog and row mutations.
//!
//! Changes only mark state. Nothing is fetched until [`ListController::sync`]
//! (or the split [`begin_sync`](ListController::begin_sync) /
//! [`execute`](ListController::execute) / [`apply`](ListController::apply)
//! sequence) runs, and it compares the current [`ListQuery`] with the last
//! issued one. Any number of changes made between two syncs therefore cost a
//! single request.

use crate::detail::{DetailDialog, fetch_detail};
use crate::error::{ApiResult, FilterError};
use crate::fetch::{Api, HttpClient};
use crate::filter::{FilterSet, FilterStore, FilterValue, PrimaryId};
use crate::list::{ListResult, ListState, ListStatus, ListTicket, fetch_list};
use crate::mutation::{
    DeleteConfirmation, DeleteOutcome, Draft, EditDialog, SaveOutcome, SaveRequest, delete_record,
};
use crate::notify::Notifications;
use crate::options::{DependentFetch, DependentOptions, fetch_dependents};
use crate::paging::{ListQuery, PAGE_SIZE_OPTIONS, PageRequest, SortSpec};
use crate::resource::{Resource, SummarySource};
use crate::slot::{Applied, Loadable, Phase, Ticket};
use serde_json::Value;
use tracing::{debug, error, info};

/// Requests issued by one [`ListController::begin_sync`].
#[derive(Debug)]
pub struct SyncPlan {
    pub list: Option<ListTicket>,
    pub summary: Option<(&'static str, Ticket<FilterSet>)>,
    pub options: Option<Ticket<PrimaryId>>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.list.is_none() && self.summary.is_none() && self.options.is_none()
    }
}

/// Responses for a [`SyncPlan`], still tagged with their tickets.
pub struct SyncOutcome<R: Resource> {
    pub list: Option<(ListTicket, ApiResult<ListResult<R::Row>>)>,
    pub summary: Option<(Ticket<FilterSet>, ApiResult<R::Summary>)>,
    pub options: Option<DependentFetch>,
}

pub struct ListController<R: Resource> {
    filters: FilterStore,
    page: PageRequest,
    sort: Option<SortSpec>,
    list: ListState<R::Row>,
    summary: R::Summary,
    remote_summary: Loadable<FilterSet, R::Summary>,
    options: DependentOptions,
    options_dirty: bool,
    refresh_requested: bool,
    detail: DetailDialog<R::Detail>,
    deletion: DeleteConfirmation,
    notifications: Notifications,
}

impl<R: Resource> Default for ListController<R> {
    fn default() -> Self {
        Self::new(PageRequest::default().page_size)
    }
}

impl<R: Resource> ListController<R> {
    pub fn new(page_size: u32) -> Self {
        Self {
            filters: FilterStore::new(R::FILTERS),
            page: PageRequest::new(page_size),
            sort: R::default_sort(),
            list: ListState::default(),
            summary: R::Summary::default(),
            remote_summary: Loadable::default(),
            options: DependentOptions::default(),
            options_dirty: false,
            refresh_requested: false,
            detail: DetailDialog::default(),
            deletion: DeleteConfirmation::default(),
            notifications: Notifications::default(),
        }
    }

    // --- filters, paging, sorting -------------------------------------------

    /// Returns whether anything changed. Any change goes back to page 0.
    pub fn set_filter(
        &mut self,
        key: &str,
        value: Option<FilterValue>,
    ) -> Result<bool, FilterError> {
        let change = self.filters.set_filter(key, value)?;
        if change.changed {
            self.page.page_index = 0;
        }
        if change.primary_changed {
            self.options_dirty = true;
        }
        Ok(change.changed)
    }

    pub fn clear_filters(&mut self) {
        let change = self.filters.clear();
        if change.changed {
            self.page.page_index = 0;
        }
        if change.primary_changed {
            self.options_dirty = true;
        }
    }

    /// Moves to `page_index`, clamped to the last known page.
    pub fn set_page(&mut self, page_index: u32) {
        self.page.page_index = page_index.min(self.page.last_index(self.list.total_count()));
    }

    pub fn next_page(&mut self) {
        if self.page.has_next(self.list.total_count()) {
            self.page.page_index += 1;
        }
    }

    pub fn previous_page(&mut self) {
        self.page.page_index = self.page.page_index.saturating_sub(1);
    }

    /// Accepts only sizes from [`PAGE_SIZE_OPTIONS`].
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) || page_size == self.page.page_size {
            return false;
        }
        self.page = PageRequest::new(page_size);
        true
    }

    /// Header click on `column`, interpreted by the resource's sort policy.
    pub fn sort_by(&mut self, column: &str) {
        let next = R::SORT.click(self.sort.as_ref(), column);
        if next != self.sort {
            self.sort = next;
            self.page.page_index = 0;
        }
    }

    /// Forces the next sync to refetch even if the query is unchanged.
    pub fn refresh(&mut self) {
        self.refresh_requested = true;
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            filters: self.filters.values().clone(),
            page: self.page,
            sort: self.sort.clone(),
        }
    }

    pub fn needs_fetch(&self) -> bool {
        self.refresh_requested || self.list.last_query() != Some(&self.query())
    }

    // --- fetching ------------------------------------------------------------

    /// Issues tickets for everything that is out of date.
    pub fn begin_sync(&mut self) -> SyncPlan {
        let options = if self.options_dirty {
            self.options_dirty = false;
            self.options.select(self.filters.primary())
        } else {
            None
        };

        let mut summary = None;
        let list = if self.needs_fetch() {
            let refresh = std::mem::take(&mut self.refresh_requested);
            let query = self.query();
            if let SummarySource::Endpoint(path) = R::SUMMARY {
                let filters = query.filters.clone();
                let failed = self.remote_summary.phase() == Phase::Error;
                if refresh || failed || self.remote_summary.current_key() != Some(&filters) {
                    summary = Some((path, self.remote_summary.begin(filters)));
                }
            }
            debug!(resource = R::NAME, query = ?query, "Issuing list fetch");
            Some(self.list.begin(query))
        } else {
            None
        };

        SyncPlan {
            list,
            summary,
            options,
        }
    }

    /// Runs every request of `plan` concurrently. Borrows nothing from the
    /// controller, so newer plans may be issued while this is in flight.
    pub async fn execute<C: HttpClient>(api: &Api<C>, plan: SyncPlan) -> SyncOutcome<R> {
        let SyncPlan {
            list,
            summary,
            options,
        } = plan;

        let list = async move {
            match list {
                Some(ticket) => {
                    let result = fetch_list(api, R::PATH, R::ROWS_KEY, ticket.key()).await;
                    Some((ticket, result))
                }
                None => None,
            }
        };
        let summary = async move {
            match summary {
                Some((path, ticket)) => {
                    let result = api
                        .get_json::<R::Summary>(path, &ticket.key().to_query_pairs())
                        .await;
                    Some((ticket, result))
                }
                None => None,
            }
        };
        let options = async move {
            match options {
                Some(ticket) => Some(fetch_dependents(api, ticket).await),
                None => None,
            }
        };

        let (list, summary, options) = tokio::join!(list, summary, options);
        SyncOutcome {
            list,
            summary,
            options,
        }
    }

    /// Stores whatever in `outcome` is still current.
    ///
    /// A page that came back empty because the total shrank below it (the
    /// last row of the last page was deleted) moves the page index back to
    /// the new last page, leaving the list due for another fetch.
    pub fn apply(&mut self, outcome: SyncOutcome<R>) {
        if let Some((ticket, result)) = outcome.list {
            if self.list.apply(&ticket, result) == Applied::Stored {
                self.summary = R::reduce(self.list.rows());
                self.clamp_page(ticket.key().page);
            }
        }
        if let Some((ticket, result)) = outcome.summary {
            if let Err(e) = &result {
                error!(error = %e, resource = R::NAME, "Statistics fetch failed");
            }
            self.remote_summary.apply(&ticket, result);
        }
        if let Some(fetch) = outcome.options {
            self.options.apply(fetch);
        }
    }

    /// Fetches until nothing is out of date. A second round only happens when
    /// applying the first one moved the page.
    pub async fn sync<C: HttpClient>(&mut self, api: &Api<C>) {
        loop {
            let plan = self.begin_sync();
            if plan.is_empty() {
                return;
            }
            let outcome = Self::execute(api, plan).await;
            self.apply(outcome);
        }
    }

    fn clamp_page(&mut self, fetched: PageRequest) {
        let total = self.list.total_count();
        if fetched != self.page || !self.list.rows().is_empty() || total == 0 {
            return;
        }
        let last = self.page.last_index(total);
        if self.page.page_index > last {
            info!(resource = R::NAME, from = self.page.page_index, to = last, "Page past the end");
            self.page.page_index = last;
        }
    }

    // --- detail --------------------------------------------------------------

    pub fn open_detail(&mut self, id: i64) -> Ticket<i64> {
        self.detail.open(id)
    }

    pub fn apply_detail(&mut self, ticket: &Ticket<i64>, outcome: ApiResult<R::Detail>) -> Applied {
        self.detail.apply(ticket, outcome, &mut self.notifications)
    }

    pub async fn load_detail<C: HttpClient>(&mut self, api: &Api<C>, id: i64) {
        let ticket = self.open_detail(id);
        let outcome = fetch_detail(api, R::PATH, id).await;
        self.apply_detail(&ticket, outcome);
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    pub fn detail(&self) -> &DetailDialog<R::Detail> {
        &self.detail
    }

    // --- mutations -----------------------------------------------------------

    pub fn request_delete(&mut self, id: i64) {
        self.deletion.request(id);
    }

    pub fn cancel_delete(&mut self) {
        self.deletion.cancel();
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.deletion.pending()
    }

    pub fn is_deleting(&self) -> bool {
        self.deletion.is_deleting()
    }

    /// Starts deleting the confirmed row. Filters, paging and syncs stay
    /// usable until [`apply_delete`](Self::apply_delete) settles it.
    pub fn begin_delete(&mut self) -> Option<Ticket<i64>> {
        self.deletion.begin()
    }

    pub async fn execute_delete<C: HttpClient>(
        api: &Api<C>,
        ticket: &Ticket<i64>,
    ) -> ApiResult<()> {
        delete_record(api, R::PATH, *ticket.key()).await
    }

    /// Settles a delete. Success marks the list for refetch.
    pub fn apply_delete(&mut self, ticket: &Ticket<i64>, result: ApiResult<()>) -> DeleteOutcome {
        let outcome = self.deletion.apply(ticket, result, &mut self.notifications);
        if let DeleteOutcome::Deleted(_) = outcome {
            self.refresh();
        }
        outcome
    }

    /// Deletes the confirmed row and refetches the list on success.
    pub async fn confirm_delete<C: HttpClient>(&mut self, api: &Api<C>) -> DeleteOutcome {
        let Some(ticket) = self.begin_delete() else {
            return DeleteOutcome::NothingPending;
        };
        let result = Self::execute_delete(api, &ticket).await;
        let outcome = self.apply_delete(&ticket, result);
        if let DeleteOutcome::Deleted(_) = outcome {
            self.sync(api).await;
        }
        outcome
    }

    pub async fn execute_save<C: HttpClient, D: Draft>(
        api: &Api<C>,
        request: &SaveRequest<D>,
    ) -> ApiResult<Value> {
        request.send(api, R::PATH).await
    }

    /// Settles a save started with [`EditDialog::begin_save`]. Success marks
    /// the list for refetch.
    pub fn apply_save<D: Draft>(
        &mut self,
        dialog: &mut EditDialog<D>,
        request: SaveRequest<D>,
        result: ApiResult<Value>,
    ) -> SaveOutcome {
        let outcome = dialog.apply_save(request, result, &mut self.notifications);
        if matches!(outcome, SaveOutcome::Created(_) | SaveOutcome::Updated(_)) {
            self.refresh();
        }
        outcome
    }

    /// Saves `dialog`'s draft and refetches the list on success.
    pub async fn save<C: HttpClient, D: Draft>(
        &mut self,
        api: &Api<C>,
        dialog: &mut EditDialog<D>,
    ) -> SaveOutcome {
        let Some(request) = dialog.begin_save() else {
            return SaveOutcome::NotOpen;
        };
        let result = Self::execute_save(api, &request).await;
        let outcome = self.apply_save(dialog, request, result);
        if matches!(outcome, SaveOutcome::Created(_) | SaveOutcome::Updated(_)) {
            self.sync(api).await;
        }
        outcome
    }

    // --- view ----------------------------------------------------------------

    pub fn filters(&self) -> &FilterSet {
        self.filters.values()
    }

    pub fn primary(&self) -> Option<PrimaryId> {
        self.filters.primary()
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn rows(&self) -> &[R::Row] {
        self.list.rows()
    }

    pub fn total_count(&self) -> u64 {
        self.list.total_count()
    }

    pub fn status(&self) -> ListStatus {
        self.list.status()
    }

    pub fn range_label(&self) -> String {
        self.page.range_label(self.list.total_count())
    }

    /// Summary cards. Zero values until the first successful load.
    ///
    /// Pages backed by a statistics endpoint fall back to the reduction of
    /// the visible rows while the endpoint has never answered or its last
    /// request failed.
    pub fn summary(&self) -> &R::Summary {
        match R::SUMMARY {
            SummarySource::Reduce => &self.summary,
            SummarySource::Endpoint(_) => match self.remote_summary.phase() {
                Phase::Error => &self.summary,
                _ => self.remote_summary.value().unwrap_or(&self.summary),
            },
        }
    }

    pub fn summary_loading(&self) -> bool {
        self.remote_summary.is_loading()
    }

    /// Why the last statistics request failed, if it did.
    pub fn summary_error(&self) -> Option<&str> {
        self.remote_summary.error()
    }

    pub fn options(&self) -> &DependentOptions {
        &self.options
    }

    pub fn notifications(&mut self) -> &mut Notifications {
        &mut self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::filter::{CORPORATION_ID, PLATE, ROUTE_NUMBER, SCHOOL_ID};
    use crate::options::BusOption;
    use crate::paging::SortDirection;
    use crate::resources::emergencies::{BusEmergencies, Emergency};
    use crate::resources::fuel_records::{FuelRecord, FuelRecords, FuelSummary};

    fn emergency(id: i64, school: &str) -> Emergency {
        Emergency {
            id,
            school_id: None,
            school_name: Some(school.to_string()),
            corporation_id: None,
            plate: None,
            route_number: None,
            emergency_type: None,
            description: None,
            latitude: Some(1.0),
            longitude: Some(1.0),
            created_at: None,
        }
    }

    fn loaded(rows: Vec<Emergency>, total: u64) -> ApiResult<ListResult<Emergency>> {
        Ok(ListResult {
            rows,
            total_count: total,
        })
    }

    fn list_outcome(
        ticket: ListTicket,
        result: ApiResult<ListResult<Emergency>>,
    ) -> SyncOutcome<BusEmergencies> {
        SyncOutcome {
            list: Some((ticket, result)),
            summary: None,
            options: None,
        }
    }

    fn controller_on_page(page_index: u32) -> ListController<BusEmergencies> {
        let mut c: ListController<BusEmergencies> = ListController::new(10);
        let plan = c.begin_sync();
        c.apply(list_outcome(plan.list.unwrap(), loaded(vec![], 100)));
        c.set_page(page_index);
        c
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut c = controller_on_page(3);
        assert_eq!(c.page().page_index, 3);
        c.set_filter(PLATE, Some("AB-12".into())).unwrap();
        assert_eq!(c.page().page_index, 0);
    }

    #[test]
    fn test_page_navigation_keeps_page_index() {
        let mut c = controller_on_page(3);
        c.next_page();
        assert_eq!(c.page().page_index, 4);
        c.previous_page();
        c.previous_page();
        assert_eq!(c.page().page_index, 2);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut c = controller_on_page(3);
        assert!(c.set_page_size(50));
        assert_eq!(c.page(), PageRequest::new(50));
        assert!(!c.set_page_size(33));
    }

    #[test]
    fn test_sort_change_resets_page_and_toggles() {
        let mut c = controller_on_page(2);
        assert_eq!(
            c.sort(),
            Some(&SortSpec::new("createdAt", SortDirection::Desc))
        );
        c.sort_by("createdAt");
        assert_eq!(c.sort().unwrap().direction, SortDirection::Asc);
        assert_eq!(c.page().page_index, 0);
        c.sort_by("plate");
        assert_eq!(c.sort(), Some(&SortSpec::new("plate", SortDirection::Asc)));
    }

    #[test]
    fn test_set_page_clamps_to_last_page() {
        let c = controller_on_page(50);
        assert_eq!(c.page().page_index, 9);
    }

    #[test]
    fn test_batched_changes_issue_one_fetch() {
        let mut c: ListController<BusEmergencies> = ListController::default();
        c.set_filter(SCHOOL_ID, Some(FilterValue::Number(5))).unwrap();
        c.set_filter(PLATE, Some("AB-12".into())).unwrap();
        c.sort_by("plate");

        let plan = c.begin_sync();
        assert!(plan.list.is_some());
        assert!(plan.options.is_some());

        let again = c.begin_sync();
        assert!(again.is_empty());
    }

    #[test]
    fn test_unchanged_filter_does_not_refetch() {
        let mut c: ListController<BusEmergencies> = ListController::default();
        c.set_filter(PLATE, Some("AB-12".into())).unwrap();
        let plan = c.begin_sync();
        c.apply(list_outcome(plan.list.unwrap(), loaded(vec![], 0)));

        assert!(!c.set_filter(PLATE, Some("AB-12".into())).unwrap());
        assert!(c.begin_sync().is_empty());
    }

    #[test]
    fn test_refresh_forces_fetch() {
        let mut c: ListController<BusEmergencies> = ListController::default();
        let plan = c.begin_sync();
        c.apply(list_outcome(plan.list.unwrap(), loaded(vec![], 0)));
        c.refresh();
        assert!(c.begin_sync().list.is_some());
    }

    #[test]
    fn test_reducer_runs_over_fetched_rows() {
        let mut c: ListController<BusEmergencies> = ListController::default();
        let plan = c.begin_sync();
        c.apply(list_outcome(
            plan.list.unwrap(),
            loaded(vec![emergency(1, "North"), emergency(2, "North")], 2),
        ));

        assert_eq!(c.status(), ListStatus::Loaded);
        assert_eq!(c.summary().total, 2);
        assert_eq!(c.summary().with_location, 2);
        assert_eq!(c.range_label(), "1-2 of 2");
    }

    #[test]
    fn test_stale_list_response_is_discarded() {
        let mut c: ListController<BusEmergencies> = ListController::default();
        c.set_filter(SCHOOL_ID, Some(FilterValue::Number(1))).unwrap();
        let first = c.begin_sync().list.unwrap();
        c.set_filter(SCHOOL_ID, Some(FilterValue::Number(2))).unwrap();
        let second = c.begin_sync().list.unwrap();

        c.apply(list_outcome(second, loaded(vec![emergency(2, "South")], 1)));
        c.apply(list_outcome(first, loaded(vec![emergency(1, "North")], 1)));

        assert_eq!(c.rows()[0].id, 2);
        assert_eq!(c.summary().most_affected_school.as_deref(), Some("South"));
    }

    #[test]
    fn test_failed_fetch_keeps_rows_and_summary() {
        let mut c: ListController<BusEmergencies> = ListController::default();
        let t = c.begin_sync().list.unwrap();
        c.apply(list_outcome(t, loaded(vec![emergency(1, "North")], 1)));
        c.set_filter(PLATE, Some("X".into())).unwrap();
        let t = c.begin_sync().list.unwrap();
        c.apply(list_outcome(
            t,
            Err(ApiError::Status {
                url: "bus-emergencies".to_string(),
                status: 500,
                body: String::new(),
            }),
        ));

        assert_eq!(c.status(), ListStatus::Error);
        assert_eq!(c.rows().len(), 1);
        assert_eq!(c.summary().total, 1);
    }

    #[test]
    fn test_primary_switches_resolve_to_last_selection() {
        let mut c: ListController<BusEmergencies> = ListController::default();
        c.set_filter(SCHOOL_ID, Some(FilterValue::Number(1))).unwrap();
        let a1 = c.begin_sync().options.unwrap();
        c.set_filter(SCHOOL_ID, Some(FilterValue::Number(2))).unwrap();
        let b = c.begin_sync().options.unwrap();
        c.set_filter(SCHOOL_ID, Some(FilterValue::Number(1))).unwrap();
        let a2 = c.begin_sync().options.unwrap();

        let fetch = |ticket: Ticket<PrimaryId>, plate: &str| SyncOutcome::<BusEmergencies> {
            list: None,
            summary: None,
            options: Some(DependentFetch {
                ticket,
                buses: Ok(vec![BusOption {
                    id: 1,
                    plate: plate.to_string(),
                }]),
                route_numbers: Ok(vec![]),
            }),
        };
        c.apply(fetch(a2, "school-1"));
        c.apply(fetch(b, "school-2"));
        c.apply(fetch(a1, "school-1-old"));

        assert_eq!(c.options().buses()[0].plate, "school-1");
    }

    #[test]
    fn test_switching_primary_clears_dependents_together() {
        let mut c: ListController<BusEmergencies> = ListController::default();
        c.set_filter(SCHOOL_ID, Some(FilterValue::Number(5))).unwrap();
        c.set_filter(PLATE, Some("AB-12".into())).unwrap();
        c.set_filter(ROUTE_NUMBER, Some("7".into())).unwrap();
        c.set_filter(CORPORATION_ID, Some(FilterValue::Number(3))).unwrap();

        assert!(!c.filters().is_set(SCHOOL_ID));
        assert!(!c.filters().is_set(PLATE));
        assert!(!c.filters().is_set(ROUTE_NUMBER));
        assert_eq!(c.primary(), Some(PrimaryId::Corporation(3)));
    }

    #[test]
    fn test_clearing_primary_needs_no_option_request() {
        let mut c: ListController<BusEmergencies> = ListController::default();
        c.set_filter(SCHOOL_ID, Some(FilterValue::Number(5))).unwrap();
        c.begin_sync();
        c.set_filter(SCHOOL_ID, None).unwrap();
        let plan = c.begin_sync();
        assert!(plan.options.is_none());
        assert!(plan.list.is_some());
        assert!(c.options().buses().is_empty());
    }

    #[test]
    fn test_endpoint_summary_fetched_with_list_filters() {
        let mut c: ListController<FuelRecords> = ListController::default();
        let plan = c.begin_sync();
        let (path, ticket) = plan.summary.unwrap();
        assert_eq!(path, "fuel-records/statistics");
        assert!(ticket.key().is_empty());
        assert_eq!(c.summary(), &FuelSummary::default());

        // Paging does not refetch statistics.
        let list = plan.list.unwrap();
        c.apply(SyncOutcome {
            list: Some((
                list,
                Ok(ListResult {
                    rows: vec![],
                    total_count: 60,
                }),
            )),
            summary: Some((
                ticket,
                Ok(FuelSummary {
                    total_records: 60,
                    ..Default::default()
                }),
            )),
            options: None,
        });
        c.next_page();
        let plan = c.begin_sync();
        assert!(plan.list.is_some());
        assert!(plan.summary.is_none());
        assert_eq!(c.summary().total_records, 60);
    }

    #[test]
    fn test_empty_page_past_the_end_moves_back() {
        let mut c = controller_on_page(1);
        let ticket = c.begin_sync().list.unwrap();
        assert_eq!(ticket.key().page.page_index, 1);

        c.apply(list_outcome(ticket, loaded(vec![], 10)));

        assert_eq!(c.page().page_index, 0);
        assert!(c.needs_fetch());
        let retry = c.begin_sync().list.unwrap();
        assert_eq!(retry.key().page.page_index, 0);
        c.apply(list_outcome(retry, loaded(vec![emergency(1, "North")], 10)));
        assert_eq!(c.status(), ListStatus::Loaded);
        assert_eq!(c.range_label(), "1-10 of 10");
    }

    #[test]
    fn test_empty_page_for_an_older_page_is_not_clamped() {
        let mut c = controller_on_page(1);
        let ticket = c.begin_sync().list.unwrap();
        c.set_page(2);

        c.apply(list_outcome(ticket, loaded(vec![], 10)));

        assert_eq!(c.page().page_index, 2);
    }

    #[test]
    fn test_failed_statistics_fall_back_to_page_and_retry() {
        let mut c: ListController<FuelRecords> = ListController::new(10);
        let plan = c.begin_sync();
        let rows: Vec<FuelRecord> = serde_json::from_value(serde_json::json!([
            { "id": 1, "liters": 30.0 },
            { "id": 2, "liters": 10.0 },
        ]))
        .unwrap();
        c.apply(SyncOutcome {
            list: Some((
                plan.list.unwrap(),
                Ok(ListResult {
                    rows: rows.clone(),
                    total_count: 40,
                }),
            )),
            summary: Some((
                plan.summary.unwrap().1,
                Err(ApiError::Status {
                    url: "fuel-records/statistics".to_string(),
                    status: 500,
                    body: String::new(),
                }),
            )),
            options: None,
        });

        assert_eq!(c.status(), ListStatus::Loaded);
        assert!(!c.summary_loading());
        assert!(c.summary_error().is_some());
        assert_eq!(c.summary(), &FuelRecords::reduce(&rows));
        assert_eq!(c.summary().average_liters, 20.0);

        c.next_page();
        assert!(c.begin_sync().summary.is_some());
    }
}
