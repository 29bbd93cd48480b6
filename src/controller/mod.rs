//! State owner of the resident table.
//!
//! [`ListQueryController`] turns user intents (typing, filtering, sorting,
//! paging, selecting, deleting) into at most one list request per event-loop
//! turn. The driver owns the loop:
//!
//! 1. apply intents (`set_*`, `toggle_*`, ...),
//! 2. call [`ListQueryController::poll`] when [`ListQueryController::next_deadline`]
//!    elapses,
//! 3. call [`ListQueryController::flush`] at the end of the turn and run the
//!    returned [`FetchTicket`] with [`ListQueryController::execute`],
//! 4. hand the [`FetchOutcome`] back to [`ListQueryController::complete`].
//!
//! Every fetch carries a generation number; only the newest one is applied.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::domain::filter::FilterOptions;
use crate::domain::lansia::{LansiaDetail, LansiaSummary};
use crate::domain::types::{LansiaId, PageSize, SortField};
use crate::forms::lansia::LansiaForm;
use crate::pagination::ResultPage;
use crate::repository::{LansiaListQuery, LansiaReader, LansiaWriter};
use crate::services::lansia as lansia_service;
use crate::services::{ServiceError, ServiceResult};

pub mod debounce;
pub mod notice;
pub mod query;
pub mod selection;

use debounce::Debouncer;
use notice::{Notice, NoticeBoard, NoticeKind};
use query::{FilterDimension, QueryState};
use selection::SelectionSet;

const LOAD_FAILED: &str = "Gagal memuat data";
const DETAIL_FAILED: &str = "Gagal memuat detail data";
const EDIT_LOAD_FAILED: &str = "Gagal memuat data untuk edit";
const DELETE_ONE_PROMPT: &str = "Apakah Anda yakin ingin menghapus data ini?";
const DELETE_ONE_SUCCESS: &str = "Data berhasil dihapus";
const DELETE_REJECTED: &str = "Gagal menghapus data";
const DELETE_UNREACHABLE: &str = "Terjadi kesalahan saat menghapus data";
const UPDATE_SUCCESS: &str = "Data berhasil diperbarui";
const UPDATE_REJECTED: &str = "Gagal memperbarui data";
const UPDATE_UNREACHABLE: &str = "Terjadi kesalahan saat memperbarui data";
const CREATE_SUCCESS: &str = "Data lansia berhasil ditambahkan!";
const CREATE_FAILED: &str = "Terjadi kesalahan saat menyimpan data";

/// Lifecycle of the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// The initial load has not completed yet.
    #[default]
    Uninitialized,
    Ready,
    /// Torn down; late completions are ignored.
    Closed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading {
        initial: bool,
    },
}

/// Reason a list request is needed. `Reset` also returns to page 1 and wins
/// over `Refresh` raised in the same turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Trigger {
    Refresh,
    Reset,
}

/// A list request issued by the controller and not yet completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub initial: bool,
    pub query: LansiaListQuery,
}

/// Result of running a [`FetchTicket`].
#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub initial: bool,
    pub result: ServiceResult<ResultPage<LansiaSummary>>,
}

/// Everything a view needs to render the table.
#[derive(Clone, Debug, PartialEq)]
pub struct ListSnapshot {
    pub phase: Phase,
    pub status: LoadStatus,
    pub query: QueryState,
    pub page: ResultPage<LansiaSummary>,
    pub selection: SelectionSet,
    pub notice: Option<Notice>,
    pub filter_options: FilterOptions,
    pub detail: Option<LansiaDetail>,
}

fn failure_message(err: &ServiceError, rejected: &str, unreachable: &str) -> String {
    match err {
        ServiceError::Network(_) => unreachable.to_string(),
        other => other.user_message(rejected),
    }
}

pub struct ListQueryController<R> {
    repo: Arc<R>,
    phase: Phase,
    status: LoadStatus,
    query: QueryState,
    page: ResultPage<LansiaSummary>,
    selection: SelectionSet,
    notices: NoticeBoard,
    search: Debouncer<String>,
    pending: Option<Trigger>,
    generation: u64,
    filter_options: FilterOptions,
    detail: Option<LansiaDetail>,
    snapshots: watch::Sender<ListSnapshot>,
}

impl<R> ListQueryController<R>
where
    R: LansiaReader + LansiaWriter + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        let query = QueryState::default();
        let page = ResultPage::empty(query.page_size.get());
        let (snapshots, _) = watch::channel(ListSnapshot {
            phase: Phase::Uninitialized,
            status: LoadStatus::Idle,
            query: query.clone(),
            page: page.clone(),
            selection: SelectionSet::default(),
            notice: None,
            filter_options: FilterOptions::default(),
            detail: None,
        });

        Self {
            repo,
            phase: Phase::Uninitialized,
            status: LoadStatus::Idle,
            query,
            page,
            selection: SelectionSet::default(),
            notices: NoticeBoard::default(),
            search: Debouncer::default(),
            pending: None,
            generation: 0,
            filter_options: FilterOptions::default(),
            detail: None,
            snapshots,
        }
    }

    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repo)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn page(&self) -> &ResultPage<LansiaSummary> {
        &self.page
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.filter_options
    }

    pub fn detail(&self) -> Option<&LansiaDetail> {
        self.detail.as_ref()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            phase: self.phase,
            status: self.status,
            query: self.query.clone(),
            page: self.page.clone(),
            selection: self.selection.clone(),
            notice: self.notices.current().cloned(),
            filter_options: self.filter_options.clone(),
            detail: self.detail.clone(),
        }
    }

    /// Receiver updated after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.snapshots.subscribe()
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    fn raise(&mut self, trigger: Trigger) {
        if trigger == Trigger::Reset {
            self.query.page = 1;
        }
        self.pending = self.pending.max(Some(trigger));
        self.publish();
    }

    /// Issues the initial load. Only the first call returns a ticket.
    pub fn start(&mut self) -> Option<FetchTicket> {
        if self.phase != Phase::Uninitialized || self.generation > 0 {
            return None;
        }
        Some(self.begin_fetch(true))
    }

    fn begin_fetch(&mut self, initial: bool) -> FetchTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading { initial };
        let ticket = FetchTicket {
            generation: self.generation,
            initial,
            query: self.query.to_list_query(),
        };
        log::debug!(
            "Fetching lansia page {} (generation {})",
            ticket.query.pagination.page,
            ticket.generation
        );
        self.publish();
        ticket
    }

    /// Runs a ticket against the repository. Does not touch the controller,
    /// so it can be spawned on a task.
    pub async fn execute(repo: Arc<R>, ticket: FetchTicket) -> FetchOutcome {
        let result = lansia_service::list_lansia(repo.as_ref(), ticket.query).await;
        FetchOutcome {
            generation: ticket.generation,
            initial: ticket.initial,
            result,
        }
    }

    /// Applies a fetch result. Returns `false` when the outcome was discarded
    /// because a newer fetch was issued or the controller is closed.
    pub fn complete(&mut self, outcome: FetchOutcome, now: Instant) -> bool {
        if self.phase == Phase::Closed {
            log::debug!("Ignoring fetch {} after close", outcome.generation);
            return false;
        }
        if outcome.generation != self.generation {
            log::debug!(
                "Discarding stale fetch {} (latest is {})",
                outcome.generation,
                self.generation
            );
            return false;
        }

        self.status = LoadStatus::Idle;
        match outcome.result {
            Ok(page) => {
                self.page = page;
                self.selection.clear();
            }
            Err(err) => {
                log::error!("Failed to fetch lansia list: {err}");
                self.notices.error(LOAD_FAILED, now);
            }
        }
        if self.phase == Phase::Uninitialized {
            self.phase = Phase::Ready;
        }
        self.publish();
        true
    }

    /// Resolves the triggers raised during this turn into at most one
    /// refresh. Nothing is issued before the initial load completed; the
    /// triggers are kept until then.
    pub fn flush(&mut self) -> Option<FetchTicket> {
        if self.phase != Phase::Ready {
            return None;
        }
        let trigger = self.pending.take()?;
        if trigger == Trigger::Reset {
            self.query.page = 1;
        }
        Some(self.begin_fetch(false))
    }

    /// Composes the query, fetches it and applies the result in one go.
    pub async fn fetch_page(&mut self, initial: bool) -> bool {
        let ticket = self.begin_fetch(initial);
        let outcome = Self::execute(self.repository(), ticket).await;
        self.complete(outcome, Instant::now())
    }

    /// Fires due timers: the search quiet period and notice expiry.
    pub fn poll(&mut self, now: Instant) {
        if let Some(term) = self.search.fire_if_due(now)
            && term != self.query.search_term
        {
            self.query.search_term = term;
            self.raise(Trigger::Reset);
        }
        if self.notices.expire(now) {
            self.publish();
        }
    }

    /// Earliest instant at which [`Self::poll`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.search.deadline(), self.notices.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn set_search_text(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text == self.query.search_text {
            return;
        }
        self.query.search_text = text.clone();
        self.search.schedule(text, now);
        self.publish();
    }

    pub fn set_filter(&mut self, dimension: FilterDimension, value: &str) {
        if self.query.set_filter(dimension, value) {
            self.raise(Trigger::Reset);
        }
    }

    pub fn set_sort(&mut self, field: SortField) {
        self.query.apply_sort(field);
        self.raise(Trigger::Reset);
    }

    /// Moves to page `page`, clamped to the pages of the current result.
    pub fn set_page_number(&mut self, page: usize) {
        let page = page.clamp(1, self.page.total_pages);
        if page == self.query.page {
            return;
        }
        self.query.page = page;
        self.raise(Trigger::Refresh);
    }

    pub fn next_page(&mut self) {
        self.set_page_number(self.query.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page_number(self.query.page.saturating_sub(1));
    }

    /// Changes the page size without leaving the current page.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        if page_size == self.query.page_size {
            return;
        }
        self.query.page_size = page_size;
        self.raise(Trigger::Refresh);
    }

    /// Clears the search box and every filter, back to page 1, in one refresh.
    pub fn clear_filters(&mut self) {
        self.search.cancel();
        self.query.clear_search_and_filters();
        self.raise(Trigger::Reset);
    }

    /// Asks for a refresh of the current page, e.g. after an import.
    pub fn request_refresh(&mut self) {
        self.raise(Trigger::Refresh);
    }

    pub fn post_notice(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) {
        self.notices.post(kind, message, now);
        self.publish();
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.dismiss();
        self.publish();
    }

    pub fn toggle_all(&mut self, checked: bool) {
        let ids = self.page.records.iter().map(|record| record.id);
        self.selection.toggle_all(checked, ids);
        self.publish();
    }

    /// Checks or unchecks one row. Ids not on the current page are ignored
    /// and `false` is returned.
    pub fn toggle_one(&mut self, id: LansiaId, checked: bool) -> bool {
        if !self.page.records.iter().any(|record| record.id == id) {
            log::debug!("Ignoring selection of {id}, not on the current page");
            return false;
        }
        self.selection.toggle_one(id, checked);
        self.publish();
        true
    }

    /// Confirmation question for deleting the current selection.
    pub fn bulk_delete_prompt(&self) -> Option<String> {
        if self.selection.is_empty() {
            return None;
        }
        Some(format!(
            "Apakah Anda yakin ingin menghapus {} data?",
            self.selection.len()
        ))
    }

    /// Deletes every selected row with one request. On success the selection
    /// is cleared and one refresh is returned; on failure nothing is fetched.
    pub async fn delete_selected<F>(&mut self, confirm: F, now: Instant) -> Option<FetchTicket>
    where
        F: FnOnce(&str) -> bool,
    {
        let prompt = self.bulk_delete_prompt()?;
        if !confirm(&prompt) {
            return None;
        }

        let ids = self.selection.ids().to_vec();
        match lansia_service::bulk_delete_lansia(self.repo.as_ref(), &ids).await {
            Ok(_) => {
                self.selection.clear();
                self.notices
                    .success(format!("{} data berhasil dihapus", ids.len()), now);
                self.raise(Trigger::Refresh);
                self.flush()
            }
            Err(err) => {
                let message = failure_message(&err, DELETE_REJECTED, DELETE_UNREACHABLE);
                self.notices.error(message, now);
                self.publish();
                None
            }
        }
    }

    /// Deletes one record after confirmation and refreshes the list.
    pub async fn delete_one<F>(
        &mut self,
        id: LansiaId,
        confirm: F,
        now: Instant,
    ) -> Option<FetchTicket>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_ONE_PROMPT) {
            return None;
        }

        match lansia_service::delete_lansia(self.repo.as_ref(), id).await {
            Ok(()) => {
                self.selection.toggle_one(id, false);
                if self.detail.as_ref().is_some_and(|detail| detail.id == id) {
                    self.detail = None;
                }
                self.notices.success(DELETE_ONE_SUCCESS, now);
                self.raise(Trigger::Refresh);
                self.flush()
            }
            Err(err) => {
                let message = failure_message(&err, DELETE_REJECTED, DELETE_UNREACHABLE);
                self.notices.error(message, now);
                self.publish();
                None
            }
        }
    }

    /// Loads the full record into the detail view.
    pub async fn open_detail(&mut self, id: LansiaId, now: Instant) -> bool {
        match lansia_service::load_lansia(self.repo.as_ref(), id).await {
            Ok(detail) => {
                self.detail = Some(detail);
                self.publish();
                true
            }
            Err(_) => {
                self.notices.error(DETAIL_FAILED, now);
                self.publish();
                false
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.publish();
    }

    /// Loads a record and pre-fills the edit form with it.
    pub async fn edit_form(&mut self, id: LansiaId, now: Instant) -> Option<LansiaForm> {
        match lansia_service::load_lansia(self.repo.as_ref(), id).await {
            Ok(detail) => Some(LansiaForm::from_detail(&detail)),
            Err(_) => {
                self.notices.error(EDIT_LOAD_FAILED, now);
                self.publish();
                None
            }
        }
    }

    /// Validates and stores an edited record, then refreshes the list.
    pub async fn save_edit(
        &mut self,
        id: LansiaId,
        form: &LansiaForm,
        now: Instant,
    ) -> Option<FetchTicket> {
        match lansia_service::update_lansia(self.repo.as_ref(), id, form).await {
            Ok(()) => {
                self.detail = None;
                self.notices.success(UPDATE_SUCCESS, now);
                self.raise(Trigger::Refresh);
                self.flush()
            }
            Err(err) => {
                let message = failure_message(&err, UPDATE_REJECTED, UPDATE_UNREACHABLE);
                self.notices.error(message, now);
                self.publish();
                None
            }
        }
    }

    /// Creates a record from the input form, then refreshes the list.
    pub async fn create_record(&mut self, form: &LansiaForm, now: Instant) -> Option<FetchTicket> {
        match lansia_service::create_lansia(self.repo.as_ref(), form).await {
            Ok(_) => {
                self.notices.success(CREATE_SUCCESS, now);
                self.raise(Trigger::Refresh);
                self.flush()
            }
            Err(err) => {
                self.notices
                    .error(failure_message(&err, CREATE_FAILED, CREATE_FAILED), now);
                self.publish();
                None
            }
        }
    }

    /// Fetches the dropdown values. Failures are only logged.
    pub async fn load_filter_options(&mut self) {
        if let Ok(options) = lansia_service::load_filter_options(self.repo.as_ref()).await {
            self.filter_options = options;
            self.publish();
        }
    }

    /// Tears the controller down: the search timer is dropped and later
    /// completions are ignored.
    pub fn close(&mut self) {
        self.phase = Phase::Closed;
        self.search.cancel();
        self.pending = None;
        self.status = LoadStatus::Idle;
        self.publish();
    }
}
