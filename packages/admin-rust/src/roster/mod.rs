//! Roster view-model.
//!
//! [`RosterViewModel`] is the single owner of the client-side roster state:
//! the cached list from the last successful load, the selection, the table's
//! [`ViewState`], the modal surfaces and the pending notices. Every mutation
//! goes through a `&mut self` method, so there is exactly one writer and
//! overlapping loads cannot happen.
//!
//! Network failures never corrupt local state. Each failed call leaves the
//! cache as it was, queues an error [`Notice`], and is returned to the caller
//! so the action can be retried.

pub mod delete;
pub mod error;
pub mod surface;

use comlab_core::{
    project, Column, DraftSchema, EditDraft, NewTeacherDraft, Notice, RosterApi, RosterView,
    SelectionSet, SortState, Teacher, UnknownTeacher, ValidationResult, ViewState,
};
use tracing::{debug, info, warn};

pub use delete::{DeleteOutcome, DeleteReport};
pub use error::RosterError;
pub use surface::{DeleteConfirmation, EditSurface};

/// Client-side state of the faculty roster screen.
pub struct RosterViewModel<A> {
    api: A,
    schema: DraftSchema,
    /// `None` until the first load succeeds.
    roster: Option<Vec<Teacher>>,
    selection: SelectionSet,
    view_state: ViewState,
    loading: bool,
    edit: EditSurface,
    delete_confirm: Option<DeleteConfirmation>,
    qr: Option<String>,
    notices: Vec<Notice>,
}

impl<A: RosterApi> RosterViewModel<A> {
    /// Creates an empty view-model. Nothing is fetched until [`load`](Self::load).
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            schema: DraftSchema::teacher(),
            roster: None,
            selection: SelectionSet::new(),
            view_state: ViewState::default(),
            loading: false,
            edit: EditSurface::Closed,
            delete_confirm: None,
            qr: None,
            notices: Vec::new(),
        }
    }

    /// Replaces the validation schema used for edit and create drafts.
    #[must_use]
    pub fn with_schema(mut self, schema: DraftSchema) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn schema(&self) -> &DraftSchema {
        &self.schema
    }

    // ------------------------------------------------------------------
    // Roster cache
    // ------------------------------------------------------------------

    /// Cached roster in server order; empty before the first load.
    #[must_use]
    pub fn roster(&self) -> &[Teacher] {
        self.roster.as_deref().unwrap_or(&[])
    }

    /// Whether a load has ever succeeded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.roster.is_some()
    }

    /// True only while a `load` future is suspended on the list call. Since
    /// `load` holds `&mut self`, this is observable from inside that future
    /// (or a `RosterApi` it calls), never by another caller.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn find(&self, teacher_id: &str) -> Result<&Teacher, UnknownTeacher> {
        self.roster()
            .iter()
            .find(|t| t.teacher_id == teacher_id)
            .ok_or_else(|| UnknownTeacher(teacher_id.to_string()))
    }

    /// Fetches the full roster and replaces the cache. Clears the selection.
    ///
    /// Returns the number of teachers loaded.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Api`] if the list call fails; the previous cache
    /// is kept and an error notice is queued.
    pub async fn load(&mut self) -> Result<usize, RosterError> {
        self.loading = true;
        let result = self.api.list_teachers().await;
        self.loading = false;

        match result {
            Ok(teachers) => {
                let count = teachers.len();
                info!(count, "roster loaded");
                self.roster = Some(teachers);
                self.selection.clear();
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "failed to load roster");
                self.notices
                    .push(Notice::error(format!("Failed to load teachers: {err}")));
                Err(err.into())
            }
        }
    }

    /// Reload after a successful mutation. A failure here has already been
    /// logged and noticed by `load`, and does not undo the mutation.
    async fn refresh(&mut self) {
        if let Err(err) = self.load().await {
            debug!(error = %err, "refresh after mutation failed");
        }
    }

    // ------------------------------------------------------------------
    // Table view
    // ------------------------------------------------------------------

    #[must_use]
    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    /// Projects the cache through the view state. `None` while the first
    /// load has not completed.
    #[must_use]
    pub fn view(&self) -> Option<RosterView<'_>> {
        self.roster
            .as_deref()
            .map(|roster| project(roster, &self.view_state, &self.selection))
    }

    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.view_state.set_filter(term);
    }

    pub fn toggle_sort(&mut self, column: Column) {
        self.view_state.toggle_sort(column);
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.view_state.sort = sort;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.view_state.set_page_size(size);
    }

    /// Hides or shows a column. Returns `false` for columns that cannot be hidden.
    pub fn set_column_visible(&mut self, column: Column, visible: bool) -> bool {
        self.view_state.set_column_visible(column, visible)
    }

    /// Moves to `page_index`, clamped to the available pages.
    pub fn go_to_page(&mut self, page_index: usize) {
        let page_count = self.view().map_or(0, |v| v.page_count);
        self.view_state.page_index = page_index.min(page_count.saturating_sub(1));
    }

    /// Advances one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        let position = self.view().map(|v| (v.page_index, v.can_next));
        match position {
            Some((current, true)) => {
                self.view_state.page_index = current + 1;
                true
            }
            _ => false,
        }
    }

    /// Goes back one page. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        let position = self.view().map(|v| (v.page_index, v.can_previous));
        match position {
            Some((current, true)) => {
                self.view_state.page_index = current - 1;
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] if `teacher_id` is not cached.
    pub fn select(&mut self, teacher_id: &str) -> Result<(), RosterError> {
        let roster = self.roster.as_deref().unwrap_or(&[]);
        self.selection.select(roster, teacher_id)?;
        Ok(())
    }

    pub fn deselect(&mut self, teacher_id: &str) -> bool {
        self.selection.deselect(teacher_id)
    }

    /// Flips one row. Returns whether it is now selected.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] if `teacher_id` is not cached.
    pub fn toggle_selected(&mut self, teacher_id: &str) -> Result<bool, RosterError> {
        let roster = self.roster.as_deref().unwrap_or(&[]);
        Ok(self.selection.toggle(roster, teacher_id)?)
    }

    /// Header checkbox: selects or deselects every row on the current page.
    /// Returns the number of rows on the page.
    pub fn select_page(&mut self, selected: bool) -> usize {
        let ids: Vec<String> = self
            .view()
            .map(|v| v.page_ids().into_iter().map(str::to_string).collect())
            .unwrap_or_default();
        let roster = self.roster.as_deref().unwrap_or(&[]);
        // Page rows come from the cache, so none can be unknown.
        if let Err(err) = self
            .selection
            .set_many(roster, ids.iter().map(String::as_str), selected)
        {
            debug!(error = %err, "page selection skipped");
        }
        ids.len()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ------------------------------------------------------------------
    // Edit surface
    // ------------------------------------------------------------------

    #[must_use]
    pub fn edit_surface(&self) -> &EditSurface {
        &self.edit
    }

    /// Opens the edit surface with a draft copied from the cached record.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] if `teacher_id` is not cached; the
    /// surface stays as it was.
    pub fn begin_edit(&mut self, teacher_id: &str) -> Result<EditDraft, RosterError> {
        let draft = EditDraft::from_teacher(self.find(teacher_id)?);
        debug!(teacher_id, "edit opened");
        self.edit = EditSurface::Open {
            draft: draft.clone(),
            validation: ValidationResult::Valid,
            error: None,
        };
        Ok(draft)
    }

    /// Validates `draft` and sends it as an update.
    ///
    /// On success the roster is reloaded, the surface closes and a success
    /// notice is queued. On failure the surface stays open with the draft.
    ///
    /// # Errors
    ///
    /// - [`RosterError::EditNotOpen`] if no edit is in progress.
    /// - [`RosterError::Validation`] if the draft breaks a schema rule; no
    ///   request is sent.
    /// - [`RosterError::Api`] if the update call fails.
    pub async fn submit_edit(&mut self, draft: EditDraft) -> Result<(), RosterError> {
        if !matches!(self.edit, EditSurface::Open { .. }) {
            return Err(RosterError::EditNotOpen);
        }

        let validation = draft.validate(&self.schema);
        if !validation.is_valid() {
            let errors = validation.errors().to_vec();
            debug!(invalid = errors.len(), "edit draft rejected");
            self.edit = EditSurface::Open {
                draft,
                validation,
                error: None,
            };
            return Err(RosterError::Validation(errors));
        }

        self.edit = EditSurface::Submitting {
            draft: draft.clone(),
        };
        let update = draft.clone().into_update();

        match self.api.update_teacher(&update).await {
            Ok(()) => {
                info!(teacher_id = %update.teacher_id, "teacher updated");
                self.refresh().await;
                self.edit = EditSurface::Closed;
                self.notices
                    .push(Notice::success("Teacher updated successfully"));
                Ok(())
            }
            Err(err) => {
                warn!(teacher_id = %update.teacher_id, error = %err, "teacher update failed");
                self.notices
                    .push(Notice::error(format!("Failed to update teacher: {err}")));
                self.edit = EditSurface::Open {
                    draft,
                    validation: ValidationResult::Valid,
                    error: Some(err.to_string()),
                };
                Err(err.into())
            }
        }
    }

    /// Closes the edit surface and discards the draft.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::EditNotOpen`] if no edit is in progress.
    pub fn cancel_edit(&mut self) -> Result<(), RosterError> {
        if !self.edit.is_open() {
            return Err(RosterError::EditNotOpen);
        }
        self.edit = EditSurface::Closed;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Validates and creates a new teacher, then reloads the roster.
    ///
    /// # Errors
    ///
    /// - [`RosterError::Validation`] if the draft breaks a schema rule; no
    ///   request is sent.
    /// - [`RosterError::Api`] if the create call fails.
    pub async fn create_teacher(&mut self, draft: NewTeacherDraft) -> Result<(), RosterError> {
        let validation = draft.validate(&self.schema);
        if !validation.is_valid() {
            debug!(invalid = validation.errors().len(), "new teacher draft rejected");
            return Err(RosterError::Validation(validation.errors().to_vec()));
        }

        let teacher = draft.into_new_teacher();
        match self.api.create_teacher(&teacher).await {
            Ok(()) => {
                info!(teacher_id = %teacher.teacher_id, "teacher added");
                self.refresh().await;
                self.notices.push(Notice::success("Teacher added successfully"));
                Ok(())
            }
            Err(err) => {
                warn!(teacher_id = %teacher.teacher_id, error = %err, "teacher create failed");
                self.notices
                    .push(Notice::error(format!("Failed to add teacher: {err}")));
                Err(err.into())
            }
        }
    }

    // ------------------------------------------------------------------
    // Bulk delete
    // ------------------------------------------------------------------

    #[must_use]
    pub fn delete_confirmation(&self) -> Option<&DeleteConfirmation> {
        self.delete_confirm.as_ref()
    }

    /// Opens the bulk-delete confirmation for the current selection.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::EmptySelection`] if nothing is selected.
    pub fn open_delete_confirm(&mut self) -> Result<&DeleteConfirmation, RosterError> {
        if self.selection.is_empty() {
            return Err(RosterError::EmptySelection);
        }
        let count = self.selection.len();
        Ok(&*self.delete_confirm.insert(DeleteConfirmation { count }))
    }

    pub fn close_delete_confirm(&mut self) {
        self.delete_confirm = None;
    }

    /// Deletes every selected teacher, one request at a time, in cached
    /// roster order.
    ///
    /// Every identifier is attempted even after a failure. Afterwards the
    /// roster is reloaded, the selection cleared, the confirmation closed,
    /// and one summary notice queued. An empty selection sends nothing and
    /// returns an empty report.
    pub async fn delete_selected(&mut self) -> DeleteReport {
        let ids: Vec<String> = self
            .roster()
            .iter()
            .filter(|t| self.selection.contains(&t.teacher_id))
            .map(|t| t.teacher_id.clone())
            .collect();
        let mut report = DeleteReport::default();

        if ids.is_empty() {
            self.delete_confirm = None;
            return report;
        }

        for teacher_id in ids {
            match self.api.delete_teacher(&teacher_id).await {
                Ok(()) => {
                    info!(teacher_id = %teacher_id, "teacher deleted");
                    report.record(teacher_id, DeleteOutcome::Deleted);
                }
                Err(err) => {
                    warn!(teacher_id = %teacher_id, error = %err, "teacher delete failed");
                    report.record(teacher_id, DeleteOutcome::Failed(err));
                }
            }
        }

        if let Some(notice) = report.summary() {
            self.notices.push(notice);
        }
        self.refresh().await;
        self.selection.clear();
        self.delete_confirm = None;
        report
    }

    // ------------------------------------------------------------------
    // QR surface
    // ------------------------------------------------------------------

    /// Payload of the open QR surface: the raw teacher identifier.
    #[must_use]
    pub fn qr_payload(&self) -> Option<&str> {
        self.qr.as_deref()
    }

    /// Opens the QR surface for a cached teacher and returns the payload.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] if `teacher_id` is not cached.
    pub fn show_qr(&mut self, teacher_id: &str) -> Result<&str, RosterError> {
        let payload = self.find(teacher_id)?.teacher_id.clone();
        Ok(self.qr.insert(payload).as_str())
    }

    pub fn close_qr(&mut self) {
        self.qr = None;
    }

    // ------------------------------------------------------------------
    // Notices
    // ------------------------------------------------------------------

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drains queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
