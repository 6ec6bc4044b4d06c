//! Dashboard controller: owns the analysis list and every mutation of it.
//!
//! The controller is headless and generic over [`AnalysisService`], so the
//! same state machine drives the CLI and the test harness. Rendering reads
//! state through the accessors; nothing else mutates the list.

use crate::form::CreateForm;
use analysis_client::{Analysis, AnalysisService, AnalysisStatus, ApiError};
use tracing::debug;

/// Page lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardPhase {
    /// Initial list fetch in progress.
    Loading,
    /// List fetched (possibly empty, possibly with an error banner).
    Ready,
}

/// Display indicator for an analysis status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Success,
    InProgress,
    Attention,
    Neutral,
}

impl From<AnalysisStatus> for StatusBadge {
    fn from(status: AnalysisStatus) -> Self {
        match status {
            AnalysisStatus::Completed => StatusBadge::Success,
            AnalysisStatus::Processing => StatusBadge::InProgress,
            AnalysisStatus::Failed => StatusBadge::Attention,
            _ => StatusBadge::Neutral,
        }
    }
}

const LOAD_ERROR_FALLBACK: &str = "Failed to load analyses";
const CREATE_ERROR_FALLBACK: &str = "Failed to create analysis";

pub struct Dashboard<S: AnalysisService> {
    service: S,
    phase: DashboardPhase,
    analyses: Vec<Analysis>,
    error: Option<String>,
    form: CreateForm,
    dialog_open: bool,
    creating: bool,
    refresh_epoch: u64,
}

impl<S: AnalysisService> Dashboard<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            phase: DashboardPhase::Loading,
            analyses: Vec::new(),
            error: None,
            form: CreateForm::default(),
            dialog_open: false,
            creating: false,
            refresh_epoch: 0,
        }
    }

    pub fn phase(&self) -> DashboardPhase {
        self.phase
    }

    pub fn analyses(&self) -> &[Analysis] {
        &self.analyses
    }

    /// Current error banner text, if any. Non-fatal; dismissible.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn completed_count(&self) -> usize {
        self.analyses
            .iter()
            .filter(|a| a.status == AnalysisStatus::Completed)
            .count()
    }

    pub fn processing_count(&self) -> usize {
        self.analyses
            .iter()
            .filter(|a| a.status == AnalysisStatus::Processing)
            .count()
    }

    /// Initial list fetch. A failure is non-fatal: the dashboard still
    /// becomes Ready, with an empty list and a visible banner.
    pub async fn load(&mut self) {
        self.refresh_epoch += 1;
        match self.service.list_my_analyses().await {
            Ok(fetched) => {
                self.analyses = fetched;
                self.error = None;
            }
            Err(err) => {
                debug!("initial load failed: {err}");
                self.analyses = Vec::new();
                self.error = Some(
                    err.server_message()
                        .unwrap_or(LOAD_ERROR_FALLBACK)
                        .to_string(),
                );
            }
        }
        self.phase = DashboardPhase::Ready;
    }

    /// Start a refresh and return its epoch ticket. Results are applied
    /// through [`Dashboard::apply_refresh`] with the same ticket; a ticket
    /// superseded by a newer refresh is ignored, so a stale response can
    /// never clobber current state.
    pub fn begin_refresh(&mut self) -> u64 {
        self.refresh_epoch += 1;
        self.refresh_epoch
    }

    /// Merge a fetched snapshot into the current list.
    ///
    /// Merging is by identifier, never a wholesale overwrite:
    /// - a locally terminal entity (completed/failed) never regresses to
    ///   pending/processing, whatever the snapshot claims;
    /// - local entities the snapshot does not know yet (an optimistic
    ///   creation racing a refresh) are retained at the front.
    pub fn apply_refresh(&mut self, epoch: u64, fetched: Vec<Analysis>) {
        if epoch != self.refresh_epoch {
            debug!("dropping stale refresh (epoch {epoch} != {})", self.refresh_epoch);
            return;
        }

        let local = std::mem::take(&mut self.analyses);
        let mut merged: Vec<Analysis> = Vec::with_capacity(fetched.len());
        for incoming in fetched {
            let entry = match local.iter().find(|a| a.id == incoming.id) {
                Some(known) if known.status.is_terminal() && !incoming.status.is_terminal() => {
                    known.clone()
                }
                _ => incoming,
            };
            merged.push(entry);
        }

        let mut result: Vec<Analysis> = local
            .into_iter()
            .filter(|a| !merged.iter().any(|m| m.id == a.id))
            .collect();
        result.extend(merged);
        self.analyses = result;
    }

    /// Fetch the list again and merge, keeping backend ordering.
    pub async fn refresh(&mut self) {
        let epoch = self.begin_refresh();
        match self.service.list_my_analyses().await {
            Ok(fetched) => self.apply_refresh(epoch, fetched),
            Err(err) => {
                debug!("refresh failed: {err}");
                self.error = Some(
                    err.server_message()
                        .unwrap_or(LOAD_ERROR_FALLBACK)
                        .to_string(),
                );
            }
        }
    }

    pub fn open_create_dialog(&mut self) {
        self.dialog_open = true;
    }

    /// Cancel the dialog. Field values are kept; they only reset after a
    /// successful create.
    pub fn close_create_dialog(&mut self) {
        self.dialog_open = false;
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    pub fn form(&self) -> &CreateForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CreateForm {
        &mut self.form
    }

    /// Submission is blocked while a required field is empty or a create
    /// request is already in flight.
    pub fn can_submit(&self) -> bool {
        !self.creating && self.form.is_complete()
    }

    /// Submit the create form.
    ///
    /// When blocked by [`Dashboard::can_submit`] this is a no-op: no
    /// request is issued. Creation is billed, so there is no retry here;
    /// on failure the dialog stays open with the server's message and the
    /// user decides whether to submit again.
    pub async fn submit_create(&mut self) {
        if !self.can_submit() {
            return;
        }
        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(msg) => {
                self.error = Some(msg);
                return;
            }
        };

        self.creating = true;
        self.error = None;
        match self.service.create_analysis(request).await {
            Ok(analysis) => {
                // Optimistic prepend; no re-fetch needed.
                self.analyses.insert(0, analysis);
                self.dialog_open = false;
                self.form = CreateForm::default();
            }
            Err(err) => {
                self.error = Some(create_error_message(&err));
            }
        }
        self.creating = false;
    }

    /// Consume the controller, returning the service it drove.
    pub fn into_service(self) -> S {
        self.service
    }
}

/// Details are only available once an analysis has completed.
pub fn view_details_enabled(analysis: &Analysis) -> bool {
    analysis.status == AnalysisStatus::Completed
}

fn create_error_message(err: &ApiError) -> String {
    err.server_message()
        .unwrap_or(CREATE_ERROR_FALLBACK)
        .to_string()
}
