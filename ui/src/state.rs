//! Application state shared by every view.
//!
//! One `AppState` lives in a context-provided `Signal`. Views never touch its
//! fields; they call the operations below, which keep the timeline sorted,
//! summaries fresh and the local snapshot in step.

use std::{cell::RefCell, rc::Rc};

use api::{Analysis, ApiError, RemoteTimelineEntry, ReportDate, ReportKind, ResultSet};
use dioxus::logger::tracing::{debug, info, warn};
use dioxus::prelude::*;

use crate::{
    core::storage::{self, KeyValueStore, TIMELINE_KEY},
    report::{
        summarize, AnalysisOutcome, AnalysisRequest, ExportRequest, IndexError, StagedFile,
        StagedFiles, Summary, INVALID_DATE, LOGIN_TO_ANALYZE, LOGIN_TO_EXPORT, MISSING_DATE,
        MISSING_FILE, NOTHING_TO_EXPORT,
    },
    session::{Session, SessionStore},
    timeline::{LoadOutcome, PersistJob, Timeline, TimelineLoad},
};

/// Latest-issued request numbers; a reply carrying an older number is stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestTickets {
    analysis: u64,
    timeline: u64,
}

impl RequestTickets {
    fn next_analysis(&mut self) -> u64 {
        self.analysis += 1;
        self.analysis
    }

    fn next_timeline(&mut self) -> u64 {
        self.timeline += 1;
        self.timeline
    }
}

/// The result table currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedReport {
    pub date: ReportDate,
    pub results: ResultSet,
    pub summary: Summary,
}

impl DisplayedReport {
    fn new(date: ReportDate, results: ResultSet) -> Self {
        let summary = summarize(&results);
        Self {
            date,
            results,
            summary,
        }
    }
}

pub struct AppState {
    store: Rc<dyn KeyValueStore>,
    session: SessionStore,
    staged: StagedFiles,
    timeline: Timeline,
    displayed: Option<DisplayedReport>,
    last_analysis: ResultSet,
    report_date: String,
    tickets: RequestTickets,
}

impl AppState {
    /// Reads the persisted session and timeline snapshot.
    pub fn restore(store: Rc<dyn KeyValueStore>) -> Self {
        let session = SessionStore::restore(store.as_ref());
        let timeline = match storage::load_json::<Timeline>(store.as_ref(), TIMELINE_KEY) {
            Ok(Some(timeline)) => {
                info!("cached timeline loaded ({} entries)", timeline.len());
                timeline
            }
            Ok(None) => Timeline::default(),
            Err(err) => {
                warn!("ignoring cached timeline: {err}");
                Timeline::default()
            }
        };
        Self {
            store,
            session,
            staged: StagedFiles::default(),
            timeline,
            displayed: None,
            last_analysis: ResultSet::new(),
            report_date: String::new(),
            tickets: RequestTickets::default(),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn staged(&self) -> &StagedFiles {
        &self.staged
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn displayed(&self) -> Option<&DisplayedReport> {
        self.displayed.as_ref()
    }

    /// Results of the most recent analysis; what export sends.
    pub fn last_analysis(&self) -> &[api::BiomarkerResult] {
        &self.last_analysis
    }

    pub fn report_date(&self) -> &str {
        &self.report_date
    }

    pub fn set_report_date(&mut self, raw: impl Into<String>) {
        self.report_date = raw.into();
    }

    pub fn stage_files(&mut self, candidates: impl IntoIterator<Item = StagedFile>) -> usize {
        self.staged.add(candidates)
    }

    pub fn unstage(&mut self, index: usize) -> Result<StagedFile, IndexError> {
        self.staged.remove_at(index)
    }

    pub fn clear_staged(&mut self) {
        self.staged.clear();
    }

    pub fn sign_in(&mut self, session: Session) {
        self.session.establish(session, self.store.as_ref());
    }

    /// Ends the session and drops everything it owned: history, the table
    /// on screen, staged files and the cached snapshot. Replies still in
    /// flight are invalidated.
    pub fn logout(&mut self) {
        self.session.logout(self.store.as_ref());
        self.timeline.clear();
        self.staged.clear();
        self.displayed = None;
        self.last_analysis.clear();
        self.report_date.clear();
        self.tickets.next_analysis();
        self.tickets.next_timeline();
        if let Err(err) = self.store.remove(TIMELINE_KEY) {
            warn!("cached timeline not removed: {err}");
        }
    }

    /// Validates inputs and tags a new analyze call. Nothing is sent here.
    pub fn begin_analysis(&mut self, require_auth: bool) -> Result<AnalysisRequest, ApiError> {
        if require_auth && !self.session.is_authenticated() {
            return Err(ApiError::validation(LOGIN_TO_ANALYZE));
        }
        let file = self
            .staged
            .first()
            .ok_or_else(|| ApiError::validation(MISSING_FILE))?;
        if self.report_date.trim().is_empty() {
            return Err(ApiError::validation(MISSING_DATE));
        }
        let date =
            ReportDate::parse(&self.report_date).ok_or_else(|| ApiError::validation(INVALID_DATE))?;
        let upload = file.to_upload();
        info!(
            "submitting {} ({} bytes) for {date}",
            upload.name,
            upload.bytes.len()
        );
        Ok(AnalysisRequest {
            ticket: self.tickets.next_analysis(),
            token: self.session.token().map(str::to_string),
            upload,
            date,
        })
    }

    /// Shows the results, records them in the timeline and hands back the
    /// remote save to run, if any.
    pub fn complete_analysis(&mut self, ticket: u64, analysis: Analysis) -> AnalysisOutcome {
        if ticket != self.tickets.analysis {
            debug!("discarding stale analysis #{ticket}");
            return AnalysisOutcome::Stale;
        }
        let Analysis {
            results,
            report_date,
        } = analysis;
        info!("analysis #{ticket} returned {} results", results.len());

        let index = self.timeline.append(results.clone(), report_date);
        self.save_snapshot();
        let persist = self.session.token().map(|token| PersistJob {
            token: token.to_string(),
            date: report_date,
            results: results.clone(),
        });
        self.report_date = report_date.to_string();
        self.displayed = Some(DisplayedReport::new(report_date, results.clone()));
        let result_count = results.len();
        self.last_analysis = results;

        AnalysisOutcome::Applied {
            index,
            result_count,
            persist,
        }
    }

    /// Returns the error to surface, or `None` when the reply was stale.
    pub fn fail_analysis(&mut self, ticket: u64, err: ApiError) -> Option<ApiError> {
        if ticket != self.tickets.analysis {
            debug!("discarding stale analysis failure #{ticket}: {err}");
            return None;
        }
        self.absorb_error(&err);
        Some(err)
    }

    /// Logs the user out when the backend says the token is dead.
    pub fn absorb_error(&mut self, err: &ApiError) {
        if err.is_session_expired() {
            info!("backend rejected the session token; logging out");
            self.logout();
        }
    }

    /// Remote saves are best effort; the local entry stays either way.
    pub fn absorb_persist_failure(&mut self, err: &ApiError) {
        warn!("timeline entry not saved remotely: {err}");
        self.absorb_error(err);
    }

    pub fn begin_timeline_load(&mut self) -> Option<TimelineLoad> {
        let token = self.session.token()?.to_string();
        Some(TimelineLoad {
            ticket: self.tickets.next_timeline(),
            token,
        })
    }

    pub fn complete_timeline_load(
        &mut self,
        ticket: u64,
        reply: Result<Vec<RemoteTimelineEntry>, ApiError>,
    ) -> LoadOutcome {
        if ticket != self.tickets.timeline {
            debug!("discarding stale timeline load #{ticket}");
            return LoadOutcome::Stale;
        }
        match reply {
            Ok(entries) => {
                self.timeline.replace_from_remote(entries);
                self.save_snapshot();
                info!("timeline loaded ({} entries)", self.timeline.len());
                LoadOutcome::Replaced(self.timeline.len())
            }
            Err(err) => {
                warn!("timeline load failed: {err}");
                self.absorb_error(&err);
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Puts a past entry back on screen. Out-of-range indices do nothing.
    pub fn view_entry(&mut self, index: usize) -> bool {
        let Some(entry) = self.timeline.get(index) else {
            return false;
        };
        self.report_date = entry.date().to_string();
        self.displayed = Some(DisplayedReport::new(
            entry.date(),
            entry.results().to_vec(),
        ));
        true
    }

    pub fn begin_export(
        &self,
        kind: ReportKind,
        require_auth: bool,
    ) -> Result<ExportRequest, ApiError> {
        if self.last_analysis.is_empty() {
            return Err(ApiError::validation(NOTHING_TO_EXPORT));
        }
        if require_auth && !self.session.is_authenticated() {
            return Err(ApiError::validation(LOGIN_TO_EXPORT));
        }
        info!("requesting {} report", kind.as_str());
        Ok(ExportRequest {
            kind,
            token: self.session.token().map(str::to_string),
            results: self.last_analysis.clone(),
        })
    }

    fn save_snapshot(&self) {
        if let Err(err) = storage::save_json(self.store.as_ref(), TIMELINE_KEY, &self.timeline) {
            warn!("timeline snapshot not saved: {err}");
        }
    }
}

/// Shared access to an [`AppState`] for the flows in [`crate::actions`].
///
/// Borrows never outlive the closure, so no guard is held across an await.
pub trait StateCell {
    fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R;
    fn with_mut<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R;
}

impl StateCell for Signal<AppState> {
    fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.read())
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let mut signal = *self;
        let result = f(&mut signal.write());
        result
    }
}

impl StateCell for RefCell<AppState> {
    fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.borrow())
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

/// The shared state installed by [`crate::context::use_app_providers`].
pub fn use_app_state() -> Signal<AppState> {
    use_context::<Signal<AppState>>()
}
