//! The user-facing flows in `ui::actions`, run against a scripted backend.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use api::{
    Analysis, ApiError, AuthGrant, Backend, BiomarkerResult, Credentials, PdfUpload, Registration,
    RemoteTimelineEntry, ReportDate, ReportKind, Status, User,
};
use futures::executor::block_on;
use pretty_assertions::assert_eq;
use ui::{
    actions::{self, AuthForm},
    components::{Feedback, NoticeLevel},
    core::{
        config::AppConfig,
        storage::{KeyValueStore, MemoryStore, SESSION_KEY, TIMELINE_KEY},
    },
    report::{StagedFile, MISSING_FILE, NOTHING_TO_EXPORT},
    session::{Session, MISSING_CREDENTIALS, MISSING_REGISTRATION_FIELDS},
    state::AppState,
    timeline::{chart, timeline_rows},
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Register(String),
    Login(String),
    Analyze {
        token: Option<String>,
        file: String,
        date: String,
    },
    SaveTimeline(String),
    Timeline(String),
    GeneratePdf(ReportKind),
}

/// Records every call and replies from per-endpoint queues.
#[derive(Default)]
struct FakeBackend {
    calls: RefCell<Vec<Call>>,
    auth: RefCell<VecDeque<Result<AuthGrant, ApiError>>>,
    analyses: RefCell<VecDeque<Result<Analysis, ApiError>>>,
    saves: RefCell<VecDeque<Result<(), ApiError>>>,
    timelines: RefCell<VecDeque<Result<Vec<RemoteTimelineEntry>, ApiError>>>,
    pdfs: RefCell<VecDeque<Result<Vec<u8>, ApiError>>>,
}

fn next<T>(queue: &RefCell<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
    queue
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::Connectivity("no scripted reply".into())))
}

impl FakeBackend {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait::async_trait(?Send)]
impl Backend for FakeBackend {
    async fn register(&self, form: &Registration) -> Result<AuthGrant, ApiError> {
        self.record(Call::Register(form.username.clone()));
        next(&self.auth)
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        self.record(Call::Login(credentials.username.clone()));
        next(&self.auth)
    }

    async fn analyze(
        &self,
        token: Option<&str>,
        upload: &PdfUpload,
        date: ReportDate,
    ) -> Result<Analysis, ApiError> {
        self.record(Call::Analyze {
            token: token.map(str::to_string),
            file: upload.name.clone(),
            date: date.to_string(),
        });
        next(&self.analyses)
    }

    async fn save_timeline(
        &self,
        token: &str,
        _date: ReportDate,
        _results: &[BiomarkerResult],
    ) -> Result<(), ApiError> {
        self.record(Call::SaveTimeline(token.to_string()));
        next(&self.saves)
    }

    async fn timeline(&self, token: &str) -> Result<Vec<RemoteTimelineEntry>, ApiError> {
        self.record(Call::Timeline(token.to_string()));
        next(&self.timelines)
    }

    async fn generate_pdf(
        &self,
        _token: Option<&str>,
        kind: ReportKind,
        _results: &[BiomarkerResult],
    ) -> Result<Vec<u8>, ApiError> {
        self.record(Call::GeneratePdf(kind));
        next(&self.pdfs)
    }
}

fn day(raw: &str) -> ReportDate {
    ReportDate::parse(raw).unwrap()
}

fn reading(test: &str, value: f64, status: Status) -> BiomarkerResult {
    BiomarkerResult {
        test: test.into(),
        value,
        unit: "mg/dL".into(),
        ref_low: 70.0,
        ref_high: 100.0,
        status,
    }
}

fn grant() -> AuthGrant {
    AuthGrant {
        access_token: "tok-1".into(),
        user: User {
            id: Some(3),
            username: "ana".into(),
            email: Some("ana@example.com".into()),
            name: None,
        },
    }
}

/// Collects what the flows would show the user.
#[derive(Default)]
struct Recorder {
    notices: RefCell<Vec<(NoticeLevel, String)>>,
    busy: RefCell<Vec<bool>>,
}

impl Recorder {
    fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.borrow().clone()
    }

    fn last(&self) -> Option<(NoticeLevel, String)> {
        self.notices.borrow().last().cloned()
    }

    fn idle(&self) -> bool {
        self.busy.borrow().last().map_or(true, |busy| !busy)
    }
}

impl Feedback for Recorder {
    fn push(&self, level: NoticeLevel, message: String) {
        self.notices.borrow_mut().push((level, message));
    }

    fn set_busy(&self, busy: bool) {
        self.busy.borrow_mut().push(busy);
    }
}

fn config(require_auth: bool) -> AppConfig {
    AppConfig {
        require_auth,
        ..AppConfig::default()
    }
}

fn fresh() -> (Rc<MemoryStore>, RefCell<AppState>) {
    let store = Rc::new(MemoryStore::new());
    let state = RefCell::new(AppState::restore(store.clone()));
    (store, state)
}

fn login_form() -> AuthForm {
    AuthForm {
        username: "ana".into(),
        password: "secret".into(),
        ..AuthForm::default()
    }
}

/// Stages a PDF, sets the date field and runs the analyze flow.
fn analyze(
    state: &RefCell<AppState>,
    backend: &FakeBackend,
    feedback: &Recorder,
    date: &str,
    require_auth: bool,
) {
    {
        let mut state = state.borrow_mut();
        if state.staged().is_empty() {
            state.stage_files([StagedFile::new("report.pdf", vec![7; 10])]);
        }
        state.set_report_date(date);
    }
    block_on(actions::analyze(state, backend, feedback, &config(require_auth)));
}

fn success(message: &str) -> (NoticeLevel, String) {
    (NoticeLevel::Success, message.to_string())
}

#[test]
fn staging_keeps_only_pdfs_in_order() {
    let (_, state) = fresh();
    let accepted = state.borrow_mut().stage_files([
        StagedFile::new("jan.pdf", vec![1]),
        StagedFile::new("photo.png", vec![2]),
        StagedFile::new("feb.pdf", vec![3]),
    ]);
    assert_eq!(accepted, 2);
    let state = state.borrow();
    let names: Vec<&str> = state
        .staged()
        .list()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["jan.pdf", "feb.pdf"]);
}

#[test]
fn analyses_land_in_date_order_and_drive_the_chart() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();

    for (date, results) in [
        ("2024-03-01", vec![reading("Glucose", 110.0, Status::High)]),
        ("2024-01-15", vec![reading("Cholesterol", 180.0, Status::Normal)]),
        (
            "2024-02-10",
            vec![
                reading("Glucose", 90.0, Status::Normal),
                reading("HDL", 45.0, Status::Near),
            ],
        ),
    ] {
        backend.analyses.borrow_mut().push_back(Ok(Analysis {
            results,
            report_date: day(date),
        }));
        analyze(&state, &backend, &feedback, date, false);
    }

    assert_eq!(
        feedback.notices(),
        vec![
            success("Analysis complete: 1 results"),
            success("Analysis complete: 1 results"),
            success("Analysis complete: 2 results"),
        ]
    );
    assert!(feedback.idle());

    let state = state.borrow();
    let dates: Vec<String> = state
        .timeline()
        .entries()
        .iter()
        .map(|e| e.date().to_string())
        .collect();
    assert_eq!(dates, vec!["2024-01-15", "2024-02-10", "2024-03-01"]);
    assert_eq!(state.report_date(), "2024-02-10");
    assert_eq!(state.displayed().map(|d| d.summary.near), Some(1));

    let rows = timeline_rows(state.timeline());
    assert_eq!(rows, timeline_rows(state.timeline()));
    assert_eq!(rows.len(), 3);

    let series = chart::trend_series(state.timeline(), "glucose");
    assert_eq!(series.len(), 2);
    let plot = chart::plot(&series, chart::ChartExtent::default());
    assert_eq!(plot.points.len(), 2);

    // Anonymous analyses never touch the timeline endpoints.
    assert!(backend
        .calls()
        .iter()
        .all(|call| matches!(call, Call::Analyze { token: None, .. })));
}

#[test]
fn flat_series_renders_at_midline() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();
    for date in ["2024-01-01", "2024-02-01"] {
        backend.analyses.borrow_mut().push_back(Ok(Analysis {
            results: vec![reading("Glucose", 95.0, Status::Normal)],
            report_date: day(date),
        }));
        analyze(&state, &backend, &feedback, date, false);
    }
    let extent = chart::ChartExtent::default();
    let plot = chart::plot(&chart::trend_series(state.borrow().timeline(), "GLUC"), extent);
    assert_eq!(plot.points.len(), 2);
    assert!(plot
        .points
        .iter()
        .all(|p| p.y == extent.height / 2.0 && p.y.is_finite()));
}

#[test]
fn missing_input_warns_without_calling_the_backend() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();
    state.borrow_mut().set_report_date("2024-03-01");

    block_on(actions::analyze(&state, &backend, &feedback, &config(false)));

    assert_eq!(
        feedback.notices(),
        vec![(NoticeLevel::Warning, MISSING_FILE.to_string())]
    );
    assert!(feedback.busy.borrow().is_empty());
    assert!(backend.calls().is_empty());
}

#[test]
fn signed_in_analysis_is_saved_remotely_and_survives_save_failure() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();

    backend.auth.borrow_mut().push_back(Ok(grant()));
    backend.timelines.borrow_mut().push_back(Ok(vec![]));
    assert!(block_on(actions::authenticate(
        &state,
        &backend,
        &feedback,
        login_form()
    )));

    state
        .borrow_mut()
        .stage_files([StagedFile::new("march.pdf", vec![1, 2])]);
    backend.analyses.borrow_mut().push_back(Ok(Analysis {
        results: vec![reading("Glucose", 95.0, Status::Normal)],
        report_date: day("2024-03-01"),
    }));
    backend.saves.borrow_mut().push_back(Err(ApiError::Server {
        status: 500,
        message: "db down".into(),
    }));
    analyze(&state, &backend, &feedback, "2024-03-01", true);

    assert_eq!(
        backend.calls(),
        vec![
            Call::Login("ana".into()),
            Call::Timeline("tok-1".into()),
            Call::Analyze {
                token: Some("tok-1".into()),
                file: "march.pdf".into(),
                date: "2024-03-01".into(),
            },
            Call::SaveTimeline("tok-1".into()),
        ]
    );
    // The failed save is logged, never shown.
    assert_eq!(
        feedback.notices(),
        vec![
            success("Welcome back, ana!"),
            success("Analysis complete: 1 results"),
        ]
    );
    let state = state.borrow();
    assert_eq!(state.timeline().len(), 1);
    assert_eq!(state.displayed().map(|d| d.summary.total), Some(1));
    assert!(state.session().is_authenticated());
}

#[test]
fn analysis_failure_surfaces_backend_message() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();
    backend
        .analyses
        .borrow_mut()
        .push_back(Err(ApiError::Analysis("Unsupported lab format".into())));

    analyze(&state, &backend, &feedback, "2024-03-01", false);

    assert_eq!(
        feedback.last(),
        Some((NoticeLevel::Error, "Unsupported lab format".to_string()))
    );
    assert_eq!(*feedback.busy.borrow(), vec![true, false]);
    assert!(state.borrow().timeline().is_empty());
    assert_eq!(state.borrow().displayed(), None);
}

#[test]
fn unauthorized_timeline_load_logs_out_and_forgets_history() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (store, state) = fresh();
    state.borrow_mut().sign_in(Session::from(grant()));
    backend.analyses.borrow_mut().push_back(Ok(Analysis {
        results: vec![reading("Glucose", 250.0, Status::High)],
        report_date: day("2024-03-01"),
    }));
    backend.saves.borrow_mut().push_back(Ok(()));
    analyze(&state, &backend, &feedback, "2024-03-01", true);
    assert!(store.get(TIMELINE_KEY).unwrap().is_some());

    backend
        .timelines
        .borrow_mut()
        .push_back(Err(ApiError::SessionExpired));
    block_on(actions::refresh_timeline(&state, &backend, &feedback));

    assert_eq!(
        feedback.last(),
        Some((NoticeLevel::Error, ApiError::SessionExpired.to_string()))
    );
    {
        let state = state.borrow();
        assert!(!state.session().is_authenticated());
        assert!(state.timeline().is_empty());
        assert_eq!(state.displayed(), None);
        assert!(state.last_analysis().is_empty());
    }
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    assert_eq!(store.get(TIMELINE_KEY).unwrap(), None);

    let next_visitor = AppState::restore(store);
    assert_eq!(next_visitor.session().current(), None);
    assert!(next_visitor.timeline().is_empty());

    // Nothing left to export for whoever uses the browser next.
    block_on(actions::export(
        &state,
        &backend,
        &feedback,
        &config(false),
        ReportKind::Patient,
    ));
    assert_eq!(
        feedback.last(),
        Some((NoticeLevel::Warning, NOTHING_TO_EXPORT.to_string()))
    );
    assert!(!backend
        .calls()
        .iter()
        .any(|call| matches!(call, Call::GeneratePdf(_))));
}

#[test]
fn logout_flow_confirms_and_clears_the_screen() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (store, state) = fresh();
    state.borrow_mut().sign_in(Session::from(grant()));
    backend.analyses.borrow_mut().push_back(Ok(Analysis {
        results: vec![reading("Glucose", 95.0, Status::Normal)],
        report_date: day("2024-03-01"),
    }));
    backend.saves.borrow_mut().push_back(Ok(()));
    analyze(&state, &backend, &feedback, "2024-03-01", true);

    actions::logout(&state, &feedback);

    assert_eq!(feedback.last(), Some(success("Logged out successfully")));
    let state = state.borrow();
    assert!(!state.session().is_authenticated());
    assert!(state.timeline().is_empty());
    assert_eq!(state.displayed(), None);
    assert_eq!(store.get(TIMELINE_KEY).unwrap(), None);
}

#[test]
fn remote_timeline_replaces_local_history() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();
    state.borrow_mut().sign_in(Session::from(grant()));
    backend.timelines.borrow_mut().push_back(Ok(vec![
        RemoteTimelineEntry {
            date: day("2024-02-01T08:30:00"),
            results: vec![reading("Glucose", 101.0, Status::High)],
        },
        RemoteTimelineEntry {
            date: day("2024-01-01"),
            results: vec![],
        },
    ]));

    block_on(actions::refresh_timeline(&state, &backend, &feedback));

    assert_eq!(backend.calls(), vec![Call::Timeline("tok-1".into())]);
    assert!(feedback.notices().is_empty());
    let state = state.borrow();
    assert_eq!(state.timeline().len(), 2);
    let first = &state.timeline().entries()[0];
    assert_eq!(first.date().to_string(), "2024-01-01");
    assert_eq!(state.timeline().entries()[1].summary().abnormal, 1);
}

#[test]
fn refresh_without_a_session_does_nothing() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();
    block_on(actions::refresh_timeline(&state, &backend, &feedback));
    assert!(backend.calls().is_empty());
    assert!(feedback.notices().is_empty());
}

#[test]
fn export_without_results_warns_and_never_calls_the_backend() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();

    block_on(actions::export(
        &state,
        &backend,
        &feedback,
        &config(false),
        ReportKind::Patient,
    ));

    assert_eq!(
        feedback.notices(),
        vec![(NoticeLevel::Warning, NOTHING_TO_EXPORT.to_string())]
    );
    assert!(backend.calls().is_empty());
}

#[test]
fn export_fetches_named_document() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();
    backend.analyses.borrow_mut().push_back(Ok(Analysis {
        results: vec![reading("Glucose", 95.0, Status::Normal)],
        report_date: day("2024-03-01"),
    }));
    analyze(&state, &backend, &feedback, "2024-03-01", false);

    backend.pdfs.borrow_mut().push_back(Ok(b"%PDF-1.4".to_vec()));
    let request = state
        .borrow()
        .begin_export(ReportKind::Doctor, false)
        .unwrap();
    let report = block_on(request.fetch(&backend)).unwrap();
    assert_eq!(report.file_name, "doctor_report.pdf");
    assert_eq!(report.bytes, b"%PDF-1.4".to_vec());
    assert_eq!(backend.calls().last(), Some(&Call::GeneratePdf(ReportKind::Doctor)));
}

#[test]
fn failed_export_reports_and_expired_export_logs_out() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();
    state.borrow_mut().sign_in(Session::from(grant()));
    backend.analyses.borrow_mut().push_back(Ok(Analysis {
        results: vec![reading("Glucose", 95.0, Status::Normal)],
        report_date: day("2024-03-01"),
    }));
    backend.saves.borrow_mut().push_back(Ok(()));
    analyze(&state, &backend, &feedback, "2024-03-01", true);

    backend
        .pdfs
        .borrow_mut()
        .push_back(Err(ApiError::Export("Error generating doctor report.".into())));
    block_on(actions::export(
        &state,
        &backend,
        &feedback,
        &config(true),
        ReportKind::Doctor,
    ));
    assert_eq!(
        feedback.last(),
        Some((
            NoticeLevel::Error,
            "Error generating doctor report.".to_string()
        ))
    );
    assert!(feedback.idle());
    assert!(state.borrow().session().is_authenticated());

    backend
        .pdfs
        .borrow_mut()
        .push_back(Err(ApiError::SessionExpired));
    block_on(actions::export(
        &state,
        &backend,
        &feedback,
        &config(true),
        ReportKind::Patient,
    ));
    assert!(!state.borrow().session().is_authenticated());
    assert!(state.borrow().last_analysis().is_empty());
}

#[test]
fn login_and_register_validate_before_any_request() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (_, state) = fresh();

    let blank_password = AuthForm {
        password: "  ".into(),
        ..login_form()
    };
    assert!(!block_on(actions::authenticate(
        &state,
        &backend,
        &feedback,
        blank_password
    )));
    let missing_email = AuthForm {
        register: true,
        name: "Ana".into(),
        ..login_form()
    };
    assert!(!block_on(actions::authenticate(
        &state,
        &backend,
        &feedback,
        missing_email
    )));

    assert_eq!(
        feedback.notices(),
        vec![
            (NoticeLevel::Warning, MISSING_CREDENTIALS.to_string()),
            (NoticeLevel::Warning, MISSING_REGISTRATION_FIELDS.to_string()),
        ]
    );
    assert!(backend.calls().is_empty());
    assert!(feedback.idle());
}

#[test]
fn rejected_login_leaves_session_unchanged() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (store, state) = fresh();
    backend
        .auth
        .borrow_mut()
        .push_back(Err(ApiError::Authentication("Invalid credentials.".into())));

    let signed_in = block_on(actions::authenticate(
        &state,
        &backend,
        &feedback,
        login_form(),
    ));

    assert!(!signed_in);
    assert_eq!(
        feedback.last(),
        Some((NoticeLevel::Error, "Invalid credentials.".to_string()))
    );
    assert!(!state.borrow().session().is_authenticated());
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    assert_eq!(backend.calls(), vec![Call::Login("ana".into())]);
}

#[test]
fn registration_keeps_the_entered_name_and_loads_the_timeline() {
    let backend = FakeBackend::default();
    let feedback = Recorder::default();
    let (store, state) = fresh();
    backend.auth.borrow_mut().push_back(Ok(grant()));
    backend.timelines.borrow_mut().push_back(Ok(vec![RemoteTimelineEntry {
        date: day("2024-01-01"),
        results: vec![reading("Glucose", 99.0, Status::Normal)],
    }]));

    let form = AuthForm {
        register: true,
        name: "Ana Ruiz".into(),
        email: "ana@example.com".into(),
        ..login_form()
    };
    assert!(block_on(actions::authenticate(&state, &backend, &feedback, form)));

    assert_eq!(
        backend.calls(),
        vec![Call::Register("ana".into()), Call::Timeline("tok-1".into())]
    );
    assert_eq!(
        feedback.notices(),
        vec![success("Welcome, Ana Ruiz! Your account is ready.")]
    );
    let state = state.borrow();
    assert_eq!(
        state.session().user().map(|user| user.display_name().to_string()),
        Some("Ana Ruiz".to_string())
    );
    assert_eq!(state.timeline().len(), 1);
    assert!(store.get(SESSION_KEY).unwrap().is_some());
}
