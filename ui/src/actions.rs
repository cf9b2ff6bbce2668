//! Event-handler flows: validate in state, call the backend, apply the reply.
//!
//! Components pass their `Signal<AppState>` and `Notifier`; both sit behind
//! [`StateCell`] and [`Feedback`] so the flows run without a live scope.

use api::{Backend, ReportKind};
use dioxus::logger::tracing::error;

use crate::{
    components::toast::Feedback,
    core::config::AppConfig,
    report::{deliver, AnalysisOutcome},
    session::{self, Session},
    state::StateCell,
    timeline::LoadOutcome,
};

/// Login form contents; `name`/`email` only matter when registering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthForm {
    pub register: bool,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

pub async fn analyze(
    state: &impl StateCell,
    backend: &dyn Backend,
    feedback: &impl Feedback,
    config: &AppConfig,
) {
    let begun = state.with_mut(|s| s.begin_analysis(config.require_auth));
    let request = match begun {
        Ok(request) => request,
        Err(err) => {
            feedback.report(&err);
            return;
        }
    };

    feedback.set_busy(true);
    let reply = request.send(backend).await;
    feedback.set_busy(false);

    match reply {
        Ok(analysis) => {
            let outcome = state.with_mut(|s| s.complete_analysis(request.ticket, analysis));
            if let AnalysisOutcome::Applied {
                result_count,
                persist,
                ..
            } = outcome
            {
                feedback.success(format!("Analysis complete: {result_count} results"));
                if let Some(job) = persist {
                    if let Err(err) = job.run(backend).await {
                        state.with_mut(|s| s.absorb_persist_failure(&err));
                    }
                }
            }
        }
        Err(err) => {
            if let Some(err) = state.with_mut(|s| s.fail_analysis(request.ticket, err)) {
                feedback.report(&err);
            }
        }
    }
}

pub async fn refresh_timeline(
    state: &impl StateCell,
    backend: &dyn Backend,
    feedback: &impl Feedback,
) {
    let Some(load) = state.with_mut(|s| s.begin_timeline_load()) else {
        return;
    };
    let reply = load.fetch(backend).await;
    let outcome = state.with_mut(|s| s.complete_timeline_load(load.ticket, reply));
    if let LoadOutcome::Failed(err) = outcome {
        if err.is_session_expired() {
            feedback.report(&err);
        }
    }
}

/// Returns `true` once a session is established.
pub async fn authenticate(
    state: &impl StateCell,
    backend: &dyn Backend,
    feedback: &impl Feedback,
    form: AuthForm,
) -> bool {
    feedback.set_busy(true);
    let reply = if form.register {
        session::register(
            backend,
            &form.name,
            &form.email,
            &form.username,
            &form.password,
        )
        .await
    } else {
        session::login(backend, &form.username, &form.password).await
    };
    feedback.set_busy(false);

    match reply {
        Ok(session) => {
            feedback.success(greeting(&session, form.register));
            state.with_mut(|s| s.sign_in(session));
            refresh_timeline(state, backend, feedback).await;
            true
        }
        Err(err) => {
            feedback.report(&err);
            false
        }
    }
}

fn greeting(session: &Session, registered: bool) -> String {
    let name = session.user.display_name();
    if registered {
        format!("Welcome, {name}! Your account is ready.")
    } else {
        format!("Welcome back, {name}!")
    }
}

pub fn logout(state: &impl StateCell, feedback: &impl Feedback) {
    state.with_mut(|s| s.logout());
    feedback.success("Logged out successfully");
}

pub async fn export(
    state: &impl StateCell,
    backend: &dyn Backend,
    feedback: &impl Feedback,
    config: &AppConfig,
    kind: ReportKind,
) {
    let begun = state.with(|s| s.begin_export(kind, config.require_auth));
    let request = match begun {
        Ok(request) => request,
        Err(err) => {
            feedback.report(&err);
            return;
        }
    };

    feedback.set_busy(true);
    let delivered = match request.fetch(backend).await {
        Ok(report) => deliver(report, kind).await,
        Err(err) => Err(err),
    };
    feedback.set_busy(false);

    match delivered {
        Ok(Some(path)) => feedback.success(format!("{} report saved to {path}", kind.title())),
        Ok(None) => feedback.success(format!("{} report downloaded", kind.title())),
        Err(err) => {
            error!("{} report export failed: {err}", kind.as_str());
            state.with_mut(|s| s.absorb_error(&err));
            feedback.report(&err);
        }
    }
}
