//! Transient notices and the global busy indicator.

use api::ApiError;
use dioxus::prelude::*;

use crate::core::timing::sleep_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    fn modifier(self) -> &'static str {
        match self {
            Self::Success => "toast--success",
            Self::Warning => "toast--warning",
            Self::Error => "toast--error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Missing input is the user's to fix; everything else is a failure.
pub fn classify(err: &ApiError) -> (NoticeLevel, String) {
    let level = if err.is_validation() {
        NoticeLevel::Warning
    } else {
        NoticeLevel::Error
    };
    (level, err.to_string())
}

/// Sink for the progress and outcome of user-triggered flows.
pub trait Feedback {
    fn push(&self, level: NoticeLevel, message: String);

    fn set_busy(&self, busy: bool);

    fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    fn report(&self, err: &ApiError) {
        let (level, message) = classify(err);
        self.push(level, message);
    }
}

/// Copyable handle to the notice queue, provided through context.
#[derive(Clone, Copy, PartialEq)]
pub struct Notifier {
    notices: Signal<Vec<Notice>>,
    busy: Signal<bool>,
    next_id: Signal<u64>,
    ttl_ms: u64,
}

impl Notifier {
    /// Must be called inside a component scope; the signals belong to it.
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            notices: Signal::new(Vec::new()),
            busy: Signal::new(false),
            next_id: Signal::new(0),
            ttl_ms,
        }
    }

    pub fn dismiss(&self, id: u64) {
        let mut notices = self.notices;
        notices.write().retain(|notice| notice.id != id);
    }

    pub fn is_busy(&self) -> bool {
        (self.busy)()
    }

    pub fn notices(&self) -> Vec<Notice> {
        (self.notices)()
    }
}

impl Feedback for Notifier {
    fn push(&self, level: NoticeLevel, message: String) {
        let mut notices = self.notices;
        let mut next_id = self.next_id;
        let id = next_id() + 1;
        next_id.set(id);
        notices.write().push(Notice { id, level, message });

        let ttl = self.ttl_ms;
        spawn(async move {
            sleep_ms(ttl).await;
            notices.write().retain(|notice| notice.id != id);
        });
    }

    fn set_busy(&self, busy: bool) {
        let mut flag = self.busy;
        flag.set(busy);
    }
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>()
}

#[component]
pub fn ToastStack() -> Element {
    let notifier = use_notifier();
    let notices = notifier.notices();

    rsx! {
        div { class: "toast-stack", role: "status",
            for notice in notices {
                div {
                    key: "{notice.id}",
                    class: "toast {notice.level.modifier()}",
                    span { class: "toast__message", "{notice.message}" }
                    button {
                        class: "toast__close",
                        r#type: "button",
                        onclick: move |_| notifier.dismiss(notice.id),
                        "×"
                    }
                }
            }
        }
    }
}

#[component]
pub fn LoadingIndicator() -> Element {
    let notifier = use_notifier();

    rsx! {
        if notifier.is_busy() {
            div { class: "loading-overlay",
                div { class: "loading-overlay__spinner" }
                p { class: "loading-overlay__label", "Working…" }
            }
        }
    }
}
