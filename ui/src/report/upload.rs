use std::sync::Arc;

use dioxus::html::{FileEngine, HasFileData};
use dioxus::logger::tracing::{debug, warn};
use dioxus::prelude::*;
use futures_util::StreamExt;

use super::{media_type_for, StagedFile, PDF_MEDIA_TYPE};
use crate::{
    actions,
    components::toast::use_notifier,
    context::{use_backend, use_config},
    core::format,
    state::{use_app_state, AppState},
};

/// Reads the PDFs out of a picker or drop; other files come back empty and
/// are filtered when staged.
async fn collect_files(engine: Arc<dyn FileEngine>) -> Vec<StagedFile> {
    let mut candidates = Vec::new();
    for name in engine.files() {
        if media_type_for(&name) != PDF_MEDIA_TYPE {
            debug!("skipping non-PDF {name}");
            candidates.push(StagedFile::new(name, Vec::new()));
            continue;
        }
        match engine.read_file(&name).await {
            Some(bytes) => candidates.push(StagedFile::new(name, bytes)),
            None => warn!("could not read {name}"),
        }
    }
    candidates
}

async fn stage_from(mut state: Signal<AppState>, engine: Arc<dyn FileEngine>) {
    let candidates = collect_files(engine).await;
    let accepted = state.write().stage_files(candidates);
    debug!("staged {accepted} file(s)");
}

enum UploadEvent {
    Stage(Arc<dyn FileEngine>),
    Analyze,
}

/// Drop zone, staged file list, report date and the analyze action.
#[component]
pub fn UploadPanel() -> Element {
    let mut state = use_app_state();
    let backend = use_backend();
    let notifier = use_notifier();
    let config = use_config();
    let mut dragging = use_signal(|| false);

    // Picks and submissions are handled one at a time, in arrival order.
    let uploads = use_coroutine(move |mut rx: UnboundedReceiver<UploadEvent>| {
        let backend = backend.clone();
        let config = config.clone();
        async move {
            while let Some(event) = rx.next().await {
                match event {
                    UploadEvent::Stage(engine) => stage_from(state, engine).await,
                    UploadEvent::Analyze => {
                        actions::analyze(&state, backend.get(), &notifier, &config).await
                    }
                }
            }
        }
    });

    let staged: Vec<(String, String)> = state
        .read()
        .staged()
        .list()
        .iter()
        .map(|file| (file.name.clone(), format::format_megabytes(file.size_bytes())))
        .collect();
    let report_date = state.read().report_date().to_string();
    let busy = notifier.is_busy();
    let zone_class = if dragging() {
        "upload-zone upload-zone--active"
    } else {
        "upload-zone"
    };

    rsx! {
        section { class: "results-card upload-panel",
            div { class: "results-card__header",
                h2 { "Upload lab reports" }
                span { class: "results-card__meta", "PDF only" }
            }

            div {
                class: "{zone_class}",
                ondragover: move |evt| {
                    evt.prevent_default();
                    dragging.set(true);
                },
                ondragleave: move |_| dragging.set(false),
                ondrop: move |evt: DragEvent| {
                    evt.prevent_default();
                    dragging.set(false);
                    if let Some(engine) = evt.files() {
                        uploads.send(UploadEvent::Stage(engine));
                    }
                },
                p { class: "upload-zone__primary", "Drop PDFs here or choose files" }
                input {
                    class: "upload-zone__input",
                    r#type: "file",
                    accept: ".pdf,application/pdf",
                    multiple: true,
                    disabled: busy,
                    onchange: move |evt: FormEvent| {
                        if let Some(engine) = evt.files() {
                            uploads.send(UploadEvent::Stage(engine));
                        }
                    },
                }
            }

            if !staged.is_empty() {
                ul { class: "staged-list",
                    for (i, (name, size)) in staged.into_iter().enumerate() {
                        li { key: "{i}", class: "staged-list__item",
                            span { class: "staged-list__name", "{name}" }
                            span { class: "staged-list__size", "{size}" }
                            button {
                                class: "staged-list__remove",
                                r#type: "button",
                                onclick: move |_| {
                                    if let Err(err) = state.write().unstage(i) {
                                        warn!("{err}");
                                    }
                                },
                                "Remove"
                            }
                        }
                    }
                }
                p { class: "staged-list__note", "Only the first file is sent for analysis." }
            }

            div { class: "upload-panel__controls",
                label { class: "field",
                    span { class: "field__label", "Report date" }
                    input {
                        class: "field__input",
                        r#type: "date",
                        value: "{report_date}",
                        oninput: move |evt| state.write().set_report_date(evt.value()),
                    }
                }
                div { class: "upload-panel__actions",
                    button {
                        class: "button button--primary",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| uploads.send(UploadEvent::Analyze),
                        "Analyze"
                    }
                    button {
                        class: "button button--ghost",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| state.write().clear_staged(),
                        "Clear"
                    }
                }
            }
        }
    }
}
