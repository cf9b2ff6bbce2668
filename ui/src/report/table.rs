use api::{ReportKind, Status};
use dioxus::prelude::*;

use crate::{
    actions,
    components::toast::use_notifier,
    context::{use_backend, use_config},
    core::format,
    state::use_app_state,
};

fn status_modifier(status: Status) -> &'static str {
    match status {
        Status::Normal => "status-badge--normal",
        Status::Near => "status-badge--near",
        Status::Low => "status-badge--low",
        Status::High => "status-badge--high",
        Status::Unknown => "status-badge--unknown",
    }
}

/// Summary cards and the per-biomarker table for whatever report is on
/// screen, plus the export actions.
#[component]
pub fn ResultsPanel() -> Element {
    let state = use_app_state();
    let backend = use_backend();
    let notifier = use_notifier();
    let config = use_config();

    let displayed = state.read().displayed().cloned();
    let can_export = !state.read().last_analysis().is_empty();

    let Some(report) = displayed else {
        return rsx! {
            section { class: "results-card",
                div { class: "results-card__header",
                    h2 { "Results" }
                }
                p { class: "results-card__placeholder",
                    "Upload a lab report and run an analysis to see your biomarkers here."
                }
            }
        };
    };

    let summary = report.summary;
    let date_label = format::format_report_date(report.date);

    let export_buttons = [ReportKind::Patient, ReportKind::Doctor].map(|kind| {
        let backend = backend.clone();
        let config = config.clone();
        rsx! {
            button {
                key: "{kind.as_str()}",
                class: "button button--secondary",
                r#type: "button",
                disabled: notifier.is_busy() || !can_export,
                onclick: move |_| {
                    let backend = backend.clone();
                    let config = config.clone();
                    spawn(async move {
                        actions::export(&state, backend.get(), &notifier, &config, kind).await;
                    });
                },
                "{kind.title()} report (PDF)"
            }
        }
    });

    rsx! {
        section { class: "results-card",
            div { class: "results-card__header",
                h2 { "Results" }
                span { class: "results-card__meta", "Report date {date_label}" }
            }

            div { class: "results-summary",
                div { class: "results-summary__card results-summary__card--normal",
                    span { class: "results-summary__label", "Normal" }
                    strong { class: "results-summary__value", "{summary.normal}" }
                }
                div { class: "results-summary__card results-summary__card--near",
                    span { class: "results-summary__label", "Borderline" }
                    strong { class: "results-summary__value", "{summary.near}" }
                }
                div { class: "results-summary__card results-summary__card--abnormal",
                    span { class: "results-summary__label", "Abnormal" }
                    strong { class: "results-summary__value", "{summary.abnormal}" }
                }
                div { class: "results-summary__card",
                    span { class: "results-summary__label", "Total" }
                    strong { class: "results-summary__value", "{summary.total}" }
                }
            }

            table { class: "results-table",
                thead {
                    tr {
                        th { "Test" }
                        th { "Value" }
                        th { "Reference range" }
                        th { "Status" }
                    }
                }
                tbody {
                    for (i, result) in report.results.iter().enumerate() {
                        tr { key: "{i}",
                            td { "{result.test}" }
                            td { "{format::format_measurement(result.value, &result.unit)}" }
                            td { "{format::format_range(result.ref_low, result.ref_high)}" }
                            td {
                                span { class: "status-badge {status_modifier(result.status)}",
                                    "{result.status.label()}"
                                }
                            }
                        }
                    }
                }
            }

            div { class: "results-card__actions",
                {export_buttons.into_iter()}
            }
        }
    }
}
