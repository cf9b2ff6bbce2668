use dioxus::prelude::*;

use super::Timeline;
use crate::{core::format, report::Summary, state::use_app_state};

/// Display data for one timeline row.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRow {
    pub index: usize,
    pub date_label: String,
    pub test_count: usize,
    pub summary: Summary,
}

/// One row per entry, in timeline order.
pub fn timeline_rows(timeline: &Timeline) -> Vec<TimelineRow> {
    timeline
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| TimelineRow {
            index,
            date_label: format::format_report_date(entry.date()),
            test_count: entry.results().len(),
            summary: entry.summary(),
        })
        .collect()
}

#[component]
pub fn TimelineList(on_view: EventHandler<usize>) -> Element {
    let state = use_app_state();
    let rows = timeline_rows(state.read().timeline());

    rsx! {
        section { class: "results-card timeline-list",
            div { class: "results-card__header",
                h2 { "Timeline" }
                span { class: "results-card__meta", "{rows.len()} reports" }
            }
            if rows.is_empty() {
                p { class: "results-card__placeholder",
                    "Analyzed reports appear here in date order."
                }
            } else {
                ol { class: "timeline-list__items",
                    for row in rows {
                        li { key: "{row.index}", class: "timeline-item",
                            div { class: "timeline-item__date", "{row.date_label}" }
                            div { class: "timeline-item__meta", "{row.test_count} tests" }
                            div { class: "timeline-item__counts",
                                span { class: "status-badge status-badge--normal", "{row.summary.normal} normal" }
                                span { class: "status-badge status-badge--near", "{row.summary.near} borderline" }
                                span { class: "status-badge status-badge--high", "{row.summary.abnormal} abnormal" }
                            }
                            button {
                                class: "button button--ghost",
                                r#type: "button",
                                onclick: move |_| on_view.call(row.index),
                                "View details"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{BiomarkerResult, ReportDate, Status};
    use pretty_assertions::assert_eq;

    fn results(statuses: &[Status]) -> Vec<BiomarkerResult> {
        statuses
            .iter()
            .map(|status| BiomarkerResult {
                test: "Glucose".into(),
                value: 90.0,
                unit: "mg/dL".into(),
                ref_low: 70.0,
                ref_high: 100.0,
                status: *status,
            })
            .collect()
    }

    #[test]
    fn rows_follow_timeline_order() {
        let mut timeline = Timeline::default();
        for (date, statuses) in [
            ("2024-03-01", vec![Status::Normal]),
            ("2024-01-15", vec![Status::High, Status::Near]),
            ("2024-02-10", vec![]),
        ] {
            timeline.append(results(&statuses), ReportDate::parse(date).unwrap());
        }
        let rows = timeline_rows(&timeline);
        let labels: Vec<&str> = rows.iter().map(|r| r.date_label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 15, 2024", "Feb 10, 2024", "Mar 1, 2024"]);
        assert_eq!(rows[0].test_count, 2);
        assert_eq!(rows[0].summary.abnormal, 1);
        assert_eq!(rows[1].index, 1);
    }

    #[test]
    fn rendering_twice_is_identical() {
        let mut timeline = Timeline::default();
        timeline.append(
            results(&[Status::Normal, Status::Low]),
            ReportDate::parse("2024-01-01").unwrap(),
        );
        assert_eq!(timeline_rows(&timeline), timeline_rows(&timeline));
    }
}
