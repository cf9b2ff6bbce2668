//! Trend chart for a single biomarker across the timeline.

use api::ReportDate;
use dioxus::prelude::*;

use super::Timeline;
use crate::{core::format, state::use_app_state};

pub const DEFAULT_BIOMARKER: &str = "glucose";

/// Drawing surface in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartExtent {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartExtent {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 300.0,
            padding: 40.0,
        }
    }
}

impl ChartExtent {
    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    fn inner_height(&self) -> f64 {
        (self.height - 2.0 * self.padding).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: ReportDate,
    pub value: f64,
}

/// One point per entry whose results mention `biomarker`.
///
/// Matching is a case-insensitive substring test against the result's test
/// name; the first matching result of each entry wins. An empty selection
/// matches nothing.
pub fn trend_series(timeline: &Timeline, biomarker: &str) -> Vec<TrendPoint> {
    let needle = biomarker.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    timeline
        .entries()
        .iter()
        .filter_map(|entry| {
            entry
                .results()
                .iter()
                .find(|result| result.test.to_lowercase().contains(&needle))
                .filter(|result| result.value.is_finite())
                .map(|result| TrendPoint {
                    date: entry.date(),
                    value: result.value,
                })
        })
        .collect()
}

/// Distinct test names present anywhere in the timeline, lowercased, in the
/// order they first appear.
pub fn biomarker_options(timeline: &Timeline) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for result in timeline.entries().iter().flat_map(|entry| entry.results()) {
        let name = result.test.trim().to_lowercase();
        if !name.is_empty() && !options.contains(&name) {
            options.push(name);
        }
    }
    options
}

/// `glucose` when the timeline has it, otherwise the first option.
pub fn default_biomarker(options: &[String]) -> String {
    options
        .iter()
        .find(|name| name.as_str() == DEFAULT_BIOMARKER)
        .or_else(|| options.first())
        .cloned()
        .unwrap_or_else(|| DEFAULT_BIOMARKER.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub date: ReportDate,
}

/// Screen geometry for a series. `points` is empty when there is nothing
/// worth drawing a line through.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPlot {
    pub extent: ChartExtent,
    pub points: Vec<PlotPoint>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl TrendPlot {
    /// `M x y L x y L x y`: the y axis down to the origin, then the x axis.
    pub fn axes_path(&self) -> String {
        let e = self.extent;
        let left = e.padding;
        let top = e.padding;
        let bottom = e.height - e.padding;
        let right = e.width - e.padding;
        format!("M {left} {top} L {left} {bottom} L {right} {bottom}")
    }

    pub fn polyline(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Maps values linearly into the padded area, spacing points evenly by index.
///
/// Fewer than two points yields axes only. A flat series sits on the vertical
/// midpoint.
pub fn plot(series: &[TrendPoint], extent: ChartExtent) -> TrendPlot {
    if series.len() < 2 {
        return TrendPlot {
            extent,
            points: Vec::new(),
            min: None,
            max: None,
        };
    }

    let min = series.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = series
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let last = (series.len() - 1) as f64;

    let points = series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let normalized = if range > 0.0 {
                (point.value - min) / range
            } else {
                0.5
            };
            PlotPoint {
                x: extent.padding + (i as f64 / last) * extent.inner_width(),
                y: extent.height - extent.padding - normalized * extent.inner_height(),
                value: point.value,
                date: point.date,
            }
        })
        .collect();

    TrendPlot {
        extent,
        points,
        min: Some(min),
        max: Some(max),
    }
}

#[component]
pub fn TrendChart() -> Element {
    let state = use_app_state();
    let mut picked = use_signal(|| None::<String>);

    let (options, label, series) = {
        let app = state.read();
        let options = biomarker_options(app.timeline());
        let label = picked()
            .filter(|name| options.contains(name))
            .unwrap_or_else(|| default_biomarker(&options));
        let series = trend_series(app.timeline(), &label);
        (options, label, series)
    };
    let geometry = plot(&series, ChartExtent::default());
    let view_box = geometry.extent.view_box();
    let axes = geometry.axes_path();
    let line = geometry.polyline();
    let range_meta = match (geometry.min, geometry.max) {
        (Some(min), Some(max)) => format!(
            "{} to {}",
            format::format_number(min),
            format::format_number(max)
        ),
        _ => "Needs at least two reports".to_string(),
    };

    rsx! {
        section { class: "results-card trend-chart",
            div { class: "results-card__header",
                h2 { "Trend" }
                span { class: "results-card__meta", "{range_meta}" }
            }
            label { class: "trend-chart__picker",
                span { class: "visually-hidden", "Biomarker" }
                select {
                    value: "{label}",
                    onchange: move |evt: FormEvent| picked.set(Some(evt.value())),
                    for name in options {
                        option { key: "{name}", value: "{name}", "{name}" }
                    }
                }
            }
            svg {
                class: "trend-chart__canvas",
                xmlns: "http://www.w3.org/2000/svg",
                view_box: "{view_box}",
                path { class: "trend-chart__axes", d: "{axes}", fill: "none" }
                if !geometry.points.is_empty() {
                    polyline { class: "trend-chart__line", points: "{line}", fill: "none" }
                    for (i, point) in geometry.points.iter().enumerate() {
                        circle {
                            key: "{i}",
                            class: "trend-chart__dot",
                            cx: "{point.x:.2}",
                            cy: "{point.y:.2}",
                            r: "5",
                        }
                    }
                }
            }
        }
    }
}
