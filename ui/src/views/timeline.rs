use dioxus::prelude::*;

use crate::{
    report::ResultsPanel,
    state::use_app_state,
    timeline::{TimelineList, TrendChart},
};

#[component]
pub fn Timeline() -> Element {
    let mut state = use_app_state();

    rsx! {
        section { class: "page page-timeline",
            h1 { "Timeline" }
            p { "Every analyzed report, oldest first. Pick a biomarker to follow it over time." }

            div { class: "timeline__panels",
                TimelineList {
                    on_view: move |index: usize| {
                        state.write().view_entry(index);
                    },
                }
                TrendChart {}
            }

            ResultsPanel {}
        }
    }
}
