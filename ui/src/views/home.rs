use dioxus::prelude::*;

use crate::components::{nav_link, NavTarget};

#[component]
pub fn Home() -> Element {
    let analyze = nav_link(NavTarget::Analyze, "Analyze a report");
    let timeline = nav_link(NavTarget::Timeline, "See your timeline");

    rsx! {
        section { class: "page page-home",
            h1 { "Understand your lab results" }
            p { "Upload a lab report PDF and get every biomarker laid out against its reference range." }

            ul { class: "page-home__features",
                li { "Automatic extraction of values, units and reference ranges" }
                li { "Clear Normal, Borderline and Abnormal flags" }
                li { "A timeline of past reports with trend charts per biomarker" }
                li { "Printable summaries for you and for your doctor" }
            }
            div { class: "page-home__cta",
                {analyze}
                {timeline}
            }
        }
    }
}
