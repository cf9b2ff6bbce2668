use dioxus::prelude::*;

use crate::report::{ResultsPanel, UploadPanel};

#[component]
pub fn Analyze() -> Element {
    rsx! {
        section { class: "page page-analyze",
            h1 { "Analyze" }
            p { "Add a lab report, pick the date it was taken and run the analysis." }

            div { class: "analyze__panels",
                UploadPanel {}
                ResultsPanel {}
            }
        }
    }
}
