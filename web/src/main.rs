use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::{AppNavbar, LoadingIndicator, ToastStack};
use ui::core::config::AppConfig;
use ui::views::{Analyze, Home, Timeline};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Home {},
    #[route("/analyze")]
    Analyze {},
    #[route("/timeline")]
    Timeline {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn nav_home(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Home {}, "{label}" })
}
fn nav_analyze(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Analyze {}, "{label}" })
}
fn nav_timeline(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Timeline {}, "{label}" })
}

fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already initialised: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    register_nav(NavBuilder {
        home: nav_home,
        analyze: nav_analyze,
        timeline: nav_timeline,
    });
    ui::use_app_providers(AppConfig::from_build_env());

    rsx! {
        document::Title { "MediLab" }
        document::Style { "{MAIN_CSS_INLINE}" }

        Router::<Route> {}
    }
}

/// A web-specific Router around the shared `AppNavbar` component
/// which allows us to use the web-specific `Route` enum.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar {}
        ToastStack {}
        LoadingIndicator {}
        Outlet::<Route> {}
    }
}
