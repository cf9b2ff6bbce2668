use dioxus::prelude::*;
use once_cell::sync::OnceCell;

use crate::{
    actions, components::toast::use_notifier, session::LoginModal, state::use_app_state,
};

const NAVBAR_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Platform-supplied links, so `ui` does not need each launcher's `Route`
/// enum. Each closure receives the label and returns a `Link` containing it.
///
/// ```ignore
/// register_nav(NavBuilder {
///     home: |label| rsx!( Link { class: "navbar__link", to: Route::Home {}, "{label}" } ),
///     analyze: |label| rsx!( Link { class: "navbar__link", to: Route::Analyze {}, "{label}" } ),
///     timeline: |label| rsx!( Link { class: "navbar__link", to: Route::Timeline {}, "{label}" } ),
/// });
/// ```
pub struct NavBuilder {
    pub home: fn(label: &str) -> Element,
    pub analyze: fn(label: &str) -> Element,
    pub timeline: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Home,
    Analyze,
    Timeline,
}

/// A registered platform link for `target`, or `None` before registration.
pub fn nav_link(target: NavTarget, label: &str) -> Option<Element> {
    NAV_BUILDER.get().map(|b| match target {
        NavTarget::Home => (b.home)(label),
        NavTarget::Analyze => (b.analyze)(label),
        NavTarget::Timeline => (b.timeline)(label),
    })
}

#[component]
pub fn AppNavbar(children: Element) -> Element {
    let state = use_app_state();
    let notifier = use_notifier();
    let mut show_login = use_signal(|| false);

    let user_label = state
        .read()
        .session()
        .user()
        .map(|user| user.display_name().to_string());

    let links = NAV_BUILDER.get().map(|_| {
        let home = nav_link(NavTarget::Home, "Home");
        let analyze = nav_link(NavTarget::Analyze, "Analyze");
        let timeline = nav_link(NavTarget::Timeline, "Timeline");
        rsx! {
            nav { class: "navbar__links",
                {home}
                {analyze}
                {timeline}
            }
        }
    });

    rsx! {
        document::Style { "{NAVBAR_CSS}" }

        header { id: "navbar", class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "MediLab" }
                    }
                    span { class: "navbar__brand-subtitle", "Lab reports, explained" }
                }

                if let Some(links) = links {
                    {links}
                } else {
                    nav { class: "navbar__links", {children} }
                }

                div { class: "navbar__identity",
                    if let Some(name) = user_label {
                        button {
                            class: "navbar__user",
                            r#type: "button",
                            title: "Log out",
                            onclick: move |_| actions::logout(&state, &notifier),
                            "{name}"
                        }
                    } else {
                        button {
                            class: "button button--primary navbar__login",
                            r#type: "button",
                            onclick: move |_| show_login.set(true),
                            "Login"
                        }
                    }
                }
            }
        }

        if show_login() {
            LoginModal { on_close: move |_| show_login.set(false) }
        }
    }
}
