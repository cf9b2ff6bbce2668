use dioxus::prelude::*;

use crate::{
    actions::{self, AuthForm},
    components::toast::use_notifier,
    context::use_backend,
    state::use_app_state,
};

/// Login / registration dialog. Closes itself once a session exists.
#[component]
pub fn LoginModal(on_close: EventHandler<()>) -> Element {
    let state = use_app_state();
    let backend = use_backend();
    let notifier = use_notifier();
    let mut form = use_signal(AuthForm::default);
    let mut pending = use_signal(|| false);

    let registering = form.read().register;
    let title = if registering { "Create account" } else { "Log in" };
    let submit_label = if registering { "Register" } else { "Log in" };
    let password_hint = if registering {
        "new-password"
    } else {
        "current-password"
    };
    let switch_label = if registering {
        "Already have an account? Log in"
    } else {
        "New here? Create an account"
    };

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if pending() {
            return;
        }
        let backend = backend.clone();
        let submitted = form();
        spawn(async move {
            pending.set(true);
            let signed_in = actions::authenticate(&state, backend.get(), &notifier, submitted).await;
            pending.set(false);
            if signed_in {
                form.set(AuthForm::default());
                on_close.call(());
            }
        });
    };

    rsx! {
        div { class: "modal-backdrop", onclick: move |_| on_close.call(()),
            div {
                class: "modal",
                role: "dialog",
                onclick: move |evt| evt.stop_propagation(),
                div { class: "modal__header",
                    h2 { "{title}" }
                    button {
                        class: "modal__close",
                        r#type: "button",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
                form { class: "modal__form", onsubmit: submit,
                    if registering {
                        label { class: "field",
                            span { class: "field__label", "Full name" }
                            input {
                                class: "field__input",
                                r#type: "text",
                                value: "{form.read().name}",
                                oninput: move |evt| form.write().name = evt.value(),
                            }
                        }
                        label { class: "field",
                            span { class: "field__label", "Email" }
                            input {
                                class: "field__input",
                                r#type: "email",
                                value: "{form.read().email}",
                                oninput: move |evt| form.write().email = evt.value(),
                            }
                        }
                    }
                    label { class: "field",
                        span { class: "field__label", "Username" }
                        input {
                            class: "field__input",
                            r#type: "text",
                            autocomplete: "username",
                            value: "{form.read().username}",
                            oninput: move |evt| form.write().username = evt.value(),
                        }
                    }
                    label { class: "field",
                        span { class: "field__label", "Password" }
                        input {
                            class: "field__input",
                            r#type: "password",
                            autocomplete: password_hint,
                            value: "{form.read().password}",
                            oninput: move |evt| form.write().password = evt.value(),
                        }
                    }
                    button {
                        class: "button button--primary",
                        r#type: "submit",
                        disabled: pending(),
                        "{submit_label}"
                    }
                }
                button {
                    class: "button button--ghost modal__switch",
                    r#type: "button",
                    onclick: move |_| {
                        let mut current = form.write();
                        current.register = !current.register;
                    },
                    "{switch_label}"
                }
            }
        }
    }
}
