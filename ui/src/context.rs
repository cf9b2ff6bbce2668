//! Wiring shared by every launcher: config, backend, notices and state.

use std::rc::Rc;

use api::{ApiClient, Backend};
use dioxus::logger::tracing::warn;
use dioxus::prelude::*;

use crate::{
    actions,
    components::toast::Notifier,
    core::{
        config::AppConfig,
        storage::{KeyValueStore, LocalStore, MemoryStore},
    },
    state::AppState,
};

/// Shared handle to whichever [`Backend`] the app talks to.
#[derive(Clone)]
pub struct BackendHandle(Rc<dyn Backend>);

impl BackendHandle {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self(Rc::new(backend))
    }

    pub fn get(&self) -> &dyn Backend {
        self.0.as_ref()
    }
}

fn open_store() -> Rc<dyn KeyValueStore> {
    match LocalStore::open() {
        Ok(store) => Rc::new(store),
        Err(err) => {
            warn!("local storage unavailable, nothing will persist: {err}");
            Rc::new(MemoryStore::new())
        }
    }
}

/// Installs the app-wide providers. Call once at the root component.
///
/// A session restored from storage immediately refreshes its timeline from
/// the backend.
pub fn use_app_providers(config: AppConfig) {
    let config = use_context_provider(|| config);
    let backend =
        use_context_provider(|| BackendHandle::new(ApiClient::new(config.api_base_url.clone())));
    let notifier = use_context_provider(|| Notifier::new(config.notice_ttl_ms));
    let state = use_context_provider(|| Signal::new(AppState::restore(open_store())));

    use_hook(move || {
        if state.peek().session().is_authenticated() {
            let backend = backend.clone();
            spawn(async move {
                actions::refresh_timeline(&state, backend.get(), &notifier).await;
            });
        }
    });
}

pub fn use_config() -> AppConfig {
    use_context::<AppConfig>()
}

pub fn use_backend() -> BackendHandle {
    use_context::<BackendHandle>()
}
