//! Who is signed in, and the token their requests carry.

mod modal;
pub use modal::LoginModal;

use api::{ApiError, AuthGrant, Backend, Credentials, Registration, User};
use dioxus::logger::tracing::{info, warn};
use serde::{Deserialize, Serialize};

use crate::core::storage::{self, KeyValueStore, SESSION_KEY};

pub const MISSING_CREDENTIALS: &str = "Please enter username and password";
pub const MISSING_REGISTRATION_FIELDS: &str = "Please fill in all fields";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl From<AuthGrant> for Session {
    fn from(grant: AuthGrant) -> Self {
        Self {
            user: grant.user,
            token: grant.access_token,
        }
    }
}

/// In-memory session backed by a cold-start copy in local storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    current: Option<Session>,
}

impl SessionStore {
    /// Rehydrates whatever was persisted. The token is not checked here; a
    /// dead token shows up as a 401 on first use.
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        match storage::load_json::<Session>(store, SESSION_KEY) {
            Ok(Some(session)) => {
                info!("session restored for {}", session.user.username);
                Self {
                    current: Some(session),
                }
            }
            Ok(None) => Self::default(),
            Err(err) => {
                warn!("discarding unreadable session: {err}");
                if let Err(err) = store.remove(SESSION_KEY) {
                    warn!("unreadable session not removed: {err}");
                }
                Self::default()
            }
        }
    }

    pub fn establish(&mut self, session: Session, store: &dyn KeyValueStore) {
        info!("session established for {}", session.user.username);
        if let Err(err) = storage::save_json(store, SESSION_KEY, &session) {
            warn!("session not persisted: {err}");
        }
        self.current = Some(session);
    }

    pub fn logout(&mut self, store: &dyn KeyValueStore) {
        if let Some(session) = self.current.take() {
            info!("session cleared for {}", session.user.username);
        }
        if let Err(err) = store.remove(SESSION_KEY) {
            warn!("persisted session not removed: {err}");
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub async fn login(
    backend: &dyn Backend,
    username: &str,
    password: &str,
) -> Result<Session, ApiError> {
    if blank(username) || blank(password) {
        return Err(ApiError::validation(MISSING_CREDENTIALS));
    }
    let credentials = Credentials {
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    backend.login(&credentials).await.map(Session::from)
}

pub async fn register(
    backend: &dyn Backend,
    name: &str,
    email: &str,
    username: &str,
    password: &str,
) -> Result<Session, ApiError> {
    if [name, email, username, password].into_iter().any(blank) {
        return Err(ApiError::validation(MISSING_REGISTRATION_FIELDS));
    }
    let registration = Registration {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    let mut session = backend.register(&registration).await.map(Session::from)?;
    if session.user.name.is_none() {
        session.user.name = Some(registration.name);
    }
    Ok(session)
}
