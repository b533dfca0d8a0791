//! Route guard for protected views
//!
//! The guard is a pure decision over the session store's state: it never
//! touches the session itself. The navigator applies its decisions.

use auth::{Session, SessionStore};
use tracing::debug;

use crate::routes::Route;

/// Authentication state as seen by the guard
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Persisted state has not been read yet
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

impl AuthState {
    /// Snapshot the store's current state
    pub fn of(store: &SessionStore) -> Self {
        if store.is_loading() {
            return AuthState::Loading;
        }

        match store.current_session() {
            Some(session) => AuthState::Authenticated(session),
            None => AuthState::Unauthenticated,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Redirect issued by the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Where to go
    pub to: String,
    /// The location originally requested, restored after sign-in
    pub from: String,
    /// Replace the current history entry instead of pushing
    pub replace: bool,
}

/// Outcome of guarding a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a progress indicator; no decision yet
    Pending,
    Allow,
    Redirect(Redirect),
}

/// Decide whether `route`, requested as `requested_path`, may render
pub fn check(route: &Route, requested_path: &str, state: &AuthState) -> GuardDecision {
    if !route.is_protected() {
        return GuardDecision::Allow;
    }

    match state {
        AuthState::Loading => GuardDecision::Pending,
        AuthState::Authenticated(_) => GuardDecision::Allow,
        AuthState::Unauthenticated => {
            debug!("Redirecting {} to login", requested_path);
            GuardDecision::Redirect(Redirect {
                to: Route::Login.path(),
                from: requested_path.to_string(),
                replace: true,
            })
        }
    }
}
