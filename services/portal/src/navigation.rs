//! Navigation history and guarded rendering

use std::sync::Arc;

use auth::SessionStore;
use tracing::info;

use crate::{
    guard::{self, AuthState, GuardDecision, Redirect},
    routes::Route,
};

/// One history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    /// Location captured by a guard redirect, restored after sign-in
    pub from: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from: None,
        }
    }
}

/// What the current location renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Blocking progress indicator while the session loads
    Progress,
    View(Route),
    /// The guard sent the user elsewhere; the history entry was replaced
    Redirected(Redirect),
    NotFound,
}

/// Navigation history bound to a session store
pub struct Navigator {
    store: Arc<SessionStore>,
    history: Vec<Location>,
}

impl Navigator {
    /// Start at `/`
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            history: vec![Location::new(Route::Home.path())],
        }
    }

    /// Push `path` and render it
    pub fn navigate(&mut self, path: &str) -> Screen {
        self.history.push(Location::new(path));
        self.render()
    }

    /// Replace the current entry with `path` and render it
    pub fn replace(&mut self, path: &str) -> Screen {
        self.replace_current(Location::new(path));
        self.render()
    }

    /// Go back one entry, if there is one
    pub fn back(&mut self) -> Option<Screen> {
        if self.history.len() < 2 {
            return None;
        }
        self.history.pop();
        Some(self.render())
    }

    /// Re-evaluate the current location against the session state
    ///
    /// A guard redirect replaces the current entry, so going back never
    /// returns to the protected location.
    pub fn render(&mut self) -> Screen {
        let path = self.current().path.clone();
        let Some(route) = Route::parse(&path) else {
            return Screen::NotFound;
        };

        match guard::check(&route, &path, &AuthState::of(&self.store)) {
            GuardDecision::Pending => Screen::Progress,
            GuardDecision::Allow => Screen::View(route),
            GuardDecision::Redirect(redirect) => {
                info!("{} requires sign-in, redirecting to {}", path, redirect.to);
                let location = Location {
                    path: redirect.to.clone(),
                    from: Some(redirect.from.clone()),
                };
                if redirect.replace {
                    self.replace_current(location);
                } else {
                    self.history.push(location);
                }
                Screen::Redirected(redirect)
            }
        }
    }

    /// Where a sign-in on the current location should return to
    pub fn return_path(&self) -> String {
        self.current()
            .from
            .clone()
            .unwrap_or_else(|| Route::Home.path())
    }

    pub fn current(&self) -> &Location {
        // The history is never empty: it starts with `/` and `back` keeps one entry
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[Location] {
        &self.history
    }

    fn replace_current(&mut self, location: Location) {
        match self.history.last_mut() {
            Some(current) => *current = location,
            None => self.history.push(location),
        }
    }
}
