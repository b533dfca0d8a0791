//! Login view

use std::sync::Arc;

use auth::{LoginCredentials, SessionStore, validation::validate_required};
use common::error::ClientResult;

use super::{SubmitLatch, begin_submit, reject};
use crate::routes::Route;

pub struct LoginView {
    session_store: Arc<SessionStore>,
    from: Option<String>,
    submit: SubmitLatch,
}

impl LoginView {
    /// `from` is the location captured by a guard redirect
    pub fn new(session_store: Arc<SessionStore>, from: Option<String>) -> Self {
        Self {
            session_store,
            from,
            submit: SubmitLatch::new(),
        }
    }

    /// Where a successful sign-in leads
    pub fn destination(&self) -> String {
        self.from.clone().unwrap_or_else(|| Route::Home.path())
    }

    pub fn is_submitting(&self) -> bool {
        self.submit.is_submitting()
    }

    /// Sign in with email and password; returns the destination path
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<String> {
        let notifier = self.session_store.notifier();
        let _submitting = begin_submit(&self.submit, notifier.as_ref())?;

        validate_required("Email", email)
            .and_then(|_| validate_required("Password", password))
            .map_err(|e| reject(notifier.as_ref(), e))?;

        let credentials = LoginCredentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.session_store.sign_in(&credentials).await?;
        Ok(self.destination())
    }

    /// Sign in through the identity provider; returns the destination path
    pub async fn sign_in_with_provider(&self) -> ClientResult<String> {
        let notifier = self.session_store.notifier();
        let _submitting = begin_submit(&self.submit, notifier.as_ref())?;

        self.session_store.sign_in_with_provider().await?;
        Ok(self.destination())
    }
}
