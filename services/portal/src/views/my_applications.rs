//! Applications submitted by the signed-in user: search and cancel

use std::sync::{Arc, Mutex, PoisonError};

use auth::SessionStore;
use common::error::ClientResult;
use tracing::info;

use super::{
    CANCEL_APPLICATION_PROMPT, Confirm, ListState, MutationOutcome, SubmitLatch, begin_submit,
    require_session,
};
use crate::{models::Application, repositories::application::ApplicationRepository, state::AppState};

pub struct MyApplicationsView {
    session_store: Arc<SessionStore>,
    applications: ApplicationRepository,
    list: ListState<Application>,
    search: Mutex<String>,
    submit: SubmitLatch,
}

impl MyApplicationsView {
    pub fn new(state: &AppState) -> Self {
        Self {
            session_store: state.session_store.clone(),
            applications: state.application_repository.clone(),
            list: ListState::new(),
            search: Mutex::new(String::new()),
            submit: SubmitLatch::new(),
        }
    }

    pub async fn load(&self) -> ClientResult<Vec<Application>> {
        let session = require_session(&self.session_store)?;
        self.list
            .load(self.applications.list_for_user(&session.uid))
            .await
    }

    pub fn set_search(&self, term: impl Into<String>) {
        *self.search.lock().unwrap_or_else(PoisonError::into_inner) = term.into();
    }

    pub fn clear_search(&self) {
        self.set_search(String::new());
    }

    /// Loaded applications whose country contains the search term, ignoring case
    pub fn visible(&self) -> Vec<Application> {
        let term = self
            .search
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .trim()
            .to_lowercase();

        self.list
            .items()
            .into_iter()
            .filter(|application| term.is_empty() || application.country.to_lowercase().contains(&term))
            .collect()
    }

    pub fn applications(&self) -> Vec<Application> {
        self.list.items()
    }

    pub fn is_loading(&self) -> bool {
        self.list.is_loading()
    }

    /// Cancel an application after confirmation; declining sends nothing
    pub async fn cancel(&self, id: &str, confirm: &impl Confirm) -> ClientResult<MutationOutcome> {
        if !confirm.confirm(&CANCEL_APPLICATION_PROMPT) {
            return Ok(MutationOutcome::Declined);
        }

        let notifier = self.session_store.notifier();
        let _submitting = begin_submit(&self.submit, notifier.as_ref())?;

        if !self.applications.cancel(id).await? {
            return Ok(MutationOutcome::NoOp);
        }

        self.list.remove(id);
        info!("Cancelled application {}", id);
        notifier.success("Your application has been cancelled.");
        Ok(MutationOutcome::Applied)
    }
}
