//! Listings added by the signed-in user: update and delete

use std::sync::Arc;

use auth::SessionStore;
use common::error::{ClientError, ClientResult};
use tracing::info;

use super::{
    Confirm, DELETE_VISA_PROMPT, ListState, MutationOutcome, SubmitLatch, begin_submit, reject,
    require_session,
};
use crate::{
    models::{Visa, VisaForm},
    repositories::VisaRepository,
    state::AppState,
};

pub struct MyAddedVisasView {
    session_store: Arc<SessionStore>,
    visas: VisaRepository,
    list: ListState<Visa>,
    submit: SubmitLatch,
}

impl MyAddedVisasView {
    pub fn new(state: &AppState) -> Self {
        Self {
            session_store: state.session_store.clone(),
            visas: state.visa_repository.clone(),
            list: ListState::new(),
            submit: SubmitLatch::new(),
        }
    }

    /// Load the listings added by the signed-in user
    pub async fn load(&self) -> ClientResult<Vec<Visa>> {
        let session = require_session(&self.session_store)?;
        self.list.load(self.visas.list_by_user(&session.email)).await
    }

    pub fn visas(&self) -> Vec<Visa> {
        self.list.items()
    }

    pub fn is_loading(&self) -> bool {
        self.list.is_loading()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit.is_submitting()
    }

    /// Prefilled update form for a loaded listing
    pub fn edit_form(&self, id: &str) -> Option<VisaForm> {
        self.list.find(id).map(|visa| VisaForm::from_visa(&visa))
    }

    /// Update a loaded listing; replaces it locally once the API reports a change
    pub async fn update(&self, id: &str, form: &VisaForm) -> ClientResult<MutationOutcome> {
        let notifier = self.session_store.notifier();
        let _submitting = begin_submit(&self.submit, notifier.as_ref())?;

        let fields = form.validate().map_err(|e| reject(notifier.as_ref(), e))?;
        let current = self.list.find(id).ok_or_else(|| {
            reject(
                notifier.as_ref(),
                ClientError::Validation(format!("Visa {} is not in your list", id)),
            )
        })?;

        if !self.visas.update(id, &fields).await? {
            return Ok(MutationOutcome::NoOp);
        }

        self.list.replace(current.with_fields(fields));
        info!("Updated visa {}", id);
        notifier.success("Visa updated successfully!");
        Ok(MutationOutcome::Applied)
    }

    /// Delete a listing after confirmation; declining sends nothing
    pub async fn delete(&self, id: &str, confirm: &impl Confirm) -> ClientResult<MutationOutcome> {
        if !confirm.confirm(&DELETE_VISA_PROMPT) {
            return Ok(MutationOutcome::Declined);
        }

        let notifier = self.session_store.notifier();
        let _submitting = begin_submit(&self.submit, notifier.as_ref())?;

        if !self.visas.delete(id).await? {
            return Ok(MutationOutcome::NoOp);
        }

        self.list.remove(id);
        info!("Deleted visa {}", id);
        notifier.success("Your visa has been deleted.");
        Ok(MutationOutcome::Applied)
    }
}
