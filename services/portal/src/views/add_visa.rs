//! Add visa view

use std::sync::Arc;

use auth::SessionStore;
use chrono::Utc;
use common::error::ClientResult;
use tracing::info;

use super::{SubmitLatch, begin_submit, reject, require_session};
use crate::{
    models::{NewVisa, Visa, VisaForm},
    repositories::VisaRepository,
    state::AppState,
};

pub struct AddVisaView {
    session_store: Arc<SessionStore>,
    visas: VisaRepository,
    submit: SubmitLatch,
}

impl AddVisaView {
    pub fn new(state: &AppState) -> Self {
        Self {
            session_store: state.session_store.clone(),
            visas: state.visa_repository.clone(),
            submit: SubmitLatch::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submit.is_submitting()
    }

    /// Validate `form` and create the listing
    ///
    /// Returns the created listing, or `None` when the API acknowledged
    /// no insert. Nothing is sent if the form is invalid.
    pub async fn submit(&self, form: &VisaForm) -> ClientResult<Option<Visa>> {
        let notifier = self.session_store.notifier();
        let _submitting = begin_submit(&self.submit, notifier.as_ref())?;

        let fields = form.validate().map_err(|e| reject(notifier.as_ref(), e))?;
        let author = require_session(&self.session_store)?;

        let new_visa = NewVisa::new(fields, &author, Utc::now());
        let Some(id) = self.visas.create(&new_visa).await? else {
            return Ok(None);
        };

        info!("{} added visa {}", author.email, id);
        notifier.success("Visa added successfully!");
        Ok(Some(Visa::from_new(id, new_visa)))
    }
}
