//! Visa details view and the apply form

use std::sync::{Arc, Mutex, PoisonError};

use auth::SessionStore;
use chrono::{Local, NaiveDate};
use common::error::{ClientError, ClientResult};
use tracing::info;

use super::{MutationOutcome, SubmitLatch, begin_submit, reject, require_session};
use crate::{
    models::{ApplyForm, NewApplication, Visa},
    repositories::{VisaRepository, application::ApplicationRepository},
    state::AppState,
};

pub struct VisaDetailsView {
    id: String,
    session_store: Arc<SessionStore>,
    visas: VisaRepository,
    applications: ApplicationRepository,
    visa: Mutex<Option<Visa>>,
    submit: SubmitLatch,
}

impl VisaDetailsView {
    pub fn new(state: &AppState, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            session_store: state.session_store.clone(),
            visas: state.visa_repository.clone(),
            applications: state.application_repository.clone(),
            visa: Mutex::new(None),
            submit: SubmitLatch::new(),
        }
    }

    pub async fn load(&self) -> ClientResult<Visa> {
        let visa = self.visas.get_by_id(&self.id).await?;
        *self.visa.lock().unwrap_or_else(PoisonError::into_inner) = Some(visa.clone());
        Ok(visa)
    }

    pub fn visa(&self) -> Option<Visa> {
        self.visa
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit.is_submitting()
    }

    /// Apply to the loaded listing, dated today
    pub async fn apply(&self, form: &ApplyForm) -> ClientResult<MutationOutcome> {
        self.apply_on(form, Local::now().date_naive()).await
    }

    /// Apply to the loaded listing with an explicit application date
    pub async fn apply_on(
        &self,
        form: &ApplyForm,
        applied_date: NaiveDate,
    ) -> ClientResult<MutationOutcome> {
        let notifier = self.session_store.notifier();
        let _submitting = begin_submit(&self.submit, notifier.as_ref())?;

        form.validate().map_err(|e| reject(notifier.as_ref(), e))?;
        let applicant = require_session(&self.session_store)?;
        let visa = self.visa().ok_or_else(|| {
            reject(
                notifier.as_ref(),
                ClientError::Validation("Visa details are not loaded yet".to_string()),
            )
        })?;

        let application = NewApplication::new(&applicant, &visa, form, applied_date);
        match self.applications.create(&application).await? {
            Some(id) => {
                info!("Application {} submitted for {}", id, visa.country);
                notifier.success("Application submitted successfully!");
                Ok(MutationOutcome::Applied)
            }
            None => Ok(MutationOutcome::NoOp),
        }
    }
}
