//! Register view

use std::sync::Arc;

use auth::{
    Session, SessionStore, SignUpCredentials,
    validation::{PasswordChecklist, validate_email, validate_optional_url, validate_required},
};
use common::error::{ClientError, ClientResult};

use super::{SubmitLatch, begin_submit, reject};

/// Register form input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub password: String,
}

impl RegisterForm {
    /// Live password checklist shown under the password field
    pub fn password_checklist(&self) -> PasswordChecklist {
        PasswordChecklist::check(&self.password)
    }

    pub fn validate(&self) -> ClientResult<SignUpCredentials> {
        let checklist = self.password_checklist();
        if !checklist.is_satisfied() {
            return Err(ClientError::Validation(format!(
                "Please fix the password errors before submitting. {}.",
                checklist.failures().join(". ")
            )));
        }

        validate_required("Name", &self.name)?;
        validate_email(self.email.trim())?;
        validate_optional_url("Photo URL", Some(self.photo_url.as_str()))?;

        let photo = self.photo_url.trim();
        Ok(SignUpCredentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            name: self.name.trim().to_string(),
            photo: (!photo.is_empty()).then(|| photo.to_string()),
        })
    }
}

pub struct RegisterView {
    session_store: Arc<SessionStore>,
    submit: SubmitLatch,
}

impl RegisterView {
    pub fn new(session_store: Arc<SessionStore>) -> Self {
        Self {
            session_store,
            submit: SubmitLatch::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submit.is_submitting()
    }

    /// Validate the form and create the account; nothing is sent if invalid
    pub async fn register(&self, form: &RegisterForm) -> ClientResult<Session> {
        let notifier = self.session_store.notifier();
        let _submitting = begin_submit(&self.submit, notifier.as_ref())?;

        let credentials = form.validate().map_err(|e| reject(notifier.as_ref(), e))?;
        self.session_store.sign_up(&credentials).await
    }

    /// Register through the identity provider
    pub async fn register_with_provider(&self) -> ClientResult<Session> {
        let notifier = self.session_store.notifier();
        let _submitting = begin_submit(&self.submit, notifier.as_ref())?;

        self.session_store.sign_in_with_provider().await
    }
}
