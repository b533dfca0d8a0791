//! Visa application models

use auth::{Session, validation::validate_required};
use chrono::NaiveDate;
use common::error::ClientResult;
use serde::{Deserialize, Serialize};

use super::{Visa, VisaType, number_or_digits};

/// A submitted application, as served by `GET /applications/:uid`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: String,
    pub visa_id: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "appliedDate")]
    pub applied_date: NaiveDate,
    #[serde(default, deserialize_with = "number_or_digits")]
    pub fee: u32,
    pub country: String,
    #[serde(default)]
    pub country_image: String,
    #[serde(default)]
    pub visa_type: VisaType,
    #[serde(default)]
    pub processing_time: String,
    #[serde(default)]
    pub validity: String,
    #[serde(default)]
    pub application_method: String,
    #[serde(rename = "userId", default)]
    pub user_id: String,
}

impl Application {
    /// The application the API stored for `new` under `id`
    pub fn from_new(id: String, new: NewApplication) -> Self {
        Self {
            id,
            visa_id: new.visa_id,
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            applied_date: new.applied_date,
            fee: new.fee,
            country: new.country,
            country_image: new.country_image,
            visa_type: new.visa_type,
            processing_time: new.processing_time,
            validity: new.validity,
            application_method: new.application_method,
            user_id: new.user_id,
        }
    }

    /// Applicant's full name
    pub fn applicant_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Apply form input on the visa details view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyForm {
    pub first_name: String,
    pub last_name: String,
}

impl ApplyForm {
    pub fn validate(&self) -> ClientResult<()> {
        validate_required("First name", &self.first_name)?;
        validate_required("Last name", &self.last_name)
    }
}

/// Body of `POST /applications`
///
/// Email and fee are snapshots: later changes to the session or the
/// listing do not affect a submitted application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewApplication {
    pub visa_id: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "appliedDate")]
    pub applied_date: NaiveDate,
    pub fee: u32,
    pub country: String,
    pub country_image: String,
    pub visa_type: VisaType,
    pub processing_time: String,
    pub validity: String,
    pub application_method: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl NewApplication {
    pub fn new(applicant: &Session, visa: &Visa, form: &ApplyForm, applied_date: NaiveDate) -> Self {
        Self {
            visa_id: visa.id.clone(),
            email: applicant.email.clone(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            applied_date,
            fee: visa.fee,
            country: visa.country.clone(),
            country_image: visa.country_image.clone(),
            visa_type: visa.visa_type.clone(),
            processing_time: visa.processing_time.clone(),
            validity: visa.validity.clone(),
            application_method: visa.application_method.clone(),
            user_id: applicant.uid.clone(),
        }
    }
}
