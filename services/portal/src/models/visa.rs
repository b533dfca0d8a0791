//! Visa listing models

use std::fmt;

use auth::{
    Session,
    validation::{validate_non_negative_integer, validate_optional_url, validate_required},
};
use chrono::{DateTime, Utc};
use common::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};

use super::number_or_digits;

/// Documents a listing can require
pub const DOCUMENT_OPTIONS: [&str; 10] = [
    "Valid passport",
    "Visa application form",
    "Recent passport-sized photograph",
    "Proof of accommodation",
    "Travel itinerary",
    "Bank statements",
    "Travel insurance",
    "Employment verification",
    "Invitation letter",
    "Medical certificate",
];

/// Kind of visa a listing describes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum VisaType {
    #[default]
    Tourist,
    Business,
    Student,
    Work,
    Transit,
    Official,
    /// A type the API knows but this client does not
    Other(String),
}

impl VisaType {
    /// Types offered by the listing forms
    pub const KNOWN: [VisaType; 6] = [
        VisaType::Tourist,
        VisaType::Business,
        VisaType::Student,
        VisaType::Work,
        VisaType::Transit,
        VisaType::Official,
    ];

    /// Label as stored by the API
    pub fn label(&self) -> &str {
        match self {
            VisaType::Tourist => "Tourist visa",
            VisaType::Business => "Business visa",
            VisaType::Student => "Student visa",
            VisaType::Work => "Work visa",
            VisaType::Transit => "Transit visa",
            VisaType::Official => "Official visa",
            VisaType::Other(label) => label,
        }
    }

    /// Parse a label or a bare keyword such as `student`
    pub fn parse(input: &str) -> VisaType {
        let normalized = input.trim().to_ascii_lowercase();
        let keyword = normalized.strip_suffix(" visa").unwrap_or(&normalized);

        Self::KNOWN
            .iter()
            .find(|known| known.label().to_ascii_lowercase().starts_with(keyword) && !keyword.is_empty())
            .cloned()
            .unwrap_or_else(|| VisaType::Other(input.trim().to_string()))
    }
}

impl fmt::Display for VisaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl From<String> for VisaType {
    fn from(label: String) -> Self {
        Self::KNOWN
            .iter()
            .find(|known| known.label() == label)
            .cloned()
            .unwrap_or(VisaType::Other(label))
    }
}

impl From<VisaType> for String {
    fn from(visa_type: VisaType) -> Self {
        visa_type.label().to_string()
    }
}

/// A visa listing as served by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visa {
    #[serde(rename = "_id")]
    pub id: String,
    pub country: String,
    #[serde(default)]
    pub country_image: String,
    #[serde(default)]
    pub visa_type: VisaType,
    #[serde(default)]
    pub processing_time: String,
    #[serde(default)]
    pub required_documents: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "number_or_digits")]
    pub age_restriction: u32,
    #[serde(default, deserialize_with = "number_or_digits")]
    pub fee: u32,
    #[serde(default)]
    pub validity: String,
    #[serde(default)]
    pub application_method: String,
    #[serde(default)]
    pub added_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_date: Option<DateTime<Utc>>,
}

impl Visa {
    /// The listing the API created for `new` under `id`
    pub fn from_new(id: String, new: NewVisa) -> Self {
        let NewVisa {
            fields,
            added_by,
            added_by_name,
            added_date,
        } = new;

        Self {
            id,
            added_by,
            added_by_name: Some(added_by_name),
            added_date: Some(added_date),
            ..Visa::with_content(fields)
        }
    }

    /// Copy of this listing with its editable content replaced
    pub fn with_fields(&self, fields: VisaFields) -> Self {
        Self {
            id: self.id.clone(),
            added_by: self.added_by.clone(),
            added_by_name: self.added_by_name.clone(),
            added_date: self.added_date,
            ..Visa::with_content(fields)
        }
    }

    fn with_content(fields: VisaFields) -> Self {
        Self {
            id: String::new(),
            country: fields.country,
            country_image: fields.country_image,
            visa_type: fields.visa_type,
            processing_time: fields.processing_time,
            required_documents: fields.required_documents,
            description: fields.description,
            age_restriction: fields.age_restriction,
            fee: fields.fee,
            validity: fields.validity,
            application_method: fields.application_method,
            added_by: String::new(),
            added_by_name: None,
            added_date: None,
        }
    }
}

/// Validated, user-editable content of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisaFields {
    pub country: String,
    pub country_image: String,
    pub visa_type: VisaType,
    pub processing_time: String,
    pub required_documents: Vec<String>,
    pub description: String,
    pub age_restriction: u32,
    pub fee: u32,
    pub validity: String,
    pub application_method: String,
}

/// Body of `POST /visas`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVisa {
    #[serde(flatten)]
    pub fields: VisaFields,
    pub added_by: String,
    pub added_by_name: String,
    pub added_date: DateTime<Utc>,
}

impl NewVisa {
    /// Stamp `fields` with the author taken from the session
    pub fn new(fields: VisaFields, author: &Session, added_date: DateTime<Utc>) -> Self {
        Self {
            fields,
            added_by: author.email.clone(),
            added_by_name: author.display_name.clone(),
            added_date,
        }
    }
}

/// Raw add/update form input, as typed by the user
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisaForm {
    pub country: String,
    pub country_image: String,
    pub visa_type: VisaType,
    pub processing_time: String,
    pub required_documents: Vec<String>,
    pub description: String,
    pub age_restriction: String,
    pub fee: String,
    pub validity: String,
    pub application_method: String,
}

impl VisaForm {
    /// Prefill the form with an existing listing, for editing
    pub fn from_visa(visa: &Visa) -> Self {
        Self {
            country: visa.country.clone(),
            country_image: visa.country_image.clone(),
            visa_type: visa.visa_type.clone(),
            processing_time: visa.processing_time.clone(),
            required_documents: visa.required_documents.clone(),
            description: visa.description.clone(),
            age_restriction: visa.age_restriction.to_string(),
            fee: visa.fee.to_string(),
            validity: visa.validity.clone(),
            application_method: visa.application_method.clone(),
        }
    }

    /// Tick or untick a document checkbox
    pub fn toggle_document(&mut self, document: &str, checked: bool) {
        let present = self.required_documents.iter().any(|d| d == document);
        if checked && !present {
            self.required_documents.push(document.to_string());
        } else if !checked {
            self.required_documents.retain(|d| d != document);
        }
    }

    /// Check the form and produce the listing content
    pub fn validate(&self) -> ClientResult<VisaFields> {
        validate_required("Country name", &self.country)?;
        validate_required("Country image URL", &self.country_image)?;
        validate_optional_url("Country image URL", Some(self.country_image.as_str()))?;
        validate_required("Processing time", &self.processing_time)?;
        validate_required("Description", &self.description)?;
        validate_required("Validity", &self.validity)?;
        validate_required("Application method", &self.application_method)?;

        if self
            .required_documents
            .iter()
            .all(|document| document.trim().is_empty())
        {
            return Err(ClientError::Validation(
                "Please select at least one required document".to_string(),
            ));
        }

        let age_restriction = validate_non_negative_integer("Age restriction", &self.age_restriction)?;
        let fee = validate_non_negative_integer("Fee", &self.fee)?;

        Ok(VisaFields {
            country: self.country.trim().to_string(),
            country_image: self.country_image.trim().to_string(),
            visa_type: self.visa_type.clone(),
            processing_time: self.processing_time.trim().to_string(),
            required_documents: self
                .required_documents
                .iter()
                .map(|document| document.trim().to_string())
                .filter(|document| !document.is_empty())
                .collect(),
            description: self.description.trim().to_string(),
            age_restriction,
            fee,
            validity: self.validity.trim().to_string(),
            application_method: self.application_method.trim().to_string(),
        })
    }
}
