//! Domain models for visa listings and applications

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod application;
pub mod visa;

pub use application::{Application, ApplyForm, NewApplication};
pub use visa::{DOCUMENT_OPTIONS, NewVisa, Visa, VisaFields, VisaForm, VisaType};

/// Acknowledgement returned by insert endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsertAck {
    #[serde(rename = "insertedId", default)]
    inserted_id: Option<Value>,
}

impl InsertAck {
    /// Id of the inserted document, if the insert took effect
    pub fn id(&self) -> Option<String> {
        match self.inserted_id.as_ref()? {
            Value::Null => None,
            Value::String(id) if id.is_empty() => None,
            Value::String(id) => Some(id.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Acknowledgement returned by update endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAck {
    #[serde(rename = "modifiedCount", default)]
    pub modified_count: u64,
}

/// Acknowledgement returned by delete endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteAck {
    #[serde(rename = "deletedCount", default)]
    pub deleted_count: u64,
}

/// Accept a non-negative integer sent either as a JSON number or as digits
pub(crate) fn number_or_digits<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    let raw = Raw::deserialize(deserializer)?;
    let value = match raw {
        Raw::Number(n) => n,
        Raw::Text(text) if text.trim().is_empty() => 0,
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected digits, got {:?}", text)))?,
    };

    u32::try_from(value).map_err(|_| serde::de::Error::custom("number out of range"))
}
