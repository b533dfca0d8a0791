//! Credential payloads and identity provider responses

use serde::{Deserialize, Serialize};

/// Email/password registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpCredentials {
    pub email: String,
    pub password: String,
    pub name: String,
    pub photo: Option<String>,
}

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Profile update payload; `None` leaves the field untouched
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Response of the register and login endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: Option<String>,
    pub photo: Option<String>,
}

/// Response of the federated login endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderAuthResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub photo: Option<String>,
}
