//! Session model and related functionality

use serde::{Deserialize, Serialize};

use super::user::ProfileUpdate;

/// Avatar used when the identity provider returns no photo
pub const DEFAULT_PHOTO_URL: &str = "https://i.ibb.co/cLWY2Q9/user.png";

/// The signed-in identity, as persisted under the session storage key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
    pub uid: String,
}

impl Session {
    /// Copy of this session with the submitted profile fields applied
    ///
    /// Fields absent from `update` keep their current value.
    pub fn merged(&self, update: &ProfileUpdate) -> Session {
        Session {
            display_name: update
                .name
                .clone()
                .unwrap_or_else(|| self.display_name.clone()),
            photo_url: update
                .photo
                .clone()
                .unwrap_or_else(|| self.photo_url.clone()),
            ..self.clone()
        }
    }
}

/// Photo URL to store, falling back to the default avatar
pub(crate) fn photo_or_default(photo: Option<&str>) -> String {
    match photo {
        Some(photo) if !photo.trim().is_empty() => photo.to_string(),
        _ => DEFAULT_PHOTO_URL.to_string(),
    }
}
