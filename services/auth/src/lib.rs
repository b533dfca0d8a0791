//! Session lifecycle for the Visa Portal client
//!
//! Sign-up, sign-in (password or federated), sign-out and profile updates,
//! with the resulting session persisted across restarts and ended
//! automatically when the API rejects the credential.

pub mod models;
pub mod session;
pub mod validation;

pub use models::{LoginCredentials, ProfileUpdate, Session, SignUpCredentials};
pub use session::SessionStore;
