//! Authentication models

pub mod session;
pub mod user;

// Re-export for convenience
pub use session::{DEFAULT_PHOTO_URL, Session};
pub use user::{
    AuthResponse, LoginCredentials, ProfileUpdate, ProviderAuthResponse, SignUpCredentials,
};
