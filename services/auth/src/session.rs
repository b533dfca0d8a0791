//! Session management for the signed-in user
//!
//! The store is the single writer of the current [`Session`]. Every mutation
//! writes the persisted record first and then publishes the new state, so
//! storage and memory never disagree about who is signed in.

use std::sync::{Arc, Once, Weak};

use common::{
    error::{ClientError, ClientResult},
    http::{AuthFailureHandler, HttpClient},
    notify::Notifier,
    storage::KeyValueStore,
};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::models::{
    AuthResponse, LoginCredentials, ProfileUpdate, ProviderAuthResponse, Session,
    SignUpCredentials, session::photo_or_default,
};

const REGISTER_ENDPOINT: &str = "/auth/register";
const LOGIN_ENDPOINT: &str = "/auth/login";
const PROVIDER_LOGIN_ENDPOINT: &str = "/auth/google-login";
const LOGOUT_ENDPOINT: &str = "/auth/logout";
const UPDATE_PROFILE_ENDPOINT: &str = "/auth/update-profile";

/// Session store for the signed-in identity
pub struct SessionStore {
    http: HttpClient,
    storage: Arc<dyn KeyValueStore>,
    storage_key: String,
    state: watch::Sender<Option<Session>>,
    rehydrated: Once,
}

impl SessionStore {
    /// Create a store that has not read persisted state yet
    ///
    /// The store registers itself as the client's auth-failure handler, so a
    /// 401/403 on any request made through `http` ends the session.
    pub fn new(
        http: HttpClient,
        storage: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(None);
        let store = Arc::new(Self {
            http,
            storage,
            storage_key: storage_key.into(),
            state,
            rehydrated: Once::new(),
        });

        let weak = Arc::downgrade(&store);
        let handler: Weak<dyn AuthFailureHandler> = weak;
        store.http.set_auth_failure_handler(handler);
        store
    }

    /// Create a store and rehydrate it immediately
    pub fn open(
        http: HttpClient,
        storage: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
    ) -> Arc<Self> {
        let store = Self::new(http, storage, storage_key);
        store.rehydrate();
        store
    }

    /// Load the persisted session; runs at most once
    ///
    /// A missing or unreadable record leaves the store unauthenticated.
    pub fn rehydrate(&self) {
        self.rehydrated.call_once(|| {
            let session = self.load_persisted();
            match &session {
                Some(session) => info!("Restored session for user: {}", session.email),
                None => info!("No persisted session, starting signed out"),
            }
            self.state.send_replace(session);
        });
    }

    /// Whether rehydration is still pending
    pub fn is_loading(&self) -> bool {
        !self.rehydrated.is_completed()
    }

    /// The signed-in identity, if any
    pub fn current_session(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// Watch session changes, including forced terminations
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    /// HTTP client bound to this store
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Notifier shared with the HTTP client
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.http.notifier()
    }

    /// Register a new account and sign it in
    pub async fn sign_up(&self, credentials: &SignUpCredentials) -> ClientResult<Session> {
        info!("Registering user: {}", credentials.email);

        let photo = photo_or_default(credentials.photo.as_deref());
        let body = SignUpCredentials {
            photo: Some(photo.clone()),
            ..credentials.clone()
        };
        let response: AuthResponse = self
            .http
            .post_credentials(REGISTER_ENDPOINT, Some(&body))
            .await?;

        let session = Session {
            email: credentials.email.clone(),
            display_name: credentials.name.clone(),
            photo_url: photo,
            uid: response.user_id,
        };
        self.establish(session, "Registration successful!")
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, credentials: &LoginCredentials) -> ClientResult<Session> {
        info!("Login attempt for user: {}", credentials.email);

        let response: AuthResponse = self
            .http
            .post_credentials(LOGIN_ENDPOINT, Some(credentials))
            .await?;

        let session = Session {
            email: credentials.email.clone(),
            display_name: response.name.unwrap_or_default(),
            photo_url: photo_or_default(response.photo.as_deref()),
            uid: response.user_id,
        };
        self.establish(session, "Login successful!")
    }

    /// Sign in through the federated identity provider
    pub async fn sign_in_with_provider(&self) -> ClientResult<Session> {
        info!("Federated login attempt");

        let response: ProviderAuthResponse = self
            .http
            .post_credentials(PROVIDER_LOGIN_ENDPOINT, None::<&Value>)
            .await?;

        let session = Session {
            email: response.email,
            display_name: response.name.unwrap_or_default(),
            photo_url: photo_or_default(response.photo.as_deref()),
            uid: response.user_id,
        };
        self.establish(session, "Google login successful!")
    }

    /// Sign out remotely, then clear local state whatever the outcome
    ///
    /// The remote error, if any, is still returned after local state is gone.
    pub async fn sign_out(&self) -> ClientResult<()> {
        info!("Signing out");

        let remote: ClientResult<Value> = self.http.post_empty(LOGOUT_ENDPOINT).await;
        self.clear();

        match remote {
            Ok(_) => {
                self.notifier().success("Logout successful!");
                Ok(())
            }
            Err(e) => {
                warn!("Remote logout failed, local session cleared anyway: {}", e);
                Err(e)
            }
        }
    }

    /// Update display name and/or photo of the signed-in user
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Session> {
        if self.current_session().is_none() {
            return Err(self.reject_signed_out());
        }

        info!("Updating profile");
        let _: Value = self.http.put(UPDATE_PROFILE_ENDPOINT, update).await?;

        // The session may have been terminated while the request was in flight
        let current = self
            .current_session()
            .ok_or_else(|| self.reject_signed_out())?;

        let updated = current.merged(update);
        self.persist(&updated)?;
        self.state.send_replace(Some(updated.clone()));
        self.notifier().success("Profile updated successfully!");

        Ok(updated)
    }

    /// End the session locally without contacting the server
    ///
    /// Used when the server has already rejected the credential.
    pub fn terminate(&self) {
        if self.current_session().is_some() {
            warn!("Session terminated after authentication rejection");
        }
        self.clear();
    }

    fn establish(&self, session: Session, message: &str) -> ClientResult<Session> {
        self.persist(&session)?;
        self.state.send_replace(Some(session.clone()));
        info!("Signed in as {}", session.email);
        self.notifier().success(message);
        Ok(session)
    }

    fn persist(&self, session: &Session) -> ClientResult<()> {
        let result = serde_json::to_string(session)
            .map_err(|e| ClientError::Storage(e.to_string()))
            .and_then(|raw| self.storage.set(&self.storage_key, &raw));

        result.map_err(|e| {
            error!("Failed to persist session: {}", e);
            self.notifier().error(&e.user_message());
            e
        })
    }

    fn clear(&self) {
        if let Err(e) = self.storage.delete(&self.storage_key) {
            error!("Failed to delete persisted session: {}", e);
        }
        self.state.send_replace(None);
    }

    fn load_persisted(&self) -> Option<Session> {
        let raw = match self.storage.get(&self.storage_key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read persisted session: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Discarding malformed persisted session: {}", e);
                if let Err(e) = self.storage.delete(&self.storage_key) {
                    error!("Failed to delete malformed session: {}", e);
                }
                None
            }
        }
    }

    fn reject_signed_out(&self) -> ClientError {
        let err = ClientError::Validation("You must be signed in to update your profile".to_string());
        self.notifier().error(&err.user_message());
        err
    }
}

impl AuthFailureHandler for SessionStore {
    fn on_auth_failure(&self) {
        self.terminate();
    }
}
