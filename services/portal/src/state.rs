//! Application state shared across views

use std::sync::Arc;

use auth::SessionStore;
use common::{
    config::ClientConfig,
    error::ClientResult,
    http::HttpClient,
    notify::Notifier,
    storage::{FileStore, KeyValueStore},
};
use tracing::info;

use crate::repositories::{VisaRepository, application::ApplicationRepository};

/// Application state shared across views
#[derive(Clone)]
pub struct AppState {
    pub session_store: Arc<SessionStore>,
    pub visa_repository: VisaRepository,
    pub application_repository: ApplicationRepository,
}

impl AppState {
    /// Wire the session store and repositories over one HTTP client
    ///
    /// The session is rehydrated before this returns.
    pub fn new(http: HttpClient, storage: Arc<dyn KeyValueStore>, storage_key: &str) -> Self {
        let visa_repository = VisaRepository::new(http.clone());
        let application_repository = ApplicationRepository::new(http.clone());
        let session_store = SessionStore::open(http, storage, storage_key);

        Self {
            session_store,
            visa_repository,
            application_repository,
        }
    }

    /// Build the state from configuration, persisting the session on disk
    pub fn from_config(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> ClientResult<Self> {
        let state_dir = config.resolve_state_dir()?;
        info!("Using state directory {}", state_dir.display());
        let storage = FileStore::open(state_dir)?;

        let http = HttpClient::new(config, notifier)?;
        Ok(Self::new(http, Arc::new(storage), &config.storage_key))
    }

    /// Notifier shared by every component
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.session_store.notifier()
    }
}
