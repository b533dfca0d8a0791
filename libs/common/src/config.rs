//! Client configuration
//!
//! Settings are layered with the `config` crate: built-in defaults first, then
//! environment variables prefixed with `VISA_PORTAL_`.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Base URL of the hosted visa API
pub const DEFAULT_API_BASE_URL: &str = "https://visa-navigator-server-beta-dun.vercel.app";

/// Request timeout applied to every call, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Storage key under which the session record is persisted
pub const DEFAULT_STORAGE_KEY: &str = "user";

const ENV_PREFIX: &str = "VISA_PORTAL";

/// Client configuration struct
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL every endpoint is appended to
    pub api_base_url: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Directory holding persisted client state
    pub state_dir: Option<PathBuf>,
    /// Storage key for the session record
    pub storage_key: String,
}

impl ClientConfig {
    /// Create a new ClientConfig from defaults and environment variables
    ///
    /// # Environment Variables
    /// - `VISA_PORTAL_API_BASE_URL`: API base URL (default: the hosted server)
    /// - `VISA_PORTAL_REQUEST_TIMEOUT_SECS`: request timeout (default: 10)
    /// - `VISA_PORTAL_STATE_DIR`: state directory (default: `<data dir>/visa-portal`)
    /// - `VISA_PORTAL_STORAGE_KEY`: session storage key (default: "user")
    pub fn from_env() -> ClientResult<Self> {
        let settings = config::Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .set_default("storage_key", DEFAULT_STORAGE_KEY)?
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration pointing at an explicit base URL, with every other value defaulted
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            state_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Directory for persisted state, falling back to the platform data directory
    pub fn resolve_state_dir(&self) -> ClientResult<PathBuf> {
        if let Some(dir) = &self.state_dir {
            return Ok(dir.clone());
        }

        dirs::data_dir()
            .map(|dir| dir.join("visa-portal"))
            .ok_or_else(|| {
                ClientError::Configuration("Could not determine a data directory".to_string())
            })
    }

    fn validate(&self) -> ClientResult<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ClientError::Configuration(format!(
                "Invalid API base URL: {}",
                self.api_base_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ClientError::Configuration(
                "Request timeout must be at least one second".to_string(),
            ));
        }

        if self.storage_key.trim().is_empty() {
            return Err(ClientError::Configuration(
                "Storage key must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
