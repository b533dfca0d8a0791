//! Common library for the Visa Portal client
//!
//! This crate provides functionality shared by the session store and the
//! portal views: the HTTP client for the remote API, error handling,
//! configuration, persisted client state and user notifications.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use common::{config::ClientConfig, http::HttpClient, notify::TracingNotifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let client = HttpClient::new(&config, Arc::new(TracingNotifier))?;
//!     let visas: serde_json::Value = client.get("/visas").await?;
//!     println!("{}", visas);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod storage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
