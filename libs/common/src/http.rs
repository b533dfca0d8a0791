//! HTTP client for the remote visa API
//!
//! Every request goes through [`HttpClient::request`], which applies default
//! headers, enforces the configured timeout and classifies failures. Each
//! failure emits exactly one notification before the error is returned, and
//! 401/403 responses additionally fire the registered auth-failure handler.

use std::sync::{Arc, RwLock, Weak};

use reqwest::{
    Method, StatusCode, Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult},
    notify::Notifier,
};

/// Build `prefix/segment/...` with every segment percent-encoded
///
/// Ids and emails go through here so a `/`, `?`, `#` or `%` inside them
/// stays part of one path segment.
pub fn endpoint(prefix: &str, segments: &[&str]) -> String {
    let Ok(mut url) = Url::parse("http://localhost") else {
        return prefix.to_string();
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear()
            .extend(prefix.split('/').filter(|part| !part.is_empty()))
            .extend(segments.iter().copied());
    }
    url.path().to_string()
}

/// Receives authentication rejections (401/403) from the HTTP client
pub trait AuthFailureHandler: Send + Sync {
    fn on_auth_failure(&self);
}

/// Shared HTTP client; clones share one connection pool and one handler slot
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<Inner>,
}

struct Inner {
    client: reqwest::Client,
    base_url: String,
    notifier: Arc<dyn Notifier>,
    auth_failure: RwLock<Option<Weak<dyn AuthFailureHandler>>>,
}

/// What a 401/403 response does to the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthRecovery {
    Terminate,
    Skip,
}

/// Error body shapes returned by the API
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl HttpClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
                notifier,
                auth_failure: RwLock::new(None),
            }),
        })
    }

    /// Base URL endpoints are appended to
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Notifier used for failure messages
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.inner.notifier.clone()
    }

    /// Register the handler fired on 401/403 responses
    ///
    /// Held weakly: the handler usually owns this client.
    pub fn set_auth_failure_handler(&self, handler: Weak<dyn AuthFailureHandler>) {
        if let Ok(mut slot) = self.inner.auth_failure.write() {
            *slot = Some(handler);
        }
    }

    /// Send a request and return the parsed JSON body
    ///
    /// `headers` are merged over the defaults; the caller's value wins on
    /// conflict. An empty success body is returned as `Value::Null`.
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        headers: Option<HeaderMap>,
    ) -> ClientResult<Value> {
        self.send(endpoint, method, body, headers, AuthRecovery::Terminate)
            .await
    }

    async fn send(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        headers: Option<HeaderMap>,
        recovery: AuthRecovery,
    ) -> ClientResult<Value> {
        let url = format!("{}{}", self.inner.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut request_headers = default_headers();
        if let Some(overrides) = headers {
            request_headers.extend(overrides);
        }

        let mut builder = self
            .inner
            .client
            .request(method.clone(), &url)
            .headers(request_headers);
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.fail(ClientError::Transport(e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.fail(ClientError::Transport(e)))?;

        if !status.is_success() {
            let message = error_message(status, &bytes);

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                warn!("{} {} rejected credentials ({})", method, endpoint, status);
                if recovery == AuthRecovery::Terminate {
                    self.terminate_session();
                }
                return Err(self.fail(ClientError::Auth {
                    status: status.as_u16(),
                    message,
                }));
            }

            return Err(self.fail(ClientError::Protocol {
                status: status.as_u16(),
                message,
            }));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| self.fail(ClientError::Decode(e)))
    }

    /// GET `endpoint` and decode the body
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        let value = self.request(endpoint, Method::GET, None, None).await?;
        self.decode(value)
    }

    /// POST `body` as JSON to `endpoint` and decode the response
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.encode(body)?;
        let value = self.request(endpoint, Method::POST, Some(&body), None).await?;
        self.decode(value)
    }

    /// POST to `endpoint` without a body and decode the response
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        let value = self.request(endpoint, Method::POST, None, None).await?;
        self.decode(value)
    }

    /// POST credentials to an identity endpoint and decode the response
    ///
    /// A 401/403 here rejects the submitted credentials, not the current
    /// session, so the auth-failure handler is not fired.
    pub async fn post_credentials<B, T>(&self, endpoint: &str, body: Option<&B>) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body.map(|body| self.encode(body)).transpose()?;
        let value = self
            .send(
                endpoint,
                Method::POST,
                body.as_ref(),
                None,
                AuthRecovery::Skip,
            )
            .await?;
        self.decode(value)
    }

    /// PUT `body` as JSON to `endpoint` and decode the response
    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.encode(body)?;
        let value = self.request(endpoint, Method::PUT, Some(&body), None).await?;
        self.decode(value)
    }

    /// DELETE `endpoint` and decode the response
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        let value = self.request(endpoint, Method::DELETE, None, None).await?;
        self.decode(value)
    }

    fn encode<B: Serialize + ?Sized>(&self, body: &B) -> ClientResult<Value> {
        serde_json::to_value(body).map_err(|e| self.fail(ClientError::Decode(e)))
    }

    fn decode<T: DeserializeOwned>(&self, value: Value) -> ClientResult<T> {
        serde_json::from_value(value).map_err(|e| self.fail(ClientError::Decode(e)))
    }

    /// Log and notify a failure, handing the error back to the caller
    fn fail(&self, err: ClientError) -> ClientError {
        error!("Request failed: {}", err);
        self.inner.notifier.error(&err.user_message());
        err
    }

    fn terminate_session(&self) {
        let handler = self
            .inner
            .auth_failure
            .read()
            .ok()
            .and_then(|slot| slot.as_ref().and_then(Weak::upgrade));

        match handler {
            Some(handler) => handler.on_auth_failure(),
            None => debug!("No auth failure handler registered"),
        }
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Human-readable message for a failed response
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        })
}
