//! HTTP client for the gateway.
//!
//! The gateway exposes three paths the console cares about:
//! - `GET /user`: current profile, or `error: true` when anonymous
//! - `GET /logout`: clears the server-side session, answers `{ "ok": bool }`
//! - `/login/<provider>`: browser-facing OAuth entry point, never fetched here

pub mod types;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

pub use types::{LogoutResponse, UserDocument};

/// Builds the browser-facing login URL for a provider.
pub fn login_url(base_url: &str, provider: &str) -> String {
    format!("{}/login/{}", base_url.trim_end_matches('/'), provider)
}

/// Categories of gateway errors for consistent error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Could not reach the gateway (DNS, refused connection, TLS)
    Connect,
    /// Connection or request timeout
    Timeout,
    /// HTTP status error (4xx, 5xx)
    Status,
    /// Response body was not the expected JSON shape
    Decode,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Connect => write!(f, "connect"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Status => write!(f, "status"),
            ApiErrorKind::Decode => write!(f, "decode"),
        }
    }
}

/// Structured gateway error with kind and details.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw response body)
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new gateway error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an HTTP status error, pulling a message out of a JSON body
    /// when the gateway supplies one.
    pub fn status(status: u16, body: &str) -> Self {
        let mut message = format!("HTTP {}", status);
        if let Ok(json) = serde_json::from_str::<Value>(body)
            && let Some(msg) = json.get("message").and_then(|v| v.as_str())
        {
            message = format!("HTTP {}: {}", status, msg);
        }
        Self {
            kind: ApiErrorKind::Status,
            message,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Gateway HTTP client.
pub struct ConsoleClient {
    base_url: String,
    http: reqwest::Client,
}

impl ConsoleClient {
    /// Creates a new client for the given base URL.
    ///
    /// A trailing slash on the base URL is tolerated and stripped.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Returns the base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the browser-facing login URL for a provider.
    pub fn login_url(&self, provider: &str) -> String {
        login_url(&self.base_url, provider)
    }

    /// Fetches the current user profile from `GET /user`.
    ///
    /// A successful response is returned verbatim, whether or not it
    /// describes a logged-in user; callers apply `UserDocument::is_logged_in`.
    pub async fn fetch_user(&self) -> Result<UserDocument, ApiError> {
        self.get_json("user").await
    }

    /// Clears the server-side session via `GET /logout`.
    pub async fn logout(&self) -> Result<LogoutResponse, ApiError> {
        self.get_json("logout").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "gateway request");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(Self::classify_reqwest_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(Self::classify_reqwest_error)?;

        if !status.is_success() {
            return Err(ApiError::status(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::decode(format!("unexpected response body: {}", e)))
    }

    /// Classifies a reqwest error into an ApiError.
    fn classify_reqwest_error(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::new(ApiErrorKind::Timeout, format!("request timed out: {}", e))
        } else if e.is_connect() {
            ApiError::new(
                ApiErrorKind::Connect,
                format!("could not reach the gateway: {}", e),
            )
        } else {
            ApiError::new(ApiErrorKind::Connect, e.to_string())
        }
    }
}
