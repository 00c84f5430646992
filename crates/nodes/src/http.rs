//! The HTTP helper the host lends to nodes.
//!
//! Nodes describe a request as [`HttpRequestOptions`] and hand it to an
//! [`HttpHelper`]; the host decides how it is sent.  [`ReqwestHelper`] is the
//! production implementation, [`crate::mock::MockHttpHelper`] the test double.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Request description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-formed outbound request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpRequestOptions {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    /// Decode the response body as JSON.
    pub json: bool,
}

impl HttpRequestOptions {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            json: true,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// The request never produced a response (connect failure or timeout).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: u16,
        /// Decoded response body, when it was JSON.
        body: Option<Value>,
    },

    #[error("response from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            HttpError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Helper trait
// ---------------------------------------------------------------------------

/// Sends a request on behalf of a node and returns the decoded body.
#[async_trait]
pub trait HttpHelper: Send + Sync {
    async fn request(&self, options: HttpRequestOptions) -> Result<Value, HttpError>;
}

// ---------------------------------------------------------------------------
// reqwest implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HttpHelperConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpHelperConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// [`HttpHelper`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestHelper {
    client: reqwest::Client,
}

impl ReqwestHelper {
    pub fn new(config: &HttpHelperConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpHelper for ReqwestHelper {
    async fn request(&self, options: HttpRequestOptions) -> Result<Value, HttpError> {
        debug!(method = %options.method, url = %options.url, "sending request");

        let mut builder = self
            .client
            .request(to_reqwest_method(options.method), options.url.as_str());
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| HttpError::Transport {
            url: options.url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| HttpError::Transport {
            url: options.url.clone(),
            message: e.to_string(),
        })?;

        debug!(status = status.as_u16(), bytes = text.len(), "response received");

        if !status.is_success() {
            return Err(HttpError::Status {
                url: options.url,
                status: status.as_u16(),
                body: serde_json::from_str(&text).ok(),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        if !options.json {
            return Ok(Value::String(text));
        }
        serde_json::from_str(&text).map_err(|e| HttpError::Decode {
            url: options.url,
            message: e.to_string(),
        })
    }
}
