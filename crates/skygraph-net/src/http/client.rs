//! HTTP client wrapper.

use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;

use super::request::HttpRequestBuilder;
use crate::error::{NetworkError, Result};

/// Settings applied to every request a client sends.
///
/// No timeout is set by default: path searches stream for as long as the
/// server keeps finding candidates and cancellation is left to the caller's
/// abort signal.
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Whole-request timeout, `None` for unbounded.
    pub timeout: Option<Duration>,
    /// Redirect hops to follow; zero hands 3xx responses back unfollowed.
    pub max_redirects: usize,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            max_redirects: 10,
            user_agent: format!("skygraph/{} (Rust)", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for an [`HttpClient`].
#[derive(Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    default_headers: http::HeaderMap,
}

impl HttpClientBuilder {
    /// Start from [`HttpClientConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every request to `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Follow at most `max` redirects. Zero disables following.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Send `name: value` with every request.
    pub fn default_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Result<Self> {
        let name = name
            .try_into()
            .map_err(|_| NetworkError::InvalidHeader("invalid header name".to_string()))?;
        let value = value
            .try_into()
            .map_err(|_| NetworkError::InvalidHeader("invalid header value".to_string()))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// The configuration built so far.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn build(self) -> Result<HttpClient> {
        let redirect = match self.config.max_redirects {
            0 => Policy::none(),
            max => Policy::limited(max),
        };
        let mut builder = reqwest::Client::builder()
            .redirect(redirect)
            .user_agent(self.config.user_agent.as_str())
            .default_headers(self.default_headers);
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpClient {
            inner: Arc::new(HttpClientInner {
                client: builder.build()?,
                config: self.config,
            }),
        })
    }
}

struct HttpClientInner {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// A cheaply cloneable HTTP client.
///
/// Clones share the same connection pool and configuration, so one client
/// can serve every concurrent chunk request of a fan-out.
///
/// # Example
///
/// ```ignore
/// use skygraph_net::http::HttpClient;
///
/// let client = HttpClient::new();
/// let response = client
///     .get("https://graph.example/_/mutuals")
///     .query("did", "did:plc:abc")
///     .send()
///     .await?
///     .error_for_status()
///     .await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default configuration.
    pub fn new() -> Self {
        HttpClientBuilder::new()
            .build()
            .expect("Failed to create HTTP client with default configuration")
    }

    /// Create a builder for configuring a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Get the client's configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.inner.config
    }

    /// Start a GET request to `url`.
    ///
    /// The query service only serves GET, so this is the one entry point.
    pub fn get(&self, url: impl AsRef<str>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(self.clone(), url.as_ref().to_string())
    }

    pub(crate) fn reqwest_client(&self) -> &reqwest::Client {
        &self.inner.client
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
