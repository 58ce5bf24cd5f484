//! HTTP request types and builder.

use std::time::Duration;

use skygraph_core::AbortSignal;
use skygraph_core::logging::targets;

use super::abort::abortable;
use super::client::HttpClient;
use super::query::QueryParams;
use super::response::HttpResponse;
use crate::error::Result;

/// A built GET request ready to be sent.
#[derive(Debug)]
pub struct HttpRequest {
    /// The request URL, without query parameters.
    pub url: String,
    /// Request headers.
    pub headers: http::HeaderMap,
    /// Query parameters.
    pub query: QueryParams,
    /// Request timeout override.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// The request URL with the encoded query appended.
    pub fn full_url(&self) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.url)?;
        let encoded = self.query.encode();
        if !encoded.is_empty() {
            url.set_query(Some(&encoded));
        }
        Ok(url)
    }
}

/// Builder for constructing HTTP requests.
pub struct HttpRequestBuilder {
    client: HttpClient,
    url: String,
    headers: http::HeaderMap,
    query: QueryParams,
    timeout: Option<Duration>,
    signal: Option<AbortSignal>,
}

impl HttpRequestBuilder {
    pub(crate) fn new(client: HttpClient, url: String) -> Self {
        Self {
            client,
            url,
            headers: http::HeaderMap::new(),
            query: QueryParams::new(),
            timeout: None,
            signal: None,
        }
    }

    /// Add a header to the request.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Append a query parameter value.
    ///
    /// Calling this twice with the same key produces a repeated key.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query = self.query.append(key, value);
        self
    }

    /// Replace all query parameters.
    pub fn query_params(mut self, params: QueryParams) -> Self {
        self.query = params;
        self
    }

    /// Set a timeout for this specific request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abort the request, and any body read on its response, when `signal` fires.
    pub fn abort_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Build the request without sending it.
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            url: self.url,
            headers: self.headers,
            query: self.query,
            timeout: self.timeout,
        }
    }

    /// Send the request and wait for the response head.
    pub async fn send(self) -> Result<HttpResponse> {
        let client = self.client.clone();
        let signal = self.signal.clone();
        let request = self.build();

        let url = request.full_url()?;
        tracing::debug!(target: targets::HTTP, url = %url, "sending request");

        let mut req_builder = client.reqwest_client().get(url);

        for (name, value) in request.headers.iter() {
            req_builder = req_builder.header(name, value);
        }

        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        let response = abortable(signal.as_ref(), async move {
            Ok(req_builder.send().await?)
        })
        .await?;
        Ok(HttpResponse::from_reqwest(response, signal))
    }
}
