//! Unary and streaming call executors.
//!
//! A [`Transport`] binds an [`HttpClient`] to the service's base address and
//! turns an [`Endpoint`] plus [`QueryParams`] into either one decoded JSON
//! document ([`Transport::call`]) or a lazy [`NdjsonStream`]
//! ([`Transport::stream`]). Both classify the response status before
//! touching the body.

mod endpoint;
mod ndjson;

pub use endpoint::{Endpoint, ResponseShape};
pub use ndjson::{LineDecoder, NdjsonStream};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use skygraph_core::AbortSignal;
use skygraph_core::logging::{span_names, targets};
use tracing::Instrument;

use crate::error::Result;
use crate::http::{HttpClient, HttpResponse, QueryParams};

/// Issues requests against `<base>/_/<endpoint>`.
///
/// Cloning is cheap. A clone made with [`Transport::with_abort_signal`] aborts
/// every request and body read it performs once the signal fires.
#[derive(Clone, Debug)]
pub struct Transport {
    http: HttpClient,
    base_url: Arc<str>,
    signal: Option<AbortSignal>,
}

impl Transport {
    /// Create a transport for the service at `base_url`.
    ///
    /// The URL must be absolute; a trailing `/` is ignored.
    pub fn new(http: HttpClient, base_url: impl AsRef<str>) -> Result<Self> {
        let trimmed = base_url.as_ref().trim_end_matches('/');
        url::Url::parse(trimmed)?;
        Ok(Self {
            http,
            base_url: Arc::from(trimmed),
            signal: None,
        })
    }

    /// A copy of this transport whose calls observe `signal`.
    pub fn with_abort_signal(&self, signal: AbortSignal) -> Self {
        Self {
            signal: Some(signal),
            ..self.clone()
        }
    }

    /// The service base address, without a trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The abort signal bound to this transport, if any.
    pub fn abort_signal(&self) -> Option<&AbortSignal> {
        self.signal.as_ref()
    }

    /// The HTTP client requests go through.
    pub fn http_client(&self) -> &HttpClient {
        &self.http
    }

    /// The URL for `endpoint`, without query parameters.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Issue the request and classify its status.
    async fn dispatch(&self, endpoint: Endpoint, params: QueryParams) -> Result<HttpResponse> {
        let mut request = self.http.get(self.endpoint_url(endpoint)).query_params(params);
        if let Some(signal) = &self.signal {
            request = request.abort_signal(signal.clone());
        }

        let response = request.send().await?;
        tracing::debug!(
            target: targets::TRANSPORT,
            endpoint = endpoint.name(),
            status = response.status(),
            "response received"
        );
        response.error_for_status().await
    }

    /// Unary executor: decode the whole body as one JSON document.
    pub async fn call<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: QueryParams,
    ) -> Result<R> {
        debug_assert_eq!(endpoint.shape(), ResponseShape::Unary, "{endpoint} streams");
        let span = tracing::debug_span!(
            target: targets::TRANSPORT,
            span_names::REQUEST,
            endpoint = endpoint.name()
        );
        async move {
            let response = self.dispatch(endpoint, params).await?;
            response.json().await
        }
        .instrument(span)
        .await
    }

    /// Streaming executor: decode the body as NDJSON records, one per pull.
    ///
    /// Resolves once the response head has been classified; the body is read
    /// lazily as records are requested.
    pub async fn stream<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: QueryParams,
    ) -> Result<NdjsonStream<R>> {
        debug_assert_eq!(endpoint.shape(), ResponseShape::Stream, "{endpoint} is unary");
        let span = tracing::debug_span!(
            target: targets::TRANSPORT,
            span_names::STREAM,
            endpoint = endpoint.name()
        );
        async move {
            let response = self.dispatch(endpoint, params).await?;
            Ok(NdjsonStream::new(response.into_body()))
        }
        .instrument(span)
        .await
    }
}
