//! HTTP response types and status classification.

use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::{BoxStream, Stream};
use serde::de::DeserializeOwned;
use skygraph_core::AbortSignal;
use skygraph_core::logging::targets;

use super::abort::abortable;
use crate::error::{NetworkError, Result};

/// True if `status` counts as success: anything in `200..=399`.
///
/// Redirects are followed by the client, so a 3xx only reaches this check
/// when redirect following is disabled or exhausted.
pub fn is_success_status(status: u16) -> bool {
    (200..400).contains(&status)
}

/// An HTTP response from a request.
///
/// Body reads honour the abort signal the request was sent with.
pub struct HttpResponse {
    inner: reqwest::Response,
    signal: Option<AbortSignal>,
}

impl HttpResponse {
    pub(crate) fn from_reqwest(response: reqwest::Response, signal: Option<AbortSignal>) -> Self {
        Self {
            inner: response,
            signal,
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Check if the status is in the success range, see [`is_success_status`].
    pub fn is_success(&self) -> bool {
        is_success_status(self.status())
    }

    /// Get the response headers.
    pub fn headers(&self) -> &http::HeaderMap {
        self.inner.headers()
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.inner
            .headers()
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header value.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the Content-Length header value.
    pub fn content_length(&self) -> Option<u64> {
        self.inner.content_length()
    }

    /// Get the final URL after redirects.
    pub fn url(&self) -> &str {
        self.inner.url().as_str()
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Get the response body as raw bytes.
    pub async fn bytes(self) -> Result<Bytes> {
        let Self { inner, signal } = self;
        abortable(signal.as_ref(), async move { Ok(inner.bytes().await?) }).await
    }

    /// Decode the whole response body as one JSON document.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Turn the response into a chunked body reader.
    pub fn into_body(self) -> ResponseBody {
        let total_size = self.inner.content_length();
        ResponseBody {
            inner: ResponseBodyInner::Response(self.inner),
            signal: self.signal,
            total_size,
            bytes_received: 0,
            finished: false,
        }
    }

    /// Pass the response through if its status is a success, otherwise fail
    /// with [`NetworkError::RequestFailed`].
    ///
    /// The body is only read on failure, where it is captured as text for the
    /// error. An unreadable body is recorded as empty.
    pub async fn error_for_status(self) -> Result<Self> {
        let status = self.status();
        if self.is_success() {
            return Ok(self);
        }

        let url = self.url().to_string();
        let body = match self.text().await {
            Ok(body) => body,
            Err(err @ NetworkError::Aborted(_)) => return Err(err),
            Err(_) => String::new(),
        };
        tracing::warn!(target: targets::HTTP, status, url = %url, "request failed");
        Err(NetworkError::RequestFailed { status, body })
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status())
            .field("url", &self.url())
            .finish()
    }
}

enum ResponseBodyInner {
    Response(reqwest::Response),
    Chunks(BoxStream<'static, Result<Bytes>>),
}

/// A response body read chunk by chunk.
///
/// Each read is raced against the abort signal. Once the body has ended,
/// failed or been aborted, further reads return `Ok(None)` without touching
/// the network.
pub struct ResponseBody {
    inner: ResponseBodyInner,
    signal: Option<AbortSignal>,
    total_size: Option<u64>,
    bytes_received: u64,
    finished: bool,
}

impl ResponseBody {
    /// Build a body from an arbitrary chunk stream.
    pub fn from_stream<S>(stream: S, signal: Option<AbortSignal>) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: ResponseBodyInner::Chunks(stream.boxed()),
            signal,
            total_size: None,
            bytes_received: 0,
            finished: false,
        }
    }

    /// Get the total size of the response, if known.
    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }

    /// Get the number of bytes received so far.
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// True once the body has ended, failed or been aborted.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Read the next chunk of data.
    ///
    /// Returns `None` when the stream is complete.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.finished {
            return Ok(None);
        }

        let inner = &mut self.inner;
        let read = abortable(self.signal.as_ref(), async move {
            match inner {
                ResponseBodyInner::Response(response) => Ok(response.chunk().await?),
                ResponseBodyInner::Chunks(stream) => stream.next().await.transpose(),
            }
        })
        .await;

        match read {
            Ok(Some(chunk)) => {
                self.bytes_received += chunk.len() as u64;
                Ok(Some(chunk))
            }
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Err(err) => {
                self.finished = true;
                Err(err)
            }
        }
    }

    /// Collect all remaining chunks into a single buffer.
    pub async fn collect(mut self) -> Result<Bytes> {
        let mut buffer = Vec::new();
        while let Some(chunk) = self.next_chunk().await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(buffer))
    }
}
