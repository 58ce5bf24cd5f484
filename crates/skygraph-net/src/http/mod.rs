//! HTTP plumbing for the query client.
//!
//! This module wraps `reqwest` with the pieces the graph client composes:
//!
//! - [`QueryParams`]: ordered, repeat-key query string encoding
//! - [`HttpClient`] and [`HttpRequestBuilder`]: request construction and dispatch
//! - [`HttpResponse::error_for_status`]: status classification
//! - [`ResponseBody`]: chunked, abortable body reads
//!
//! # Example
//!
//! ```ignore
//! use skygraph_net::http::{HttpClient, QueryParams};
//!
//! let client = HttpClient::new();
//! let params = QueryParams::new().list("did", ["did:plc:a", "did:plc:b"]);
//! let response = client
//!     .get("https://graph.example/_/mutuals")
//!     .query_params(params)
//!     .send()
//!     .await?
//!     .error_for_status()
//!     .await?;
//! println!("Body: {}", response.text().await?);
//! ```

mod abort;
mod client;
mod query;
mod request;
mod response;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use query::{ParamValue, QueryParams};
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::{HttpResponse, ResponseBody, is_success_status};
