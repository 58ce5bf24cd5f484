//! Query client for a social-graph service.
//!
//! This crate talks to a graph query service over HTTP:
//!
//! - **HTTP layer** ([`http`]): query encoding, dispatch, status classification
//! - **Transport** ([`transport`]): unary JSON and NDJSON streaming executors
//! - **Graph client** ([`graph`]): identity lookup, neighborhoods, aliases,
//!   mutuals and path search
//!
//! # Example
//!
//! ```ignore
//! use skygraph_net::graph::GraphClient;
//!
//! let client = GraphClient::new("https://graph.example")?;
//! let mutuals = client.mutuals_between("did:plc:alice", "did:plc:bob").await?;
//! let handles = client.akas(&mutuals).await?;
//! ```
//!
//! # Cancellation
//!
//! Bind an [`AbortSignal`](skygraph_core::AbortSignal) with
//! [`GraphClient::with_abort_signal`](graph::GraphClient::with_abort_signal).
//! Firing it aborts pending requests and body reads with
//! [`NetworkError::Aborted`].

pub mod error;
pub mod graph;
pub mod http;
pub mod transport;

pub use error::{NetworkError, Result};
pub use graph::{
    ActorIdentity, AliasMap, GraphClient, GraphClientBuilder, IdentityMap, Neighborhood,
    NeighborhoodQuery, Path, PathQuery, PathStream,
};
pub use http::{HttpClient, HttpClientBuilder, HttpClientConfig, ParamValue, QueryParams};
pub use transport::{Endpoint, NdjsonStream, ResponseShape, Transport};
