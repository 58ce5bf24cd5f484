//! The public query API.
//!
//! [`GraphClient`] exposes one operation per server capability:
//!
//! | Operation | Endpoint | Shape |
//! |-----------|----------|-------|
//! | [`GraphClient::whois`] | `whois` | unary |
//! | [`GraphClient::neighborhood`] | `neighborhood` | unary |
//! | [`GraphClient::akas`] | `akas` | unary, chunked fan-out |
//! | [`GraphClient::mutuals`] | `mutuals` | unary |
//! | [`GraphClient::incoming`] | `incoming` | unary |
//! | [`GraphClient::paths`] | `paths` | NDJSON stream |

mod batch;
mod client;
mod types;

pub use client::{DEFAULT_AKAS_CHUNK_SIZE, GraphClient, GraphClientBuilder, PathStream};
pub use types::{
    ActorIdentity, AliasMap, IdentityMap, Neighborhood, NeighborhoodQuery, Path, PathQuery,
};
