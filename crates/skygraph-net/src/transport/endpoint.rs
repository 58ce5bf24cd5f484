//! Endpoint descriptors.

use std::fmt;

/// How an endpoint frames its response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseShape {
    /// One JSON document.
    Unary,
    /// Newline-delimited JSON records.
    Stream,
}

/// A server endpoint and the shape of its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    name: &'static str,
    shape: ResponseShape,
}

impl Endpoint {
    /// Identity lookup by handle.
    pub const WHOIS: Self = Self::unary("whois");
    /// Induced subgraph around seed dids.
    pub const NEIGHBORHOOD: Self = Self::unary("neighborhood");
    /// Also-known-as handles per did.
    pub const AKAS: Self = Self::unary("akas");
    /// Mutual connections of the given dids.
    pub const MUTUALS: Self = Self::unary("mutuals");
    /// Actors with edges pointing at the given dids.
    pub const INCOMING: Self = Self::unary("incoming");
    /// Candidate paths between two dids, streamed.
    pub const PATHS: Self = Self::stream("paths");

    /// An endpoint answering with one JSON document.
    pub const fn unary(name: &'static str) -> Self {
        Self {
            name,
            shape: ResponseShape::Unary,
        }
    }

    /// An endpoint answering with NDJSON records.
    pub const fn stream(name: &'static str) -> Self {
        Self {
            name,
            shape: ResponseShape::Stream,
        }
    }

    /// The endpoint name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The response shape.
    pub const fn shape(&self) -> ResponseShape {
        self.shape
    }

    /// The request path, `/_/<name>`.
    pub fn path(&self) -> String {
        format!("/_/{}", self.name)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
