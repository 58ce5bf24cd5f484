//! Request and response types for the graph endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::http::QueryParams;

/// The resolved identity of one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    /// The actor's decentralized identifier.
    pub did: String,
    /// Handles the actor is also known as, in server order.
    #[serde(rename = "alsoKnownAs", default)]
    pub also_known_as: Vec<String>,
}

impl ActorIdentity {
    /// The first also-known-as handle, if any.
    pub fn primary_handle(&self) -> Option<&str> {
        self.also_known_as.first().map(String::as_str)
    }
}

/// Identities keyed by the handle that was looked up.
pub type IdentityMap = HashMap<String, ActorIdentity>;

/// Alias handles keyed by did.
pub type AliasMap = HashMap<String, Vec<String>>;

/// One path from source to target, both inclusive.
pub type Path = Vec<String>;

/// The induced subgraph around a set of seed dids.
///
/// Edge indices refer to positions in `nodes` and are only meaningful
/// within the response they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    /// Node identifiers.
    #[serde(rename = "n")]
    pub nodes: Vec<String>,
    /// Edges as index pairs into `nodes`.
    #[serde(rename = "e")]
    pub edges: Vec<Vec<usize>>,
    /// Server-defined count or timestamp.
    #[serde(default)]
    pub t: i64,
}

impl Neighborhood {
    /// The node at `index`.
    pub fn node(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(String::as_str)
    }

    /// The endpoints of edge `index`, resolved to node identifiers.
    ///
    /// `None` if the edge does not exist, is not a pair, or points outside `nodes`.
    pub fn edge(&self, index: usize) -> Option<(&str, &str)> {
        match self.edges.get(index)?.as_slice() {
            [from, to] => Some((self.node(*from)?, self.node(*to)?)),
            _ => None,
        }
    }

    /// True if every edge is a pair of in-range indices.
    pub fn is_consistent(&self) -> bool {
        (0..self.edges.len()).all(|index| self.edge(index).is_some())
    }
}

/// Parameters for a neighborhood query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborhoodQuery {
    /// Seed dids.
    pub dids: Vec<String>,
    /// Dids to leave out of the graph.
    pub ignore_dids: Vec<String>,
}

impl NeighborhoodQuery {
    /// Query around the given seeds.
    pub fn new<I, S>(dids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dids: dids.into_iter().map(Into::into).collect(),
            ignore_dids: Vec::new(),
        }
    }

    /// Exclude the given dids.
    pub fn ignore<I, S>(mut self, dids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_dids.extend(dids.into_iter().map(Into::into));
        self
    }

    pub(crate) fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .list("did", self.dids.iter().map(String::as_str))
            .list("ignoreDid", self.ignore_dids.iter().map(String::as_str))
    }
}

/// Parameters for a path search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    /// Where paths start.
    pub source_did: String,
    /// Where paths end.
    pub target_did: String,
    /// Dids no path may pass through.
    pub ignore_dids: Vec<String>,
    /// Cap on the mutuals explored per hop.
    pub max_mutuals: Option<u32>,
}

impl PathQuery {
    /// Search for paths from `source_did` to `target_did`.
    pub fn new(source_did: impl Into<String>, target_did: impl Into<String>) -> Self {
        Self {
            source_did: source_did.into(),
            target_did: target_did.into(),
            ignore_dids: Vec::new(),
            max_mutuals: None,
        }
    }

    /// Exclude the given dids.
    pub fn ignore<I, S>(mut self, dids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_dids.extend(dids.into_iter().map(Into::into));
        self
    }

    /// Limit the mutuals explored per hop.
    pub fn max_mutuals(mut self, max: u32) -> Self {
        self.max_mutuals = Some(max);
        self
    }

    pub(crate) fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .single("sourceDid", self.source_did.as_str())
            .single("targetDid", self.target_did.as_str())
            .list("ignoreDid", self.ignore_dids.iter().map(String::as_str))
            .optional("maxMutuals", self.max_mutuals.map(|max| max.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WhoisResponse {
    pub(crate) whois: IdentityMap,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AkasResponse {
    pub(crate) akas: AliasMap,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MutualsResponse {
    pub(crate) mutuals: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IncomingResponse {
    pub(crate) incoming: Vec<String>,
}
