//! Graph query client implementation.

use skygraph_core::AbortSignal;
use skygraph_core::logging::{span_names, targets};
use tracing::Instrument;

use super::batch;
use super::types::{
    ActorIdentity, AkasResponse, AliasMap, IdentityMap, IncomingResponse, MutualsResponse,
    Neighborhood, NeighborhoodQuery, Path, PathQuery, WhoisResponse,
};
use crate::error::Result;
use crate::http::{HttpClient, HttpClientBuilder, QueryParams};
use crate::transport::{Endpoint, NdjsonStream, Transport};

/// Maximum number of dids sent in one `akas` request.
pub const DEFAULT_AKAS_CHUNK_SIZE: usize = 100;

/// A stream of candidate paths.
pub type PathStream = NdjsonStream<Path>;

/// Builder for creating a graph query client.
pub struct GraphClientBuilder {
    base_url: String,
    http_client: Option<HttpClient>,
    http_client_builder: Option<HttpClientBuilder>,
    user_agent: Option<String>,
    akas_chunk_size: usize,
    abort_signal: Option<AbortSignal>,
}

impl GraphClientBuilder {
    /// Create a new builder for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client: None,
            http_client_builder: None,
            user_agent: None,
            akas_chunk_size: DEFAULT_AKAS_CHUNK_SIZE,
            abort_signal: None,
        }
    }

    /// Use an existing HTTP client.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Use a custom HTTP client builder.
    pub fn http_client_builder(mut self, builder: HttpClientBuilder) -> Self {
        self.http_client_builder = Some(builder);
        self
    }

    /// Set the user agent. Ignored when an existing client is supplied.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set how many dids go into one `akas` request. Zero is treated as one.
    pub fn akas_chunk_size(mut self, size: usize) -> Self {
        self.akas_chunk_size = size.max(1);
        self
    }

    /// Abort every call made through the client once `signal` fires.
    pub fn abort_signal(mut self, signal: AbortSignal) -> Self {
        self.abort_signal = Some(signal);
        self
    }

    /// Build the graph query client.
    pub fn build(self) -> Result<GraphClient> {
        let http_client = if let Some(client) = self.http_client {
            client
        } else {
            let mut builder = self.http_client_builder.unwrap_or_default();
            if let Some(user_agent) = self.user_agent {
                builder = builder.user_agent(user_agent);
            }
            builder.build()?
        };

        let mut transport = Transport::new(http_client, &self.base_url)?;
        if let Some(signal) = self.abort_signal {
            transport = transport.with_abort_signal(signal);
        }

        Ok(GraphClient {
            transport,
            akas_chunk_size: self.akas_chunk_size,
        })
    }
}

/// Client for the social-graph query service.
///
/// Every operation is an independent request/response cycle; the client
/// holds no per-call state and is cheap to clone.
///
/// # Example
///
/// ```ignore
/// use skygraph_net::graph::{GraphClient, PathQuery};
///
/// let client = GraphClient::new("https://graph.example")?;
///
/// let found = client.whois(&["alice.test", "bob.test"]).await?;
/// let alice = &found["alice.test"].did;
/// let bob = &found["bob.test"].did;
///
/// let mut paths = client.paths(&PathQuery::new(alice, bob).max_mutuals(50)).await?;
/// while let Some(path) = paths.next().await {
///     println!("{}", path?.join(" -> "));
/// }
/// ```
#[derive(Clone, Debug)]
pub struct GraphClient {
    transport: Transport,
    akas_chunk_size: usize,
}

impl GraphClient {
    /// Create a client for `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        GraphClientBuilder::new(base_url).build()
    }

    /// Create a builder.
    pub fn builder(base_url: impl Into<String>) -> GraphClientBuilder {
        GraphClientBuilder::new(base_url)
    }

    /// A copy of this client whose calls are aborted when `signal` fires.
    pub fn with_abort_signal(&self, signal: AbortSignal) -> Self {
        Self {
            transport: self.transport.with_abort_signal(signal),
            akas_chunk_size: self.akas_chunk_size,
        }
    }

    /// The service base address.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// The configured `akas` chunk size.
    pub fn akas_chunk_size(&self) -> usize {
        self.akas_chunk_size
    }

    /// The underlying transport.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Resolve handles to identities in one request.
    ///
    /// The result is keyed by handle. Handles the server does not know are
    /// either missing from the map or fail the whole call, depending on the
    /// server.
    #[tracing::instrument(
        skip_all,
        target = "skygraph_net::graph",
        level = "debug",
        fields(actors = actors.len())
    )]
    pub async fn whois<S: AsRef<str>>(&self, actors: &[S]) -> Result<IdentityMap> {
        let params = QueryParams::new().list("actor", actors.iter().map(AsRef::<str>::as_ref));
        let response: WhoisResponse = self.transport.call(Endpoint::WHOIS, params).await?;
        Ok(response.whois)
    }

    /// Resolve a single handle, `None` if the response does not mention it.
    pub async fn whois_actor(&self, actor: &str) -> Result<Option<ActorIdentity>> {
        let mut found = self.whois(&[actor]).await?;
        Ok(found.remove(actor))
    }

    /// Fetch the induced subgraph around the query's seeds.
    #[tracing::instrument(
        skip_all,
        target = "skygraph_net::graph",
        level = "debug",
        fields(seeds = query.dids.len())
    )]
    pub async fn neighborhood(&self, query: &NeighborhoodQuery) -> Result<Neighborhood> {
        self.transport
            .call(Endpoint::NEIGHBORHOOD, query.to_params())
            .await
    }

    /// Resolve also-known-as handles for `dids`.
    ///
    /// Empty input returns an empty map without a request. Otherwise the
    /// dids are split into chunks of [`Self::akas_chunk_size`], all chunks
    /// are requested concurrently, and the per-chunk maps are merged in
    /// chunk order regardless of which response arrives first.
    pub async fn akas<S: AsRef<str>>(&self, dids: &[S]) -> Result<AliasMap> {
        if dids.is_empty() {
            return Ok(AliasMap::new());
        }

        let chunk_params: Vec<QueryParams> = batch::chunks(dids, self.akas_chunk_size)
            .map(|chunk| QueryParams::new().list("did", chunk.iter().map(AsRef::<str>::as_ref)))
            .collect();

        let span = tracing::debug_span!(
            target: targets::GRAPH,
            span_names::FAN_OUT,
            endpoint = Endpoint::AKAS.name(),
            dids = dids.len(),
            chunks = chunk_params.len()
        );

        async move {
            tracing::debug!(target: targets::GRAPH, "dispatching akas chunks");
            let responses = batch::gather_ordered(chunk_params.into_iter().map(|params| {
                self.transport.call::<AkasResponse>(Endpoint::AKAS, params)
            }))
            .await?;
            Ok(batch::merge_in_order(
                responses.into_iter().map(|response| response.akas),
            ))
        }
        .instrument(span)
        .await
    }

    /// Mutual connections shared by all of `dids`.
    #[tracing::instrument(
        skip_all,
        target = "skygraph_net::graph",
        level = "debug",
        fields(dids = dids.len())
    )]
    pub async fn mutuals<S: AsRef<str>>(&self, dids: &[S]) -> Result<Vec<String>> {
        let params = QueryParams::new().list("did", dids.iter().map(AsRef::<str>::as_ref));
        let response: MutualsResponse = self.transport.call(Endpoint::MUTUALS, params).await?;
        Ok(response.mutuals)
    }

    /// Mutual connections of two actors.
    pub async fn mutuals_between(&self, first: &str, second: &str) -> Result<Vec<String>> {
        self.mutuals(&[first, second]).await
    }

    /// Actors with an edge pointing at any of `dids`.
    #[tracing::instrument(
        skip_all,
        target = "skygraph_net::graph",
        level = "debug",
        fields(dids = dids.len())
    )]
    pub async fn incoming<S: AsRef<str>>(&self, dids: &[S]) -> Result<Vec<String>> {
        let params = QueryParams::new().list("did", dids.iter().map(AsRef::<str>::as_ref));
        let response: IncomingResponse = self.transport.call(Endpoint::INCOMING, params).await?;
        Ok(response.incoming)
    }

    /// Stream candidate paths from the query's source to its target.
    ///
    /// Resolves once the server has accepted the request; paths are decoded
    /// one at a time as they are pulled from the returned stream.
    pub async fn paths(&self, query: &PathQuery) -> Result<PathStream> {
        tracing::debug!(
            target: targets::GRAPH,
            source = %query.source_did,
            target_did = %query.target_did,
            ignored = query.ignore_dids.len(),
            max_mutuals = query.max_mutuals,
            "requesting paths"
        );
        self.transport.stream(Endpoint::PATHS, query.to_params()).await
    }
}
