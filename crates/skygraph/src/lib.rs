//! skygraph - a client for a social-graph query service.
//!
//! This is the umbrella crate that re-exports all public APIs.
//!
//! # Example
//!
//! ```no_run
//! use skygraph::{AbortController, GraphClient, PathQuery};
//!
//! # async fn run() -> skygraph::Result<()> {
//! let client = GraphClient::new("https://graph.example")?;
//! let controller = AbortController::new();
//! let client = client.with_abort_signal(controller.signal());
//!
//! let mut paths = client.paths(&PathQuery::new("did:plc:a", "did:plc:b")).await?;
//! while let Some(path) = paths.next().await {
//!     println!("{}", path?.join(" -> "));
//! }
//! # Ok(())
//! # }
//! ```

pub use skygraph_core::*;
pub use skygraph_net::*;

