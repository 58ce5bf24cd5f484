//! Tracing targets and span names.
//!
//! skygraph instruments itself with the `tracing` crate and never installs a
//! subscriber. To see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("skygraph_net=debug")
//!     .init();
//! ```

/// Span names used throughout skygraph.
///
/// These constants can be used to filter traces for specific operations.
pub mod span_names {
    /// A single HTTP request/response cycle.
    pub const REQUEST: &str = "skygraph::request";
    /// An NDJSON stream being consumed.
    pub const STREAM: &str = "skygraph::stream";
    /// A chunked fan-out over several requests.
    pub const FAN_OUT: &str = "skygraph::fan_out";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "skygraph_core";
    /// Abort signal target.
    pub const ABORT: &str = "skygraph_core::abort";
    /// HTTP client target.
    pub const HTTP: &str = "skygraph_net::http";
    /// Unary and streaming executors target.
    pub const TRANSPORT: &str = "skygraph_net::transport";
    /// Graph query client target.
    pub const GRAPH: &str = "skygraph_net::graph";
}
