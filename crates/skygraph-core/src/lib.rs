//! Core primitives for skygraph.
//!
//! This crate holds the pieces of the query client that do not touch the
//! network:
//!
//! - [`abort`]: caller-driven cancellation ([`AbortController`], [`AbortSignal`])
//! - [`delay`]: a sleep that gives up as soon as its signal fires
//! - [`logging`]: `tracing` target and span names used across the workspace

pub mod abort;
pub mod delay;
pub mod logging;

pub use abort::{AbortController, AbortReason, AbortSignal};
pub use delay::delay;
