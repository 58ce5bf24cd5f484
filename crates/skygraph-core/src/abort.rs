//! Caller-driven cancellation for in-flight queries.
//!
//! An [`AbortController`] owns the right to abort; any number of [`AbortSignal`]
//! clones observe it. Network operations race their I/O against
//! [`AbortSignal::aborted`] and fail with the recorded [`AbortReason`] once the
//! controller fires.
//!
//! # Example
//!
//! ```
//! use skygraph_core::abort::AbortController;
//!
//! let controller = AbortController::new();
//! let signal = controller.signal();
//! assert!(!signal.is_aborted());
//!
//! controller.abort_with("navigated away");
//! assert_eq!(signal.reason().unwrap().message(), "navigated away");
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::logging::targets;

/// The reason an operation was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbortReason(Arc<str>);

impl AbortReason {
    /// Message used when the controller is aborted without an explicit reason.
    pub const DEFAULT_MESSAGE: &'static str = "the operation was aborted";

    /// Create a reason from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(Arc::from(message.into()))
    }

    /// The reason's message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl Default for AbortReason {
    fn default() -> Self {
        Self(Arc::from(Self::DEFAULT_MESSAGE))
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for AbortReason {}

impl From<&str> for AbortReason {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for AbortReason {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

#[derive(Debug)]
struct AbortState {
    aborted: AtomicBool,
    reason: Mutex<Option<AbortReason>>,
    notify: Notify,
}

/// Observer side of an [`AbortController`].
///
/// Signals are cheap to clone; every clone observes the same controller.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    inner: Arc<AbortState>,
}

impl AbortSignal {
    fn new() -> Self {
        Self {
            inner: Arc::new(AbortState {
                aborted: AtomicBool::new(false),
                reason: Mutex::new(None),
                notify: Notify::new(),
            }),
        }
    }

    /// Check if the controller has fired.
    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::Acquire)
    }

    /// The recorded reason, if aborted.
    pub fn reason(&self) -> Option<AbortReason> {
        if !self.is_aborted() {
            return None;
        }
        self.inner.reason.lock().clone()
    }

    /// Fail with the recorded reason if the signal has already fired.
    pub fn check(&self) -> Result<(), AbortReason> {
        match self.reason() {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// Wait until the controller fires and return its reason.
    ///
    /// Returns immediately if already aborted.
    pub async fn aborted(&self) -> AbortReason {
        loop {
            let notified = self.inner.notify.notified();
            if let Some(reason) = self.reason() {
                return reason;
            }
            notified.await;
        }
    }

    fn abort(&self, reason: AbortReason) -> bool {
        {
            let mut slot = self.inner.reason.lock();
            if slot.is_some() {
                return false;
            }
            *slot = Some(reason);
        }
        self.inner.aborted.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
        true
    }
}

/// Owner side of an abort signal.
#[derive(Debug, Clone)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    /// Create a controller whose signal has not fired.
    pub fn new() -> Self {
        Self {
            signal: AbortSignal::new(),
        }
    }

    /// A signal observing this controller.
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort with the default reason.
    pub fn abort(&self) {
        self.abort_with(AbortReason::default());
    }

    /// Abort with a specific reason.
    ///
    /// Only the first call records a reason; later calls are ignored.
    pub fn abort_with(&self, reason: impl Into<AbortReason>) {
        let reason = reason.into();
        if self.signal.abort(reason.clone()) {
            tracing::debug!(target: targets::ABORT, reason = %reason, "abort signal fired");
        }
    }

    /// Check if this controller has fired.
    pub fn is_aborted(&self) -> bool {
        self.signal.is_aborted()
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}
