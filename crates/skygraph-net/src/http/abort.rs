//! Racing network futures against an abort signal.

use std::future::Future;

use skygraph_core::AbortSignal;
use skygraph_core::logging::targets;

use crate::error::Result;

/// Run `future` to completion unless `signal` fires first.
///
/// An already-fired signal fails before `future` is polled, so no I/O is
/// started. The signal branch is polled first on every wake-up.
pub(crate) async fn abortable<T, F>(signal: Option<&AbortSignal>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let Some(signal) = signal else {
        return future.await;
    };

    signal.check()?;

    tokio::select! {
        biased;
        reason = signal.aborted() => {
            tracing::debug!(target: targets::HTTP, reason = %reason, "in-flight operation aborted");
            Err(reason.into())
        }
        result = future => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use skygraph_core::AbortController;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn passes_through_without_signal() {
        let value = abortable(None, async { Ok::<_, NetworkError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn fired_signal_never_polls_future() {
        let controller = AbortController::new();
        controller.abort_with("stop");
        let polled = Arc::new(AtomicBool::new(false));
        let flag = polled.clone();

        let err = abortable(Some(&controller.signal()), async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, NetworkError>(())
        })
        .await
        .unwrap_err();

        assert!(err.is_aborted());
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn abort_interrupts_pending_future() {
        let controller = AbortController::new();
        let signal = controller.signal();

        let task = tokio::spawn(async move {
            abortable(Some(&signal), std::future::pending::<Result<()>>()).await
        });
        tokio::task::yield_now().await;
        controller.abort_with("bye");

        let err = task.await.unwrap().unwrap_err();
        match err {
            NetworkError::Aborted(reason) => assert_eq!(reason.message(), "bye"),
            other => panic!("expected Aborted, got {other:?}"),
        }
    }
}
