//! Abortable delays.

use std::time::Duration;

use crate::abort::{AbortReason, AbortSignal};
use crate::logging::targets;

/// Sleep for `duration` unless `signal` fires first.
///
/// Fails immediately with the signal's reason when it has already fired.
/// When the signal fires mid-wait the pending timer is dropped along with
/// the sleep future, so nothing keeps running after the error is returned.
pub async fn delay(duration: Duration, signal: Option<&AbortSignal>) -> Result<(), AbortReason> {
    let Some(signal) = signal else {
        tokio::time::sleep(duration).await;
        return Ok(());
    };

    signal.check()?;

    tokio::select! {
        biased;
        reason = signal.aborted() => {
            tracing::trace!(target: targets::CORE, reason = %reason, "delay aborted");
            Err(reason)
        }
        () = tokio::time::sleep(duration) => Ok(()),
    }
}
