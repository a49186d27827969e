//! Run blocking work while listening for Ctrl+C.

use anyhow::{Context, Result};
use etagcheck_core::control::AbortToken;
use std::time::Duration;

/// How long to wait for the worker to notice the abort before giving up on it.
const GRACE: Duration = Duration::from_secs(2);

pub enum Outcome<T> {
    Finished(T),
    Interrupted,
}

/// Runs `work` on the blocking pool. On Ctrl+C the token is aborted and the
/// worker gets a short grace period; a metadata request still in flight is
/// abandoned (the process exits right after).
pub async fn run_interruptible<T, F>(token: AbortToken, work: F) -> Result<Outcome<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let mut task = tokio::task::spawn_blocking(work);

    tokio::select! {
        joined = &mut task => {
            return Ok(Outcome::Finished(joined.context("worker task join")?));
        }
        signal = tokio::signal::ctrl_c() => signal.context("listen for Ctrl+C")?,
    }

    tracing::warn!("received Ctrl+C, stopping");
    token.abort();
    if tokio::time::timeout(GRACE, task).await.is_err() {
        tracing::debug!("worker still busy after abort; exiting anyway");
    }
    Ok(Outcome::Interrupted)
}
