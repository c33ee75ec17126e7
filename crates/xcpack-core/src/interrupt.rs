//! Operator interrupt handling
//!
//! The pipeline itself is synchronous. It runs on a blocking thread while the
//! caller waits for either its completion or an interrupt, whichever is first.
//! In-flight children are not killed here; the terminal delivers the signal to
//! the whole foreground process group.

use std::future::Future;

use tracing::warn;

use crate::error::{PackError, Result};

/// Run `work` on a blocking thread, abandoning it if `interrupt` resolves first
pub async fn run_interruptible<T, F, I>(work: F, interrupt: I) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
    I: Future<Output = ()>,
{
    let handle = tokio::task::spawn_blocking(work);

    tokio::select! {
        joined = handle => match joined {
            Ok(result) => result,
            Err(e) => Err(PackError::Io(std::io::Error::other(format!(
                "pipeline task failed: {e}"
            )))),
        },
        () = interrupt => {
            warn!("interrupt received, abandoning run");
            Err(PackError::Interrupted)
        }
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for interrupt");
        std::future::pending::<()>().await;
    }
}
