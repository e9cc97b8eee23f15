//! Signal-driven shutdown.
//!
//! On SIGINT or SIGTERM the coordinator cancels the run's token, so every
//! in-flight and future report call fails fast, and disconnects the
//! tracking client.  It does this at most once, however many signals
//! arrive.  The caller then exits without rendering a report.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use fleet_transport::TrackingClient;

/// Owns the run-wide cancellation token and the teardown of the client.
pub struct ShutdownCoordinator<C: TrackingClient> {
    cancel: CancellationToken,
    client: Arc<C>,
    fired:  AtomicBool,
}

impl<C: TrackingClient> ShutdownCoordinator<C> {
    pub fn new(cancel: CancellationToken, client: Arc<C>) -> Self {
        Self { cancel, client, fired: AtomicBool::new(false) }
    }

    /// The token to thread through the driver and every report call.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Cancel the run and disconnect.  Returns `false` if shutdown already
    /// happened.
    pub async fn trigger(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        info!("Shutting down");
        self.cancel.cancel();
        if let Err(error) = self.client.disconnect().await {
            warn!(%error, "Disconnect during shutdown failed");
        }
        true
    }

    /// Wait for `signal`, then [`trigger`][Self::trigger].
    pub async fn watch<F>(&self, signal: F) -> bool
    where
        F: Future<Output = ()>,
    {
        signal.await;
        self.trigger().await
    }
}

/// Resolve on the first SIGINT (Ctrl+C) or SIGTERM.  Returns the signal's
/// name.
pub async fn wait_for_signal() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("Received Ctrl+C");
                Ok("SIGINT")
            }
            _ = terminate.recv() => {
                info!("Received SIGTERM");
                Ok("SIGTERM")
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C");
        Ok("SIGINT")
    }
}
