//! Per-connection dial gate.
//!
//! A handle is published into the cache before its connection is dialed, so
//! several callers can hold the same not-yet-dialed handle. The gate makes
//! them share one dial attempt and one outcome:
//!
//! ```text
//! Unstarted ──► InFlight ──► Succeeded
//!                   │
//!                   └──────► Failed (sticky)
//! ```
//!
//! The transition out of `Unstarted` happens under the gate's own lock, not
//! the cache lock, so dials for different authorities run in parallel. The
//! winning caller runs the dial on a spawned task; every caller (the winner
//! included) then waits for the state to resolve.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::{ClientError, Result};

/// Observable state of a connection's dial.
#[derive(Debug, Clone)]
pub enum DialStatus {
    Unstarted,
    InFlight,
    Succeeded,
    /// Returned to every later caller; never retried.
    Failed(Arc<ClientError>),
}

impl DialStatus {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

/// One-shot dial coordinator owned by a single connection handle.
pub(crate) struct DialGate {
    state: Arc<watch::Sender<DialStatus>>,
}

impl DialGate {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(DialStatus::Unstarted);
        Self {
            state: Arc::new(state),
        }
    }

    pub(crate) fn status(&self) -> DialStatus {
        self.state.borrow().clone()
    }

    /// Make sure `dial` has run exactly once and return its outcome.
    ///
    /// Only the first caller's `dial` future is polled; later callers drop
    /// theirs unpolled. `timeout`, when set, bounds the attempt this call
    /// starts; it has no effect if another caller already started it.
    pub(crate) async fn ensure<F>(&self, dial: F, timeout: Option<Duration>) -> Result<()>
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let mut rx = self.state.subscribe();

        let started = self.state.send_if_modified(|status| {
            if matches!(status, DialStatus::Unstarted) {
                *status = DialStatus::InFlight;
                true
            } else {
                false
            }
        });

        if started {
            let resolver = Resolver(Arc::clone(&self.state));
            tokio::spawn(async move {
                let outcome = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, dial).await {
                        Ok(outcome) => outcome,
                        Err(_) => Err(ClientError::DialTimeout(limit)),
                    },
                    None => dial.await,
                };
                resolver.resolve(outcome);
            });
        }

        let status = rx
            .wait_for(DialStatus::is_resolved)
            .await
            .map(|status| status.clone())
            .map_err(|_| ClientError::DialAborted)?;

        match status {
            DialStatus::Failed(e) => Err(ClientError::Dial(e)),
            _ => Ok(()),
        }
    }
}

/// Publishes the dial outcome. If dropped unresolved (the dial task
/// panicked or the runtime shut down) the gate fails with
/// [`ClientError::DialAborted`] so waiters are not stranded.
struct Resolver(Arc<watch::Sender<DialStatus>>);

impl Resolver {
    fn resolve(self, outcome: Result<()>) {
        let status = match outcome {
            Ok(()) => DialStatus::Succeeded,
            Err(e) => DialStatus::Failed(Arc::new(e)),
        };
        self.0.send_replace(status);
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        self.0.send_if_modified(|status| {
            if status.is_resolved() {
                false
            } else {
                *status = DialStatus::Failed(Arc::new(ClientError::DialAborted));
                true
            }
        });
    }
}
