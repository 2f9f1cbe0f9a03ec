//! Parent deadline shared by every network phase of one run
//!
//! The budget starts when the deadline is created (right before stream
//! resolution) and is not reset between phases, so the total latency of
//! resolve + info + listing stays within one bound.

use crate::core::shutdown::ShutdownSignal;
use crate::lag::error::Interruption;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Suggested bound for the network phases of one run
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(10);

// About thirty years
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

pub struct Deadline {
    budget: Duration,
    expires_at: Instant,
    shutdown: Option<ShutdownSignal>,
}

impl Deadline {
    /// Start the clock now
    ///
    /// A budget too large to represent saturates to a far-future expiry.
    pub fn start(budget: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(budget)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self {
            budget,
            expires_at,
            shutdown: None,
        }
    }

    /// Also abort when the shutdown signal fires
    pub fn with_shutdown(mut self, signal: ShutdownSignal) -> Self {
        self.shutdown = Some(signal);
        self
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Run `operation` unless the deadline passes or shutdown is requested first
    pub async fn bound<F: Future>(&mut self, operation: F) -> Result<F::Output, Interruption> {
        if self.shutdown.as_ref().is_some_and(ShutdownSignal::is_triggered) {
            return Err(Interruption::Cancelled);
        }
        if self.is_expired() {
            return Err(Interruption::Expired);
        }

        let expires_at = self.expires_at;
        tokio::select! {
            biased;
            _ = wait_for_shutdown(self.shutdown.as_mut()) => Err(Interruption::Cancelled),
            outcome = tokio::time::timeout_at(expires_at, operation) => {
                outcome.map_err(|_| Interruption::Expired)
            }
        }
    }
}

async fn wait_for_shutdown(signal: Option<&mut ShutdownSignal>) {
    match signal {
        Some(signal) => signal.triggered().await,
        None => std::future::pending().await,
    }
}
