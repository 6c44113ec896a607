//! Connection readiness polling.
//!
//! A freshly started database accepts TCP connections some time before it
//! accepts logins. `ConnectionWaiter` retries the connect call on a fixed
//! delay until it succeeds, the attempt budget runs out, or a shutdown
//! signal arrives. The connection that finally succeeds is handed back to
//! the caller and used for the rest of the run.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};

/// Retry policy for the readiness loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Connection attempts before giving up (default 30).
    pub max_attempts: u32,
    /// Pause after each failed attempt (default 1s).
    pub attempt_delay: Duration,
    /// Upper bound on a single attempt; a timed-out attempt counts as failed (default 5s).
    pub attempt_timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            attempt_delay: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(5),
        }
    }
}

impl WaitPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_attempt_delay(mut self, attempt_delay: Duration) -> Self {
        self.attempt_delay = attempt_delay;
        self
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }
}

/// Polls an endpoint until a connection succeeds.
#[derive(Debug, Clone, Default)]
pub struct ConnectionWaiter {
    policy: WaitPolicy,
}

impl ConnectionWaiter {
    pub fn new(policy: WaitPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Calls `connect` until it yields a connection.
    ///
    /// Returns the connection on the first success. After `max_attempts`
    /// consecutive failures returns `StorageError::ConnectionTimeout` with the
    /// last error; there is no sleep after the final attempt. `shutdown` is
    /// raced against both the attempt and the sleep, and completing it ends
    /// the wait with `StorageError::Cancelled`. Pass
    /// `std::future::pending()` when there is nothing to cancel on.
    ///
    /// `endpoint` is only used in log output and must not contain credentials.
    pub async fn wait_until_ready<C, E, F, Fut, S>(
        &self,
        endpoint: &str,
        mut connect: F,
        shutdown: S,
    ) -> StorageResult<C>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<C, E>>,
        E: Display,
        S: Future<Output = ()>,
    {
        let WaitPolicy {
            max_attempts,
            attempt_delay,
            attempt_timeout,
        } = self.policy;

        if max_attempts == 0 {
            return Err(StorageError::InvalidInput {
                message: "max_attempts must be at least 1".to_string(),
            });
        }

        tokio::pin!(shutdown);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(endpoint, attempts = attempt - 1, "Connection wait cancelled");
                    return Err(StorageError::Cancelled { attempts: attempt - 1 });
                }
                // Lazy, so nothing is dialled once shutdown has fired.
                outcome = timeout(attempt_timeout, async { connect().await }) => outcome,
            };

            match outcome {
                Ok(Ok(connection)) => {
                    info!(endpoint, attempt, "Database connection established");
                    return Ok(connection);
                }
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => {
                    last_error = format!("attempt timed out after {:?}", attempt_timeout)
                }
            }

            debug!(
                endpoint,
                attempt,
                max_attempts,
                error = %last_error,
                "Database connection attempt failed"
            );

            if attempt < max_attempts {
                tokio::select! {
                    biased;
                    _ = &mut shutdown => {
                        info!(endpoint, attempts = attempt, "Connection wait cancelled");
                        return Err(StorageError::Cancelled { attempts: attempt });
                    }
                    _ = sleep(attempt_delay) => {}
                }
            }
        }

        warn!(
            endpoint,
            attempts = max_attempts,
            error = %last_error,
            "Database did not become ready"
        );
        Err(StorageError::ConnectionTimeout {
            attempts: max_attempts,
            last_error,
        })
    }
}
