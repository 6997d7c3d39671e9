//! Reconnect-and-retry wrapper around a storage backend

use crate::config::StorageConfig;
use crate::storage::{Storage, StorageError, StorageResult};
use crate::CrawlError;
use std::time::Duration;

/// How failed storage statements are recovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between disconnecting and reconnecting
    pub backoff: Duration,
    /// Reconnect attempts before giving up; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Creates a policy with an optional attempt cap
    pub fn new(backoff: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            backoff,
            max_attempts,
        }
    }

    /// Creates a policy that reconnects until it succeeds
    pub fn unbounded(backoff: Duration) -> Self {
        Self::new(backoff, None)
    }

    /// Builds the policy from the `[storage]` section; 0 attempts means unbounded
    pub fn from_config(config: &StorageConfig) -> Self {
        let backoff = Duration::from_millis(config.reconnect_backoff_ms);
        match config.max_reconnect_attempts {
            0 => Self::unbounded(backoff),
            max => Self::new(backoff, Some(max)),
        }
    }
}

/// Storage handle that recovers from failed statements
///
/// When a statement fails, the connection is closed, the policy backoff is
/// slept, and the connection is reopened until that succeeds or the attempt
/// cap is reached. The statement is then executed exactly once more; a
/// second failure is reported as permanent.
pub struct ResilientStorage<S> {
    inner: S,
    policy: RetryPolicy,
    reconnects: u64,
}

impl<S: Storage> ResilientStorage<S> {
    /// Wraps a backend with the given policy
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            reconnects: 0,
        }
    }

    /// Returns the wrapped backend
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns the wrapped backend mutably
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwraps the backend
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Number of successful reconnects so far
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    /// Runs a statement under the retry policy
    ///
    /// # Arguments
    ///
    /// * `operation` - Short description used in logs and errors
    /// * `statement` - The storage call; invoked at most twice
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The statement succeeded, possibly after a reconnect
    /// * `Err(CrawlError::StorageUnavailable)` - Reconnect attempts exhausted
    /// * `Err(CrawlError::PermanentStorage)` - The statement failed again after reconnecting
    pub async fn execute<T, F>(&mut self, operation: &'static str, mut statement: F) -> crate::Result<T>
    where
        F: FnMut(&mut S) -> StorageResult<T>,
    {
        let error = match statement(&mut self.inner) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        tracing::warn!("Failed to {}: {}; reconnecting", operation, error);
        self.recover(operation, error).await?;

        statement(&mut self.inner).map_err(|source| {
            tracing::error!("Failed to {} after reconnecting: {}", operation, source);
            CrawlError::PermanentStorage { operation, source }
        })
    }

    async fn recover(&mut self, operation: &'static str, cause: StorageError) -> crate::Result<()> {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            self.inner.disconnect();
            tokio::time::sleep(self.policy.backoff).await;

            let reconnect = match self.inner.reconnect() {
                Ok(()) => {
                    self.reconnects += 1;
                    tracing::info!("Reconnected to storage after {} attempt(s)", attempts);
                    return Ok(());
                }
                Err(e) => e,
            };
            tracing::warn!("Reconnect attempt {} failed: {}", attempts, reconnect);

            if self.policy.max_attempts.is_some_and(|max| attempts >= max) {
                tracing::error!(
                    "Giving up on storage during {} after {} reconnect attempts",
                    operation,
                    attempts
                );
                return Err(CrawlError::StorageUnavailable {
                    operation,
                    attempts,
                    source: cause,
                    reconnect,
                });
            }
        }
    }
}
