//! Timeout and retry decoration for a ProfileStore.
//!
//! Wraps any store with a per-call deadline and a bounded retry loop.
//! Only `StoreUnavailable` is retried; domain errors pass straight
//! through since trying again cannot change them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::profile::UserProfile;
use crate::ports::ProfileStore;

/// Deadline and retry policy for store calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub call_timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(2),
            max_retries: 2,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

/// ProfileStore decorator applying `RetryConfig` to every call.
pub struct RetryingStore {
    inner: Arc<dyn ProfileStore>,
    config: RetryConfig,
}

impl RetryingStore {
    pub fn new(inner: Arc<dyn ProfileStore>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    async fn run<T, F, Fut>(&self, op: &'static str, call: F) -> Result<T, DomainError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, DomainError>>,
    {
        let mut backoff = self.config.initial_backoff;
        let mut attempt = 0;
        loop {
            let outcome = match tokio::time::timeout(self.config.call_timeout, call()).await {
                Ok(result) => result,
                Err(_) => Err(DomainError::store_unavailable(format!(
                    "{} timed out after {:?}",
                    op, self.config.call_timeout
                ))),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(err) if err.code() == ErrorCode::StoreUnavailable => {
                    if attempt >= self.config.max_retries {
                        return Err(err);
                    }
                    attempt += 1;
                    warn!(
                        op,
                        attempt,
                        error = %err.message(),
                        "store call failed; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl ProfileStore for RetryingStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        self.run("get", || self.inner.get(user_id)).await
    }

    async fn put(&self, profile: &UserProfile) -> Result<(), DomainError> {
        self.run("put", || self.inner.put(profile)).await
    }

    async fn exists(&self, user_id: &UserId) -> Result<bool, DomainError> {
        self.run("exists", || self.inner.exists(user_id)).await
    }
}
