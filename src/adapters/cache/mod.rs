//! In-process TTL cache for loaded profiles.
//!
//! Read-through against the store, with one deliberate asymmetry: when the
//! store errors on a refresh, an expired entry is served rather than the
//! error. Writes must invalidate explicitly.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::warn;

use crate::domain::foundation::{DomainError, UserId};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// The cache instance the engine actually runs with.
pub type ProfileCache = TtlCache<crate::domain::profile::UserProfile>;

struct Entry<V> {
    value: V,
    cached_at: Instant,
}

/// Per-user TTL cache keyed by `UserId`.
pub struct TtlCache<V: Clone> {
    ttl: Duration,
    entries: RwLock<HashMap<UserId, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached value regardless of freshness, with its age.
    async fn peek(&self, user_id: &UserId) -> Option<(V, Duration)> {
        let entries = self.entries.read().await;
        entries
            .get(user_id)
            .map(|e| (e.value.clone(), e.cached_at.elapsed()))
    }

    /// Loads through the cache.
    ///
    /// `force` skips the freshness check but never the store. A fetch
    /// error falls back to whatever is cached, however old; only a user
    /// with nothing cached sees the error.
    pub async fn read_through<F, Fut>(
        &self,
        user_id: &UserId,
        force: bool,
        fetch: F,
    ) -> Result<Option<V>, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<V>, DomainError>>,
    {
        if !force {
            if let Some((value, age)) = self.peek(user_id).await {
                if age < self.ttl {
                    return Ok(Some(value));
                }
            }
        }

        match fetch().await {
            Ok(Some(value)) => {
                self.insert(user_id.clone(), value.clone()).await;
                Ok(Some(value))
            }
            Ok(None) => {
                self.invalidate(user_id).await;
                Ok(None)
            }
            Err(err) => match self.peek(user_id).await {
                Some((value, age)) => {
                    warn!(
                        user_id = %user_id,
                        age_secs = age.as_secs(),
                        error = %err.message(),
                        "store fetch failed; serving stale cached profile"
                    );
                    Ok(Some(value))
                }
                None => Err(err),
            },
        }
    }

    pub async fn insert(&self, user_id: UserId, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(
            user_id,
            Entry {
                value,
                cached_at: Instant::now(),
            },
        );
    }

    pub async fn invalidate(&self, user_id: &UserId) {
        let mut entries = self.entries.write().await;
        entries.remove(user_id);
    }
}
