//! GetProfile - Query handler with cached read-through.

use std::sync::Arc;

use crate::adapters::cache::ProfileCache;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::profile::UserProfile;
use crate::ports::ProfileStore;

/// Query for a user's profile.
#[derive(Debug, Clone)]
pub struct GetProfileQuery {
    pub user_id: UserId,
    /// Skip the cache freshness check and hit the store.
    pub force_refresh: bool,
}

/// Handler for profile reads.
pub struct GetProfileHandler {
    store: Arc<dyn ProfileStore>,
    cache: Arc<ProfileCache>,
}

impl GetProfileHandler {
    pub fn new(store: Arc<dyn ProfileStore>, cache: Arc<ProfileCache>) -> Self {
        Self { store, cache }
    }

    pub async fn handle(&self, query: GetProfileQuery) -> Result<UserProfile, DomainError> {
        let store = self.store.clone();
        let user_id = query.user_id;
        self.cache
            .read_through(&query.user_id, query.force_refresh, move || async move {
                store.get(&user_id).await
            })
            .await?
            .ok_or_else(|| DomainError::profile_not_found(query.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::{TtlCache, DEFAULT_TTL};
    use crate::application::handlers::test_support::MockProfileStore;
    use crate::domain::foundation::{ErrorCode, UnitInterval};
    use crate::domain::profile::Archetype;

    fn profile() -> UserProfile {
        UserProfile::new(UserId::new(), Archetype::Longevity, UnitInterval::new(0.9))
    }

    #[tokio::test]
    async fn returns_the_stored_profile() {
        let profile = profile();
        let store = Arc::new(MockProfileStore::new().with_profile(profile.clone()));
        let handler = GetProfileHandler::new(store, Arc::new(TtlCache::new(DEFAULT_TTL)));

        let loaded = handler
            .handle(GetProfileQuery {
                user_id: profile.user_id,
                force_refresh: false,
            })
            .await
            .unwrap();
        assert_eq!(loaded, profile);
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let store = Arc::new(MockProfileStore::new());
        let handler = GetProfileHandler::new(store, Arc::new(TtlCache::new(DEFAULT_TTL)));

        let err = handler
            .handle(GetProfileQuery {
                user_id: UserId::new(),
                force_refresh: false,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProfileNotFound);
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let profile = profile();
        let store = Arc::new(MockProfileStore::new().with_profile(profile.clone()));
        let handler =
            GetProfileHandler::new(store.clone(), Arc::new(TtlCache::new(DEFAULT_TTL)));
        let query = GetProfileQuery {
            user_id: profile.user_id,
            force_refresh: false,
        };

        handler.handle(query.clone()).await.unwrap();
        let calls_after_first = store.calls();
        handler.handle(query).await.unwrap();
        assert_eq!(store.calls(), calls_after_first);
    }

    #[tokio::test]
    async fn store_outage_serves_the_cached_copy() {
        let profile = profile();
        let cache = Arc::new(TtlCache::new(std::time::Duration::ZERO));
        cache.insert(profile.user_id, profile.clone()).await;

        let failing = Arc::new(MockProfileStore::new().failing());
        let handler = GetProfileHandler::new(failing, cache);
        let loaded = handler
            .handle(GetProfileQuery {
                user_id: profile.user_id,
                force_refresh: false,
            })
            .await
            .unwrap();
        assert_eq!(loaded, profile);
    }
}
