//! GetInsights - Query handlers for the insight surfaces.

use std::sync::Arc;

use crate::adapters::cache::ProfileCache;
use crate::domain::affinity::AffinityRanker;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::insights::{self, ArchetypeAnalysis, UserInsights};
use crate::ports::ProfileStore;

/// Query for derived insights.
#[derive(Debug, Clone)]
pub struct GetInsightsQuery {
    pub user_id: UserId,
    pub force_refresh: bool,
}

/// Handler for insight derivation.
pub struct GetInsightsHandler {
    store: Arc<dyn ProfileStore>,
    cache: Arc<ProfileCache>,
    ranker: AffinityRanker,
}

impl GetInsightsHandler {
    pub fn new(store: Arc<dyn ProfileStore>, cache: Arc<ProfileCache>) -> Self {
        Self {
            store,
            cache,
            ranker: AffinityRanker::new(),
        }
    }

    pub async fn handle(&self, query: GetInsightsQuery) -> Result<UserInsights, DomainError> {
        let profile = self.load(query.user_id, query.force_refresh).await?;
        Ok(insights::derive_insights(&profile, &self.ranker))
    }

    /// The archetype analysis alone; cheaper for clients that only show
    /// the assignment card.
    pub async fn archetype(&self, user_id: UserId) -> Result<ArchetypeAnalysis, DomainError> {
        let profile = self.load(user_id, false).await?;
        Ok(insights::archetype_analysis(&profile))
    }

    async fn load(
        &self,
        user_id: UserId,
        force: bool,
    ) -> Result<crate::domain::profile::UserProfile, DomainError> {
        let store = self.store.clone();
        self.cache
            .read_through(&user_id, force, move || async move {
                store.get(&user_id).await
            })
            .await?
            .ok_or_else(|| DomainError::profile_not_found(user_id))
    }
}
