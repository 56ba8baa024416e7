//! Personalize - Command handler for adaptation requests.
//!
//! Loads the profile through the cache, runs both personalization
//! layers, attaches the advisor affinity, and records the adaptation in
//! the profile's history. The answer is never withheld over a history
//! write failure.

use std::sync::Arc;

use tracing::warn;

use crate::adapters::cache::ProfileCache;
use crate::application::locks::UserLocks;
use crate::domain::affinity::AffinityRanker;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::personalization::{PersonalizationComputer, PersonalizationContext, PersonalizationResult};
use crate::domain::profile::{AdaptationKind, AdaptationRecord};
use crate::ports::ProfileStore;

/// Command to personalize one advisor interaction.
#[derive(Debug, Clone)]
pub struct PersonalizeCommand {
    pub user_id: UserId,
    pub context: PersonalizationContext,
}

/// Handler for personalization requests.
pub struct PersonalizeHandler {
    store: Arc<dyn ProfileStore>,
    cache: Arc<ProfileCache>,
    locks: Arc<UserLocks>,
    computer: PersonalizationComputer,
    ranker: AffinityRanker,
}

impl PersonalizeHandler {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        cache: Arc<ProfileCache>,
        locks: Arc<UserLocks>,
    ) -> Self {
        Self {
            store,
            cache,
            locks,
            computer: PersonalizationComputer::new(),
            ranker: AffinityRanker::new(),
        }
    }

    pub async fn handle(
        &self,
        cmd: PersonalizeCommand,
    ) -> Result<PersonalizationResult, DomainError> {
        let lock = self.locks.for_user(&cmd.user_id);
        let _guard = lock.lock().await;

        let store = self.store.clone();
        let user_id = cmd.user_id;
        let mut profile = self
            .cache
            .read_through(&cmd.user_id, false, move || async move {
                store.get(&user_id).await
            })
            .await?
            .ok_or_else(|| DomainError::profile_not_found(cmd.user_id))?;

        let mut result = self.computer.compute(&profile, &cmd.context);
        result.metadata.affinity = Some(self.ranker.score(&profile, cmd.context.advisor));

        let has_physio = profile.biometrics.is_some()
            || profile.biomarkers.is_some()
            || cmd
                .context
                .real_time
                .as_ref()
                .is_some_and(|sample| !sample.is_empty());
        let record = AdaptationRecord {
            interaction_id: result.interaction_id,
            timestamp: result.produced_at,
            advisor: cmd.context.advisor,
            kind: if has_physio {
                AdaptationKind::Physiological
            } else {
                AdaptationKind::ArchetypeOnly
            },
            confidence: result.confidence,
            effectiveness: None,
        };
        profile.record_adaptation(record, result.clone());

        // History is advisory; the computed result stands even if the
        // write does not.
        if let Err(err) = self.store.put(&profile).await {
            warn!(
                user_id = %cmd.user_id,
                error = %err.message(),
                "failed to persist adaptation history"
            );
        }
        self.cache.insert(cmd.user_id, profile).await;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::{TtlCache, DEFAULT_TTL};
    use crate::application::handlers::test_support::MockProfileStore;
    use crate::domain::foundation::{ErrorCode, Timestamp, UnitInterval};
    use crate::domain::profile::{
        Advisor, Archetype, BiometricSample, UpdateSource, UserProfile,
    };

    fn profile() -> UserProfile {
        UserProfile::new(UserId::new(), Archetype::Performance, UnitInterval::new(0.9))
    }

    fn handler(store: Arc<MockProfileStore>) -> PersonalizeHandler {
        PersonalizeHandler::new(
            store,
            Arc::new(TtlCache::new(DEFAULT_TTL)),
            Arc::new(UserLocks::new()),
        )
    }

    fn cmd(user_id: UserId, advisor: Advisor) -> PersonalizeCommand {
        PersonalizeCommand {
            user_id,
            context: PersonalizationContext::for_advisor(advisor),
        }
    }

    #[tokio::test]
    async fn produces_a_result_with_affinity_attached() {
        let profile = profile();
        let user_id = profile.user_id;
        let store = Arc::new(MockProfileStore::new().with_profile(profile));

        let result = handler(store)
            .handle(cmd(user_id, Advisor::Training))
            .await
            .unwrap();

        assert_eq!(result.advisor, Advisor::Training);
        // Performance archetype makes Training well above the prior.
        assert!(result.metadata.affinity.unwrap().value() > 0.5);
    }

    #[tokio::test]
    async fn records_the_adaptation_in_history() {
        let profile = profile();
        let user_id = profile.user_id;
        let store = Arc::new(MockProfileStore::new().with_profile(profile));

        let result = handler(store.clone())
            .handle(cmd(user_id, Advisor::Recovery))
            .await
            .unwrap();

        let stored = store.get(&user_id).await.unwrap().unwrap();
        let record = stored.history.latest().unwrap();
        assert_eq!(record.interaction_id, result.interaction_id);
        assert_eq!(record.kind, AdaptationKind::ArchetypeOnly);
        assert_eq!(stored.recent.len(), 1);
    }

    #[tokio::test]
    async fn stored_biometrics_mark_the_adaptation_physiological() {
        let mut profile = profile();
        profile.apply_biometrics(
            &BiometricSample {
                energy_level: Some(UnitInterval::new(0.8)),
                ..Default::default()
            },
            UpdateSource::Wearable,
            UnitInterval::ONE,
            Timestamp::now(),
        );
        let user_id = profile.user_id;
        let store = Arc::new(MockProfileStore::new().with_profile(profile));

        handler(store.clone())
            .handle(cmd(user_id, Advisor::Training))
            .await
            .unwrap();

        let stored = store.get(&user_id).await.unwrap().unwrap();
        assert_eq!(
            stored.history.latest().unwrap().kind,
            AdaptationKind::Physiological
        );
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let store = Arc::new(MockProfileStore::new());
        let err = handler(store)
            .handle(cmd(UserId::new(), Advisor::Sleep))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProfileNotFound);
    }

    #[tokio::test]
    async fn history_write_failure_does_not_fail_the_request() {
        let profile = profile();
        let user_id = profile.user_id;
        // Prime the cache so the failing store is only hit for the put.
        let cache = Arc::new(TtlCache::new(DEFAULT_TTL));
        cache.insert(user_id, profile).await;
        let store = Arc::new(MockProfileStore::new().failing());
        let handler = PersonalizeHandler::new(store, cache, Arc::new(UserLocks::new()));

        let result = handler.handle(cmd(user_id, Advisor::Mindset)).await;
        assert!(result.is_ok());
    }
}
