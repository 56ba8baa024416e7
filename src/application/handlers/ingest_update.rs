//! IngestUpdate - Command handler for normalized biometric updates.
//!
//! One code path serves both transports: the WebSocket gateway and the
//! REST fallback both normalize into a `NormalizedUpdate` and hand it
//! here. Merge, persist, then fan out to subscribers.

use std::sync::Arc;

use tracing::warn;

use crate::adapters::cache::ProfileCache;
use crate::application::locks::UserLocks;
use crate::domain::foundation::DomainError;
use crate::domain::profile::UpdateKind;
use crate::ports::{BiometricSubscriber, NormalizedUpdate, ProfileStore};

/// Handler for biometric and biomarker ingestion.
pub struct IngestUpdateHandler {
    store: Arc<dyn ProfileStore>,
    cache: Arc<ProfileCache>,
    locks: Arc<UserLocks>,
    subscribers: Vec<Arc<dyn BiometricSubscriber>>,
}

impl IngestUpdateHandler {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        cache: Arc<ProfileCache>,
        locks: Arc<UserLocks>,
        subscribers: Vec<Arc<dyn BiometricSubscriber>>,
    ) -> Self {
        Self {
            store,
            cache,
            locks,
            subscribers,
        }
    }

    /// Validates, merges under the user's lock, persists, and fans out.
    ///
    /// Subscribers only see updates whose merge actually committed.
    pub async fn handle(&self, update: NormalizedUpdate) -> Result<(), DomainError> {
        self.validate(&update)?;

        let lock = self.locks.for_user(&update.user_id);
        let _guard = lock.lock().await;

        let mut profile = self
            .store
            .get(&update.user_id)
            .await?
            .ok_or_else(|| DomainError::profile_not_found(update.user_id))?;

        match update.kind {
            UpdateKind::Biometrics => {
                if let Some(sample) = &update.biometrics {
                    profile.apply_biometrics(
                        sample,
                        update.source,
                        update.reliability,
                        update.received_at,
                    );
                }
            }
            UpdateKind::Biomarkers => {
                if let Some(sample) = &update.biomarkers {
                    profile.apply_biomarkers(
                        sample,
                        update.source,
                        update.reliability,
                        update.received_at,
                    );
                }
            }
        }

        self.store.put(&profile).await?;
        self.cache.insert(update.user_id, profile).await;

        for subscriber in &self.subscribers {
            subscriber.on_update(&update).await;
        }

        Ok(())
    }

    fn validate(&self, update: &NormalizedUpdate) -> Result<(), DomainError> {
        match update.kind {
            UpdateKind::Biometrics => {
                let Some(sample) = &update.biometrics else {
                    return Err(DomainError::validation(
                        "biometrics",
                        "Biometric update carries no biometric sample",
                    ));
                };
                if sample.is_empty() {
                    warn!(user_id = %update.user_id, "empty biometric sample ignored");
                }
                sample.validate()?;
            }
            UpdateKind::Biomarkers => {
                let Some(sample) = &update.biomarkers else {
                    return Err(DomainError::validation(
                        "biomarkers",
                        "Biomarker update carries no marker sample",
                    ));
                };
                sample.validate()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::{TtlCache, DEFAULT_TTL};
    use crate::application::handlers::test_support::{MockProfileStore, RecordingSubscriber};
    use crate::domain::foundation::{ErrorCode, Timestamp, UnitInterval, UserId};
    use crate::domain::profile::{
        Archetype, BiometricSample, UpdateSource, UserProfile,
    };

    fn profile() -> UserProfile {
        UserProfile::new(UserId::new(), Archetype::Performance, UnitInterval::new(0.9))
    }

    fn biometric_update(user_id: UserId, sample: BiometricSample) -> NormalizedUpdate {
        NormalizedUpdate {
            user_id,
            kind: UpdateKind::Biometrics,
            source: UpdateSource::Wearable,
            reliability: UnitInterval::ONE,
            biometrics: Some(sample),
            biomarkers: None,
            device_id: None,
            received_at: Timestamp::now(),
        }
    }

    fn handler(
        store: Arc<MockProfileStore>,
        subscribers: Vec<Arc<dyn BiometricSubscriber>>,
    ) -> IngestUpdateHandler {
        IngestUpdateHandler::new(
            store,
            Arc::new(TtlCache::new(DEFAULT_TTL)),
            Arc::new(UserLocks::new()),
            subscribers,
        )
    }

    #[tokio::test]
    async fn merges_and_persists_the_sample() {
        let profile = profile();
        let user_id = profile.user_id;
        let store = Arc::new(MockProfileStore::new().with_profile(profile));

        handler(store.clone(), vec![])
            .handle(biometric_update(
                user_id,
                BiometricSample {
                    sleep_quality: Some(UnitInterval::new(0.7)),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();

        let stored = store.get(&user_id).await.unwrap().unwrap();
        assert_eq!(
            stored.biometrics.unwrap().sleep_quality,
            Some(UnitInterval::new(0.7))
        );
    }

    #[tokio::test]
    async fn later_updates_win_per_field() {
        let profile = profile();
        let user_id = profile.user_id;
        let store = Arc::new(MockProfileStore::new().with_profile(profile));
        let handler = handler(store.clone(), vec![]);

        for quality in [0.9, 0.2, 0.5] {
            handler
                .handle(biometric_update(
                    user_id,
                    BiometricSample {
                        sleep_quality: Some(UnitInterval::new(quality)),
                        ..Default::default()
                    },
                ))
                .await
                .unwrap();
        }

        let stored = store.get(&user_id).await.unwrap().unwrap();
        assert_eq!(
            stored.biometrics.unwrap().sleep_quality,
            Some(UnitInterval::new(0.5))
        );
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let store = Arc::new(MockProfileStore::new());
        let err = handler(store, vec![])
            .handle(biometric_update(UserId::new(), BiometricSample::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProfileNotFound);
    }

    #[tokio::test]
    async fn out_of_range_sample_is_rejected_before_merge() {
        let profile = profile();
        let user_id = profile.user_id;
        let store = Arc::new(MockProfileStore::new().with_profile(profile));

        let err = handler(store.clone(), vec![])
            .handle(biometric_update(
                user_id,
                BiometricSample {
                    sleep_duration_hours: Some(30.0),
                    ..Default::default()
                },
            ))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        let stored = store.get(&user_id).await.unwrap().unwrap();
        assert!(stored.biometrics.is_none());
    }

    #[tokio::test]
    async fn subscribers_see_committed_updates() {
        let profile = profile();
        let user_id = profile.user_id;
        let store = Arc::new(MockProfileStore::new().with_profile(profile));
        let subscriber = Arc::new(RecordingSubscriber::new());

        handler(store, vec![subscriber.clone()])
            .handle(biometric_update(
                user_id,
                BiometricSample {
                    energy_level: Some(UnitInterval::new(0.6)),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();

        assert_eq!(subscriber.received().len(), 1);
    }

    #[tokio::test]
    async fn subscribers_skip_failed_merges() {
        let store = Arc::new(MockProfileStore::new());
        let subscriber = Arc::new(RecordingSubscriber::new());

        let _ = handler(store, vec![subscriber.clone()])
            .handle(biometric_update(UserId::new(), BiometricSample::default()))
            .await;

        assert!(subscriber.received().is_empty());
    }
}
