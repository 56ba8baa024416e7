//! PostgreSQL adapter for ProfileStore.
//!
//! One row per user with the aggregate as JSONB. The in-memory history
//! rings are wider than what is worth persisting, so the stored copy
//! truncates them first.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::profile::{UserProfile, PERSISTED_HISTORY_CAP};
use crate::ports::ProfileStore;

/// PostgreSQL implementation of ProfileStore.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Copy of the profile with the persisted history caps applied.
    fn persistable(profile: &UserProfile) -> UserProfile {
        let mut copy = profile.clone();
        copy.history = profile.history.truncated(PERSISTED_HISTORY_CAP);
        copy
    }
}

fn db_error(err: sqlx::Error) -> DomainError {
    DomainError::store_unavailable(format!("Database error: {}", err))
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT profile FROM user_profiles WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        match row {
            Some((value,)) => {
                let profile = serde_json::from_value(value).map_err(|e| {
                    DomainError::new(
                        ErrorCode::InternalError,
                        format!("Failed to deserialize profile: {}", e),
                    )
                })?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let value = serde_json::to_value(Self::persistable(profile)).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize profile: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, profile, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET profile = $2, updated_at = $3
            "#,
        )
        .bind(profile.user_id.as_uuid())
        .bind(value)
        .bind(*profile.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn exists(&self, user_id: &UserId) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_profiles WHERE user_id = $1)",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{InteractionId, Timestamp, UnitInterval};
    use crate::domain::profile::{
        AdaptationKind, AdaptationRecord, Advisor, Archetype, HISTORY_CAP,
    };

    #[test]
    fn persistable_truncates_history_to_the_stored_cap() {
        let mut profile =
            UserProfile::new(UserId::new(), Archetype::Longevity, UnitInterval::new(0.9));
        for _ in 0..HISTORY_CAP {
            profile.history.push(AdaptationRecord {
                interaction_id: InteractionId::new(),
                timestamp: Timestamp::now(),
                advisor: Advisor::Training,
                kind: AdaptationKind::ArchetypeOnly,
                confidence: UnitInterval::NEUTRAL,
                effectiveness: None,
            });
        }

        let persisted = PgProfileStore::persistable(&profile);
        assert_eq!(persisted.history.len(), PERSISTED_HISTORY_CAP);
        // Most recent entries survive.
        assert_eq!(
            persisted.history.latest().unwrap().interaction_id,
            profile.history.latest().unwrap().interaction_id
        );
    }
}
