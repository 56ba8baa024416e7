//! InitializeProfile - Command handler for creating user profiles.

use std::sync::Arc;

use crate::adapters::cache::ProfileCache;
use crate::application::locks::UserLocks;
use crate::domain::foundation::{DomainError, ErrorCode, UnitInterval, UserId};
use crate::domain::profile::{
    Archetype, Constraints, Demographics, FitnessLevel, Preferences, UserProfile,
};
use crate::ports::ProfileStore;

/// Command to initialize a profile with its archetype fixed.
#[derive(Debug, Clone)]
pub struct InitializeProfileCommand {
    pub user_id: UserId,
    pub archetype: Archetype,
    pub archetype_confidence: UnitInterval,
    pub fitness_level: FitnessLevel,
    pub demographics: Demographics,
    pub constraints: Constraints,
    pub preferences: Preferences,
}

/// Result of initialization.
#[derive(Debug, Clone)]
pub struct InitializeProfileResult {
    pub profile: UserProfile,
    /// False when an identical-archetype profile already existed.
    pub created: bool,
}

/// Handler for profile initialization.
pub struct InitializeProfileHandler {
    store: Arc<dyn ProfileStore>,
    cache: Arc<ProfileCache>,
    locks: Arc<UserLocks>,
}

impl InitializeProfileHandler {
    pub fn new(store: Arc<dyn ProfileStore>, cache: Arc<ProfileCache>, locks: Arc<UserLocks>) -> Self {
        Self { store, cache, locks }
    }

    /// Idempotent for a matching archetype; conflicting re-initialization
    /// is rejected because the archetype is immutable once set.
    pub async fn handle(
        &self,
        cmd: InitializeProfileCommand,
    ) -> Result<InitializeProfileResult, DomainError> {
        let lock = self.locks.for_user(&cmd.user_id);
        let _guard = lock.lock().await;

        if let Some(existing) = self.store.get(&cmd.user_id).await? {
            if existing.archetype == cmd.archetype {
                self.cache.insert(cmd.user_id, existing.clone()).await;
                return Ok(InitializeProfileResult {
                    profile: existing,
                    created: false,
                });
            }
            return Err(DomainError::new(
                ErrorCode::ArchetypeConflict,
                "Profile already initialized with a different archetype",
            )
            .with_detail("current", existing.archetype.to_string())
            .with_detail("requested", cmd.archetype.to_string()));
        }

        let mut profile = UserProfile::new(cmd.user_id, cmd.archetype, cmd.archetype_confidence);
        profile.fitness_level = cmd.fitness_level;
        profile.demographics = cmd.demographics;
        profile.constraints = cmd.constraints;
        profile.preferences = cmd.preferences;

        self.store.put(&profile).await?;
        self.cache.insert(cmd.user_id, profile.clone()).await;

        Ok(InitializeProfileResult {
            profile,
            created: true,
        })
    }
}
