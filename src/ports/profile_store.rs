//! ProfileStore port for profile persistence operations

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::profile::UserProfile;

/// Durable storage for user profiles.
///
/// Implementations map infrastructure failures to `StoreUnavailable`;
/// callers decide whether a stale cached copy can stand in.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load the profile for a user, `None` when uninitialized.
    async fn get(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Persist the full profile state, creating or replacing it.
    async fn put(&self, profile: &UserProfile) -> Result<(), DomainError>;

    /// Check whether a profile exists without loading it.
    async fn exists(&self, user_id: &UserId) -> Result<bool, DomainError>;
}
