//! Shared mock ports for handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::profile::UserProfile;
use crate::ports::{BiometricSubscriber, NormalizedUpdate, ProfileStore};

/// In-memory store with switchable failure behavior.
pub struct MockProfileStore {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
    fail_all: bool,
    fail_first: AtomicUsize,
    calls: AtomicUsize,
}

impl MockProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
            fail_all: false,
            fail_first: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails with `StoreUnavailable`.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// The first `n` calls fail, then the store recovers.
    pub fn failing_first(self, n: usize) -> Self {
        self.fail_first.store(n, Ordering::SeqCst);
        self
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            return Err(DomainError::store_unavailable("mock store down"));
        }
        let remaining = self.fail_first.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_first.store(remaining - 1, Ordering::SeqCst);
            return Err(DomainError::store_unavailable("mock store flaking"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        self.check_failure()?;
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }

    async fn put(&self, profile: &UserProfile) -> Result<(), DomainError> {
        self.check_failure()?;
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn exists(&self, user_id: &UserId) -> Result<bool, DomainError> {
        self.check_failure()?;
        Ok(self.profiles.lock().unwrap().contains_key(user_id))
    }
}

/// Subscriber that records every update it receives.
#[derive(Default)]
pub struct RecordingSubscriber {
    updates: Mutex<Vec<NormalizedUpdate>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<NormalizedUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl BiometricSubscriber for RecordingSubscriber {
    async fn on_update(&self, update: &NormalizedUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }
}
