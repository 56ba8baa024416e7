//! Per-user write serialization.
//!
//! Every read-modify-write against a profile takes the user's lock first,
//! so concurrent ingests and feedback for one user apply one at a time.
//! Different users never contend beyond the shard map itself.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use crate::domain::foundation::UserId;

const SHARD_COUNT: usize = 16;

/// Shard size at which idle lock entries are swept before inserting.
const SWEEP_THRESHOLD: usize = 64;

/// Sharded registry of per-user async locks.
pub struct UserLocks {
    shards: Vec<Mutex<HashMap<UserId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl Default for UserLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl UserLocks {
    pub fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT)
                .map(|_| Mutex::new(HashMap::new()))
                .collect(),
        }
    }

    /// The lock for one user, created on first use.
    ///
    /// Once a shard grows past [`SWEEP_THRESHOLD`], entries nobody holds a
    /// handle to are dropped, so the map tracks the working set rather
    /// than every user ever seen.
    pub fn for_user(&self, user_id: &UserId) -> Arc<tokio::sync::Mutex<()>> {
        let mut shard = self.shards[self.shard_index(user_id)]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if shard.len() >= SWEEP_THRESHOLD {
            // Only the map holds an idle lock, so strong_count == 1 means
            // no task can be waiting on it.
            shard.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        shard
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Number of lock entries currently tracked across all shards.
    pub fn tracked_users(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .len()
            })
            .sum()
    }

    fn shard_index(&self, user_id: &UserId) -> usize {
        let mut hasher = DefaultHasher::new();
        user_id.hash(&mut hasher);
        (hasher.finish() as usize) % SHARD_COUNT
    }
}
