//! RecordFeedback - Command handler for the learning loop.
//!
//! Feedback submission is fire-and-forget from the client's point of
//! view: this handler accepts everything and never returns an error.
//! Problems are logged and counted instead of surfaced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::warn;

use crate::adapters::cache::ProfileCache;
use crate::application::locks::UserLocks;
use crate::domain::affinity;
use crate::domain::foundation::UserId;
use crate::domain::profile::LearningFeedback;
use crate::ports::ProfileStore;

/// Command carrying validated feedback.
#[derive(Debug, Clone)]
pub struct RecordFeedbackCommand {
    pub user_id: UserId,
    pub feedback: LearningFeedback,
}

/// What happened to a feedback submission; informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Matched a history entry and updated the learned affinity.
    Applied,
    /// Retained, but no history entry carried its interaction id.
    Unmatched,
    /// Could not be processed at all; logged and dropped.
    Dropped,
}

/// Handler for learning feedback.
pub struct RecordFeedbackHandler {
    store: Arc<dyn ProfileStore>,
    cache: Arc<ProfileCache>,
    locks: Arc<UserLocks>,
    unmatched: AtomicU64,
}

impl RecordFeedbackHandler {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        cache: Arc<ProfileCache>,
        locks: Arc<UserLocks>,
    ) -> Self {
        Self {
            store,
            cache,
            locks,
            unmatched: AtomicU64::new(0),
        }
    }

    /// Count of feedback submissions that matched no history entry.
    pub fn unmatched_count(&self) -> u64 {
        self.unmatched.load(Ordering::Relaxed)
    }

    pub async fn handle(&self, cmd: RecordFeedbackCommand) -> FeedbackOutcome {
        let lock = self.locks.for_user(&cmd.user_id);
        let _guard = lock.lock().await;

        let mut profile = match self.store.get(&cmd.user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!(user_id = %cmd.user_id, "feedback for uninitialized profile dropped");
                return FeedbackOutcome::Dropped;
            }
            Err(err) => {
                warn!(
                    user_id = %cmd.user_id,
                    error = %err.message(),
                    "feedback dropped; store unavailable"
                );
                return FeedbackOutcome::Dropped;
            }
        };

        let advisor = profile
            .history
            .iter()
            .find(|record| record.interaction_id == cmd.feedback.interaction_id)
            .map(|record| record.advisor);

        let matched = profile.apply_feedback(cmd.feedback.clone());
        let outcome = match advisor {
            Some(advisor) => {
                affinity::learn_affinity(&mut profile, advisor, &cmd.feedback);
                FeedbackOutcome::Applied
            }
            None => {
                debug_assert!(!matched);
                self.unmatched.fetch_add(1, Ordering::Relaxed);
                warn!(
                    user_id = %cmd.user_id,
                    interaction_id = %cmd.feedback.interaction_id,
                    "feedback matched no adaptation history entry"
                );
                FeedbackOutcome::Unmatched
            }
        };

        if let Err(err) = self.store.put(&profile).await {
            warn!(
                user_id = %cmd.user_id,
                error = %err.message(),
                "failed to persist feedback"
            );
        }
        self.cache.insert(cmd.user_id, profile).await;

        outcome
    }
}
