//! Bounded history rings and adaptation records.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::domain::foundation::{InteractionId, Timestamp, UnitInterval};

use super::Advisor;

/// Fixed-capacity append-only log with drop-oldest overflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedLog<T> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T> BoundedLog<T> {
    /// Creates an empty log with the given capacity.
    ///
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Appends an entry, evicting the oldest when at capacity.
    pub fn push(&mut self, entry: T) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Iterates oldest to newest, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut()
    }

    /// Most recent entry, if any.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }
}

impl<T: Clone> BoundedLog<T> {
    /// Copy of this log keeping only the `n` most recent entries.
    ///
    /// Used when persisting a smaller subset than is held in memory.
    pub fn truncated(&self, n: usize) -> Self {
        let skip = self.entries.len().saturating_sub(n);
        Self {
            capacity: self.capacity,
            entries: self.entries.iter().skip(skip).cloned().collect(),
        }
    }
}

/// Which layers contributed to an adaptation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationKind {
    /// Archetype layer only; no physiological data was available.
    ArchetypeOnly,
    /// Both layers ran.
    Physiological,
}

/// One entry in the per-user adaptation history ring.
///
/// `effectiveness` starts empty and is backfilled when learning feedback
/// arrives carrying the same interaction id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationRecord {
    pub interaction_id: InteractionId,
    pub timestamp: Timestamp,
    pub advisor: Advisor,
    pub kind: AdaptationKind,
    pub confidence: UnitInterval,
    pub effectiveness: Option<u8>,
}
