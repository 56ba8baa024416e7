//! Specialized advisor identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The specialized conversational advisors the engine routes between.
///
/// The declaration order doubles as the tie-break order when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisor {
    Training,
    Nutrition,
    Recovery,
    Sleep,
    Mindset,
    Longevity,
}

impl Advisor {
    /// All advisors in tie-break order.
    pub const ALL: [Advisor; 6] = [
        Advisor::Training,
        Advisor::Nutrition,
        Advisor::Recovery,
        Advisor::Sleep,
        Advisor::Mindset,
        Advisor::Longevity,
    ];

    /// Position in the tie-break order.
    pub fn ordinal(&self) -> usize {
        Self::ALL.iter().position(|a| a == self).unwrap_or(0)
    }
}

impl fmt::Display for Advisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Training => write!(f, "Training"),
            Self::Nutrition => write!(f, "Nutrition"),
            Self::Recovery => write!(f, "Recovery"),
            Self::Sleep => write!(f, "Sleep"),
            Self::Mindset => write!(f, "Mindset"),
            Self::Longevity => write!(f, "Longevity"),
        }
    }
}
