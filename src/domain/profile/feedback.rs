//! Learning feedback tied to past personalizations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{InteractionId, Timestamp, UnitInterval, ValidationError};

/// Maximum value of an effectiveness rating.
pub const MAX_RATING: u8 = 10;

/// Per-dimension breakdown of an effectiveness rating, each 0-10.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackBreakdown {
    pub relevance: u8,
    pub tone: u8,
    pub timing: u8,
    pub actionability: u8,
}

impl FeedbackBreakdown {
    fn validate(&self) -> Result<(), ValidationError> {
        let dimensions = [
            ("relevance", self.relevance),
            ("tone", self.tone),
            ("timing", self.timing),
            ("actionability", self.actionability),
        ];
        for (field, value) in dimensions {
            if value > MAX_RATING {
                return Err(ValidationError::out_of_range(
                    field,
                    0.0,
                    f64::from(MAX_RATING),
                    f64::from(value),
                ));
            }
        }
        Ok(())
    }
}

/// Write-once feedback on a past personalization.
///
/// Appended to the profile's feedback ring; its `interaction_id` joins it
/// to the adaptation history entry it rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningFeedback {
    pub interaction_id: InteractionId,
    pub user_satisfaction: UnitInterval,
    pub effectiveness_rating: u8,
    pub breakdown: FeedbackBreakdown,
    #[serde(default)]
    pub behavioral_outcomes: Vec<String>,
    pub submitted_at: Timestamp,
}

impl LearningFeedback {
    /// Creates feedback, validating all ratings against the 0-10 scale.
    pub fn new(
        interaction_id: InteractionId,
        user_satisfaction: UnitInterval,
        effectiveness_rating: u8,
        breakdown: FeedbackBreakdown,
        behavioral_outcomes: Vec<String>,
    ) -> Result<Self, ValidationError> {
        if effectiveness_rating > MAX_RATING {
            return Err(ValidationError::out_of_range(
                "effectiveness_rating",
                0.0,
                f64::from(MAX_RATING),
                f64::from(effectiveness_rating),
            ));
        }
        breakdown.validate()?;

        Ok(Self {
            interaction_id,
            user_satisfaction,
            effectiveness_rating,
            breakdown,
            behavioral_outcomes,
            submitted_at: Timestamp::now(),
        })
    }

    /// Effectiveness rating normalized to [0, 1].
    pub fn normalized_effectiveness(&self) -> f64 {
        f64::from(self.effectiveness_rating) / f64::from(MAX_RATING)
    }
}
