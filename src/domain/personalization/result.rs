//! Personalization result types.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{InteractionId, Timestamp, UnitInterval};
use crate::domain::profile::{Advisor, CommunicationStyle};

use super::context::Mode;

/// Structural adaptation knobs handed to the conversational consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedContent {
    pub communication_style: CommunicationStyle,
    pub content_hints: Vec<String>,
    /// Multiplier on session intensity, clamped to [0.5, 1.5].
    pub intensity_factor: f64,
    pub timing_hints: Vec<String>,
    pub motivational_framing: String,
}

/// Layer 1 output: strategic alignment from static profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeConsiderations {
    pub strategic_alignment: String,
    pub preference_matches: Vec<String>,
    pub approach_optimization: String,
}

/// Layer 2 output: live-data modulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysiologicalModulation {
    pub insights: Vec<String>,
    pub recovery_considerations: Vec<String>,
    pub timing_recommendations: Vec<String>,
    pub intensity_adjustment: f64,
}

impl PhysiologicalModulation {
    /// Neutral modulation used when no physiological data exists.
    pub fn neutral() -> Self {
        Self {
            insights: Vec::new(),
            recovery_considerations: Vec::new(),
            timing_recommendations: Vec::new(),
            intensity_adjustment: 1.0,
        }
    }
}

/// Display band for a confidence score. Never used for gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    Excellent,
    Good,
    Moderate,
    Basic,
}

impl ConfidenceBand {
    /// Bands a confidence score for display.
    pub fn from_score(score: UnitInterval) -> Self {
        let v = score.value();
        if v >= 0.8 {
            Self::Excellent
        } else if v >= 0.6 {
            Self::Good
        } else if v >= 0.4 {
            Self::Moderate
        } else {
            Self::Basic
        }
    }
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Basic => write!(f, "Basic"),
        }
    }
}

/// Bookkeeping attached to every result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub mode: Mode,
    pub processing_micros: u64,
    pub data_quality: UnitInterval,
    pub adaptation_reasons: Vec<String>,
    /// Affinity badge for UI consumption, filled by the caller.
    pub affinity: Option<UnitInterval>,
}

/// Output of the personalization computer. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationResult {
    pub interaction_id: InteractionId,
    pub advisor: Advisor,
    pub produced_at: Timestamp,
    pub personalized_content: PersonalizedContent,
    pub archetype_considerations: ArchetypeConsiderations,
    pub physiological_modulation: PhysiologicalModulation,
    pub confidence: UnitInterval,
    pub confidence_band: ConfidenceBand,
    pub metadata: ResultMetadata,
}
