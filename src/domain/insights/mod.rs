//! Derived user insights for the conversational consumer.
//!
//! Pure derivation over an already-loaded profile; the caching layer makes
//! these cheap to serve repeatedly.

use serde::{Deserialize, Serialize};

use crate::domain::affinity::{AffinityRanker, RankedAdvisor};
use crate::domain::foundation::{Timestamp, UnitInterval};
use crate::domain::personalization::{physio_layer, Mode, BIOMETRIC_STALENESS};
use crate::domain::profile::{Archetype, UserProfile};

/// Why the user sits in their archetype, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeAnalysis {
    pub archetype: Archetype,
    pub confidence: UnitInterval,
    pub reasoning: Vec<String>,
}

/// Routing and framing recommendations, including the affinity map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationRecommendations {
    pub advisor_affinities: Vec<RankedAdvisor>,
    pub preferred_communication_style: String,
    pub personalization_effectiveness: f64,
}

/// Everything the UI shows on the insights surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInsights {
    pub archetype_analysis: ArchetypeAnalysis,
    pub physiological_insights: Vec<String>,
    pub recommendations: PersonalizationRecommendations,
    pub predictive_insights: Vec<String>,
    pub generated_at: Timestamp,
}

/// Derives the full insight set from a profile.
pub fn derive_insights(profile: &UserProfile, ranker: &AffinityRanker) -> UserInsights {
    UserInsights {
        archetype_analysis: archetype_analysis(profile),
        physiological_insights: physiological_insights(profile),
        recommendations: PersonalizationRecommendations {
            advisor_affinities: ranker.affinity_map(profile),
            preferred_communication_style: profile
                .preferences
                .communication_style
                .to_string(),
            personalization_effectiveness: profile.personalization_effectiveness(),
        },
        predictive_insights: predictive_insights(profile),
        generated_at: Timestamp::now(),
    }
}

/// Archetype analysis alone, for the dedicated endpoint.
pub fn archetype_analysis(profile: &UserProfile) -> ArchetypeAnalysis {
    let mut reasoning = vec![match profile.archetype {
        Archetype::Longevity => {
            "Profile initialized in the longevity mode: healthspan-first goals".to_string()
        }
        Archetype::Performance => {
            "Profile initialized in the performance mode: output-first goals".to_string()
        }
    }];
    if !profile.constraints.goals.is_empty() {
        reasoning.push(format!(
            "Stated goals reinforce the assignment: {}",
            profile.constraints.goals.join(", ")
        ));
    }
    if !profile.history.is_empty() {
        reasoning.push(format!(
            "{} adaptation(s) recorded under this archetype",
            profile.history.len()
        ));
    }

    ArchetypeAnalysis {
        archetype: profile.archetype,
        confidence: profile.archetype_confidence,
        reasoning,
    }
}

fn physiological_insights(profile: &UserProfile) -> Vec<String> {
    let modulation = physio_layer::modulate(profile, profile.biometrics.as_ref(), Mode::Advanced);
    let mut insights = modulation.insights;
    insights.extend(modulation.recovery_considerations);
    if insights.is_empty() && profile.biometrics.is_none() {
        insights.push("No biometric data yet; connect a device or log manually".to_string());
    }
    insights
}

fn predictive_insights(profile: &UserProfile) -> Vec<String> {
    let mut insights = Vec::new();

    let effectiveness = profile.personalization_effectiveness();
    if effectiveness >= 0.7 {
        insights.push("Recent guidance is landing well; keep the current framing".to_string());
    } else if effectiveness > 0.0 && effectiveness < 0.4 {
        insights.push(
            "Recent guidance is underperforming; expect framing adjustments".to_string(),
        );
    }

    if let Some(bio) = &profile.biometrics {
        if bio.recorded_at.is_older_than(*BIOMETRIC_STALENESS) {
            insights.push(
                "Biometric data has gone stale; predictions will regress to archetype defaults"
                    .to_string(),
            );
        }
    }

    insights
}
