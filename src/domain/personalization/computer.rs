//! The personalization computer: both layers plus confidence, assembled.

use std::time::Instant;

use crate::domain::foundation::{InteractionId, Timestamp};
use crate::domain::profile::{DetailLevel, UserProfile};

use super::archetype_layer;
use super::confidence::ConfidenceInputs;
use super::context::PersonalizationContext;
use super::physio_layer;
use super::result::{
    ConfidenceBand, PersonalizationResult, PersonalizedContent, ResultMetadata,
};

/// Pure, CPU-bound personalization engine.
///
/// Holds no state; a single instance is shared across all requests.
#[derive(Debug, Default)]
pub struct PersonalizationComputer;

impl PersonalizationComputer {
    pub fn new() -> Self {
        Self
    }

    /// Computes a result for a loaded profile.
    ///
    /// Never refuses: with no physiological data this degrades to a
    /// Layer-1-only answer with zero data quality and floored confidence.
    pub fn compute(
        &self,
        profile: &UserProfile,
        ctx: &PersonalizationContext,
    ) -> PersonalizationResult {
        let started = Instant::now();

        let archetype_considerations = archetype_layer::archetype_considerations(
            profile.archetype,
            &profile.preferences,
            ctx.advisor,
        );

        let effective = physio_layer::effective_biometrics(profile, ctx.real_time.as_ref());
        let physiological_modulation =
            physio_layer::modulate(profile, effective.as_ref(), ctx.mode);

        let inputs = ConfidenceInputs::from_profile(profile);
        let confidence = inputs.score();
        let data_quality = inputs.data_quality();

        let mut adaptation_reasons = vec![format!(
            "{} archetype aligned as '{}'",
            profile.archetype, archetype_considerations.strategic_alignment
        )];
        if effective.is_some() {
            adaptation_reasons.push(format!(
                "intensity modulated to {:.2} from live biometrics",
                physiological_modulation.intensity_adjustment
            ));
        } else {
            adaptation_reasons.push("no physiological data; archetype layer only".to_string());
        }
        for consideration in &physiological_modulation.recovery_considerations {
            adaptation_reasons.push(consideration.clone());
        }

        let personalized_content = PersonalizedContent {
            communication_style: profile.preferences.communication_style,
            content_hints: content_hints(profile),
            intensity_factor: physiological_modulation.intensity_adjustment,
            timing_hints: physiological_modulation.timing_recommendations.clone(),
            motivational_framing: motivational_framing(profile),
        };

        PersonalizationResult {
            interaction_id: InteractionId::new(),
            advisor: ctx.advisor,
            produced_at: Timestamp::now(),
            personalized_content,
            archetype_considerations,
            physiological_modulation,
            confidence,
            confidence_band: ConfidenceBand::from_score(confidence),
            metadata: ResultMetadata {
                mode: ctx.mode,
                processing_micros: started.elapsed().as_micros() as u64,
                data_quality,
                adaptation_reasons,
                affinity: None,
            },
        }
    }
}

fn content_hints(profile: &UserProfile) -> Vec<String> {
    let mut hints = match profile.preferences.detail_level {
        DetailLevel::Concise => vec!["keep answers short; one action per reply".to_string()],
        DetailLevel::Standard => vec!["balance rationale with actionability".to_string()],
        DetailLevel::Thorough => {
            vec!["include the reasoning and supporting data behind advice".to_string()]
        }
    };
    for injury in &profile.constraints.injuries {
        hints.push(format!("avoid aggravating: {}", injury));
    }
    if let Some(minutes) = profile.constraints.weekly_minutes {
        hints.push(format!("fit plans within {} min/week", minutes));
    }
    for goal in &profile.constraints.goals {
        hints.push(format!("tie advice back to goal: {}", goal));
    }
    hints
}

fn motivational_framing(profile: &UserProfile) -> String {
    use crate::domain::profile::{Archetype, CommunicationStyle};
    match (profile.archetype, profile.preferences.communication_style) {
        (Archetype::Longevity, CommunicationStyle::Motivational) => {
            "Celebrate streaks and consistency over single-session wins".to_string()
        }
        (Archetype::Longevity, _) => {
            "Frame progress as compounding health capital".to_string()
        }
        (Archetype::Performance, CommunicationStyle::Motivational) => {
            "Anchor motivation to the next measurable milestone".to_string()
        }
        (Archetype::Performance, _) => {
            "Frame progress against personal bests and training targets".to_string()
        }
    }
}
