//! UserProfile aggregate root and supporting value objects.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{Timestamp, UnitInterval, UserId};
use crate::domain::personalization::PersonalizationResult;

use super::{
    AdaptationRecord, Advisor, BiomarkerSample, Biomarkers, BiometricSample, Biometrics,
    BoundedLog, LearningFeedback, UpdateSource,
};

/// Retained adaptation history entries.
pub const HISTORY_CAP: usize = 20;
/// Adaptation history entries written to the store.
pub const PERSISTED_HISTORY_CAP: usize = 10;
/// Retained learning feedback entries.
pub const FEEDBACK_CAP: usize = 20;
/// Retained recent personalization results.
pub const RECENT_CAP: usize = 10;

/// Strategic archetype - two mutually exclusive life-stage modes.
///
/// Set once at profile initialization and immutable afterward; changing it
/// requires an explicit re-assessment flow outside this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Healthspan-first: sustainability, consistency, long-horizon markers.
    Longevity,
    /// Output-first: progressive overload, measurable short-term gains.
    Performance,
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Longevity => write!(f, "Longevity"),
            Self::Performance => write!(f, "Performance"),
        }
    }
}

/// Self-reported fitness level, ordinal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

/// Demographic attributes used for affinity adjustments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: Option<u8>,
    pub sex: Option<Sex>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
    Other,
}

/// Practical constraints on guidance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub injuries: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    pub weekly_minutes: Option<u32>,
    #[serde(default)]
    pub goals: Vec<String>,
}

/// Preferred tone of generated guidance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStyle {
    Direct,
    #[default]
    Supportive,
    Analytical,
    Motivational,
}

impl std::fmt::Display for CommunicationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Supportive => write!(f, "supportive"),
            Self::Analytical => write!(f, "analytical"),
            Self::Motivational => write!(f, "motivational"),
        }
    }
}

/// Preferred depth of generated guidance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    Concise,
    #[default]
    Standard,
    Thorough,
}

/// How often the user wants to be asked for feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCadence {
    #[default]
    PerSession,
    Daily,
    Weekly,
}

/// Communication preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub communication_style: CommunicationStyle,
    #[serde(default)]
    pub detail_level: DetailLevel,
    #[serde(default)]
    pub feedback_cadence: FeedbackCadence,
}

fn default_history() -> BoundedLog<AdaptationRecord> {
    BoundedLog::new(HISTORY_CAP)
}

fn default_feedback() -> BoundedLog<LearningFeedback> {
    BoundedLog::new(FEEDBACK_CAP)
}

fn default_recent() -> BoundedLog<PersonalizationResult> {
    BoundedLog::new(RECENT_CAP)
}

/// Per-user aggregate holding everything the engine adapts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub archetype: Archetype,
    /// Certainty of the upstream archetype assessment.
    pub archetype_confidence: UnitInterval,
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    #[serde(default)]
    pub demographics: Demographics,
    pub biometrics: Option<Biometrics>,
    pub biomarkers: Option<Biomarkers>,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub preferences: Preferences,
    /// Learned per-advisor affinity; overrides the heuristic score entirely.
    #[serde(default)]
    pub learned_affinities: HashMap<Advisor, UnitInterval>,
    #[serde(default = "default_history")]
    pub history: BoundedLog<AdaptationRecord>,
    #[serde(default = "default_feedback")]
    pub feedback: BoundedLog<LearningFeedback>,
    #[serde(default = "default_recent")]
    pub recent: BoundedLog<PersonalizationResult>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserProfile {
    /// Creates a fresh profile with the archetype fixed.
    pub fn new(user_id: UserId, archetype: Archetype, archetype_confidence: UnitInterval) -> Self {
        let now = Timestamp::now();
        Self {
            user_id,
            archetype,
            archetype_confidence,
            fitness_level: FitnessLevel::default(),
            demographics: Demographics::default(),
            biometrics: None,
            biomarkers: None,
            constraints: Constraints::default(),
            preferences: Preferences::default(),
            learned_affinities: HashMap::new(),
            history: default_history(),
            feedback: default_feedback(),
            recent: default_recent(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges a biometric sample (per-field last write wins).
    pub fn apply_biometrics(
        &mut self,
        sample: &BiometricSample,
        source: UpdateSource,
        reliability: UnitInterval,
        recorded_at: Timestamp,
    ) {
        match &mut self.biometrics {
            Some(state) => state.apply(sample, recorded_at, source, reliability),
            None => {
                self.biometrics =
                    Some(Biometrics::from_sample(sample, recorded_at, source, reliability));
            }
        }
        self.updated_at = Timestamp::now();
    }

    /// Merges a lab panel (per-marker last write wins).
    pub fn apply_biomarkers(
        &mut self,
        sample: &BiomarkerSample,
        source: UpdateSource,
        reliability: UnitInterval,
        recorded_at: Timestamp,
    ) {
        match &mut self.biomarkers {
            Some(state) => state.apply(sample, recorded_at, source, reliability),
            None => {
                self.biomarkers =
                    Some(Biomarkers::from_sample(sample, recorded_at, source, reliability));
            }
        }
        self.updated_at = Timestamp::now();
    }

    /// Appends an adaptation record and the produced result copy.
    pub fn record_adaptation(&mut self, record: AdaptationRecord, result: PersonalizationResult) {
        self.history.push(record);
        self.recent.push(result);
        self.updated_at = Timestamp::now();
    }

    /// Appends feedback and backfills the matching history entry.
    ///
    /// Returns whether a history entry with the same interaction id was
    /// found; the caller decides how loudly to report a miss.
    pub fn apply_feedback(&mut self, feedback: LearningFeedback) -> bool {
        let mut matched = false;
        for record in self.history.iter_mut() {
            if record.interaction_id == feedback.interaction_id {
                record.effectiveness = Some(feedback.effectiveness_rating);
                matched = true;
                break;
            }
        }
        self.feedback.push(feedback);
        self.updated_at = Timestamp::now();
        matched
    }

    /// Mean effectiveness rating over the retained window, in [0, 1].
    ///
    /// Zero when no feedback exists; that is an answer, not an error.
    pub fn personalization_effectiveness(&self) -> f64 {
        if self.feedback.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .feedback
            .iter()
            .map(LearningFeedback::normalized_effectiveness)
            .sum();
        sum / self.feedback.len() as f64
    }

    /// Learned affinity for an advisor, if feedback has produced one.
    pub fn learned_affinity(&self, advisor: Advisor) -> Option<UnitInterval> {
        self.learned_affinities.get(&advisor).copied()
    }

    /// Populated biometric + biomarker fields.
    pub fn populated_bio_fields(&self) -> usize {
        self.biometrics.as_ref().map_or(0, Biometrics::populated_count)
            + self.biomarkers.as_ref().map_or(0, Biomarkers::populated_count)
    }

    /// Total trackable biometric + biomarker fields.
    pub fn total_bio_fields() -> usize {
        Biometrics::FIELD_COUNT + Biomarkers::FIELD_COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::InteractionId;
    use crate::domain::profile::history::AdaptationKind;

    fn test_profile() -> UserProfile {
        UserProfile::new(UserId::new(), Archetype::Performance, UnitInterval::new(0.9))
    }

    fn test_feedback(id: InteractionId, rating: u8) -> LearningFeedback {
        LearningFeedback::new(
            id,
            UnitInterval::new(0.8),
            rating,
            Default::default(),
            vec![],
        )
        .unwrap()
    }

    fn test_record(id: InteractionId) -> AdaptationRecord {
        AdaptationRecord {
            interaction_id: id,
            timestamp: Timestamp::now(),
            advisor: Advisor::Training,
            kind: AdaptationKind::ArchetypeOnly,
            confidence: UnitInterval::new(0.5),
            effectiveness: None,
        }
    }

    #[test]
    fn new_profile_has_no_bio_data() {
        let profile = test_profile();
        assert!(profile.biometrics.is_none());
        assert!(profile.biomarkers.is_none());
        assert_eq!(profile.populated_bio_fields(), 0);
    }

    #[test]
    fn apply_biometrics_creates_then_merges() {
        let mut profile = test_profile();
        profile.apply_biometrics(
            &BiometricSample {
                sleep_quality: Some(UnitInterval::new(0.9)),
                ..Default::default()
            },
            UpdateSource::Wearable,
            UnitInterval::ONE,
            Timestamp::now(),
        );
        profile.apply_biometrics(
            &BiometricSample {
                stress_level: Some(UnitInterval::new(0.3)),
                ..Default::default()
            },
            UpdateSource::Manual,
            UnitInterval::new(0.8),
            Timestamp::now(),
        );

        let state = profile.biometrics.as_ref().unwrap();
        assert_eq!(state.sleep_quality, Some(UnitInterval::new(0.9)));
        assert_eq!(state.stress_level, Some(UnitInterval::new(0.3)));
        assert_eq!(profile.populated_bio_fields(), 2);
    }

    #[test]
    fn apply_feedback_backfills_matching_history_entry() {
        let mut profile = test_profile();
        let id = InteractionId::new();
        profile.history.push(test_record(id));

        let matched = profile.apply_feedback(test_feedback(id, 8));

        assert!(matched);
        assert_eq!(profile.history.latest().unwrap().effectiveness, Some(8));
        assert_eq!(profile.feedback.len(), 1);
    }

    #[test]
    fn apply_feedback_reports_unmatched_interaction() {
        let mut profile = test_profile();
        profile.history.push(test_record(InteractionId::new()));

        let matched = profile.apply_feedback(test_feedback(InteractionId::new(), 5));

        assert!(!matched);
        // The feedback itself is still retained.
        assert_eq!(profile.feedback.len(), 1);
        assert!(profile.history.latest().unwrap().effectiveness.is_none());
    }

    #[test]
    fn effectiveness_is_zero_without_feedback() {
        assert_eq!(test_profile().personalization_effectiveness(), 0.0);
    }

    #[test]
    fn effectiveness_is_mean_of_normalized_ratings() {
        let mut profile = test_profile();
        profile.apply_feedback(test_feedback(InteractionId::new(), 10));
        profile.apply_feedback(test_feedback(InteractionId::new(), 5));

        let effectiveness = profile.personalization_effectiveness();
        assert!((effectiveness - 0.75).abs() < 1e-9);
    }

    #[test]
    fn feedback_ring_drops_oldest_beyond_capacity() {
        let mut profile = test_profile();
        for i in 0..(FEEDBACK_CAP + 5) {
            profile.apply_feedback(test_feedback(InteractionId::new(), (i % 11) as u8));
        }
        assert_eq!(profile.feedback.len(), FEEDBACK_CAP);
    }

    #[test]
    fn profile_roundtrips_through_json() {
        let mut profile = test_profile();
        profile
            .learned_affinities
            .insert(Advisor::Sleep, UnitInterval::new(0.85));
        let json = serde_json::to_string(&profile).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
