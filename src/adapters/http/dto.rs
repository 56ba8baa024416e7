//! HTTP DTOs (Data Transfer Objects) for the personalization API.
//!
//! These types define the JSON request/response structure and serve as
//! the boundary between HTTP and the application layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;
use crate::domain::profile::{
    Archetype, BiomarkerSample, Biomarkers, BiometricSample, Biometrics, Constraints,
    Demographics, FitnessLevel, Preferences, UpdateSource, UserProfile,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to initialize a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeProfileRequest {
    pub archetype: Archetype,
    /// Certainty of the upstream archetype assessment, in [0, 1].
    pub archetype_confidence: f64,
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    #[serde(default)]
    pub demographics: Demographics,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub preferences: Preferences,
}

fn default_manual() -> UpdateSource {
    UpdateSource::Manual
}

/// Biometric submission over the REST fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct BiometricIngestRequest {
    #[serde(flatten)]
    pub sample: BiometricSample,
    #[serde(default = "default_manual")]
    pub source: UpdateSource,
    /// Stated reliability in [0, 1]; defaulted per source when absent.
    pub reliability: Option<f64>,
    pub device_id: Option<String>,
}

/// Lab panel submission.
#[derive(Debug, Clone, Deserialize)]
pub struct BiomarkerIngestRequest {
    #[serde(flatten)]
    pub sample: BiomarkerSample,
    #[serde(default = "default_manual")]
    pub source: UpdateSource,
    /// Stated reliability in [0, 1]; defaulted per source when absent.
    pub reliability: Option<f64>,
}

/// Learning feedback submission.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub interaction_id: String,
    /// Overall satisfaction in [0, 1].
    pub user_satisfaction: f64,
    /// Effectiveness on a 0-10 scale.
    pub effectiveness_rating: u8,
    #[serde(default)]
    pub relevance: u8,
    #[serde(default)]
    pub tone: u8,
    #[serde(default)]
    pub timing: u8,
    #[serde(default)]
    pub actionability: u8,
    #[serde(default)]
    pub behavioral_outcomes: Vec<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Profile view returned by the profile endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub archetype: Archetype,
    pub archetype_confidence: f64,
    pub fitness_level: FitnessLevel,
    pub demographics: Demographics,
    pub constraints: Constraints,
    pub preferences: Preferences,
    pub biometrics: Option<Biometrics>,
    pub biomarkers: Option<Biomarkers>,
    pub learned_affinities: HashMap<String, f64>,
    pub personalization_effectiveness: f64,
    pub adaptations_recorded: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&UserProfile> for ProfileResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            archetype: profile.archetype,
            archetype_confidence: profile.archetype_confidence.value(),
            fitness_level: profile.fitness_level,
            demographics: profile.demographics.clone(),
            constraints: profile.constraints.clone(),
            preferences: profile.preferences,
            biometrics: profile.biometrics.clone(),
            biomarkers: profile.biomarkers.clone(),
            learned_affinities: profile
                .learned_affinities
                .iter()
                .map(|(advisor, score)| (advisor.to_string(), score.value()))
                .collect(),
            personalization_effectiveness: profile.personalization_effectiveness(),
            adaptations_recorded: profile.history.len(),
            created_at: profile.created_at.to_string(),
            updated_at: profile.updated_at.to_string(),
        }
    }
}

/// Response for profile initialization.
#[derive(Debug, Clone, Serialize)]
pub struct InitializeProfileResponse {
    pub created: bool,
    pub profile: ProfileResponse,
}

/// Acknowledgement for feedback; returned regardless of processing.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackAcknowledged {
    pub status: &'static str,
}

impl FeedbackAcknowledged {
    pub fn accepted() -> Self {
        Self { status: "accepted" }
    }
}

/// Standard error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.message().to_string(),
            details: err.details().clone(),
        }
    }
}
