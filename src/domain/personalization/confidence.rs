//! Confidence scoring for personalization results.
//!
//! Confidence blends three signals: data completeness (capped weight),
//! recency of the last physiological update against the staleness window,
//! and the certainty of the upstream archetype assessment.

use chrono::Duration;
use once_cell::sync::Lazy;

use crate::domain::foundation::UnitInterval;
use crate::domain::profile::UserProfile;

/// Acceptable age of biometric data before it stops contributing.
pub static BIOMETRIC_STALENESS: Lazy<Duration> = Lazy::new(|| Duration::hours(24));

/// Acceptable age of lab biomarkers; lab panels move slowly.
pub static BIOMARKER_STALENESS: Lazy<Duration> = Lazy::new(|| Duration::days(90));

const COMPLETENESS_WEIGHT: f64 = 0.5;
const RECENCY_WEIGHT: f64 = 0.3;
const ARCHETYPE_WEIGHT: f64 = 0.2;

/// Confidence never drops below this; a Layer-1-only answer still counts.
pub const CONFIDENCE_FLOOR: f64 = 0.1;

/// The itemized signals behind a confidence score, kept for explainability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInputs {
    pub completeness: f64,
    pub recency: f64,
    pub archetype_confidence: f64,
}

impl ConfidenceInputs {
    /// Derives the inputs from a profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        let completeness =
            profile.populated_bio_fields() as f64 / UserProfile::total_bio_fields() as f64;

        // Biometrics dominate recency when present; a fresh lab panel alone
        // still earns partial credit on its own, longer window.
        let recency = if let Some(bio) = &profile.biometrics {
            linear_recency(bio.recorded_at.age(), *BIOMETRIC_STALENESS)
        } else if let Some(markers) = &profile.biomarkers {
            linear_recency(markers.last_updated.age(), *BIOMARKER_STALENESS)
        } else {
            0.0
        };

        Self {
            completeness,
            recency,
            archetype_confidence: profile.archetype_confidence.value(),
        }
    }

    /// Weighted confidence score with its floor applied.
    pub fn score(&self) -> UnitInterval {
        let weighted = COMPLETENESS_WEIGHT * self.completeness
            + RECENCY_WEIGHT * self.recency
            + ARCHETYPE_WEIGHT * self.archetype_confidence;
        UnitInterval::new(weighted.max(CONFIDENCE_FLOOR))
    }

    /// Data quality: completeness discounted by recency. Zero without data.
    pub fn data_quality(&self) -> UnitInterval {
        UnitInterval::new(self.completeness * self.recency)
    }
}

fn linear_recency(age: Duration, window: Duration) -> f64 {
    let window_secs = window.num_seconds() as f64;
    if window_secs <= 0.0 {
        return 0.0;
    }
    let age_secs = age.num_seconds().max(0) as f64;
    (1.0 - age_secs / window_secs).max(0.0)
}
