//! Biometric and biomarker state with per-field last-write-wins merge.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Timestamp, UnitInterval, ValidationError};

/// Kind of physiological update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Biometrics,
    Biomarkers,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Biometrics => write!(f, "biometrics"),
            Self::Biomarkers => write!(f, "biomarkers"),
        }
    }
}

/// Where an update came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateSource {
    Manual,
    Device,
    Api,
    Wearable,
}

impl fmt::Display for UpdateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Device => write!(f, "device"),
            Self::Api => write!(f, "api"),
            Self::Wearable => write!(f, "wearable"),
        }
    }
}

/// Default reliability for an update that did not declare one.
///
/// Manual entry is trusted slightly less than instrumented sources;
/// manually-entered lab results a bit more than manual wellness scores.
pub fn default_reliability(kind: UpdateKind, source: UpdateSource) -> UnitInterval {
    match (source, kind) {
        (UpdateSource::Manual, UpdateKind::Biometrics) => UnitInterval::new(0.8),
        (UpdateSource::Manual, UpdateKind::Biomarkers) => UnitInterval::new(0.9),
        _ => UnitInterval::ONE,
    }
}

/// Incoming sparse biometric sample.
///
/// Every field is optional; absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiometricSample {
    pub sleep_quality: Option<UnitInterval>,
    pub sleep_duration_hours: Option<f64>,
    pub stress_level: Option<UnitInterval>,
    pub energy_level: Option<UnitInterval>,
    pub recovery_status: Option<UnitInterval>,
    pub hrv_ms: Option<f64>,
    pub resting_hr_bpm: Option<f64>,
    /// Readiness score on a 0-100 scale.
    pub readiness: Option<f64>,
}

impl BiometricSample {
    /// Checks physical plausibility of the non-normalized fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(hours) = self.sleep_duration_hours {
            if !(0.0..=24.0).contains(&hours) {
                return Err(ValidationError::out_of_range(
                    "sleep_duration_hours",
                    0.0,
                    24.0,
                    hours,
                ));
            }
        }
        if let Some(hrv) = self.hrv_ms {
            if !(0.0..=500.0).contains(&hrv) {
                return Err(ValidationError::out_of_range("hrv_ms", 0.0, 500.0, hrv));
            }
        }
        if let Some(hr) = self.resting_hr_bpm {
            if !(20.0..=250.0).contains(&hr) {
                return Err(ValidationError::out_of_range(
                    "resting_hr_bpm",
                    20.0,
                    250.0,
                    hr,
                ));
            }
        }
        if let Some(readiness) = self.readiness {
            if !(0.0..=100.0).contains(&readiness) {
                return Err(ValidationError::out_of_range(
                    "readiness",
                    0.0,
                    100.0,
                    readiness,
                ));
            }
        }
        Ok(())
    }

    /// True when no field is populated.
    pub fn is_empty(&self) -> bool {
        self.populated_count() == 0
    }

    /// Number of populated fields.
    pub fn populated_count(&self) -> usize {
        [
            self.sleep_quality.is_some(),
            self.sleep_duration_hours.is_some(),
            self.stress_level.is_some(),
            self.energy_level.is_some(),
            self.recovery_status.is_some(),
            self.hrv_ms.is_some(),
            self.resting_hr_bpm.is_some(),
            self.readiness.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count()
    }
}

/// Stored biometric state for a user.
///
/// Superseded field by field on each push (last write wins per field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biometrics {
    pub sleep_quality: Option<UnitInterval>,
    pub sleep_duration_hours: Option<f64>,
    pub stress_level: Option<UnitInterval>,
    pub energy_level: Option<UnitInterval>,
    pub recovery_status: Option<UnitInterval>,
    pub hrv_ms: Option<f64>,
    pub resting_hr_bpm: Option<f64>,
    pub readiness: Option<f64>,
    /// When the most recent sample was applied.
    pub recorded_at: Timestamp,
    /// Source of the most recent sample.
    pub source: UpdateSource,
    /// Reliability tag of the most recent sample.
    pub reliability: UnitInterval,
}

impl Biometrics {
    /// Number of trackable biometric fields.
    pub const FIELD_COUNT: usize = 8;

    /// Creates stored state from a first sample.
    pub fn from_sample(
        sample: &BiometricSample,
        recorded_at: Timestamp,
        source: UpdateSource,
        reliability: UnitInterval,
    ) -> Self {
        let mut state = Self {
            sleep_quality: None,
            sleep_duration_hours: None,
            stress_level: None,
            energy_level: None,
            recovery_status: None,
            hrv_ms: None,
            resting_hr_bpm: None,
            readiness: None,
            recorded_at,
            source,
            reliability,
        };
        state.apply(sample, recorded_at, source, reliability);
        state
    }

    /// Merges a sample: populated fields overwrite, absent fields stay.
    pub fn apply(
        &mut self,
        sample: &BiometricSample,
        recorded_at: Timestamp,
        source: UpdateSource,
        reliability: UnitInterval,
    ) {
        if let Some(v) = sample.sleep_quality {
            self.sleep_quality = Some(v);
        }
        if let Some(v) = sample.sleep_duration_hours {
            self.sleep_duration_hours = Some(v);
        }
        if let Some(v) = sample.stress_level {
            self.stress_level = Some(v);
        }
        if let Some(v) = sample.energy_level {
            self.energy_level = Some(v);
        }
        if let Some(v) = sample.recovery_status {
            self.recovery_status = Some(v);
        }
        if let Some(v) = sample.hrv_ms {
            self.hrv_ms = Some(v);
        }
        if let Some(v) = sample.resting_hr_bpm {
            self.resting_hr_bpm = Some(v);
        }
        if let Some(v) = sample.readiness {
            self.readiness = Some(v);
        }
        self.recorded_at = recorded_at;
        self.source = source;
        self.reliability = reliability;
    }

    /// Number of populated fields.
    pub fn populated_count(&self) -> usize {
        [
            self.sleep_quality.is_some(),
            self.sleep_duration_hours.is_some(),
            self.stress_level.is_some(),
            self.energy_level.is_some(),
            self.recovery_status.is_some(),
            self.hrv_ms.is_some(),
            self.resting_hr_bpm.is_some(),
            self.readiness.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count()
    }
}

/// Incoming sparse lab panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerSample {
    pub cortisol_ug_dl: Option<f64>,
    pub testosterone_ng_dl: Option<f64>,
    pub vitamin_d_ng_ml: Option<f64>,
    pub ferritin_ng_ml: Option<f64>,
    pub crp_mg_l: Option<f64>,
    pub hba1c_percent: Option<f64>,
}

impl BiomarkerSample {
    /// Rejects negative marker values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let markers = [
            ("cortisol_ug_dl", self.cortisol_ug_dl),
            ("testosterone_ng_dl", self.testosterone_ng_dl),
            ("vitamin_d_ng_ml", self.vitamin_d_ng_ml),
            ("ferritin_ng_ml", self.ferritin_ng_ml),
            ("crp_mg_l", self.crp_mg_l),
            ("hba1c_percent", self.hba1c_percent),
        ];
        for (field, value) in markers {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ValidationError::invalid_format(
                        field,
                        "marker values must be non-negative",
                    ));
                }
            }
        }
        Ok(())
    }

    /// True when no marker is populated.
    pub fn is_empty(&self) -> bool {
        self.populated_count() == 0
    }

    /// Number of populated markers.
    pub fn populated_count(&self) -> usize {
        [
            self.cortisol_ug_dl.is_some(),
            self.testosterone_ng_dl.is_some(),
            self.vitamin_d_ng_ml.is_some(),
            self.ferritin_ng_ml.is_some(),
            self.crp_mg_l.is_some(),
            self.hba1c_percent.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count()
    }
}

/// Stored lab-derived state for a user.
///
/// Much lower update frequency than biometrics; the same merge semantics
/// with a longer acceptable staleness window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biomarkers {
    pub cortisol_ug_dl: Option<f64>,
    pub testosterone_ng_dl: Option<f64>,
    pub vitamin_d_ng_ml: Option<f64>,
    pub ferritin_ng_ml: Option<f64>,
    pub crp_mg_l: Option<f64>,
    pub hba1c_percent: Option<f64>,
    pub last_updated: Timestamp,
    pub source: UpdateSource,
    pub reliability: UnitInterval,
}

impl Biomarkers {
    /// Number of trackable markers.
    pub const FIELD_COUNT: usize = 6;

    /// Creates stored state from a first panel.
    pub fn from_sample(
        sample: &BiomarkerSample,
        last_updated: Timestamp,
        source: UpdateSource,
        reliability: UnitInterval,
    ) -> Self {
        let mut state = Self {
            cortisol_ug_dl: None,
            testosterone_ng_dl: None,
            vitamin_d_ng_ml: None,
            ferritin_ng_ml: None,
            crp_mg_l: None,
            hba1c_percent: None,
            last_updated,
            source,
            reliability,
        };
        state.apply(sample, last_updated, source, reliability);
        state
    }

    /// Merges a panel: populated markers overwrite, absent markers stay.
    pub fn apply(
        &mut self,
        sample: &BiomarkerSample,
        last_updated: Timestamp,
        source: UpdateSource,
        reliability: UnitInterval,
    ) {
        if let Some(v) = sample.cortisol_ug_dl {
            self.cortisol_ug_dl = Some(v);
        }
        if let Some(v) = sample.testosterone_ng_dl {
            self.testosterone_ng_dl = Some(v);
        }
        if let Some(v) = sample.vitamin_d_ng_ml {
            self.vitamin_d_ng_ml = Some(v);
        }
        if let Some(v) = sample.ferritin_ng_ml {
            self.ferritin_ng_ml = Some(v);
        }
        if let Some(v) = sample.crp_mg_l {
            self.crp_mg_l = Some(v);
        }
        if let Some(v) = sample.hba1c_percent {
            self.hba1c_percent = Some(v);
        }
        self.last_updated = last_updated;
        self.source = source;
        self.reliability = reliability;
    }

    /// Number of populated markers.
    pub fn populated_count(&self) -> usize {
        [
            self.cortisol_ug_dl.is_some(),
            self.testosterone_ng_dl.is_some(),
            self.vitamin_d_ng_ml.is_some(),
            self.ferritin_ng_ml.is_some(),
            self.crp_mg_l.is_some(),
            self.hba1c_percent.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_with_sleep(quality: f64) -> BiometricSample {
        BiometricSample {
            sleep_quality: Some(UnitInterval::new(quality)),
            ..Default::default()
        }
    }

    #[test]
    fn default_reliability_for_manual_biometrics_is_lower() {
        assert_eq!(
            default_reliability(UpdateKind::Biometrics, UpdateSource::Manual).value(),
            0.8
        );
        assert_eq!(
            default_reliability(UpdateKind::Biomarkers, UpdateSource::Manual).value(),
            0.9
        );
        assert_eq!(
            default_reliability(UpdateKind::Biometrics, UpdateSource::Wearable),
            UnitInterval::ONE
        );
    }

    #[test]
    fn apply_leaves_absent_fields_untouched() {
        let now = Timestamp::now();
        let mut state = Biometrics::from_sample(
            &BiometricSample {
                sleep_quality: Some(UnitInterval::new(0.9)),
                hrv_ms: Some(55.0),
                ..Default::default()
            },
            now,
            UpdateSource::Wearable,
            UnitInterval::ONE,
        );

        state.apply(
            &BiometricSample {
                stress_level: Some(UnitInterval::new(0.4)),
                ..Default::default()
            },
            now,
            UpdateSource::Manual,
            UnitInterval::new(0.8),
        );

        assert_eq!(state.sleep_quality, Some(UnitInterval::new(0.9)));
        assert_eq!(state.hrv_ms, Some(55.0));
        assert_eq!(state.stress_level, Some(UnitInterval::new(0.4)));
        assert_eq!(state.source, UpdateSource::Manual);
    }

    #[test]
    fn conflicting_writes_resolve_last_write_wins_in_order() {
        let now = Timestamp::now();
        let mut state = Biometrics::from_sample(
            &sample_with_sleep(0.3),
            now,
            UpdateSource::Device,
            UnitInterval::ONE,
        );
        state.apply(&sample_with_sleep(0.9), now, UpdateSource::Device, UnitInterval::ONE);
        state.apply(&sample_with_sleep(0.5), now, UpdateSource::Device, UnitInterval::ONE);

        assert_eq!(state.sleep_quality, Some(UnitInterval::new(0.5)));
    }

    #[test]
    fn populated_count_tracks_fields() {
        let now = Timestamp::now();
        let state = Biometrics::from_sample(
            &BiometricSample {
                sleep_quality: Some(UnitInterval::new(0.8)),
                energy_level: Some(UnitInterval::new(0.6)),
                readiness: Some(72.0),
                ..Default::default()
            },
            now,
            UpdateSource::Api,
            UnitInterval::ONE,
        );
        assert_eq!(state.populated_count(), 3);
    }

    #[test]
    fn sample_validation_rejects_implausible_values() {
        let sample = BiometricSample {
            sleep_duration_hours: Some(30.0),
            ..Default::default()
        };
        assert!(sample.validate().is_err());

        let sample = BiometricSample {
            readiness: Some(140.0),
            ..Default::default()
        };
        assert!(sample.validate().is_err());

        assert!(sample_with_sleep(0.7).validate().is_ok());
    }

    #[test]
    fn biomarker_panel_merges_per_marker() {
        let now = Timestamp::now();
        let mut state = Biomarkers::from_sample(
            &BiomarkerSample {
                cortisol_ug_dl: Some(14.0),
                vitamin_d_ng_ml: Some(28.0),
                ..Default::default()
            },
            now,
            UpdateSource::Api,
            UnitInterval::ONE,
        );

        state.apply(
            &BiomarkerSample {
                vitamin_d_ng_ml: Some(41.0),
                ..Default::default()
            },
            now,
            UpdateSource::Api,
            UnitInterval::ONE,
        );

        assert_eq!(state.cortisol_ug_dl, Some(14.0));
        assert_eq!(state.vitamin_d_ng_ml, Some(41.0));
        assert_eq!(state.populated_count(), 2);
    }

    #[test]
    fn biomarker_validation_rejects_negative_markers() {
        let sample = BiomarkerSample {
            crp_mg_l: Some(-1.0),
            ..Default::default()
        };
        assert!(sample.validate().is_err());
    }
}
