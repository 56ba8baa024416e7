//! Layer 2 - physiological modulation.
//!
//! Reads stored biometrics/biomarkers plus any momentary readings from the
//! request, fills missing unit-scale fields with the neutral 0.5 default,
//! and derives the intensity factor, recovery flags, and insight strings.

use crate::domain::foundation::{Timestamp, UnitInterval};
use crate::domain::profile::{BiometricSample, Biometrics, UpdateSource, UserProfile};

use super::context::Mode;
use super::result::PhysiologicalModulation;

/// Intensity multiplier lower bound.
pub const MIN_INTENSITY: f64 = 0.5;
/// Intensity multiplier upper bound.
pub const MAX_INTENSITY: f64 = 1.5;

/// Sleep quality below which recovery takes priority.
const RECOVERY_SLEEP_QUALITY: f64 = 0.6;
/// Stress level above which recovery takes priority.
const RECOVERY_STRESS_LEVEL: f64 = 0.7;

/// Stored biometrics overlaid with momentary request readings.
///
/// The overlay is computation-local; nothing is persisted.
pub fn effective_biometrics(
    profile: &UserProfile,
    real_time: Option<&BiometricSample>,
) -> Option<Biometrics> {
    let mut effective = profile.biometrics.clone();
    if let Some(sample) = real_time {
        if !sample.is_empty() {
            match &mut effective {
                Some(state) => state.apply(
                    sample,
                    Timestamp::now(),
                    UpdateSource::Api,
                    UnitInterval::ONE,
                ),
                None => {
                    effective = Some(Biometrics::from_sample(
                        sample,
                        Timestamp::now(),
                        UpdateSource::Api,
                        UnitInterval::ONE,
                    ));
                }
            }
        }
    }
    effective
}

/// Derives the physiological modulation for a request.
///
/// Returns neutral modulation when no data exists at all; the computer
/// handles the confidence penalty separately.
pub fn modulate(
    profile: &UserProfile,
    effective: Option<&Biometrics>,
    mode: Mode,
) -> PhysiologicalModulation {
    let Some(bio) = effective else {
        return biomarker_only_modulation(profile, mode);
    };

    let energy = unit_or_neutral(bio.energy_level);
    let stress = unit_or_neutral(bio.stress_level);
    let recovery = unit_or_neutral(bio.recovery_status);
    let sleep_quality = unit_or_neutral(bio.sleep_quality);

    let raw = (1.0 + 0.5 * (energy - 0.5) - 0.4 * (stress - 0.5)) * (0.8 + 0.4 * recovery);
    let intensity = raw.clamp(MIN_INTENSITY, MAX_INTENSITY);

    let mut modulation = PhysiologicalModulation {
        insights: Vec::new(),
        recovery_considerations: Vec::new(),
        timing_recommendations: Vec::new(),
        intensity_adjustment: intensity,
    };

    if sleep_quality < RECOVERY_SLEEP_QUALITY || stress > RECOVERY_STRESS_LEVEL {
        modulation
            .recovery_considerations
            .push("Prioritize recovery before adding load".to_string());
    }
    if recovery < 0.4 {
        modulation
            .recovery_considerations
            .push("Recovery status is low; keep today's volume light".to_string());
    }

    if let Some(hours) = bio.sleep_duration_hours {
        if hours < 6.5 {
            modulation
                .insights
                .push(format!("Short sleep last night ({:.1} h)", hours));
        }
    }
    if let Some(hrv) = bio.hrv_ms {
        if hrv < 40.0 {
            modulation
                .insights
                .push(format!("HRV below typical baseline ({:.0} ms)", hrv));
        }
    }
    if let Some(hr) = bio.resting_hr_bpm {
        if hr > 75.0 {
            modulation
                .insights
                .push(format!("Elevated resting heart rate ({:.0} bpm)", hr));
        }
    }
    if let Some(readiness) = bio.readiness {
        if readiness >= 85.0 {
            modulation
                .insights
                .push(format!("High readiness score ({:.0}/100)", readiness));
        }
    }

    if mode != Mode::Basic {
        append_biomarker_insights(profile, &mut modulation);
    }

    if mode == Mode::Expert {
        if let Some(readiness) = bio.readiness {
            if readiness >= 80.0 {
                modulation
                    .timing_recommendations
                    .push("Front-load demanding work early in the day".to_string());
            }
        }
        if let Some(hours) = bio.sleep_duration_hours {
            if hours < 6.0 {
                modulation
                    .timing_recommendations
                    .push("Defer high-intensity work until after a recovery day".to_string());
            }
        }
    }

    modulation
}

fn biomarker_only_modulation(profile: &UserProfile, mode: Mode) -> PhysiologicalModulation {
    let mut modulation = PhysiologicalModulation::neutral();
    if mode != Mode::Basic {
        append_biomarker_insights(profile, &mut modulation);
    }
    modulation
}

fn append_biomarker_insights(profile: &UserProfile, modulation: &mut PhysiologicalModulation) {
    let Some(markers) = &profile.biomarkers else {
        return;
    };
    if let Some(cortisol) = markers.cortisol_ug_dl {
        if cortisol > 20.0 {
            modulation
                .insights
                .push(format!("Elevated morning cortisol ({:.1} ug/dL)", cortisol));
            modulation
                .recovery_considerations
                .push("Chronic stress markers are elevated; favor parasympathetic work".to_string());
        }
    }
    if let Some(vit_d) = markers.vitamin_d_ng_ml {
        if vit_d < 30.0 {
            modulation
                .insights
                .push(format!("Vitamin D below sufficiency ({:.0} ng/mL)", vit_d));
        }
    }
    if let Some(crp) = markers.crp_mg_l {
        if crp > 3.0 {
            modulation
                .insights
                .push(format!("CRP suggests systemic inflammation ({:.1} mg/L)", crp));
        }
    }
}

fn unit_or_neutral(value: Option<UnitInterval>) -> f64 {
    value.unwrap_or(UnitInterval::NEUTRAL).value()
}
