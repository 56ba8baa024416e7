//! Advisor affinity scoring and ranking.
//!
//! Scores how relevant each specialized advisor is to a user right now.
//! A learned affinity from past feedback overrides the heuristic entirely;
//! otherwise the score is a neutral 0.5 prior plus archetype, demographic,
//! and biometric deltas, clamped into [0, 1].

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UnitInterval;
use crate::domain::profile::{Advisor, Archetype, LearningFeedback, UserProfile};

/// Neutral prior before any adjustment.
pub const BASE_SCORE: f64 = 0.5;

/// Smoothing factor for learned affinity updates.
pub const LEARNING_RATE: f64 = 0.3;

/// An advisor with its computed affinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedAdvisor {
    pub advisor: Advisor,
    pub score: UnitInterval,
}

/// Stateless affinity scorer shared across requests.
#[derive(Debug, Default)]
pub struct AffinityRanker;

impl AffinityRanker {
    pub fn new() -> Self {
        Self
    }

    /// Affinity of a user for one advisor, in [0, 1].
    pub fn score(&self, profile: &UserProfile, advisor: Advisor) -> UnitInterval {
        if let Some(learned) = profile.learned_affinity(advisor) {
            return learned;
        }

        let mut score = BASE_SCORE;
        score += archetype_delta(profile.archetype, advisor);
        score += demographic_delta(profile, advisor);
        score += biometric_delta(profile, advisor);
        UnitInterval::new(score)
    }

    /// Top-N advisors, descending; ties break on declaration order.
    pub fn rank(&self, profile: &UserProfile, n: usize) -> Vec<RankedAdvisor> {
        let mut ranked = self.affinity_map(profile);
        ranked.truncate(n);
        ranked
    }

    /// All advisors with scores, descending.
    pub fn affinity_map(&self, profile: &UserProfile) -> Vec<RankedAdvisor> {
        let mut ranked: Vec<RankedAdvisor> = Advisor::ALL
            .iter()
            .map(|&advisor| RankedAdvisor {
                advisor,
                score: self.score(profile, advisor),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .value()
                .partial_cmp(&a.score.value())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.advisor.ordinal().cmp(&b.advisor.ordinal()))
        });
        ranked
    }
}

/// Folds one feedback signal into the learned affinity for an advisor.
///
/// The signal blends the effectiveness rating with stated satisfaction
/// and moves the learned value a fraction of the way toward it, so one
/// bad session cannot erase an advisor.
pub fn learn_affinity(profile: &mut UserProfile, advisor: Advisor, feedback: &LearningFeedback) {
    let signal =
        0.5 * (feedback.normalized_effectiveness() + feedback.user_satisfaction.value());
    let current = profile
        .learned_affinity(advisor)
        .unwrap_or(UnitInterval::NEUTRAL)
        .value();
    let updated = (1.0 - LEARNING_RATE) * current + LEARNING_RATE * signal;
    profile
        .learned_affinities
        .insert(advisor, UnitInterval::new(updated));
}

fn archetype_delta(archetype: Archetype, advisor: Advisor) -> f64 {
    match (archetype, advisor) {
        (Archetype::Performance, Advisor::Training) => 0.2,
        (Archetype::Performance, Advisor::Recovery) => 0.05,
        (Archetype::Performance, Advisor::Longevity) => -0.1,
        (Archetype::Longevity, Advisor::Longevity) => 0.2,
        (Archetype::Longevity, Advisor::Nutrition) => 0.1,
        (Archetype::Longevity, Advisor::Recovery) => 0.1,
        (_, Advisor::Sleep) => 0.05,
        _ => 0.0,
    }
}

fn demographic_delta(profile: &UserProfile, advisor: Advisor) -> f64 {
    let Some(age) = profile.demographics.age else {
        return 0.0;
    };
    match advisor {
        Advisor::Longevity if age >= 50 => 0.1,
        Advisor::Training if age >= 50 => -0.05,
        Advisor::Recovery if age >= 40 => 0.05,
        _ => 0.0,
    }
}

fn biometric_delta(profile: &UserProfile, advisor: Advisor) -> f64 {
    let Some(bio) = &profile.biometrics else {
        return 0.0;
    };
    let mut delta = 0.0;
    if advisor == Advisor::Mindset {
        if let Some(stress) = bio.stress_level {
            if stress.value() > 0.7 {
                delta += 0.1;
            }
        }
    }
    if advisor == Advisor::Recovery {
        if let Some(recovery) = bio.recovery_status {
            if recovery.value() < 0.4 {
                delta += 0.1;
            }
        }
    }
    if advisor == Advisor::Sleep {
        if let Some(quality) = bio.sleep_quality {
            if quality.value() < 0.6 {
                delta += 0.1;
            }
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::profile::{BiometricSample, Biometrics, UpdateSource};

    fn profile(archetype: Archetype) -> UserProfile {
        UserProfile::new(UserId::new(), archetype, UnitInterval::new(0.9))
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let mut p = profile(Archetype::Longevity);
        p.demographics.age = Some(62);
        p.biometrics = Some(Biometrics::from_sample(
            &BiometricSample {
                stress_level: Some(UnitInterval::new(0.9)),
                recovery_status: Some(UnitInterval::new(0.1)),
                sleep_quality: Some(UnitInterval::new(0.2)),
                ..Default::default()
            },
            Timestamp::now(),
            UpdateSource::Wearable,
            UnitInterval::ONE,
        ));
        let ranker = AffinityRanker::new();
        for advisor in Advisor::ALL {
            let score = ranker.score(&p, advisor).value();
            assert!((0.0..=1.0).contains(&score), "{advisor}: {score}");
        }
    }

    #[test]
    fn learned_affinity_overrides_heuristics() {
        let mut p = profile(Archetype::Performance);
        p.learned_affinities
            .insert(Advisor::Training, UnitInterval::new(0.05));
        let ranker = AffinityRanker::new();
        // Heuristics would have given Training a strong score.
        assert_eq!(
            ranker.score(&p, Advisor::Training),
            UnitInterval::new(0.05)
        );
    }

    #[test]
    fn performance_archetype_favors_training() {
        let ranker = AffinityRanker::new();
        let top = ranker.rank(&profile(Archetype::Performance), 1);
        assert_eq!(top[0].advisor, Advisor::Training);
    }

    #[test]
    fn longevity_archetype_favors_longevity_advisor() {
        let ranker = AffinityRanker::new();
        let top = ranker.rank(&profile(Archetype::Longevity), 1);
        assert_eq!(top[0].advisor, Advisor::Longevity);
    }

    #[test]
    fn high_stress_boosts_mindset() {
        let mut p = profile(Archetype::Performance);
        let without = AffinityRanker::new().score(&p, Advisor::Mindset);
        p.biometrics = Some(Biometrics::from_sample(
            &BiometricSample {
                stress_level: Some(UnitInterval::new(0.85)),
                ..Default::default()
            },
            Timestamp::now(),
            UpdateSource::Wearable,
            UnitInterval::ONE,
        ));
        let with = AffinityRanker::new().score(&p, Advisor::Mindset);
        assert!(with > without);
    }

    #[test]
    fn ties_break_on_declaration_order() {
        let ranker = AffinityRanker::new();
        let ranked = ranker.affinity_map(&profile(Archetype::Performance));
        for pair in ranked.windows(2) {
            if pair[0].score == pair[1].score {
                assert!(pair[0].advisor.ordinal() < pair[1].advisor.ordinal());
            }
        }
    }

    #[test]
    fn rank_truncates_to_n() {
        let ranker = AffinityRanker::new();
        assert_eq!(ranker.rank(&profile(Archetype::Longevity), 3).len(), 3);
    }

    fn feedback(rating: u8, satisfaction: f64) -> crate::domain::profile::LearningFeedback {
        crate::domain::profile::LearningFeedback::new(
            crate::domain::foundation::InteractionId::new(),
            UnitInterval::new(satisfaction),
            rating,
            Default::default(),
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn learning_moves_affinity_toward_the_signal() {
        let mut p = profile(Archetype::Longevity);
        learn_affinity(&mut p, Advisor::Sleep, &feedback(10, 1.0));
        let first = p.learned_affinity(Advisor::Sleep).unwrap().value();
        assert!(first > 0.5 && first < 1.0);

        learn_affinity(&mut p, Advisor::Sleep, &feedback(10, 1.0));
        let second = p.learned_affinity(Advisor::Sleep).unwrap().value();
        assert!(second > first);
    }

    #[test]
    fn one_bad_session_does_not_erase_an_advisor() {
        let mut p = profile(Archetype::Longevity);
        p.learned_affinities
            .insert(Advisor::Training, UnitInterval::new(0.9));
        learn_affinity(&mut p, Advisor::Training, &feedback(0, 0.0));
        let after = p.learned_affinity(Advisor::Training).unwrap().value();
        assert!(after > 0.5);
    }
}
