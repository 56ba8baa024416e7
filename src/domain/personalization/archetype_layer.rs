//! Layer 1 - archetype adaptation.
//!
//! A deterministic derivation over static profile fields. The full input
//! space is small (2 archetypes x 4 styles x 6 advisors), so the table is
//! precomputed once and lookups are clone-outs.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::domain::profile::{Advisor, Archetype, CommunicationStyle, Preferences};

use super::result::ArchetypeConsiderations;

static ALIGNMENT_TABLE: Lazy<
    HashMap<(Archetype, CommunicationStyle, Advisor), ArchetypeConsiderations>,
> = Lazy::new(|| {
    let mut table = HashMap::new();
    for archetype in [Archetype::Longevity, Archetype::Performance] {
        for style in [
            CommunicationStyle::Direct,
            CommunicationStyle::Supportive,
            CommunicationStyle::Analytical,
            CommunicationStyle::Motivational,
        ] {
            for advisor in Advisor::ALL {
                table.insert((archetype, style, advisor), derive(archetype, style, advisor));
            }
        }
    }
    table
});

/// Looks up Layer 1 considerations from the precomputed table.
pub fn archetype_considerations(
    archetype: Archetype,
    preferences: &Preferences,
    advisor: Advisor,
) -> ArchetypeConsiderations {
    ALIGNMENT_TABLE
        .get(&(archetype, preferences.communication_style, advisor))
        .cloned()
        .unwrap_or_else(|| derive(archetype, preferences.communication_style, advisor))
}

fn derive(
    archetype: Archetype,
    style: CommunicationStyle,
    advisor: Advisor,
) -> ArchetypeConsiderations {
    ArchetypeConsiderations {
        strategic_alignment: strategic_alignment(archetype, advisor),
        preference_matches: preference_matches(archetype, style),
        approach_optimization: approach_optimization(archetype, advisor),
    }
}

fn strategic_alignment(archetype: Archetype, advisor: Advisor) -> String {
    let label = match (archetype, advisor) {
        (Archetype::Longevity, Advisor::Training) => "sustainable capacity building",
        (Archetype::Longevity, Advisor::Nutrition) => "metabolic health maintenance",
        (Archetype::Longevity, Advisor::Recovery) => "recovery as a primary input",
        (Archetype::Longevity, Advisor::Sleep) => "sleep as a longevity lever",
        (Archetype::Longevity, Advisor::Mindset) => "low-stress consistency",
        (Archetype::Longevity, Advisor::Longevity) => "healthspan-first planning",
        (Archetype::Performance, Advisor::Training) => "progressive overload focus",
        (Archetype::Performance, Advisor::Nutrition) => "fueling for output",
        (Archetype::Performance, Advisor::Recovery) => "recovery in service of load",
        (Archetype::Performance, Advisor::Sleep) => "sleep as a performance multiplier",
        (Archetype::Performance, Advisor::Mindset) => "competitive drive channeling",
        (Archetype::Performance, Advisor::Longevity) => "durability alongside output",
    };
    label.to_string()
}

fn preference_matches(archetype: Archetype, style: CommunicationStyle) -> Vec<String> {
    let mut matches = vec![format!("{} tone", style)];
    match style {
        CommunicationStyle::Direct => {
            matches.push("lead with the recommendation".to_string());
        }
        CommunicationStyle::Supportive => {
            matches.push("acknowledge effort before correcting".to_string());
        }
        CommunicationStyle::Analytical => {
            matches.push("show the numbers behind the advice".to_string());
        }
        CommunicationStyle::Motivational => {
            matches.push("frame advice around momentum".to_string());
        }
    }
    match archetype {
        Archetype::Longevity => {
            matches.push("emphasize long-horizon trends over daily swings".to_string());
        }
        Archetype::Performance => {
            matches.push("tie advice to measurable short-term gains".to_string());
        }
    }
    matches
}

fn approach_optimization(archetype: Archetype, advisor: Advisor) -> String {
    match archetype {
        Archetype::Longevity => format!(
            "Keep {} guidance conservative by default; escalate only on sustained readiness.",
            advisor
        ),
        Archetype::Performance => format!(
            "Bias {} guidance toward progression; pull back only on clear recovery deficits.",
            advisor
        ),
    }
}
