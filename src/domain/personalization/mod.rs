//! Personalization module - the two-layer adaptation computer.
//!
//! Layer 1 derives archetype-aligned framing from static profile fields
//! and is cacheable per (archetype, style, advisor) tuple. Layer 2 reads
//! live biometrics and biomarkers and modulates intensity and timing; it
//! is only as fresh as the data behind it. Both layers are pure and
//! CPU-bound given a loaded profile.

pub mod archetype_layer;
pub mod computer;
pub mod confidence;
pub mod context;
pub mod physio_layer;
pub mod result;

pub use computer::PersonalizationComputer;
pub use confidence::{ConfidenceInputs, BIOMARKER_STALENESS, BIOMETRIC_STALENESS};
pub use context::{Mode, PersonalizationContext, RequestKind};
pub use result::{
    ArchetypeConsiderations, ConfidenceBand, PersonalizationResult, PersonalizedContent,
    PhysiologicalModulation, ResultMetadata,
};
