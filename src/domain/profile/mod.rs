//! Profile module - UserProfile aggregate and live physiological state.
//!
//! The UserProfile is the per-user aggregate that persists across requests.
//! It carries:
//!
//! - **Archetype** - one of two mutually exclusive strategic modes, set once
//!   at initialization and immutable afterward
//! - **Biometrics / Biomarkers** - sparse, last-write-wins physiological
//!   state pushed by the ingestion gateway
//! - **Constraints & Preferences** - static adaptation inputs
//! - **Bounded history rings** - adaptation records, learning feedback, and
//!   recent personalization results, all drop-oldest
//!
//! # Domain Invariants
//!
//! 1. Each profile belongs to exactly one user
//! 2. Archetype is assigned at most once per initialization
//! 3. Absent biometric fields mean "unknown", never zero
//! 4. History rings never exceed their capacity
//! 5. Profiles are never hard-deleted by this engine

pub mod advisor;
pub mod biometrics;
pub mod feedback;
pub mod history;
pub mod profile;

pub use advisor::Advisor;
pub use biometrics::{
    default_reliability, BiomarkerSample, Biomarkers, BiometricSample, Biometrics, UpdateKind,
    UpdateSource,
};
pub use feedback::{FeedbackBreakdown, LearningFeedback};
pub use history::{AdaptationKind, AdaptationRecord, BoundedLog};
pub use profile::{
    Archetype, CommunicationStyle, Constraints, Demographics, DetailLevel, FeedbackCadence,
    FitnessLevel, Preferences, Sex, UserProfile, FEEDBACK_CAP, HISTORY_CAP,
    PERSISTED_HISTORY_CAP, RECENT_CAP,
};
