//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `profile` - UserProfile aggregate: archetype, biometrics, history rings
//! - `personalization` - Two-layer personalization computer and confidence scoring
//! - `affinity` - Advisor affinity scoring and ranking
//! - `insights` - Derived user insights (archetype analysis, recommendations)

pub mod affinity;
pub mod foundation;
pub mod insights;
pub mod personalization;
pub mod profile;
