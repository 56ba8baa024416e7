//! Biocoach - Hybrid Personalization & Affinity Engine
//!
//! This crate computes per-user behavioral adaptation for a set of
//! specialized conversational advisors: archetype-driven adaptation,
//! physiological modulation from live biometrics, advisor-affinity
//! ranking, and a feedback-driven learning loop.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
