//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the biocoach domain.

mod errors;
mod ids;
mod timestamp;
mod unit;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DeviceId, InteractionId, UserId};
pub use timestamp::Timestamp;
pub use unit::UnitInterval;
