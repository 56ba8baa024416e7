//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod get_insights;
pub mod get_profile;
pub mod ingest_update;
pub mod initialize_profile;
pub mod personalize;
pub mod record_feedback;

#[cfg(test)]
pub mod test_support;

pub use get_insights::{GetInsightsHandler, GetInsightsQuery};
pub use get_profile::{GetProfileHandler, GetProfileQuery};
pub use ingest_update::IngestUpdateHandler;
pub use initialize_profile::{
    InitializeProfileCommand, InitializeProfileHandler, InitializeProfileResult,
};
pub use personalize::{PersonalizeCommand, PersonalizeHandler};
pub use record_feedback::{FeedbackOutcome, RecordFeedbackCommand, RecordFeedbackHandler};
