//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;
pub mod locks;

pub use handlers::{
    FeedbackOutcome, GetInsightsHandler, GetInsightsQuery, GetProfileHandler, GetProfileQuery,
    IngestUpdateHandler, InitializeProfileCommand, InitializeProfileHandler,
    InitializeProfileResult, PersonalizeCommand, PersonalizeHandler, RecordFeedbackCommand,
    RecordFeedbackHandler,
};
pub use locks::UserLocks;
