//! HTTP adapters - REST API implementations.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ApiState;
pub use routes::{api_router, with_request_ids};
