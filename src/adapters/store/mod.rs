//! ProfileStore adapters.

mod memory;
mod postgres;
mod retry;

pub use memory::InMemoryProfileStore;
pub use postgres::PgProfileStore;
pub use retry::{RetryConfig, RetryingStore};
