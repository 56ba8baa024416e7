//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ProfileStore` - Durable profile persistence
//! - `BiometricSubscriber` - Fan-out target for normalized biometric updates

mod profile_store;
mod subscriber;

pub use profile_store::ProfileStore;
pub use subscriber::{BiometricSubscriber, NormalizedUpdate};
