//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `cache` - In-process TTL cache with stale-on-error fallback
//! - `events` - Subscriber fan-out over bounded channels
//! - `http` - REST API surface
//! - `store` - Profile persistence (in-memory, PostgreSQL) plus retry decoration
//! - `websocket` - Real-time biometric ingestion channel

pub mod cache;
pub mod events;
pub mod http;
pub mod store;
pub mod websocket;
