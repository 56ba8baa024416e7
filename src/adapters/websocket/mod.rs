//! WebSocket adapter - the real-time ingestion channel.
//!
//! Devices and clients push biometric updates over one socket per user.
//! The gateway normalizes frames and hands them to the same ingestion
//! handler the REST fallback uses, so both paths share validation,
//! merge, and fan-out behavior.

pub mod ingest;
pub mod messages;
pub mod reconnect;

pub use ingest::{ws_ingest, WsState, DEFAULT_HEARTBEAT};
pub use messages::{ClientMessage, ServerMessage};
pub use reconnect::{ConnectionMachine, ConnectionState, ReconnectPolicy};
