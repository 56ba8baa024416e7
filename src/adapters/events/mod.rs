//! Event delivery adapters.

mod channel;

pub use channel::ChannelSubscriber;
