//! tap-message: Broker delivery model shared by the tap tooling
//!
//! Mirrors the envelope of an AMQP delivery: routing, content and identity
//! attributes, a loosely typed header table and the raw payload.

pub mod header;
pub mod message;
pub mod time;

pub use header::{HeaderValue, Headers};
pub use message::BrokerMessage;
pub use time::{format_rfc3339, unset_timestamp};
