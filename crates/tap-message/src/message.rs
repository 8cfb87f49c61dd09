use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::header::Headers;
use crate::time::unset_timestamp;

/// A delivery as received from the broker.
///
/// Identity attributes the broker left unset are empty strings. An unset
/// timestamp is [`unset_timestamp`], which is what `Default` yields.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokerMessage {
    // routing
    pub exchange: String,
    pub routing_key: String,
    pub delivery_tag: u64,
    pub redelivered: bool,

    // content
    pub content_type: String,
    pub content_encoding: String,
    pub delivery_mode: u8,
    pub priority: u8,

    // identity
    pub message_id: String,
    pub correlation_id: String,
    pub app_id: String,
    pub user_id: String,
    /// AMQP `type` property
    pub kind: String,
    pub reply_to: String,
    pub expiration: String,

    pub headers: Headers,
    pub timestamp: DateTime<Utc>,
    pub body: Bytes,
}

impl Default for BrokerMessage {
    fn default() -> Self {
        Self {
            exchange: String::new(),
            routing_key: String::new(),
            delivery_tag: 0,
            redelivered: false,
            content_type: String::new(),
            content_encoding: String::new(),
            delivery_mode: 0,
            priority: 0,
            message_id: String::new(),
            correlation_id: String::new(),
            app_id: String::new(),
            user_id: String::new(),
            kind: String::new(),
            reply_to: String::new(),
            expiration: String::new(),
            headers: Headers::new(),
            timestamp: unset_timestamp(),
            body: Bytes::new(),
        }
    }
}

impl BrokerMessage {
    /// Message carrying only a payload, every envelope attribute unset.
    pub fn with_body(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }
}
