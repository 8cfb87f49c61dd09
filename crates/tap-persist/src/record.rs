//! Serializable form of a delivery.
//!
//! `PersistentMessageRecord` is what both writer strategies encode. Field
//! names and their order are a compatibility contract with downstream tools
//! that diff saved messages, see [`FIELD_ORDER`].

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tap_message::{BrokerMessage, Headers};

/// JSON keys of a record, in the order they are written.
pub const FIELD_ORDER: [&str; 18] = [
    "Headers",
    "ContentType",
    "ContentEncoding",
    "DeliveryMode",
    "Priority",
    "CorrelationID",
    "ReplyTo",
    "Expiration",
    "MessageID",
    "Timestamp",
    "Type",
    "UserID",
    "AppID",
    "DeliveryTag",
    "Redelivered",
    "Exchange",
    "RoutingKey",
    "Body",
];

/// Metadata and payload of one delivery, ready to be encoded.
///
/// Field declaration order is the serialized order and must stay in sync
/// with [`FIELD_ORDER`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistentMessageRecord {
    #[serde(rename = "Headers", deserialize_with = "null_as_default")]
    headers: Headers,
    #[serde(rename = "ContentType")]
    content_type: String,
    #[serde(rename = "ContentEncoding")]
    content_encoding: String,
    #[serde(rename = "DeliveryMode")]
    delivery_mode: u8,
    #[serde(rename = "Priority")]
    priority: u8,
    #[serde(rename = "CorrelationID")]
    correlation_id: String,
    #[serde(rename = "ReplyTo")]
    reply_to: String,
    #[serde(rename = "Expiration")]
    expiration: String,
    #[serde(rename = "MessageID")]
    message_id: String,
    #[serde(rename = "Timestamp", with = "rfc3339")]
    timestamp: DateTime<Utc>,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "UserID")]
    user_id: String,
    #[serde(rename = "AppID")]
    app_id: String,
    #[serde(rename = "DeliveryTag")]
    delivery_tag: u64,
    #[serde(rename = "Redelivered")]
    redelivered: bool,
    #[serde(rename = "Exchange")]
    exchange: String,
    #[serde(rename = "RoutingKey")]
    routing_key: String,
    #[serde(rename = "Body", with = "base64_body")]
    body: Bytes,
}

impl PersistentMessageRecord {
    pub fn from_message(msg: &BrokerMessage) -> Self {
        Self {
            headers: msg.headers.clone(),
            content_type: msg.content_type.clone(),
            content_encoding: msg.content_encoding.clone(),
            delivery_mode: msg.delivery_mode,
            priority: msg.priority,
            correlation_id: msg.correlation_id.clone(),
            reply_to: msg.reply_to.clone(),
            expiration: msg.expiration.clone(),
            message_id: msg.message_id.clone(),
            timestamp: msg.timestamp,
            kind: msg.kind.clone(),
            user_id: msg.user_id.clone(),
            app_id: msg.app_id.clone(),
            delivery_tag: msg.delivery_tag,
            redelivered: msg.redelivered,
            exchange: msg.exchange.clone(),
            routing_key: msg.routing_key.clone(),
            body: msg.body.clone(),
        }
    }

    /// Same record with an empty body. The `Body` field is still written.
    pub fn without_body(self) -> Self {
        self.with_body(Bytes::new())
    }

    /// Same record carrying `body` instead.
    pub fn with_body(self, body: Bytes) -> Self {
        Self { body, ..self }
    }

    pub fn into_message(self) -> BrokerMessage {
        BrokerMessage {
            exchange: self.exchange,
            routing_key: self.routing_key,
            delivery_tag: self.delivery_tag,
            redelivered: self.redelivered,
            content_type: self.content_type,
            content_encoding: self.content_encoding,
            delivery_mode: self.delivery_mode,
            priority: self.priority,
            message_id: self.message_id,
            correlation_id: self.correlation_id,
            app_id: self.app_id,
            user_id: self.user_id,
            kind: self.kind,
            reply_to: self.reply_to,
            expiration: self.expiration,
            headers: self.headers,
            timestamp: self.timestamp,
            body: self.body,
        }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content_encoding(&self) -> &str {
        &self.content_encoding
    }

    pub fn delivery_mode(&self) -> u8 {
        self.delivery_mode
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn reply_to(&self) -> &str {
        &self.reply_to
    }

    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// AMQP `type` property
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn delivery_tag(&self) -> u64 {
        self.delivery_tag
    }

    pub fn redelivered(&self) -> bool {
        self.redelivered
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn routing_key(&self) -> &str {
        &self.routing_key
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Record of an unset delivery; fills fields missing from decoded input.
impl Default for PersistentMessageRecord {
    fn default() -> Self {
        Self::from_message(&BrokerMessage::default())
    }
}

impl From<&BrokerMessage> for PersistentMessageRecord {
    fn from(msg: &BrokerMessage) -> Self {
        Self::from_message(msg)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 in UTC; whole seconds unless the instant has a sub-second part.
mod rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};
    use tap_message::format_rfc3339;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_rfc3339(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

/// Standard padded base64; `""` and `null` both mean no body.
mod base64_body {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use bytes::Bytes;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => BASE64.decode(s).map(Bytes::from).map_err(de::Error::custom),
            None => Ok(Bytes::new()),
        }
    }
}
