use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::time::format_rfc3339;

/// Header table of a delivery. Ordered so encoded output is deterministic.
pub type Headers = BTreeMap<String, HeaderValue>;

/// A single AMQP table value.
///
/// JSON has no notion of bytes or timestamps, so both are written as
/// strings (base64 and RFC 3339). Reading JSON back yields `String` for
/// either of them.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Void,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Array(Vec<HeaderValue>),
    Table(Headers),
}

impl Serialize for HeaderValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HeaderValue::Void => serializer.serialize_unit(),
            HeaderValue::Bool(b) => serializer.serialize_bool(*b),
            HeaderValue::Int(i) => serializer.serialize_i64(*i),
            // JSON has no NaN or infinity; encoding them would silently become null
            HeaderValue::Float(f) if !f.is_finite() => {
                Err(ser::Error::custom(format!("non-finite float header value: {}", f)))
            }
            HeaderValue::Float(f) => serializer.serialize_f64(*f),
            HeaderValue::String(s) => serializer.serialize_str(s),
            HeaderValue::Bytes(b) => serializer.serialize_str(&BASE64.encode(b)),
            HeaderValue::Timestamp(ts) => serializer.serialize_str(&format_rfc3339(ts)),
            HeaderValue::Array(items) => serializer.collect_seq(items),
            HeaderValue::Table(table) => serializer.collect_map(table),
        }
    }
}

struct HeaderValueVisitor;

impl<'de> Visitor<'de> for HeaderValueVisitor {
    type Value = HeaderValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a header table value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<HeaderValue, E> {
        Ok(HeaderValue::Void)
    }

    fn visit_none<E: de::Error>(self) -> Result<HeaderValue, E> {
        Ok(HeaderValue::Void)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<HeaderValue, D::Error> {
        HeaderValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<HeaderValue, E> {
        Ok(HeaderValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<HeaderValue, E> {
        Ok(HeaderValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<HeaderValue, E> {
        // u64 beyond i64::MAX has no integer slot in an AMQP table
        Ok(i64::try_from(v)
            .map(HeaderValue::Int)
            .unwrap_or(HeaderValue::Float(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<HeaderValue, E> {
        Ok(HeaderValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<HeaderValue, E> {
        Ok(HeaderValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<HeaderValue, E> {
        Ok(HeaderValue::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<HeaderValue, E> {
        Ok(HeaderValue::Bytes(v.to_vec()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<HeaderValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(HeaderValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<HeaderValue, A::Error> {
        let mut table = Headers::new();
        while let Some((key, value)) = map.next_entry()? {
            table.insert(key, value);
        }
        Ok(HeaderValue::Table(table))
    }
}

impl<'de> Deserialize<'de> for HeaderValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(HeaderValueVisitor)
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        HeaderValue::String(v.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(v: String) -> Self {
        HeaderValue::String(v)
    }
}

impl From<i64> for HeaderValue {
    fn from(v: i64) -> Self {
        HeaderValue::Int(v)
    }
}

impl From<bool> for HeaderValue {
    fn from(v: bool) -> Self {
        HeaderValue::Bool(v)
    }
}

impl From<f64> for HeaderValue {
    fn from(v: f64) -> Self {
        HeaderValue::Float(v)
    }
}
