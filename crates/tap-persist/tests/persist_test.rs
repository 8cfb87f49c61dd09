use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use tap_message::{BrokerMessage, HeaderValue, Headers};
use tap_persist::reader::{load_json, read_json};
use tap_persist::writer::{save_json, save_split, save_unified, write_body, write_json, Destination};
use tap_persist::PersistentMessageRecord;
use tempfile::TempDir;

fn test_message() -> BrokerMessage {
    let mut headers = Headers::new();
    headers.insert("header".to_string(), "value".into());
    BrokerMessage {
        exchange: "exchange".to_string(),
        routing_key: "routingkey".to_string(),
        priority: 99,
        expiration: "2017-05-22 17:00:00".to_string(),
        content_type: "plain/text".to_string(),
        content_encoding: "utf-8".to_string(),
        message_id: "4711".to_string(),
        timestamp: Utc.with_ymd_and_hms(2009, 11, 10, 23, 0, 0).unwrap(),
        kind: "some type".to_string(),
        correlation_id: "4712".to_string(),
        headers,
        app_id: "123".to_string(),
        user_id: "456".to_string(),
        body: Bytes::from_static(b"simple test message."),
        ..Default::default()
    }
}

const EXPECTED_WITH_BODY: &str = r#"{
  "Headers": {
    "header": "value"
  },
  "ContentType": "plain/text",
  "ContentEncoding": "utf-8",
  "DeliveryMode": 0,
  "Priority": 99,
  "CorrelationID": "4712",
  "ReplyTo": "",
  "Expiration": "2017-05-22 17:00:00",
  "MessageID": "4711",
  "Timestamp": "2009-11-10T23:00:00Z",
  "Type": "some type",
  "UserID": "456",
  "AppID": "123",
  "DeliveryTag": 0,
  "Redelivered": false,
  "Exchange": "exchange",
  "RoutingKey": "routingkey",
  "Body": "c2ltcGxlIHRlc3QgbWVzc2FnZS4="
}
"#;

fn dir_is_empty(dir: &Path) -> bool {
    fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn test_write_json_with_body_matches_golden_output() {
    let mut out = Vec::new();
    write_json(&mut out, true, &test_message()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), EXPECTED_WITH_BODY);
}

#[test]
fn test_write_json_without_body_matches_golden_output() {
    let mut out = Vec::new();
    write_json(&mut out, false, &test_message()).unwrap();

    let expected = EXPECTED_WITH_BODY.replace("\"c2ltcGxlIHRlc3QgbWVzc2FnZS4=\"", "\"\"");
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_body_flag_off_empties_large_body() {
    let mut msg = test_message();
    msg.body = Bytes::from(vec![b'x'; 1 << 20]);

    let mut out = Vec::new();
    write_json(&mut out, false, &msg).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["Body"], "");
}

#[test]
fn test_write_body_to_stream() {
    let mut out = Vec::new();
    write_body(&mut out, &test_message()).unwrap();
    assert_eq!(out, b"simple test message.");
}

#[test]
fn test_save_split() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("test");
    let msg = test_message();

    save_split(&base, &msg).unwrap();

    let body = fs::read(tmp.path().join("test.dat")).unwrap();
    assert_eq!(body, b"simple test message.");

    let meta = load_json(&tmp.path().join("test.json")).unwrap();
    assert_eq!(meta.app_id(), msg.app_id);
    assert_eq!(meta.headers().len(), msg.headers.len());
    assert_eq!(meta.headers()["header"], msg.headers["header"]);
    assert_eq!(meta.timestamp(), msg.timestamp);
    assert_eq!(meta.body(), &msg.body);
}

#[test]
fn test_save_split_to_invalid_dir() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("thispathshouldnotexist").join("test");

    assert!(save_split(&base, &test_message()).is_err());
    assert!(dir_is_empty(tmp.path()));
}

#[test]
fn test_save_json() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("test");
    let msg = test_message();

    save_unified(Destination::Path(&path), true, &msg).unwrap();

    let record = read_json(fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(record.app_id(), msg.app_id);
    assert_eq!(record.headers().len(), msg.headers.len());
    assert_eq!(record.headers()["header"], msg.headers["header"]);
    assert_eq!(record.timestamp(), msg.timestamp);
    assert_eq!(&record.body()[..], b"simple test message.");
}

#[test]
fn test_save_json_to_invalid_dir() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("thispathshouldnotexist").join("test");

    assert!(save_json(&path, true, &test_message()).is_err());
    assert!(dir_is_empty(tmp.path()));
}

#[test]
fn test_binary_body_roundtrip() {
    let mut msg = test_message();
    msg.body = Bytes::from((0..=255u8).rev().collect::<Vec<u8>>());

    let mut out = Vec::new();
    write_json(&mut out, true, &msg).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let decoded = BASE64.decode(value["Body"].as_str().unwrap()).unwrap();
    assert_eq!(decoded, msg.body.to_vec());
}

#[test]
fn test_metadata_fidelity() {
    let mut headers = Headers::new();
    headers.insert("x-int".to_string(), HeaderValue::Int(-3));
    headers.insert("x-bool".to_string(), HeaderValue::Bool(false));
    headers.insert("x-float".to_string(), HeaderValue::Float(0.25));
    headers.insert("x-null".to_string(), HeaderValue::Void);
    headers.insert("x-str".to_string(), "".into());

    let msg = BrokerMessage {
        exchange: "".to_string(),
        routing_key: "a.b.c".to_string(),
        delivery_tag: u64::MAX,
        redelivered: true,
        delivery_mode: 2,
        priority: 0,
        reply_to: "amq.rabbitmq.reply-to".to_string(),
        headers,
        timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        ..Default::default()
    };

    let mut out = Vec::new();
    write_json(&mut out, true, &msg).unwrap();
    let record: PersistentMessageRecord = read_json(&out[..]).unwrap();

    assert_eq!(record.into_message(), msg);
}
