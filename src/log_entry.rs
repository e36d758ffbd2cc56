use crate::error::ViewerError;
use chrono::{Local, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One timestamped entry in the activity log, as produced by the upstream
/// log pipeline. Entries and their items are read-only once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Items in render order.
    pub items: Vec<LogItem>,
}

/// Severity attached to plain text items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// A single item inside a log entry.
///
/// The wire shape is `{ "type": "<kind>", "payload": { ... } }`. Items are
/// decoded in two stages: the raw tag/payload pair first, then the payload
/// against the tagged kind. An unrecognized tag becomes `Unsupported` (its
/// payload is discarded) so one such item cannot take the whole entry down;
/// it fails later, at render time, in isolation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum LogItem {
    Text {
        level: LogLevel,
        text: String,
    },
    ExternalLink {
        hyperlink: String,
        text: String,
    },
    OpenAppSettings {
        text: String,
    },
    Exception {
        err: Value,
    },
    InspectableObject {
        obj: Value,
    },
    #[serde(rename_all = "camelCase")]
    NetworkRequest {
        facility: Option<String>,
        body: Value,
        headers: Option<Value>,
        method: String,
        url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    NetworkResponse {
        body: Value,
        headers: Option<Value>,
        status_code: u16,
        status_message: Option<String>,
        src_url: Option<String>,
    },
    NgrokExpiration {
        text: String,
    },
    Unsupported,
}

impl<'de> Deserialize<'de> for LogItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        #[derive(Deserialize)]
        struct RawItem {
            #[serde(rename = "type", default)]
            kind: String,
            #[serde(default)]
            payload: Value,
        }

        #[derive(Deserialize)]
        struct TextPayload {
            level: LogLevel,
            text: String,
        }

        #[derive(Deserialize)]
        struct LinkPayload {
            hyperlink: String,
            text: String,
        }

        #[derive(Deserialize)]
        struct TextOnlyPayload {
            text: String,
        }

        #[derive(Deserialize)]
        struct ExceptionPayload {
            err: Value,
        }

        #[derive(Deserialize)]
        struct ObjPayload {
            obj: Value,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RequestPayload {
            #[serde(default)]
            facility: Option<String>,
            body: Value,
            #[serde(default)]
            headers: Option<Value>,
            method: String,
            #[serde(default)]
            url: Option<String>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ResponsePayload {
            body: Value,
            #[serde(default)]
            headers: Option<Value>,
            status_code: u16,
            #[serde(default)]
            status_message: Option<String>,
            #[serde(default)]
            src_url: Option<String>,
        }

        let raw = RawItem::deserialize(deserializer)?;
        let item = match raw.kind.as_str() {
            "text" => {
                let p: TextPayload =
                    serde_json::from_value(raw.payload).map_err(D::Error::custom)?;
                Self::Text {
                    level: p.level,
                    text: p.text,
                }
            }
            "external-link" => {
                let p: LinkPayload =
                    serde_json::from_value(raw.payload).map_err(D::Error::custom)?;
                Self::ExternalLink {
                    hyperlink: p.hyperlink,
                    text: p.text,
                }
            }
            "open-app-settings" => {
                let p: TextOnlyPayload =
                    serde_json::from_value(raw.payload).map_err(D::Error::custom)?;
                Self::OpenAppSettings { text: p.text }
            }
            "exception" => {
                let p: ExceptionPayload =
                    serde_json::from_value(raw.payload).map_err(D::Error::custom)?;
                Self::Exception { err: p.err }
            }
            "inspectable-object" => {
                let p: ObjPayload =
                    serde_json::from_value(raw.payload).map_err(D::Error::custom)?;
                Self::InspectableObject { obj: p.obj }
            }
            "network-request" => {
                let p: RequestPayload =
                    serde_json::from_value(raw.payload).map_err(D::Error::custom)?;
                Self::NetworkRequest {
                    facility: p.facility,
                    body: p.body,
                    headers: p.headers,
                    method: p.method,
                    url: p.url,
                }
            }
            "network-response" => {
                let p: ResponsePayload =
                    serde_json::from_value(raw.payload).map_err(D::Error::custom)?;
                Self::NetworkResponse {
                    body: p.body,
                    headers: p.headers,
                    status_code: p.status_code,
                    status_message: p.status_message,
                    src_url: p.src_url,
                }
            }
            "ngrok-expiration" => {
                let p: TextOnlyPayload =
                    serde_json::from_value(raw.payload).map_err(D::Error::custom)?;
                Self::NgrokExpiration { text: p.text }
            }
            _ => Self::Unsupported,
        };
        Ok(item)
    }
}

/// Load a captured log file: a JSON array of entries, validated once at the
/// ingestion boundary.
pub fn load_entries(path: &Path) -> Result<Vec<LogEntry>, ViewerError> {
    let raw = fs::read_to_string(path)?;
    let entries = serde_json::from_str(&raw)?;
    Ok(entries)
}

/// Zero-pad a clock component to two digits, keeping the least-significant
/// two digits of an oversized value.
pub fn pad2(value: u32) -> String {
    format!("{:02}", value % 100)
}

/// Format an epoch-ms timestamp as local wall-clock `HH:MM:SS`.
pub fn clock_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(time) => format!(
            "{}:{}:{}",
            pad2(time.hour()),
            pad2(time.minute()),
            pad2(time.second())
        ),
        None => String::from("--:--:--"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pad2_keeps_least_significant_two_digits() {
        assert_eq!(pad2(5), "05");
        assert_eq!(pad2(34), "34");
        assert_eq!(pad2(666), "66");
    }

    #[test]
    fn clock_time_composes_hours_minutes_seconds() {
        let now = Local::now();
        let expected = format!(
            "{}:{}:{}",
            pad2(now.hour()),
            pad2(now.minute()),
            pad2(now.second())
        );
        assert_eq!(clock_time(now.timestamp_millis()), expected);
    }

    #[test]
    fn text_item_parses_from_kebab_case_tag() {
        let item: LogItem = serde_json::from_value(json!({
            "type": "text",
            "payload": { "level": "debug", "text": "some text" }
        }))
        .unwrap();
        assert_eq!(
            item,
            LogItem::Text {
                level: LogLevel::Debug,
                text: "some text".into()
            }
        );
    }

    #[test]
    fn network_response_parses_camel_case_fields() {
        let item: LogItem = serde_json::from_value(json!({
            "type": "network-response",
            "payload": {
                "body": { "some": "data" },
                "statusCode": 404,
                "statusMessage": "Not Found",
                "srcUrl": "http://localhost:3978"
            }
        }))
        .unwrap();
        match item {
            LogItem::NetworkResponse {
                status_code,
                status_message,
                src_url,
                headers,
                ..
            } => {
                assert_eq!(status_code, 404);
                assert_eq!(status_message.as_deref(), Some("Not Found"));
                assert_eq!(src_url.as_deref(), Some("http://localhost:3978"));
                assert!(headers.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_parses_to_unsupported() {
        let item: LogItem = serde_json::from_value(json!({
            "type": "holographic-display",
            "payload": { "text": "hi" }
        }))
        .unwrap();
        assert_eq!(item, LogItem::Unsupported);
    }

    #[test]
    fn unknown_kind_with_payload_leaves_sibling_items_intact() {
        let entries: Vec<LogEntry> = serde_json::from_value(json!([{
            "timestamp": 0,
            "items": [
                { "type": "text", "payload": { "level": "info", "text": "before" } },
                { "type": "holographic-display", "payload": { "rows": [1, 2, 3] } },
                { "type": "text", "payload": { "level": "info", "text": "after" } }
            ]
        }]))
        .unwrap();

        let items = &entries[0].items;
        assert_eq!(items.len(), 3);
        assert!(matches!(&items[0], LogItem::Text { text, .. } if text == "before"));
        assert_eq!(items[1], LogItem::Unsupported);
        assert!(matches!(&items[2], LogItem::Text { text, .. } if text == "after"));
    }

    #[test]
    fn missing_kind_field_parses_to_unsupported() {
        let item: LogItem =
            serde_json::from_value(json!({ "payload": { "text": "hi" } })).unwrap();
        assert_eq!(item, LogItem::Unsupported);
    }

    #[test]
    fn entry_parses_with_items_in_order() {
        let entry: LogEntry = serde_json::from_value(json!({
            "timestamp": 1234567890123i64,
            "items": [
                { "type": "text", "payload": { "level": "info", "text": "first" } },
                { "type": "ngrok-expiration", "payload": { "text": "tunnel expired" } }
            ]
        }))
        .unwrap();
        assert_eq!(entry.timestamp, 1234567890123);
        assert_eq!(entry.items.len(), 2);
        assert_eq!(
            entry.items[1],
            LogItem::NgrokExpiration {
                text: "tunnel expired".into()
            }
        );
    }
}
