use crate::error::ViewerError;
use crate::log_entry::{clock_time, LogEntry, LogItem, LogLevel};
use crate::registry::LogItemRegistry;
use log::warn;
use serde_json::{json, Value};
use std::fmt;

/// Display tree node produced for one log item. Keys are stable within an
/// entry so an ordered-list view can reconcile across re-renders.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayNode {
    Text {
        key: String,
        level: LogLevel,
        text: String,
    },
    ExternalLink {
        key: String,
        hyperlink: String,
        text: String,
    },
    AppSettingsLink {
        key: String,
        text: String,
    },
    Exception {
        key: String,
        text: String,
    },
    /// Clickable entry for an inspectable activity; `obj` is what the
    /// embedding view hands to the controller on click.
    Inspectable {
        key: String,
        label: String,
        obj: Value,
    },
    NetworkRequest {
        key: String,
        facility: Option<String>,
        method: String,
        url: Option<String>,
        obj: Value,
    },
    NetworkResponse {
        key: String,
        status_code: u16,
        status_message: Option<String>,
        src_url: Option<String>,
        obj: Value,
    },
    NgrokExpiration {
        key: String,
        text: String,
    },
}

impl fmt::Display for DisplayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { level, text, .. } => write!(f, "[{:?}] {}", level, text),
            Self::ExternalLink {
                hyperlink, text, ..
            } => write!(f, "{} <{}>", text, hyperlink),
            Self::AppSettingsLink { text, .. } => write!(f, "{} (app settings)", text),
            Self::Exception { text, .. } => write!(f, "[ERROR] {}", text),
            Self::Inspectable { label, .. } => write!(f, "<{}> (click to inspect)", label),
            Self::NetworkRequest {
                facility,
                method,
                url,
                ..
            } => write!(
                f,
                "-> {} {} {}",
                facility.as_deref().unwrap_or("network"),
                method,
                url.as_deref().unwrap_or("")
            ),
            Self::NetworkResponse {
                status_code,
                status_message,
                src_url,
                ..
            } => write!(
                f,
                "<- {} {} {}",
                status_code,
                status_message.as_deref().unwrap_or(""),
                src_url.as_deref().unwrap_or("")
            ),
            Self::NgrokExpiration { text, .. } => {
                write!(f, "{} (edit ngrok settings)", text)
            }
        }
    }
}

/// One rendered log entry: the wall-clock timestamp plus one node per
/// successfully rendered item, in original order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEntry {
    pub timestamp: String,
    pub nodes: Vec<DisplayNode>,
}

/// Maps log items to display nodes for one rendering context. Owns that
/// context's [`LogItemRegistry`]; create a fresh renderer per entry view and
/// drop it when the view goes away.
#[derive(Debug, Default)]
pub struct ItemRenderer {
    registry: LogItemRegistry,
}

impl ItemRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &LogItemRegistry {
        &self.registry
    }

    /// Render every item of the entry in order. A failing item is logged and
    /// skipped; its siblings still render.
    pub fn render_entry(&mut self, entry: &LogEntry) -> RenderedEntry {
        let mut nodes = Vec::with_capacity(entry.items.len());
        for (index, item) in entry.items.iter().enumerate() {
            let key = format!("item{}", index);
            match self.render_item(item, &key) {
                Ok(node) => nodes.push(node),
                Err(e) => warn!("Skipping log item '{}': {}", key, e),
            }
        }
        RenderedEntry {
            timestamp: clock_time(entry.timestamp),
            nodes,
        }
    }

    /// Map one item to a display node. Pure field-to-node mapping except for
    /// inspectable objects, which register their id (idempotently) so the
    /// same object is surfaced once per rendering context.
    pub fn render_item(&mut self, item: &LogItem, key: &str) -> Result<DisplayNode, ViewerError> {
        match item {
            LogItem::Text { level, text } => Ok(DisplayNode::Text {
                key: key.to_string(),
                level: *level,
                text: text.clone(),
            }),
            LogItem::ExternalLink { hyperlink, text } => Ok(DisplayNode::ExternalLink {
                key: key.to_string(),
                hyperlink: hyperlink.clone(),
                text: text.clone(),
            }),
            LogItem::OpenAppSettings { text } => Ok(DisplayNode::AppSettingsLink {
                key: key.to_string(),
                text: text.clone(),
            }),
            LogItem::Exception { err } => Ok(DisplayNode::Exception {
                key: key.to_string(),
                text: match err.as_str() {
                    Some(s) => s.to_string(),
                    None => err.to_string(),
                },
            }),
            LogItem::InspectableObject { obj } => {
                if let Some(id) = obj.get("id").and_then(Value::as_str) {
                    self.registry.mark_seen(id);
                }
                let label = obj
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("object")
                    .to_string();
                Ok(DisplayNode::Inspectable {
                    key: key.to_string(),
                    label,
                    obj: obj.clone(),
                })
            }
            LogItem::NetworkRequest {
                facility,
                body,
                headers,
                method,
                url,
            } => Ok(DisplayNode::NetworkRequest {
                key: key.to_string(),
                facility: facility.clone(),
                method: method.clone(),
                url: url.clone(),
                obj: json!({
                    "facility": facility,
                    "body": body,
                    "headers": headers,
                    "method": method,
                    "url": url,
                }),
            }),
            LogItem::NetworkResponse {
                body,
                headers,
                status_code,
                status_message,
                src_url,
            } => Ok(DisplayNode::NetworkResponse {
                key: key.to_string(),
                status_code: *status_code,
                status_message: status_message.clone(),
                src_url: src_url.clone(),
                obj: json!({
                    "body": body,
                    "headers": headers,
                    "statusCode": status_code,
                    "statusMessage": status_message,
                    "srcUrl": src_url,
                }),
            }),
            LogItem::NgrokExpiration { text } => Ok(DisplayNode::NgrokExpiration {
                key: key.to_string(),
                text: text.clone(),
            }),
            LogItem::Unsupported => Err(ViewerError::UnsupportedItemKind),
        }
    }
}
