use crate::highlight::{HighlightChannel, HighlightSignal};
use crate::telemetry::TelemetryEmitter;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Store action dispatched by this core. The reducer itself lives outside
/// the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    SetInspectorObjects {
        document_id: String,
        objects: Value,
    },
}

/// Store-dispatch capability, injected so tests can record actions.
pub trait Dispatch {
    fn dispatch(&self, action: ChatAction);
}

/// Orchestrates inspect/highlight/remove-highlight against the webchat
/// highlight channel, the store, and the telemetry bus. All operations are
/// synchronous side effects on the rendering thread.
pub struct InspectionController {
    document_id: String,
    channel: Rc<HighlightChannel>,
    dispatch: Rc<dyn Dispatch>,
    telemetry: TelemetryEmitter,
    /// Owned and updated externally; the controller only reads it.
    currently_inspected: Rc<RefCell<Option<Value>>>,
}

impl InspectionController {
    pub fn new(
        document_id: impl Into<String>,
        channel: Rc<HighlightChannel>,
        dispatch: Rc<dyn Dispatch>,
        telemetry: TelemetryEmitter,
        currently_inspected: Rc<RefCell<Option<Value>>>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            channel,
            dispatch,
            telemetry,
            currently_inspected,
        }
    }

    /// Focus the inspector on `obj`: one bare inspector-focus push and one
    /// store dispatch, nothing else.
    pub fn inspect(&self, obj: Value) {
        self.channel.push(&HighlightSignal::inspector_only());
        self.dispatch.dispatch(ChatAction::SetInspectorObjects {
            document_id: self.document_id.clone(),
            objects: obj,
        });
    }

    /// Highlight `obj` in webchat with inspector focus and record the usage
    /// event. Telemetry always fires; a missing activity type becomes "".
    pub fn inspect_and_highlight_in_webchat(&self, obj: &Value) {
        self.channel
            .push(&HighlightSignal::from_activity(obj, true));
        let activity_type = obj.get("type").and_then(Value::as_str).unwrap_or("");
        self.telemetry
            .track_event("log_inspectActivity", json!({ "type": activity_type }));
    }

    /// Highlight `obj` in webchat without stealing inspector focus.
    pub fn highlight_in_webchat(&self, obj: &Value) {
        self.channel
            .push(&HighlightSignal::from_activity(obj, false));
    }

    /// Drop the hover highlight. If an inspection is still open its
    /// highlight is re-asserted; otherwise highlighting is cleared entirely.
    /// The passed object plays no part in the outcome.
    pub fn remove_highlight_in_webchat(&self, _obj: &Value) {
        // Clone out of the shared handle before pushing: a notified
        // subscriber may write the handle back.
        let current = self.currently_inspected.borrow().clone();
        match current {
            Some(ref activity) if has_truthy_id(activity) => {
                self.channel
                    .push(&HighlightSignal::from_activity(activity, true));
            }
            _ => self.channel.push(&HighlightSignal::clear()),
        }
    }
}

/// "No active inspected activity" is detected by a falsy id field, not by
/// reference absence: an activity with an empty or zero id counts as absent.
fn has_truthy_id(activity: &Value) -> bool {
    match activity.get("id") {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::Bool(b)) => *b,
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}
