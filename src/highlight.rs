use serde::Serialize;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Flag field name on the wire; a stray field of the same name on an
/// activity is dropped so the explicit flag always wins.
const SHOW_IN_INSPECTOR: &str = "showInInspector";

/// One highlight notification pushed to the live webchat view: the activity
/// fields (possibly none) plus the inspector-focus flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightSignal {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(rename = "showInInspector")]
    pub show_in_inspector: bool,
}

impl HighlightSignal {
    /// `{ showInInspector: true }` — inspector focus without carrying
    /// activity fields.
    pub fn inspector_only() -> Self {
        Self {
            fields: Map::new(),
            show_in_inspector: true,
        }
    }

    /// `{ showInInspector: false }` — clears all highlighting.
    pub fn clear() -> Self {
        Self {
            fields: Map::new(),
            show_in_inspector: false,
        }
    }

    /// Merge the activity's own fields with the flag. Non-object activities
    /// degrade to a bare flag rather than failing.
    pub fn from_activity(activity: &Value, show_in_inspector: bool) -> Self {
        let mut fields = activity.as_object().cloned().unwrap_or_default();
        fields.remove(SHOW_IN_INSPECTOR);
        Self {
            fields,
            show_in_inspector,
        }
    }
}

type Handler = Rc<dyn Fn(&HighlightSignal)>;

/// Handle returned by [`HighlightChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

/// One-way push channel to the externally owned live-chat view.
///
/// No acknowledgement and no ordering guarantee beyond call order; once a
/// signal is pushed it cannot be retracted. Single rendering thread only.
#[derive(Default)]
pub struct HighlightChannel {
    subscribers: RefCell<Vec<(u64, Handler)>>,
    next_id: Cell<u64>,
}

impl HighlightChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl Fn(&HighlightSignal) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(handler)));
        Subscription(id)
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.subscribers
            .borrow_mut()
            .retain(|(id, _)| *id != subscription.0);
    }

    pub fn push(&self, signal: &HighlightSignal) {
        // Snapshot the handler list so a subscriber may itself subscribe or
        // unsubscribe while being notified.
        let handlers: Vec<Handler> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(signal);
        }
    }
}
