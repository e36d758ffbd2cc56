use crate::error::ViewerError;
use log::warn;
use serde_json::Value;
use std::rc::Rc;
use tokio::sync::mpsc;

/// Command name for usage-tracking events.
pub const TRACK_EVENT: &str = "Telemetry.TrackEvent";

/// One invocation forwarded to the remote command transport.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandCall {
    pub command: String,
    pub args: Vec<Value>,
}

/// Capability for issuing remote commands. Injected into the controller's
/// configuration so tests can substitute a recording double instead of
/// reaching for a global command service.
pub trait CommandBus {
    fn call(&self, command: &str, args: Vec<Value>) -> Result<(), ViewerError>;
}

/// Production-shaped bus: forwards calls over an unbounded mpsc sender
/// without blocking. The receiver side belongs to the externally owned
/// transport task.
pub struct RemoteCommandBus {
    tx: mpsc::UnboundedSender<CommandCall>,
}

impl RemoteCommandBus {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CommandCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CommandBus for RemoteCommandBus {
    fn call(&self, command: &str, args: Vec<Value>) -> Result<(), ViewerError> {
        self.tx
            .send(CommandCall {
                command: command.to_string(),
                args,
            })
            .map_err(|_| ViewerError::BusError("command bus receiver dropped".to_string()))
    }
}

/// Best-effort wrapper over the command bus. A failed call is logged and
/// dropped; highlighting and inspection never wait on telemetry.
pub struct TelemetryEmitter {
    bus: Rc<dyn CommandBus>,
}

impl TelemetryEmitter {
    pub fn new(bus: Rc<dyn CommandBus>) -> Self {
        Self { bus }
    }

    pub fn track_event(&self, event: &str, properties: Value) {
        let args = vec![Value::String(event.to_string()), properties];
        if let Err(e) = self.bus.call(TRACK_EVENT, args) {
            warn!("Telemetry event '{}' dropped: {}", event, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingBus {
        calls: RefCell<Vec<CommandCall>>,
        fail: bool,
    }

    impl CommandBus for RecordingBus {
        fn call(&self, command: &str, args: Vec<Value>) -> Result<(), ViewerError> {
            if self.fail {
                return Err(ViewerError::BusError("transport down".to_string()));
            }
            self.calls.borrow_mut().push(CommandCall {
                command: command.to_string(),
                args,
            });
            Ok(())
        }
    }

    #[test]
    fn track_event_issues_one_bus_call() {
        let bus = Rc::new(RecordingBus::default());
        let emitter = TelemetryEmitter::new(Rc::clone(&bus) as Rc<dyn CommandBus>);

        emitter.track_event("log_inspectActivity", json!({ "type": "message" }));

        let calls = bus.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, TRACK_EVENT);
        assert_eq!(
            calls[0].args,
            vec![json!("log_inspectActivity"), json!({ "type": "message" })]
        );
    }

    #[test]
    fn track_event_swallows_bus_failure() {
        let bus = Rc::new(RecordingBus {
            fail: true,
            ..RecordingBus::default()
        });
        let emitter = TelemetryEmitter::new(Rc::clone(&bus) as Rc<dyn CommandBus>);

        // Must not panic or propagate.
        emitter.track_event("log_inspectActivity", json!({ "type": "" }));
        assert!(bus.calls.borrow().is_empty());
    }

    #[test]
    fn remote_bus_forwards_calls_over_the_channel() {
        let (bus, mut rx) = RemoteCommandBus::channel();
        bus.call(TRACK_EVENT, vec![json!("evt"), json!({})]).unwrap();

        let call = rx.try_recv().unwrap();
        assert_eq!(call.command, TRACK_EVENT);
        assert_eq!(call.args, vec![json!("evt"), json!({})]);
    }

    #[test]
    fn remote_bus_errors_when_receiver_is_gone() {
        let (bus, rx) = RemoteCommandBus::channel();
        drop(rx);
        assert!(bus.call(TRACK_EVENT, Vec::new()).is_err());
    }
}
