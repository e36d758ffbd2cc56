pub mod config;
pub mod error;
pub mod highlight;
pub mod inspection;
pub mod log_entry;
pub mod registry;
pub mod renderer;
pub mod telemetry;

pub use error::ViewerError;
pub use highlight::{HighlightChannel, HighlightSignal};
pub use inspection::{ChatAction, Dispatch, InspectionController};
pub use log_entry::{LogEntry, LogItem, LogLevel};
pub use registry::LogItemRegistry;
pub use renderer::{DisplayNode, ItemRenderer, RenderedEntry};
pub use telemetry::{CommandBus, RemoteCommandBus, TelemetryEmitter};
