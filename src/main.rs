use anyhow::{Context, Result};
use chatlog_inspector::config::{self, Cli};
use chatlog_inspector::inspection::{ChatAction, Dispatch, InspectionController};
use chatlog_inspector::log_entry::{self, LogItem};
use chatlog_inspector::renderer::ItemRenderer;
use chatlog_inspector::telemetry::{RemoteCommandBus, TelemetryEmitter};
use chatlog_inspector::{CommandBus, HighlightChannel};
use clap::Parser;
use log::info;
use serde_json::Value;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Stand-in for the external store: logs each dispatched action.
struct LoggingDispatch;

impl Dispatch for LoggingDispatch {
    fn dispatch(&self, action: ChatAction) {
        info!("Store dispatch: {:?}", action);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    simple_logger::SimpleLogger::new().env().init()?;

    info!("Starting chatlog-inspector");

    // Parse command-line arguments
    let cli = Cli::parse();

    // Load configuration
    let config = config::load_config(&cli)?;
    info!("Configuration loaded successfully");

    // Load the captured log entries
    let entries = log_entry::load_entries(Path::new(&config.log_file))
        .with_context(|| format!("Failed to load log file: {}", config.log_file))?;
    info!("Loaded {} log entries", entries.len());

    // Command bus drain task, standing in for the remote transport
    let (bus, mut bus_rx) = RemoteCommandBus::channel();
    let drain_handle = tokio::spawn(async move {
        while let Some(call) = bus_rx.recv().await {
            info!(
                "Command bus: {} {}",
                call.command,
                Value::Array(call.args)
            );
        }
    });

    // Highlight channel subscriber, standing in for the live webchat view
    let channel = Rc::new(HighlightChannel::new());
    channel.subscribe(|signal| {
        info!(
            "Webchat highlight: showInInspector={} fields={}",
            signal.show_in_inspector,
            Value::Object(signal.fields.clone())
        );
    });

    let currently_inspected = Rc::new(RefCell::new(None));
    let controller = InspectionController::new(
        config.document_id.clone(),
        Rc::clone(&channel),
        Rc::new(LoggingDispatch),
        TelemetryEmitter::new(Rc::new(bus) as Rc<dyn CommandBus>),
        Rc::clone(&currently_inspected),
    );

    // Render every entry to stdout
    for entry in &entries {
        let mut renderer = ItemRenderer::new();
        let rendered = renderer.render_entry(entry);
        for node in &rendered.nodes {
            println!("{}  {}", rendered.timestamp, node);
        }
    }

    // Optionally drive the inspection path against one activity
    if let Some(ref wanted) = cli.inspect {
        match find_inspectable(&entries, wanted) {
            Some(obj) => {
                controller.inspect(obj.clone());
                *currently_inspected.borrow_mut() = Some(obj.clone());
                controller.inspect_and_highlight_in_webchat(&obj);
            }
            None => log::warn!("No inspectable activity with id '{}'", wanted),
        }
    }

    // Dropping the controller releases the bus sender, ending the drain task
    drop(controller);
    drain_handle.await?;

    Ok(())
}

fn find_inspectable(entries: &[log_entry::LogEntry], id: &str) -> Option<Value> {
    entries.iter().flat_map(|entry| &entry.items).find_map(|item| match item {
        LogItem::InspectableObject { obj } if obj.get("id").and_then(Value::as_str) == Some(id) => {
            Some(obj.clone())
        }
        _ => None,
    })
}
