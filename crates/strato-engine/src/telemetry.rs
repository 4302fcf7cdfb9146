use crate::command::CommandArgs;
use crate::settings::resolve_workspace_path;
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use strato_types::{Result, TelemetryRecord};

/// Fire-and-forget recorder of anonymized option usage.
///
/// Implementations must never propagate a failure: a broken sink cannot
/// abort a command.
pub trait TelemetrySink: Send + Sync {
    fn record(&self, record: TelemetryRecord);
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for std::sync::Arc<T> {
    fn record(&self, record: TelemetryRecord) {
        (**self).record(record);
    }
}

/// Discards everything. Used when telemetry is disabled.
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn record(&self, _record: TelemetryRecord) {}
}

/// Appends records as JSON lines to a file in the workspace directory.
pub struct FileTelemetry {
    path: PathBuf,
}

impl FileTelemetry {
    pub fn new(path: PathBuf) -> Self {
        FileTelemetry { path }
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_workspace_path(None)?.join("telemetry.jsonl"))
    }
}

impl TelemetrySink for FileTelemetry {
    fn record(&self, record: TelemetryRecord) {
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            let _ = writeln!(file, "{}", line);
        }
    }
}

/// Collects records for assertions in tests.
#[derive(Default)]
pub struct MemoryTelemetry {
    records: Mutex<Vec<TelemetryRecord>>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TelemetryRecord> {
        self.records.lock().expect("telemetry lock poisoned").clone()
    }
}

impl TelemetrySink for MemoryTelemetry {
    fn record(&self, record: TelemetryRecord) {
        self.records
            .lock()
            .expect("telemetry lock poisoned")
            .push(record);
    }
}

/// Presence booleans for the named options: `title: true` when the
/// option was passed, never the value itself.
pub fn presence(args: &CommandArgs, names: &[&str]) -> Map<String, Value> {
    let mut properties = Map::new();
    for name in names {
        properties.insert(name.to_string(), Value::Bool(args.has(name)));
    }
    properties
}
