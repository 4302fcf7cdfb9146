use serde_json::Value;
use std::sync::Mutex;

/// The logging surface handed to command bodies.
///
/// `log`/`log_raw` carry primary result data and end up on stdout;
/// `log_to_stderr` carries progress narration and diagnostics. The two
/// are never conflated, so piping a command's stdout to another tool
/// sees only result data.
pub trait Logger: Send + Sync {
    /// Result data, projected and rendered per the active output mode.
    fn log(&self, value: &Value);

    /// Result data, bypassing projection and pretty-printing.
    fn log_raw(&self, value: &Value);

    /// Diagnostics channel, used for narration under `--verbose` and
    /// `--debug`.
    fn log_to_stderr(&self, message: &str);
}

/// Where rendered output lines ultimately go.
pub trait OutputSink: Send + Sync {
    fn out(&self, line: &str);
    fn err(&self, line: &str);
}

/// Writes to the process stdout/stderr.
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn out(&self, line: &str) {
        println!("{}", line);
    }

    fn err(&self, line: &str) {
        eprintln!("{}", line);
    }
}

/// Captures output lines for assertions in tests.
#[derive(Default)]
pub struct MemorySink {
    stdout: Mutex<Vec<String>>,
    stderr: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout.lock().expect("sink lock poisoned").clone()
    }

    pub fn stderr_lines(&self) -> Vec<String> {
        self.stderr.lock().expect("sink lock poisoned").clone()
    }
}

impl OutputSink for MemorySink {
    fn out(&self, line: &str) {
        self.stdout
            .lock()
            .expect("sink lock poisoned")
            .push(line.to_string());
    }

    fn err(&self, line: &str) {
        self.stderr
            .lock()
            .expect("sink lock poisoned")
            .push(line.to_string());
    }
}

/// Captures a nested command's structured result instead of rendering
/// it; the outer command decides what, if anything, to print.
/// Diagnostics still flow to the caller's logger so nested invocations
/// share the same stderr stream.
pub struct CollectingLogger<'a> {
    outer: &'a dyn Logger,
    values: Mutex<Vec<Value>>,
}

impl<'a> CollectingLogger<'a> {
    pub fn new(outer: &'a dyn Logger) -> Self {
        CollectingLogger {
            outer,
            values: Mutex::new(Vec::new()),
        }
    }

    /// The captured output: `Null` when the nested command logged
    /// nothing, the single value when it logged once, an array
    /// otherwise.
    pub fn into_result(self) -> Value {
        let mut values = self.values.into_inner().expect("logger lock poisoned");
        match values.len() {
            0 => Value::Null,
            1 => values.remove(0),
            _ => Value::Array(values),
        }
    }
}

impl Logger for CollectingLogger<'_> {
    fn log(&self, value: &Value) {
        self.values
            .lock()
            .expect("logger lock poisoned")
            .push(value.clone());
    }

    fn log_raw(&self, value: &Value) {
        self.values
            .lock()
            .expect("logger lock poisoned")
            .push(value.clone());
    }

    fn log_to_stderr(&self, message: &str) {
        self.outer.log_to_stderr(message);
    }
}
