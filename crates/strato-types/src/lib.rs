pub mod error;
pub mod output;
pub mod settings;
pub mod telemetry;

pub use error::{Error, Result};
pub use output::OutputMode;
pub use settings::SettingKey;
pub use telemetry::TelemetryRecord;
