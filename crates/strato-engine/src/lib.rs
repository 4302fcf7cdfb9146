// NOTE: Engine Architecture Rationale
//
// Why a registry of trait objects (not one big enum)?
// - The CLI hosts hundreds of thin commands; adding one must not touch a
//   central match statement
// - Aliases resolve to the same Arc, so deprecated names stay free
// - Metadata (options, option sets, default properties) is introspectable
//   for help, shell completion and the validation pipeline
//
// Why declarative option specs (not clap derive)?
// - Commands are registered at runtime; the front-end builds its parser
//   from the schema, so the schema is the single source of truth
// - Required-ness lives in the spec ("<value>" vs "[value]") but is
//   enforced by validators, so cross-field rules see the full picture
//
// Why a single invoke() pipeline?
// - parse -> option sets -> validators -> confirm -> action -> project
//   is the same for every command; commands only contribute metadata and
//   an action body
// - Telemetry is recorded at one point in that pipeline, so "exactly once
//   per invocation attempt" holds by construction

pub mod client;
pub mod command;
pub mod confirm;
pub mod engine;
pub mod logger;
pub mod option;
pub mod option_set;
pub mod output;
pub mod registry;
pub mod settings;
pub mod telemetry;
pub mod validate;

pub use strato_types::{Error, OutputMode, Result, SettingKey, TelemetryRecord};

pub use client::{ErrorShape, ServiceClient, ServiceError};
pub use command::{Command, CommandArgs, CommandInfo};
pub use confirm::{Approval, ConsolePrompt, PromptProvider, StaticPrompt};
pub use engine::{CommandContext, Engine};
pub use logger::{CollectingLogger, ConsoleSink, Logger, MemorySink, OutputSink};
pub use option::{CommandOption, ValueKind};
pub use option_set::{OptionSet, OptionSetMode};
pub use output::{CsvOptions, ProjectedLogger};
pub use registry::CommandRegistry;
pub use settings::{MemoryBackend, SettingsBackend, SettingsStore, TomlFileBackend};
pub use telemetry::{FileTelemetry, MemoryTelemetry, NullTelemetry, TelemetrySink};
pub use validate::{ValidationOutcome, Validator, validator};
