use crate::client::ServiceClient;
use crate::command::{Command, CommandArgs};
use crate::confirm::{Approval, PromptProvider};
use crate::logger::{CollectingLogger, Logger, OutputSink};
use crate::output::{CsvOptions, ProjectedLogger};
use crate::registry::CommandRegistry;
use crate::settings::SettingsStore;
use crate::telemetry::TelemetrySink;
use crate::validate::{self, ValidationOutcome};
use serde_json::{Map, Value};
use strato_types::{Error, OutputMode, Result, SettingKey, TelemetryRecord};

/// The command-execution engine: registry, settings, telemetry, prompt
/// and service client wired together as one explicitly constructed
/// value. Command bodies receive it through [`CommandContext`] rather
/// than reaching for ambient global state.
pub struct Engine {
    registry: CommandRegistry,
    settings: SettingsStore,
    telemetry: Box<dyn TelemetrySink>,
    prompt: Box<dyn PromptProvider>,
    client: Box<dyn ServiceClient>,
}

impl Engine {
    pub fn new(
        registry: CommandRegistry,
        settings: SettingsStore,
        telemetry: Box<dyn TelemetrySink>,
        prompt: Box<dyn PromptProvider>,
        client: Box<dyn ServiceClient>,
    ) -> Self {
        Engine {
            registry,
            settings,
            telemetry,
            prompt,
            client,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn client(&self) -> &dyn ServiceClient {
        self.client.as_ref()
    }

    /// Run one top-level invocation end-to-end: option sets, validators,
    /// action, output projection. Telemetry is recorded exactly once,
    /// whatever the outcome.
    pub async fn invoke(
        &self,
        name: &str,
        options: Map<String, Value>,
        sink: &dyn OutputSink,
    ) -> Result<()> {
        let command = self.registry.resolve(name)?;
        let args = CommandArgs::from_options(options);
        let outcome = self.dispatch(command.as_ref(), &args, sink).await;
        self.record_telemetry(command.as_ref(), &args);
        outcome
    }

    async fn dispatch(
        &self,
        command: &dyn Command,
        args: &CommandArgs,
        sink: &dyn OutputSink,
    ) -> Result<()> {
        let output = self.resolve_output_mode(args)?;
        let default_properties = command
            .default_properties()
            .map(|properties| properties.iter().map(|s| s.to_string()).collect());
        let logger = ProjectedLogger::new(sink, output, default_properties, self.csv_options());
        self.run_pipeline(command, args, &logger, output, false)
            .await
    }

    /// The shared pipeline behind both top-level and nested execution.
    /// Confirmation is not part of it: destructive commands gate their
    /// own mutations through [`CommandContext::seek_approval`], after
    /// validation and before any service call.
    async fn run_pipeline(
        &self,
        command: &dyn Command,
        args: &CommandArgs,
        logger: &dyn Logger,
        output: OutputMode,
        preconfirmed: bool,
    ) -> Result<()> {
        for option in command.options() {
            if option.required && !args.has(&option.long) {
                return Err(Error::Validation(format!(
                    "Required option {} not specified",
                    option.long
                )));
            }
        }

        for set in command.option_sets() {
            if let ValidationOutcome::Invalid(message) = set.check(args) {
                return Err(Error::Validation(message));
            }
        }

        if let ValidationOutcome::Invalid(message) =
            validate::run_validators(&command.validators(), args).await
        {
            return Err(Error::Validation(message));
        }

        let ctx = CommandContext {
            engine: self,
            debug: args.boolean("debug"),
            verbose: args.boolean("verbose"),
            output,
            confirmed: preconfirmed || args.boolean("confirm"),
        };
        command.action(&ctx, logger, args).await
    }

    /// Nested execution gateway: run another registered command as a
    /// subroutine of the caller. Shared flags propagate unless the
    /// caller overrides them; the nested command's failure surfaces
    /// verbatim; confirmation is not re-run and telemetry is not
    /// re-recorded.
    async fn execute_command(
        &self,
        name: &str,
        mut options: Map<String, Value>,
        caller: &CommandContext<'_>,
        outer_logger: &dyn Logger,
    ) -> Result<Value> {
        let command = self.registry.resolve(name)?;

        if !options.contains_key("debug") && caller.debug {
            options.insert("debug".to_string(), Value::Bool(true));
        }
        if !options.contains_key("verbose") && caller.verbose {
            options.insert("verbose".to_string(), Value::Bool(true));
        }
        if !options.contains_key("output") {
            options.insert(
                "output".to_string(),
                Value::String(caller.output.as_str().to_string()),
            );
        }

        let args = CommandArgs::from_options(options);
        let logger = CollectingLogger::new(outer_logger);
        self.run_pipeline(command.as_ref(), &args, &logger, caller.output, true)
            .await?;
        Ok(logger.into_result())
    }

    fn resolve_output_mode(&self, args: &CommandArgs) -> Result<OutputMode> {
        if let Some(requested) = args.string("output") {
            return requested.parse().map_err(Error::Validation);
        }

        if let Some(stored) = self.settings.get(SettingKey::Output)
            && let Some(stored) = stored.as_str()
            && let Ok(mode) = stored.parse()
        {
            return Ok(mode);
        }

        Ok(OutputMode::default())
    }

    fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            header: self.settings.get_bool_or(SettingKey::CsvHeader, true),
            quoted: self.settings.get_bool(SettingKey::CsvQuoted),
        }
    }

    fn record_telemetry(&self, command: &dyn Command, args: &CommandArgs) {
        if self.settings.get_bool(SettingKey::DisableTelemetry) {
            return;
        }
        let record = TelemetryRecord::new(command.name(), command.telemetry_properties(args));
        self.telemetry.record(record);
    }
}

/// What a command body sees of the engine during one invocation.
pub struct CommandContext<'a> {
    engine: &'a Engine,
    pub debug: bool,
    pub verbose: bool,
    pub output: OutputMode,
    confirmed: bool,
}

impl CommandContext<'_> {
    pub fn client(&self) -> &dyn ServiceClient {
        self.engine.client()
    }

    pub fn settings(&self) -> &SettingsStore {
        self.engine.settings()
    }

    /// Invoke another registered command as a subroutine.
    pub async fn execute_command(
        &self,
        name: &str,
        options: Map<String, Value>,
        logger: &dyn Logger,
    ) -> Result<Value> {
        self.engine
            .execute_command(name, options, self, logger)
            .await
    }

    /// The confirmation workflow for destructive commands: an explicit
    /// `--confirm` (or nested pre-confirmation) approves immediately,
    /// then the `autoConfirm` setting, then the interactive prompt.
    /// Call this before issuing any mutating service call.
    pub async fn seek_approval(&self, message: &str) -> Result<Approval> {
        if self.confirmed {
            return Ok(Approval::Confirmed);
        }
        if self.engine.settings.get_bool(SettingKey::AutoConfirm) {
            return Ok(Approval::Confirmed);
        }
        if self.engine.prompt.confirm(message, false).await? {
            Ok(Approval::Confirmed)
        } else {
            Ok(Approval::Aborted)
        }
    }
}
