use crate::engine::CommandContext;
use crate::logger::Logger;
use crate::option::CommandOption;
use crate::option_set::OptionSet;
use crate::validate::Validator;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use strato_types::{Error, Result};

/// Normalized arguments for one invocation.
///
/// Declared options land here under their long names; global passthrough
/// fields (`debug`, `verbose`, `output`, `confirm`) ride along in the
/// same map. Created fresh per invocation and discarded after.
#[derive(Debug, Clone, Default)]
pub struct CommandArgs {
    pub options: Map<String, Value>,
}

impl CommandArgs {
    pub fn from_options(options: Map<String, Value>) -> Self {
        CommandArgs { options }
    }

    /// Whether an option was provided (present with a non-null value).
    pub fn has(&self, name: &str) -> bool {
        matches!(self.options.get(name), Some(value) if !value.is_null())
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.options.get(name).filter(|value| !value.is_null())
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    /// Truthiness of a switch; absent counts as false.
    pub fn boolean(&self, name: &str) -> bool {
        self.value(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.options.insert(name.into(), value);
    }

    /// Deserialize the per-command typed options struct. The map is the
    /// escape hatch for dynamic fields; commands should read their own
    /// fields through a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.options.clone()))
            .map_err(|err| Error::Command(err.to_string()))
    }
}

/// A read-only snapshot of a command's metadata, used by the validation
/// pipeline, help and shell completion without touching the live
/// command instance.
pub struct CommandInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub options: Vec<CommandOption>,
    pub option_sets: Vec<OptionSet>,
    pub validators: Vec<Validator>,
    pub default_properties: Option<Vec<String>>,
}

impl CommandInfo {
    pub fn from_command(command: &dyn Command) -> Self {
        CommandInfo {
            name: command.name().to_string(),
            aliases: command.aliases().iter().map(|s| s.to_string()).collect(),
            description: command.description().to_string(),
            options: command.options(),
            option_sets: command.option_sets(),
            validators: command.validators(),
            default_properties: command
                .default_properties()
                .map(|properties| properties.iter().map(|s| s.to_string()).collect()),
        }
    }
}

/// One CLI command: declarative metadata plus an action body.
///
/// Commands are constructed once at process start, registered, and
/// shared immutably for the process lifetime. Anything an invocation
/// needs to accumulate belongs in locals of `action`, not on `self`.
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Alternative names resolving to this same command.
    fn aliases(&self) -> Vec<&str> {
        Vec::new()
    }

    fn options(&self) -> Vec<CommandOption>;

    fn option_sets(&self) -> Vec<OptionSet> {
        Vec::new()
    }

    fn validators(&self) -> Vec<Validator> {
        Vec::new()
    }

    /// Field subset (in order) that tabular output modes project onto.
    fn default_properties(&self) -> Option<Vec<&str>> {
        None
    }

    /// Anonymized usage properties, derived from option presence.
    fn telemetry_properties(&self, _args: &CommandArgs) -> Map<String, Value> {
        Map::new()
    }

    async fn action(
        &self,
        ctx: &CommandContext<'_>,
        logger: &dyn Logger,
        args: &CommandArgs,
    ) -> Result<()>;
}
