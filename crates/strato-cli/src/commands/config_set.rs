use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use strato_engine::settings::{coerce_value, validate_value};
use strato_engine::{
    Command, CommandArgs, CommandContext, CommandOption, Logger, ValidationOutcome, Validator,
    validator,
};
use strato_types::{Error, Result, SettingKey};

/// `config set` — write one persisted CLI setting.
pub struct ConfigSetCommand;

#[derive(Deserialize)]
struct Options {
    key: String,
    value: String,
}

#[async_trait]
impl Command for ConfigSetCommand {
    fn name(&self) -> &str {
        "config set"
    }

    fn description(&self) -> &str {
        "Manage global configuration settings of the strato CLI"
    }

    fn options(&self) -> Vec<CommandOption> {
        vec![
            CommandOption::new("-k, --key <key>").with_autocomplete(SettingKey::names()),
            CommandOption::new("-v, --value <value>"),
        ]
    }

    fn validators(&self) -> Vec<Validator> {
        vec![validator(|args: CommandArgs| async move {
            let key_name = args.string("key").unwrap_or_default();
            let Some(key) = SettingKey::from_name(key_name) else {
                return ValidationOutcome::failure(format!(
                    "{} is not a valid setting. Allowed values: {}",
                    key_name,
                    SettingKey::names().join(", ")
                ));
            };

            validate_value(key, args.string("value").unwrap_or_default())
        })]
    }

    fn telemetry_properties(&self, args: &CommandArgs) -> Map<String, Value> {
        // The key is a member of the closed setting enum, not user
        // data; the value is recorded as presence only.
        let mut properties = Map::new();
        properties.insert(
            "key".to_string(),
            Value::String(args.string("key").unwrap_or_default().to_string()),
        );
        properties.insert("value".to_string(), Value::Bool(args.has("value")));
        properties
    }

    async fn action(
        &self,
        ctx: &CommandContext<'_>,
        _logger: &dyn Logger,
        args: &CommandArgs,
    ) -> Result<()> {
        let options: Options = args.deserialize()?;
        let key = SettingKey::from_name(&options.key)
            .ok_or_else(|| Error::Command(format!("{} is not a valid setting", options.key)))?;
        ctx.settings().set(key, coerce_value(key, &options.value))?;
        Ok(())
    }
}
