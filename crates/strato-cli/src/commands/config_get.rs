use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use strato_engine::{
    Command, CommandArgs, CommandContext, CommandOption, Logger, ValidationOutcome, Validator,
    validator,
};
use strato_types::{Error, Result, SettingKey};

/// `config get` — read one persisted CLI setting. Unset keys print
/// nothing.
pub struct ConfigGetCommand;

#[derive(Deserialize)]
struct Options {
    key: String,
}

#[async_trait]
impl Command for ConfigGetCommand {
    fn name(&self) -> &str {
        "config get"
    }

    fn description(&self) -> &str {
        "Get the value of a configuration setting of the strato CLI"
    }

    fn options(&self) -> Vec<CommandOption> {
        vec![CommandOption::new("-k, --key <key>").with_autocomplete(SettingKey::names())]
    }

    fn validators(&self) -> Vec<Validator> {
        vec![validator(|args: CommandArgs| async move {
            let key_name = args.string("key").unwrap_or_default();
            if SettingKey::from_name(key_name).is_none() {
                return ValidationOutcome::failure(format!(
                    "{} is not a valid setting. Allowed values: {}",
                    key_name,
                    SettingKey::names().join(", ")
                ));
            }
            ValidationOutcome::Valid
        })]
    }

    fn telemetry_properties(&self, args: &CommandArgs) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert(
            "key".to_string(),
            Value::String(args.string("key").unwrap_or_default().to_string()),
        );
        properties
    }

    async fn action(
        &self,
        ctx: &CommandContext<'_>,
        logger: &dyn Logger,
        args: &CommandArgs,
    ) -> Result<()> {
        let options: Options = args.deserialize()?;
        let key = SettingKey::from_name(&options.key)
            .ok_or_else(|| Error::Command(format!("{} is not a valid setting", options.key)))?;
        if let Some(value) = ctx.settings().get(key) {
            logger.log(&value);
        }
        Ok(())
    }
}
