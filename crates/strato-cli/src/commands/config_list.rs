use async_trait::async_trait;
use serde_json::Value;
use strato_engine::{Command, CommandArgs, CommandContext, CommandOption, Logger};
use strato_types::Result;

/// `config list` — print every configured setting.
pub struct ConfigListCommand;

#[async_trait]
impl Command for ConfigListCommand {
    fn name(&self) -> &str {
        "config list"
    }

    fn description(&self) -> &str {
        "List all self-set configuration settings of the strato CLI"
    }

    fn options(&self) -> Vec<CommandOption> {
        Vec::new()
    }

    async fn action(
        &self,
        ctx: &CommandContext<'_>,
        logger: &dyn Logger,
        _args: &CommandArgs,
    ) -> Result<()> {
        logger.log(&Value::Object(ctx.settings().snapshot()));
        Ok(())
    }
}
