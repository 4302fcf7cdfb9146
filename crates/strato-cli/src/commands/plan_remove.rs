use super::{SERVICE_ROOT, plans};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use strato_engine::client::command_error;
use strato_engine::telemetry::presence;
use strato_engine::{
    Approval, Command, CommandArgs, CommandContext, CommandOption, Logger, OptionSet,
};
use strato_types::Result;

/// `plan remove` — delete a plan, addressed by id or by title. A title
/// is resolved to its id before exactly one delete is issued.
/// Destructive: gated by the confirmation workflow.
pub struct PlanRemoveCommand;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Options {
    id: Option<String>,
    title: Option<String>,
}

#[async_trait]
impl Command for PlanRemoveCommand {
    fn name(&self) -> &str {
        "plan remove"
    }

    fn description(&self) -> &str {
        "Removes the specified plan"
    }

    fn options(&self) -> Vec<CommandOption> {
        vec![
            CommandOption::new("-i, --id [id]"),
            CommandOption::new("-t, --title [title]"),
        ]
    }

    fn option_sets(&self) -> Vec<OptionSet> {
        vec![OptionSet::exactly_one(["id", "title"])]
    }

    fn telemetry_properties(&self, args: &CommandArgs) -> Map<String, Value> {
        let mut properties = presence(args, &["id", "title"]);
        properties.insert("confirm".to_string(), Value::Bool(args.boolean("confirm")));
        properties
    }

    async fn action(
        &self,
        ctx: &CommandContext<'_>,
        logger: &dyn Logger,
        args: &CommandArgs,
    ) -> Result<()> {
        let options: Options = args.deserialize()?;

        let label = options
            .title
            .clone()
            .or_else(|| options.id.clone())
            .unwrap_or_default();
        let message = format!("Are you sure you want to remove the plan {}?", label);
        if ctx.seek_approval(&message).await? == Approval::Aborted {
            return Ok(());
        }

        let id = match options.id {
            Some(id) => id,
            None => {
                let title = options.title.unwrap_or_default();
                if ctx.verbose {
                    logger.log_to_stderr(&format!("Resolving plan id for {}...", title));
                }
                plans::resolve_plan_id(ctx, &title).await?
            }
        };

        ctx.client()
            .delete(&format!("{}/v1/plans/{}", SERVICE_ROOT, id))
            .await
            .map_err(command_error)?;
        Ok(())
    }
}
