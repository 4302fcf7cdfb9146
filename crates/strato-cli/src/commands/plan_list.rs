use super::{plans, validation};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use strato_engine::telemetry::presence;
use strato_engine::{
    Command, CommandArgs, CommandContext, CommandOption, Logger, OptionSet, ValidationOutcome,
    Validator, validator,
};
use strato_types::Result;

/// `plan list` — list the plans owned by a group, addressed by id or
/// display name.
pub struct PlanListCommand;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Options {
    owner_group_id: Option<String>,
    owner_group_name: Option<String>,
    top: Option<u64>,
}

#[async_trait]
impl Command for PlanListCommand {
    fn name(&self) -> &str {
        "plan list"
    }

    fn description(&self) -> &str {
        "Returns a list of plans associated with a group"
    }

    fn options(&self) -> Vec<CommandOption> {
        vec![
            CommandOption::new("--ownerGroupId [ownerGroupId]"),
            CommandOption::new("--ownerGroupName [ownerGroupName]"),
            CommandOption::new("--top [top]").number(),
        ]
    }

    fn option_sets(&self) -> Vec<OptionSet> {
        vec![OptionSet::exactly_one(["ownerGroupId", "ownerGroupName"])]
    }

    fn validators(&self) -> Vec<Validator> {
        vec![validator(|args: CommandArgs| async move {
            if let Some(group_id) = args.string("ownerGroupId")
                && !validation::is_valid_guid(group_id)
            {
                return ValidationOutcome::failure(format!(
                    "{} is not a valid GUID",
                    group_id
                ));
            }

            if let Some(top) = args.value("top")
                && top.as_u64().is_none_or(|top| top == 0)
            {
                return ValidationOutcome::failure("top must be a positive number");
            }

            ValidationOutcome::Valid
        })]
    }

    fn default_properties(&self) -> Option<Vec<&str>> {
        Some(vec!["id", "title", "createdDateTime", "owner"])
    }

    fn telemetry_properties(&self, args: &CommandArgs) -> Map<String, Value> {
        presence(args, &["ownerGroupId", "ownerGroupName", "top"])
    }

    async fn action(
        &self,
        ctx: &CommandContext<'_>,
        logger: &dyn Logger,
        args: &CommandArgs,
    ) -> Result<()> {
        let options: Options = args.deserialize()?;

        let group_id = match options.owner_group_id {
            Some(id) => id,
            None => {
                let name = options.owner_group_name.unwrap_or_default();
                if ctx.verbose {
                    logger.log_to_stderr(&format!("Resolving group id for {}...", name));
                }
                plans::resolve_group_id(ctx, &name).await?
            }
        };

        if ctx.verbose {
            logger.log_to_stderr(&format!("Retrieving plans for group {}...", group_id));
        }

        let mut records = plans::get_plans_by_group_id(ctx, &group_id).await?;
        if let Some(top) = options.top {
            records.truncate(top as usize);
        }
        logger.log(&Value::Array(records));
        Ok(())
    }
}
