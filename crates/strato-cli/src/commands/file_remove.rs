use super::validation;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use strato_engine::client::command_error;
use strato_engine::telemetry::presence;
use strato_engine::{
    Approval, Command, CommandArgs, CommandContext, CommandOption, Logger, OptionSet,
    ValidationOutcome, Validator, validator,
};
use strato_types::{Error, Result};

/// `file remove` — delete or recycle a file, addressed by unique id or
/// site-relative path. Destructive: gated by the confirmation
/// workflow.
pub struct FileRemoveCommand;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Options {
    web_url: String,
    id: Option<String>,
    url: Option<String>,
    #[serde(default)]
    recycle: bool,
}

#[async_trait]
impl Command for FileRemoveCommand {
    fn name(&self) -> &str {
        "file remove"
    }

    fn description(&self) -> &str {
        "Removes the specified file"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["template remove"]
    }

    fn options(&self) -> Vec<CommandOption> {
        vec![
            CommandOption::new("-w, --webUrl <webUrl>"),
            CommandOption::new("-i, --id [id]"),
            CommandOption::new("-u, --url [url]"),
            CommandOption::new("--recycle"),
        ]
    }

    fn option_sets(&self) -> Vec<OptionSet> {
        vec![OptionSet::exactly_one(["id", "url"])]
    }

    fn validators(&self) -> Vec<Validator> {
        vec![validator(|args: CommandArgs| async move {
            let outcome =
                validation::is_valid_workspace_url(args.string("webUrl").unwrap_or_default());
            if !outcome.is_valid() {
                return outcome;
            }

            if let Some(id) = args.string("id")
                && !validation::is_valid_guid(id)
            {
                return ValidationOutcome::failure(format!("{} is not a valid GUID", id));
            }

            ValidationOutcome::Valid
        })]
    }

    fn telemetry_properties(&self, args: &CommandArgs) -> Map<String, Value> {
        let mut properties = presence(args, &["id", "url"]);
        properties.insert("recycle".to_string(), Value::Bool(args.boolean("recycle")));
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

        let target = options
            .id
            .clone()
            .or_else(|| options.url.clone())
            .unwrap_or_default();
        let verb = if options.recycle { "recycle" } else { "remove" };
        let message = format!(
            "Are you sure you want to {} the file {} located in site {}?",
            verb, target, options.web_url
        );
        if ctx.seek_approval(&message).await? == Approval::Aborted {
            return Ok(());
        }

        if ctx.verbose {
            logger.log_to_stderr(&format!("Removing file in site at {}...", options.web_url));
        }

        let request_url = if let Some(id) = &options.id {
            format!("{}/v1/files/by-id/{}", options.web_url, id)
        } else if let Some(url) = &options.url {
            format!(
                "{}/v1/files/by-path/{}",
                options.web_url,
                url.trim_start_matches('/')
            )
        } else {
            return Err(Error::Command(
                "Specify either id or url".to_string(),
            ));
        };

        if options.recycle {
            ctx.client()
                .post(&format!("{}/recycle", request_url), None)
                .await
                .map_err(command_error)?;
        } else {
            ctx.client()
                .delete(&request_url)
                .await
                .map_err(command_error)?;
        }
        Ok(())
    }
}
