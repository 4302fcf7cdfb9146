use super::validation;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use strato_engine::client::command_error;
use strato_engine::telemetry::presence;
use strato_engine::{
    Command, CommandArgs, CommandContext, CommandOption, Logger, Validator, validator,
};
use strato_types::{Error, Result};

/// `file rename` — rename a file in place. With `--force`, an existing
/// file under the target name is recycled first through a nested
/// `file remove` invocation.
pub struct FileRenameCommand;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Options {
    web_url: String,
    source_url: String,
    target_file_name: String,
    #[serde(default)]
    force: bool,
}

/// The nested remove reports a missing target with this exact message;
/// anything else is a real failure.
const TARGET_NOT_FOUND: &str = "File does not exist";

fn parent_folder(source_url: &str) -> &str {
    source_url
        .rsplit_once('/')
        .map(|(head, _)| head)
        .unwrap_or_default()
}

#[async_trait]
impl Command for FileRenameCommand {
    fn name(&self) -> &str {
        "file rename"
    }

    fn description(&self) -> &str {
        "Renames a file"
    }

    fn options(&self) -> Vec<CommandOption> {
        vec![
            CommandOption::new("-w, --webUrl <webUrl>"),
            CommandOption::new("-s, --sourceUrl <sourceUrl>"),
            CommandOption::new("-t, --targetFileName <targetFileName>"),
            CommandOption::new("--force"),
        ]
    }

    fn validators(&self) -> Vec<Validator> {
        vec![validator(|args: CommandArgs| async move {
            validation::is_valid_workspace_url(args.string("webUrl").unwrap_or_default())
        })]
    }

    fn telemetry_properties(&self, args: &CommandArgs) -> Map<String, Value> {
        let mut properties = presence(args, &["sourceUrl", "targetFileName"]);
        properties.insert("force".to_string(), Value::Bool(args.boolean("force")));
        properties
    }

    async fn action(
        &self,
        ctx: &CommandContext<'_>,
        logger: &dyn Logger,
        args: &CommandArgs,
    ) -> Result<()> {
        let options: Options = args.deserialize()?;

        if options.force {
            let target_url = format!(
                "{}/{}",
                parent_folder(&options.source_url),
                options.target_file_name
            );
            let mut remove_options = Map::new();
            remove_options.insert(
                "webUrl".to_string(),
                Value::String(options.web_url.clone()),
            );
            remove_options.insert("url".to_string(), Value::String(target_url));
            remove_options.insert("recycle".to_string(), Value::Bool(true));

            match ctx
                .execute_command("file remove", remove_options, logger)
                .await
            {
                Ok(_) => {}
                Err(Error::Command(message)) if message == TARGET_NOT_FOUND => {
                    if ctx.verbose {
                        logger.log_to_stderr("Target file does not exist, nothing to recycle");
                    }
                }
                Err(err) => return Err(err),
            }
        }

        if ctx.verbose {
            logger.log_to_stderr(&format!(
                "Renaming file {} to {}...",
                options.source_url, options.target_file_name
            ));
        }

        let request_url = format!(
            "{}/v1/files/by-path/{}/rename",
            options.web_url,
            options.source_url.trim_start_matches('/')
        );
        let body = json!({ "targetFileName": options.target_file_name });
        let result = ctx
            .client()
            .post(&request_url, Some(body))
            .await
            .map_err(command_error)?;
        logger.log(&result);
        Ok(())
    }
}
