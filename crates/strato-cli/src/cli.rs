// NOTE: Front-end Rationale
//
// Why build the clap parser from the registry (not derive)?
// - Commands are registered at runtime; the option schema on each
//   command is the single source of truth for flags and help
// - Multi-word command names ("config set", "file remove") become
//   nested subcommands, and aliases get their own path to the same
//   registered instance
// - Required options are deliberately NOT marked required in clap:
//   their absence is surfaced through the validation pipeline so that
//   option sets and cross-field rules report uniformly

use crate::commands;
use crate::service::HttpServiceClient;
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use owo_colors::OwoColorize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use strato_engine::{
    CommandOption, CommandRegistry, ConsolePrompt, ConsoleSink, Engine, FileTelemetry,
    NullTelemetry, SettingsStore, TelemetrySink, ValueKind,
};
use strato_types::{Error, OutputMode, SettingKey};

pub fn run() -> i32 {
    match try_run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    }
}

fn try_run() -> anyhow::Result<i32> {
    let registry = commands::build_registry()?;
    let settings = SettingsStore::open_default()?;
    let telemetry: Box<dyn TelemetrySink> = match FileTelemetry::default_path() {
        Ok(path) => Box::new(FileTelemetry::new(path)),
        Err(_) => Box::new(NullTelemetry),
    };
    let engine = Engine::new(
        registry,
        settings,
        telemetry,
        Box::new(ConsolePrompt),
        Box::new(HttpServiceClient::new()),
    );

    let matches = build_cli(engine.registry()).get_matches();
    let Some((name, options)) = extract_invocation(&matches, engine.registry()) else {
        print_guidance(engine.registry());
        return Ok(0);
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    match runtime.block_on(engine.invoke(&name, options, &ConsoleSink)) {
        Ok(()) => Ok(0),
        Err(err) => {
            report_error(&err, engine.settings());
            Ok(1)
        }
    }
}

fn global_args() -> Vec<Arg> {
    vec![
        Arg::new("debug")
            .long("debug")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Log debug information to stderr"),
        Arg::new("verbose")
            .long("verbose")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Log progress narration to stderr"),
        Arg::new("output")
            .long("output")
            .global(true)
            .value_name("mode")
            .value_parser(PossibleValuesParser::new(OutputMode::names()))
            .help("Output mode for result data"),
        Arg::new("confirm")
            .long("confirm")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Skip confirmation prompts on destructive commands"),
    ]
}

#[derive(Default)]
struct CommandNode {
    children: BTreeMap<String, CommandNode>,
    /// Full registered name (canonical or alias) when this node is
    /// invocable.
    command: Option<String>,
}

fn command_tree(registry: &CommandRegistry) -> CommandNode {
    let mut root = CommandNode::default();
    for command in registry.commands() {
        let mut names = vec![command.name().to_string()];
        names.extend(command.aliases().iter().map(|alias| alias.to_string()));
        for name in names {
            let mut node = &mut root;
            for part in name.split_whitespace() {
                node = node.children.entry(part.to_string()).or_default();
            }
            node.command = Some(name);
        }
    }
    root
}

pub fn build_cli(registry: &CommandRegistry) -> ClapCommand {
    let tree = command_tree(registry);
    let mut root = ClapCommand::new("strato")
        .about("Manage Strato workspace cloud resources from the command line")
        .version(env!("CARGO_PKG_VERSION"))
        .disable_help_subcommand(true)
        .args(global_args());
    for (name, node) in tree.children {
        root = root.subcommand(build_subcommand(name, node, registry));
    }
    root
}

fn build_subcommand(name: String, node: CommandNode, registry: &CommandRegistry) -> ClapCommand {
    let mut cmd = ClapCommand::new(name);
    if let Some(full_name) = &node.command {
        // Parser and help are built from the metadata snapshot, not the
        // live command.
        if let Ok(info) = registry.info(full_name) {
            cmd = cmd.about(info.description);
            for option in &info.options {
                cmd = cmd.arg(option_to_arg(option));
            }
        }
    } else {
        cmd = cmd.subcommand_required(true);
    }
    for (child_name, child) in node.children {
        cmd = cmd.subcommand(build_subcommand(child_name, child, registry));
    }
    cmd
}

fn option_to_arg(option: &CommandOption) -> Arg {
    let mut arg = Arg::new(option.long.clone()).long(option.long.clone());
    if let Some(short) = option.short {
        arg = arg.short(short);
    }
    match option.kind {
        ValueKind::Flag => arg = arg.action(ArgAction::SetTrue),
        _ => {
            arg = arg.action(ArgAction::Set);
            if let Some(value_name) = &option.value_name {
                arg = arg.value_name(value_name.clone());
            }
        }
    }
    arg
}

/// Walk the matched subcommand chain and normalize the parsed values
/// into the engine's argument map. Returns `None` when no command was
/// given at all.
pub fn extract_invocation(
    matches: &ArgMatches,
    registry: &CommandRegistry,
) -> Option<(String, Map<String, Value>)> {
    let mut parts = Vec::new();
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        parts.push(name.to_string());
        current = sub;
    }
    if parts.is_empty() {
        return None;
    }
    let name = parts.join(" ");

    let mut options = Map::new();
    if let Ok(info) = registry.info(&name) {
        for option in &info.options {
            match option.kind {
                ValueKind::Flag => {
                    if current.get_flag(&option.long) {
                        options.insert(option.long.clone(), Value::Bool(true));
                    }
                }
                kind => {
                    if let Some(raw) = current.get_one::<String>(&option.long) {
                        options.insert(option.long.clone(), coerce_argument(raw, kind));
                    }
                }
            }
        }
    }

    if current.get_flag("debug") {
        options.insert("debug".to_string(), Value::Bool(true));
    }
    if current.get_flag("verbose") {
        options.insert("verbose".to_string(), Value::Bool(true));
    }
    if current.get_flag("confirm") {
        options.insert("confirm".to_string(), Value::Bool(true));
    }
    if let Some(mode) = current.get_one::<String>("output") {
        options.insert("output".to_string(), Value::String(mode.clone()));
    }

    Some((name, options))
}

/// Apply the option's declared type hint to the raw parsed value.
/// Unparseable values stay strings so validators can report them.
fn coerce_argument(raw: &str, kind: ValueKind) -> Value {
    match kind {
        ValueKind::Number => {
            if let Ok(number) = raw.parse::<i64>() {
                return Value::Number(number.into());
            }
            if let Ok(number) = raw.parse::<f64>()
                && let Some(number) = serde_json::Number::from_f64(number)
            {
                return Value::Number(number);
            }
            Value::String(raw.to_string())
        }
        ValueKind::Bool => match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        },
        _ => Value::String(raw.to_string()),
    }
}

fn print_guidance(registry: &CommandRegistry) {
    println!("strato - Manage Strato workspace cloud resources\n");
    println!("Available commands:");
    for name in registry.names() {
        println!("  strato {}", name);
    }
    println!();
    println!("For command options:");
    println!("  strato <command> --help");
}

/// Errors always print, whatever the output mode; only successful
/// result data is ever suppressed.
fn report_error(err: &Error, settings: &SettingsStore) {
    let text = match err {
        Error::CommandNotFound { name, available } => {
            let mut lines = vec![format!(
                "Command '{}' was not found. Available commands:",
                name
            )];
            lines.extend(available.iter().map(|name| format!("  {}", name)));
            lines.join("\n")
        }
        other => format!("Error: {}", other),
    };

    let plain = settings.get_bool_or(SettingKey::PrintErrorsAsPlainText, true);
    let text = if plain {
        text
    } else {
        text.red().to_string()
    };

    let to_stdout = matches!(
        settings.get(SettingKey::ErrorOutput),
        Some(Value::String(channel)) if channel == "stdout"
    );
    if to_stdout {
        println!("{}", text);
    } else {
        eprintln!("{}", text);
    }
}
