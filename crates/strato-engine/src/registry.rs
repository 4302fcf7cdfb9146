use crate::command::{Command, CommandInfo};
use crate::option::ensure_unique;
use std::collections::HashMap;
use std::sync::Arc;
use strato_types::{Error, Result};

/// Process-wide command catalogue, read-only after bootstrap.
///
/// Canonical names and aliases index into the same command instances,
/// so resolving an alias yields the identical `Arc`.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Arc<dyn Command>) -> Result<()> {
        ensure_unique(&command.options()).map_err(|err| {
            Error::Config(format!("command '{}': {}", command.name(), err.message()))
        })?;

        let slot = self.commands.len();
        let mut names = vec![command.name().to_string()];
        names.extend(command.aliases().iter().map(|alias| alias.to_string()));

        for name in &names {
            if self.index.contains_key(name) {
                return Err(Error::Config(format!(
                    "command '{}' is already registered",
                    name
                )));
            }
        }
        for name in names {
            self.index.insert(name, slot);
        }

        self.commands.push(command);
        Ok(())
    }

    /// Resolve a canonical name or alias to its command.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Command>> {
        match self.index.get(name) {
            Some(&slot) => Ok(self.commands[slot].clone()),
            None => Err(Error::CommandNotFound {
                name: name.to_string(),
                available: self.names(),
            }),
        }
    }

    /// An immutable metadata snapshot for the named command.
    pub fn info(&self, name: &str) -> Result<CommandInfo> {
        let command = self.resolve(name)?;
        Ok(CommandInfo::from_command(command.as_ref()))
    }

    pub fn commands(&self) -> &[Arc<dyn Command>] {
        &self.commands
    }

    /// Sorted canonical command names, for guidance listings.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .iter()
            .map(|command| command.name().to_string())
            .collect();
        names.sort();
        names
    }
}
