mod config_get;
mod config_list;
mod config_set;
mod file_remove;
mod file_rename;
mod plan_list;
mod plan_remove;
mod plans;
mod validation;

use std::sync::Arc;
use strato_engine::CommandRegistry;
use strato_types::Result;

/// Root of the Strato workspace cloud REST surface.
pub const SERVICE_ROOT: &str = "https://api.strato.cloud";

/// Register every command the CLI ships. Commands are constructed once
/// here and live for the process lifetime.
pub fn build_registry() -> Result<CommandRegistry> {
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(config_get::ConfigGetCommand))?;
    registry.register(Arc::new(config_list::ConfigListCommand))?;
    registry.register(Arc::new(config_set::ConfigSetCommand))?;
    registry.register(Arc::new(file_remove::FileRemoveCommand))?;
    registry.register(Arc::new(file_rename::FileRenameCommand))?;
    registry.register(Arc::new(plan_list::PlanListCommand))?;
    registry.register(Arc::new(plan_remove::PlanRemoveCommand))?;
    Ok(registry)
}
