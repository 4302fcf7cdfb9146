mod cli;
pub mod commands;
pub mod service;

pub use cli::run;
pub use commands::build_registry;
