//! Command handlers: the default export run plus the auxiliary subcommands.

pub mod config_cmd;
pub mod export;
