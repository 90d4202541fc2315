//! Config subcommand handlers.

use kismap_config::{Config, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global.config.clone().unwrap_or_else(config::config_path);

    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            output::print_output(toml::to_string_pretty(&cfg)?.trim_end());
        }
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string());
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            let written = save_config(&Config::default(), Some(&path))?;
            output::print_status(&format!("wrote {}", written.display()), global.quiet);
        }
    }
    Ok(())
}
