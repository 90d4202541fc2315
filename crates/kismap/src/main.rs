mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.quiet);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Some(Command::Config(ref args)) => commands::config_cmd::handle(args, &cli.global),

        Some(Command::Completions(ref args)) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "kismap", &mut std::io::stdout());
            Ok(())
        }

        None => {
            // clap enforces FILE whenever no subcommand is given.
            let Some(input) = cli.export.file.as_deref() else {
                return Ok(());
            };
            let cfg = config::load(&cli.global)?;
            let cwd = std::env::current_dir()?;
            let plan = config::resolve_plan(input, &cli.export, &cfg, &cwd);

            tracing::debug!(?plan, "resolved export plan");
            commands::export::handle(&plan, &cli.global)
        }
    }
}
