//! Clap derive structures for the `kismap` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// kismap -- map the devices in a Kismet capture
#[derive(Debug, Parser)]
#[command(
    name = "kismap",
    version,
    about = "Export a Kismet capture database to a KML map and a JSON record set",
    long_about = "Reads the devices table of a Kismet capture (.kismet), sorts devices into\n\
        clients, access points, bridged and other devices, cross-links clients with\n\
        the access points they associated with, and writes a KML map of every device\n\
        with a location fix plus a JSON export of all records.",
    propagate_version = true,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(flatten)]
    pub export: ExportArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (default: platform config directory)
    #[arg(long, env = "KISMAP_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress the summary and other non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Export ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Kismet capture database (*.kismet)
    #[arg(value_name = "FILE", required = true)]
    pub file: Option<PathBuf>,

    /// Also print the JSON export to stdout
    #[arg(long, short = 'p')]
    pub print: bool,

    /// Write outputs beside the capture file instead of the working directory
    #[arg(long, short = 'i')]
    pub inplace: bool,

    /// KML output path (overrides the default location)
    #[arg(long, value_name = "PATH", conflicts_with = "no_kml")]
    pub kml: Option<PathBuf>,

    /// JSON output path (overrides the default location)
    #[arg(long, value_name = "PATH", conflicts_with = "no_json")]
    pub json: Option<PathBuf>,

    /// Do not write the KML map
    #[arg(long)]
    pub no_kml: bool,

    /// Do not write the JSON export
    #[arg(long)]
    pub no_json: bool,

    /// Abort on the first malformed device row instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Render timestamps in local time instead of UTC
    #[arg(long)]
    pub local_time: bool,
}

// ── Subcommands ──────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect or initialize the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration (file + environment)
    Show,

    /// Print the config file location
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
