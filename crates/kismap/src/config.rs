//! Run settings: CLI flags layered over the loaded config file.
//!
//! Flags only ever switch a setting on; the config file supplies the
//! defaults they override.

use std::path::{Path, PathBuf};

use kismap_config::Config;
use kismap_core::{KmlOptions, PipelineOptions};

use crate::cli::{ExportArgs, GlobalOpts};
use crate::error::CliError;

pub use kismap_config::config_path;

/// Stem used when the input path has none.
const FALLBACK_STEM: &str = "kismet";

/// Everything one export run needs, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    pub input: PathBuf,
    /// `None` when the KML map is disabled.
    pub kml_path: Option<PathBuf>,
    /// `None` when the JSON file is disabled.
    pub json_path: Option<PathBuf>,
    pub print_json: bool,
    pub pipeline: PipelineOptions,
    pub kml: KmlOptions,
}

/// Load the config file named by `--config`, or the platform default.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(kismap_config::load_config(global.config.as_deref())?)
}

/// Resolve an export plan for `input`.
///
/// Default outputs are `<stem>.kml` / `<stem>.json`, placed beside the input
/// with `--inplace` and in `cwd` otherwise. Explicit `--kml` / `--json`
/// paths win over both.
pub fn resolve_plan(input: &Path, args: &ExportArgs, cfg: &Config, cwd: &Path) -> ExportPlan {
    let mut merged = cfg.clone();
    merged.output.inplace |= args.inplace;
    merged.output.print_json |= args.print;
    merged.output.strict |= args.strict;
    merged.output.local_time |= args.local_time;

    let default_path = |ext: &str| {
        if merged.output.inplace {
            input.with_extension(ext)
        } else {
            let stem = input
                .file_stem()
                .map_or_else(|| FALLBACK_STEM.into(), |s| s.to_string_lossy());
            cwd.join(format!("{stem}.{ext}"))
        }
    };

    let kml_path = (!args.no_kml).then(|| args.kml.clone().unwrap_or_else(|| default_path("kml")));
    let json_path =
        (!args.no_json).then(|| args.json.clone().unwrap_or_else(|| default_path("json")));

    ExportPlan {
        input: input.to_path_buf(),
        kml_path,
        json_path,
        print_json: merged.output.print_json,
        pipeline: merged.pipeline_options(),
        kml: merged.kml_options(),
    }
}
