//! Export handler: capture file → records → KML map + JSON document.

use tracing::{debug, info};

use kismap_core::render::{self, MarkerDocument};
use kismap_core::Pipeline;
use kismap_store::CaptureStore;

use crate::cli::GlobalOpts;
use crate::config::ExportPlan;
use crate::error::CliError;
use crate::output;

pub fn handle(plan: &ExportPlan, global: &GlobalOpts) -> Result<(), CliError> {
    let input = plan.input.display().to_string();
    let color = output::should_color(global.color);

    let store = CaptureStore::open(&plan.input).map_err(|e| CliError::from_store(&input, e))?;
    let rows = store
        .read_devices()
        .map_err(|e| CliError::from_store(&input, e))?;
    debug!(rows = rows.len(), path = %input, "read device rows");

    let result = Pipeline::new(plan.pipeline)
        .run(rows)
        .map_err(|e| CliError::from_core(&input, e))?;
    let (records, stats) = (result.records, result.stats);

    if records.is_empty() {
        info!(skipped = stats.skipped, "capture produced no records");
        output::print_status(&output::empty_line(&plan.input, color), false);
        return Ok(());
    }

    let doc = MarkerDocument::from_records(&records);
    let mut status = Vec::new();

    if let Some(path) = &plan.kml_path {
        render::write_kml_file(&doc, &plan.kml, path)
            .map_err(|e| CliError::from_core(&input, e))?;
        status.push(output::wrote_line("KML", path, color));
    }

    let json = match &plan.json_path {
        Some(path) => {
            let json = render::write_json_file(&records, path)
                .map_err(|e| CliError::from_core(&input, e))?;
            status.push(output::wrote_line("JSON", path, color));
            Some(json)
        }
        None if plan.print_json => Some(
            render::to_json_string(&records).map_err(|e| CliError::from_core(&input, e))?,
        ),
        None => None,
    };

    if let Some(json) = json.as_deref().filter(|_| plan.print_json) {
        output::print_output(json);
    }

    output::print_status(&output::render_summary(&records, &doc, &stats), global.quiet);
    output::print_status(&status.join("\n"), global.quiet);
    Ok(())
}
