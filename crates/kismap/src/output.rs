//! Terminal output: the run summary table, JSON echo and status lines.
//!
//! The summary and status lines go to stderr so stdout carries only the
//! JSON document when `--print` is given.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use owo_colors::OwoColorize;
use strum::IntoEnumIterator;
use tabled::{Table, Tabled, settings::Style};

use kismap_core::{MarkerDocument, MarkerGroup, RecordSet, RunStats};

use crate::cli::ColorMode;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled on stderr.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Summary table ────────────────────────────────────────────────────

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Records")]
    records: usize,
    #[tabled(rename = "Placemarks")]
    placemarks: usize,
}

fn record_count(records: &RecordSet, group: MarkerGroup) -> usize {
    match group {
        MarkerGroup::Clients => records.clients.len(),
        MarkerGroup::Aps => records.aps.len(),
        MarkerGroup::Bridged => records.bridged.len(),
        MarkerGroup::Other => records.other.len(),
    }
}

/// Per-group record and placemark counts, followed by run totals.
pub fn render_summary(records: &RecordSet, doc: &MarkerDocument, stats: &RunStats) -> String {
    let rows: Vec<SummaryRow> = MarkerGroup::iter()
        .map(|group| SummaryRow {
            group: group.to_string(),
            records: record_count(records, group),
            placemarks: doc.folder(group).len(),
        })
        .collect();

    let mut out = render_table(&rows);
    out.push_str(&format!(
        "\n{} rows read, {} skipped, {} probed SSIDs, {}/{} AP links resolved",
        stats.rows_read,
        stats.skipped,
        records.probes.len(),
        stats.links_resolved,
        stats.links_total,
    ));
    out
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Printers ─────────────────────────────────────────────────────────

/// Print the rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a block to stderr, respecting quiet mode.
pub fn print_status(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{output}");
}

/// One "wrote <path>" line per output file.
pub fn wrote_line(kind: &str, path: &Path, color: bool) -> String {
    let path = path.display().to_string();
    if color {
        format!("{} {kind} {}", "wrote".green().bold(), path.cyan())
    } else {
        format!("wrote {kind} {path}")
    }
}

/// Diagnostic for a capture that produced no records.
pub fn empty_line(input: &Path, color: bool) -> String {
    let msg = format!("no devices found in {}; nothing written", input.display());
    if color {
        msg.yellow().to_string()
    } else {
        msg
    }
}
