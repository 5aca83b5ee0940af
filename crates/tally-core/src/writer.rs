//! CSV rendering and persistence of reports

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CoreError;
use crate::reports::Report;

/// Sequence number that keeps concurrent writes off each other's scratch file
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Scratch file name for one write, matched by `ReportKind::temp_pattern`
fn temp_filename(report: &Report) -> String {
    format!(
        "{}.{}-{}.tmp",
        report.kind.output_filename(),
        std::process::id(),
        WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
    )
}

/// Format a value with fixed precision, rounding half away from zero
pub fn format_value(value: Decimal, decimal_places: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    // -0.001 rounds to a negative zero
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{:.*}", decimal_places as usize, rounded)
}

/// Render a report as CSV text: header, one `key,value` line per row,
/// trailing newline
pub fn render_csv(report: &Report, decimal_places: u32) -> String {
    let mut out = String::with_capacity(32 * (report.rows.len() + 1));
    out.push_str(report.kind.header());
    out.push('\n');
    for row in &report.rows {
        let _ = writeln!(out, "{},{}", row.key, format_value(row.value, decimal_places));
    }
    out
}

/// Write a report to `<output_dir>/<name>.csv`
///
/// The text goes to a sibling `.tmp` file first and is renamed into place,
/// so readers never see a half-written report. Each write has its own
/// scratch file; overlapping writes of one report never touch the same
/// file and the last rename wins. Returns the final path.
pub async fn write_report(
    output_dir: &Path,
    report: &Report,
    decimal_places: u32,
) -> Result<PathBuf, CoreError> {
    let write_err = |path: &Path, e: std::io::Error| CoreError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| write_err(output_dir, e))?;

    let path = output_dir.join(report.kind.output_filename());
    let tmp = output_dir.join(temp_filename(report));
    let content = render_csv(report, decimal_places);

    tokio::fs::write(&tmp, content.as_bytes())
        .await
        .map_err(|e| write_err(&tmp, e))?;
    if let Err(e) = tokio::fs::rename(&tmp, &path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_err(&path, e));
    }

    Ok(path)
}
