//! Output formatting and persistence for dashboard reports.
//!
//! Supports pretty-printing, JSON serialization, and one CSV per panel.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::dashboard::{DashboardReport, Panel};

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &DashboardReport) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &DashboardReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Serializes `rows` as CSV (with a header row) into `writer`.
pub fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV table");
    write_rows(File::create(path)?, rows)
}

/// Writes the table behind every panel of the report's view into `dir`,
/// gzip-compressing each file when `gzip` is set. Returns the written paths.
pub fn write_report(dir: &Path, report: &DashboardReport, gzip: bool) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for panel in report.panels() {
        let mut buf = Vec::new();
        match panel {
            Panel::PassFail => write_rows(&mut buf, &report.pass_fail)?,
            Panel::DepartmentPassFail => write_rows(&mut buf, &report.department_pass_fail)?,
            Panel::Arrears => write_rows(&mut buf, &report.arrears)?,
            Panel::SubjectPassFail => write_rows(&mut buf, &report.subject_pass_fail)?,
            Panel::SubjectAverages => write_rows(&mut buf, &report.subject_averages)?,
            Panel::GradeDistribution => write_rows(&mut buf, &report.grade_distribution)?,
        }

        let (body, name) = if gzip {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&buf)?;
            (encoder.finish()?, format!("{}.csv.gz", panel.slug()))
        } else {
            (buf, format!("{}.csv", panel.slug()))
        };

        let path = dir.join(name);
        std::fs::write(&path, body)?;
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), gzip, "Report written");
    Ok(written)
}
