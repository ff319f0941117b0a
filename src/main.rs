//! CLI entry point for the results analyzer.
//!
//! Loads a student result sheet, applies a department/branch/semester
//! selection and emits the derived tables behind each dashboard panel.

use anyhow::Result;
use clap::{Parser, Subcommand};
use results_analyzer::analyzers::types::Status;
use results_analyzer::dashboard::Panel;
use results_analyzer::{
    DashboardReport, InstitutionConfig, Selection,
    fetch::fetch_source,
    filter::SelectorOptions,
    loader::{SourceFormat, load_table},
    output::{print_json, print_pretty, write_report},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "results_analyzer")]
#[command(about = "Pass/fail, grade and arrear analysis of student result sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dashboard tables for one selection
    Report {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// "Overall", "Others (Open Elective)" or an exact department name
        #[arg(short, long, default_value = "Overall")]
        department: String,

        /// "All" or an exact branch name (only used with a named department)
        #[arg(short, long, default_value = "All")]
        branch: String,

        /// "Overall" or a semester number
        #[arg(short, long, default_value = "Overall")]
        semester: String,

        /// Upload format ("xlsx" or "csv"); defaults to the source's extension, then xlsx
        #[arg(short, long)]
        format: Option<SourceFormat>,

        /// Institution config JSON (abbreviations, prefixes, electives)
        #[arg(short, long)]
        config: Option<String>,

        /// Optional: directory to write one CSV per panel into
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Optional: Gzip compress the written CSV files
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// List the department, branch and semester choices in a sheet
    Options {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Institution config JSON
        #[arg(short, long)]
        config: Option<String>,

        /// Upload format ("xlsx" or "csv"); defaults to the source's extension, then xlsx
        #[arg(short, long)]
        format: Option<SourceFormat>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/results_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("results_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            source,
            department,
            branch,
            semester,
            format,
            config,
            output_dir,
            gzip,
        } => {
            let config = load_config(config.as_deref())?;
            let selection = Selection::new(&department, &branch, &semester)?;

            let bytes = fetch_source(&source)?;
            let table = load_table(&bytes, source_format(format, &source), &config)?;
            let report = DashboardReport::build(&table, &selection, &config)?;

            log_panels(&report);
            print_pretty(&report);

            match output_dir {
                Some(dir) => {
                    write_report(Path::new(&dir), &report, gzip)?;
                }
                None => print_json(&report)?,
            }
        }
        Commands::Options {
            source,
            config,
            format,
        } => {
            let config = load_config(config.as_deref())?;
            let bytes = fetch_source(&source)?;
            let table = load_table(&bytes, source_format(format, &source), &config)?;
            let options = SelectorOptions::from_table(&table, &config);

            info!(departments = ?options.departments, "Department options");
            for (department, branches) in &options.branches {
                info!(department = %department, branches = ?branches, "Branch options");
            }
            info!(semesters = ?options.semesters, "Semester options");
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<InstitutionConfig> {
    Ok(match path {
        Some(path) => {
            info!(path, "Loading institution config");
            InstitutionConfig::load(path)?
        }
        None => InstitutionConfig::default(),
    })
}

fn source_format(explicit: Option<SourceFormat>, source: &str) -> SourceFormat {
    explicit
        .or_else(|| SourceFormat::from_extension(source))
        .unwrap_or_default()
}

/// Logs a one-line summary for each panel of the report's view.
fn log_panels(report: &DashboardReport) {
    for (i, panel) in report.panels().iter().enumerate() {
        let title = panel.title();
        match panel {
            Panel::PassFail => {
                let count = |status: Status| {
                    report
                        .pass_fail
                        .iter()
                        .find(|c| c.status == status)
                        .map_or(0, |c| c.count)
                };
                info!(
                    panel = i + 1,
                    title,
                    total = report.students.len(),
                    pass = count(Status::Pass),
                    fail = count(Status::Fail),
                    "Panel"
                );
            }
            Panel::DepartmentPassFail => {
                for d in &report.department_pass_fail {
                    info!(panel = i + 1, title, department = %d.department, pass = d.pass, fail = d.fail, "Panel");
                }
            }
            Panel::Arrears => {
                for a in &report.arrears {
                    info!(
                        panel = i + 1,
                        title,
                        subjects_failed = a.subjects_failed,
                        students = a.student_count,
                        "Panel"
                    );
                }
            }
            Panel::SubjectPassFail => {
                for s in &report.subject_pass_fail {
                    info!(panel = i + 1, title, subject = %s.subject_code, pass = s.pass, fail = s.fail, "Panel");
                }
            }
            Panel::SubjectAverages => {
                for s in &report.subject_averages {
                    info!(
                        panel = i + 1,
                        title,
                        subject = %s.subject_code,
                        internal = ?s.internal,
                        external = ?s.external,
                        total = ?s.total,
                        "Panel"
                    );
                }
            }
            Panel::GradeDistribution => {
                info!(
                    panel = i + 1,
                    title,
                    rows = report.grade_distribution.len(),
                    "Panel"
                );
            }
        }
    }
}
