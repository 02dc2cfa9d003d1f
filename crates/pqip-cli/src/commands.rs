//! Command implementations.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use pqip_ingest::{ReferenceLookup, load_reference_data};
use pqip_model::{IngestOptions, ReferenceOptions};
use pqip_report::{AuditReport, EquityAnalysis, analyse_equity, write_enriched_csv};
use pqip_transform::{AuditFrame, process_monthly_data};

use crate::cli::{AuditArgs, EquityArgs, InputArgs};

/// Environment variable naming the deprivation reference file.
pub const REFERENCE_ENV: &str = "PQIP_IMD_PATH";

/// The `--reference` flag wins over the environment; empty values are ignored.
pub fn resolve_reference_path(
    flag: Option<&Path>,
    env_value: Option<OsString>,
) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| env_value.filter(|value| !value.is_empty()).map(PathBuf::from))
}

/// Loads the reference file behind a spinner. A missing path is not an
/// error: enrichment reports the lookup as unavailable.
pub fn load_reference(path: Option<&Path>) -> ReferenceLookup {
    let Some(path) = path else {
        warn!("no deprivation reference configured, deprivation will be Unknown");
        return ReferenceLookup::unavailable(format!(
            "no reference file given (use --reference or {REFERENCE_ENV})"
        ));
    };
    let spinner = reference_spinner(path);
    let lookup = load_reference_data(path, &ReferenceOptions::default());
    spinner.finish_and_clear();
    lookup
}

fn reference_spinner(path: &Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Loading deprivation reference {}", source_name(path)));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn load_frame(input: &InputArgs) -> Result<AuditFrame> {
    let options = IngestOptions::default()
        .with_metadata_rows(input.metadata_rows)
        .with_datetime_format(input.datetime_format.as_str());
    let reference_path = resolve_reference_path(
        input.reference.as_deref(),
        std::env::var_os(REFERENCE_ENV),
    );
    let reference = load_reference(reference_path.as_deref());
    process_monthly_data(&input.export, &reference, &options)
        .with_context(|| format!("process export {}", input.export.display()))
}

pub fn run_audit(args: &AuditArgs) -> Result<AuditReport> {
    let export = &args.input.export;
    let span = info_span!("audit", export = %source_name(export));
    let _guard = span.enter();

    let mut frame = load_frame(&args.input)?;
    let report = AuditReport::from_frame(&frame)
        .context("build audit report")?
        .with_source(source_name(export));

    if let Some(path) = &args.json {
        report
            .write_json(path)
            .with_context(|| format!("write report {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        write_enriched_csv(&mut frame.data, path)
            .with_context(|| format!("write enriched table {}", path.display()))?;
    }
    info!(
        rows = frame.row_count(),
        warnings = frame.warnings.len(),
        "audit complete"
    );
    Ok(report)
}

pub fn run_equity(args: &EquityArgs) -> Result<EquityAnalysis> {
    let span = info_span!("equity", export = %source_name(&args.input.export));
    let _guard = span.enter();

    let frame = load_frame(&args.input)?;
    analyse_equity(&frame.data, args.group.into(), args.outcome.into())
        .context("analyse equity")
}
