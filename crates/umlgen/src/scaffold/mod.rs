//! Project scaffolding: request validation, generation and publication
//!
//! [`export`] is the whole pipeline for one request. Validation happens
//! before any I/O, generation is pure, and publication is all-or-nothing.

mod archive;
mod request;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, span, Level};

use crate::core::{ArchiveFormat, Diagnostics, ExportResult, ExportTarget, GeneratorConfig, ProjectSettings};
use crate::plugins::Orchestrator;

pub use archive::{publish, write_directory, write_tar_gz, Deadline};
pub use request::ExportRequest;

/// Result of a successful export
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub archive_path: PathBuf,
    pub files_written: usize,
    pub diagnostics: Diagnostics,
}

/// `<project>-<target>` plus the format's extension, e.g. `myshop-fullstack.tar.gz`
pub fn default_output_name(settings: &ProjectSettings, target: ExportTarget, format: ArchiveFormat) -> String {
    format!(
        "{}-{}{}",
        settings.java_segment(),
        target.as_str(),
        format.extension()
    )
}

/// Validate, generate and publish one request at `destination`
pub fn export(
    request: ExportRequest,
    target: ExportTarget,
    config: GeneratorConfig,
    destination: &Path,
) -> ExportResult<ExportOutcome> {
    export_with(&Orchestrator::with_all_plugins(), request, target, config, destination)
}

/// [`export`] with a caller-supplied set of emitters
pub fn export_with(
    orchestrator: &Orchestrator,
    request: ExportRequest,
    target: ExportTarget,
    config: GeneratorConfig,
    destination: &Path,
) -> ExportResult<ExportOutcome> {
    let export_span = span!(
        Level::INFO,
        "export",
        target = target.as_str(),
        destination = %destination.display()
    );
    let _enter = export_span.enter();

    let format = config.archive_format;
    let deadline = Deadline::starting_now(config.io_timeout());
    let (diagram, settings) = request.into_parts(config)?;

    let generation = orchestrator.generate(&diagram, settings, target)?;
    let files_written = publish(&generation.artifacts, destination, format, &deadline)?;

    info!(
        files = files_written,
        warnings = generation.diagnostics.warning_count(),
        path = %destination.display(),
        "Export completed"
    );
    Ok(ExportOutcome {
        archive_path: destination.to_path_buf(),
        files_written,
        diagnostics: generation.diagnostics,
    })
}
