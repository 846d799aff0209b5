//! Run orchestration module.
//!
//! This module provides the duplicator's steps:
//! - Validating the configured sources against the root
//! - Building the plan (one source per destination)
//! - Executing the plan (copies plus mapping CSV)
//! - `run`, which chains them the way the CLI needs

use std::io;
use std::path::Path;
use rand::Rng;
use crate::config::DuplicatorConfig;
use crate::error::EngineError;
use crate::fs_ops;
use crate::model::{
    DestinationSpec, EntryOutcome, ExecutionReport, Plan, PlanEntry, RunOptions, SourceFile,
};
use crate::progress::ProgressCallback;
use crate::select::SourceSelector;

/// Resolve the configured source names against `root`, keeping the ones that
/// are regular files.
///
/// Missing names are reported through `on_source_missing` and skipped.
///
/// # Errors
/// `NoValidSources` if nothing resolved.
pub fn validate_sources(
    root: &Path,
    names: &[String],
    progress_callback: Option<&dyn ProgressCallback>,
) -> Result<Vec<SourceFile>, EngineError> {
    let mut sources = Vec::with_capacity(names.len());

    for name in names {
        let source = SourceFile::new(root, name);
        if fs_ops::is_regular_file(&source.path) {
            tracing::debug!(source = %name, extension = %source.extension, "source found");
            sources.push(source);
        } else {
            tracing::debug!(source = %name, "source file not found");
            if let Some(callback) = progress_callback {
                callback.on_source_missing(name);
            }
        }
    }

    if sources.is_empty() {
        return Err(EngineError::NoValidSources {
            root: root.to_path_buf(),
        });
    }

    Ok(sources)
}

/// Choose a source for every destination, in destination order.
///
/// # Errors
/// `NoValidSources` if `sources` is empty.
pub fn build_plan<R: Rng + ?Sized>(
    root: &Path,
    config: &DuplicatorConfig,
    sources: &[SourceFile],
    destinations: &[DestinationSpec],
    no_reuse: bool,
    rng: &mut R,
) -> Result<Plan, EngineError> {
    let destination_dir = config.destination_dir(root);
    let mut selector = SourceSelector::new(sources, no_reuse);
    let mut entries = Vec::with_capacity(destinations.len());

    for destination in destinations {
        let chosen = selector
            .choose(&destination.extension, rng)
            .ok_or_else(|| EngineError::NoValidSources {
                root: root.to_path_buf(),
            })?;
        let source = sources[chosen].clone();
        let destination_path = destination_dir.join(destination.basename());

        tracing::debug!(
            source = %source.name,
            destination = %destination.relative.display(),
            "planned"
        );

        entries.push(PlanEntry {
            destination: destination.clone(),
            destination_path,
            source,
        });
    }

    Ok(Plan {
        root: root.to_path_buf(),
        mapping_path: config.mapping_path(root),
        destination_dir,
        source_count: sources.len(),
        entries,
    })
}

/// Execute a plan: create the destination directory, copy every entry and
/// write the mapping CSV.
///
/// A failed copy is recorded in the report and reported through
/// `on_entry_failed`; its mapping row is still written. An entry whose
/// destination is the mapping file itself always fails.
///
/// # Errors
/// `DirectoryCreationFailed`, `MappingOpenFailed` or `MappingWriteFailed`.
/// Copies made before the failure are left in place.
pub fn execute_plan(
    plan: &Plan,
    progress_callback: Option<&dyn ProgressCallback>,
) -> Result<ExecutionReport, EngineError> {
    fs_ops::ensure_dir_exists(&plan.destination_dir)?;

    let mut writer =
        csv::Writer::from_path(&plan.mapping_path).map_err(|e| EngineError::MappingOpenFailed {
            path: plan.mapping_path.clone(),
            source: e,
        })?;
    let write_failed = |e: csv::Error| EngineError::MappingWriteFailed {
        path: plan.mapping_path.clone(),
        source: e,
    };

    writer
        .write_record(["destination", "source"])
        .map_err(write_failed)?;

    let mut outcomes = Vec::with_capacity(plan.entries.len());

    for (index, entry) in plan.entries.iter().enumerate() {
        let copied = if entry.destination_path == plan.mapping_path {
            Err(EngineError::WriteError {
                path: entry.destination_path.clone(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "destination is the mapping file",
                ),
            })
        } else {
            fs_ops::copy_file_with_metadata(&entry.source.path, &entry.destination_path)
        };

        match copied {
            Ok(bytes) => {
                if let Some(callback) = progress_callback {
                    callback.on_entry_copied(plan, index, entry, bytes);
                }
                outcomes.push(EntryOutcome::Copied { bytes });
            }
            Err(e) => {
                let message = e.detailed_message();
                tracing::debug!(
                    source = %entry.source.path.display(),
                    destination = %entry.destination_path.display(),
                    error = %message,
                    "copy failed"
                );
                if let Some(callback) = progress_callback {
                    callback.on_entry_failed(plan, index, entry, &message);
                }
                outcomes.push(EntryOutcome::Failed { message });
            }
        }

        let row = [
            plan.relative_to_root(&entry.destination_path)
                .to_string_lossy()
                .into_owned(),
            plan.relative_to_root(&entry.source.path)
                .to_string_lossy()
                .into_owned(),
        ];
        writer.write_record(&row).map_err(write_failed)?;
    }

    writer
        .flush()
        .map_err(|e| write_failed(csv::Error::from(e)))?;

    let report = ExecutionReport {
        outcomes,
        mapping_path: plan.mapping_path.clone(),
    };

    tracing::info!(
        copied = report.copied_count(),
        failed = report.failed_count(),
        mapping = %report.mapping_path.display(),
        "duplication finished"
    );

    if let Some(callback) = progress_callback {
        callback.on_run_completed(plan, &report);
    }

    Ok(report)
}

/// Validate, plan, report and (unless `dry_run`) execute, using `rng` for
/// source selection.
///
/// Returns the plan together with the execution report, which is `None`
/// for dry runs. Nothing is written to disk before validation succeeds, and
/// nothing at all on a dry run.
pub fn run_with_rng<R: Rng + ?Sized>(
    root: &Path,
    config: &DuplicatorConfig,
    options: RunOptions,
    rng: &mut R,
    progress_callback: Option<&dyn ProgressCallback>,
) -> Result<(Plan, Option<ExecutionReport>), EngineError> {
    let sources = validate_sources(root, &config.sources, progress_callback)?;
    let destinations = config.destination_specs();
    let plan = build_plan(root, config, &sources, &destinations, options.no_reuse, rng)?;

    if let Some(callback) = progress_callback {
        callback.on_plan_ready(&plan, options.dry_run);
    }

    if options.dry_run {
        return Ok((plan, None));
    }

    let report = execute_plan(&plan, progress_callback)?;
    Ok((plan, Some(report)))
}

/// [`run_with_rng`] with the thread-local random number generator.
pub fn run(
    root: &Path,
    config: &DuplicatorConfig,
    options: RunOptions,
    progress_callback: Option<&dyn ProgressCallback>,
) -> Result<(Plan, Option<ExecutionReport>), EngineError> {
    run_with_rng(root, config, options, &mut rand::thread_rng(), progress_callback)
}
