//! Progress reporting trait.
//!
//! This module defines the ProgressCallback trait, which keeps the engine
//! free of console output. The CLI implements it to print the plan to
//! stdout and warnings/errors to stderr.

use crate::model::{ExecutionReport, Plan, PlanEntry};

/// Trait for receiving progress updates from a duplication run.
///
/// All methods are called synchronously, in run order.
pub trait ProgressCallback {
    /// A configured source name did not resolve to a file and was skipped.
    fn on_source_missing(&self, name: &str);

    /// The plan has been built. Called for dry runs too.
    fn on_plan_ready(&self, plan: &Plan, dry_run: bool);

    /// An entry was copied.
    fn on_entry_copied(&self, plan: &Plan, index: usize, entry: &PlanEntry, bytes: u64);

    /// An entry failed to copy; the run continues.
    fn on_entry_failed(&self, plan: &Plan, index: usize, entry: &PlanEntry, message: &str);

    /// Every entry was processed and the mapping file is complete.
    fn on_run_completed(&self, plan: &Plan, report: &ExecutionReport);
}
