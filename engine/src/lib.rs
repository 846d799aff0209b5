//! # Duplicator Engine - Random File Duplication Library
//!
//! A headless engine that fills a destination directory with copies of
//! randomly chosen source files, one per configured destination name, and
//! records which source went where in a CSV mapping.
//!
//! ## Overview
//!
//! - Source validation against a root directory (missing names are skipped)
//! - Same-extension preference, with a fallback pool that can avoid reuse
//! - Per-entry error isolation: a failed copy never stops the run
//! - Progress reporting via callbacks (decoupled from any UI)
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{run, DuplicatorConfig, RunOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = std::env::current_dir()?;
//! let config = DuplicatorConfig::default();
//!
//! let (plan, report) = run(&root, &config, RunOptions::default(), None)?;
//! println!("Planned {} files", plan.entries.len());
//!
//! if let Some(report) = report {
//!     println!("{} copied, {} failed", report.copied_count(), report.failed_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Core data structures (SourceFile, Plan, ExecutionReport, RunOptions)
//! - **config**: Built-in source/destination lists and JSON loading
//! - **error**: Error types and exit codes
//! - **fs_ops**: Low-level filesystem operations
//! - **select**: Extension index and no-reuse pool
//! - **job**: Run orchestration (validate, plan, execute)
//! - **progress**: Progress callback trait

pub mod model;
pub mod config;
pub mod error;
pub mod fs_ops;
pub mod select;
pub mod job;
pub mod progress;

// Re-export main types and functions
pub use model::{
    DestinationSpec, EntryOutcome, ExecutionReport, Plan, PlanEntry, RunOptions, SourceFile,
};
pub use config::DuplicatorConfig;
pub use error::EngineError;
pub use select::{ExtensionIndex, SourcePool, SourceSelector};
pub use job::{build_plan, execute_plan, run, run_with_rng, validate_sources};
pub use progress::ProgressCallback;
