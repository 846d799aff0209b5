//! duplicate - Command-line interface for the duplicator engine.
//!
//! Fills `images/` in the current directory with randomly chosen copies of
//! the configured source files and writes `images/mapping.csv`.
//! Progress goes to stdout, warnings and errors to stderr.

use clap::Parser;
use std::cell::RefCell;
use std::io::{self, IsTerminal, Stderr, Stdout, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use engine::{
    job::run,
    model::{ExecutionReport, Plan, PlanEntry, RunOptions},
    progress::ProgressCallback,
    DuplicatorConfig, EngineError,
};

/// Duplicate files from the current directory into images/ with new names
#[derive(Parser, Debug)]
#[command(name = "duplicate")]
#[command(version)]
#[command(about = "Duplicate root files randomly into images/ with given names")]
struct Args {
    /// Try not to reuse the same source file (if possible)
    #[arg(long)]
    no_reuse: bool,

    /// Show what would be done but don't copy files
    #[arg(long)]
    dry_run: bool,

    /// Minimal output
    #[arg(long)]
    quiet: bool,

    /// JSON file overriding the built-in source and destination lists
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> RunOptions {
        RunOptions {
            no_reuse: self.no_reuse,
            dry_run: self.dry_run,
            verbose: !self.quiet,
        }
    }
}

/// CLI implementation of ProgressCallback: plan to `out`, problems to `err`
struct ConsoleReporter<O: Write, E: Write> {
    verbose: bool,
    out: RefCell<O>,
    err: RefCell<E>,
}

impl ConsoleReporter<Stdout, Stderr> {
    fn new(verbose: bool) -> Self {
        ConsoleReporter::with_writers(verbose, io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    fn with_writers(verbose: bool, out: O, err: E) -> Self {
        ConsoleReporter {
            verbose,
            out: RefCell::new(out),
            err: RefCell::new(err),
        }
    }

    // Console write failures are not worth aborting a run over
    fn say(&self, line: &str) {
        let _ = writeln!(self.out.borrow_mut(), "{}", line);
    }

    fn complain(&self, line: &str) {
        let _ = writeln!(self.err.borrow_mut(), "{}", line);
    }

    fn summary_line(plan: &Plan) -> String {
        format!(
            "Found {} source files, preparing to produce {} files in '{}'.",
            plan.source_count,
            plan.entries.len(),
            plan.destination_dir.display()
        )
    }

    fn entry_line(plan: &Plan, entry: &PlanEntry) -> String {
        format!(
            "{} -> {}",
            entry.source.file_name(),
            plan.relative_to_root(&entry.destination_path).display()
        )
    }

    fn copy_error_line(entry: &PlanEntry, message: &str) -> String {
        format!(
            "ERROR copying {} -> {}: {}",
            entry.source.path.display(),
            entry.destination_path.display(),
            message
        )
    }
}

impl<O: Write, E: Write> ProgressCallback for ConsoleReporter<O, E> {
    fn on_source_missing(&self, name: &str) {
        self.complain(&format!("WARNING: source file not found in root: {}", name));
    }

    fn on_plan_ready(&self, plan: &Plan, dry_run: bool) {
        if self.verbose {
            self.say(&Self::summary_line(plan));
        }
        if dry_run {
            self.say("DRY RUN: No files will actually be copied.");
        }
        if self.verbose {
            for entry in &plan.entries {
                self.say(&Self::entry_line(plan, entry));
            }
        }
    }

    fn on_entry_copied(&self, _plan: &Plan, _index: usize, _entry: &PlanEntry, _bytes: u64) {}

    fn on_entry_failed(&self, _plan: &Plan, _index: usize, entry: &PlanEntry, message: &str) {
        self.complain(&Self::copy_error_line(entry, message));
    }

    fn on_run_completed(&self, _plan: &Plan, report: &ExecutionReport) {
        if self.verbose {
            self.say(&format!("Done. mapping saved to: {}", report.mapping_path.display()));
        }
    }
}

fn main() {
    let args = Args::parse();

    // Engine events are debug-level; the reporter owns user-facing messages
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("ERROR: cannot determine the current directory: {}", e);
            std::process::exit(2);
        }
    };

    let reporter = ConsoleReporter::new(!args.quiet);
    let exit_code = match run_cli(&args, &root, &reporter) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("ERROR: {}", e.detailed_message());
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated for testability
fn run_cli(
    args: &Args,
    root: &Path,
    reporter: &dyn ProgressCallback,
) -> Result<(), EngineError> {
    let config = match &args.config {
        Some(path) => DuplicatorConfig::from_json_file(path)?,
        None => DuplicatorConfig::default(),
    };

    let options = args.options();

    tracing::debug!(root = %root.display(), ?options, "starting duplication");
    run(root, &config, options, Some(reporter))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::TempDir;

    type BufferReporter = ConsoleReporter<Vec<u8>, Vec<u8>>;

    fn buffer_reporter(verbose: bool) -> BufferReporter {
        ConsoleReporter::with_writers(verbose, Vec::new(), Vec::new())
    }

    fn lines(buf: &RefCell<Vec<u8>>) -> Vec<String> {
        String::from_utf8(buf.borrow().clone())
            .expect("Console output should be UTF-8")
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn run_quiet(args: &Args, root: &Path) -> Result<(), EngineError> {
        run_cli(args, root, &buffer_reporter(false))
    }

    fn args() -> Args {
        Args {
            no_reuse: false,
            dry_run: false,
            quiet: true,
            config: None,
        }
    }

    fn write_config(dir: &Path, sources: &[&str], destinations: &[&str]) -> PathBuf {
        let config = DuplicatorConfig {
            sources: sources.iter().map(|s| s.to_string()).collect(),
            destinations: destinations.iter().map(|s| s.to_string()).collect(),
            ..DuplicatorConfig::default()
        };
        let path = dir.join("duplicate.json");
        fs::write(&path, serde_json::to_string(&config).expect("Failed to serialize"))
            .expect("Failed to write config");
        path
    }

    #[test]
    fn test_flags_parse() {
        let args = Args::try_parse_from(["duplicate", "--no-reuse", "--dry-run", "--quiet"])
            .expect("Flags should parse");
        assert_eq!(
            args.options(),
            RunOptions {
                no_reuse: true,
                dry_run: true,
                verbose: false,
            }
        );

        let defaults = Args::try_parse_from(["duplicate"]).expect("No flags should parse");
        assert_eq!(defaults.options(), RunOptions::default());
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Args::try_parse_from(["duplicate", "--force"]).is_err());
    }

    #[test]
    fn test_cli_with_default_config() {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::write(root.path().join("download.jpg"), b"jpeg").expect("Failed to write file");

        run_quiet(&args(), root.path()).expect("CLI should succeed with one source");

        let images = root.path().join("images");
        assert_eq!(fs::read(images.join("alumni.jpg")).unwrap(), b"jpeg");
        assert_eq!(fs::read(images.join("1.svg")).unwrap(), b"jpeg");

        let mut reader =
            csv::Reader::from_path(images.join("mapping.csv")).expect("Failed to open mapping");
        assert_eq!(reader.records().count(), 55);
    }

    #[test]
    fn test_cli_without_sources_exits_1() {
        let root = TempDir::new().expect("Failed to create temp dir");

        let err = run_quiet(&args(), root.path()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(!root.path().join("images").exists());
    }

    #[test]
    fn test_cli_dry_run_writes_nothing() {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::write(root.path().join("images.jpg"), b"jpeg").expect("Failed to write file");

        let mut args = args();
        args.dry_run = true;
        run_quiet(&args, root.path()).expect("Dry run should succeed");

        assert!(!root.path().join("images").exists());
    }

    #[test]
    fn test_cli_with_config_file() {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::write(root.path().join("a.svg"), b"<svg/>").expect("Failed to write file");
        let config = write_config(root.path(), &["a.svg"], &["images/logo.svg"]);

        let mut args = args();
        args.config = Some(config);
        run_quiet(&args, root.path()).expect("CLI should succeed with config file");

        assert_eq!(fs::read(root.path().join("images/logo.svg")).unwrap(), b"<svg/>");
    }

    #[test]
    fn test_cli_rejects_bad_config() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let path = root.path().join("broken.json");
        fs::write(&path, "[1, 2").expect("Failed to write config");

        let mut args = args();
        args.config = Some(path);
        let err = run_quiet(&args, root.path()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigLoad { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_cli_mapping_failure_exits_2() {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::write(root.path().join("download.jpg"), b"jpeg").expect("Failed to write file");
        fs::create_dir_all(root.path().join("images/mapping.csv")).expect("Failed to create dir");

        let err = run_quiet(&args(), root.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_report_lines() {
        let root = Path::new("/site");
        let config = DuplicatorConfig {
            sources: vec!["download (2).jpg".to_string()],
            destinations: vec!["images/alumni.jpg".to_string()],
            ..DuplicatorConfig::default()
        };
        let sources = vec![engine::SourceFile::new(root, "download (2).jpg")];
        let plan = engine::build_plan(
            root,
            &config,
            &sources,
            &config.destination_specs(),
            false,
            &mut StdRng::seed_from_u64(0),
        )
        .expect("Failed to plan");

        assert_eq!(
            BufferReporter::summary_line(&plan),
            "Found 1 source files, preparing to produce 1 files in '/site/images'."
        );
        assert_eq!(
            BufferReporter::entry_line(&plan, &plan.entries[0]),
            "download (2).jpg -> images/alumni.jpg"
        );
        assert_eq!(
            BufferReporter::copy_error_line(&plan.entries[0], "denied"),
            "ERROR copying /site/download (2).jpg -> /site/images/alumni.jpg: denied"
        );
    }

    #[test]
    fn test_each_missing_source_reported_once() {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::write(root.path().join("download.jpg"), b"jpeg").expect("Failed to write file");
        fs::create_dir_all(root.path().join("images/1.svg")).expect("Failed to create dir");

        let reporter = buffer_reporter(false);
        run_cli(&args(), root.path(), &reporter).expect("Run should succeed");

        let errors = lines(&reporter.err);
        let warnings: Vec<_> = errors.iter().filter(|l| l.starts_with("WARNING:")).collect();
        assert_eq!(warnings.len(), 10);
        assert!(warnings.contains(&&"WARNING: source file not found in root: download (1).jpg".to_string()));

        let copy_errors: Vec<_> = errors.iter().filter(|l| l.starts_with("ERROR copying")).collect();
        assert_eq!(copy_errors.len(), 1);
        assert!(copy_errors[0].contains("images/1.svg"));
        assert_eq!(errors.len(), 11);

        assert!(lines(&reporter.out).is_empty(), "quiet run should print nothing to stdout");
    }

    #[test]
    fn test_verbose_dry_run_output() {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::write(root.path().join("a.svg"), b"<svg/>").expect("Failed to write file");
        let config = write_config(root.path(), &["a.svg"], &["images/1.svg", "images/2.svg"]);

        let mut args = args();
        args.dry_run = true;
        args.config = Some(config);
        let reporter = buffer_reporter(true);
        run_cli(&args, root.path(), &reporter).expect("Dry run should succeed");

        let out = lines(&reporter.out);
        assert_eq!(out.len(), 4);
        assert!(out[0].starts_with("Found 1 source files, preparing to produce 2 files in"));
        assert_eq!(out[1], "DRY RUN: No files will actually be copied.");
        assert_eq!(out[2], "a.svg -> images/1.svg");
        assert_eq!(out[3], "a.svg -> images/2.svg");
        assert!(lines(&reporter.err).is_empty());
    }
}
