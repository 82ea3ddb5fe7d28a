//! The Combinatoria Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::cli::args::{Command, CombinatoriaArgs, Format};
use crate::{loader, CombinatoriaError};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = CombinatoriaArgs::parse();
    init_logging(args.verbose);

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::List { file, test, format } => handle_list(&file, test.as_deref(), format),
        Command::Count { file, test } => handle_count(&file, test.as_deref()),
        Command::Check { path } => handle_check(&path),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            output::print_error(e);
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "combinatoria=debug",
        _ => "combinatoria=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

type CommandResult = Result<bool, CombinatoriaError>;

fn write_failed(e: std::io::Error) -> CombinatoriaError {
    CombinatoriaError::load("failed to write output", e)
}

/// Handles the `list` subcommand.
fn handle_list(path: &Path, test: Option<&str>, format: Format) -> CommandResult {
    let mut engine = loader::from_file(path, test)?;
    match format {
        Format::Text => {
            for (index, combination) in engine.combinations().enumerate() {
                output::print_combination(index + 1, &combination).map_err(write_failed)?;
            }
        }
        Format::Json => {
            let combinations: Vec<_> = engine.combinations().collect();
            output::print_json(&combinations).map_err(write_failed)?;
        }
    }
    Ok(true)
}

/// Handles the `count` subcommand.
fn handle_count(path: &Path, test: Option<&str>) -> CommandResult {
    let mut engine = loader::from_file(path, test)?;
    println!("{}", engine.combinations().count());
    Ok(true)
}

/// Handles the `check` subcommand: compiles every block of every file.
fn handle_check(path: &Path) -> CommandResult {
    let files = discover_combination_files(path)?;
    let mut failed = 0;
    for file in &files {
        if let Err(e) = check_file(file) {
            failed += 1;
            eprintln!("{}:", file.display());
            output::print_error(e);
        }
    }
    let ok = failed == 0;
    output::print_summary(
        &format!("{} files checked, {} failed", files.len(), failed),
        ok,
    )
    .map_err(write_failed)?;
    Ok(ok)
}

fn check_file(path: &Path) -> Result<(), CombinatoriaError> {
    let source = fs::read_to_string(path).map_err(|e| {
        CombinatoriaError::load(format!("failed to read '{}'", path.display()), e)
    })?;
    for block in loader::block_names(&source)? {
        debug!(path = %path.display(), block = ?block, "checking block");
        loader::from_str(&source, block.as_deref())?;
    }
    Ok(())
}

/// Returns `path` itself for a file, otherwise every `.yaml`/`.yml` file
/// below it in sorted order.
fn discover_combination_files(path: &Path) -> Result<Vec<PathBuf>, CombinatoriaError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| CombinatoriaError::load("failed to walk directory", e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_yaml = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if is_yaml {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
