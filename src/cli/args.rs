//! Defines the command-line arguments and subcommands for the Combinatoria CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "combinatoria",
    version,
    about = "Enumerate filtered combinations of test parameters."
)]
pub struct CombinatoriaArgs {
    /// Increase log verbosity (-v for debug, -vv for trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every accepted combination.
    List {
        /// The combination file to enumerate.
        #[arg(required = true)]
        file: PathBuf,
        /// Use the combinations declared for this test.
        #[arg(short, long)]
        test: Option<String>,
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the number of accepted combinations.
    Count {
        /// The combination file to enumerate.
        #[arg(required = true)]
        file: PathBuf,
        /// Use the combinations declared for this test.
        #[arg(short, long)]
        test: Option<String>,
    },
    /// Compile every combination file under a path and report errors.
    Check {
        /// A combination file or a directory to search for `.yaml`/`.yml` files.
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}
