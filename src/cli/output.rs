//! Handles all user-facing output for the CLI.
//!
//! Combinations go to stdout; diagnostics and logs go to stderr.

use std::io::{self, Write};

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{Combination, CombinatoriaError};

/// Prints one combination as a numbered block of `name: [value]` lines.
pub fn print_combination(index: usize, combination: &Combination) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    writeln!(stdout, "--- Combination {index} ---")?;
    stdout.reset()?;
    write!(stdout, "{combination}")?;
    Ok(())
}

/// Prints every combination as a JSON array of objects.
pub fn print_json(combinations: &[Combination]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(combinations).map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}

/// Prints a summary line to stderr, green when everything passed.
pub fn print_summary(label: &str, ok: bool) -> io::Result<()> {
    write_summary(&mut StandardStream::stderr(ColorChoice::Auto), label, ok)
}

fn write_summary(out: &mut impl WriteColor, label: &str, ok: bool) -> io::Result<()> {
    let color = if ok { Color::Green } else { Color::Red };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(out, "{label}")?;
    out.reset()
}

/// Prints a `CombinatoriaError` with full miette diagnostics.
pub fn print_error(error: CombinatoriaError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}
