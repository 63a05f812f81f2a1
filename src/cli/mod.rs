//! CLI command definitions and status output.
//!
//! Uses clap derive macros for argument definitions. Status lines go to
//! stderr so stdout carries only the rendered report.

pub mod args;

use colored::ColoredString;
use std::io::Write;

/// Print one status line to stderr.
pub fn status(line: ColoredString) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = writeln!(handle, "{line}");
}
