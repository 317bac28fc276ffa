// File: src/diagnostics.rs
//
// Diagnostic and progress reporting for the SimPL tools.
// Everything here goes to stderr so program output on stdout stays clean.
// Colors come from the `colored` crate and can be switched off globally.

use crate::errors::{EvaluationError, RunError, SyntaxError};
use colored::Colorize;
use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

/// Turns ANSI coloring on or off for the whole process
pub fn set_color_enabled(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}

/// Writes colored diagnostics, plus phase notes when verbose
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Reporter { verbose }
    }

    /// `[line L] Error: <message>`
    pub fn syntax_error(&self, error: &SyntaxError) {
        eprintln!(
            "{} {}",
            format!("[line {}] Error:", error.line()).red().bold(),
            error.message
        );
    }

    /// `Runtime Error: <message>`, followed by location and any suggestion
    pub fn runtime_error(&self, error: &EvaluationError) {
        eprintln!("{} {}", "Runtime Error:".red().bold(), error.kind);
        eprintln!("{}", format!("  --> line {}", error.line).bright_blue());
        if let Some(ref suggestion) = error.suggestion {
            eprintln!(
                "   {} {}",
                "=".bright_green(),
                format!("Did you mean '{}'?", suggestion).bright_green()
            );
        }
    }

    pub fn run_error(&self, error: &RunError) {
        match error {
            RunError::Syntax(errors) => errors.iter().for_each(|e| self.syntax_error(e)),
            RunError::Evaluation(e) => self.runtime_error(e),
        }
    }

    pub fn io_error(&self, path: &Path, error: &std::io::Error) {
        eprintln!(
            "{} could not read {}: {}",
            "Error:".red().bold(),
            path.display(),
            error
        );
    }

    /// Phase timing note, shown only with --verbose
    pub fn note(&self, phase: &str, detail: impl Display, elapsed: Duration) {
        if self.verbose {
            eprintln!(
                "{} {} {}",
                format!("[{}]", phase).bright_cyan(),
                detail,
                format!("({:.2?})", elapsed).dimmed()
            );
        }
    }
}
