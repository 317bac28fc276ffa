// File: src/test_runner.rs
//
// Snapshot test runner for SimPL programs.
//
// Each `*.simpl` file in a directory is run with a fresh interpreter. Its
// printed output, followed by any diagnostics, is compared against the
// sibling `.out` file. Missing snapshots are written on first run, and
// `--update` regenerates all of them.
//
// A program may pick interpreter options with a leading comment:
//     // simpl: block-scope strict-math

use crate::interpreter::{Interpreter, InterpreterOptions, Scoping, SharedOutput};
use colored::Colorize;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Result from checking a single program against its snapshot
#[derive(Clone, Debug)]
pub struct SnapshotResult {
    pub path: PathBuf,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub duration: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct SnapshotReport {
    pub results: Vec<SnapshotResult>,
}

impl SnapshotReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Prints one line per program and a summary, with colored markers
    pub fn print(&self) {
        for result in &self.results {
            if result.passed {
                println!(
                    "{} {} {}",
                    "[✓]".bright_green(),
                    result.path.display(),
                    format!("({:.2?})", result.duration).dimmed()
                );
            } else {
                println!("{} {}", "[✗]".bright_red(), result.path.display());
                println!("Expected:\n{}\nGot:\n{}\n", result.expected, result.actual);
            }
        }

        let summary = format!("Passed {}/{} tests", self.passed(), self.total());
        if self.all_passed() {
            println!("\n{} {}", "[✓]".bright_green(), summary);
        } else {
            println!("\n{} {}", "[✗]".bright_red(), summary);
        }
    }
}

/// Reads interpreter options from a `// simpl:` header comment
pub fn options_from_header(source: &str) -> InterpreterOptions {
    let mut options = InterpreterOptions::default();
    let header = source
        .lines()
        .map(str::trim)
        .take_while(|line| line.starts_with("//"))
        .map(|line| line.trim_start_matches('/').trim())
        .filter_map(|line| line.strip_prefix("simpl:"));

    for flags in header {
        for flag in flags.split_whitespace() {
            match flag {
                "block-scope" => options.scoping = Scoping::Block,
                "strict-math" => options.strict_math = true,
                _ => {}
            }
        }
    }
    options
}

/// Runs a program and returns what it printed followed by any diagnostics,
/// trimmed of surrounding whitespace
pub fn render_program(source: &str) -> String {
    let buffer: SharedOutput = Rc::new(RefCell::new(Vec::new()));
    let mut interpreter = Interpreter::with_options(options_from_header(source));
    interpreter.set_output(buffer.clone());

    let outcome = crate::run_source(source, &mut interpreter);

    let mut rendered = String::from_utf8_lossy(&buffer.borrow()).into_owned();
    if let Err(error) = outcome {
        rendered.push_str(&error.to_string());
        rendered.push('\n');
    }
    rendered.trim().to_string()
}

/// Runs every `*.simpl` program in `dir`, in file name order
pub fn run_directory(dir: &Path, update_snapshots: bool) -> io::Result<SnapshotReport> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |e| e == "simpl"))
        .collect();
    paths.sort();

    let mut report = SnapshotReport::default();
    for path in paths {
        report.results.push(run_snapshot(&path, update_snapshots)?);
    }
    Ok(report)
}

fn run_snapshot(path: &Path, update_snapshots: bool) -> io::Result<SnapshotResult> {
    let source = fs::read_to_string(path)?;
    let expected_path = path.with_extension("out");

    let start = Instant::now();
    let actual = render_program(&source);
    let duration = start.elapsed();

    let expected = if expected_path.exists() && !update_snapshots {
        fs::read_to_string(&expected_path)?.trim().to_string()
    } else {
        fs::write(&expected_path, format!("{}\n", actual))?;
        actual.clone()
    };

    Ok(SnapshotResult {
        path: path.to_path_buf(),
        passed: actual == expected,
        expected,
        actual,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_selects_options() {
        let options = options_from_header("// simpl: block-scope\n// simpl: strict-math\nprint 1;");
        assert_eq!(options.scoping, Scoping::Block);
        assert!(options.strict_math);
    }

    #[test]
    fn test_header_stops_at_first_code_line() {
        let options = options_from_header("print 1;\n// simpl: strict-math\n");
        assert_eq!(options, InterpreterOptions::default());
    }

    #[test]
    fn test_render_program_appends_diagnostics() {
        let rendered = render_program("let a = 1; print a; print b;");
        assert_eq!(rendered, "1\nRuntime Error: Undefined variable 'b'.");
    }
}
