// File: src/main.rs
//
// Main entry point for the SimPL command-line tool.
// Handles command-line argument parsing and dispatches to the appropriate
// subcommand (run, tokens, ast, repl, or test).

use clap::{Args, Parser as ClapParser, Subcommand};
use simpl::diagnostics::{self, Reporter};
use simpl::interpreter::{Interpreter, InterpreterOptions, Scoping};
use simpl::parser::Parser;
use simpl::repl::Repl;
use simpl::{lexer, test_runner};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

const EXIT_SYNTAX_ERROR: u8 = 65;
const EXIT_RUNTIME_ERROR: u8 = 70;
const EXIT_IO_ERROR: u8 = 74;

#[derive(ClapParser)]
#[command(
    name = "simpl",
    about = "SimPL: a small language with a tree-walking interpreter",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    /// Disable colored diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    /// Log each pipeline phase with timings to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct RuntimeFlags {
    /// Give every block its own variable frame
    #[arg(long)]
    block_scope: bool,

    /// Treat division or remainder by zero as a runtime error
    #[arg(long)]
    strict_math: bool,
}

impl From<RuntimeFlags> for InterpreterOptions {
    fn from(flags: RuntimeFlags) -> Self {
        let scoping = if flags.block_scope {
            Scoping::Block
        } else {
            Scoping::Flat
        };
        InterpreterOptions {
            scoping,
            strict_math: flags.strict_math,
        }
    }
}

#[derive(Subcommand)]
#[command(arg_required_else_help = true)]
enum Commands {
    /// Run a SimPL source file
    Run {
        /// Path to the source file
        file: PathBuf,

        #[command(flatten)]
        flags: RuntimeFlags,
    },

    /// Print the token stream of a source file
    Tokens {
        file: PathBuf,
    },

    /// Print the parsed syntax tree of a source file
    Ast {
        file: PathBuf,
    },

    /// Launch the interactive REPL
    Repl {
        #[command(flatten)]
        flags: RuntimeFlags,
    },

    /// Run snapshot tests over a directory of .simpl programs
    Test {
        /// Directory holding .simpl programs and their .out files
        #[arg(default_value = "tests/programs")]
        dir: PathBuf,

        /// Regenerate all .out files based on actual output
        #[arg(long)]
        update: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    diagnostics::set_color_enabled(!cli.no_color);
    let reporter = Reporter::new(cli.verbose);

    match cli.command {
        Commands::Run { file, flags } => run_file(&file, flags.into(), &reporter),
        Commands::Tokens { file } => dump_tokens(&file, &reporter),
        Commands::Ast { file } => dump_ast(&file, &reporter),
        Commands::Repl { flags } => match Repl::new(flags.into()).and_then(|mut repl| repl.run()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("REPL failed: {}", err);
                ExitCode::FAILURE
            }
        },
        Commands::Test { dir, update } => match test_runner::run_directory(&dir, update) {
            Ok(report) => {
                report.print();
                if report.all_passed() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            Err(err) => {
                reporter.io_error(&dir, &err);
                ExitCode::from(EXIT_IO_ERROR)
            }
        },
    }
}

fn read_source(path: &Path, reporter: &Reporter) -> Result<String, ExitCode> {
    fs::read_to_string(path).map_err(|err| {
        reporter.io_error(path, &err);
        ExitCode::from(EXIT_IO_ERROR)
    })
}

fn run_file(path: &Path, options: InterpreterOptions, reporter: &Reporter) -> ExitCode {
    let source = match read_source(path, reporter) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let start = Instant::now();
    let tokens = lexer::tokenize(&source);
    reporter.note("lex", format!("{} tokens", tokens.len()), start.elapsed());

    let start = Instant::now();
    let mut parser = Parser::new(tokens);
    let stmts = parser.parse();
    let errors = parser.take_errors();
    reporter.note(
        "parse",
        format!("{} statements, {} syntax errors", stmts.len(), errors.len()),
        start.elapsed(),
    );
    if !errors.is_empty() {
        errors.iter().for_each(|e| reporter.syntax_error(e));
        return ExitCode::from(EXIT_SYNTAX_ERROR);
    }

    let start = Instant::now();
    let mut interpreter = Interpreter::with_options(options);
    let result = interpreter.interpret(&stmts);
    let bound = interpreter.variables().len();
    reporter.note("run", format!("{} variables bound", bound), start.elapsed());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            reporter.runtime_error(&error);
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

fn dump_tokens(path: &Path, reporter: &Reporter) -> ExitCode {
    match read_source(path, reporter) {
        Ok(source) => {
            for token in lexer::tokenize(&source) {
                println!("{}", token);
            }
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

fn dump_ast(path: &Path, reporter: &Reporter) -> ExitCode {
    let source = match read_source(path, reporter) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let mut parser = Parser::new(lexer::tokenize(&source));
    for stmt in parser.parse() {
        println!("{}", stmt);
    }

    if parser.has_errors() {
        parser.errors().iter().for_each(|e| reporter.syntax_error(e));
        ExitCode::from(EXIT_SYNTAX_ERROR)
    } else {
        ExitCode::SUCCESS
    }
}
