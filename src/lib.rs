// File: src/lib.rs
//
// Library interface for the SimPL front end and interpreter.
// Exposes the pipeline stages for the CLI, the REPL and integration tests.
//
// Pipeline: source → lexer::tokenize → parser::Parser → interpreter::Interpreter

pub mod ast;
pub mod diagnostics;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod test_runner;

use errors::RunError;
use interpreter::Interpreter;

/// Lexes, parses and runs `source` on an existing interpreter.
///
/// A program with syntax errors is never executed; all of its errors are
/// returned together. Otherwise execution stops at the first runtime error.
pub fn run_source(source: &str, interpreter: &mut Interpreter) -> Result<(), RunError> {
    let tokens = lexer::tokenize(source);
    let stmts = parser::parse_program(tokens).map_err(RunError::Syntax)?;
    interpreter.interpret(&stmts)?;
    Ok(())
}
