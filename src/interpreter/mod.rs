// File: src/interpreter/mod.rs
//
// Tree-walking interpreter for the SimPL language.
// Executes programs by traversing the Abstract Syntax Tree (AST).
//
// Every value is an f64. Comparisons produce 1 or 0, and conditions treat any
// nonzero value as true. The interpreter owns one environment for its whole
// lifetime. The first runtime error aborts the run and is handed back to the
// caller.

mod control_flow;
mod environment;

pub use environment::Environment;

use control_flow::ControlFlow;

use crate::ast::{Expr, Stmt};
use crate::errors::{find_closest_match, EvaluationError};
use crate::lexer::{Token, TokenKind};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Print sink shared between an interpreter and whoever reads its output
pub type SharedOutput = Rc<RefCell<Vec<u8>>>;

/// How blocks treat bindings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scoping {
    /// One binding table for the whole program; blocks share it
    #[default]
    Flat,
    /// Each block gets its own frame, so `let` inside a block can shadow
    Block,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterpreterOptions {
    pub scoping: Scoping,
    /// Raise DivisionByZero instead of producing inf/NaN
    pub strict_math: bool,
}

/// A `func` declaration seen during execution. Functions cannot be called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredFunction {
    pub name: String,
    pub line: usize,
    pub statement_count: usize,
}

/// Main interpreter that executes SimPL programs
pub struct Interpreter {
    env: Environment,
    options: InterpreterOptions,
    functions: Vec<DeclaredFunction>,
    output: Option<SharedOutput>,
}

impl Interpreter {
    /// Creates a new interpreter with an empty environment and default options
    pub fn new() -> Self {
        Self::with_options(InterpreterOptions::default())
    }

    pub fn with_options(options: InterpreterOptions) -> Self {
        Interpreter {
            env: Environment::new(),
            options,
            functions: Vec::new(),
            output: None,
        }
    }

    pub fn options(&self) -> InterpreterOptions {
        self.options
    }

    /// Sets the output sink for print statements (used for testing)
    pub fn set_output(&mut self, output: SharedOutput) {
        self.output = Some(output);
    }

    /// Current value of a variable
    pub fn get(&self, name: &str) -> Option<f64> {
        self.env.get(name)
    }

    /// All visible variables, sorted by name
    pub fn variables(&self) -> Vec<(String, f64)> {
        self.env.bindings()
    }

    pub fn functions(&self) -> &[DeclaredFunction] {
        &self.functions
    }

    /// Forget every variable and declared function
    pub fn reset(&mut self) {
        self.env.clear();
        self.functions.clear();
    }

    /// Executes a program. Statements run in order until one of them fails
    /// or a top-level `return` ends the program.
    pub fn interpret(&mut self, stmts: &[Stmt]) -> Result<(), EvaluationError> {
        self.execute_sequence(stmts)?;
        Ok(())
    }

    fn execute_sequence(&mut self, stmts: &[Stmt]) -> Result<ControlFlow, EvaluationError> {
        for stmt in stmts {
            let flow = self.execute(stmt)?;
            if flow != ControlFlow::Normal {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<ControlFlow, EvaluationError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.write_output(&format_number(value));
            }
            Stmt::Let { name, initializer } => {
                let value = match initializer {
                    Some(init) => self.evaluate(init)?,
                    None => 0.0,
                };
                self.env.define(name.text.clone(), value);
            }
            Stmt::Block(stmts) => return self.execute_block(stmts),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(self.evaluate(condition)?) {
                    return self.execute(then_branch);
                }
                if let Some(else_branch) = else_branch {
                    return self.execute(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                while is_truthy(self.evaluate(condition)?) {
                    let flow = self.execute(body)?;
                    if flow != ControlFlow::Normal {
                        return Ok(flow);
                    }
                }
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => Some(self.evaluate(expr)?),
                    None => None,
                };
                return Ok(ControlFlow::Return(value));
            }
            Stmt::FunctionDecl { name, body } => self.declare_function(name, body),
        }
        Ok(ControlFlow::Normal)
    }

    fn execute_block(&mut self, stmts: &[Stmt]) -> Result<ControlFlow, EvaluationError> {
        match self.options.scoping {
            Scoping::Flat => self.execute_sequence(stmts),
            Scoping::Block => {
                self.env.push_scope();
                let result = self.execute_sequence(stmts);
                self.env.pop_scope();
                result
            }
        }
    }

    /// Redeclaring a function replaces the earlier entry
    fn declare_function(&mut self, name: &Token, body: &[Stmt]) {
        let declared = DeclaredFunction {
            name: name.text.clone(),
            line: name.line,
            statement_count: body.len(),
        };
        match self.functions.iter_mut().find(|f| f.name == declared.name) {
            Some(existing) => *existing = declared,
            None => self.functions.push(declared),
        }
    }

    /// Evaluates an expression to a number. Operands are evaluated left to right.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<f64, EvaluationError> {
        match expr {
            Expr::Literal(token) => literal_value(token),
            Expr::Variable(name) => match self.env.get(&name.text) {
                Some(value) => Ok(value),
                None => Err(self.undefined_variable(name)),
            },
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                if self.env.assign(&name.text, value) {
                    Ok(value)
                } else {
                    Err(self.undefined_variable(name))
                }
            }
            Expr::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                match op.kind {
                    TokenKind::Minus => Ok(-value),
                    _ => Err(EvaluationError::unsupported_operator(&op.text, op.line)),
                }
            }
            Expr::Binary { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.apply_binary(op, left, right)
            }
        }
    }

    fn apply_binary(&self, op: &Token, left: f64, right: f64) -> Result<f64, EvaluationError> {
        let value = match op.kind {
            TokenKind::Plus => left + right,
            TokenKind::Minus => left - right,
            TokenKind::Star => left * right,
            TokenKind::Slash | TokenKind::Percent => {
                if self.options.strict_math && right == 0.0 {
                    return Err(EvaluationError::division_by_zero(op.line));
                }
                if op.kind == TokenKind::Slash {
                    left / right
                } else {
                    left % right
                }
            }
            TokenKind::Greater => bool_to_number(left > right),
            TokenKind::GreaterEqual => bool_to_number(left >= right),
            TokenKind::Less => bool_to_number(left < right),
            TokenKind::LessEqual => bool_to_number(left <= right),
            TokenKind::EqualEqual => bool_to_number(left == right),
            TokenKind::BangEqual => bool_to_number(left != right),
            _ => return Err(EvaluationError::unsupported_operator(&op.text, op.line)),
        };
        Ok(value)
    }

    fn undefined_variable(&self, name: &Token) -> EvaluationError {
        let error = EvaluationError::undefined_variable(&name.text, name.line);
        let known = self.env.names();
        match find_closest_match(&name.text, &known) {
            Some(candidate) => error.with_suggestion(candidate),
            None => error,
        }
    }

    /// Helper to write output to either the output buffer or stdout
    fn write_output(&self, msg: &str) {
        if let Some(out) = &self.output {
            let _ = writeln!(out.borrow_mut(), "{}", msg);
        } else {
            println!("{}", msg);
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn literal_value(token: &Token) -> Result<f64, EvaluationError> {
    let invalid = || EvaluationError::invalid_literal(&token.text, token.line);
    match token.kind {
        TokenKind::Integer | TokenKind::Float => token.text.parse().map_err(|_| invalid()),
        TokenKind::True => Ok(1.0),
        TokenKind::False | TokenKind::Nil => Ok(0.0),
        _ => Err(invalid()),
    }
}

pub fn is_truthy(value: f64) -> bool {
    value != 0.0
}

fn bool_to_number(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Renders a number the way `print` shows it: integral values without a
/// fractional part, everything else in shortest round-trip form
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}
