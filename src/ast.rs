// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the SimPL language.
//
// Expressions (Expr) produce numeric values; statements (Stmt) perform
// actions and control flow. Every node owns its children outright, so a
// parsed program is a plain tree that is dropped together with its
// top-level statement list. Nodes are never mutated after parsing.
//
// The `Display` impls render nodes as S-expressions, which is what the
// `simpl ast` subcommand prints and what the parser tests compare against.

use crate::lexer::Token;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Number, string, char, `true`, `false` or `nil`. The raw token is kept;
    /// conversion to a number happens at evaluation time.
    Literal(Token),
    Variable(Token),
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Unary {
        op: Token,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: Token,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Source line of the token that anchors this expression
    pub fn line(&self) -> usize {
        match self {
            Expr::Literal(token) | Expr::Variable(token) => token.line,
            Expr::Assign { name, .. } => name.line,
            Expr::Unary { op, .. } | Expr::Binary { op, .. } => op.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    Print(Expr),
    Let {
        name: Token,
        initializer: Option<Expr>,
    },
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
    /// `func name() { ... }`. The parameter list is always empty.
    FunctionDecl {
        name: Token,
        body: Vec<Stmt>,
    },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(token) | Expr::Variable(token) => write!(f, "{}", token.text),
            Expr::Assign { name, value } => write!(f, "(= {} {})", name.text, value),
            Expr::Unary { op, operand } => write!(f, "({} {})", op.text, operand),
            Expr::Binary { left, op, right } => write!(f, "({} {} {})", op.text, left, right),
        }
    }
}

fn write_sequence(f: &mut fmt::Formatter, stmts: &[Stmt]) -> fmt::Result {
    for stmt in stmts {
        write!(f, " {}", stmt)?;
    }
    Ok(())
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Expression(expr) => write!(f, "(expr {})", expr),
            Stmt::Print(expr) => write!(f, "(print {})", expr),
            Stmt::Let { name, initializer } => match initializer {
                Some(init) => write!(f, "(let {} {})", name.text, init),
                None => write!(f, "(let {})", name.text),
            },
            Stmt::Block(stmts) => {
                write!(f, "(block")?;
                write_sequence(f, stmts)?;
                write!(f, ")")
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "(if {} {}", condition, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " {}", else_branch)?;
                }
                write!(f, ")")
            }
            Stmt::While { condition, body } => write!(f, "(while {} {})", condition, body),
            Stmt::Return { value, .. } => match value {
                Some(value) => write!(f, "(return {})", value),
                None => write!(f, "(return)"),
            },
            Stmt::FunctionDecl { name, body } => {
                write!(f, "(func {}", name.text)?;
                write_sequence(f, body)?;
                write!(f, ")")
            }
        }
    }
}
