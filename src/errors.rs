// File: src/errors.rs
//
// Error types for the SimPL front end and interpreter.
//
// There are exactly two failure families:
// - SyntaxError: raised by the parser, recovered from, and accumulated so a
//   single parse can report several problems.
// - EvaluationError: raised by the interpreter and fatal to the rest of the run.
//
// `Display` output is plain text in the fixed diagnostic formats
// `[line L] Error: <message>` and `Runtime Error: <message>`. Coloring is
// applied by `diagnostics::Reporter`, never here.

use crate::lexer::Token;
use std::fmt;

/// A grammar violation, anchored at the offending token
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub token: Token,
    pub message: String,
}

impl SyntaxError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        Self {
            token,
            message: message.into(),
        }
    }

    pub fn line(&self) -> usize {
        self.token.line
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.token.line, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Kinds of runtime failure
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationErrorKind {
    /// Read of, or assignment to, a name that was never declared
    UndefinedVariable(String),
    /// A string, char or malformed literal used where a number is required
    InvalidLiteral(String),
    /// Zero divisor under strict math
    DivisionByZero,
    /// Operator token the evaluator has no meaning for
    UnsupportedOperator(String),
}

impl fmt::Display for EvaluationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UndefinedVariable(name) => write!(f, "Undefined variable '{}'.", name),
            Self::InvalidLiteral(text) => write!(f, "Cannot use '{}' as a number.", text),
            Self::DivisionByZero => write!(f, "Division by zero."),
            Self::UnsupportedOperator(op) => write!(f, "Unsupported operator '{}'.", op),
        }
    }
}

/// A runtime error with the line it was raised on
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationError {
    pub kind: EvaluationErrorKind,
    pub line: usize,
    pub suggestion: Option<String>,
}

impl EvaluationError {
    pub fn new(kind: EvaluationErrorKind, line: usize) -> Self {
        Self {
            kind,
            line,
            suggestion: None,
        }
    }

    pub fn undefined_variable(name: impl Into<String>, line: usize) -> Self {
        Self::new(EvaluationErrorKind::UndefinedVariable(name.into()), line)
    }

    pub fn invalid_literal(text: impl Into<String>, line: usize) -> Self {
        Self::new(EvaluationErrorKind::InvalidLiteral(text.into()), line)
    }

    pub fn division_by_zero(line: usize) -> Self {
        Self::new(EvaluationErrorKind::DivisionByZero, line)
    }

    pub fn unsupported_operator(op: impl Into<String>, line: usize) -> Self {
        Self::new(EvaluationErrorKind::UnsupportedOperator(op.into()), line)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Name carried by an `UndefinedVariable` error
    pub fn variable_name(&self) -> Option<&str> {
        match &self.kind {
            EvaluationErrorKind::UndefinedVariable(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Runtime Error: {}", self.kind)
    }
}

impl std::error::Error for EvaluationError {}

/// Outcome of driving a whole program through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// Parsing reported one or more syntax errors; nothing was executed
    Syntax(Vec<SyntaxError>),
    /// Execution stopped at a runtime error
    Evaluation(EvaluationError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunError::Syntax(errors) => {
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
            RunError::Evaluation(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for RunError {}

impl From<EvaluationError> for RunError {
    fn from(error: EvaluationError) -> Self {
        RunError::Evaluation(error)
    }
}

/// Computes the Levenshtein distance between two strings
/// Used for "Did you mean?" suggestions
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    // Two rolling rows of the edit-distance matrix
    let mut previous: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut current = vec![0; s2_chars.len() + 1];

    for (i, a) in s1_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b) in s2_chars.iter().enumerate() {
            let cost = if a == b { 0 } else { 1 };
            let substitution = previous[j] + cost;
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_chars.len()]
}

/// Find the closest match from a list of candidates using Levenshtein distance
/// Returns None if no candidate is within distance 3
pub fn find_closest_match<'a>(target: &str, candidates: &'a [String]) -> Option<&'a str> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for candidate in candidates {
        let distance = levenshtein_distance(target, candidate);
        if distance <= 3 && distance < best_distance {
            best_distance = distance;
            best_match = Some(candidate.as_str());
        }
    }

    best_match
}
