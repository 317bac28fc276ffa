// File: src/interpreter/control_flow.rs
//
// Control flow signals for early exits.
//
// Executing a statement yields a ControlFlow value next to the usual Result.
// A `return` produces ControlFlow::Return, which every enclosing statement
// sequence (block, loop body, program) passes outward untouched. The signal
// ends the program when it reaches the top level.

/// Outcome of executing one statement
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ControlFlow {
    /// Normal execution, continue to next statement
    Normal,
    /// A return statement ran; unwind to the top with its optional value
    Return(Option<f64>),
}
