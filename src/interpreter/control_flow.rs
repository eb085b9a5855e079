// File: src/interpreter/control_flow.rs
//
// Control flow signals for loops and early returns.
//
// Evaluation returns `Result<Value, Unwind>`. The error side carries either
// a real error or one of the non-local exits below, so `?` unwinds both
// until a node that handles them: loops absorb `Break`/`Continue`, function
// calls absorb `Return`. Whatever reaches a boundary that cannot handle it
// is turned into a `StructuralControl` error.

use super::value::Value;
use crate::errors::PithonError;

/// Non-local exits raised by `break`, `continue` and `return`
#[derive(Debug, Clone)]
pub(crate) enum ControlFlow {
    /// Exit the innermost loop
    Break,
    /// Skip to the next iteration of the innermost loop
    Continue,
    /// Leave the innermost function call with a value
    Return(Value),
}

impl ControlFlow {
    fn keyword(&self) -> &'static str {
        match self {
            ControlFlow::Break => "break",
            ControlFlow::Continue => "continue",
            ControlFlow::Return(_) => "return",
        }
    }

    /// Error for a signal that escaped every handler able to absorb it
    pub(crate) fn escaped(&self) -> PithonError {
        let scope = match self {
            ControlFlow::Return(_) => "function",
            ControlFlow::Break | ControlFlow::Continue => "loop",
        };
        PithonError::structural(format!("'{}' outside {}", self.keyword(), scope))
    }
}

/// Anything that interrupts normal statement sequencing
#[derive(Debug)]
pub(crate) enum Unwind {
    Signal(ControlFlow),
    Error(PithonError),
}

impl Unwind {
    /// Collapses an unwind at a boundary where no signal is legal
    pub(crate) fn into_error(self) -> PithonError {
        match self {
            Unwind::Signal(signal) => signal.escaped(),
            Unwind::Error(err) => err,
        }
    }
}

impl From<PithonError> for Unwind {
    fn from(err: PithonError) -> Self {
        Unwind::Error(err)
    }
}

/// Outcome of evaluating one node
pub(crate) type Eval<T = Value> = Result<T, Unwind>;
