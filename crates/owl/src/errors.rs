//! Error types for the two failure tiers: collected parse errors and fatal,
//! source-located evaluation errors.

use std::fmt;

use crate::lexer::Token;

/// Result type alias for operations that can produce a runtime error.
pub type RunResult<T> = Result<T, RunError>;

/// A single recoverable parser diagnostic.
///
/// The parser collects these instead of failing on the first problem; the
/// embedder decides whether a program with recorded errors still runs (it
/// never does through [`crate::Engine`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub token: Token,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, token: Token) -> Self {
        Self {
            message: message.into(),
            token,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.token.line, self.token.column, self.message)
    }
}

impl std::error::Error for ParseError {}

/// A fatal evaluation error carrying `file:line:column` coordinates.
///
/// Every `eval_*`/`exec_*` path propagates these explicitly; there is no
/// in-language exception mechanism, so the first error aborts the current
/// evaluation and surfaces at the embedding boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl RunError {
    pub(crate) fn new(message: impl Into<String>, token: &Token) -> Self {
        Self {
            file: token.file.clone(),
            line: token.line,
            column: token.column,
            message: message.into(),
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.file, self.line, self.column, self.message)
    }
}

impl std::error::Error for RunError {}

/// Failure of a deep-hook or native call, before the executor has attached a
/// source location.
///
/// `Unsupported` and `Message` let the executor try the documented mirror
/// fallback on the right operand; an already-located `Error` always
/// propagates untouched.
#[derive(Debug)]
pub(crate) enum HookFail {
    /// The receiver has no hook for the operation, or the operand types do
    /// not fit. The caller may try a fallback before reporting.
    Unsupported,
    /// The operation was understood but failed with a human-readable reason.
    Message(String),
    /// A located error raised while running user code inside the hook.
    Error(RunError),
}

/// Result of invoking a deep hook, a bridge, or a user function.
pub(crate) type HookResult = Result<crate::heap::ObjId, HookFail>;

impl From<RunError> for HookFail {
    fn from(err: RunError) -> Self {
        Self::Error(err)
    }
}
