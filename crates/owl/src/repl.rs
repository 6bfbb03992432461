//! Persistent REPL session support.
//!
//! `ReplSession` keeps interpreter state across `eval` calls so interactive
//! lines share variables, functions, and heap objects. A line whose block
//! produces a `return` echoes the returned value's string form.

use std::path::PathBuf;

use crate::{
    errors::{ParseError, RunError},
    exec::{Executor, RunState, Vm},
    io::PrintWriter,
    lexer::Lexer,
    parse::Parser,
};

/// What a single evaluated line produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplOutcome {
    /// The line produced a `return`; the rendered value.
    Return(String),
    /// The line ran to completion without returning a value.
    Ran,
    /// The line did not parse. The session state is untouched.
    Parse(Vec<ParseError>),
    /// Evaluation failed. The session survives; leftover frames from the
    /// aborted evaluation are discarded.
    Fault(RunError),
}

/// An interactive session holding interpreter state between lines.
#[derive(Debug)]
pub struct ReplSession {
    vm: Vm,
}

impl ReplSession {
    /// A session anchored at the current working directory (for relative
    /// imports).
    #[must_use]
    pub fn new() -> Self {
        let path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_path(path)
    }

    /// A session anchored at an explicit path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            vm: Vm::new(path.into()),
        }
    }

    /// Evaluates one line against the persistent state.
    pub fn eval(&mut self, line: &str, print: &mut dyn PrintWriter) -> ReplOutcome {
        let tokens = Lexer::new(line).tokenize("cmd.hoot");
        let mut parser = Parser::new(tokens);
        let program = parser.parse();
        if !parser.errors.is_empty() {
            return ReplOutcome::Parse(parser.errors);
        }

        let mut exec = Executor {
            vm: &mut self.vm,
            print,
        };
        match exec.exec_block(&program.body) {
            Ok(RunState::Return(value)) => {
                let rendered = exec.true_str(value);
                ReplOutcome::Return(rendered)
            }
            Ok(_) => ReplOutcome::Ran,
            Err(err) => {
                self.vm.reset_after_error();
                ReplOutcome::Fault(err)
            }
        }
    }
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}
