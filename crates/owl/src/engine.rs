//! The embedding entry point: load once, inject globals, run many times.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    ast::Program,
    errors::{ParseError, RunError},
    exec::{Executor, Vm},
    io::{PrintWriter, StdPrint},
    lexer::Lexer,
    object::{self, Object},
    parse::Parser,
};

/// A loaded Owl program.
///
/// Parsing happens once at load time; a program with parse errors never
/// runs. Each [`Engine::run`] evaluates on a fresh interpreter, so runs are
/// independent and repeatable.
#[derive(Debug, Clone)]
pub struct Engine {
    path: PathBuf,
    program: Program,
    globals: Vec<(String, Object)>,
}

/// Why a program could not be loaded from disk.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The source was read but did not parse.
    Parse(Vec<ParseError>),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Parse(errors) => {
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl Engine {
    /// Parses `source`. The path names the program in error messages and
    /// anchors relative imports.
    pub fn load(source: &str, path: impl Into<PathBuf>) -> Result<Self, Vec<ParseError>> {
        let path = path.into();
        let file_label = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |f| f.to_string_lossy().into_owned());

        let tokens = Lexer::new(source).tokenize(&file_label);
        let mut parser = Parser::new(tokens);
        let program = parser.parse();

        if parser.errors.is_empty() {
            Ok(Self {
                path,
                program,
                globals: Vec::new(),
            })
        } else {
            Err(parser.errors)
        }
    }

    /// Reads and parses a program file.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(LoadError::Io)?;
        Self::load(&source, path).map_err(LoadError::Parse)
    }

    /// Binds a global visible to the program on every run.
    pub fn insert_global(&mut self, name: impl Into<String>, value: Object) {
        self.globals.push((name.into(), value));
    }

    /// Runs the program, printing to stdout.
    pub fn run(&self) -> Result<Object, RunError> {
        self.run_with(&mut StdPrint)
    }

    /// Runs the program with a caller-supplied output sink.
    ///
    /// The result is the value of a top-level `return`, or [`Object::Null`]
    /// when the program ends without one.
    pub fn run_with(&self, print: &mut dyn PrintWriter) -> Result<Object, RunError> {
        let mut vm = Vm::new(self.path.clone());
        let mut exec = Executor { vm: &mut vm, print };

        for (name, value) in &self.globals {
            let id = object::to_heap(&mut exec, value).map_err(|err| RunError {
                file: self.path.display().to_string(),
                line: 0,
                column: 0,
                message: format!("invalid global '{name}': {err}"),
            })?;
            exec.set_local(name.clone(), id);
        }

        let result = exec.exec_program(&self.program)?;
        Ok(object::from_heap(&mut exec, result, 0))
    }
}
