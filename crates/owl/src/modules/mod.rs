//! Module loading: `import` resolution, module objects, and the built-in
//! short-name libraries.
//!
//! Resolution modes:
//!   1. names starting with `.` resolve relative to the importing file,
//!   2. names starting with `/` resolve as absolute paths,
//!   3. anything else is a built-in library, falling back to
//!      `<executable_dir>/lib/<name>.hoot`.
//!
//! A module body evaluates with a fresh frame stack (same heap); the module
//! object's attributes are the module's global frame, plus a `name` deep
//! attribute and a `str` hook that renders it.

pub(crate) mod fs;
pub(crate) mod json;
pub(crate) mod os;

use std::path::{Component, Path, PathBuf};

use crate::{
    errors::{HookFail, HookResult, RunError, RunResult},
    exec::Executor,
    heap::ObjId,
    lexer::{Lexer, Token},
    parse::Parser,
    types::{bridge::set_deep_native, object::new_obj},
};

/// The source-file suffix.
pub const FILE_SUFFIX: &str = ".hoot";

/// Resolves and evaluates a module, returning the module object and the
/// alias it binds to.
pub(crate) fn load_module(exec: &mut Executor<'_>, name: &str, token: &Token) -> RunResult<(ObjId, String)> {
    let path = if let Some(rest) = name.strip_prefix('/') {
        normalize(Path::new(&format!("/{rest}{FILE_SUFFIX}")))
    } else if name.starts_with('.') {
        let dir = exec
            .vm
            .current_path
            .parent()
            .map_or_else(PathBuf::new, Path::to_path_buf);
        normalize(&dir.join(format!("{name}{FILE_SUFFIX}")))
    } else {
        if let Some(lib) = builtin(exec, name) {
            return Ok((lib, name.to_owned()));
        }
        let exe = std::env::current_exe()
            .map_err(|err| RunError::new(format!("Failed to load module '{name}': {err}"), token))?;
        let exe_dir = exe.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        exe_dir.join("lib").join(format!("{name}{FILE_SUFFIX}"))
    };

    let alias = path
        .file_stem()
        .map_or_else(|| name.to_owned(), |stem| stem.to_string_lossy().into_owned());

    let source = std::fs::read_to_string(&path)
        .map_err(|err| RunError::new(format!("Failed to load module '{name}': {err}"), token))?;

    let file_label = path
        .file_name()
        .map_or_else(|| name.to_owned(), |f| f.to_string_lossy().into_owned());
    let tokens = Lexer::new(&source).tokenize(&file_label);
    let mut parser = Parser::new(tokens);
    let program = parser.parse();

    if !parser.errors.is_empty() {
        let rendered: Vec<String> = parser.errors.iter().map(ToString::to_string).collect();
        return Err(RunError::new(
            format!("Failed to load module '{name}':\n{}", rendered.join("\n")),
            token,
        ));
    }

    let frame = exec.exec_module(&program, path)?;

    let module = new_obj(exec.heap_mut());
    // The frame becomes the attribute table directly; module members keep
    // whatever receiver they were already bound to.
    exec.heap_mut().get_mut(module).attr = frame;
    let name_obj = exec.new_string(alias.clone());
    exec.heap_mut().set_deep_attr(module, "name", name_obj);
    set_deep_native(exec.heap_mut(), module, "str", module_str);

    Ok((module, alias))
}

fn builtin(exec: &mut Executor<'_>, name: &str) -> Option<ObjId> {
    match name {
        "fs" => Some(fs::export(exec)),
        "os" => Some(os::export(exec)),
        "json" => Some(json::export(exec)),
        _ => None,
    }
}

fn module_str(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let name = exec
        .heap()
        .get_deep_attr(args[0], "name")
        .ok_or(HookFail::Unsupported)?;
    let rendered = exec.true_str(name);
    Ok(exec.new_string(rendered))
}

/// Lexical path normalization: resolves `.` and `..` without touching the
/// filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}
