//! The `fs` built-in library: minimal filesystem access.

use crate::{
    errors::{HookFail, HookResult},
    exec::Executor,
    heap::ObjId,
    types::{bridge::set_attr_native, object::new_obj},
};

pub(crate) fn export(exec: &mut Executor<'_>) -> ObjId {
    let lib = new_obj(exec.heap_mut());
    set_attr_native(exec.heap_mut(), lib, "Read", fs_read);
    set_attr_native(exec.heap_mut(), lib, "ListDir", fs_list_dir);
    lib
}

fn fs_read(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let path = exec.true_str(*args.get(1).ok_or(HookFail::Unsupported)?);
    let contents = std::fs::read_to_string(&path).map_err(|err| HookFail::Message(format!("{path}: {err}")))?;
    Ok(exec.new_string(contents))
}

/// Directory listing; directories get a trailing `/`. Entries are sorted so
/// output is stable across platforms.
fn fs_list_dir(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let path = exec.true_str(*args.get(1).ok_or(HookFail::Unsupported)?);
    let entries = std::fs::read_dir(&path).map_err(|err| HookFail::Message(format!("{path}: {err}")))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| HookFail::Message(err.to_string()))?;
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let items: Vec<ObjId> = names.into_iter().map(|n| exec.new_string(n)).collect();
    Ok(exec.new_list(items))
}
