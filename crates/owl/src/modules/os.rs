//! The `os` built-in library: process execution and platform identity.

use std::process::Command;

use crate::{
    errors::{HookFail, HookResult},
    exec::Executor,
    heap::ObjId,
    types::{bridge::set_attr_native, object::new_obj},
};

pub(crate) fn export(exec: &mut Executor<'_>) -> ObjId {
    let lib = new_obj(exec.heap_mut());
    set_attr_native(exec.heap_mut(), lib, "Exec", os_exec);
    set_attr_native(exec.heap_mut(), lib, "Platform", os_platform);
    lib
}

/// Runs a command with arguments and returns its combined output.
fn os_exec(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    if args.len() < 2 {
        return Err(HookFail::Message("Not enough arguments, need at least 1".to_owned()));
    }

    let command = exec.true_str(args[1]);
    if command.contains(' ') {
        return Err(HookFail::Message(
            "Command contains spaces, separate into multiple arguments".to_owned(),
        ));
    }

    let command_args: Vec<String> = args[2..].iter().map(|a| exec.true_str(*a)).collect();

    let output = Command::new(&command)
        .args(&command_args)
        .output()
        .map_err(|err| HookFail::Message(format!("Command failed to run: {err}")))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(HookFail::Message(format!(
            "Command failed to run: {}\r\nOutput: {combined}",
            output.status
        )));
    }

    Ok(exec.new_string(combined))
}

fn os_platform(exec: &mut Executor<'_>, _args: &[ObjId]) -> HookResult {
    Ok(exec.new_string(std::env::consts::OS))
}
