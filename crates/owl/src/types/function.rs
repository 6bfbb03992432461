//! User-defined function values and overload-cascade calling.

use std::rc::Rc;

use crate::{
    ast::FunctionDef,
    errors::{HookFail, HookResult},
    exec::{Executor, RunState},
    heap::{Frame, FuncData, Heap, ObjId, Raw},
    types::{bridge::set_deep_native, object::new_obj},
};

/// Builds a function value closing over a shallow snapshot of `frame`.
pub(crate) fn new_func(heap: &mut Heap, def: &Rc<FunctionDef>, frame: &Frame) -> ObjId {
    let data = make_data(def, frame);
    alloc_func(heap, data)
}

/// Converts a definition (and any pre-linked cascade) into runtime data.
/// Each case snapshots the defining frame independently.
pub(crate) fn make_data(def: &Rc<FunctionDef>, frame: &Frame) -> FuncData {
    let els = def.els.as_ref().map(|next| Rc::new(make_data(next, frame)));
    FuncData {
        def: Rc::clone(def),
        env: Rc::new(frame.clone()),
        this: None,
        els,
    }
}

pub(crate) fn alloc_func(heap: &mut Heap, data: FuncData) -> ObjId {
    let id = new_obj(heap);
    set_deep_native(heap, id, "str", func_str);
    heap.get_mut(id).raw = Raw::Func(data);
    id
}

/// Calls a function value: walk the overload cascade, run the first case
/// whose guard passes, fail with the overload error when none does.
///
/// Each attempt pushes the captured environment plus a fresh local frame,
/// destructures the single argument into the case's target, and binds
/// `this`. A destructuring or guard error aborts the whole call.
pub(crate) fn call_func(exec: &mut Executor<'_>, head: FuncData, arg: Option<ObjId>) -> HookResult {
    exec.enter_call(&head.def.token)?;
    let result = call_cascade(exec, head, arg);
    exec.leave_call();
    result
}

fn call_cascade(exec: &mut Executor<'_>, head: FuncData, arg: Option<ObjId>) -> HookResult {
    let mut current = Some(head);

    while let Some(data) = current {
        exec.push_frame((*data.env).clone());
        exec.push_frame(Frame::new());

        let attempt = run_case(exec, &data, arg);
        exec.pop_frame();
        exec.pop_frame();

        match attempt? {
            Some(value) => return Ok(value),
            None => current = data.els.as_deref().cloned(),
        }
    }

    Err(HookFail::Message("Unable to find a matching overload".to_owned()))
}

/// Runs one case inside already-pushed frames. `Ok(None)` means the guard
/// rejected the arguments and the cascade should move on.
fn run_case(exec: &mut Executor<'_>, data: &FuncData, arg: Option<ObjId>) -> Result<Option<ObjId>, HookFail> {
    exec.assign(&data.def.arg, arg)?;
    let this = data.this.unwrap_or_else(|| exec.nil());
    exec.set_local("this", this);

    let matched = match &data.def.condition {
        None => true,
        Some(condition) => {
            let value = exec.eval_expr(condition)?;
            exec.heap().is_truthy(value)
        }
    };
    if !matched {
        return Ok(None);
    }

    let state = exec.exec_block(&data.def.body)?;
    Ok(Some(match state {
        RunState::Return(value) => value,
        _ => exec.nil(),
    }))
}

fn func_str(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let Raw::Func(data) = &exec.heap().get(args[0]).raw else {
        return Err(HookFail::Unsupported);
    };

    let mut out = String::from("{");
    for stmt in &data.def.body {
        out.push_str(&stmt.to_string());
    }
    out.push('}');

    Ok(exec.new_string(out))
}
