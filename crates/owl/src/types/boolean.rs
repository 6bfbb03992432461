//! Boolean values. `and` / `or` receive their right operand as a thunk and
//! only force it when the left side does not already decide the result.

use crate::{
    errors::{HookFail, HookResult},
    exec::Executor,
    heap::{Heap, ObjId, Raw},
    types::{
        bridge::{arg, set_deep_native},
        object::new_obj,
    },
};

/// Allocates one of the two boolean singletons. The executor caches the
/// result; everything else reaches booleans through that cache.
pub(crate) fn alloc_bool(heap: &mut Heap, value: bool) -> ObjId {
    let id = new_obj(heap);
    set_deep_native(heap, id, "and", bool_and);
    set_deep_native(heap, id, "or", bool_or);
    set_deep_native(heap, id, "not", bool_not);
    set_deep_native(heap, id, "eq", bool_eq);
    set_deep_native(heap, id, "ne", bool_ne);
    set_deep_native(heap, id, "str", bool_str);
    heap.delete_deep_attr(id, "iter");
    heap.delete_deep_attr(id, "index");
    heap.delete_deep_attr(id, "setIndex");
    heap.delete_deep_attr(id, "has");
    heap.get_mut(id).raw = Raw::Bool(value);
    id
}

fn force(exec: &mut Executor<'_>, thunk: ObjId) -> Result<bool, HookFail> {
    let value = exec.call_value(thunk, None)?;
    Ok(exec.heap().is_truthy(value))
}

fn bool_and(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let (left, thunk) = (arg(args, 1)?, arg(args, 2)?);
    if !exec.heap().is_truthy(left) {
        return Ok(exec.bool_obj(false));
    }
    let right = force(exec, thunk)?;
    Ok(exec.bool_obj(right))
}

fn bool_or(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let (left, thunk) = (arg(args, 1)?, arg(args, 2)?);
    if exec.heap().is_truthy(left) {
        return Ok(exec.bool_obj(true));
    }
    let right = force(exec, thunk)?;
    Ok(exec.bool_obj(right))
}

fn bool_not(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let negated = !exec.heap().is_truthy(args[0]);
    Ok(exec.bool_obj(negated))
}

/// Equality on the raw payloads; mismatched payload kinds are unequal.
fn raw_eq(heap: &Heap, a: ObjId, b: ObjId) -> bool {
    match (&heap.get(a).raw, &heap.get(b).raw) {
        (Raw::Bool(x), Raw::Bool(y)) => x == y,
        (Raw::Int(x), Raw::Int(y)) => x == y,
        (Raw::Float(x), Raw::Float(y)) => x == y,
        (Raw::Str(x), Raw::Str(y)) => x == y,
        (Raw::Nil, Raw::Nil) => true,
        _ => false,
    }
}

fn bool_eq(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let equal = raw_eq(exec.heap(), arg(args, 1)?, arg(args, 2)?);
    Ok(exec.bool_obj(equal))
}

fn bool_ne(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let equal = raw_eq(exec.heap(), arg(args, 1)?, arg(args, 2)?);
    Ok(exec.bool_obj(!equal))
}

fn bool_str(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let rendered = if exec.heap().is_truthy(args[0]) { "true" } else { "false" };
    Ok(exec.new_string(rendered))
}
