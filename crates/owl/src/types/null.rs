//! The null singleton: the one value whose `null` deep attribute is truthy.

use crate::{
    errors::HookResult,
    exec::Executor,
    heap::{Heap, ObjId},
    types::{
        bridge::{arg, set_deep_native},
        object::new_obj,
    },
};

/// Allocates the null singleton. `truth` is the cached `true` boolean,
/// installed as the `null` deep attribute that makes the value nullish.
pub(crate) fn alloc_null(heap: &mut Heap, truth: ObjId) -> ObjId {
    let id = new_obj(heap);
    set_deep_native(heap, id, "eq", null_eq);
    set_deep_native(heap, id, "ne", null_ne);
    set_deep_native(heap, id, "str", null_str);
    heap.set_deep_attr(id, "null", truth);
    heap.delete_deep_attr(id, "iter");
    heap.delete_deep_attr(id, "index");
    heap.delete_deep_attr(id, "setIndex");
    heap.delete_deep_attr(id, "has");
    id
}

/// Null compares by identity; since it is a singleton, only null equals null.
fn null_eq(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let equal = arg(args, 1)? == arg(args, 2)?;
    Ok(exec.bool_obj(equal))
}

fn null_ne(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let equal = arg(args, 1)? == arg(args, 2)?;
    Ok(exec.bool_obj(!equal))
}

fn null_str(exec: &mut Executor<'_>, _args: &[ObjId]) -> HookResult {
    Ok(exec.new_string("null"))
}
