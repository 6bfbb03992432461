//! The generic attribute container: what `{...}` map literals evaluate to,
//! and the base every other constructor starts from.

use crate::{
    errors::{HookFail, HookResult},
    exec::Executor,
    heap::{Heap, ObjData, ObjId, Raw},
    types::bridge::{arg, set_deep_native},
};

/// Allocates an empty object with the default hook set.
///
/// The defaults make any object indexable by string key and iterable as
/// sorted `[key, value]` pairs; type constructors override or delete what
/// they don't want.
pub(crate) fn new_obj(heap: &mut Heap) -> ObjId {
    let id = heap.alloc(ObjData::bare(Raw::Nil));
    set_deep_native(heap, id, "str", obj_str);
    set_deep_native(heap, id, "index", obj_index);
    set_deep_native(heap, id, "setIndex", obj_set_index);
    set_deep_native(heap, id, "iter", obj_iter);
    set_deep_native(heap, id, "has", obj_has);
    set_deep_native(heap, id, "coalesce", obj_coalesce);
    id
}

/// Attribute pairs sorted by key, for deterministic iteration and display.
fn sorted_attrs(heap: &Heap, id: ObjId) -> Vec<(String, ObjId)> {
    let mut pairs: Vec<(String, ObjId)> = heap.get(id).attr.iter().map(|(k, v)| (k.clone(), *v)).collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

fn obj_str(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let this = args[0];
    let pairs = sorted_attrs(exec.heap(), this);

    let mut out = String::from("{");
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push_str(": ");
        out.push_str(&exec.true_str(*value));
    }
    out.push('}');

    Ok(exec.new_string(out))
}

fn obj_index(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let this = args[0];
    let key_id = arg(args, 1)?;
    let key = exec.true_str(key_id);
    exec.heap().get_attr(this, &key).ok_or(HookFail::Unsupported)
}

fn obj_set_index(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let this = args[0];
    let key_id = arg(args, 1)?;
    let value = arg(args, 2)?;
    let key = exec.true_str(key_id);
    exec.heap_mut().set_attr(this, key, value);
    Ok(exec.nil())
}

fn obj_iter(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let pairs = sorted_attrs(exec.heap(), args[0]);

    let mut items = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        let key_obj = exec.new_string(key);
        let pair = exec.new_list(vec![key_obj, value]);
        items.push(pair);
    }

    Ok(exec.new_list(items))
}

fn obj_has(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let this = args[0];
    let key_id = arg(args, 1)?;
    let key = exec.true_str(key_id);
    let found = exec.heap().get_attr(this, &key).is_some();
    Ok(exec.bool_obj(found))
}

/// `a ?? b`: the right side arrives as a thunk and is only forced when the
/// left side is nullish.
fn obj_coalesce(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let left = arg(args, 1)?;
    let right = arg(args, 2)?;
    if exec.heap().is_nullish(left) {
        match exec.call_value(right, None) {
            Ok(value) => return Ok(value),
            Err(HookFail::Error(err)) => return Err(HookFail::Error(err)),
            Err(_) => {}
        }
    }
    Ok(left)
}
