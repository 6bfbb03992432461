//! List values: negative-wrap indexing, in-place mutation, clamped slices,
//! equality-based `has`, and the higher-order method family.

use crate::{
    errors::{HookFail, HookResult},
    exec::Executor,
    heap::{Heap, ObjId, Raw},
    types::{
        bridge::{arg, set_attr_native, set_deep_native},
        object::new_obj,
        string::{map_index, slice_bounds},
    },
};

pub(crate) fn new_list(heap: &mut Heap, values: Vec<ObjId>) -> ObjId {
    let id = new_obj(heap);

    set_deep_native(heap, id, "bool", list_bool);
    set_deep_native(heap, id, "index", list_index);
    set_deep_native(heap, id, "setIndex", list_set_index);
    set_deep_native(heap, id, "slice", list_slice);
    set_deep_native(heap, id, "str", list_str);
    set_deep_native(heap, id, "has", list_has);
    set_deep_native(heap, id, "iter", list_iter);

    set_attr_native(heap, id, "Reverse", list_reverse);
    set_attr_native(heap, id, "Add", list_append);
    set_attr_native(heap, id, "Sort", list_sort);
    set_attr_native(heap, id, "Join", list_join);
    set_attr_native(heap, id, "Len", list_len);
    set_attr_native(heap, id, "Map", list_map);
    set_attr_native(heap, id, "Filter", list_filter);
    set_attr_native(heap, id, "Reduce", list_reduce);
    set_attr_native(heap, id, "FlatMap", list_flat_map);

    heap.get_mut(id).raw = Raw::List(values);
    id
}

fn this_list(heap: &Heap, id: ObjId) -> Result<Vec<ObjId>, HookFail> {
    heap.as_list(id).ok_or(HookFail::Unsupported)
}

fn list_bool(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    Ok(exec.bool_obj(!items.is_empty()))
}

fn list_index(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    let i = exec.heap().as_int(arg(args, 1)?).ok_or(HookFail::Unsupported)?;
    let i = usize::try_from(map_index(i, items.len())).map_err(|_| HookFail::Unsupported)?;
    items.get(i).copied().ok_or(HookFail::Unsupported)
}

fn list_set_index(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let len = this_list(exec.heap(), args[0])?.len();
    let i = exec.heap().as_int(arg(args, 1)?).ok_or(HookFail::Unsupported)?;
    let value = arg(args, 2)?;
    let i = usize::try_from(map_index(i, len)).map_err(|_| HookFail::Unsupported)?;
    if i >= len {
        return Err(HookFail::Unsupported);
    }

    if let Raw::List(items) = &mut exec.heap_mut().get_mut(args[0]).raw {
        items[i] = value;
    }
    Ok(exec.nil())
}

fn list_slice(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    let (from, to) = slice_bounds(exec.heap(), arg(args, 1)?, arg(args, 2)?, items.len());
    Ok(exec.new_list(items[from..to].to_vec()))
}

fn list_str(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;

    let mut out = String::from("[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&exec.true_str(*item));
    }
    out.push(']');

    Ok(exec.new_string(out))
}

/// Membership through each element's own `eq` hook.
fn list_has(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    let needle = arg(args, 1)?;

    for item in items {
        let pair = exec.new_list(vec![item, needle]);
        if let Ok(result) = exec.deep_call(item, "eq", Some(pair))
            && exec.heap().is_truthy(result)
        {
            return Ok(exec.bool_obj(true));
        }
    }
    Ok(exec.bool_obj(false))
}

fn list_iter(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    Ok(exec.new_list(items))
}

fn list_reverse(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    this_list(exec.heap(), args[0])?;
    if let Raw::List(items) = &mut exec.heap_mut().get_mut(args[0]).raw {
        items.reverse();
    }
    let items = this_list(exec.heap(), args[0])?;
    Ok(exec.new_list(items))
}

fn list_append(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    if args.len() != 2 {
        return Err(HookFail::Message(format!("Add expects 1 argument, got {}", args.len() - 1)));
    }
    this_list(exec.heap(), args[0])?;
    let value = arg(args, 1)?;
    if let Raw::List(items) = &mut exec.heap_mut().get_mut(args[0]).raw {
        items.push(value);
    }
    Ok(args[0])
}

/// Insertion sort through the elements' `lt` hooks; a failed comparison
/// counts as "not less".
fn list_sort(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let mut items = this_list(exec.heap(), args[0])?;

    for i in 1..items.len() {
        let mut j = i;
        while j > 0 {
            let pair = exec.new_list(vec![items[j], items[j - 1]]);
            let less = match exec.deep_call(items[j], "lt", Some(pair)) {
                Ok(result) => exec.heap().is_truthy(result),
                Err(HookFail::Error(err)) => return Err(HookFail::Error(err)),
                Err(_) => false,
            };
            if !less {
                break;
            }
            items.swap(j, j - 1);
            j -= 1;
        }
    }

    if let Raw::List(stored) = &mut exec.heap_mut().get_mut(args[0]).raw {
        stored.clone_from(&items);
    }
    Ok(exec.new_list(items))
}

fn list_join(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    let delim_id = arg(args, 1)?;
    let delim = exec.true_str(delim_id);

    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(&delim);
        }
        out.push_str(&exec.true_str(*item));
    }
    Ok(exec.new_string(out))
}

fn list_len(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    Ok(exec.new_int(items.len() as i64))
}

fn list_map(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    let func = arg(args, 1)?;

    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(exec.call_value(func, Some(item))?);
    }
    Ok(exec.new_list(mapped))
}

fn list_filter(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    let func = arg(args, 1)?;

    let mut kept = Vec::new();
    for item in items {
        let keep = exec.call_value(func, Some(item))?;
        if exec.heap().is_truthy(keep) {
            kept.push(item);
        }
    }
    Ok(exec.new_list(kept))
}

fn list_reduce(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    let func = arg(args, 1)?;
    let mut acc = arg(args, 2)?;

    for item in items {
        let pair = exec.new_list(vec![acc, item]);
        acc = exec.call_value(func, Some(pair))?;
    }
    Ok(acc)
}

fn list_flat_map(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let items = this_list(exec.heap(), args[0])?;
    let func = arg(args, 1)?;

    let mut flattened = Vec::new();
    for item in items {
        let mapped = exec.call_value(func, Some(item))?;
        let inner = exec.as_list_value(mapped).ok_or(HookFail::Unsupported)?;
        flattened.extend(inner);
    }
    Ok(exec.new_list(flattened))
}
