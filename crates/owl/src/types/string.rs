//! String values: concatenation, lexicographic ordering, character indexing
//! and slicing with negative offsets, substring `has`, and the `Re*` method
//! family backed by the `regex` crate.

use regex::Regex;

use crate::{
    errors::{HookFail, HookResult},
    exec::Executor,
    heap::{Heap, ObjId, Raw},
    types::{
        bridge::{arg, set_attr_native, set_deep_native},
        object::new_obj,
    },
};

pub(crate) fn new_string(heap: &mut Heap, value: impl Into<String>) -> ObjId {
    let id = new_obj(heap);

    set_deep_native(heap, id, "add", string_add);
    set_deep_native(heap, id, "eq", string_eq);
    set_deep_native(heap, id, "ne", string_ne);
    set_deep_native(heap, id, "gt", string_gt);
    set_deep_native(heap, id, "lt", string_lt);
    set_deep_native(heap, id, "ge", string_ge);
    set_deep_native(heap, id, "le", string_le);
    set_deep_native(heap, id, "str", string_str);
    set_deep_native(heap, id, "index", string_index);
    set_deep_native(heap, id, "has", string_has);
    set_deep_native(heap, id, "slice", string_slice);
    set_deep_native(heap, id, "iter", string_iter);

    set_attr_native(heap, id, "Split", string_split);
    set_attr_native(heap, id, "Len", string_len);
    set_attr_native(heap, id, "Replace", string_replace);
    set_attr_native(heap, id, "ReReplace", string_re_replace);
    set_attr_native(heap, id, "ReIndex", string_re_index);
    set_attr_native(heap, id, "Index", string_index_of);
    set_attr_native(heap, id, "Trim", string_trim);

    heap.get_mut(id).raw = Raw::Str(value.into());
    id
}

fn this_str(heap: &Heap, id: ObjId) -> Result<String, HookFail> {
    heap.as_str(id).map(str::to_owned).ok_or(HookFail::Unsupported)
}

/// Wraps a relative index: negative offsets count back from the end.
pub(crate) fn map_index(i: i64, len: usize) -> i64 {
    if i < 0 { i + len as i64 } else { i }
}

/// Resolves optional slice bounds (absent bounds arrive as the null
/// singleton) against a sequence length, clamping both ends.
pub(crate) fn slice_bounds(heap: &Heap, start: ObjId, end: ObjId, len: usize) -> (usize, usize) {
    let mut from = 0i64;
    let mut to = len as i64;

    if let Some(i) = heap.as_int(start) {
        from = map_index(i, len);
    }
    if let Some(i) = heap.as_int(end) {
        to = map_index(i, len);
    }

    let from = from.clamp(0, len as i64) as usize;
    let to = to.clamp(0, len as i64) as usize;
    (from, to.max(from))
}

fn string_add(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let (left, right) = (arg(args, 1)?, arg(args, 2)?);
    let joined = format!("{}{}", exec.true_str(left), exec.true_str(right));
    Ok(exec.new_string(joined))
}

fn string_compare(exec: &mut Executor<'_>, args: &[ObjId], op: fn(&str, &str) -> bool) -> HookResult {
    let (left, right) = (arg(args, 1)?, arg(args, 2)?);
    let a = exec.true_str(left);
    let b = exec.true_str(right);
    Ok(exec.bool_obj(op(&a, &b)))
}

fn string_eq(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    string_compare(exec, args, |a, b| a == b)
}

fn string_ne(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    string_compare(exec, args, |a, b| a != b)
}

fn string_lt(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    string_compare(exec, args, |a, b| a < b)
}

fn string_gt(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    string_compare(exec, args, |a, b| a > b)
}

fn string_le(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    string_compare(exec, args, |a, b| a <= b)
}

fn string_ge(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    string_compare(exec, args, |a, b| a >= b)
}

fn string_str(_exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    Ok(args[0])
}

fn string_index(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    let i = exec.heap().as_int(arg(args, 1)?).ok_or(HookFail::Unsupported)?;
    let c = usize::try_from(i)
        .ok()
        .and_then(|i| s.chars().nth(i))
        .ok_or(HookFail::Unsupported)?;
    Ok(exec.new_string(c.to_string()))
}

fn string_has(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    let needle_id = arg(args, 1)?;
    let needle = exec.true_str(needle_id);
    Ok(exec.bool_obj(s.contains(&needle)))
}

fn string_slice(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    let chars: Vec<char> = s.chars().collect();
    let (from, to) = slice_bounds(exec.heap(), arg(args, 1)?, arg(args, 2)?, chars.len());
    let sliced: String = chars[from..to].iter().collect();
    Ok(exec.new_string(sliced))
}

fn string_iter(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    let items: Vec<ObjId> = s.chars().map(|c| exec.new_string(c.to_string())).collect();
    Ok(exec.new_list(items))
}

fn string_split(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    let delim_id = arg(args, 1)?;
    let delim = exec.true_str(delim_id);

    let parts: Vec<&str> = if let Some(count) = args.get(2) {
        let n = exec.heap().as_int(*count).ok_or(HookFail::Unsupported)?;
        let n = usize::try_from(n).map_err(|_| HookFail::Unsupported)?;
        s.splitn(n + 1, delim.as_str()).collect()
    } else {
        s.split(delim.as_str()).collect()
    };

    let items: Vec<ObjId> = parts.into_iter().map(|p| exec.new_string(p.to_owned())).collect();
    Ok(exec.new_list(items))
}

fn string_len(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    Ok(exec.new_int(s.chars().count() as i64))
}

fn string_replace(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    let (from_id, to_id) = (arg(args, 1)?, arg(args, 2)?);
    let from = exec.true_str(from_id);
    let to = exec.true_str(to_id);
    let replaced = s.replace(&from, &to);
    Ok(exec.new_string(replaced))
}

/// Regex replacement; `${n}` in the replacement refers to capture groups.
fn string_re_replace(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    let (pattern_id, replacement_id) = (arg(args, 1)?, arg(args, 2)?);
    let pattern = exec.true_str(pattern_id);
    let replacement = exec.true_str(replacement_id);

    let re = Regex::new(&pattern).map_err(|err| HookFail::Message(format!("invalid pattern: {err}")))?;
    let replaced = re.replace_all(&s, replacement.as_str()).into_owned();
    Ok(exec.new_string(replaced))
}

/// First regex match as a `[start, end]` pair of character offsets, or
/// `[-1, -1]` when the pattern does not match.
fn string_re_index(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    let pattern_id = arg(args, 1)?;
    let pattern = exec.true_str(pattern_id);

    let re = Regex::new(&pattern).map_err(|err| HookFail::Message(format!("invalid pattern: {err}")))?;
    let (start, end) = match re.find(&s) {
        Some(m) => (
            s[..m.start()].chars().count() as i64,
            s[..m.end()].chars().count() as i64,
        ),
        None => (-1, -1),
    };

    let start = exec.new_int(start);
    let end = exec.new_int(end);
    Ok(exec.new_list(vec![start, end]))
}

fn string_index_of(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    let needle_id = arg(args, 1)?;
    let needle = exec.true_str(needle_id);
    let index = match s.find(&needle) {
        Some(byte_offset) => s[..byte_offset].chars().count() as i64,
        None => -1,
    };
    Ok(exec.new_int(index))
}

fn string_trim(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let s = this_str(exec.heap(), args[0])?;
    let cut_id = arg(args, 1)?;
    let cut = exec.true_str(cut_id);
    let trimmed = s.trim_matches(|c| cut.contains(c)).to_owned();
    Ok(exec.new_string(trimmed))
}
