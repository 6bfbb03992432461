//! Numeric values. Int-only arithmetic stays integral (except `/`, which
//! always divides as floats); any int/float mix promotes to float. Modulo
//! is floor-modulo, so `-10 % 3 == 2`.

use crate::{
    errors::{HookFail, HookResult},
    exec::Executor,
    heap::{Heap, ObjId, Raw},
    types::{bridge, bridge::set_deep_native, object::new_obj},
};

pub(crate) fn new_int(heap: &mut Heap, value: i64) -> ObjId {
    new_number(heap, Raw::Int(value))
}

pub(crate) fn new_float(heap: &mut Heap, value: f64) -> ObjId {
    new_number(heap, Raw::Float(value))
}

fn new_number(heap: &mut Heap, raw: Raw) -> ObjId {
    let id = new_obj(heap);
    heap.get_mut(id).raw = raw;
    set_deep_native(heap, id, "add", number_add);
    set_deep_native(heap, id, "sub", number_sub);
    set_deep_native(heap, id, "mul", number_mul);
    set_deep_native(heap, id, "div", number_div);
    set_deep_native(heap, id, "pow", number_pow);
    set_deep_native(heap, id, "mod", number_mod);
    set_deep_native(heap, id, "neg", number_neg);
    set_deep_native(heap, id, "inc", number_inc);
    set_deep_native(heap, id, "dec", number_dec);
    set_deep_native(heap, id, "eq", number_eq);
    set_deep_native(heap, id, "ne", number_ne);
    set_deep_native(heap, id, "lt", number_lt);
    set_deep_native(heap, id, "le", number_le);
    set_deep_native(heap, id, "gt", number_gt);
    set_deep_native(heap, id, "ge", number_ge);
    set_deep_native(heap, id, "str", number_str);
    heap.delete_deep_attr(id, "iter");
    heap.delete_deep_attr(id, "index");
    heap.delete_deep_attr(id, "setIndex");
    heap.delete_deep_attr(id, "has");
    id
}

/// Reads both operands of a binary hook call, or bails out for non-numbers.
fn operands(heap: &Heap, args: &[ObjId]) -> Result<(Raw, Raw), HookFail> {
    let a = heap.get(bridge::arg(args, 1)?).raw.clone();
    let b = heap.get(bridge::arg(args, 2)?).raw.clone();
    match (&a, &b) {
        (Raw::Int(_) | Raw::Float(_), Raw::Int(_) | Raw::Float(_)) => Ok((a, b)),
        _ => Err(HookFail::Unsupported),
    }
}

fn as_float(raw: &Raw) -> f64 {
    match raw {
        Raw::Int(n) => *n as f64,
        Raw::Float(x) => *x,
        _ => unreachable!("operands are numeric"),
    }
}

fn arith(exec: &mut Executor<'_>, args: &[ObjId], int_op: fn(i64, i64) -> i64, float_op: fn(f64, f64) -> f64) -> HookResult {
    let (a, b) = operands(exec.heap(), args)?;
    match (&a, &b) {
        (Raw::Int(x), Raw::Int(y)) => Ok(exec.new_int(int_op(*x, *y))),
        _ => Ok(exec.new_float(float_op(as_float(&a), as_float(&b)))),
    }
}

fn compare(exec: &mut Executor<'_>, args: &[ObjId], int_op: fn(&i64, &i64) -> bool, float_op: fn(&f64, &f64) -> bool) -> HookResult {
    let (a, b) = operands(exec.heap(), args)?;
    let result = match (&a, &b) {
        (Raw::Int(x), Raw::Int(y)) => int_op(x, y),
        _ => float_op(&as_float(&a), &as_float(&b)),
    };
    Ok(exec.bool_obj(result))
}

fn floor_mod_int(a: i64, b: i64) -> i64 {
    let v = a % b;
    if v < 0 { v + b } else { v }
}

fn floor_mod_float(a: f64, b: f64) -> f64 {
    let v = a % b;
    if v < 0.0 { v + b } else { v }
}

fn number_add(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    arith(exec, args, |a, b| a.wrapping_add(b), |a, b| a + b)
}

fn number_sub(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    arith(exec, args, |a, b| a.wrapping_sub(b), |a, b| a - b)
}

fn number_mul(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    arith(exec, args, |a, b| a.wrapping_mul(b), |a, b| a * b)
}

/// Division always yields a float.
fn number_div(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let (a, b) = operands(exec.heap(), args)?;
    Ok(exec.new_float(as_float(&a) / as_float(&b)))
}

/// Int raised to int goes through float pow and truncates back.
fn number_pow(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let (a, b) = operands(exec.heap(), args)?;
    match (&a, &b) {
        (Raw::Int(x), Raw::Int(y)) => Ok(exec.new_int((*x as f64).powf(*y as f64) as i64)),
        _ => Ok(exec.new_float(as_float(&a).powf(as_float(&b)))),
    }
}

fn number_mod(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    arith(exec, args, floor_mod_int, floor_mod_float)
}

fn unary(exec: &mut Executor<'_>, this: ObjId, int_op: fn(i64) -> i64, float_op: fn(f64) -> f64) -> HookResult {
    match exec.heap().get(this).raw {
        Raw::Int(n) => Ok(exec.new_int(int_op(n))),
        Raw::Float(x) => Ok(exec.new_float(float_op(x))),
        _ => Err(HookFail::Unsupported),
    }
}

fn number_neg(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    unary(exec, args[0], |n| -n, |x| -x)
}

fn number_inc(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    unary(exec, args[0], |n| n + 1, |x| x + 1.0)
}

fn number_dec(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    unary(exec, args[0], |n| n - 1, |x| x - 1.0)
}

fn number_eq(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    compare(exec, args, |a, b| a == b, |a, b| a == b)
}

fn number_ne(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    compare(exec, args, |a, b| a != b, |a, b| a != b)
}

fn number_lt(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    compare(exec, args, |a, b| a < b, |a, b| a < b)
}

fn number_le(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    compare(exec, args, |a, b| a <= b, |a, b| a <= b)
}

fn number_gt(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    compare(exec, args, |a, b| a > b, |a, b| a > b)
}

fn number_ge(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    compare(exec, args, |a, b| a >= b, |a, b| a >= b)
}

fn number_str(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let rendered = match exec.heap().get(args[0]).raw {
        Raw::Int(n) => n.to_string(),
        Raw::Float(x) => {
            let mut buffer = ryu::Buffer::new();
            buffer.format(x).to_owned()
        }
        _ => return Err(HookFail::Unsupported),
    };
    Ok(exec.new_string(rendered))
}
