//! The `json` built-in library, backed by `serde_json`.
//!
//! `ToObject` maps JSON arrays to lists, objects to attribute maps, and
//! scalars to the corresponding raw payloads; `ToString` is the inverse,
//! rendering anything non-representable through its `str` hook.

use serde_json::Value;

use crate::{
    errors::{HookFail, HookResult},
    exec::Executor,
    heap::{ObjId, Raw},
    types::{bridge::set_attr_native, object::new_obj},
};

/// Guards against pathological nesting when converting heap data.
const MAX_JSON_DEPTH: usize = 64;

pub(crate) fn export(exec: &mut Executor<'_>) -> ObjId {
    let lib = new_obj(exec.heap_mut());
    set_attr_native(exec.heap_mut(), lib, "ToObject", json_to_object);
    set_attr_native(exec.heap_mut(), lib, "ToString", json_to_string);
    lib
}

fn json_to_object(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let text = exec.true_str(*args.get(1).ok_or(HookFail::Unsupported)?);
    let value: Value = serde_json::from_str(&text).map_err(|err| HookFail::Message(format!("invalid JSON: {err}")))?;
    Ok(build(exec, &value))
}

fn build(exec: &mut Executor<'_>, value: &Value) -> ObjId {
    match value {
        Value::Null => exec.nil(),
        Value::Bool(b) => exec.bool_obj(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => exec.new_int(i),
            None => exec.new_float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => exec.new_string(s.clone()),
        Value::Array(items) => {
            let items: Vec<ObjId> = items.iter().map(|item| build(exec, item)).collect();
            exec.new_list(items)
        }
        Value::Object(map) => {
            let obj = exec.new_obj();
            for (key, item) in map {
                let built = build(exec, item);
                exec.heap_mut().set_attr(obj, key.clone(), built);
            }
            obj
        }
    }
}

fn json_to_string(exec: &mut Executor<'_>, args: &[ObjId]) -> HookResult {
    let value = *args.get(1).ok_or(HookFail::Unsupported)?;
    let json = unbuild(exec, value, 0)?;
    let rendered = serde_json::to_string(&json).map_err(|err| HookFail::Message(err.to_string()))?;
    Ok(exec.new_string(rendered))
}

fn unbuild(exec: &mut Executor<'_>, id: ObjId, depth: usize) -> Result<Value, HookFail> {
    if depth > MAX_JSON_DEPTH {
        return Err(HookFail::Message("value is nested too deeply".to_owned()));
    }

    if exec.heap().is_nullish(id) {
        return Ok(Value::Null);
    }

    let raw = exec.heap().get(id).raw.clone();
    Ok(match raw {
        Raw::Bool(b) => Value::Bool(b),
        Raw::Int(n) => Value::Number(n.into()),
        Raw::Float(x) => serde_json::Number::from_f64(x).map_or(Value::Null, Value::Number),
        Raw::Str(s) => Value::String(s),
        Raw::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(unbuild(exec, item, depth + 1)?);
            }
            Value::Array(out)
        }
        Raw::Nil => {
            // A plain object: serialize its attribute table, keys sorted.
            let mut pairs: Vec<(String, ObjId)> =
                exec.heap().get(id).attr.iter().map(|(k, v)| (k.clone(), *v)).collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let mut map = serde_json::Map::new();
            for (key, value) in pairs {
                map.insert(key, unbuild(exec, value, depth + 1)?);
            }
            Value::Object(map)
        }
        Raw::Func(_) | Raw::Bridge(_) => Value::String(exec.true_str(id)),
    })
}
