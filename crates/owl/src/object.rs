//! The public, heap-independent value type.
//!
//! [`Object`] is what embedders pass into and get back from the
//! interpreter. It owns all its data and can be freely cloned and compared,
//! unlike the internal heap values it mirrors.

use std::fmt;

use crate::{
    exec::Executor,
    heap::{ObjId, Raw},
};

/// Conversion depth cap; cyclic data degrades to [`Object::Repr`] instead
/// of recursing forever.
const MAX_DATA_DEPTH: usize = 32;

/// An Owl value that can cross the embedding boundary.
///
/// Most variants work both as inputs (injected globals) and outputs
/// (program results). `Repr` is output-only: it stands in for values with
/// no data mapping, such as functions.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Object>),
    /// A plain object's attribute table, sorted by key.
    Map(Vec<(String, Object)>),
    /// Output-only rendering of a value with no data mapping.
    Repr(String),
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => {
                let mut buffer = ryu::Buffer::new();
                f.write_str(buffer.format(*x))
            }
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Repr(s) => f.write_str(s),
        }
    }
}

/// Error returned when an input [`Object`] cannot be realised as a runtime
/// value (currently only `Repr`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidInputError {
    pub message: String,
}

impl fmt::Display for InvalidInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for InvalidInputError {}

/// Extracts a heap value into an owned [`Object`].
pub(crate) fn from_heap(exec: &mut Executor<'_>, id: ObjId, depth: usize) -> Object {
    if depth > MAX_DATA_DEPTH {
        return Object::Repr("...".to_owned());
    }
    if exec.heap().is_nullish(id) {
        return Object::Null;
    }

    let raw = exec.heap().get(id).raw.clone();
    match raw {
        Raw::Bool(b) => Object::Bool(b),
        Raw::Int(n) => Object::Int(n),
        Raw::Float(x) => Object::Float(x),
        Raw::Str(s) => Object::Str(s),
        Raw::List(items) => Object::List(items.into_iter().map(|item| from_heap(exec, item, depth + 1)).collect()),
        Raw::Func(_) => Object::Repr(exec.true_str(id)),
        Raw::Bridge(_) => Object::Repr("<bridge>".to_owned()),
        Raw::Nil => {
            let mut pairs: Vec<(String, ObjId)> =
                exec.heap().get(id).attr.iter().map(|(k, v)| (k.clone(), *v)).collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            Object::Map(
                pairs
                    .into_iter()
                    .map(|(key, value)| (key, from_heap(exec, value, depth + 1)))
                    .collect(),
            )
        }
    }
}

/// Realises an input [`Object`] on the heap.
pub(crate) fn to_heap(exec: &mut Executor<'_>, value: &Object) -> Result<ObjId, InvalidInputError> {
    Ok(match value {
        Object::Null => exec.nil(),
        Object::Bool(b) => exec.bool_obj(*b),
        Object::Int(n) => exec.new_int(*n),
        Object::Float(x) => exec.new_float(*x),
        Object::Str(s) => exec.new_string(s.clone()),
        Object::List(items) => {
            let mut ids = Vec::with_capacity(items.len());
            for item in items {
                ids.push(to_heap(exec, item)?);
            }
            exec.new_list(ids)
        }
        Object::Map(pairs) => {
            let obj = exec.new_obj();
            for (key, item) in pairs {
                let id = to_heap(exec, item)?;
                exec.heap_mut().set_attr(obj, key.clone(), id);
            }
            obj
        }
        Object::Repr(_) => {
            return Err(InvalidInputError {
                message: "Repr values are output-only and cannot be injected".to_owned(),
            });
        }
    })
}
