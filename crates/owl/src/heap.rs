//! Arena storage for runtime values.
//!
//! Every Owl value is an [`ObjData`]: user attributes, operator hooks
//! ("deep" attributes), and a raw payload. Values live in a [`Heap`] owned
//! by the executor and are addressed by copyable [`ObjId`] indices, so
//! "sharing a value" is sharing an index and there is no clone-on-assign.
//! The arena lives exactly as long as its executor; nothing is ever freed
//! individually, which keeps closure cycles harmless.

use std::{fmt, rc::Rc};

use ahash::AHashMap;

use crate::{
    ast::{Expr, FunctionDef},
    errors::HookResult,
    exec::Executor,
};

/// A scope frame: identifier name to value index.
pub(crate) type Frame = AHashMap<String, ObjId>;

/// Index of a value in the executor's heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ObjId(u32);

impl ObjId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Signature of a built-in hook or bridge function.
///
/// `args[0]` is the bound receiver (`this`, or the null singleton when the
/// callable was never attached to anything); positional arguments follow
/// from index 1.
pub(crate) type NativeFn = fn(&mut Executor<'_>, &[ObjId]) -> HookResult;

/// What happens when a bridge value is called.
#[derive(Clone)]
pub(crate) enum BridgeFn {
    /// A built-in function.
    Native(NativeFn),
    /// A deferred expression, evaluated in the executor's current
    /// environment when forced. Used for the lazy right operand of
    /// `and` / `or` / `??`.
    Thunk(Rc<Expr>),
}

impl fmt::Debug for BridgeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => f.write_str("Native(..)"),
            Self::Thunk(expr) => write!(f, "Thunk({expr})"),
        }
    }
}

/// Payload of a bridge value.
#[derive(Debug, Clone)]
pub(crate) struct BridgeData {
    pub call: BridgeFn,
    pub this: Option<ObjId>,
}

/// Payload of a user function value: the definition, a shallow snapshot of
/// the defining frame, the bound receiver, and the next overload case.
#[derive(Debug, Clone)]
pub(crate) struct FuncData {
    pub def: Rc<FunctionDef>,
    pub env: Rc<Frame>,
    pub this: Option<ObjId>,
    pub els: Option<Rc<FuncData>>,
}

/// The raw payload of a value.
#[derive(Debug, Clone)]
pub(crate) enum Raw {
    Nil,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<ObjId>),
    Func(FuncData),
    Bridge(BridgeData),
}

/// A single runtime value: attributes, operator hooks, payload.
#[derive(Debug, Clone)]
pub(crate) struct ObjData {
    pub attr: AHashMap<String, ObjId>,
    pub deep: AHashMap<String, ObjId>,
    pub raw: Raw,
}

impl ObjData {
    pub fn bare(raw: Raw) -> Self {
        Self {
            attr: AHashMap::new(),
            deep: AHashMap::new(),
            raw,
        }
    }
}

/// The value arena.
#[derive(Debug, Default)]
pub(crate) struct Heap {
    slots: Vec<ObjData>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, data: ObjData) -> ObjId {
        let id = ObjId(u32::try_from(self.slots.len()).expect("heap exhausted"));
        self.slots.push(data);
        id
    }

    pub fn get(&self, id: ObjId) -> &ObjData {
        &self.slots[id.index()]
    }

    pub fn get_mut(&mut self, id: ObjId) -> &mut ObjData {
        &mut self.slots[id.index()]
    }

    // --- attributes -----------------------------------------------------

    pub fn get_attr(&self, id: ObjId, name: &str) -> Option<ObjId> {
        self.get(id).attr.get(name).copied()
    }

    pub fn get_deep_attr(&self, id: ObjId, name: &str) -> Option<ObjId> {
        self.get(id).deep.get(name).copied()
    }

    /// Stores a user attribute, binding the value to its new receiver when
    /// the value is callable.
    pub fn set_attr(&mut self, id: ObjId, name: impl Into<String>, value: ObjId) {
        self.bind_receiver(value, Some(id));
        self.get_mut(id).attr.insert(name.into(), value);
    }

    /// Stores an operator hook, with the same binding discipline as
    /// [`Heap::set_attr`].
    pub fn set_deep_attr(&mut self, id: ObjId, name: impl Into<String>, value: ObjId) {
        self.bind_receiver(value, Some(id));
        self.get_mut(id).deep.insert(name.into(), value);
    }

    /// Removes an operator hook, clearing the hook's receiver binding.
    pub fn delete_deep_attr(&mut self, id: ObjId, name: &str) {
        if let Some(value) = self.get(id).deep.get(name).copied() {
            self.bind_receiver(value, None);
            self.get_mut(id).deep.remove(name);
        }
    }

    /// Sets or clears the `this` slot on callable payloads; all other values
    /// ignore binding.
    pub fn bind_receiver(&mut self, value: ObjId, receiver: Option<ObjId>) {
        match &mut self.get_mut(value).raw {
            Raw::Func(data) => data.this = receiver,
            Raw::Bridge(data) => data.this = receiver,
            _ => {}
        }
    }

    // --- payload access -------------------------------------------------

    pub fn as_int(&self, id: ObjId) -> Option<i64> {
        match self.get(id).raw {
            Raw::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self, id: ObjId) -> Option<&str> {
        match &self.get(id).raw {
            Raw::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Clones out the element indices of a list payload.
    pub fn as_list(&self, id: ObjId) -> Option<Vec<ObjId>> {
        match &self.get(id).raw {
            Raw::List(items) => Some(items.clone()),
            _ => None,
        }
    }

    /// Truthiness is defined on the raw payload alone.
    pub fn is_truthy(&self, id: ObjId) -> bool {
        match &self.get(id).raw {
            Raw::Nil => false,
            Raw::Bool(b) => *b,
            Raw::Int(n) => *n != 0,
            Raw::Float(x) => *x != 0.0,
            Raw::Str(s) => !s.is_empty(),
            Raw::List(items) => !items.is_empty(),
            Raw::Func(_) | Raw::Bridge(_) => true,
        }
    }

    /// A value is nullish iff it exposes a truthy `null` deep attribute.
    pub fn is_nullish(&self, id: ObjId) -> bool {
        self.get_deep_attr(id, "null").is_some_and(|null| self.is_truthy(null))
    }
}
