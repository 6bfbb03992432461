//! Bridge values: bare callables with no attribute tables of their own.

use std::rc::Rc;

use crate::{
    ast::Expr,
    heap::{BridgeData, BridgeFn, Heap, NativeFn, ObjData, ObjId, Raw},
};

/// Wraps a built-in function as a callable value.
pub(crate) fn new_native(heap: &mut Heap, f: NativeFn) -> ObjId {
    heap.alloc(ObjData::bare(Raw::Bridge(BridgeData {
        call: BridgeFn::Native(f),
        this: None,
    })))
}

/// Wraps an unevaluated expression as a zero-argument callable. Forcing the
/// thunk evaluates the expression in the executor's current environment.
pub(crate) fn new_thunk(heap: &mut Heap, expr: Rc<Expr>) -> ObjId {
    heap.alloc(ObjData::bare(Raw::Bridge(BridgeData {
        call: BridgeFn::Thunk(expr),
        this: None,
    })))
}

/// Installs a native function as an operator hook.
pub(crate) fn set_deep_native(heap: &mut Heap, id: ObjId, name: &str, f: NativeFn) {
    let bridge = new_native(heap, f);
    heap.set_deep_attr(id, name, bridge);
}

/// Installs a native function as a library method.
pub(crate) fn set_attr_native(heap: &mut Heap, id: ObjId, name: &str, f: NativeFn) {
    let bridge = new_native(heap, f);
    heap.set_attr(id, name, bridge);
}

/// Reads a required positional argument; a short argument list is an
/// ordinary hook failure, not a host panic.
pub(crate) fn arg(args: &[crate::heap::ObjId], index: usize) -> Result<crate::heap::ObjId, crate::errors::HookFail> {
    args.get(index).copied().ok_or(crate::errors::HookFail::Unsupported)
}

/// The single-argument call convention: no argument means no positionals, a
/// list argument spreads into positionals, anything else is one positional.
pub(crate) fn flatten_arg(heap: &Heap, arg: Option<ObjId>) -> Vec<ObjId> {
    match arg {
        None => Vec::new(),
        Some(id) => match heap.as_list(id) {
            Some(items) => items,
            None => vec![id],
        },
    }
}
