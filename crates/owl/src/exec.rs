//! The tree-walking executor.
//!
//! Statements run through a small state machine (`RUN` / `RETURN` / `BREAK`
//! / `CONTINUE`) that bubbles out of blocks without unwinding; expressions
//! dispatch every operator through the operand's deep hooks, with the
//! documented mirror fallback on the right operand for the commutative and
//! comparison operators. All failures are explicit [`RunError`] values
//! carrying `file:line:column`.

use std::{mem, path::PathBuf, rc::Rc};

use smallvec::SmallVec;

use crate::{
    ast::{AssignOp, AssignTarget, BinaryOp, Const, Expr, IncDecOp, Program, Stmt, UnaryOp},
    errors::{HookFail, HookResult, RunError, RunResult},
    heap::{BridgeFn, Frame, FuncData, Heap, ObjId, Raw},
    io::PrintWriter,
    lexer::Token,
    modules,
    types::{boolean, bridge, function, list, null, number, object, string},
};

/// Ceiling on nested Owl calls, so runaway recursion surfaces as an error
/// instead of exhausting the host stack.
const MAX_CALL_DEPTH: usize = 200;

/// Result of running a statement or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    Run,
    Return(ObjId),
    Break,
    Continue,
}

/// Persistent interpreter state: the heap, the scope frames, the cached
/// singletons, and the path imports resolve against.
///
/// Singletons are per-instance, never process-wide, so embedders can run
/// any number of independent interpreters.
#[derive(Debug)]
pub(crate) struct Vm {
    pub heap: Heap,
    pub frames: Vec<Frame>,
    pub current_path: PathBuf,
    nil: ObjId,
    tru: ObjId,
    fls: ObjId,
    depth: usize,
}

impl Vm {
    pub fn new(current_path: PathBuf) -> Self {
        let mut heap = Heap::new();
        let tru = boolean::alloc_bool(&mut heap, true);
        let fls = boolean::alloc_bool(&mut heap, false);
        let nil = null::alloc_null(&mut heap, tru);

        let mut global = Frame::new();
        global.insert("this".to_owned(), nil);

        Self {
            heap,
            frames: vec![global],
            current_path,
            nil,
            tru,
            fls,
            depth: 0,
        }
    }

    /// Drops any frames left behind by an aborted evaluation. The REPL calls
    /// this so one bad line cannot corrupt the session's scope stack.
    pub fn reset_after_error(&mut self) {
        self.frames.truncate(1);
        self.depth = 0;
    }
}

/// One evaluation: persistent state plus the output sink.
pub(crate) struct Executor<'io> {
    pub vm: &'io mut Vm,
    pub print: &'io mut dyn PrintWriter,
}

impl Executor<'_> {
    // --- plumbing -------------------------------------------------------

    pub fn heap(&self) -> &Heap {
        &self.vm.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.vm.heap
    }

    pub fn nil(&self) -> ObjId {
        self.vm.nil
    }

    pub fn bool_obj(&self, value: bool) -> ObjId {
        if value { self.vm.tru } else { self.vm.fls }
    }

    pub fn new_int(&mut self, value: i64) -> ObjId {
        number::new_int(&mut self.vm.heap, value)
    }

    pub fn new_float(&mut self, value: f64) -> ObjId {
        number::new_float(&mut self.vm.heap, value)
    }

    pub fn new_string(&mut self, value: impl Into<String>) -> ObjId {
        string::new_string(&mut self.vm.heap, value)
    }

    pub fn new_list(&mut self, values: Vec<ObjId>) -> ObjId {
        list::new_list(&mut self.vm.heap, values)
    }

    pub fn new_obj(&mut self) -> ObjId {
        object::new_obj(&mut self.vm.heap)
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.vm.frames.push(frame);
    }

    pub fn pop_frame(&mut self) {
        self.vm.frames.pop();
    }

    /// Writes into the innermost frame.
    pub fn set_local(&mut self, name: impl Into<String>, value: ObjId) {
        self.vm
            .frames
            .last_mut()
            .expect("frame stack is never empty")
            .insert(name.into(), value);
    }

    /// Scans frames innermost-outward.
    fn lookup(&self, name: &str) -> Option<ObjId> {
        self.vm.frames.iter().rev().find_map(|frame| frame.get(name).copied())
    }

    pub fn enter_call(&mut self, token: &Token) -> Result<(), HookFail> {
        if self.vm.depth >= MAX_CALL_DEPTH {
            return Err(HookFail::Error(RunError::new("maximum call depth exceeded", token)));
        }
        self.vm.depth += 1;
        Ok(())
    }

    pub fn leave_call(&mut self) {
        self.vm.depth = self.vm.depth.saturating_sub(1);
    }

    fn fail(&self, message: impl Into<String>, token: &Token) -> RunError {
        RunError::new(message, token)
    }

    // --- value plumbing -------------------------------------------------

    /// Renders a value through its `str` hook; values without one render as
    /// the empty string.
    pub fn true_str(&mut self, id: ObjId) -> String {
        match self.deep_call(id, "str", None) {
            Ok(result) => self.heap().as_str(result).unwrap_or_default().to_owned(),
            Err(_) => String::new(),
        }
    }

    /// A list of the value's elements: the raw list payload when there is
    /// one, otherwise whatever the `iter` hook produces.
    pub fn as_list_value(&mut self, id: ObjId) -> Option<Vec<ObjId>> {
        if let Some(items) = self.heap().as_list(id) {
            return Some(items);
        }
        let iterated = self.deep_call(id, "iter", None).ok()?;
        self.heap().as_list(iterated)
    }

    /// Looks up a deep hook and calls it. The hook's bridge prepends the
    /// bound receiver, so a binary hook sees `[this, left, right]`.
    pub fn deep_call(&mut self, target: ObjId, name: &str, arg: Option<ObjId>) -> HookResult {
        let hook = self
            .heap()
            .get_deep_attr(target, name)
            .ok_or(HookFail::Unsupported)?;
        self.call_value(hook, arg)
    }

    /// Calls any value: bridges run their native or thunk, functions walk
    /// their cascade, and anything else defers to its `call` hook.
    pub fn call_value(&mut self, callee: ObjId, arg: Option<ObjId>) -> HookResult {
        enum Kind {
            Bridge(crate::heap::BridgeData),
            Func(FuncData),
            Other,
        }

        let kind = match &self.heap().get(callee).raw {
            Raw::Bridge(data) => Kind::Bridge(data.clone()),
            Raw::Func(data) => Kind::Func(data.clone()),
            _ => Kind::Other,
        };

        match kind {
            Kind::Bridge(data) => {
                let this = data.this.unwrap_or(self.vm.nil);
                let mut args: SmallVec<[ObjId; 4]> = SmallVec::new();
                args.push(this);
                args.extend(bridge::flatten_arg(self.heap(), arg));
                match data.call {
                    BridgeFn::Native(f) => f(self, &args),
                    BridgeFn::Thunk(expr) => self.eval_expr(&expr).map_err(HookFail::from),
                }
            }
            Kind::Func(data) => function::call_func(self, data, arg),
            Kind::Other => self.deep_call(callee, "call", arg),
        }
    }

    // --- statements -----------------------------------------------------

    /// Runs a whole program; the result is the value carried by a top-level
    /// `return`, or the null singleton when the program just ends.
    pub fn exec_program(&mut self, program: &Program) -> RunResult<ObjId> {
        let state = self.exec_block(&program.body)?;
        Ok(match state {
            RunState::Return(value) => value,
            _ => self.vm.nil,
        })
    }

    pub fn exec_block(&mut self, block: &[Stmt]) -> RunResult<RunState> {
        for stmt in block {
            let state = self.exec_statement(stmt)?;
            if state != RunState::Run {
                return Ok(state);
            }
        }
        Ok(RunState::Run)
    }

    fn exec_statement(&mut self, stmt: &Stmt) -> RunResult<RunState> {
        match stmt {
            Stmt::Expression { value } => {
                self.eval_expr(value)?;
                Ok(RunState::Run)
            }
            Stmt::Let { target, value, .. } => {
                let value = self.eval_expr(value)?;
                self.assign_checked(target, Some(value))?;
                Ok(RunState::Run)
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => self.vm.nil,
                };
                Ok(RunState::Return(value))
            }
            Stmt::If { test, body, els, .. } => {
                let test = self.eval_expr(test)?;
                if self.heap().is_truthy(test) {
                    self.exec_block(body)
                } else if els.is_empty() {
                    Ok(RunState::Run)
                } else {
                    self.exec_block(els)
                }
            }
            Stmt::While { test, body, .. } => self.exec_while(test, body),
            Stmt::For {
                target, iter, body, token,
            } => self.exec_for(target, iter, body, token),
            Stmt::Break { .. } => Ok(RunState::Break),
            Stmt::Continue { .. } => Ok(RunState::Continue),
            Stmt::Import { name, token } => {
                let (module, alias) = modules::load_module(self, name, token)?;
                self.set_local(alias, module);
                Ok(RunState::Run)
            }
            Stmt::Print { value, .. } => {
                let value = self.eval_expr(value)?;
                let rendered = self.true_str(value);
                self.print.stdout_write(&rendered);
                self.print.stdout_push('\n');
                Ok(RunState::Run)
            }
        }
    }

    fn exec_while(&mut self, test: &Expr, body: &[Stmt]) -> RunResult<RunState> {
        loop {
            let test_value = self.eval_expr(test)?;
            if !self.heap().is_truthy(test_value) {
                return Ok(RunState::Run);
            }
            match self.exec_block(body)? {
                RunState::Break => return Ok(RunState::Run),
                state @ RunState::Return(_) => return Ok(state),
                RunState::Run | RunState::Continue => {}
            }
        }
    }

    fn exec_for(&mut self, target: &AssignTarget, iter: &Expr, body: &[Stmt], token: &Token) -> RunResult<RunState> {
        let iter_value = self.eval_expr(iter)?;
        let items = self
            .as_list_value(iter_value)
            .ok_or_else(|| self.fail("For loop iter is not a list", token))?;

        for item in items {
            self.assign_checked(target, Some(item))?;
            match self.exec_block(body)? {
                RunState::Break => return Ok(RunState::Run),
                state @ RunState::Return(_) => return Ok(state),
                RunState::Run | RunState::Continue => {}
            }
        }
        Ok(RunState::Run)
    }

    // --- assignment -----------------------------------------------------

    fn assign_checked(&mut self, target: &AssignTarget, value: Option<ObjId>) -> RunResult<()> {
        match self.assign(target, value) {
            Ok(()) => Ok(()),
            Err(HookFail::Error(err)) => Err(err),
            Err(HookFail::Message(msg)) => Err(self.fail(msg, target.token())),
            Err(HookFail::Unsupported) => Err(self.fail(format!("Unable to assign to '{target}'"), target.token())),
        }
    }

    /// Recursive destructuring assignment. `value` is `None` only when a
    /// call passed no argument; a bare name still binds (to null), while an
    /// `AssignNull` target insists on the absence of a value.
    pub fn assign(&mut self, target: &AssignTarget, value: Option<ObjId>) -> Result<(), HookFail> {
        match target {
            AssignTarget::Name { name, .. } => {
                let value = value.unwrap_or(self.vm.nil);
                self.set_local(name.clone(), value);
                Ok(())
            }
            AssignTarget::List { parts, token } => {
                let value = value.unwrap_or(self.vm.nil);
                let values = self.as_list_value(value).unwrap_or_else(|| vec![value]);
                self.assign_list(parts, &values, token)
            }
            AssignTarget::Attribute {
                target,
                name,
                is_deep,
                is_coalesce,
                ..
            } => {
                let receiver = self.eval_expr(target)?;
                if *is_coalesce && self.heap().is_nullish(receiver) {
                    return Ok(());
                }
                let value = value.unwrap_or(self.vm.nil);
                if *is_deep {
                    self.heap_mut().set_deep_attr(receiver, name.clone(), value);
                } else {
                    self.heap_mut().set_attr(receiver, name.clone(), value);
                }
                Ok(())
            }
            AssignTarget::Index { target, index, token } => {
                let receiver = self.get_from_assign(target)?;
                let index = self.eval_expr(index)?;
                let value = value.unwrap_or(self.vm.nil);
                let pair = self.new_list(vec![index, value]);
                match self.deep_call(receiver, "setIndex", Some(pair)) {
                    Ok(_) => Ok(()),
                    Err(HookFail::Error(err)) => Err(HookFail::Error(err)),
                    Err(_) => Err(HookFail::Error(
                        self.fail(format!("Unable to set index '{target}'"), token),
                    )),
                }
            }
            AssignTarget::Spread { target, .. } => {
                let value = value.unwrap_or(self.vm.nil);
                if self.heap().as_list(value).is_some() {
                    self.assign(target, Some(value))
                } else {
                    let wrapped = self.new_list(vec![value]);
                    self.assign(target, Some(wrapped))
                }
            }
            AssignTarget::Null { token } => match value {
                None => Ok(()),
                Some(value) => {
                    let rendered = self.true_str(value);
                    Err(HookFail::Error(
                        self.fail(format!("Expected nil, got {rendered}"), token),
                    ))
                }
            },
        }
    }

    /// Destructures `values` across `parts`, honoring at most one spread.
    fn assign_list(&mut self, parts: &[AssignTarget], values: &[ObjId], token: &Token) -> Result<(), HookFail> {
        let mut spread_index = None;
        for (i, part) in parts.iter().enumerate() {
            if matches!(part, AssignTarget::Spread { .. }) {
                if spread_index.is_some() {
                    return Err(HookFail::Error(self.fail("Multiple spreads in assignment", token)));
                }
                spread_index = Some(i);
            }
        }

        match spread_index {
            None => {
                if values.len() != parts.len() {
                    return Err(HookFail::Error(self.fail(
                        format!("Expected {} values, got {}", parts.len(), values.len()),
                        token,
                    )));
                }
                for (part, value) in parts.iter().zip(values) {
                    self.assign(part, Some(*value))?;
                }
                Ok(())
            }
            Some(spread) => {
                let before = &parts[..spread];
                let after = &parts[spread + 1..];
                if values.len() < before.len() + after.len() {
                    return Err(HookFail::Error(self.fail(
                        format!(
                            "Expected at least {} values, got {}",
                            before.len() + after.len(),
                            values.len()
                        ),
                        token,
                    )));
                }

                for (part, value) in before.iter().zip(values) {
                    self.assign(part, Some(*value))?;
                }
                let middle = values[before.len()..values.len() - after.len()].to_vec();
                let middle = self.new_list(middle);
                self.assign(&parts[spread], Some(middle))?;
                for (part, value) in after.iter().zip(&values[values.len() - after.len()..]) {
                    self.assign(part, Some(*value))?;
                }
                Ok(())
            }
        }
    }

    /// Reads the current value of an assignment target, for augmented
    /// assignment and `++`/`--`.
    fn get_from_assign(&mut self, target: &AssignTarget) -> Result<ObjId, HookFail> {
        match target {
            AssignTarget::Name { name, token } => self
                .lookup(name)
                .ok_or_else(|| HookFail::Error(self.fail(format!("Unable to find variable '{name}'"), token))),
            AssignTarget::Attribute {
                target: receiver,
                name,
                is_deep,
                token,
                ..
            } => {
                let receiver = self.eval_expr(receiver)?;
                let found = if *is_deep {
                    self.heap().get_deep_attr(receiver, name)
                } else {
                    self.heap().get_attr(receiver, name)
                };
                found.ok_or_else(|| HookFail::Error(self.fail(format!("Unable to find attribute {name}"), token)))
            }
            other => Err(HookFail::Error(self.fail(
                format!("Unable to get '{other}' in assignment"),
                other.token(),
            ))),
        }
    }

    // --- expressions ----------------------------------------------------

    pub fn eval_expr(&mut self, expr: &Expr) -> RunResult<ObjId> {
        match expr {
            Expr::Null { .. } => Ok(self.vm.nil),
            Expr::Const { value, .. } => Ok(match value {
                Const::Int(n) => self.new_int(*n),
                Const::Float(x) => self.new_float(*x),
                Const::Str(s) => self.new_string(s.clone()),
                Const::Bool(b) => self.bool_obj(*b),
            }),
            Expr::Name { name, token } => self
                .lookup(name)
                .ok_or_else(|| self.fail(format!("Unable to find variable '{name}'"), token)),
            Expr::List { parts, .. } => self.eval_comma(parts),
            Expr::Map { keys, values, .. } => {
                let obj = self.new_obj();
                for (key, value) in keys.iter().zip(values) {
                    let value = self.eval_expr(value)?;
                    self.heap_mut().set_attr(obj, key.clone(), value);
                }
                Ok(obj)
            }
            Expr::Unary { op, value, token, .. } => self.eval_unary(expr, *op, value, token),
            Expr::Binary {
                left, op, right, token, ..
            } => self.eval_binary(expr, left, *op, right, token),
            Expr::IncDec { target, op, token } => self.eval_inc_dec(expr, target, *op, token),
            Expr::IfExpr {
                test, if_true, if_false, ..
            } => {
                let test = self.eval_expr(test)?;
                if self.heap().is_truthy(test) {
                    self.eval_expr(if_true)
                } else {
                    self.eval_expr(if_false)
                }
            }
            Expr::AssignExpr {
                target, op, value, token,
            } => self.eval_assign_expr(target, *op, value, token),
            Expr::Attribute {
                target,
                name,
                is_deep,
                is_coalesce,
                token,
            } => {
                let receiver = self.eval_expr(target)?;
                if *is_coalesce && self.heap().is_nullish(receiver) {
                    return Ok(receiver);
                }
                let found = if *is_deep {
                    self.heap().get_deep_attr(receiver, name)
                } else {
                    self.heap().get_attr(receiver, name)
                };
                found.ok_or_else(|| self.fail(format!("Unable to evaluate attribute '{expr}'"), token))
            }
            Expr::Index { target, index, token } => {
                let receiver = self.eval_expr(target)?;
                let index_value = self.eval_expr(index)?;
                match self.deep_call(receiver, "index", Some(index_value)) {
                    Ok(value) => Ok(value),
                    Err(HookFail::Error(err)) => Err(err),
                    Err(_) => {
                        let rendered = self.true_str(index_value);
                        Err(self.fail(
                            format!("Unable to evaluate index '{expr}', {target} does not have index {rendered}"),
                            token,
                        ))
                    }
                }
            }
            Expr::Slice { target, start, end, token } => {
                let receiver = self.eval_expr(target)?;
                let start = match start {
                    Some(expr) => self.eval_expr(expr)?,
                    None => self.vm.nil,
                };
                let end = match end {
                    Some(expr) => self.eval_expr(expr)?,
                    None => self.vm.nil,
                };
                let bounds = self.new_list(vec![start, end]);
                match self.deep_call(receiver, "slice", Some(bounds)) {
                    Ok(value) => Ok(value),
                    Err(HookFail::Error(err)) => Err(err),
                    Err(_) => Err(self.fail(format!("Unable to evaluate slice '{expr}'"), token)),
                }
            }
            Expr::FunctionDef(def) => {
                let frame = self.vm.frames.last().expect("frame stack is never empty").clone();
                Ok(function::new_func(&mut self.vm.heap, def, &frame))
            }
            Expr::Overload { cases, .. } => self.eval_overload(cases),
            Expr::Call {
                target,
                arg,
                is_coalesce,
                token,
            } => self.eval_call(expr, target, arg.as_deref(), *is_coalesce, token),
            Expr::Spread { token, .. } => Err(self.fail(format!("Unable to evaluate expression '{expr}'"), token)),
        }
    }

    /// Comma/list expression: evaluate left to right, splicing spreads.
    fn eval_comma(&mut self, parts: &[Expr]) -> RunResult<ObjId> {
        let mut values = Vec::with_capacity(parts.len());
        for part in parts {
            if let Expr::Spread { target, token } = part {
                let spread = self.eval_expr(target)?;
                let items = self
                    .as_list_value(spread)
                    .ok_or_else(|| self.fail("Spread value is not a list", token))?;
                values.extend(items);
            } else {
                values.push(self.eval_expr(part)?);
            }
        }
        Ok(self.new_list(values))
    }

    fn eval_unary(&mut self, expr: &Expr, op: UnaryOp, value: &Expr, token: &Token) -> RunResult<ObjId> {
        let value = self.eval_expr(value)?;
        let hook = match op {
            UnaryOp::Not => "not",
            UnaryOp::Neg => "neg",
        };
        match self.deep_call(value, hook, None) {
            Ok(result) => Ok(result),
            Err(HookFail::Error(err)) => Err(err),
            Err(_) => Err(self.fail(format!("Unable to evaluate unary operator '{expr}'"), token)),
        }
    }

    fn eval_binary(&mut self, expr: &Expr, left: &Expr, op: BinaryOp, right: &Rc<Expr>, token: &Token) -> RunResult<ObjId> {
        let left = self.eval_expr(left)?;

        // Short-circuit operators defer the right operand as a thunk; the
        // hook decides whether to force it.
        if let BinaryOp::And | BinaryOp::Or | BinaryOp::Coalesce = op {
            let hook = match op {
                BinaryOp::And => "and",
                BinaryOp::Or => "or",
                _ => "coalesce",
            };
            let thunk = bridge::new_thunk(&mut self.vm.heap, Rc::clone(right));
            let pair = self.new_list(vec![left, thunk]);
            return match self.deep_call(left, hook, Some(pair)) {
                Ok(value) => Ok(value),
                Err(HookFail::Error(err)) => Err(err),
                Err(_) => Err(self.fail(format!("Unable to evaluate binary operator '{expr}'"), token)),
            };
        }

        let right = self.eval_expr(right)?;

        if op == BinaryOp::Has {
            return match self.deep_call(left, "has", Some(right)) {
                Ok(value) => Ok(value),
                Err(HookFail::Error(err)) => Err(err),
                Err(_) => Err(self.fail(format!("Unable to evaluate binary operator '{expr}'"), token)),
            };
        }

        // Primary hook on the left operand; for the symmetric operators a
        // failure retries on the right operand (comparisons swap to the
        // dual operator).
        let (hook, mirror) = match op {
            BinaryOp::Add => ("add", Some("add")),
            BinaryOp::Sub => ("sub", None),
            BinaryOp::Mul => ("mul", Some("mul")),
            BinaryOp::Div => ("div", None),
            BinaryOp::Pow => ("pow", None),
            BinaryOp::Mod => ("mod", None),
            BinaryOp::Eq => ("eq", Some("eq")),
            BinaryOp::Ne => ("ne", Some("ne")),
            BinaryOp::Gt => ("gt", Some("le")),
            BinaryOp::Lt => ("lt", Some("ge")),
            BinaryOp::Ge => ("ge", Some("lt")),
            BinaryOp::Le => ("le", Some("gt")),
            BinaryOp::And | BinaryOp::Or | BinaryOp::Coalesce | BinaryOp::Has => unreachable!("handled above"),
        };

        let pair = self.new_list(vec![left, right]);
        match self.deep_call(left, hook, Some(pair)) {
            Ok(value) => return Ok(value),
            Err(HookFail::Error(err)) => return Err(err),
            Err(_) => {}
        }

        if let Some(mirror_hook) = mirror {
            let pair = self.new_list(vec![left, right]);
            match self.deep_call(right, mirror_hook, Some(pair)) {
                Ok(value) => return Ok(value),
                Err(HookFail::Error(err)) => return Err(err),
                Err(_) => {}
            }
        }

        Err(self.fail(format!("Unable to evaluate binary operator '{expr}'"), token))
    }

    fn eval_inc_dec(&mut self, expr: &Expr, target: &AssignTarget, op: IncDecOp, token: &Token) -> RunResult<ObjId> {
        let current = match self.get_from_assign(target) {
            Ok(id) => id,
            Err(HookFail::Error(err)) => return Err(err),
            Err(_) => return Err(self.fail(format!("Unable to evaluate increment/decrement '{expr}'"), token)),
        };

        let hook = match op {
            IncDecOp::Inc => "inc",
            IncDecOp::Dec => "dec",
        };
        let updated = match self.deep_call(current, hook, None) {
            Ok(value) => value,
            Err(HookFail::Error(err)) => return Err(err),
            Err(_) => return Err(self.fail(format!("Unable to evaluate increment/decrement '{expr}'"), token)),
        };

        self.assign_checked(target, Some(updated))?;
        Ok(updated)
    }

    fn eval_assign_expr(&mut self, target: &AssignTarget, op: AssignOp, value: &Expr, token: &Token) -> RunResult<ObjId> {
        let value = self.eval_expr(value)?;

        let combined = if op == AssignOp::Set {
            value
        } else {
            let hook = match op {
                AssignOp::Add => "add",
                AssignOp::Sub => "sub",
                AssignOp::Mul => "mul",
                AssignOp::Div => "div",
                AssignOp::And => "and",
                AssignOp::Or => "or",
                AssignOp::Set => unreachable!("handled above"),
            };
            let current = match self.get_from_assign(target) {
                Ok(id) => id,
                Err(HookFail::Error(err)) => return Err(err),
                Err(_) => return Err(self.fail(format!("Unable to find '{target}'"), token)),
            };
            let pair = self.new_list(vec![current, value]);
            match self.deep_call(current, hook, Some(pair)) {
                Ok(result) => result,
                Err(HookFail::Error(err)) => return Err(err),
                Err(_) => {
                    let rendered = self.true_str(value);
                    return Err(self.fail(
                        format!("Unable to assign value '{rendered}' to '{target}'"),
                        token,
                    ));
                }
            }
        };

        self.assign_checked(target, Some(combined))?;
        Ok(combined)
    }

    /// Links an overload's cases into a cascade, right to left, without
    /// touching the AST; re-evaluating the same overload is idempotent.
    fn eval_overload(&mut self, cases: &[Rc<crate::ast::FunctionDef>]) -> RunResult<ObjId> {
        let frame = self.vm.frames.last().expect("frame stack is never empty").clone();

        let mut els: Option<Rc<FuncData>> = None;
        for case in cases.iter().rev() {
            let mut data = function::make_data(case, &frame);
            data.els = els.take();
            els = Some(Rc::new(data));
        }

        let head = els.expect("overload has at least one case");
        Ok(function::alloc_func(&mut self.vm.heap, (*head).clone()))
    }

    fn eval_call(
        &mut self,
        expr: &Expr,
        target: &Expr,
        arg: Option<&Expr>,
        is_coalesce: bool,
        token: &Token,
    ) -> RunResult<ObjId> {
        let callee = self.eval_expr(target)?;
        if is_coalesce && self.heap().is_nullish(callee) {
            return Ok(callee);
        }

        let arg = match arg {
            Some(expr) => Some(self.eval_expr(expr)?),
            None => None,
        };

        match self.call_value(callee, arg) {
            Ok(value) => Ok(value),
            Err(HookFail::Error(err)) => Err(err),
            Err(HookFail::Message(msg)) => {
                Err(self.fail(format!("Unable to evaluate function call '{expr}', {msg}"), token))
            }
            Err(HookFail::Unsupported) => Err(self.fail(format!("Unable to evaluate function call '{expr}'"), token)),
        }
    }

    // --- module evaluation ----------------------------------------------

    /// Runs a module body in a fresh frame stack (same heap) and hands back
    /// the module's global frame.
    pub fn exec_module(&mut self, program: &Program, path: PathBuf) -> RunResult<Frame> {
        let saved_frames = mem::take(&mut self.vm.frames);
        let saved_path = mem::replace(&mut self.vm.current_path, path);

        let mut global = Frame::new();
        global.insert("this".to_owned(), self.vm.nil);
        self.vm.frames.push(global);

        let result = self.exec_block(&program.body);
        let module_frame = self.vm.frames.first().cloned().unwrap_or_default();

        self.vm.frames = saved_frames;
        self.vm.current_path = saved_path;

        result?;
        Ok(module_frame)
    }
}
