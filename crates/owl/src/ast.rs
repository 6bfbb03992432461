//! Typed abstract syntax tree for Owl programs.
//!
//! Three disjoint node families: statements, expressions, and assignment
//! targets. Every node keeps the token that began its production so the
//! executor can locate errors, and every node renders a canonical source
//! form through `Display` (comma expressions come back out as bracketed
//! lists, expression-bodied functions as blocks with an explicit `return`).

use std::{fmt, rc::Rc};

use strum::Display;

use crate::lexer::Token;

/// A parsed source file: the statement list of the outermost block.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// Binary operators, displayed in their surface syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "**")]
    Pow,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "??")]
    Coalesce,
    #[strum(serialize = "has")]
    Has,
}

/// Unary operators. The surface spelling lives in the node's token, so
/// `!x` and `not x` both map to `Not` but print the way they were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

/// `++` / `--` postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IncDecOp {
    #[strum(serialize = "++")]
    Inc,
    #[strum(serialize = "--")]
    Dec,
}

/// Operators accepted by assignment expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AssignOp {
    #[strum(serialize = "=")]
    Set,
    #[strum(serialize = "+=")]
    Add,
    #[strum(serialize = "-=")]
    Sub,
    #[strum(serialize = "*=")]
    Mul,
    #[strum(serialize = "/=")]
    Div,
    #[strum(serialize = "&=")]
    And,
    #[strum(serialize = "|=")]
    Or,
}

impl AssignOp {
    #[must_use]
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "=" => Some(Self::Set),
            "+=" => Some(Self::Add),
            "-=" => Some(Self::Sub),
            "*=" => Some(Self::Mul),
            "/=" => Some(Self::Div),
            "&=" => Some(Self::And),
            "|=" => Some(Self::Or),
            _ => None,
        }
    }
}

/// Literal constant payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Const {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

/// A function definition: single argument target, optional guard, body.
///
/// Overload cascades are represented by [`Expr::Overload`]; the executor
/// links the cases into a runtime chain without mutating the tree, so the
/// optional `els` here is only populated when a cascade has already been
/// normalised.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub arg: AssignTarget,
    pub condition: Option<Expr>,
    pub body: Vec<Stmt>,
    pub els: Option<Rc<FunctionDef>>,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Let {
        target: AssignTarget,
        value: Expr,
        token: Token,
    },
    Expression {
        value: Expr,
    },
    Return {
        value: Option<Expr>,
        token: Token,
    },
    If {
        test: Expr,
        body: Vec<Stmt>,
        els: Vec<Stmt>,
        token: Token,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
        token: Token,
    },
    For {
        target: AssignTarget,
        iter: Expr,
        body: Vec<Stmt>,
        token: Token,
    },
    Break {
        token: Token,
    },
    Continue {
        token: Token,
    },
    Import {
        name: String,
        token: Token,
    },
    Print {
        value: Expr,
        token: Token,
    },
}

#[derive(Debug, Clone)]
pub enum Expr {
    Null {
        token: Token,
    },
    Const {
        value: Const,
        token: Token,
    },
    Name {
        name: String,
        token: Token,
    },
    Unary {
        op: UnaryOp,
        value: Box<Expr>,
        token: Token,
    },
    /// The right operand is reference-counted so the executor can defer it
    /// as a thunk for `and` / `or` / `??` without cloning the subtree.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Rc<Expr>,
        token: Token,
    },
    IncDec {
        target: AssignTarget,
        op: IncDecOp,
        token: Token,
    },
    IfExpr {
        test: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
        token: Token,
    },
    AssignExpr {
        target: AssignTarget,
        op: AssignOp,
        value: Box<Expr>,
        token: Token,
    },
    List {
        parts: Vec<Expr>,
        token: Token,
    },
    Map {
        keys: Vec<String>,
        values: Vec<Expr>,
        token: Token,
    },
    Attribute {
        target: Box<Expr>,
        name: String,
        is_deep: bool,
        is_coalesce: bool,
        token: Token,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
        token: Token,
    },
    Slice {
        target: Box<Expr>,
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
        token: Token,
    },
    FunctionDef(Rc<FunctionDef>),
    Overload {
        cases: Vec<Rc<FunctionDef>>,
        token: Token,
    },
    Call {
        target: Box<Expr>,
        arg: Option<Box<Expr>>,
        is_coalesce: bool,
        token: Token,
    },
    Spread {
        target: Box<Expr>,
        token: Token,
    },
}

#[derive(Debug, Clone)]
pub enum AssignTarget {
    Name {
        name: String,
        token: Token,
    },
    List {
        parts: Vec<AssignTarget>,
        token: Token,
    },
    Index {
        target: Box<AssignTarget>,
        index: Box<Expr>,
        token: Token,
    },
    Attribute {
        target: Box<Expr>,
        name: String,
        is_deep: bool,
        is_coalesce: bool,
        token: Token,
    },
    Spread {
        target: Box<AssignTarget>,
        token: Token,
    },
    Null {
        token: Token,
    },
}

impl Expr {
    /// The token that began this expression's production.
    #[must_use]
    pub fn token(&self) -> &Token {
        match self {
            Self::Null { token }
            | Self::Const { token, .. }
            | Self::Name { token, .. }
            | Self::Unary { token, .. }
            | Self::Binary { token, .. }
            | Self::IncDec { token, .. }
            | Self::IfExpr { token, .. }
            | Self::AssignExpr { token, .. }
            | Self::List { token, .. }
            | Self::Map { token, .. }
            | Self::Attribute { token, .. }
            | Self::Index { token, .. }
            | Self::Slice { token, .. }
            | Self::Overload { token, .. }
            | Self::Call { token, .. }
            | Self::Spread { token, .. } => token,
            Self::FunctionDef(def) => &def.token,
        }
    }
}

impl AssignTarget {
    #[must_use]
    pub fn token(&self) -> &Token {
        match self {
            Self::Name { token, .. }
            | Self::List { token, .. }
            | Self::Index { token, .. }
            | Self::Attribute { token, .. }
            | Self::Spread { token, .. }
            | Self::Null { token } => token,
        }
    }
}

impl Stmt {
    #[must_use]
    pub fn token(&self) -> &Token {
        match self {
            Self::Let { token, .. }
            | Self::Return { token, .. }
            | Self::If { token, .. }
            | Self::While { token, .. }
            | Self::For { token, .. }
            | Self::Break { token }
            | Self::Continue { token }
            | Self::Import { token, .. }
            | Self::Print { token, .. } => token,
            Self::Expression { value } => value.token(),
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, body: &[Stmt]) -> fmt::Result {
    for stmt in body {
        write!(f, "{stmt}")?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = String::new();
        for stmt in &self.body {
            rendered.push_str(&stmt.to_string());
        }
        f.write_str(rendered.strip_suffix('\n').unwrap_or(&rendered))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let { target, value, .. } => writeln!(f, "let {target} = {value}"),
            Self::Expression { value } => writeln!(f, "{value}"),
            Self::Return { value, .. } => match value {
                Some(value) => writeln!(f, "return {value}"),
                None => writeln!(f, "return"),
            },
            Self::If { test, body, els, .. } => {
                writeln!(f, "if {test} {{")?;
                write_block(f, body)?;
                writeln!(f, "}}")?;
                if !els.is_empty() {
                    writeln!(f, "else {{")?;
                    write_block(f, els)?;
                    writeln!(f, "}}")?;
                }
                Ok(())
            }
            Self::While { test, body, .. } => {
                writeln!(f, "while {test} {{")?;
                write_block(f, body)?;
                writeln!(f, "}}")
            }
            Self::For {
                target, iter, body, ..
            } => {
                writeln!(f, "for {target} in {iter} {{")?;
                write_block(f, body)?;
                writeln!(f, "}}")
            }
            Self::Break { .. } => writeln!(f, "break"),
            Self::Continue { .. } => writeln!(f, "continue"),
            Self::Import { name, .. } => writeln!(f, "import {name}"),
            Self::Print { value, .. } => writeln!(f, "print {value}"),
        }
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl fmt::Display for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(condition) = &self.condition {
            write!(f, "when {condition}")?;
        }
        writeln!(f, "({}) => {{", self.arg)?;
        write_block(f, &self.body)?;
        write!(f, "}}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null { .. } => write!(f, "null"),
            Self::Const { value, .. } => write!(f, "{value}"),
            Self::Name { name, .. } => write!(f, "{name}"),
            Self::Unary { value, token, .. } => write!(f, "({}{value})", token.literal),
            Self::Binary { left, op, right, .. } => write!(f, "({left} {op} {right})"),
            Self::IncDec { target, op, .. } => write!(f, "{target}{op}"),
            Self::IfExpr {
                test,
                if_true,
                if_false,
                ..
            } => write!(f, "({test} ? {if_true} : {if_false})"),
            Self::AssignExpr { target, op, value, .. } => write!(f, "{target} {op} {value}"),
            Self::List { parts, .. } => {
                write!(f, "[")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{part}")?;
                }
                write!(f, "]")
            }
            Self::Map { keys, values, .. } => {
                writeln!(f, "{{")?;
                for (i, key) in keys.iter().enumerate() {
                    write!(f, "{key}: {}", values[i])?;
                    if i + 1 < keys.len() {
                        write!(f, ",")?;
                    }
                    writeln!(f)?;
                }
                write!(f, "}}")
            }
            Self::Attribute {
                target,
                name,
                is_deep,
                is_coalesce,
                ..
            } => {
                write!(f, "{target}")?;
                if *is_coalesce {
                    write!(f, "?")?;
                }
                write!(f, "{}{name}", if *is_deep { "::" } else { "." })
            }
            Self::Index { target, index, .. } => write!(f, "{target}[{index}]"),
            Self::Slice { target, start, end, .. } => {
                write!(f, "{target}[")?;
                if let Some(start) = start {
                    write!(f, "{start}")?;
                }
                write!(f, ":")?;
                if let Some(end) = end {
                    write!(f, "{end}")?;
                }
                write!(f, "]")
            }
            Self::FunctionDef(def) => write!(f, "{def}"),
            Self::Overload { cases, .. } => {
                write!(f, "<")?;
                for (i, case) in cases.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{case}")?;
                }
                write!(f, ">")
            }
            Self::Call {
                target,
                arg,
                is_coalesce,
                ..
            } => {
                write!(f, "{target}")?;
                if *is_coalesce {
                    write!(f, "?")?;
                }
                write!(f, "(")?;
                if let Some(arg) = arg {
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::Spread { target, .. } => write!(f, "...{target}"),
        }
    }
}

impl fmt::Display for AssignTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name { name, .. } => write!(f, "{name}"),
            Self::List { parts, .. } => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
            Self::Index { target, index, .. } => write!(f, "{target}[{index}]"),
            Self::Attribute {
                target, name, is_deep, ..
            } => write!(f, "{target}{}{name}", if *is_deep { "::" } else { "." }),
            Self::Spread { target, .. } => write!(f, "...{target}"),
            Self::Null { .. } => write!(f, "<>"),
        }
    }
}
