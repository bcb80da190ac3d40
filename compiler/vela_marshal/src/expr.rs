//! Host-language expression and statement trees.
//!
//! The synthesizers build these instead of strings so tests can assert on
//! structure and the emitter owns all formatting decisions. Rendering is
//! deliberately simple C#-flavored syntax; precedence never matters because
//! the tree only combines calls, member accesses, and casts.

use vela_ir::{Name, StringLookup};

/// A host-language expression.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum HostExpr {
    /// A raw token: identifier, keyword, or pre-rendered fragment.
    Raw(String),
    /// An interned identifier.
    Ident(Name),
    /// A string literal, quoted on render.
    Str(String),
    /// `recv.member`.
    Member(Box<HostExpr>, String),
    /// `callee(args...)`.
    Call(Box<HostExpr>, Vec<HostExpr>),
    /// `callee<type_args...>(args...)`.
    GenericCall(Box<HostExpr>, Vec<String>, Vec<HostExpr>),
    /// `recv[index]`.
    Index(Box<HostExpr>, Box<HostExpr>),
    /// `(ty) expr`.
    Cast(String, Box<HostExpr>),
    /// `expr as ty`.
    AsCast(Box<HostExpr>, String),
    /// `ref expr` at an argument position.
    Ref(Box<HostExpr>),
    /// `(param) => body`.
    Lambda(String, Box<HostExpr>),
    /// `new ty(args...)`.
    New(String, Vec<HostExpr>),
}

impl HostExpr {
    /// A raw token expression.
    pub fn raw(token: impl Into<String>) -> Self {
        HostExpr::Raw(token.into())
    }

    /// A member access on this expression.
    pub fn member(self, name: impl Into<String>) -> Self {
        HostExpr::Member(Box::new(self), name.into())
    }

    /// A call with this expression as the callee.
    pub fn call(self, args: Vec<HostExpr>) -> Self {
        HostExpr::Call(Box::new(self), args)
    }

    /// A generic call with this expression as the callee.
    pub fn generic_call(self, type_args: Vec<String>, args: Vec<HostExpr>) -> Self {
        HostExpr::GenericCall(Box::new(self), type_args, args)
    }

    /// Render to host source text.
    pub fn render(&self, lookup: &impl StringLookup) -> String {
        let mut out = String::new();
        self.render_into(lookup, &mut out);
        out
    }

    fn render_into(&self, lookup: &impl StringLookup, out: &mut String) {
        match self {
            HostExpr::Raw(token) => out.push_str(token),
            HostExpr::Ident(name) => out.push_str(lookup.lookup(*name)),
            HostExpr::Str(s) => {
                out.push('"');
                out.push_str(s);
                out.push('"');
            }
            HostExpr::Member(recv, member) => {
                recv.render_into(lookup, out);
                out.push('.');
                out.push_str(member);
            }
            HostExpr::Call(callee, args) => {
                callee.render_into(lookup, out);
                render_args(lookup, args, out);
            }
            HostExpr::GenericCall(callee, type_args, args) => {
                callee.render_into(lookup, out);
                out.push('<');
                for (i, ty) in type_args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(ty);
                }
                out.push('>');
                render_args(lookup, args, out);
            }
            HostExpr::Index(recv, index) => {
                recv.render_into(lookup, out);
                out.push('[');
                index.render_into(lookup, out);
                out.push(']');
            }
            HostExpr::Cast(ty, expr) => {
                out.push('(');
                out.push_str(ty);
                out.push_str(") ");
                expr.render_into(lookup, out);
            }
            HostExpr::AsCast(expr, ty) => {
                expr.render_into(lookup, out);
                out.push_str(" as ");
                out.push_str(ty);
            }
            HostExpr::Ref(expr) => {
                out.push_str("ref ");
                expr.render_into(lookup, out);
            }
            HostExpr::Lambda(param, body) => {
                out.push('(');
                out.push_str(param);
                out.push_str(") => ");
                body.render_into(lookup, out);
            }
            HostExpr::New(ty, args) => {
                out.push_str("new ");
                out.push_str(ty);
                render_args(lookup, args, out);
            }
        }
    }
}

fn render_args(lookup: &impl StringLookup, args: &[HostExpr], out: &mut String) {
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        arg.render_into(lookup, out);
    }
    out.push(')');
}

/// A host-language statement in a synthesized body.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum HostStmt {
    /// `ty name;` or `ty name = init;`.
    Local {
        ty: String,
        name: String,
        init: Option<HostExpr>,
    },
    /// `target = value;`.
    Assign { target: HostExpr, value: HostExpr },
    /// A bare expression statement.
    Expr(HostExpr),
}

impl HostStmt {
    /// Render to one line of host source, without indentation.
    pub fn render(&self, lookup: &impl StringLookup) -> String {
        match self {
            HostStmt::Local { ty, name, init } => match init {
                None => format!("{ty} {name};"),
                Some(init) => format!("{ty} {name} = {};", init.render(lookup)),
            },
            HostStmt::Assign { target, value } => {
                format!("{} = {};", target.render(lookup), value.render(lookup))
            }
            HostStmt::Expr(expr) => format!("{};", expr.render(lookup)),
        }
    }
}
