//! Statement and expression nodes for generated wrappers.
//!
//! The synthesizer assembles a [`FuncDecl`] out of typed nodes, including
//! explicit [`Stmt::Blank`] separators, and [`FuncDecl::render`] prints it
//! in gofmt layout: tab indentation, no blank line at the start or end of a
//! block and no run of blank lines.

use std::fmt;
use std::fmt::Write as _;

/// A type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoType {
    /// Named type, possibly package-qualified (`uint32`, `C.uint`, `time.Time`).
    Named(String),
    /// `*T`
    Pointer(Box<GoType>),
    /// `[]T`
    Slice(Box<GoType>),
}

impl GoType {
    pub fn named(name: impl Into<String>) -> Self {
        GoType::Named(name.into())
    }

    /// Type from the cgo pseudo-package (`C.name`).
    pub fn cgo(name: &str) -> Self {
        GoType::Named(format!("C.{name}"))
    }

    pub fn pointer_to(self) -> Self {
        GoType::Pointer(Box::new(self))
    }

    pub fn slice_of(self) -> Self {
        GoType::Slice(Box::new(self))
    }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoType::Named(name) => write!(f, "{name}"),
            GoType::Pointer(inner) => write!(f, "*{inner}"),
            GoType::Slice(inner) => write!(f, "[]{inner}"),
        }
    }
}

/// Binary operators used in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Ne,
    Gt,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinOp::Ne => write!(f, "!="),
            BinOp::Gt => write!(f, ">"),
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    Int(i64),
    /// `x.sel`
    Selector(Box<Expr>, String),
    /// `f(args...)`
    Call(Box<Expr>, Vec<Expr>),
    /// `T{elems...}`
    Composite(String, Vec<Expr>),
    /// `&x`
    AddrOf(Box<Expr>),
    /// `x[i]`
    Index(Box<Expr>, Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
    /// A type used in expression position (e.g. the first argument of `make`).
    Type(GoType),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// Member of the cgo pseudo-package (`C.name`).
    pub fn cgo(name: &str) -> Self {
        Expr::ident("C").field(name)
    }

    /// Conversion or call of a named function: `name(arg)`.
    pub fn cast(name: &str, arg: Expr) -> Self {
        Expr::ident(name).call(vec![arg])
    }

    /// Conversion through the cgo pseudo-package: `C.name(arg)`.
    pub fn cgo_cast(name: &str, arg: Expr) -> Self {
        Expr::cgo(name).call(vec![arg])
    }

    /// `len(name)`
    pub fn len_of(name: &str) -> Self {
        Expr::cast("len", Expr::ident(name))
    }

    pub fn field(self, sel: impl Into<String>) -> Self {
        Expr::Selector(Box::new(self), sel.into())
    }

    pub fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call(Box::new(self), args)
    }

    /// Method call without arguments: `x.method()`.
    pub fn method(self, name: &str) -> Self {
        self.field(name).call(Vec::new())
    }

    pub fn addr(self) -> Self {
        Expr::AddrOf(Box::new(self))
    }

    pub fn index(self, index: Expr) -> Self {
        Expr::Index(Box::new(self), Box::new(index))
    }

    pub fn binary(self, op: BinOp, rhs: Expr) -> Self {
        Expr::Binary(Box::new(self), op, Box::new(rhs))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{name}"),
            Expr::Int(v) => write!(f, "{v}"),
            Expr::Selector(x, sel) => write!(f, "{x}.{sel}"),
            Expr::Call(func, args) => {
                write!(f, "{func}(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Expr::Composite(ty, elems) => {
                write!(f, "{ty}{{")?;
                write_list(f, elems)?;
                write!(f, "}}")
            }
            Expr::AddrOf(x) => write!(f, "&{x}"),
            Expr::Index(x, i) => write!(f, "{x}[{i}]"),
            Expr::Binary(l, op, r) => write!(f, "{l} {op} {r}"),
            Expr::Type(ty) => write!(f, "{ty}"),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `name := value`
    Define(String, Expr),
    /// `target = value`
    Assign(Expr, Expr),
    /// `var name T`
    Var(String, GoType),
    /// `defer call`
    Defer(Expr),
    /// Expression statement.
    Expr(Expr),
    /// `if cond { body }`
    If(Expr, Vec<Stmt>),
    /// `for key := range over { body }`
    Range {
        key: String,
        over: Expr,
        body: Vec<Stmt>,
    },
    /// `return results...`
    Return(Vec<Expr>),
    /// Empty separator line.
    Blank,
}

/// A parameter, receiver or result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Option<String>,
    pub ty: GoType,
}

impl Field {
    pub fn named(name: impl Into<String>, ty: GoType) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    pub fn unnamed(ty: GoType) -> Self {
        Self { name: None, ty }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} {}", self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}

/// A complete function declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub doc: Option<String>,
    pub receiver: Option<Field>,
    pub name: String,
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    pub body: Vec<Stmt>,
}

impl FuncDecl {
    /// Render the declaration as source text, ending in a newline.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(doc) = &self.doc {
            out.push_str(&doc_comment(doc));
        }

        out.push_str("func ");
        if let Some(receiver) = &self.receiver {
            out.push_str(&format!("({receiver}) "));
        }
        let params: Vec<String> = self.params.iter().map(Field::to_string).collect();
        out.push_str(&format!("{}({})", self.name, params.join(", ")));

        match self.results.as_slice() {
            [] => {}
            [single] if single.name.is_none() => {
                out.push_str(&format!(" {single}"));
            }
            results => {
                let results: Vec<String> = results.iter().map(Field::to_string).collect();
                out.push_str(&format!(" ({})", results.join(", ")));
            }
        }

        out.push_str(" {\n");
        write_block(&mut out, &self.body, 1);
        out.push_str("}\n");
        out
    }
}

/// Format documentation text as line comments.
pub fn doc_comment(doc: &str) -> String {
    let mut out = String::new();
    for line in doc.trim_end().lines() {
        let line = line.trim_end();
        if line.starts_with("//") {
            out.push_str(line);
        } else if line.is_empty() {
            out.push_str("//");
        } else {
            out.push_str(&format!("// {line}"));
        }
        out.push('\n');
    }
    out
}

fn write_block(out: &mut String, stmts: &[Stmt], depth: usize) {
    let mut pending_blank = false;
    let mut wrote_any = false;

    for stmt in stmts {
        if matches!(stmt, Stmt::Blank) {
            pending_blank = wrote_any;
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        write_stmt(out, stmt, depth);
        wrote_any = true;
    }
}

fn write_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    let indent = "\t".repeat(depth);
    let _ = match stmt {
        Stmt::Define(name, value) => writeln!(out, "{indent}{name} := {value}"),
        Stmt::Assign(target, value) => writeln!(out, "{indent}{target} = {value}"),
        Stmt::Var(name, ty) => writeln!(out, "{indent}var {name} {ty}"),
        Stmt::Defer(call) => writeln!(out, "{indent}defer {call}"),
        Stmt::Expr(expr) => writeln!(out, "{indent}{expr}"),
        Stmt::If(cond, body) => {
            out.push_str(&format!("{indent}if {cond} {{\n"));
            write_block(out, body, depth + 1);
            writeln!(out, "{indent}}}")
        }
        Stmt::Range { key, over, body } => {
            out.push_str(&format!("{indent}for {key} := range {over} {{\n"));
            write_block(out, body, depth + 1);
            writeln!(out, "{indent}}}")
        }
        Stmt::Return(results) if results.is_empty() => writeln!(out, "{indent}return"),
        Stmt::Return(results) => {
            let results: Vec<String> = results.iter().map(Expr::to_string).collect();
            writeln!(out, "{indent}return {}", results.join(", "))
        }
        Stmt::Blank => Ok(()),
    };
}
