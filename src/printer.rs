//! Renders declarations as gofmt-style text.
//!
//! Identifiers come out in the same order the annotator visits them. Bodies
//! are never printed; function literals show an elided body.
use std::fmt::Write as _;

use crate::ast::{ChanDir, Decl, Expr, Field, FuncDecl, FuncType, TypeSpec, ValueDecl, ValueSpec};

/// Comment closing a struct whose unexported fields were removed.
const FILTERED_FIELDS: &str = "// contains filtered or unexported fields";

/// Comment closing an interface whose unexported methods were removed.
const FILTERED_METHODS: &str = "// contains filtered or unexported methods";

/// Print a declaration.
pub fn print(decl: &Decl) -> String {
    let mut printer = Printer::default();
    match decl {
        Decl::Func(func) => printer.func_decl(func),
        Decl::Type(spec) => printer.type_spec(spec),
        Decl::Value(value) => printer.value_decl(value),
    }
    return printer.out;
}

/// Print a single expression on its own.
#[cfg(test)]
fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::default();
    printer.expr(expr);
    return printer.out;
}

/// Output buffer plus the current block depth.
#[derive(Debug, Default)]
struct Printer {
    /// Nesting depth of struct and interface bodies.
    depth: usize,
    /// Text so far.
    out: String,
}

impl Printer {
    /// Member block of a struct or interface type.
    fn block(&mut self, keyword: &str, members: &[Field], filtered: bool, methods: bool) {
        if members.is_empty() && !filtered {
            self.out.push_str(keyword);
            self.out.push_str("{}");
            return;
        }
        self.out.push_str(keyword);
        self.out.push_str(" {\n");
        self.depth = self.depth.saturating_add(1);
        for member in members {
            self.indent();
            if methods {
                self.method(member);
            } else {
                self.struct_field(member);
            }
            self.out.push('\n');
        }
        if filtered {
            self.indent();
            self.out.push_str(if methods { FILTERED_METHODS } else { FILTERED_FIELDS });
            self.out.push('\n');
        }
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push('}');
    }

    /// Trailing line comment.
    fn line_comment(&mut self, comment: Option<&str>) {
        if let Some(comment) = comment {
            let _ = write!(self.out, " // {comment}");
        }
    }

    /// Any expression.
    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::ArrayType { elem, len } => {
                self.out.push('[');
                if let Some(len) = len {
                    self.expr(len);
                }
                self.out.push(']');
                self.expr(elem);
            },
            Expr::BasicLit { value, .. } => self.out.push_str(value),
            Expr::Binary { left, op, right } => {
                self.expr(left);
                let _ = write!(self.out, " {op} ");
                self.expr(right);
            },
            Expr::Call { args, ellipsis, fun } => {
                self.expr(fun);
                self.out.push('(');
                self.list(args);
                if *ellipsis {
                    self.out.push_str("...");
                }
                self.out.push(')');
            },
            Expr::ChanType { dir, value } => {
                self.out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Recv => "<-chan ",
                    ChanDir::Send => "chan<- ",
                });
                self.expr(value);
            },
            Expr::Commented { comment, expr } => {
                let _ = write!(self.out, "/* {comment} */ ");
                self.expr(expr);
            },
            Expr::CompositeLit { elided, elts, ty } => {
                if let Some(ty) = ty {
                    self.expr(ty);
                }
                self.out.push('{');
                if let Some(count) = elided {
                    let _ = write!(self.out, "/* {count} elements not displayed */");
                } else {
                    self.list(elts);
                }
                self.out.push('}');
            },
            Expr::Ellipsis(elem) => {
                self.out.push_str("...");
                self.expr(elem);
            },
            Expr::FuncLit(ty) => {
                self.out.push_str("func");
                self.signature(ty);
                self.out.push_str(" { /* ... */ }");
            },
            Expr::FuncType(ty) => {
                self.out.push_str("func");
                self.signature(ty);
            },
            Expr::Ident(ident) => self.out.push_str(&ident.name),
            Expr::Index { indices, x } => {
                self.expr(x);
                self.out.push('[');
                self.list(indices);
                self.out.push(']');
            },
            Expr::InterfaceType { filtered, methods } => {
                self.block("interface", methods, *filtered, true);
            },
            Expr::KeyValue { key, value } => {
                self.expr(key);
                self.out.push_str(": ");
                self.expr(value);
            },
            Expr::MapType { key, value } => {
                self.out.push_str("map[");
                self.expr(key);
                self.out.push(']');
                self.expr(value);
            },
            Expr::Paren(x) => {
                self.out.push('(');
                self.expr(x);
                self.out.push(')');
            },
            Expr::Selector { sel, x, .. } => {
                self.expr(x);
                self.out.push('.');
                self.out.push_str(&sel.name);
            },
            Expr::Star(x) => {
                self.out.push('*');
                self.expr(x);
            },
            Expr::StructType { fields, filtered } => {
                self.block("struct", fields, *filtered, false);
            },
            Expr::Unary { op, x } => {
                self.out.push_str(op);
                self.expr(x);
            },
            Expr::Verbatim { text, .. } => self.out.push_str(text),
        }
    }

    /// Comma-separated field list: `a, b int, c string`.
    fn fields(&mut self, fields: &[Field]) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.names(field);
            self.expr(&field.ty);
        }
    }

    /// `func (recv) Name[T any](params) results`
    fn func_decl(&mut self, func: &FuncDecl) {
        self.out.push_str("func ");
        if let Some(recv) = &func.recv {
            self.out.push('(');
            self.fields(std::slice::from_ref(recv));
            self.out.push_str(") ");
        }
        self.out.push_str(&func.name.name);
        self.signature(&func.ty);
    }

    /// Tabs for the current depth.
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }

    /// Comma-separated expressions.
    fn list(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(expr);
        }
    }

    /// Interface member: a method signature or an embedded type.
    fn method(&mut self, member: &Field) {
        match (member.names.first(), &member.ty) {
            (Some(name), Expr::FuncType(ty)) => {
                self.out.push_str(&name.name);
                self.signature(ty);
            },
            _ => {
                self.names(member);
                self.expr(&member.ty);
            },
        }
        self.line_comment(member.comment.as_deref());
    }

    /// Field names followed by a separating space.
    fn names(&mut self, field: &Field) {
        if field.names.is_empty() {
            return;
        }
        let names: Vec<&str> = field.names.iter().map(|n| return n.name.as_str()).collect();
        self.out.push_str(&names.join(", "));
        self.out.push(' ');
    }

    /// `[T any](params) results`
    fn signature(&mut self, ty: &FuncType) {
        if !ty.type_params.is_empty() {
            self.out.push('[');
            self.fields(&ty.type_params);
            self.out.push(']');
        }
        self.out.push('(');
        self.fields(&ty.params);
        self.out.push(')');
        match ty.results.as_slice() {
            [] => {},
            [single] if single.names.is_empty() => {
                self.out.push(' ');
                self.expr(&single.ty);
            },
            results => {
                self.out.push_str(" (");
                self.fields(results);
                self.out.push(')');
            },
        }
    }

    /// Struct field with its tag and comment.
    fn struct_field(&mut self, field: &Field) {
        self.names(field);
        self.expr(&field.ty);
        if let Some(tag) = &field.tag {
            self.out.push(' ');
            self.out.push_str(tag);
        }
        self.line_comment(field.comment.as_deref());
    }

    /// `type Name[T any] Type` or `type Name = Type`.
    fn type_spec(&mut self, spec: &TypeSpec) {
        self.out.push_str("type ");
        self.out.push_str(&spec.name.name);
        if !spec.type_params.is_empty() {
            self.out.push('[');
            self.fields(&spec.type_params);
            self.out.push(']');
        }
        self.out.push_str(if spec.alias { " = " } else { " " });
        self.expr(&spec.ty);
    }

    /// `const X = 1` or a parenthesized group.
    fn value_decl(&mut self, decl: &ValueDecl) {
        self.out.push_str(decl.kind.keyword());
        if !decl.grouped && decl.specs.len() == 1 {
            self.out.push(' ');
            if let Some(spec) = decl.specs.first() {
                self.value_spec(spec);
            }
            return;
        }
        self.out.push_str(" (\n");
        self.depth = self.depth.saturating_add(1);
        for spec in &decl.specs {
            self.indent();
            self.value_spec(spec);
            self.out.push('\n');
        }
        self.depth = self.depth.saturating_sub(1);
        self.out.push(')');
    }

    /// `A, B T = x, y // comment`
    fn value_spec(&mut self, spec: &ValueSpec) {
        let names: Vec<&str> = spec.names.iter().map(|n| return n.name.as_str()).collect();
        self.out.push_str(&names.join(", "));
        if let Some(ty) = &spec.ty {
            self.out.push(' ');
            self.expr(ty);
        }
        if !spec.values.is_empty() {
            self.out.push_str(" = ");
            self.list(&spec.values);
        }
        self.line_comment(spec.comment.as_deref());
    }
}
