//! Per-identifier annotations for a declaration.
//!
//! The walk visits identifiers in exactly the order the printer writes them, so
//! the n-th annotation belongs to the n-th identifier token of the printed
//! text. Oversized literals are elided in place before printing.
use crate::ast::{Decl, Expr, Field, FuncDecl, FuncType, Ident, LitKind, Resolution, TypeSpec, ValueDecl};

/// The blank identifier.
const BLANK: &str = "_";

/// Import path of the pseudo-package used for C interop. Never linked.
pub const CGO_PATH: &str = "C";

/// Page that documents predeclared identifiers.
pub const BUILTIN_PATH: &str = "builtin";

/// Composite literals with more elements than this lose their elements.
const MAX_ELEMENTS: usize = 100;

/// String literals longer than this (in bytes, quotes included) are elided.
const MAX_STRING_LITERAL: usize = 128;

/// How one identifier token is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// A declared name: registered as an anchor, linked to its definition.
    Anchor {
        /// Enclosing type for members, such as `T` in `T.M`.
        qualifier: Option<String>,
        /// Definition position in source.
        source: Option<crate::ast::SourcePos>,
    },
    /// Second token of a merged `pkg.Name` link.
    EndLink(String),
    /// Rendered as plain text.
    Ignore,
    /// A link to the anchor named by the token in the given package page.
    /// An empty path means the current page.
    Link(String),
    /// A link to the top of a package page.
    PackageLink(String),
    /// First token of a merged `pkg.Name` link.
    StartLink(String),
}

/// Classification of predeclared identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predeclared {
    /// `true`, `nil`, `iota`, ...
    Constant,
    /// `len`, `make`, `panic`, ...
    Function,
    /// `int`, `string`, `error`, ...
    Type,
}

/// Look up a predeclared identifier.
pub fn predeclared(name: &str) -> Option<Predeclared> {
    return match name {
        "any" | "bool" | "byte" | "comparable" | "complex64" | "complex128" | "error"
        | "float32" | "float64" | "int" | "int8" | "int16" | "int32" | "int64" | "rune"
        | "string" | "uint" | "uint8" | "uint16" | "uint32" | "uint64" | "uintptr" => {
            Some(Predeclared::Type)
        },
        "false" | "iota" | "nil" | "true" => Some(Predeclared::Constant),
        "append" | "cap" | "clear" | "close" | "complex" | "copy" | "delete" | "imag"
        | "len" | "make" | "max" | "min" | "new" | "panic" | "print" | "println" | "real"
        | "recover" => Some(Predeclared::Function),
        _ => None,
    };
}

/// Annotate `decl`, eliding oversized literals in place.
pub fn annotate(decl: &mut Decl) -> Vec<Annotation> {
    let mut walker = Annotator::default();
    match decl {
        Decl::Func(func) => walker.func_decl(func),
        Decl::Type(spec) => walker.type_spec(spec),
        Decl::Value(value) => walker.value_decl(value),
    }
    return walker.annotations;
}

/// Accumulates annotations during the walk.
#[derive(Debug, Default)]
struct Annotator {
    /// Annotations in token order.
    annotations: Vec<Annotation>,
}

impl Annotator {
    /// Anchor at a declared name.
    fn anchor(&mut self, name: &Ident, qualifier: Option<&str>) {
        self.annotations.push(Annotation::Anchor {
            qualifier: qualifier.map(str::to_string),
            source: name.pos.clone(),
        });
    }

    /// Walk an expression.
    fn expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::BasicLit {
                kind: LitKind::String,
                value,
            } if value.len() > MAX_STRING_LITERAL => {
                let len = value.len();
                *expr = Expr::Commented {
                    comment: format!("{len} byte string literal not displayed"),
                    expr: Box::new(Expr::BasicLit {
                        kind: LitKind::String,
                        value: "\"\"".to_string(),
                    }),
                };
            },
            Expr::BasicLit { .. } => {},
            Expr::ArrayType { elem, len } => {
                if let Some(len) = len {
                    self.expr(len);
                }
                self.expr(elem);
            },
            Expr::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            },
            Expr::Call { fun, args, .. } => {
                self.expr(fun);
                for arg in args {
                    self.expr(arg);
                }
            },
            Expr::ChanType { value, .. } => self.expr(value),
            Expr::Commented { expr, .. } => self.expr(expr),
            Expr::CompositeLit { elided, elts, ty } => {
                if let Some(ty) = ty {
                    self.expr(ty);
                }
                if elts.len() > MAX_ELEMENTS {
                    *elided = Some(elts.len());
                    elts.clear();
                }
                for elt in elts {
                    self.expr(elt);
                }
            },
            Expr::Ellipsis(elem) => self.expr(elem),
            Expr::FuncLit(ty) | Expr::FuncType(ty) => self.func_type(ty),
            Expr::Ident(ident) => self.ident(ident),
            Expr::Index { x, indices } => {
                self.expr(x);
                for index in indices {
                    self.expr(index);
                }
            },
            Expr::InterfaceType { methods, .. } => self.fields(methods),
            Expr::KeyValue { key, value } | Expr::MapType { key, value } => {
                self.expr(key);
                self.expr(value);
            },
            Expr::Paren(x) | Expr::Star(x) | Expr::Unary { x, .. } => self.expr(x),
            Expr::Selector { adjacent, sel: _, x } => self.selector(x, *adjacent),
            Expr::StructType { fields, .. } => self.fields(fields),
            Expr::Verbatim { idents, .. } => self.ignore(*idents),
        }
    }

    /// Field, parameter and result lists: names never link.
    fn fields(&mut self, fields: &mut [Field]) {
        for field in fields {
            self.ignore(field.names.len());
            self.expr(&mut field.ty);
        }
    }

    /// Functions and methods.
    fn func_decl(&mut self, func: &mut FuncDecl) {
        match &func.recv {
            None => self.anchor(&func.name, None),
            Some(recv) => {
                self.ignore(recv.names.len());
                self.ignore_all(&recv.ty);
                match receiver_base(&recv.ty) {
                    Some(base) => self.anchor(&func.name, Some(&base)),
                    None => self.ignore(1),
                }
            },
        }
        self.func_type(&mut func.ty);
    }

    /// Signature parts in print order.
    fn func_type(&mut self, ty: &mut FuncType) {
        self.fields(&mut ty.type_params);
        self.fields(&mut ty.params);
        self.fields(&mut ty.results);
    }

    /// A bare name reference.
    fn ident(&mut self, ident: &Ident) {
        let annotation = match ident.resolution {
            Resolution::Unresolved if predeclared(&ident.name).is_some() => {
                Annotation::Link(BUILTIN_PATH.to_string())
            },
            Resolution::PackageLevel if ident.is_exported() => Annotation::Link(String::new()),
            _ => Annotation::Ignore,
        };
        self.annotations.push(annotation);
    }

    /// Emit `count` ignores.
    fn ignore(&mut self, count: usize) {
        self.annotations.extend(std::iter::repeat_n(Annotation::Ignore, count));
    }

    /// Ignore every identifier of an expression, in print order.
    fn ignore_all(&mut self, expr: &Expr) {
        match expr {
            Expr::BasicLit { .. } => {},
            Expr::Ident(_) => self.ignore(1),
            Expr::Selector { x, .. } => {
                self.ignore_all(x);
                self.ignore(1);
            },
            Expr::ArrayType { elem, len } => {
                if let Some(len) = len {
                    self.ignore_all(len);
                }
                self.ignore_all(elem);
            },
            Expr::Binary { left, right, .. }
            | Expr::KeyValue { key: left, value: right }
            | Expr::MapType { key: left, value: right } => {
                self.ignore_all(left);
                self.ignore_all(right);
            },
            Expr::Call { fun, args, .. } => {
                self.ignore_all(fun);
                for arg in args {
                    self.ignore_all(arg);
                }
            },
            Expr::Index { x, indices } => {
                self.ignore_all(x);
                for index in indices {
                    self.ignore_all(index);
                }
            },
            Expr::ChanType { value: x, .. }
            | Expr::Commented { expr: x, .. }
            | Expr::Ellipsis(x)
            | Expr::Paren(x)
            | Expr::Star(x)
            | Expr::Unary { x, .. } => self.ignore_all(x),
            Expr::CompositeLit { elts, ty, .. } => {
                if let Some(ty) = ty {
                    self.ignore_all(ty);
                }
                for elt in elts {
                    self.ignore_all(elt);
                }
            },
            Expr::FuncLit(ty) | Expr::FuncType(ty) => {
                for field in ty.type_params.iter().chain(&ty.params).chain(&ty.results) {
                    self.ignore_field(field);
                }
            },
            Expr::InterfaceType { methods: fields, .. } | Expr::StructType { fields, .. } => {
                for field in fields {
                    self.ignore_field(field);
                }
            },
            Expr::Verbatim { idents, .. } => self.ignore(*idents),
        }
    }

    /// Ignore a field's names and type.
    fn ignore_field(&mut self, field: &Field) {
        self.ignore(field.names.len());
        self.ignore_all(&field.ty);
    }

    /// `x.sel`: package-qualified references link to the package page.
    fn selector(&mut self, x: &mut Expr, adjacent: bool) {
        if let Expr::Ident(Ident {
            resolution: Resolution::Import(path),
            ..
        }) = x
        {
            if path == CGO_PATH {
                self.ignore(2);
            } else if adjacent {
                self.annotations.push(Annotation::StartLink(path.clone()));
                self.annotations.push(Annotation::EndLink(path.clone()));
            } else {
                self.annotations.push(Annotation::PackageLink(path.clone()));
                self.annotations.push(Annotation::Link(path.clone()));
            }
            return;
        }
        self.expr(x);
        self.ignore(1);
    }

    /// Named types: the name and struct/interface members are anchors.
    fn type_spec(&mut self, spec: &mut TypeSpec) {
        self.anchor(&spec.name, None);
        self.fields(&mut spec.type_params);
        let qualifier = spec.name.name.as_str();
        match &mut spec.ty {
            Expr::InterfaceType { methods: members, .. }
            | Expr::StructType { fields: members, .. } => {
                for member in members {
                    for name in &member.names {
                        self.annotations.push(Annotation::Anchor {
                            qualifier: Some(qualifier.to_string()),
                            source: name.pos.clone(),
                        });
                    }
                    self.expr(&mut member.ty);
                }
            },
            other => self.expr(other),
        }
    }

    /// Constants and variables: every declared name is an anchor.
    fn value_decl(&mut self, decl: &mut ValueDecl) {
        for spec in &mut decl.specs {
            for name in &spec.names {
                if name.name == BLANK {
                    self.annotations.push(Annotation::Ignore);
                } else {
                    self.anchor(name, None);
                }
            }
            if let Some(ty) = &mut spec.ty {
                self.expr(ty);
            }
            for value in &mut spec.values {
                self.expr(value);
            }
        }
    }
}

/// Base type name of a receiver: `T` for `T`, `*T`, `T[K]` and `*T[K]`.
pub fn receiver_base(ty: &Expr) -> Option<String> {
    return match ty {
        Expr::Ident(ident) => Some(ident.name.clone()),
        Expr::Index { x, .. } | Expr::Paren(x) | Expr::Star(x) => receiver_base(x),
        _ => None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{SourcePos, ValueKind, ValueSpec};

    fn at(line: u32, col: u32) -> Option<SourcePos> {
        Some(SourcePos { col, file: "t.go".into(), line })
    }

    fn named(name: &str, line: u32, col: u32) -> Ident {
        Ident { name: name.to_string(), pos: at(line, col), resolution: Resolution::Local }
    }

    fn field(names: &[&str], ty: Expr) -> Field {
        Field {
            comment: None,
            names: names.iter().map(|n| Ident::new(n, Resolution::Local)).collect(),
            tag: None,
            ty,
        }
    }

    #[test]
    fn method_anchor_is_qualified_by_receiver() {
        let mut decl = Decl::Func(FuncDecl {
            name: named("M", 3, 13),
            recv: Some(field(
                &["t"],
                Expr::Star(Box::new(Expr::ident("T", Resolution::PackageLevel))),
            )),
            ty: FuncType {
                results: vec![Field::anonymous(Expr::ident("int", Resolution::Unresolved))],
                ..FuncType::default()
            },
        });
        let annotations = annotate(&mut decl);
        assert_eq!(
            annotations,
            vec![
                Annotation::Ignore,
                Annotation::Ignore,
                Annotation::Anchor { qualifier: Some("T".to_string()), source: at(3, 13) },
                Annotation::Link(BUILTIN_PATH.to_string()),
            ]
        );
    }

    #[test]
    fn qualified_reference_splits_on_separated_dot() {
        let sel = |adjacent| Expr::Selector {
            adjacent,
            sel: Ident::new("Println", Resolution::Unresolved),
            x: Box::new(Expr::ident("fmt", Resolution::Import("fmt".to_string()))),
        };
        let mut walker = Annotator::default();
        walker.expr(&mut sel(false));
        walker.expr(&mut sel(true));
        assert_eq!(
            walker.annotations,
            vec![
                Annotation::PackageLink("fmt".to_string()),
                Annotation::Link("fmt".to_string()),
                Annotation::StartLink("fmt".to_string()),
                Annotation::EndLink("fmt".to_string()),
            ]
        );
    }

    #[test]
    fn cgo_references_are_ignored() {
        let mut expr = Expr::Selector {
            adjacent: true,
            sel: Ident::new("int", Resolution::Unresolved),
            x: Box::new(Expr::ident("C", Resolution::Import("C".to_string()))),
        };
        let mut walker = Annotator::default();
        walker.expr(&mut expr);
        assert_eq!(walker.annotations, vec![Annotation::Ignore, Annotation::Ignore]);
    }

    #[test]
    fn unexported_and_local_names_do_not_link() {
        let mut walker = Annotator::default();
        walker.expr(&mut Expr::ident("helper", Resolution::PackageLevel));
        walker.expr(&mut Expr::ident("Param", Resolution::Local));
        walker.expr(&mut Expr::ident("Exported", Resolution::PackageLevel));
        walker.expr(&mut Expr::ident("len", Resolution::Local));
        assert_eq!(
            walker.annotations,
            vec![
                Annotation::Ignore,
                Annotation::Ignore,
                Annotation::Link(String::new()),
                Annotation::Ignore,
            ]
        );
    }

    #[test]
    fn struct_fields_become_qualified_anchors() {
        let mut decl = Decl::Type(TypeSpec {
            alias: false,
            name: named("Point", 1, 6),
            ty: Expr::StructType {
                fields: vec![Field {
                    comment: None,
                    names: vec![named("X", 2, 2), named("Y", 2, 5)],
                    tag: None,
                    ty: Expr::ident("int", Resolution::Unresolved),
                }],
                filtered: false,
            },
            type_params: Vec::new(),
        });
        let annotations = annotate(&mut decl);
        assert_eq!(annotations.len(), 4);
        assert_eq!(
            annotations[1],
            Annotation::Anchor { qualifier: Some("Point".to_string()), source: at(2, 2) }
        );
    }

    #[test]
    fn long_string_literal_is_elided() {
        let long = format!("\"{}\"", "x".repeat(200));
        let mut decl = Decl::Value(ValueDecl {
            grouped: false,
            kind: ValueKind::Const,
            specs: vec![ValueSpec {
                comment: None,
                names: vec![named("Blob", 1, 7)],
                ty: None,
                values: vec![Expr::BasicLit { kind: LitKind::String, value: long }],
            }],
        });
        let annotations = annotate(&mut decl);
        assert_eq!(annotations.len(), 1);
        let Decl::Value(value) = &decl else { unreachable!() };
        assert_eq!(
            value.specs[0].values[0],
            Expr::Commented {
                comment: "202 byte string literal not displayed".to_string(),
                expr: Box::new(Expr::BasicLit { kind: LitKind::String, value: "\"\"".to_string() }),
            }
        );
    }

    #[test]
    fn blank_value_names_are_not_anchors() {
        let mut decl = Decl::Value(ValueDecl {
            grouped: false,
            kind: ValueKind::Var,
            specs: vec![ValueSpec {
                comment: None,
                names: vec![named("A", 1, 5), named("_", 1, 8)],
                ty: None,
                values: Vec::new(),
            }],
        });
        assert_eq!(
            annotate(&mut decl),
            vec![Annotation::Anchor { qualifier: None, source: at(1, 5) }, Annotation::Ignore]
        );
    }

    #[test]
    fn large_composite_keeps_only_its_type() {
        let elts = (0..150)
            .map(|i| Expr::ident(&format!("v{i}"), Resolution::Unresolved))
            .collect();
        let mut expr = Expr::CompositeLit {
            elided: None,
            elts,
            ty: Some(Box::new(Expr::ArrayType {
                elem: Box::new(Expr::ident("string", Resolution::Unresolved)),
                len: None,
            })),
        };
        let mut walker = Annotator::default();
        walker.expr(&mut expr);
        assert_eq!(walker.annotations, vec![Annotation::Link(BUILTIN_PATH.to_string())]);
        let Expr::CompositeLit { elided, elts, .. } = &expr else { unreachable!() };
        assert_eq!(*elided, Some(150));
        assert!(elts.is_empty());
    }

    #[test]
    fn counts_identifiers_of_a_receiver_type() {
        let ty = Expr::Star(Box::new(Expr::Index {
            indices: vec![Expr::ident("K", Resolution::Local), Expr::ident("V", Resolution::Local)],
            x: Box::new(Expr::ident("Map", Resolution::PackageLevel)),
        }));
        let mut walker = Annotator::default();
        walker.ignore_all(&ty);
        assert_eq!(walker.annotations.len(), 3);
        assert_eq!(receiver_base(&ty), Some("Map".to_string()));
    }
}
