//! Conversion of tree-sitter-go syntax trees into the declaration model.
//!
//! Only exported top-level declarations are converted. Function bodies are
//! skipped entirely. Expression forms the model has no variant for are kept
//! as verbatim text together with their identifier count.
use std::collections::{HashMap, HashSet};
use std::path::Path;

use tree_sitter::Node;

use crate::annotate;
use crate::ast::{
    ChanDir, Expr, Field, FuncDecl, FuncType, Ident, LitKind, Resolution, SourcePos, TypeSpec,
    ValueDecl, ValueKind, ValueSpec, is_exported,
};
use crate::tokens;

/// Import name → import path, for one file.
pub type Imports = HashMap<String, String>;

/// A declaration with the doc comment written above it.
#[derive(Debug, Clone)]
pub struct Documented<T> {
    /// The declaration.
    pub decl: T,
    /// Doc comment text, comment markers removed.
    pub doc: String,
}

/// One `import` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit local name, including `_` and `.`.
    pub name: Option<String>,
    /// Import path without quotes.
    pub path: String,
}

/// Exported declarations of one file.
#[derive(Debug, Default)]
pub struct FileDecls {
    /// Constant declarations.
    pub consts: Vec<Documented<ValueDecl>>,
    /// Functions without a receiver.
    pub funcs: Vec<Documented<FuncDecl>>,
    /// Methods, keyed by receiver base type name.
    pub methods: Vec<(String, Documented<FuncDecl>)>,
    /// Type declarations.
    pub types: Vec<Documented<TypeSpec>>,
    /// Variable declarations.
    pub vars: Vec<Documented<ValueDecl>>,
}

// ── File-level queries ─────────────────────────────────────────────────

/// Text of a node.
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    return node.utf8_text(source.as_bytes()).unwrap_or_default();
}

/// Non-comment named children.
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    return node
        .named_children(&mut cursor)
        .filter(|c| return c.kind() != "comment")
        .collect();
}

/// All children stored under `field`.
fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    return node.children_by_field_name(field, &mut cursor).filter(|c| return c.is_named()).collect();
}

/// Whether `node` has a direct child token of the given kind.
fn has_token(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    return node.children(&mut cursor).any(|c| return c.kind() == kind);
}

/// Package name from the `package` clause.
pub fn package_name(root: Node<'_>, source: &str) -> Option<String> {
    let clause = named_children(root).into_iter().find(|n| return n.kind() == "package_clause")?;
    let name = named_children(clause).into_iter().next()?;
    return Some(node_text(name, source).to_string());
}

/// Doc comment above the `package` clause.
pub fn package_doc(root: Node<'_>, source: &str) -> String {
    let mut cursor = root.walk();
    let clause = root.children(&mut cursor).find(|n| return n.kind() == "package_clause");
    return clause.map(|c| return doc_comment(c, source)).unwrap_or_default();
}

/// Imports of a file in source order.
pub fn imports(root: Node<'_>, source: &str) -> Vec<ImportSpec> {
    let mut specs = Vec::new();
    for decl in named_children(root) {
        if decl.kind() != "import_declaration" {
            continue;
        }
        for child in named_children(decl) {
            let list = if child.kind() == "import_spec_list" { named_children(child) } else { vec![child] };
            for spec in list.into_iter().filter(|s| return s.kind() == "import_spec") {
                let Some(path) = spec.child_by_field_name("path") else {
                    continue;
                };
                specs.push(ImportSpec {
                    name: spec
                        .child_by_field_name("name")
                        .map(|n| return node_text(n, source).to_string()),
                    path: node_text(path, source).trim_matches(['"', '`']).to_string(),
                });
            }
        }
    }
    return specs;
}

/// Local name → path for the imports a declaration can refer to.
pub fn import_scope(specs: &[ImportSpec]) -> Imports {
    let mut scope = Imports::new();
    for spec in specs {
        let name = match spec.name.as_deref() {
            Some("_" | ".") => continue,
            Some(name) => name.to_string(),
            None => default_import_name(&spec.path),
        };
        scope.insert(name, spec.path.clone());
    }
    return scope;
}

/// Name a package is referred to by when imported without a local name:
/// the last path element, skipping a major version suffix.
pub fn default_import_name(path: &str) -> String {
    let mut parts = path.rsplit('/');
    let last = parts.next().unwrap_or(path);
    let is_version = last.len() > 1
        && last.starts_with('v')
        && last.chars().skip(1).all(|c| return c.is_ascii_digit());
    let base = if is_version { parts.next().unwrap_or(last) } else { last };
    let base = base.strip_prefix("go-").unwrap_or(base);
    let base = base.split('.').next().unwrap_or(base);
    return base.replace('-', "_");
}

/// Record every package-level name declared in a file, exported or not.
pub fn collect_package_names(root: Node<'_>, source: &str, names: &mut HashSet<String>) {
    for decl in named_children(root) {
        match decl.kind() {
            "function_declaration" => {
                if let Some(name) = decl.child_by_field_name("name") {
                    names.insert(node_text(name, source).to_string());
                }
            },
            "const_declaration" | "type_declaration" | "var_declaration" => {
                for spec in specs_of(decl) {
                    for name in field_children(spec, "name") {
                        names.insert(node_text(name, source).to_string());
                    }
                }
            },
            _ => {},
        }
    }
}

/// Spec nodes of a `const`, `type` or `var` declaration.
fn specs_of(decl: Node<'_>) -> Vec<Node<'_>> {
    let mut specs = Vec::new();
    for child in named_children(decl) {
        match child.kind() {
            "const_spec" | "type_alias" | "type_spec" | "var_spec" => specs.push(child),
            "var_spec_list" => specs.extend(
                named_children(child).into_iter().filter(|s| return s.kind() == "var_spec"),
            ),
            _ => {},
        }
    }
    return specs;
}

// ── Comments ───────────────────────────────────────────────────────────

/// Strip comment markers from one comment token.
pub fn clean_comment(raw: &str) -> String {
    if let Some(body) = raw.strip_prefix("//") {
        return body.strip_prefix(' ').unwrap_or(body).trim_end().to_string();
    }
    if let Some(body) = raw.strip_prefix("/*").and_then(|b| return b.strip_suffix("*/")) {
        let lines: Vec<&str> = body
            .trim_matches('\n')
            .lines()
            .map(|l| return l.trim_start().trim_start_matches('*').trim_start().trim_end())
            .collect();
        return lines.join("\n").trim().to_string();
    }
    return raw.to_string();
}

/// Whether a comment is a tool directive rather than documentation.
fn is_directive(raw: &str) -> bool {
    return raw.starts_with("//go:") || raw.starts_with("//+build") || raw.starts_with("//line ");
}

/// The block of comments ending on the line right above `node`.
pub fn doc_comment(node: Node<'_>, source: &str) -> String {
    let mut parts = Vec::new();
    let mut next_row = node.start_position().row;
    let mut current = node.prev_sibling();
    while let Some(comment) = current {
        if comment.kind() != "comment" || comment.end_position().row.saturating_add(1) != next_row {
            break;
        }
        let trailing = comment.prev_sibling().is_some_and(|prev| {
            return prev.kind() != "comment"
                && prev.end_position().row == comment.start_position().row;
        });
        if trailing {
            break;
        }
        let raw = node_text(comment, source);
        if !is_directive(raw) {
            parts.push(clean_comment(raw));
        }
        next_row = comment.start_position().row;
        current = comment.prev_sibling();
    }
    parts.reverse();
    return parts.join("\n").trim().to_string();
}

/// A comment following `node` on the line it ends on.
fn trailing_comment(node: Node<'_>, source: &str) -> Option<String> {
    let next = node.next_sibling()?;
    if next.kind() != "comment" || next.start_position().row != node.end_position().row {
        return None;
    }
    return Some(clean_comment(node_text(next, source)));
}

// ── Declarations ───────────────────────────────────────────────────────

/// Converts the declarations of one file.
pub struct Converter<'s> {
    /// File being converted.
    file: &'s Path,
    /// Imports visible in the file.
    imports: &'s Imports,
    /// Names scoped to the declaration being converted.
    locals: HashSet<String>,
    /// Every package-level name of the package.
    package_names: &'s HashSet<String>,
    /// File text.
    source: &'s str,
}

impl<'s> Converter<'s> {
    /// Convert all exported top-level declarations of a parsed file.
    pub fn convert_file(&mut self, root: Node<'_>) -> FileDecls {
        let mut decls = FileDecls::default();
        for node in named_children(root) {
            match node.kind() {
                "const_declaration" => decls.consts.extend(self.value_decl(node, ValueKind::Const)),
                "function_declaration" => decls.funcs.extend(self.function(node)),
                "method_declaration" => decls.methods.extend(self.method(node)),
                "type_declaration" => decls.types.extend(self.type_decl(node)),
                "var_declaration" => decls.vars.extend(self.value_decl(node, ValueKind::Var)),
                _ => {},
            }
        }
        return decls;
    }

    /// Add the parameter names of a list to the local scope.
    fn declare_params(&mut self, list: Node<'_>) {
        for param in named_children(list) {
            for name in field_children(param, "name") {
                self.locals.insert(node_text(name, self.source).to_string());
            }
        }
    }

    /// Add type parameters, parameters and named results to the local scope.
    fn declare_signature(&mut self, node: Node<'_>) {
        for field in ["type_parameters", "parameters", "result"] {
            let list = node
                .child_by_field_name(field)
                .filter(|l| return l.kind().ends_with("parameter_list"));
            if let Some(list) = list {
                self.declare_params(list);
            }
        }
    }

    /// Add type parameter names of a generic receiver, `K` and `V` in
    /// `*Map[K, V]`, to the local scope.
    fn declare_type_arguments(&mut self, node: Node<'_>) {
        if node.kind() == "type_arguments" {
            let mut names = Vec::new();
            collect_type_identifiers(node, &mut names);
            for name in names {
                self.locals.insert(node_text(name, self.source).to_string());
            }
            return;
        }
        for child in named_children(node) {
            self.declare_type_arguments(child);
        }
    }

    /// A declared name.
    fn declared(&self, node: Node<'_>, resolution: Resolution) -> Ident {
        return Ident {
            name: node_text(node, self.source).to_string(),
            pos: Some(self.pos(node)),
            resolution,
        };
    }

    /// Exported function without a receiver.
    fn function(&mut self, node: Node<'_>) -> Option<Documented<FuncDecl>> {
        let name = node.child_by_field_name("name")?;
        if !is_exported(node_text(name, self.source)) {
            return None;
        }
        self.locals.clear();
        self.declare_signature(node);
        return Some(Documented {
            decl: FuncDecl {
                name: self.declared(name, Resolution::PackageLevel),
                recv: None,
                ty: self.func_type(node),
            },
            doc: doc_comment(node, self.source),
        });
    }

    /// Exported method, with its receiver base type name.
    fn method(&mut self, node: Node<'_>) -> Option<(String, Documented<FuncDecl>)> {
        let name = node.child_by_field_name("name")?;
        if !is_exported(node_text(name, self.source)) {
            return None;
        }
        let receiver = node.child_by_field_name("receiver")?;
        self.locals.clear();
        self.declare_params(receiver);
        self.declare_signature(node);
        if let Some(ty) = named_children(receiver)
            .into_iter()
            .next()
            .and_then(|param| return param.child_by_field_name("type"))
        {
            self.declare_type_arguments(ty);
        }
        let recv = self.params(receiver).into_iter().next()?;
        let base = annotate::receiver_base(&recv.ty)?;
        let decl = FuncDecl {
            name: self.declared(name, Resolution::PackageLevel),
            recv: Some(recv),
            ty: self.func_type(node),
        };
        return Some((base, Documented { decl, doc: doc_comment(node, self.source) }));
    }

    /// A converter for one file.
    pub fn new(
        file: &'s Path,
        source: &'s str,
        imports: &'s Imports,
        package_names: &'s HashSet<String>,
    ) -> Self {
        return Self {
            file,
            imports,
            locals: HashSet::new(),
            package_names,
            source,
        };
    }

    /// Source position of a node.
    fn pos(&self, node: Node<'_>) -> SourcePos {
        let point = node.start_position();
        return SourcePos {
            col: u32::try_from(point.column).unwrap_or(u32::MAX).saturating_add(1),
            file: self.file.to_path_buf(),
            line: u32::try_from(point.row).unwrap_or(u32::MAX).saturating_add(1),
        };
    }

    /// Type declarations; grouped specs take their own doc comment when they
    /// have one.
    fn type_decl(&mut self, node: Node<'_>) -> Vec<Documented<TypeSpec>> {
        let outer_doc = doc_comment(node, self.source);
        let grouped = has_token(node, "(");
        let mut out = Vec::new();
        for spec in specs_of(node) {
            let Some(name) = spec.child_by_field_name("name") else {
                continue;
            };
            if !is_exported(node_text(name, self.source)) {
                continue;
            }
            let Some(ty) = spec.child_by_field_name("type") else {
                continue;
            };
            self.locals.clear();
            let type_params = match spec.child_by_field_name("type_parameters") {
                Some(list) => {
                    self.declare_params(list);
                    self.params(list)
                },
                None => Vec::new(),
            };
            let own_doc = if grouped { doc_comment(spec, self.source) } else { String::new() };
            out.push(Documented {
                decl: TypeSpec {
                    alias: spec.kind() == "type_alias",
                    name: self.declared(name, Resolution::PackageLevel),
                    ty: filter_members(self.expr(ty)),
                    type_params,
                },
                doc: if own_doc.is_empty() { outer_doc.clone() } else { own_doc },
            });
        }
        return out;
    }

    /// A `const` or `var` declaration, keeping specs that declare at least
    /// one exported name.
    fn value_decl(&mut self, node: Node<'_>, kind: ValueKind) -> Option<Documented<ValueDecl>> {
        self.locals.clear();
        let grouped = has_token(node, "(")
            || named_children(node).iter().any(|c| return c.kind() == "var_spec_list");
        let mut specs = Vec::new();
        for spec in specs_of(node) {
            let names = field_children(spec, "name");
            if !names.iter().any(|n| return is_exported(node_text(*n, self.source))) {
                continue;
            }
            let values: Vec<Expr> = spec
                .child_by_field_name("value")
                .map(|list| return named_children(list).into_iter().map(|v| return self.expr(v)).collect())
                .unwrap_or_default();
            specs.push(ValueSpec {
                comment: trailing_comment(spec, self.source),
                names: names
                    .into_iter()
                    .map(|n| return self.declared(n, Resolution::PackageLevel))
                    .collect(),
                ty: spec.child_by_field_name("type").map(|t| return self.expr(t)),
                values,
            });
        }
        if specs.is_empty() {
            return None;
        }
        return Some(Documented {
            decl: ValueDecl { grouped, kind, specs },
            doc: doc_comment(node, self.source),
        });
    }

    // ── Signatures and fields ──────────────────────────────────────────

    /// Signature of a function, method, function type, literal or interface
    /// method.
    fn func_type(&self, node: Node<'_>) -> FuncType {
        let results = match node.child_by_field_name("result") {
            Some(list) if list.kind() == "parameter_list" => self.params(list),
            Some(ty) => vec![Field::anonymous(self.expr(ty))],
            None => Vec::new(),
        };
        return FuncType {
            params: node.child_by_field_name("parameters").map(|l| return self.params(l)).unwrap_or_default(),
            results,
            type_params: node
                .child_by_field_name("type_parameters")
                .map(|l| return self.params(l))
                .unwrap_or_default(),
        };
    }

    /// Interface members: methods and embedded type elements.
    fn interface_members(&self, node: Node<'_>) -> Vec<Field> {
        let mut members = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "method_spec_list" => members.extend(self.interface_members(child)),
                "method_elem" | "method_spec" => {
                    let Some(name) = child.child_by_field_name("name") else {
                        continue;
                    };
                    members.push(Field {
                        comment: trailing_comment(child, self.source),
                        names: vec![self.declared(name, Resolution::Local)],
                        tag: None,
                        ty: Expr::FuncType(self.func_type(child)),
                    });
                },
                _ => {
                    let mut field = Field::anonymous(self.expr(child));
                    field.comment = trailing_comment(child, self.source);
                    members.push(field);
                },
            }
        }
        return members;
    }

    /// Names stored under the `name` field, as locals.
    fn names(&self, node: Node<'_>) -> Vec<Ident> {
        return field_children(node, "name")
            .into_iter()
            .map(|n| return self.declared(n, Resolution::Local))
            .collect();
    }

    /// Parameter, result or type parameter list.
    fn params(&self, list: Node<'_>) -> Vec<Field> {
        let mut fields = Vec::new();
        for param in named_children(list) {
            let Some(ty) = param.child_by_field_name("type") else {
                continue;
            };
            let ty = match param.kind() {
                "variadic_parameter_declaration" => Expr::Ellipsis(Box::new(self.expr(ty))),
                _ => self.expr(ty),
            };
            fields.push(Field {
                comment: None,
                names: self.names(param),
                tag: None,
                ty,
            });
        }
        return fields;
    }

    /// Struct fields with tags and trailing comments.
    fn struct_fields(&self, node: Node<'_>) -> Vec<Field> {
        let Some(list) =
            named_children(node).into_iter().find(|c| return c.kind() == "field_declaration_list")
        else {
            return Vec::new();
        };
        let mut fields = Vec::new();
        for decl in named_children(list) {
            let Some(ty_node) = decl.child_by_field_name("type") else {
                continue;
            };
            let names = self.names(decl);
            let mut ty = self.expr(ty_node);
            if names.is_empty() && has_token(decl, "*") {
                ty = Expr::Star(Box::new(ty));
            }
            fields.push(Field {
                comment: trailing_comment(decl, self.source),
                names,
                tag: decl
                    .child_by_field_name("tag")
                    .map(|t| return node_text(t, self.source).to_string()),
                ty,
            });
        }
        return fields;
    }

    // ── Expressions ────────────────────────────────────────────────────

    /// Convert an expression or type node.
    fn expr(&self, node: Node<'_>) -> Expr {
        let source = self.source;
        let child = |field: &str| return node.child_by_field_name(field).map(|c| return Box::new(self.expr(c)));
        let first = || return named_children(node).into_iter().next().map(|c| return Box::new(self.expr(c)));
        let converted = match node.kind() {
            "blank_identifier" | "false" | "field_identifier" | "identifier" | "iota" | "nil"
            | "package_identifier" | "true" | "type_identifier" => Some(self.reference(node)),
            "float_literal" => Some(self.literal(node, LitKind::Float)),
            "imaginary_literal" => Some(self.literal(node, LitKind::Imag)),
            "int_literal" => Some(self.literal(node, LitKind::Int)),
            "interpreted_string_literal" | "raw_string_literal" => {
                Some(self.literal(node, LitKind::String))
            },
            "rune_literal" => Some(self.literal(node, LitKind::Char)),
            "array_type" => child("element").map(|elem| {
                return Expr::ArrayType { elem, len: child("length") };
            }),
            "implicit_length_array_type" => child("element").map(|elem| {
                let len = Expr::Verbatim { idents: 0, text: "...".to_string() };
                return Expr::ArrayType { elem, len: Some(Box::new(len)) };
            }),
            "binary_expression" => child("left").zip(child("right")).map(|(left, right)| {
                let op = node.child_by_field_name("operator").map(|o| return node_text(o, source));
                return Expr::Binary { left, op: op.unwrap_or_default().to_string(), right };
            }),
            "call_expression" => self.call(node),
            "channel_type" => child("value").map(|value| {
                return Expr::ChanType { dir: channel_dir(node), value };
            }),
            "composite_literal" => node.child_by_field_name("body").map(|body| {
                return Expr::CompositeLit { elided: None, elts: self.elements(body), ty: child("type") };
            }),
            "func_literal" => Some(Expr::FuncLit(self.func_type(node))),
            "function_type" => Some(Expr::FuncType(self.func_type(node))),
            "generic_type" => child("type").map(|x| {
                let args = node.child_by_field_name("type_arguments");
                let indices = args.map(|a| return self.exprs(a)).unwrap_or_default();
                return Expr::Index { indices, x };
            }),
            "index_expression" => child("operand").map(|x| {
                let indices = field_children(node, "index").into_iter().map(|i| return self.expr(i)).collect();
                return Expr::Index { indices, x };
            }),
            "interface_type" => Some(Expr::InterfaceType {
                filtered: false,
                methods: self.interface_members(node),
            }),
            "interface_type_name" | "literal_element" => first().map(|x| return *x),
            "keyed_element" => {
                let parts = self.exprs(node);
                let mut parts = parts.into_iter();
                parts.next().zip(parts.next()).map(|(key, value)| {
                    return Expr::KeyValue { key: Box::new(key), value: Box::new(value) };
                })
            },
            "literal_value" => Some(Expr::CompositeLit { elided: None, elts: self.elements(node), ty: None }),
            "map_type" => child("key").zip(child("value")).map(|(key, value)| {
                return Expr::MapType { key, value };
            }),
            "negated_type" => first().map(|x| return Expr::Unary { op: "~".to_string(), x }),
            "constraint_term" if has_token(node, "~") => {
                first().map(|x| return Expr::Unary { op: "~".to_string(), x })
            },
            "parenthesized_expression" | "parenthesized_type" => first().map(Expr::Paren),
            "pointer_type" => first().map(Expr::Star),
            "qualified_type" => node
                .child_by_field_name("package")
                .zip(node.child_by_field_name("name"))
                .map(|(x, sel)| return self.selector(x, sel)),
            "selector_expression" => node
                .child_by_field_name("operand")
                .zip(node.child_by_field_name("field"))
                .map(|(x, sel)| return self.selector(x, sel)),
            "slice_type" => child("element").map(|elem| return Expr::ArrayType { elem, len: None }),
            "struct_type" => Some(Expr::StructType {
                fields: self.struct_fields(node),
                filtered: false,
            }),
            "constraint_elem" | "constraint_term" | "type_constraint" | "type_elem" => {
                self.union(node)
            },
            "unary_expression" => child("operand").map(|x| {
                let op = node.child_by_field_name("operator").map(|o| return node_text(o, source));
                return Expr::Unary { op: op.unwrap_or_default().to_string(), x };
            }),
            _ => None,
        };
        return converted.unwrap_or_else(|| return self.verbatim(node));
    }

    /// `fun[T](args...)`
    fn call(&self, node: Node<'_>) -> Option<Expr> {
        let mut fun = self.expr(node.child_by_field_name("function")?);
        if let Some(type_args) = node.child_by_field_name("type_arguments") {
            fun = Expr::Index { indices: self.exprs(type_args), x: Box::new(fun) };
        }
        let mut args = Vec::new();
        let mut ellipsis = false;
        if let Some(list) = node.child_by_field_name("arguments") {
            ellipsis = has_token(list, "...");
            for arg in named_children(list) {
                if arg.kind() == "variadic_argument" {
                    ellipsis = true;
                    args.extend(named_children(arg).into_iter().next().map(|a| return self.expr(a)));
                } else {
                    args.push(self.expr(arg));
                }
            }
        }
        return Some(Expr::Call { args, ellipsis, fun: Box::new(fun) });
    }

    /// Elements of a composite literal body.
    fn elements(&self, body: Node<'_>) -> Vec<Expr> {
        return self.exprs(body);
    }

    /// All non-comment named children, converted.
    fn exprs(&self, node: Node<'_>) -> Vec<Expr> {
        return named_children(node).into_iter().map(|c| return self.expr(c)).collect();
    }

    /// A literal token.
    fn literal(&self, node: Node<'_>, kind: LitKind) -> Expr {
        return Expr::BasicLit { kind, value: node_text(node, self.source).to_string() };
    }

    /// A name used in an expression or type.
    fn reference(&self, node: Node<'_>) -> Expr {
        let name = node_text(node, self.source);
        return Expr::Ident(Ident {
            name: name.to_string(),
            pos: Some(self.pos(node)),
            resolution: self.resolve(name),
        });
    }

    /// Resolve a name: locals shadow package-level names.
    fn resolve(&self, name: &str) -> Resolution {
        if self.locals.contains(name) {
            return Resolution::Local;
        }
        if self.package_names.contains(name) {
            return Resolution::PackageLevel;
        }
        return Resolution::Unresolved;
    }

    /// `x.sel`, resolving `x` to an import when it names one.
    fn selector(&self, x: Node<'_>, sel: Node<'_>) -> Expr {
        let adjacent = sel.start_byte().saturating_sub(x.end_byte()) == 1;
        let operand = match x.kind() {
            "identifier" | "package_identifier" => {
                let name = node_text(x, self.source);
                match self.resolve(name) {
                    Resolution::Unresolved => match self.imports.get(name) {
                        Some(path) => Expr::Ident(Ident {
                            name: name.to_string(),
                            pos: Some(self.pos(x)),
                            resolution: Resolution::Import(path.clone()),
                        }),
                        None => self.reference(x),
                    },
                    _ => self.reference(x),
                }
            },
            _ => self.expr(x),
        };
        return Expr::Selector {
            adjacent,
            sel: Ident {
                name: node_text(sel, self.source).to_string(),
                pos: Some(self.pos(sel)),
                resolution: Resolution::Unresolved,
            },
            x: Box::new(operand),
        };
    }

    /// `A | ~B | C` constraint unions.
    fn union(&self, node: Node<'_>) -> Option<Expr> {
        let mut terms = self.exprs(node).into_iter();
        let first = terms.next()?;
        return Some(terms.fold(first, |left, right| {
            return Expr::Binary { left: Box::new(left), op: "|".to_string(), right: Box::new(right) };
        }));
    }

    /// Fallback: the node's text as written.
    fn verbatim(&self, node: Node<'_>) -> Expr {
        let text = node_text(node, self.source);
        return Expr::Verbatim {
            idents: tokens::count_identifiers(node),
            text: text.split_whitespace().collect::<Vec<_>>().join(" "),
        };
    }
}

/// Direction of a `channel_type` node from its arrow position.
fn channel_dir(node: Node<'_>) -> ChanDir {
    let mut cursor = node.walk();
    let kinds: Vec<&str> = node.children(&mut cursor).map(|c| return c.kind()).collect();
    return match kinds.as_slice() {
        ["<-", ..] => ChanDir::Recv,
        [_, "<-", ..] => ChanDir::Send,
        _ => ChanDir::Both,
    };
}

/// Every `type_identifier` below `node`.
fn collect_type_identifiers<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if node.kind() == "type_identifier" {
        out.push(node);
        return;
    }
    for child in named_children(node) {
        collect_type_identifiers(child, out);
    }
}

/// Drop unexported struct fields and interface methods, recording that
/// something was removed.
fn filter_members(ty: Expr) -> Expr {
    return match ty {
        Expr::InterfaceType { methods, .. } => {
            let before = methods.len();
            let methods: Vec<Field> = methods
                .into_iter()
                .filter(|m| return m.names.first().is_none_or(Ident::is_exported))
                .collect();
            Expr::InterfaceType { filtered: methods.len() != before, methods }
        },
        Expr::StructType { fields, .. } => {
            let before = fields.len();
            let fields: Vec<Field> = fields.into_iter().filter_map(exported_field).collect();
            Expr::StructType { filtered: fields.len() != before, fields }
        },
        other => other,
    };
}

/// A struct field reduced to its exported names, or `None` when nothing of it
/// is exported. Embedded fields are kept when their type name is exported.
fn exported_field(mut field: Field) -> Option<Field> {
    if field.names.is_empty() {
        if embedded_name(&field.ty).is_some_and(is_exported) {
            return Some(field);
        }
        return None;
    }
    field.names.retain(Ident::is_exported);
    if field.names.is_empty() {
        return None;
    }
    return Some(field);
}

/// Type name an embedded field is known by.
fn embedded_name(ty: &Expr) -> Option<&str> {
    return match ty {
        Expr::Ident(ident) => Some(&ident.name),
        Expr::Index { x, .. } | Expr::Star(x) => embedded_name(x),
        Expr::Selector { sel, .. } => Some(&sel.name),
        _ => None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    fn convert(source: &str) -> FileDecls {
        let mut parser = grammar::go_parser(Path::new("a.go")).unwrap();
        let tree = parser.parse(source, None).unwrap();
        let root = tree.root_node();
        let mut names = HashSet::new();
        collect_package_names(root, source, &mut names);
        let imports = import_scope(&imports(root, source));
        let mut converter = Converter::new(Path::new("a.go"), source, &imports, &names);
        converter.convert_file(root)
    }

    #[test]
    fn package_clause_and_doc() {
        let source = "// Copyright.\n\n// Package demo does things.\n// Twice.\npackage demo\n";
        let mut parser = grammar::go_parser(Path::new("a.go")).unwrap();
        let tree = parser.parse(source, None).unwrap();
        assert_eq!(package_name(tree.root_node(), source).as_deref(), Some("demo"));
        assert_eq!(package_doc(tree.root_node(), source), "Package demo does things.\nTwice.");
    }

    #[test]
    fn default_import_names() {
        assert_eq!(default_import_name("net/http"), "http");
        assert_eq!(default_import_name("github.com/x/go-yaml"), "yaml");
        assert_eq!(default_import_name("gopkg.in/yaml.v3"), "yaml");
        assert_eq!(default_import_name("example.com/mod/v2"), "mod");
    }

    #[test]
    fn method_receiver_and_positions() {
        let decls = convert("package p\n\ntype T struct{}\n\n// M does it.\nfunc (t *T) M() int { return 0 }\n");
        assert_eq!(decls.methods.len(), 1);
        let (base, method) = &decls.methods[0];
        assert_eq!(base, "T");
        assert_eq!(method.doc, "M does it.");
        let pos = method.decl.name.pos.as_ref().unwrap();
        assert_eq!((pos.line, pos.col), (6, 13));
        let recv = method.decl.recv.as_ref().unwrap();
        assert_eq!(recv.names[0].name, "t");
        let Expr::Star(inner) = &recv.ty else { panic!("pointer receiver") };
        let Expr::Ident(ident) = inner.as_ref() else { panic!("ident") };
        assert_eq!(ident.resolution, Resolution::PackageLevel);
    }

    #[test]
    fn unexported_declarations_are_skipped() {
        let decls = convert("package p\n\nfunc helper() {}\n\nfunc Public() {}\n\nconst (\n\ta = 1\n\tB = 2\n)\n");
        assert_eq!(decls.funcs.len(), 1);
        assert_eq!(decls.consts.len(), 1);
        let group = &decls.consts[0].decl;
        assert!(group.grouped);
        assert_eq!(group.specs.len(), 1);
        assert_eq!(group.specs[0].names[0].name, "B");
    }

    #[test]
    fn multi_name_specs_hold_only_identifiers() {
        fn names(spec: &ValueSpec) -> Vec<&str> {
            spec.names.iter().map(|n| n.name.as_str()).collect::<Vec<_>>()
        }
        let decls = convert("package p\n\nconst X, Y int = 1, 2\n\nvar A, _ = 1, 2\n\nfunc F(a, b int, c ...string) {}\n");
        let typed = &decls.consts[0].decl.specs[0];
        assert_eq!(names(typed), vec!["X", "Y"]);
        assert!(matches!(&typed.ty, Some(Expr::Ident(ident)) if ident.name == "int"));
        assert_eq!(typed.values.len(), 2);
        assert_eq!(names(&decls.vars[0].decl.specs[0]), vec!["A", "_"]);
        let params = &decls.funcs[0].decl.ty.params;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].names.len(), 2);
        assert_eq!(params[1].names[0].name, "c");
    }

    #[test]
    fn struct_fields_are_filtered() {
        let decls = convert("package p\n\ntype S struct {\n\tA int // the a\n\tb string\n\tC, d bool\n}\n");
        let Expr::StructType { fields, filtered } = &decls.types[0].decl.ty else {
            panic!("struct");
        };
        assert!(filtered);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].comment.as_deref(), Some("the a"));
        assert_eq!(fields[1].names.len(), 1);
    }

    #[test]
    fn imported_selectors_resolve_to_paths() {
        let decls = convert("package p\n\nimport \"io\"\n\nvar R io.Reader\n");
        let Some(Expr::Selector { adjacent, x, sel }) = &decls.vars[0].decl.specs[0].ty else {
            panic!("selector");
        };
        assert!(adjacent);
        assert_eq!(sel.name, "Reader");
        let Expr::Ident(pkg) = x.as_ref() else { panic!("ident") };
        assert_eq!(pkg.resolution, Resolution::Import("io".to_string()));
    }

    #[test]
    fn parameters_shadow_package_names() {
        let decls = convert("package p\n\ntype T int\n\nfunc F(T int) T { return 0 }\n");
        let ty = &decls.funcs[0].decl.ty;
        let Expr::Ident(result) = &ty.results[0].ty else { panic!("ident") };
        assert_eq!(result.resolution, Resolution::Local);
    }

    #[test]
    fn clean_comment_forms() {
        assert_eq!(clean_comment("// hello "), "hello");
        assert_eq!(clean_comment("//x"), "x");
        assert_eq!(clean_comment("/* a\n * b\n */"), "a\nb");
    }
}
