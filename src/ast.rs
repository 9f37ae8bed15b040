//! Declaration model consumed by the annotator and the printer.
//!
//! The loader builds these trees from parsed source. They carry exactly what a
//! reference page needs: names with their definition positions, how each name
//! resolves, and enough structure to print the declaration back.
use std::path::PathBuf;

/// A position in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePos {
    /// 1-based byte column.
    pub col: u32,
    /// Source file, absolute or relative to the working directory.
    pub file: PathBuf,
    /// 1-based line.
    pub line: u32,
}

/// How an identifier resolves in its package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Names an imported package, by import path.
    Import(String),
    /// Names something scoped inside the declaration (parameter, field, result).
    Local,
    /// Names a package-level declaration of the same package.
    PackageLevel,
    /// Not declared anywhere the loader can see; may be predeclared.
    Unresolved,
}

/// A name occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// The name as written.
    pub name: String,
    /// Where the name occurs in source, when known.
    pub pos: Option<SourcePos>,
    /// What the name refers to.
    pub resolution: Resolution,
}

impl Ident {
    /// Whether the name is visible outside its package.
    pub fn is_exported(&self) -> bool {
        return is_exported(&self.name);
    }

    /// An identifier with no source position.
    pub fn new(name: &str, resolution: Resolution) -> Self {
        return Self {
            name: name.to_string(),
            pos: None,
            resolution,
        };
    }
}

/// A field, parameter, result, or interface member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Trailing line comment text, without the `//`.
    pub comment: Option<String>,
    /// Declared names; empty for embedded fields and unnamed parameters.
    pub names: Vec<Ident>,
    /// Raw struct tag, including its quotes.
    pub tag: Option<String>,
    /// Field type. Interface methods hold a [`Expr::FuncType`].
    pub ty: Expr,
}

impl Field {
    /// An unnamed field of the given type.
    pub const fn anonymous(ty: Expr) -> Self {
        return Self {
            comment: None,
            names: Vec::new(),
            tag: None,
            ty,
        };
    }
}

/// A function signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuncType {
    /// Parameters.
    pub params: Vec<Field>,
    /// Results.
    pub results: Vec<Field>,
    /// Type parameters.
    pub type_params: Vec<Field>,
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `<-chan T`
    Recv,
    /// `chan<- T`
    Send,
}

/// Kind of a basic literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    /// Rune literal.
    Char,
    /// Floating point literal.
    Float,
    /// Imaginary literal.
    Imag,
    /// Integer literal.
    Int,
    /// Interpreted or raw string literal.
    String,
}

/// Expressions and type expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `[len]elem`, or `[]elem` when `len` is absent.
    ArrayType {
        /// Element type.
        elem: Box<Expr>,
        /// Length expression.
        len: Option<Box<Expr>>,
    },
    /// A literal token.
    BasicLit {
        /// Literal kind.
        kind: LitKind,
        /// Literal text as written, quotes included.
        value: String,
    },
    /// `left op right`
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator text.
        op: String,
        /// Right operand.
        right: Box<Expr>,
    },
    /// `fun(args)`
    Call {
        /// Arguments.
        args: Vec<Expr>,
        /// Whether the last argument is spread with `...`.
        ellipsis: bool,
        /// Called expression.
        fun: Box<Expr>,
    },
    /// Channel type.
    ChanType {
        /// Direction.
        dir: ChanDir,
        /// Element type.
        value: Box<Expr>,
    },
    /// An expression preceded by a block comment.
    Commented {
        /// Comment text, without delimiters.
        comment: String,
        /// The expression.
        expr: Box<Expr>,
    },
    /// `Type{elts}`
    CompositeLit {
        /// Number of elements dropped from display, if any.
        elided: Option<usize>,
        /// Elements.
        elts: Vec<Expr>,
        /// Literal type, absent for nested literals.
        ty: Option<Box<Expr>>,
    },
    /// `...T` in a variadic parameter.
    Ellipsis(Box<Expr>),
    /// A function literal. Its body is not kept.
    FuncLit(FuncType),
    /// A function type.
    FuncType(FuncType),
    /// A name.
    Ident(Ident),
    /// `x[indices]`, also generic instantiation.
    Index {
        /// Index expressions.
        indices: Vec<Expr>,
        /// Indexed expression.
        x: Box<Expr>,
    },
    /// Interface type.
    InterfaceType {
        /// Whether unexported methods were removed.
        filtered: bool,
        /// Methods (named, [`Expr::FuncType`]) and embedded types (unnamed).
        methods: Vec<Field>,
    },
    /// `key: value` inside a composite literal.
    KeyValue {
        /// Key.
        key: Box<Expr>,
        /// Value.
        value: Box<Expr>,
    },
    /// `map[key]value`
    MapType {
        /// Key type.
        key: Box<Expr>,
        /// Value type.
        value: Box<Expr>,
    },
    /// `(x)`
    Paren(Box<Expr>),
    /// `x.sel`
    Selector {
        /// Whether the dot directly follows `x` in the source.
        adjacent: bool,
        /// Selected name.
        sel: Ident,
        /// Operand.
        x: Box<Expr>,
    },
    /// `*x`, as pointer type or dereference.
    Star(Box<Expr>),
    /// Struct type.
    StructType {
        /// Fields.
        fields: Vec<Field>,
        /// Whether unexported fields were removed.
        filtered: bool,
    },
    /// `op x`
    Unary {
        /// Operator text.
        op: String,
        /// Operand.
        x: Box<Expr>,
    },
    /// Source text kept as written, for forms the model does not break down.
    Verbatim {
        /// Number of identifier tokens in `text`.
        idents: usize,
        /// The text.
        text: String,
    },
}

impl Expr {
    /// A bare identifier expression.
    pub fn ident(name: &str, resolution: Resolution) -> Self {
        return Expr::Ident(Ident::new(name, resolution));
    }
}

/// `const` or `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Constant declaration.
    Const,
    /// Variable declaration.
    Var,
}

impl ValueKind {
    /// The declaring keyword.
    pub const fn keyword(self) -> &'static str {
        return match self {
            ValueKind::Const => "const",
            ValueKind::Var => "var",
        };
    }
}

/// One line of a value declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    /// Trailing line comment text.
    pub comment: Option<String>,
    /// Declared names.
    pub names: Vec<Ident>,
    /// Explicit type.
    pub ty: Option<Expr>,
    /// Initial values.
    pub values: Vec<Expr>,
}

/// A `func` declaration, without its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Function name.
    pub name: Ident,
    /// Receiver of a method.
    pub recv: Option<Field>,
    /// Signature.
    pub ty: FuncType,
}

/// A `type` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    /// Whether this is an alias (`type A = B`).
    pub alias: bool,
    /// Type name.
    pub name: Ident,
    /// Underlying type expression.
    pub ty: Expr,
    /// Type parameters.
    pub type_params: Vec<Field>,
}

/// A `const` or `var` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDecl {
    /// Whether the source used a parenthesized group.
    pub grouped: bool,
    /// Declaring keyword.
    pub kind: ValueKind,
    /// Specs in source order.
    pub specs: Vec<ValueSpec>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    /// Function or method.
    Func(FuncDecl),
    /// Named type.
    Type(TypeSpec),
    /// Constants or variables.
    Value(ValueDecl),
}

/// Whether a Go name is exported: it starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    return name.chars().next().is_some_and(char::is_uppercase);
}
