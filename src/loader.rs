//! Go package discovery and loading.
//!
//! A package path is resolved against the working directory or the source
//! roots, every non-test `.go` file in the directory is parsed, and the
//! exported declarations are gathered into a [`Package`]. Examples come from
//! the `_test.go` files of the same directory.
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use regex::Regex;
use tree_sitter::{Node, Parser, Tree};
use walkdir::WalkDir;

use crate::ast::{FuncDecl, Ident, SourcePos, TypeSpec, ValueDecl};
use crate::config::Context;
use crate::convert::{self, Converter, Documented};
use crate::error::Error;
use crate::grammar;
use crate::types::SymbolQuery;

/// Maximum source file size (16 MiB).
const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Marks the start of the expected output in an example body.
const OUTPUT_PATTERN: &str = r"(?im)^[ \t]*//[ \t]*(?:unordered[ \t]+)?output:";

/// A loaded package: its exported API, documentation and examples.
#[derive(Debug, Clone)]
pub struct Package {
    /// Constant declarations, in source order.
    pub consts: Vec<Documented<ValueDecl>>,
    /// Directory the package was loaded from.
    pub dir: PathBuf,
    /// Package documentation.
    pub doc: String,
    /// Examples from the package's test files.
    pub examples: Vec<Example>,
    /// Source files the package was built from, sorted.
    pub files: Vec<PathBuf>,
    /// Functions, sorted by name.
    pub funcs: Vec<Documented<FuncDecl>>,
    /// Import path, as requested or as found under a source root.
    pub import_path: String,
    /// Imported paths of all files, sorted.
    pub imports: Vec<String>,
    /// Package name from the `package` clause.
    pub name: String,
    /// Types with their methods, sorted by name.
    pub types: Vec<DocType>,
    /// Variable declarations, in source order.
    pub vars: Vec<Documented<ValueDecl>>,
}

/// An exported type and its exported methods.
#[derive(Debug, Clone)]
pub struct DocType {
    /// Doc comment.
    pub doc: String,
    /// Methods, sorted by name.
    pub methods: Vec<Documented<FuncDecl>>,
    /// The declaration.
    pub spec: TypeSpec,
}

impl DocType {
    /// Type name.
    pub fn name(&self) -> &str {
        return &self.spec.name.name;
    }
}

/// A runnable example from a test file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// Example body, de-indented, without the output comment.
    pub code: String,
    /// Doc comment.
    pub doc: String,
    /// Name after the `Example` prefix, such as `Buffer_Write` or `_second`.
    pub name: String,
    /// Expected output, if the example declares one.
    pub output: Option<String>,
}

impl Example {
    /// The declaration the example belongs to: `""` for the package, `F` for
    /// a function or type, `T.M` for a method.
    pub fn target(&self) -> String {
        let mut parts: Vec<&str> = self.name.split('_').collect();
        if parts.len() > 1
            && parts.last().is_some_and(|s| return s.chars().next().is_none_or(char::is_lowercase))
        {
            parts.pop();
        }
        return parts.join(".");
    }

    /// The example's own suffix, such as `second` in `ExampleF_second`.
    pub fn suffix(&self) -> Option<&str> {
        let (_, suffix) = self.name.rsplit_once('_')?;
        return suffix.chars().next().is_some_and(char::is_lowercase).then_some(suffix);
    }
}

impl Package {
    /// Whether this is a command rather than a library.
    pub fn is_command(&self) -> bool {
        return self.name == "main";
    }

    /// Source position of a declaration: the top of the first source file for
    /// the package, else the declared name.
    ///
    /// # Errors
    ///
    /// Returns `Error::SymbolNotFound` with close matches when nothing of
    /// that name is exported.
    pub fn definition(&self, query: &SymbolQuery) -> Result<SourcePos, Error> {
        let found = match query {
            SymbolQuery::Package => {
                let file = self.files.first().cloned().unwrap_or_else(|| return self.dir.clone());
                return Ok(SourcePos { col: 1, file, line: 1 });
            },
            SymbolQuery::Bare(name) => self.find_name(name),
            SymbolQuery::Scoped { parent, child } => self.find_member(parent, child),
        };
        return found.and_then(|ident| return ident.pos.clone()).ok_or_else(|| {
            return self.symbol_not_found(&query.display_name());
        });
    }

    /// Examples that belong to `target` (see [`Example::target`]).
    pub fn examples_for<'p>(&'p self, target: &'p str) -> impl Iterator<Item = &'p Example> {
        return self.examples.iter().filter(move |e| return e.target() == target);
    }

    /// Every exported name, methods and members qualified by their type.
    pub fn exported_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for value in self.consts.iter().chain(&self.vars) {
            for spec in &value.decl.specs {
                names.extend(spec.names.iter().map(|n| return n.name.clone()));
            }
        }
        names.extend(self.funcs.iter().map(|f| return f.decl.name.name.clone()));
        for ty in &self.types {
            names.push(ty.name().to_string());
            for method in &ty.methods {
                names.push(format!("{}.{}", ty.name(), method.decl.name.name));
            }
        }
        return names;
    }

    /// A function declared at package level.
    pub fn find_func(&self, name: &str) -> Option<&Documented<FuncDecl>> {
        return self.funcs.iter().find(|f| return f.decl.name.name == name);
    }

    /// A method or field of a type.
    fn find_member(&self, parent: &str, child: &str) -> Option<&Ident> {
        let ty = self.find_type(parent)?;
        if let Some(method) = ty.find_method(child) {
            return Some(&method.decl.name);
        }
        return ty.member(child);
    }

    /// A function, type, constant or variable by name.
    fn find_name(&self, name: &str) -> Option<&Ident> {
        if let Some(func) = self.find_func(name) {
            return Some(&func.decl.name);
        }
        if let Some(ty) = self.find_type(name) {
            return Some(&ty.spec.name);
        }
        return self.find_value(name).and_then(|value| {
            return value
                .decl
                .specs
                .iter()
                .flat_map(|s| return &s.names)
                .find(|n| return n.name == name);
        });
    }

    /// A type by name.
    pub fn find_type(&self, name: &str) -> Option<&DocType> {
        return self.types.iter().find(|t| return t.name() == name);
    }

    /// The constant or variable declaration that declares `name`.
    pub fn find_value(&self, name: &str) -> Option<&Documented<ValueDecl>> {
        return self.consts.iter().chain(&self.vars).find(|value| {
            return value
                .decl
                .specs
                .iter()
                .any(|s| return s.names.iter().any(|n| return n.name == name));
        });
    }

    /// `SymbolNotFound` with up to three close exported names.
    pub fn symbol_not_found(&self, symbol: &str) -> Error {
        let needle = symbol.to_lowercase();
        let suggestions = self
            .exported_names()
            .into_iter()
            .filter(|name| {
                let lower = name.to_lowercase();
                return lower.contains(&needle) || needle.contains(&lower);
            })
            .take(3)
            .collect();
        return Error::SymbolNotFound {
            package: self.import_path.clone(),
            suggestions,
            symbol: symbol.to_string(),
        };
    }
}

impl DocType {
    /// A method by name.
    pub fn find_method(&self, name: &str) -> Option<&Documented<FuncDecl>> {
        return self.methods.iter().find(|m| return m.decl.name.name == name);
    }

    /// A struct field or interface method name of the type.
    pub fn member(&self, name: &str) -> Option<&Ident> {
        let members = match &self.spec.ty {
            crate::ast::Expr::InterfaceType { methods, .. } => methods,
            crate::ast::Expr::StructType { fields, .. } => fields,
            _ => return None,
        };
        return members.iter().flat_map(|f| return &f.names).find(|n| return n.name == name);
    }
}

// ── Discovery ──────────────────────────────────────────────────────────

/// Directory and import path of a package.
///
/// Paths starting with `.` or `/` are taken relative to the working
/// directory; anything else is searched under the source roots in order.
///
/// # Errors
///
/// Returns `Error::PackageNotFound` listing every directory tried.
pub fn resolve_dir(ctx: &Context, path: &str) -> Result<(PathBuf, String), Error> {
    if path.starts_with('.') || path.starts_with('/') {
        let dir = ctx.cwd.join(path);
        if dir.is_dir() {
            let import_path = ctx
                .source_roots()
                .iter()
                .find_map(|root| return dir.strip_prefix(root).ok())
                .map_or_else(|| return path.to_string(), |rel| return rel.to_string_lossy().into_owned());
            return Ok((dir, import_path));
        }
        return Err(Error::PackageNotFound {
            searched: vec![dir],
            path: path.to_string(),
        });
    }
    let mut searched = Vec::new();
    for root in ctx.source_roots() {
        let dir = root.join(path);
        if dir.is_dir() {
            return Ok((dir, path.to_string()));
        }
        searched.push(dir);
    }
    return Err(Error::PackageNotFound {
        searched,
        path: path.to_string(),
    });
}

/// Go files directly inside `dir`, sorted, split into sources and tests.
fn go_files(dir: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut sources = Vec::new();
    let mut tests = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file() && grammar::is_go_source(e.path()))
    {
        let path = entry.into_path();
        if grammar::is_test_source(&path) {
            tests.push(path);
        } else {
            sources.push(path);
        }
    }
    return (sources, tests);
}

/// Read a source file, enforcing the size limit.
///
/// # Errors
///
/// Returns `Error::FileTooLarge` above the limit, or `Error::Io`.
fn read_source(path: &Path) -> Result<String, Error> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(Error::FileTooLarge {
            file: path.to_path_buf(),
            max_bytes: MAX_FILE_SIZE,
            size_bytes: size,
        });
    }
    return Ok(std::fs::read_to_string(path)?);
}

/// A parsed source file.
struct ParsedFile {
    /// File path.
    path: PathBuf,
    /// File text.
    source: String,
    /// Syntax tree.
    tree: Tree,
}

/// Parse one file.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if tree-sitter produces no tree, or any
/// error from reading the file.
fn parse_file(parser: &mut Parser, path: &Path) -> Result<ParsedFile, Error> {
    let source = read_source(path)?;
    let tree = parser.parse(&source, None).ok_or_else(|| return Error::ParseFailed {
        file: path.to_path_buf(),
        reason: "tree-sitter returned None".to_string(),
    })?;
    return Ok(ParsedFile {
        path: path.to_path_buf(),
        source,
        tree,
    });
}

// ── Loading ────────────────────────────────────────────────────────────

/// Whether a build constraint before the package clause excludes the file
/// from every build, as generator programs do with `//go:build ignore`.
fn is_ignored(source: &str) -> bool {
    return source
        .lines()
        .map(str::trim)
        .take_while(|line| return !line.starts_with("package"))
        .filter_map(|line| {
            return line.strip_prefix("//go:build").or_else(|| return line.strip_prefix("// +build"));
        })
        .flat_map(|expr| return expr.split(|c: char| return !(c.is_alphanumeric() || c == '_')))
        .any(|term| return term == "ignore");
}

/// The package a directory holds: the clause matching the directory name if
/// any file declares it, else the most common clause.
fn package_of(dir: &Path, clauses: &[String]) -> Option<String> {
    let expected = dir
        .file_name()
        .and_then(|n| return n.to_str())
        .map(convert::default_import_name);
    if let Some(expected) = expected.filter(|e| return clauses.contains(e)) {
        return Some(expected);
    }
    let mut best: Option<(&String, usize)> = None;
    for clause in clauses {
        let count = clauses.iter().filter(|c| return *c == clause).count();
        if best.is_none_or(|(_, most)| return count > most) {
            best = Some((clause, count));
        }
    }
    return best.map(|(clause, _)| return clause.clone());
}

/// Load the package at `path`.
///
/// Files excluded by an `ignore` build constraint are skipped, as are files
/// declaring a package other than the directory's.
///
/// # Errors
///
/// Returns `Error::PackageNotFound`, `Error::NoGoFiles`, or any error from
/// reading and parsing the package's files.
pub fn load(ctx: &Context, path: &str) -> Result<Package, Error> {
    let (dir, import_path) = resolve_dir(ctx, path)?;
    let (sources, tests) = go_files(&dir);
    let mut parser = grammar::go_parser(&dir)?;

    let mut clauses = Vec::new();
    let mut candidates = Vec::new();
    for file in &sources {
        let parsed = parse_file(&mut parser, file)?;
        if is_ignored(&parsed.source) {
            tracing::debug!(file = %file.display(), "skipping file excluded from builds");
            continue;
        }
        let Some(clause) = convert::package_name(parsed.tree.root_node(), &parsed.source) else {
            continue;
        };
        clauses.push(clause);
        candidates.push(parsed);
    }
    let Some(name) = package_of(&dir, &clauses) else {
        return Err(Error::NoGoFiles { dir });
    };
    let mut files = Vec::new();
    for (clause, parsed) in clauses.iter().zip(candidates) {
        if *clause == name {
            files.push(parsed);
        } else {
            tracing::debug!(file = %parsed.path.display(), package = %clause, "skipping file of another package");
        }
    }

    let mut package_names = HashSet::new();
    for file in &files {
        convert::collect_package_names(file.tree.root_node(), &file.source, &mut package_names);
    }

    let mut doc = String::new();
    let mut imports = BTreeSet::new();
    let mut consts = Vec::new();
    let mut vars = Vec::new();
    let mut funcs = Vec::new();
    let mut types = Vec::new();
    let mut methods = Vec::new();
    for file in &files {
        let root = file.tree.root_node();
        let file_doc = convert::package_doc(root, &file.source);
        let is_doc_file = file.path.file_name().is_some_and(|n| return n == "doc.go");
        if !file_doc.is_empty() && (doc.is_empty() || is_doc_file) {
            doc = file_doc;
        }
        let specs = convert::imports(root, &file.source);
        imports.extend(specs.iter().map(|s| return s.path.clone()));
        let scope = convert::import_scope(&specs);
        let mut converter = Converter::new(&file.path, &file.source, &scope, &package_names);
        let decls = converter.convert_file(root);
        consts.extend(decls.consts);
        vars.extend(decls.vars);
        funcs.extend(decls.funcs);
        types.extend(decls.types);
        methods.extend(decls.methods);
    }

    funcs.sort_by(|a, b| return a.decl.name.name.cmp(&b.decl.name.name));
    let mut types: Vec<DocType> = types
        .into_iter()
        .map(|t| return DocType { doc: t.doc, methods: Vec::new(), spec: t.decl })
        .collect();
    types.sort_by(|a, b| return a.name().cmp(b.name()));
    for (base, method) in methods {
        match types.iter_mut().find(|t| return t.name() == base) {
            Some(ty) => ty.methods.push(method),
            None => tracing::debug!(receiver = %base, "method of an unexported type dropped"),
        }
    }
    for ty in &mut types {
        ty.methods.sort_by(|a, b| return a.decl.name.name.cmp(&b.decl.name.name));
    }

    let examples = load_examples(&mut parser, &tests);
    tracing::debug!(
        package = %import_path,
        files = files.len(),
        types = types.len(),
        funcs = funcs.len(),
        examples = examples.len(),
        "package loaded"
    );

    return Ok(Package {
        consts,
        dir,
        doc,
        examples,
        files: files.into_iter().map(|f| return f.path).collect(),
        funcs,
        import_path,
        imports: imports.into_iter().collect(),
        name,
        types,
        vars,
    });
}

// ── Examples ───────────────────────────────────────────────────────────

/// Examples from test files. Unreadable test files are logged and skipped.
///
/// # Panics
///
/// Panics if the hardcoded output pattern is invalid (compile-time invariant).
fn load_examples(parser: &mut Parser, tests: &[PathBuf]) -> Vec<Example> {
    #[allow(clippy::expect_used, reason = "hardcoded pattern")]
    let output = Regex::new(OUTPUT_PATTERN).expect("valid regex");
    let mut examples = Vec::new();
    for path in tests {
        let parsed = match parse_file(parser, path) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "skipping test file");
                continue;
            },
        };
        let root = parsed.tree.root_node();
        let mut cursor = root.walk();
        for node in root.children(&mut cursor) {
            if let Some(example) = example(node, &parsed.source, &output) {
                examples.push(example);
            }
        }
    }
    examples.sort_by(|a, b| return a.name.cmp(&b.name));
    return examples;
}

/// An `ExampleXxx()` function as an example.
fn example(node: Node<'_>, source: &str, output: &Regex) -> Option<Example> {
    if node.kind() != "function_declaration" {
        return None;
    }
    let name = convert::node_text(node.child_by_field_name("name")?, source);
    let suffix = name.strip_prefix("Example")?;
    let starts_ok = suffix.chars().next().is_none_or(|c| return c == '_' || c.is_uppercase());
    let params = node.child_by_field_name("parameters")?;
    if !starts_ok || params.named_child_count() > 0 {
        return None;
    }
    let body = convert::node_text(node.child_by_field_name("body")?, source);
    let inner = body.strip_prefix('{').and_then(|b| return b.strip_suffix('}')).unwrap_or(body);
    let (code, expected) = match output.find(inner) {
        Some(found) => {
            let rest = inner.get(found.end()..).unwrap_or_default();
            (inner.get(..found.start()).unwrap_or_default(), Some(output_text(rest)))
        },
        None => (inner, None),
    };
    return Some(Example {
        code: dedent(code),
        doc: convert::doc_comment(node, source),
        name: suffix.to_string(),
        output: expected,
    });
}

/// Remove one level of indentation and surrounding blank lines.
fn dedent(code: &str) -> String {
    let lines: Vec<&str> = code
        .lines()
        .map(|l| return l.strip_prefix('\t').unwrap_or(l).trim_end())
        .collect();
    return lines.join("\n").trim_matches('\n').to_string();
}

/// Comment lines after the output marker, markers removed.
fn output_text(rest: &str) -> String {
    let lines: Vec<&str> = rest
        .lines()
        .map(str::trim)
        .map(|l| {
            let body = l.strip_prefix("//").unwrap_or(l);
            return body.strip_prefix(' ').unwrap_or(body);
        })
        .collect();
    return lines.join("\n").trim().to_string();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn context(cwd: &Path) -> Context {
        Context {
            config: Config::default(),
            cwd: cwd.to_path_buf(),
            gopath: Vec::new(),
            goroot: None,
        }
    }

    fn write(dir: &Path, name: &str, text: &str) {
        std::fs::write(dir.join(name), text).unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("shapes");
        std::fs::create_dir(&pkg).unwrap();
        write(
            &pkg,
            "shapes.go",
            "// Package shapes measures things.\npackage shapes\n\nimport \"fmt\"\n\n\
             // Shape has an area.\ntype Shape interface {\n\tArea() float64\n}\n\n\
             // Square is a shape.\ntype Square struct {\n\tSide float64\n\tname string\n}\n\n\
             // Area of the square.\nfunc (s Square) Area() float64 { return s.Side * s.Side }\n\n\
             func (s Square) hidden() {}\n\n\
             // Describe prints a shape.\nfunc Describe(s Shape) { fmt.Println(s.Area()) }\n",
        );
        write(&pkg, "extra_test.go", "package shapes_test\n\nimport \"fmt\"\n\n// Shows area.\nfunc ExampleSquare_Area() {\n\tfmt.Println(4)\n\t// Output:\n\t// 4\n}\n\nfunc ExampleDescribe_second() {\n\tDescribe(nil)\n}\n");
        dir
    }

    #[test]
    fn loads_exported_api() {
        let dir = fixture();
        let pkg = load(&context(dir.path()), "./shapes").unwrap();
        assert_eq!(pkg.name, "shapes");
        assert_eq!(pkg.doc, "Package shapes measures things.");
        assert_eq!(pkg.imports, vec!["fmt".to_string()]);
        assert_eq!(pkg.funcs.len(), 1);
        let square = pkg.find_type("Square").unwrap();
        assert_eq!(square.doc, "Square is a shape.");
        assert_eq!(square.methods.len(), 1);
        assert_eq!(square.methods[0].doc, "Area of the square.");
    }

    #[test]
    fn examples_attach_to_targets() {
        let dir = fixture();
        let pkg = load(&context(dir.path()), "./shapes").unwrap();
        let area: Vec<&Example> = pkg.examples_for("Square.Area").collect();
        assert_eq!(area.len(), 1);
        assert_eq!(area[0].code, "fmt.Println(4)");
        assert_eq!(area[0].output.as_deref(), Some("4"));
        assert_eq!(area[0].doc, "Shows area.");
        let describe: Vec<&Example> = pkg.examples_for("Describe").collect();
        assert_eq!(describe[0].suffix(), Some("second"));
    }

    #[test]
    fn definition_positions() {
        let dir = fixture();
        let pkg = load(&context(dir.path()), "./shapes").unwrap();
        let pos = pkg.definition(&SymbolQuery::Bare("Describe".to_string())).unwrap();
        assert_eq!((pos.line, pos.col), (23, 6));
        let method = SymbolQuery::Scoped { child: "Area".to_string(), parent: "Square".to_string() };
        assert_eq!(pkg.definition(&method).unwrap().line, 18);
        let field = SymbolQuery::Scoped { child: "Side".to_string(), parent: "Square".to_string() };
        assert_eq!(pkg.definition(&field).unwrap().line, 13);
        let missing = pkg.definition(&SymbolQuery::Bare("Squar".to_string())).unwrap_err();
        let Error::SymbolNotFound { suggestions, .. } = missing else { panic!("not found") };
        assert!(suggestions.contains(&"Square".to_string()));
    }

    #[test]
    fn missing_package_lists_searched_roots() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.goroot = Some(dir.path().join("goroot"));
        let Err(Error::PackageNotFound { searched, .. }) = load(&ctx, "nope/pkg") else {
            panic!("expected PackageNotFound");
        };
        assert_eq!(searched, vec![dir.path().join("goroot/src/nope/pkg")]);
    }

    #[test]
    fn directory_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();
        assert!(matches!(load(&context(dir.path()), "./empty"), Err(Error::NoGoFiles { .. })));
    }

    #[test]
    fn generator_files_do_not_decide_the_package() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("sort");
        std::fs::create_dir(&pkg).unwrap();
        write(&pkg, "gen_sort_variants.go", "//go:build ignore\n\n// Generates variants.\npackage main\n\nfunc main() {}\n");
        write(&pkg, "sort.go", "// Package sort sorts.\npackage sort\n\n// Ints sorts ints.\nfunc Ints(x []int) {}\n");
        let sorted = load(&context(dir.path()), "./sort").unwrap();
        assert_eq!(sorted.name, "sort");
        assert!(sorted.find_func("Ints").is_some());
        assert_eq!(sorted.files.len(), 1);
    }

    #[test]
    fn directory_name_picks_among_package_clauses() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("go-yaml");
        std::fs::create_dir(&pkg).unwrap();
        write(&pkg, "a_tool.go", "package main\n\nfunc main() {}\n");
        write(&pkg, "yaml.go", "package yaml\n\n// Marshal encodes.\nfunc Marshal() {}\n");
        let pkg = load(&context(dir.path()), "./go-yaml").unwrap();
        assert_eq!(pkg.name, "yaml");
        assert!(!pkg.is_command());
    }

    #[test]
    fn build_constraints() {
        assert!(is_ignored("//go:build ignore\n\npackage main\n"));
        assert!(is_ignored("// Copyright.\n\n//go:build linux && ignore\n\npackage main\n"));
        assert!(is_ignored("// +build ignore\n\npackage main\n"));
        assert!(!is_ignored("//go:build linux\n\npackage sort\n"));
        assert!(!is_ignored("package sort\n\n//go:build ignore\n"));
        assert!(!is_ignored("//go:build ignored_tag\n\npackage sort\n"));
    }

    #[test]
    fn example_targets() {
        let example = |name: &str| Example {
            code: String::new(),
            doc: String::new(),
            name: name.to_string(),
            output: None,
        };
        assert_eq!(example("").target(), "");
        assert_eq!(example("_second").target(), "");
        assert_eq!(example("Buffer").target(), "Buffer");
        assert_eq!(example("Buffer_Write").target(), "Buffer.Write");
        assert_eq!(example("Buffer_Write_extra").target(), "Buffer.Write");
    }
}
