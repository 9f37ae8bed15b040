//! Page assembly.
//!
//! A page specifier selects one of the page kinds: the root listing of source
//! roots, a directory without Go files, a command, a package, a symbol, or a
//! method. Every declaration on a page goes through the same pipeline: the
//! annotator walks the declaration model, the printer renders it, the
//! tokenizer lexes the printed text, and the merger writes the text with its
//! links and anchors.
use std::collections::BTreeSet;
use std::path::Path;

use walkdir::WalkDir;

use crate::annotate;
use crate::ast::Decl;
use crate::config::{Config, Context};
use crate::convert::Documented;
use crate::diagnostics;
use crate::doc::{Doc, DocBuilder, LinkTo};
use crate::error::Error;
use crate::loader::{self, DocType, Example, Package};
use crate::merge::{self, Alignment, MergeContext};
use crate::printer;
use crate::text;
use crate::tokens::Tokenizer;
use crate::types::{HighlightGroup, PageSpec, SymbolQuery};

/// Directory names never listed.
const SKIPPED_DIRS: &[&str] = &["testdata"];

/// Render the page for `spec`. Failures become a page showing the error.
pub fn render(ctx: &Context, spec: &str) -> Doc {
    return match try_render(ctx, spec) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(spec, error = %e, "rendering error page");
            Doc::plain(&diagnostics::render_error(&e))
        },
    };
}

/// Render the page for `spec`.
///
/// # Errors
///
/// Returns `Error::InvalidSpecifier` for a symbol without a package, or any
/// error from loading the package or finding the symbol.
pub fn try_render(ctx: &Context, spec: &str) -> Result<Doc, Error> {
    let page = PageSpec::parse(&ctx.config.marker, spec);
    if page.path.is_empty() {
        if page.symbol != SymbolQuery::Package {
            return Err(Error::InvalidSpecifier {
                reason: "a symbol needs a package path".to_string(),
                spec: spec.to_string(),
            });
        }
        let mut writer = PageWriter::new(ctx, &page)?;
        writer.root_page();
        return Ok(writer.finish());
    }

    let pkg = match loader::load(ctx, &page.path) {
        Ok(pkg) => pkg,
        Err(Error::NoGoFiles { dir }) => {
            let mut writer = PageWriter::new(ctx, &page)?;
            writer.directory_page(&dir);
            return Ok(writer.finish());
        },
        Err(e) => return Err(e),
    };

    let mut writer = PageWriter::new(ctx, &page)?;
    match &page.symbol {
        SymbolQuery::Package if pkg.is_command() => writer.command_page(&pkg),
        SymbolQuery::Package => writer.package_page(&pkg),
        SymbolQuery::Bare(name) => writer.symbol_page(&pkg, name)?,
        SymbolQuery::Scoped { parent, child } => writer.member_page(&pkg, parent, child)?,
    }
    return Ok(writer.finish());
}

/// Writes one page.
struct PageWriter<'a> {
    /// Environment and rendering options.
    ctx: &'a Context,
    /// Page under construction.
    doc: DocBuilder,
    /// Page name of the package the page documents; target of links to
    /// declarations of the same package.
    package_page: String,
    /// The page being written.
    spec: &'a PageSpec,
    /// Lexer for printed declarations.
    tokenizer: Tokenizer,
}

impl<'a> PageWriter<'a> {
    /// A writer for `spec`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseFailed` if the tokenizer cannot be set up.
    fn new(ctx: &'a Context, spec: &'a PageSpec) -> Result<Self, Error> {
        let package = PageSpec {
            path: spec.path.clone(),
            symbol: SymbolQuery::Package,
        };
        return Ok(Self {
            ctx,
            doc: DocBuilder::new(),
            package_page: package.name(&ctx.config.marker),
            spec,
            tokenizer: Tokenizer::new()?,
        });
    }

    /// Rendering options.
    fn config(&self) -> &'a Config {
        return &self.ctx.config;
    }

    /// Freeze the page.
    fn finish(self) -> Doc {
        let doc = self.doc.finish();
        tracing::debug!(
            page = %self.spec.name(&self.ctx.config.marker),
            bytes = doc.text.len(),
            links = doc.links.len(),
            anchors = doc.anchors.len(),
            strings = doc.strings.len(),
            "page rendered"
        );
        return doc;
    }

    /// Page name for a package path.
    fn page_name(&self, path: &str) -> String {
        return format!("{}{path}", self.config().marker);
    }

    // ── Page kinds ─────────────────────────────────────────────────────

    /// Command: its documentation and subdirectories.
    fn command_page(&mut self, pkg: &Package) {
        self.title(&format!("Command {}", base_name(&self.spec.path)));
        self.doc_text(&pkg.doc);
        self.directories(&pkg.dir);
    }

    /// Directory with no Go files: its subdirectories.
    fn directory_page(&mut self, dir: &Path) {
        self.title(&format!("Directory {}", self.spec.path));
        self.directories(dir);
    }

    /// A type member that is not a method renders its type's page.
    fn member_page(&mut self, pkg: &Package, parent: &str, child: &str) -> Result<(), Error> {
        let Some(ty) = pkg.find_type(parent) else {
            return Err(pkg.symbol_not_found(&format!("{parent}.{child}")));
        };
        if let Some(method) = ty.find_method(child) {
            self.func_entry(method);
            self.examples(pkg, &format!("{parent}.{child}"));
            return Ok(());
        }
        if ty.member(child).is_some() {
            self.type_page(pkg, ty);
            return Ok(());
        }
        return Err(pkg.symbol_not_found(&format!("{parent}.{child}")));
    }

    /// Package: clause, documentation, examples, declarations by kind,
    /// imports and subdirectories.
    fn package_page(&mut self, pkg: &Package) {
        self.doc.highlighted(HighlightGroup::Declaration, |doc| {
            doc.write_str("package ");
            doc.write_str(&pkg.name);
        });
        self.doc.write_str(" ");
        let clause = format!("// import \"{}\"", pkg.import_path);
        self.doc.highlighted(HighlightGroup::Comment, |doc| doc.write_str(&clause));
        self.doc.write_str("\n");
        self.doc_text(&pkg.doc);
        self.examples(pkg, "");

        if !pkg.consts.is_empty() {
            self.section("CONSTANTS");
            for value in &pkg.consts {
                self.entry(Decl::Value(value.decl.clone()), &value.doc);
            }
        }
        if !pkg.vars.is_empty() {
            self.section("VARIABLES");
            for value in &pkg.vars {
                self.entry(Decl::Value(value.decl.clone()), &value.doc);
            }
        }
        if !pkg.funcs.is_empty() {
            self.section("FUNCTIONS");
            for func in &pkg.funcs {
                self.func_entry(func);
            }
        }
        if !pkg.types.is_empty() {
            self.section("TYPES");
            for ty in &pkg.types {
                self.entry(Decl::Type(ty.spec.clone()), &ty.doc);
                for method in &ty.methods {
                    self.func_entry(method);
                }
            }
        }
        if !pkg.imports.is_empty() {
            self.section("IMPORTS");
            for path in &pkg.imports {
                if path == annotate::CGO_PATH {
                    self.doc.write_str(path);
                } else {
                    let target = self.page_name(path);
                    self.doc.write_link(path, &target, LinkTo::Page);
                }
                self.doc.write_str("\n");
            }
        }
        self.directories(&pkg.dir);
    }

    /// Every source root's top-level directories, standard library first.
    fn root_page(&mut self) {
        let standard = self.ctx.goroot.as_ref().map(|goroot| return goroot.join("src"));
        if let Some(root) = &standard {
            self.section("STANDARD PACKAGES");
            self.dir_links("", list_dirs(root));
        }
        let third_party: BTreeSet<String> = self
            .ctx
            .source_roots()
            .iter()
            .filter(|root| return Some(*root) != standard.as_ref())
            .flat_map(|root| return list_dirs(root))
            .collect();
        if !third_party.is_empty() {
            self.section("THIRD PARTY PACKAGES");
            self.dir_links("", third_party);
        }
    }

    /// A constant, variable, function or type of the package.
    fn symbol_page(&mut self, pkg: &Package, name: &str) -> Result<(), Error> {
        if let Some(func) = pkg.find_func(name) {
            self.func_entry(func);
            self.examples(pkg, name);
            return Ok(());
        }
        if let Some(ty) = pkg.find_type(name) {
            self.type_page(pkg, ty);
            return Ok(());
        }
        if let Some(value) = pkg.find_value(name) {
            self.entry(Decl::Value(value.decl.clone()), &value.doc);
            return Ok(());
        }
        return Err(pkg.symbol_not_found(name));
    }

    /// A type with its methods and examples.
    fn type_page(&mut self, pkg: &Package, ty: &DocType) {
        self.entry(Decl::Type(ty.spec.clone()), &ty.doc);
        self.examples(pkg, ty.name());
        for method in &ty.methods {
            self.func_entry(method);
        }
    }

    // ── Building blocks ────────────────────────────────────────────────

    /// A declaration rendered through the annotation pipeline, ending with a
    /// newline. Underflow leaves the rest of the declaration undecorated.
    fn declaration(&mut self, mut decl: Decl) {
        let annotations = annotate::annotate(&mut decl);
        let printed = printer::print(&decl);
        let tokens = match self.tokenizer.tokenize(&printed) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, "declaration written without links");
                self.doc.highlighted(HighlightGroup::Declaration, |doc| doc.write_str(&printed));
                self.doc.write_str("\n");
                return;
            },
        };
        let ctx = MergeContext {
            marker: &self.ctx.config.marker,
            page: &self.package_page,
        };
        let mut alignment = Alignment::Exact;
        self.doc.highlighted(HighlightGroup::Declaration, |doc| {
            alignment = merge::merge(doc, &printed, &tokens, &annotations, ctx);
        });
        if let Alignment::Underflow(offset) = alignment {
            tracing::debug!(offset, decl = %printed, "declaration partly linked");
        }
        self.doc.write_str("\n");
    }

    /// Subdirectories of the page's directory, led by a link one level up.
    fn directories(&mut self, dir: &Path) {
        let mut names = list_dirs(dir);
        let relative = self.spec.path.starts_with('.') || self.spec.path.starts_with('/');
        if !relative {
            for root in self.ctx.source_roots() {
                names.extend(list_dirs(&root.join(&self.spec.path)));
            }
        }
        self.section("DIRECTORIES");
        let up = PageSpec {
            path: self.spec.path.clone(),
            symbol: SymbolQuery::Package,
        }
        .parent()
        .name(&self.config().marker);
        self.doc.write_link(".. (up a directory)", &up, LinkTo::Page);
        self.doc.write_str("\n");
        let base = self.spec.path.clone();
        self.dir_links(&base, names);
    }

    /// One linked line per directory under `base`.
    fn dir_links(&mut self, base: &str, names: BTreeSet<String>) {
        for name in names {
            let path = if base.is_empty() { name.clone() } else { format!("{base}/{name}") };
            let target = self.page_name(&path);
            self.doc.write_link(&format!("{name}/"), &target, LinkTo::Page);
            self.doc.write_str("\n");
        }
    }

    /// Documentation text after a blank line; nothing for empty text.
    fn doc_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.doc.write_str("\n");
        text::write_doc(&mut self.doc, text, &self.ctx.config);
    }

    /// A declaration followed by its documentation and a blank line.
    fn entry(&mut self, decl: Decl, doc: &str) {
        self.declaration(decl);
        self.doc_text(doc);
        self.doc.write_str("\n");
    }

    /// Each example of `target` in its own fold.
    fn examples(&mut self, pkg: &Package, target: &str) {
        let config = self.config();
        for example in pkg.examples_for(target) {
            self.doc.folded(|doc| write_example(doc, example, config));
            self.doc.write_str("\n");
        }
    }

    /// A function or method entry.
    fn func_entry(&mut self, func: &Documented<crate::ast::FuncDecl>) {
        self.entry(Decl::Func(func.decl.clone()), &func.doc);
    }

    /// A section header on its own line, preceded by a blank line.
    fn section(&mut self, title: &str) {
        if !self.doc.is_empty() {
            self.doc.write_str("\n");
        }
        self.doc.highlighted(HighlightGroup::Header, |doc| doc.write_str(title));
        self.doc.write_str("\n\n");
    }

    /// A highlighted first line.
    fn title(&mut self, title: &str) {
        self.doc.highlighted(HighlightGroup::Header, |doc| doc.write_str(title));
        self.doc.write_str("\n");
    }
}

/// Write one example: title, documentation, code and expected output.
fn write_example(doc: &mut DocBuilder, example: &Example, config: &Config) {
    let title = match example.suffix() {
        Some(suffix) => format!("Example ({})", capitalize(suffix)),
        None => "Example".to_string(),
    };
    doc.highlighted(HighlightGroup::Header, |d| d.write_str(&title));
    doc.write_str("\n");
    if !example.doc.is_empty() {
        doc.write_str("\n");
        text::write_doc(doc, &example.doc, config);
    }
    doc.write_str("\nCode:\n\n");
    write_indented(doc, &example.code, &config.indent);
    if let Some(output) = &example.output {
        doc.write_str("\nOutput:\n\n");
        write_indented(doc, output, &config.indent);
    }
}

/// Write `text` with every non-empty line indented, each line ending with a
/// newline.
fn write_indented(doc: &mut DocBuilder, text: &str, indent: &str) {
    for line in text.lines() {
        if !line.is_empty() {
            doc.write_str(indent);
            doc.write_str(line);
        }
        doc.write_str("\n");
    }
}

/// `second` → `Second`.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    return match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
}

/// Last element of a package path.
fn base_name(path: &str) -> &str {
    return path.rsplit('/').next().unwrap_or(path);
}

/// Names of the listable subdirectories of `dir`. A missing directory has
/// none; unreadable entries are logged and skipped.
fn list_dirs(dir: &Path) -> BTreeSet<String> {
    if !dir.is_dir() {
        return BTreeSet::new();
    }
    return WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| {
            return entry
                .map_err(|e| {
                    tracing::warn!(dir = %dir.display(), error = %e, "unreadable directory entry");
                    return e;
                })
                .ok();
        })
        .filter(|entry| return entry.file_type().is_dir())
        .filter_map(|entry| return entry.file_name().to_str().map(str::to_string))
        .filter(|name| return !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_str()))
        .collect();
}
