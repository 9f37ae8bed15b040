/// Core domain types for docnav pages: specifiers and page overlay records.
use crate::intern::StringId;
use crate::position::Address;

/// A closed, non-empty span of highlighted page text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Highlight {
    /// Address one past the last highlighted byte.
    pub end: Address,
    /// Presentation group of the span.
    pub group: HighlightGroup,
    /// Address of the first highlighted byte.
    pub start: Address,
}

/// Presentation groups used by page highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightGroup {
    /// Comments inside rendered declarations.
    Comment,
    /// Rendered declarations.
    Declaration,
    /// Section headers and page titles.
    Header,
}

impl HighlightGroup {
    /// The editor highlight group the span is linked to.
    pub const fn editor_group(self) -> &'static str {
        return match self {
            HighlightGroup::Comment => "Comment",
            HighlightGroup::Declaration => "Special",
            HighlightGroup::Header => "Constant",
        };
    }
}

/// A clickable span of page text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Link {
    /// Where the link leads inside its target.
    pub dest: LinkDest,
    /// Address one past the last byte of the span.
    pub end: Address,
    /// Interned target path: a page name or a source file.
    pub path: StringId,
    /// Address of the first byte of the span.
    pub start: Address,
}

/// Destination of a link inside its target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkDest {
    /// A concrete position in the target, such as a declaration in a source file.
    Address(Address),
    /// A named anchor in the target page, by interned name.
    Anchor(StringId),
    /// The top of the target page.
    Page,
}

/// A collapsible range of whole lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Fold {
    /// Last folded line.
    pub end_line: u32,
    /// First folded line.
    pub start_line: u32,
}

/// A parsed page specifier: `<marker>path[#symbol[.method]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    /// Package path; empty for the root page.
    pub path: String,
    /// Which declaration of the package the page narrows to.
    pub symbol: SymbolQuery,
}

impl PageSpec {
    /// Page name for this specifier under the given marker.
    pub fn name(&self, marker: &str) -> String {
        let symbol = self.symbol.display_name();
        if symbol.is_empty() {
            return format!("{marker}{}", self.path);
        }
        return format!("{marker}{}#{symbol}", self.path);
    }

    /// The page one level up: method to type, symbol to package, package to
    /// its parent directory. The root page is its own parent.
    pub fn parent(&self) -> Self {
        return match &self.symbol {
            SymbolQuery::Scoped { parent, .. } => Self {
                path: self.path.clone(),
                symbol: SymbolQuery::Bare(parent.clone()),
            },
            SymbolQuery::Bare(_) => Self {
                path: self.path.clone(),
                symbol: SymbolQuery::Package,
            },
            SymbolQuery::Package => {
                let up = self.path.rsplit_once('/').map_or("", |(dir, _)| return dir);
                Self {
                    path: up.to_string(),
                    symbol: SymbolQuery::Package,
                }
            },
        };
    }

    /// Parse a specifier, stripping `marker` when present.
    pub fn parse(marker: &str, spec: &str) -> Self {
        let normalized = spec.replace('\\', "/");
        let rest = normalized.strip_prefix(marker).unwrap_or(&normalized);
        let Some((path, fragment)) = rest.split_once('#') else {
            return Self {
                path: trim_path(rest),
                symbol: SymbolQuery::Package,
            };
        };
        return Self {
            path: trim_path(path),
            symbol: parse_symbol_fragment_as_query(fragment),
        };
    }
}

/// Parsed from a symbol fragment. Either bare ("Println"), dot-scoped
/// ("Buffer.Write"), or the whole package (no fragment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolQuery {
    /// Unscoped symbol name such as `Println`.
    Bare(String),
    /// The package itself; no fragment.
    Package,
    /// Dot-scoped member such as `Buffer.Write`.
    Scoped {
        /// Member name.
        child: String,
        /// Enclosing type name.
        parent: String,
    },
}

impl SymbolQuery {
    /// The display name used in page names and error messages.
    pub fn display_name(&self) -> String {
        return match self {
            SymbolQuery::Bare(name) => name.clone(),
            SymbolQuery::Scoped {
                parent,
                child,
            } => format!("{parent}.{child}"),
            SymbolQuery::Package => String::new(),
        };
    }
}

/// Parse a symbol fragment into bare or dot-scoped form.
pub fn parse_symbol_fragment_as_query(raw: &str) -> SymbolQuery {
    let raw = raw.trim_matches('.');
    if raw.is_empty() {
        return SymbolQuery::Package;
    }
    if let Some((parent, child)) = raw.split_once('.') {
        return SymbolQuery::Scoped {
            parent: parent.to_string(),
            child: child.to_string(),
        };
    }
    return SymbolQuery::Bare(raw.to_string());
}

/// Drop trailing separators and a lone `.` from a package path.
fn trim_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed == "." {
        return String::new();
    }
    return trimmed.to_string();
}
