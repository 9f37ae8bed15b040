use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened, why, and how to fix it.
/// The same text is the body of an error page.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::PackageNotFound { path, searched } => render_package_not_found(path, searched),
        Error::SymbolNotFound { package, symbol, suggestions } => {
            render_symbol_not_found(package, symbol, suggestions)
        },
        Error::NoGoFiles { dir } => render_no_go_files(dir),
        Error::FileTooLarge { file, size_bytes, max_bytes } => render_file_too_large(file, *size_bytes, *max_bytes),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::InvalidSpecifier { spec, reason } => format!("\
# Error: Invalid Page Specifier

`{spec}`: {reason}

## Fix

Use `godoc://path[#Symbol[.Method]]`, for example:

    godoc://net/http#Client.Do
"),

        Error::ParseFailed { file, reason } => format!("\
# Error: Parse Failed

Could not parse `{}`: {reason}
", file.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: Invalid JSON

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Check `.docnav.toml`. Known keys: `indent`, `marker`, `roots`, `text_width`.
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_file_too_large(file: &Path, size_bytes: u64, max_bytes: u64) -> String {
    format!("\
# Error: File Too Large

`{}` is {size_bytes} bytes (max {max_bytes}).
", file.display())
}

fn render_no_go_files(dir: &Path) -> String {
    format!("\
# Error: No Go Files

`{}` holds no non-test `.go` files.
", dir.display())
}

fn render_package_not_found(path: &str, searched: &[PathBuf]) -> String {
    let mut out = format!("\
# Error: Package Not Found

Package `{path}` is not in any source root.
");

    if searched.is_empty() {
        out.push_str("\
\n## Fix

Set `GOROOT` or `GOPATH`, or add a source root to `.docnav.toml`:

    roots = [\"vendor\"]
");
        return out;
    }

    out.push_str("\n## Searched\n\n");
    for dir in searched {
        let _ = writeln!(out, "- {}", dir.display());
    }
    out
}

fn render_symbol_not_found(package: &str, symbol: &str, suggestions: &[String]) -> String {
    let mut out = format!("\
# Error: Symbol Not Found

Symbol `{symbol}` is not exported by `{package}`.
");

    let best = find_closest_suggestion(symbol, suggestions);

    if let Some(suggestion) = &best {
        let _ = write!(out, "\n## Did you mean `{suggestion}`?\n\n");
        let _ = writeln!(out, "    godoc://{package}#{suggestion}");
    } else if !suggestions.is_empty() {
        out.push_str("\n## Available symbols\n\n");
        for s in suggestions {
            let _ = writeln!(out, "- `{s}`");
        }
    }

    out
}

/// Find the suggestion that matches the symbol ignoring case.
pub(crate) fn find_closest_suggestion(symbol: &str, suggestions: &[String]) -> Option<String> {
    suggestions.iter()
        .find(|s| s.eq_ignore_ascii_case(symbol))
        .cloned()
}
