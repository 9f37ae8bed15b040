//! CLI commands for docnav: render, jump, def, up, serve.

use std::io::Write as _;
use std::process::ExitCode;

use crate::config::Context;
use crate::error;
use crate::loader;
use crate::manager::DocumentManager;
use crate::page;
use crate::serve::Server;
use crate::types::{PageSpec, SymbolQuery, parse_symbol_fragment_as_query};

/// Buffer id used when a single page is shown outside an editor.
const CLI_BUFFER: u64 = 0;

/// Environment of the current working directory.
///
/// # Errors
///
/// Returns `Error::Io` if the working directory is unavailable, or any error
/// from loading `.docnav.toml`.
fn context() -> Result<Context, error::Error> {
    let cwd = std::env::current_dir()?;
    return Context::from_env(cwd);
}

/// Print the file position of a package or one of its declarations.
///
/// # Errors
///
/// Returns errors from loading the package, or `Error::SymbolNotFound`.
pub fn def(package: &str, symbol: Option<&str>) -> Result<(), error::Error> {
    let ctx = context()?;
    let pkg = loader::load(&ctx, package)?;
    let query = symbol.map_or(SymbolQuery::Package, parse_symbol_fragment_as_query);
    let pos = pkg.definition(&query)?;
    println!("{}:{}:{}", pos.file.display(), pos.line, pos.col);
    return Ok(());
}

/// Render a page and print where a click at `line:col` would navigate to.
/// Exits with 1 when no link covers the position.
///
/// # Errors
///
/// Returns errors from rendering the page or encoding the command.
pub fn jump(spec: &str, line: u32, col: u32) -> Result<ExitCode, error::Error> {
    let ctx = context()?;
    let doc = page::try_render(&ctx, spec)?;
    let marker = &ctx.config.marker;
    let manager = DocumentManager::default();
    manager.display(CLI_BUFFER, &PageSpec::parse(marker, spec).name(marker), &doc);

    let Some(command) = manager.activate(CLI_BUFFER, line, col) else {
        eprintln!("no link at {line}:{col}");
        return Ok(ExitCode::from(1));
    };
    println!("{}", serde_json::to_string(&command)?);
    return Ok(ExitCode::SUCCESS);
}

/// Print a page, or the page with its overlay as JSON.
///
/// # Errors
///
/// Returns errors from rendering the page or writing stdout.
pub fn render(spec: &str, json: bool) -> Result<(), error::Error> {
    let ctx = context()?;
    let doc = page::try_render(&ctx, spec)?;
    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &doc)?;
        writeln!(out)?;
    } else {
        out.write_all(doc.text.as_bytes())?;
        if !doc.text.ends_with('\n') {
            writeln!(out)?;
        }
    }
    return Ok(());
}

/// Answer editor requests on stdin until it closes.
///
/// # Errors
///
/// Returns errors from stdio or from encoding responses.
pub fn serve() -> Result<(), error::Error> {
    let ctx = context()?;
    let server = Server::new(&ctx);
    return server.run(std::io::stdin().lock(), std::io::stdout().lock());
}

/// Print the specifier of the page one level up.
///
/// # Errors
///
/// Returns any error from loading `.docnav.toml`.
pub fn up(spec: &str) -> Result<(), error::Error> {
    let ctx = context()?;
    let marker = &ctx.config.marker;
    println!("{}", PageSpec::parse(marker, spec).parent().name(marker));
    return Ok(());
}
