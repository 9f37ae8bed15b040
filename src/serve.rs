//! Newline-delimited JSON protocol for editor plugins.
//!
//! The plugin forwards buffer events as one request per line on stdin; each
//! request gets exactly one response line on stdout. Logging goes to stderr.
use std::io::{BufRead, Write};

use crate::config::Context;
use crate::doc::Doc;
use crate::error::Error;
use crate::manager::{BufferId, DocumentManager, NavigationCommand, OverlayDelta};
use crate::page;
use crate::position;
use crate::types::{Fold, PageSpec};

/// One editor event or query.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    /// Click at a position.
    Activate {
        /// Buffer clicked in.
        buffer: BufferId,
        /// 1-based column.
        col: u32,
        /// 1-based line.
        line: u32,
    },
    /// Position of a named anchor.
    Anchor {
        /// Buffer to search.
        buffer: BufferId,
        /// Anchor name, such as `Buffer.Write`.
        name: String,
    },
    /// The buffer was wiped.
    Close {
        /// Closed buffer.
        buffer: BufferId,
    },
    /// Cursor moved.
    Hover {
        /// Buffer the cursor is in.
        buffer: BufferId,
        /// 1-based column.
        col: u32,
        /// 1-based line.
        line: u32,
    },
    /// The cursor left the window showing the buffer.
    Leave {
        /// Buffer whose window was left.
        buffer: BufferId,
    },
    /// Render a page into a buffer.
    Open {
        /// Buffer that will show the page.
        buffer: BufferId,
        /// Page specifier, such as `godoc://fmt#Println`.
        spec: String,
    },
    /// Name of the page one level above the one shown.
    Up {
        /// Buffer showing the page.
        buffer: BufferId,
    },
}

/// Reply to one request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    /// The request was malformed.
    Error {
        /// What went wrong.
        message: String,
    },
    /// Where to go after a click; `null` when nothing was under the cursor.
    Navigate {
        /// Command for the editor.
        command: Option<NavigationCommand>,
    },
    /// Nothing to report.
    Ok,
    /// Overlay change; `null` when the overlay stays as it is.
    Overlay {
        /// Change to apply.
        delta: Option<OverlayDelta>,
    },
    /// A rendered page.
    Page {
        /// Folded line ranges.
        folds: Vec<Fold>,
        /// Highlight spans, split per line.
        highlights: Vec<LineSpan>,
        /// Buffer lines.
        lines: Vec<String>,
        /// Page name.
        name: String,
    },
    /// A position, or `null` when the anchor does not exist.
    Position {
        /// `[line, col]`, both 1-based.
        at: Option<(u32, u32)>,
    },
    /// A page specifier; `null` when the buffer shows no page.
    Spec {
        /// Page name.
        name: Option<String>,
    },
}

/// Part of a highlight that lies on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct LineSpan {
    /// 1-based column one past the span.
    pub end_col: u32,
    /// Editor highlight group.
    pub group: &'static str,
    /// 1-based line.
    pub line: u32,
    /// 1-based first column.
    pub start_col: u32,
}

/// Split highlights into per-line spans. Spans covering nothing are dropped.
pub fn line_spans(doc: &Doc) -> Vec<LineSpan> {
    let lines = doc.lines();
    let width = |line: u32| -> u32 {
        let text = usize::try_from(line.saturating_sub(1))
            .ok()
            .and_then(|i| return lines.get(i))
            .map_or(0, |l| return l.len());
        return u32::try_from(text).unwrap_or(u32::MAX).saturating_add(1);
    };
    let mut spans = Vec::new();
    for highlight in &doc.highlights {
        let group = highlight.group.editor_group();
        let (first, start_col) = position::decode(highlight.start);
        let (last, end_col) = position::decode(highlight.end);
        for line in first..=last {
            let start = if line == first { start_col } else { 1 };
            let end = if line == last { end_col } else { width(line) };
            if end > start {
                spans.push(LineSpan { end_col: end, group, line, start_col: start });
            }
        }
    }
    return spans;
}

/// Request handler holding the page registry.
#[derive(Debug)]
pub struct Server<'a> {
    /// Environment pages are rendered in.
    ctx: &'a Context,
    /// Pages shown per buffer.
    manager: DocumentManager,
}

impl<'a> Server<'a> {
    /// Answer one request.
    pub fn handle(&self, request: Request) -> Response {
        return match request {
            Request::Activate { buffer, col, line } => Response::Navigate {
                command: self.manager.activate(buffer, line, col),
            },
            Request::Anchor { buffer, name } => Response::Position {
                at: self.manager.anchor(buffer, &name),
            },
            Request::Close { buffer } => {
                self.manager.close(buffer);
                Response::Ok
            },
            Request::Hover { buffer, col, line } => Response::Overlay {
                delta: self.manager.hover(buffer, line, col),
            },
            Request::Leave { buffer } => Response::Overlay {
                delta: self.manager.leave_window(buffer),
            },
            Request::Open { buffer, spec } => self.open(buffer, &spec),
            Request::Up { buffer } => {
                let marker = &self.ctx.config.marker;
                let name = self
                    .manager
                    .page(buffer)
                    .map(|page| return PageSpec::parse(marker, &page.name).parent().name(marker));
                Response::Spec { name }
            },
        };
    }

    /// A server with no open pages.
    pub fn new(ctx: &'a Context) -> Self {
        return Self {
            ctx,
            manager: DocumentManager::default(),
        };
    }

    /// Render `spec` into `buffer`.
    fn open(&self, buffer: BufferId, spec: &str) -> Response {
        let marker = &self.ctx.config.marker;
        let name = PageSpec::parse(marker, spec).name(marker);
        let doc = page::render(self.ctx, spec);
        self.manager.display(buffer, &name, &doc);
        return Response::Page {
            folds: doc.folds.clone(),
            highlights: line_spans(&doc),
            lines: doc.lines().into_iter().map(str::to_string).collect(),
            name,
        };
    }

    /// Serve requests from `input` until it ends.
    ///
    /// Blank lines are skipped. A line that is not a valid request gets an
    /// error response and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading or writing fails, or `Error::Json` if a
    /// response cannot be encoded.
    pub fn run(&self, input: impl BufRead, mut output: impl Write) -> Result<(), Error> {
        tracing::debug!("serving on stdio");
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<Request>(&line) {
                Ok(request) => {
                    tracing::debug!(?request, "request");
                    self.handle(request)
                },
                Err(e) => {
                    tracing::warn!(error = %e, "malformed request");
                    Response::Error { message: e.to_string() }
                },
            };
            serde_json::to_writer(&mut output, &response)?;
            output.write_all(b"\n")?;
            output.flush()?;
        }
        return Ok(());
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::doc::{DocBuilder, LinkTo};
    use crate::types::HighlightGroup;

    fn context(dir: &std::path::Path) -> Context {
        Context {
            config: Config::default(),
            cwd: dir.to_path_buf(),
            gopath: vec![dir.to_path_buf()],
            goroot: None,
        }
    }

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("src/lib/greet");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(
            pkg.join("greet.go"),
            "// Package greet says hello.\npackage greet\n\n// Name is a name.\ntype Name string\n\n// Hello greets.\nfunc Hello(n Name) string { return \"hi \" + string(n) }\n",
        )
        .unwrap();
        dir
    }

    fn run(ctx: &Context, input: &str) -> Vec<serde_json::Value> {
        let server = Server::new(ctx);
        let mut out = Vec::new();
        server.run(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn open_then_navigate() {
        let dir = workspace();
        let ctx = context(dir.path());
        let input = "\
{\"method\":\"open\",\"buffer\":1,\"spec\":\"godoc://lib/greet#Hello\"}

{\"method\":\"activate\",\"buffer\":1,\"line\":1,\"col\":14}
{\"method\":\"hover\",\"buffer\":1,\"line\":1,\"col\":14}
{\"method\":\"leave\",\"buffer\":1}
{\"method\":\"up\",\"buffer\":1}
{\"method\":\"close\",\"buffer\":1}
{\"method\":\"up\",\"buffer\":1}
";
        let responses = run(&ctx, input);
        assert_eq!(responses.len(), 7);

        let page = &responses[0];
        assert_eq!(page["kind"], "page");
        assert_eq!(page["name"], "godoc://lib/greet#Hello");
        assert_eq!(page["lines"][0], "func Hello(n Name) string");

        // `Name` at column 14 links to the package page's anchor.
        assert_eq!(
            responses[1]["command"],
            serde_json::json!({"kind": "open_anchor", "anchor": "Name", "path": "godoc://lib/greet"})
        );
        assert_eq!(responses[2]["delta"]["underline"], serde_json::json!({"col": 14, "len": 4, "line": 1}));
        assert_eq!(responses[3]["delta"]["clear_previous"], true);
        assert_eq!(responses[4]["name"], "godoc://lib/greet");
        assert_eq!(responses[5]["kind"], "ok");
        assert_eq!(responses[6]["name"], serde_json::Value::Null);
    }

    #[test]
    fn malformed_lines_get_error_responses() {
        let dir = workspace();
        let ctx = context(dir.path());
        let responses = run(&ctx, "not json\n{\"method\":\"close\",\"buffer\":3}\n");
        assert_eq!(responses[0]["kind"], "error");
        assert_eq!(responses[1]["kind"], "ok");
    }

    #[test]
    fn highlights_split_per_line() {
        let mut doc = DocBuilder::new();
        doc.highlighted(HighlightGroup::Declaration, |d| d.write_str("type T struct {\n\tA int\n}"));
        doc.write_str("\n");
        doc.write_link("x", "godoc://x", LinkTo::Page);
        let spans = line_spans(&doc.finish());
        assert_eq!(
            spans,
            vec![
                LineSpan { end_col: 16, group: "Special", line: 1, start_col: 1 },
                LineSpan { end_col: 7, group: "Special", line: 2, start_col: 1 },
                LineSpan { end_col: 2, group: "Special", line: 3, start_col: 1 },
            ]
        );
    }
}
