//! Aligns printed declaration text with its annotation stream.
//!
//! The printer and the annotator are independent walks over the same
//! declaration. Each identifier token of the printed text consumes exactly one
//! annotation; comments consume none. When the two disagree the remaining text
//! is written undecorated.
use crate::annotate::Annotation;
use crate::doc::{DocBuilder, LinkTo};
use crate::tokens::{Token, TokenKind};
use crate::types::HighlightGroup;

/// Names used to build link targets.
#[derive(Debug, Clone, Copy)]
pub struct MergeContext<'a> {
    /// Page prefix, such as `godoc://`.
    pub marker: &'a str,
    /// Page of the package being documented; target of links to names
    /// declared in the same package.
    pub page: &'a str,
}

impl MergeContext<'_> {
    /// Page name for a package path; the empty path is the current package.
    fn target(&self, path: &str) -> String {
        if path.is_empty() {
            return self.page.to_string();
        }
        return format!("{}{path}", self.marker);
    }
}

/// How well the annotations lined up with the identifier tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// One annotation per identifier.
    Exact,
    /// Annotations left over after the last identifier.
    Leftover(usize),
    /// Identifiers ran past the last annotation at this byte offset.
    Underflow(usize),
}

/// Write `text` into `doc`, decorating tokens per `annotations`.
pub fn merge(
    doc: &mut DocBuilder,
    text: &str,
    tokens: &[Token],
    annotations: &[Annotation],
    ctx: MergeContext<'_>,
) -> Alignment {
    let mut cursor = 0;
    let mut pending = annotations.iter();
    let mut link_open = false;
    let mut underflow = None;

    for (index, token) in tokens.iter().enumerate() {
        let Some(lit) = text.get(token.start..token.end) else {
            continue;
        };
        doc.write_str(text.get(cursor..token.start).unwrap_or_default());
        cursor = token.end;

        if token.kind == TokenKind::Comment {
            doc.highlighted(HighlightGroup::Comment, |doc| doc.write_str(lit));
            continue;
        }
        if underflow.is_some() {
            doc.write_str(lit);
            continue;
        }
        let Some(annotation) = pending.next() else {
            tracing::warn!(
                page = ctx.page,
                offset = token.start,
                annotations = annotations.len(),
                "declaration has more identifiers than annotations"
            );
            underflow = Some(token.start);
            if link_open {
                doc.pop_link();
                link_open = false;
            }
            doc.write_str(lit);
            continue;
        };

        match annotation {
            Annotation::Anchor { qualifier, source } => {
                match qualifier {
                    Some(qualifier) => doc.add_anchor(&format!("{qualifier}.{lit}")),
                    None => doc.add_anchor(lit),
                }
                match source {
                    Some(pos) => doc.write_link(
                        lit,
                        &pos.file.to_string_lossy(),
                        LinkTo::At { col: pos.col, line: pos.line },
                    ),
                    None => doc.write_str(lit),
                }
            },
            Annotation::EndLink(_) => {
                doc.write_str(lit);
                if link_open {
                    doc.pop_link();
                    link_open = false;
                }
            },
            Annotation::Ignore => doc.write_str(lit),
            Annotation::Link(path) => {
                doc.write_link(lit, &ctx.target(path), LinkTo::Anchor(lit));
            },
            Annotation::PackageLink(path) => {
                doc.write_link(lit, &ctx.target(path), LinkTo::Page);
            },
            Annotation::StartLink(path) => {
                let rest = tokens.get(index.saturating_add(1)..).unwrap_or_default();
                let anchor = next_identifier(text, rest).unwrap_or_default();
                if link_open {
                    doc.pop_link();
                }
                doc.push_link(&ctx.target(path), LinkTo::Anchor(anchor));
                link_open = true;
                doc.write_str(lit);
            },
        }
    }

    doc.write_str(text.get(cursor..).unwrap_or_default());
    if link_open {
        doc.pop_link();
    }

    if let Some(offset) = underflow {
        return Alignment::Underflow(offset);
    }
    let left = pending.count();
    if left > 0 {
        tracing::debug!(page = ctx.page, left, "annotations left after the last identifier");
        return Alignment::Leftover(left);
    }
    return Alignment::Exact;
}

/// Text of the first identifier token in `tokens`.
fn next_identifier<'t>(text: &'t str, tokens: &[Token]) -> Option<&'t str> {
    return tokens
        .iter()
        .find(|t| return t.kind == TokenKind::Ident)
        .and_then(|t| return text.get(t.start..t.end));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourcePos;
    use crate::doc::Doc;
    use crate::position::encode;
    use crate::types::LinkDest;

    const CTX: MergeContext<'static> = MergeContext { marker: "godoc://", page: "godoc://pkg" };

    fn ident(start: usize, end: usize) -> Token {
        Token { end, kind: TokenKind::Ident, start }
    }

    fn run(text: &str, tokens: &[Token], annotations: &[Annotation]) -> (Doc, Alignment) {
        let mut doc = DocBuilder::new();
        let alignment = merge(&mut doc, text, tokens, annotations, CTX);
        (doc.finish(), alignment)
    }

    fn path_of(doc: &Doc, index: usize) -> &str {
        doc.strings.get(doc.links[index].path).unwrap()
    }

    #[test]
    fn method_registers_qualified_anchor() {
        let text = "func (t *T) M() int";
        let tokens = [ident(6, 7), ident(9, 10), ident(12, 13), ident(16, 19)];
        let annotations = [
            Annotation::Ignore,
            Annotation::Ignore,
            Annotation::Anchor {
                qualifier: Some("T".to_string()),
                source: Some(SourcePos { col: 13, file: "t.go".into(), line: 3 }),
            },
            Annotation::Link("builtin".to_string()),
        ];
        let (doc, alignment) = run(text, &tokens, &annotations);
        assert_eq!(alignment, Alignment::Exact);
        assert_eq!(doc.text, text);
        assert_eq!(doc.anchors.get("T.M"), Some(&encode(1, 13)));
        assert_eq!(doc.links.len(), 2);
        assert_eq!(path_of(&doc, 0), "t.go");
        assert_eq!(doc.links[0].dest, LinkDest::Address(encode(3, 13)));
        assert_eq!(path_of(&doc, 1), "godoc://builtin");
        assert_eq!((doc.links[1].start, doc.links[1].end), (encode(1, 17), encode(1, 20)));
    }

    #[test]
    fn separated_selector_yields_two_links_to_the_package() {
        let text = "var X = fmt.Println";
        let tokens = [ident(4, 5), ident(8, 11), ident(12, 19)];
        let annotations = [
            Annotation::Ignore,
            Annotation::PackageLink("fmt".to_string()),
            Annotation::Link("fmt".to_string()),
        ];
        let (doc, _) = run(text, &tokens, &annotations);
        assert_eq!(doc.links.len(), 2);
        assert_eq!(path_of(&doc, 0), "godoc://fmt");
        assert_eq!(doc.links[0].path, doc.links[1].path);
        assert_eq!(doc.links[0].dest, LinkDest::Page);
        let LinkDest::Anchor(anchor) = doc.links[1].dest else { panic!("expected anchor") };
        assert_eq!(doc.strings.get(anchor), Some("Println"));
    }

    #[test]
    fn adjacent_selector_is_one_link() {
        let text = "var X = fmt.Println";
        let tokens = [ident(4, 5), ident(8, 11), ident(12, 19)];
        let annotations = [
            Annotation::Ignore,
            Annotation::StartLink("fmt".to_string()),
            Annotation::EndLink("fmt".to_string()),
        ];
        let (doc, _) = run(text, &tokens, &annotations);
        assert_eq!(doc.links.len(), 1);
        assert_eq!((doc.links[0].start, doc.links[0].end), (encode(1, 9), encode(1, 20)));
        let LinkDest::Anchor(anchor) = doc.links[0].dest else { panic!("expected anchor") };
        assert_eq!(doc.strings.get(anchor), Some("Println"));
    }

    #[test]
    fn same_page_link_targets_current_page() {
        let text = "var X Y";
        let (doc, _) = run(
            text,
            &[ident(4, 5), ident(6, 7)],
            &[Annotation::Ignore, Annotation::Link(String::new())],
        );
        assert_eq!(path_of(&doc, 0), "godoc://pkg");
    }

    #[test]
    fn comments_are_highlighted_without_consuming() {
        let text = "X /* c */ Y";
        let tokens = [
            ident(0, 1),
            Token { end: 9, kind: TokenKind::Comment, start: 2 },
            ident(10, 11),
        ];
        let (doc, alignment) = run(text, &tokens, &[Annotation::Ignore, Annotation::Ignore]);
        assert_eq!(alignment, Alignment::Exact);
        assert_eq!(doc.highlights.len(), 1);
        assert_eq!(doc.highlights[0].group, HighlightGroup::Comment);
    }

    #[test]
    fn underflow_writes_rest_verbatim_and_closes_link() {
        let text = "a.b c d";
        let tokens = [ident(0, 1), ident(2, 3), ident(4, 5), ident(6, 7)];
        let (doc, alignment) =
            run(text, &tokens, &[Annotation::Ignore, Annotation::StartLink("p".to_string())]);
        assert_eq!(alignment, Alignment::Underflow(4));
        assert_eq!(doc.text, text);
        assert_eq!(doc.links.len(), 1);
        assert_eq!(doc.links[0].end, encode(1, 4));
    }

    #[test]
    fn leftover_annotations_are_reported() {
        let (doc, alignment) = run("X", &[ident(0, 1)], &[Annotation::Ignore, Annotation::Ignore]);
        assert_eq!(doc.text, "X");
        assert_eq!(alignment, Alignment::Leftover(1));
    }
}
