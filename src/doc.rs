//! Page documents and the builder that writes them.
//!
//! A [`DocBuilder`] is an append-only text buffer that knows its current
//! address at all times. Highlights, links and folds are opened and closed
//! around writes; the builder turns them into flat records through the scope
//! stacks. [`DocBuilder::finish`] freezes the result into a [`Doc`].
use std::collections::BTreeMap;
use std::fmt;

use crate::intern::{StringId, StringTable};
use crate::position::{self, Address};
use crate::scope::{FoldTracker, ScopeStack, Scoped};
use crate::types::{Fold, Highlight, HighlightGroup, Link, LinkDest};

/// A finished page.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Doc {
    /// Named jump targets, such as `Buffer.Write`, by address.
    pub anchors: BTreeMap<String, Address>,
    /// Collapsible line ranges.
    pub folds: Vec<Fold>,
    /// Presentation spans.
    pub highlights: Vec<Highlight>,
    /// Clickable spans in increasing `end` order.
    pub links: Vec<Link>,
    /// Strings referenced from links.
    pub strings: StringTable,
    /// Page text.
    pub text: String,
}

impl Doc {
    /// A page whose body is plain text, without any overlay.
    pub fn plain(text: &str) -> Self {
        let mut builder = DocBuilder::new();
        builder.write_str(text);
        return builder.finish();
    }

    /// Page text split into lines, as an editor buffer holds it.
    pub fn lines(&self) -> Vec<&str> {
        return self.text.split('\n').collect();
    }
}

/// Where a link being written leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTo<'a> {
    /// A line and column in the target.
    At {
        /// 1-based column.
        col: u32,
        /// 1-based line.
        line: u32,
    },
    /// A named anchor in the target page.
    Anchor(&'a str),
    /// The top of the target page.
    Page,
}

/// Value carried by an open link scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenLink {
    /// Destination inside the target.
    dest: LinkDest,
    /// Interned target path.
    path: StringId,
}

/// Builds a [`Doc`] while tracking the output address.
#[derive(Debug, Default)]
pub struct DocBuilder {
    /// Anchors registered so far.
    anchors: BTreeMap<String, Address>,
    /// Open folds.
    fold_stack: FoldTracker,
    /// Retained folds.
    folds: Vec<Fold>,
    /// Open highlight scopes.
    highlight_stack: ScopeStack<HighlightGroup>,
    /// Emitted highlight spans.
    highlights: Vec<Highlight>,
    /// Current 1-based line.
    line: u32,
    /// Byte offset in `text` where the current line starts.
    line_start: usize,
    /// Open link scopes.
    link_stack: ScopeStack<OpenLink>,
    /// Emitted links.
    links: Vec<Link>,
    /// Interned paths and anchor names.
    strings: StringTable,
    /// Text written so far.
    text: String,
}

impl DocBuilder {
    /// Register `name` as an anchor at the current address. The first
    /// registration of a name wins.
    pub fn add_anchor(&mut self, name: &str) {
        let at = self.position();
        self.anchors.entry(name.to_string()).or_insert(at);
    }

    /// Freeze the builder into a page.
    pub fn finish(self) -> Doc {
        debug_assert!(self.highlight_stack.is_empty(), "unclosed highlight scope");
        debug_assert!(self.link_stack.is_empty(), "unclosed link scope");
        debug_assert!(self.fold_stack.is_empty(), "unclosed fold");
        return Doc {
            anchors: self.anchors,
            folds: self.folds,
            highlights: self.highlights,
            links: self.links,
            strings: self.strings,
            text: self.text,
        };
    }

    /// Run `f` inside a fold.
    pub fn folded(&mut self, f: impl FnOnce(&mut Self)) {
        self.push_fold();
        f(self);
        self.pop_fold();
    }

    /// Run `f` inside a highlight scope.
    pub fn highlighted(&mut self, group: HighlightGroup, f: impl FnOnce(&mut Self)) {
        self.push_highlight(group);
        f(self);
        self.pop_highlight();
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        return self.text.is_empty();
    }

    /// Run `f` inside a link scope.
    pub fn linked(&mut self, path: &str, to: LinkTo<'_>, f: impl FnOnce(&mut Self)) {
        self.push_link(path, to);
        f(self);
        self.pop_link();
    }

    /// An empty page positioned at line 1, column 1.
    pub fn new() -> Self {
        return Self {
            line: 1,
            ..Self::default()
        };
    }

    /// Close the innermost fold.
    pub(crate) fn pop_fold(&mut self) {
        let at = self.position();
        let (folds, fold) = std::mem::take(&mut self.fold_stack).pop(at);
        self.fold_stack = folds;
        self.folds.extend(fold);
    }

    /// Close the innermost highlight scope.
    pub(crate) fn pop_highlight(&mut self) {
        let at = self.position();
        let (stack, emitted) = std::mem::take(&mut self.highlight_stack).pop(at);
        self.highlight_stack = stack;
        self.record_highlight(emitted);
    }

    /// Close the innermost link scope.
    pub(crate) fn pop_link(&mut self) {
        let at = self.position();
        let (stack, emitted) = std::mem::take(&mut self.link_stack).pop(at);
        self.link_stack = stack;
        self.record_link(emitted);
    }

    /// Current output address.
    pub fn position(&self) -> Address {
        let width = self.text.len().saturating_sub(self.line_start).saturating_add(1);
        let col = u32::try_from(width).unwrap_or(u32::MAX);
        return position::encode(self.line, col);
    }

    /// Open a fold at the current address.
    pub(crate) fn push_fold(&mut self) {
        let at = self.position();
        self.fold_stack = std::mem::take(&mut self.fold_stack).push(at);
    }

    /// Open a highlight scope at the current address.
    pub(crate) fn push_highlight(&mut self, group: HighlightGroup) {
        let at = self.position();
        let (stack, emitted) = std::mem::take(&mut self.highlight_stack).push(group, at);
        self.highlight_stack = stack;
        self.record_highlight(emitted);
    }

    /// Open a link scope at the current address.
    pub(crate) fn push_link(&mut self, path: &str, to: LinkTo<'_>) {
        let path = self.strings.intern(path);
        let dest = match to {
            LinkTo::At { line, col } => LinkDest::Address(position::encode(line, col)),
            LinkTo::Anchor(name) => LinkDest::Anchor(self.strings.intern(name)),
            LinkTo::Page => LinkDest::Page,
        };
        let at = self.position();
        let (stack, emitted) =
            std::mem::take(&mut self.link_stack).push(OpenLink { dest, path }, at);
        self.link_stack = stack;
        self.record_link(emitted);
    }

    /// Keep an emitted highlight span.
    fn record_highlight(&mut self, emitted: Option<Scoped<HighlightGroup>>) {
        if let Some(span) = emitted {
            self.highlights.push(Highlight {
                start: span.start,
                end: span.end,
                group: span.value,
            });
        }
    }

    /// Keep an emitted link span.
    fn record_link(&mut self, emitted: Option<Scoped<OpenLink>>) {
        if let Some(span) = emitted {
            self.links.push(Link {
                start: span.start,
                end: span.end,
                path: span.value.path,
                dest: span.value.dest,
            });
        }
    }

    /// Text written so far.
    pub fn text(&self) -> &str {
        return &self.text;
    }

    /// Write `text` as a link.
    pub fn write_link(&mut self, text: &str, path: &str, to: LinkTo<'_>) {
        self.linked(path, to, |doc| doc.write_str(text));
    }

    /// Append text, advancing the address.
    pub fn write_str(&mut self, s: &str) {
        let base = self.text.len();
        for (offset, _) in s.match_indices('\n') {
            self.line = self.line.saturating_add(1);
            self.line_start = base.saturating_add(offset).saturating_add(1);
        }
        self.text.push_str(s);
    }
}

impl fmt::Write for DocBuilder {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        DocBuilder::write_str(self, s);
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use super::*;
    use crate::position::encode;

    #[test]
    fn position_tracks_lines_and_columns() {
        let mut doc = DocBuilder::new();
        assert_eq!(doc.position(), encode(1, 1));
        doc.write_str("abc");
        assert_eq!(doc.position(), encode(1, 4));
        doc.write_str("\n\nxy");
        assert_eq!(doc.position(), encode(3, 3));
        writeln!(doc, "{}", 42).unwrap();
        assert_eq!(doc.position(), encode(4, 1));
    }

    #[test]
    fn highlight_inside_highlight_tiles() {
        let mut doc = DocBuilder::new();
        doc.highlighted(HighlightGroup::Declaration, |doc| {
            doc.write_str("x = ");
            doc.highlighted(HighlightGroup::Comment, |doc| doc.write_str("/* c */"));
            doc.write_str(" 1");
        });
        let doc = doc.finish();
        let groups: Vec<_> = doc
            .highlights
            .iter()
            .map(|h| (position::decode(h.start).1, position::decode(h.end).1, h.group))
            .collect();
        assert_eq!(
            groups,
            vec![
                (1, 5, HighlightGroup::Declaration),
                (5, 12, HighlightGroup::Comment),
                (12, 14, HighlightGroup::Declaration),
            ]
        );
    }

    #[test]
    fn links_are_recorded_in_end_order() {
        let mut doc = DocBuilder::new();
        doc.write_link("Reader", "godoc://io", LinkTo::Anchor("Reader"));
        doc.write_str(", ");
        doc.write_link("io", "godoc://io", LinkTo::Page);
        let doc = doc.finish();
        assert_eq!(doc.links.len(), 2);
        assert!(doc.links[0].end < doc.links[1].end);
        assert_eq!(doc.strings.len(), 2);
        assert_eq!(doc.links[0].path, doc.links[1].path);
    }

    #[test]
    fn empty_link_is_not_recorded() {
        let mut doc = DocBuilder::new();
        doc.write_link("", "godoc://io", LinkTo::Page);
        assert!(doc.finish().links.is_empty());
    }

    #[test]
    fn first_anchor_wins() {
        let mut doc = DocBuilder::new();
        doc.add_anchor("T");
        doc.write_str("type T\n");
        doc.add_anchor("T");
        let doc = doc.finish();
        assert_eq!(doc.anchors.get("T"), Some(&encode(1, 1)));
    }

    #[test]
    fn folds_cover_whole_lines() {
        let mut doc = DocBuilder::new();
        doc.write_str("head\n");
        doc.folded(|doc| doc.write_str("one\ntwo\nthree\n"));
        doc.folded(|doc| doc.write_str("single"));
        let doc = doc.finish();
        assert_eq!(doc.folds, vec![Fold { start_line: 2, end_line: 4 }]);
    }
}
