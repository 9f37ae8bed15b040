//! Registry of displayed pages and the editor events resolved against them.
//!
//! Each editor buffer showing a page has one entry holding the page's links,
//! anchors and string table. Lookups clone the entry's `Arc` under the lock
//! and do the work outside it.
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::doc::Doc;
use crate::intern::StringTable;
use crate::links;
use crate::position::{self, Address};
use crate::types::{Link, LinkDest};

/// Editor buffer handle.
pub type BufferId = u64;

/// The parts of a page needed to answer events.
#[derive(Debug, Clone)]
pub struct PageData {
    /// Anchors by name.
    pub anchors: BTreeMap<String, Address>,
    /// Links in end order.
    pub links: Vec<Link>,
    /// Page name, such as `godoc://fmt#Println`.
    pub name: String,
    /// Strings referenced from links.
    pub strings: StringTable,
}

/// Registry entry for one buffer.
#[derive(Debug)]
struct Slot {
    /// Index of the currently underlined link.
    hover: Option<usize>,
    /// Page shown in the buffer.
    page: Arc<PageData>,
}

/// What the editor should open after a click.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationCommand {
    /// Open a page and jump to one of its anchors once displayed.
    OpenAnchor {
        /// Anchor name.
        anchor: String,
        /// Page name.
        path: String,
    },
    /// Open a file at a position.
    OpenAt {
        /// 1-based column.
        col: u32,
        /// 1-based line.
        line: u32,
        /// File path.
        path: String,
    },
    /// Open a page at its top.
    OpenPage {
        /// Page name.
        path: String,
    },
}

/// Underline for the hovered link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Underline {
    /// 1-based start column.
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
    /// 1-based line.
    pub line: u32,
}

/// Change to apply to the hover overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct OverlayDelta {
    /// Remove the underline applied by the previous delta.
    pub clear_previous: bool,
    /// New underline to apply.
    pub underline: Option<Underline>,
}

/// Buffer id → page registry. One per host.
#[derive(Debug, Default)]
pub struct DocumentManager {
    /// Entries by buffer.
    entries: Mutex<HashMap<BufferId, Slot>>,
}

impl DocumentManager {
    /// Navigation for a click at `(line, col)` in `buffer`.
    pub fn activate(&self, buffer: BufferId, line: u32, col: u32) -> Option<NavigationCommand> {
        let page = self.page(buffer)?;
        let index = links::link_at(&page.links, line, col)?;
        let link = page.links.get(index)?;
        let path = page.strings.get(link.path)?.to_string();
        let command = match link.dest {
            LinkDest::Address(addr) => {
                let (line, col) = position::decode(addr);
                NavigationCommand::OpenAt { col, line, path }
            },
            LinkDest::Anchor(id) => NavigationCommand::OpenAnchor {
                anchor: page.strings.get(id)?.to_string(),
                path,
            },
            LinkDest::Page => NavigationCommand::OpenPage { path },
        };
        tracing::debug!(buffer, line, col, ?command, "activate");
        return Some(command);
    }

    /// Position of a named anchor in the page shown in `buffer`.
    pub fn anchor(&self, buffer: BufferId, name: &str) -> Option<(u32, u32)> {
        let page = self.page(buffer)?;
        return page.anchors.get(name).map(|&addr| return position::decode(addr));
    }

    /// Forget `buffer`.
    pub fn close(&self, buffer: BufferId) {
        self.entries.lock().remove(&buffer);
    }

    /// Show `doc` in `buffer`, replacing whatever was shown before.
    pub fn display(&self, buffer: BufferId, name: &str, doc: &Doc) {
        let page = Arc::new(PageData {
            anchors: doc.anchors.clone(),
            links: doc.links.clone(),
            name: name.to_string(),
            strings: doc.strings.clone(),
        });
        self.entries.lock().insert(buffer, Slot { hover: None, page });
    }

    /// Overlay change for the cursor moving to `(line, col)`.
    ///
    /// Returns `None` when the link under the cursor is the one already
    /// underlined, including when there is none before and after.
    pub fn hover(&self, buffer: BufferId, line: u32, col: u32) -> Option<OverlayDelta> {
        let (page, previous) = {
            let entries = self.entries.lock();
            let slot = entries.get(&buffer)?;
            (Arc::clone(&slot.page), slot.hover)
        };
        let current = links::link_at(&page.links, line, col);
        if current == previous {
            return None;
        }
        {
            let mut entries = self.entries.lock();
            let slot = entries.get_mut(&buffer)?;
            if !Arc::ptr_eq(&slot.page, &page) {
                return None;
            }
            slot.hover = current;
        }
        let underline = current.and_then(|i| return page.links.get(i)).map(underline_for);
        return Some(OverlayDelta {
            clear_previous: previous.is_some(),
            underline,
        });
    }

    /// The cursor left the window showing `buffer`: drop any underline.
    pub fn leave_window(&self, buffer: BufferId) -> Option<OverlayDelta> {
        let mut entries = self.entries.lock();
        let slot = entries.get_mut(&buffer)?;
        slot.hover.take()?;
        return Some(OverlayDelta {
            clear_previous: true,
            underline: None,
        });
    }

    /// Snapshot of the page shown in `buffer`.
    pub fn page(&self, buffer: BufferId) -> Option<Arc<PageData>> {
        return self.entries.lock().get(&buffer).map(|slot| return Arc::clone(&slot.page));
    }
}

/// Underline covering a link; multi-line links are underlined on their first
/// line only, one byte wide.
fn underline_for(link: &Link) -> Underline {
    let (line, col) = position::decode(link.start);
    let (end_line, end_col) = position::decode(link.end);
    let len = if end_line == line { end_col.saturating_sub(col) } else { 1 };
    return Underline { col, len, line };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{DocBuilder, LinkTo};

    /// `io.Reader, Writer` on line 1, a source link on line 2.
    fn page() -> Doc {
        let mut doc = DocBuilder::new();
        doc.add_anchor("Top");
        doc.write_link("io", "godoc://io", LinkTo::Page);
        doc.write_str(".");
        doc.write_link("Reader", "godoc://io", LinkTo::Anchor("Reader"));
        doc.write_str(", ");
        doc.write_link("Writer", "godoc://pkg", LinkTo::Anchor("Writer"));
        doc.write_str("\n");
        doc.write_link("Decl", "/src/pkg/a.go", LinkTo::At { col: 6, line: 12 });
        doc.finish()
    }

    fn manager() -> DocumentManager {
        let manager = DocumentManager::default();
        manager.display(7, "godoc://pkg", &page());
        manager
    }

    #[test]
    fn activate_maps_each_destination() {
        let m = manager();
        assert_eq!(m.activate(7, 1, 1), Some(NavigationCommand::OpenPage { path: "godoc://io".into() }));
        assert_eq!(
            m.activate(7, 1, 4),
            Some(NavigationCommand::OpenAnchor { anchor: "Reader".into(), path: "godoc://io".into() })
        );
        assert_eq!(
            m.activate(7, 2, 2),
            Some(NavigationCommand::OpenAt { col: 6, line: 12, path: "/src/pkg/a.go".into() })
        );
        assert_eq!(m.activate(7, 1, 3), None);
        assert_eq!(m.activate(99, 1, 1), None);
    }

    #[test]
    fn hover_changes_overlay_once_per_link() {
        let m = manager();
        // Off any link: nothing to do.
        assert_eq!(m.hover(7, 1, 3), None);

        let first = m.hover(7, 1, 4).unwrap();
        assert!(!first.clear_previous);
        assert_eq!(first.underline, Some(Underline { col: 4, len: 6, line: 1 }));
        // Moving within the same link is a no-op.
        assert_eq!(m.hover(7, 1, 8), None);

        let second = m.hover(7, 1, 12).unwrap();
        assert!(second.clear_previous);
        assert_eq!(second.underline, Some(Underline { col: 12, len: 6, line: 1 }));

        let off = m.hover(7, 1, 11).unwrap();
        assert_eq!(off, OverlayDelta { clear_previous: true, underline: None });
        assert_eq!(m.hover(7, 1, 10), None);
    }

    #[test]
    fn leaving_the_window_clears_the_underline() {
        let m = manager();
        assert_eq!(m.leave_window(7), None);
        m.hover(7, 2, 1).unwrap();
        assert_eq!(m.leave_window(7), Some(OverlayDelta { clear_previous: true, underline: None }));
        assert_eq!(m.leave_window(7), None);
        // The same link underlines again after re-entering.
        assert!(m.hover(7, 2, 1).is_some());
    }

    #[test]
    fn close_and_redisplay() {
        let m = manager();
        m.hover(7, 1, 1).unwrap();
        m.display(7, "godoc://pkg", &page());
        // Re-display resets the hover state.
        assert!(m.hover(7, 1, 1).is_some());
        assert_eq!(m.anchor(7, "Top"), Some((1, 1)));
        m.close(7);
        assert!(m.page(7).is_none());
        assert_eq!(m.anchor(7, "Top"), None);
    }
}
