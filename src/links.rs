/// Cursor-to-link lookup over a page's end-ordered link list.
use crate::position::{self, Address};
use crate::types::Link;

/// Index of the link under `(line, col)`, if any.
///
/// Links are sorted by strictly increasing `end`. The first link ending after
/// the cursor is the only candidate; it matches when it starts on the
/// cursor's line at or before the cursor.
pub fn link_at(links: &[Link], line: u32, col: u32) -> Option<usize> {
    let addr: Address = position::encode(line, col);
    let index = links.partition_point(|link| return link.end <= addr);
    let link = links.get(index)?;
    if position::line_of(link.start) != line || link.start > addr {
        return None;
    }
    return Some(index);
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::position::encode;
    use crate::types::LinkDest;

    fn link(start: (u32, u32), end: (u32, u32)) -> Link {
        Link {
            dest: LinkDest::Page,
            end: encode(end.0, end.1),
            path: 0,
            start: encode(start.0, start.1),
        }
    }

    fn sample() -> Vec<Link> {
        vec![link((1, 5), (1, 9)), link((1, 12), (1, 13)), link((3, 1), (3, 6))]
    }

    #[test]
    fn inside_a_link() {
        let links = sample();
        assert_eq!(link_at(&links, 1, 5), Some(0));
        assert_eq!(link_at(&links, 1, 8), Some(0));
        assert_eq!(link_at(&links, 1, 12), Some(1));
        assert_eq!(link_at(&links, 3, 1), Some(2));
    }

    #[test]
    fn end_is_exclusive() {
        assert_eq!(link_at(&sample(), 1, 9), None);
        assert_eq!(link_at(&sample(), 1, 13), None);
    }

    #[test]
    fn gaps_and_other_lines_miss() {
        let links = sample();
        assert_eq!(link_at(&links, 1, 1), None);
        assert_eq!(link_at(&links, 2, 4), None);
        assert_eq!(link_at(&links, 4, 1), None);
        assert_eq!(link_at(&[], 1, 1), None);
    }

    proptest! {
        #[test]
        fn lookup_agrees_with_linear_scan(
            spans in prop::collection::vec((1u32..6, 1u32..30, 1u32..8), 0..12),
            line in 1u32..7,
            col in 1u32..40,
        ) {
            // Build non-overlapping single-line links in end order.
            let mut links = Vec::new();
            let mut last_end = 0;
            for (l, c, len) in spans {
                let start = encode(l, c);
                let end = encode(l, c + len);
                if start >= last_end {
                    links.push(link((l, c), (l, c + len)));
                    last_end = end;
                }
            }
            let addr = encode(line, col);
            let expected = links.iter().position(|k| k.start <= addr && addr < k.end);
            prop_assert_eq!(link_at(&links, line, col), expected);
        }
    }
}
