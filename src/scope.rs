//! Push/pop range tracking for highlights, links and folds.
//!
//! Scopes nest while a page is written, but editors want flat, non-overlapping
//! spans. [`ScopeStack`] turns the nesting into a tiling: whenever a scope is
//! pushed, the span its parent covered so far is emitted and the parent resumes
//! after the child is popped. Frames are never edited in place; a resumed parent
//! is replaced by a rebased copy.
use crate::position::{self, Address};
use crate::types::Fold;

/// An open scope on the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<T> {
    /// Address the unemitted part of the scope starts at.
    pub start: Address,
    /// Value carried by the scope.
    pub value: T,
}

impl<T> Frame<T> {
    /// The same scope, continuing from `start`.
    fn rebased(self, start: Address) -> Self {
        return Self {
            start,
            value: self.value,
        };
    }
}

/// A closed span emitted by a [`ScopeStack`]. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoped<T> {
    /// Address one past the end of the span.
    pub end: Address,
    /// Address of the first byte of the span.
    pub start: Address,
    /// Value of the scope that was on top during the span.
    pub value: T,
}

/// Stack of open scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeStack<T> {
    /// Open frames, innermost last.
    frames: Vec<Frame<T>>,
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        return Self { frames: Vec::new() };
    }
}

impl<T: Clone> ScopeStack<T> {
    /// Whether no scope is open.
    pub fn is_empty(&self) -> bool {
        return self.frames.is_empty();
    }

    /// Close the innermost scope at `at`.
    ///
    /// Emits the scope's remaining span unless it is empty. The enclosing
    /// scope, if any, resumes at `at`. Popping an empty stack is a page
    /// construction defect; it emits nothing.
    pub fn pop(mut self, at: Address) -> (Self, Option<Scoped<T>>) {
        let Some(frame) = self.frames.pop() else {
            debug_assert!(false, "scope popped with nothing pushed");
            return (self, None);
        };
        let emitted = (frame.start != at).then(|| {
            return Scoped {
                start: frame.start,
                end: at,
                value: frame.value,
            };
        });
        if let Some(outer) = self.frames.pop() {
            self.frames.push(outer.rebased(at));
        }
        return (self, emitted);
    }

    /// Open a scope carrying `value` at `at`.
    ///
    /// If the enclosing scope has covered text since it last started, that
    /// span is emitted and the enclosing scope is rebased to `at`.
    pub fn push(mut self, value: T, at: Address) -> (Self, Option<Scoped<T>>) {
        let mut emitted = None;
        if let Some(outer) = self.frames.pop() {
            if outer.start == at {
                self.frames.push(outer);
            } else {
                emitted = Some(Scoped {
                    start: outer.start,
                    end: at,
                    value: outer.value.clone(),
                });
                self.frames.push(outer.rebased(at));
            }
        }
        self.frames.push(Frame { start: at, value });
        return (self, emitted);
    }
}

/// Tracks open folds by their start address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldTracker {
    /// Start addresses of open folds, innermost last.
    open: Vec<Address>,
}

impl FoldTracker {
    /// Whether no fold is open.
    pub fn is_empty(&self) -> bool {
        return self.open.is_empty();
    }

    /// Close the innermost fold at `at`.
    ///
    /// A fold that closes at the first column of a line does not include that
    /// line. Folds that end up covering a single line are dropped.
    pub fn pop(mut self, at: Address) -> (Self, Option<Fold>) {
        let Some(start) = self.open.pop() else {
            debug_assert!(false, "fold popped with nothing pushed");
            return (self, None);
        };
        let start_line = position::line_of(start);
        let (mut end_line, end_col) = position::decode(at);
        if end_col == 1 {
            end_line = end_line.saturating_sub(1);
        }
        let fold = (end_line > start_line).then_some(Fold {
            start_line,
            end_line,
        });
        return (self, fold);
    }

    /// Open a fold at `at`.
    pub fn push(mut self, at: Address) -> Self {
        self.open.push(at);
        return self;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::position::encode;

    /// Run a script of pushes (`Some(value)`) and pops (`None`) with the
    /// address advancing by `step` before each operation.
    fn run(script: &[(Option<char>, u32)]) -> Vec<Scoped<char>> {
        let mut stack = ScopeStack::default();
        let mut at = encode(1, 1);
        let mut out = Vec::new();
        for &(op, step) in script {
            at += step;
            let (next, emitted) = match op {
                Some(value) => stack.push(value, at),
                None => stack.pop(at),
            };
            stack = next;
            out.extend(emitted);
        }
        assert!(stack.is_empty());
        out
    }

    #[test]
    fn nested_scope_splits_parent() {
        let out = run(&[(Some('a'), 0), (Some('b'), 3), (None, 2), (None, 4)]);
        let base = encode(1, 1);
        assert_eq!(
            out,
            vec![
                Scoped { start: base, end: base + 3, value: 'a' },
                Scoped { start: base + 3, end: base + 5, value: 'b' },
                Scoped { start: base + 5, end: base + 9, value: 'a' },
            ]
        );
    }

    #[test]
    fn adjacent_pushes_emit_no_empty_span() {
        let out = run(&[(Some('a'), 0), (Some('b'), 0), (None, 2), (None, 0)]);
        let base = encode(1, 1);
        assert_eq!(out, vec![Scoped { start: base, end: base + 2, value: 'b' }]);
    }

    #[test]
    fn empty_scope_emits_nothing() {
        assert!(run(&[(Some('a'), 0), (None, 0)]).is_empty());
    }

    #[test]
    fn fold_ending_at_line_start_excludes_that_line() {
        let folds = FoldTracker::default().push(encode(3, 1));
        let (folds, fold) = folds.pop(encode(6, 1));
        assert!(folds.is_empty());
        assert_eq!(fold, Some(Fold { start_line: 3, end_line: 5 }));
    }

    #[test]
    fn single_line_fold_is_dropped() {
        let folds = FoldTracker::default().push(encode(3, 5));
        let (_, fold) = folds.pop(encode(3, 40));
        assert_eq!(fold, None);

        let folds = FoldTracker::default().push(encode(3, 5));
        let (_, fold) = folds.pop(encode(4, 1));
        assert_eq!(fold, None);
    }

    /// Random balanced scripts: a push is taken while depth allows, then
    /// everything is closed.
    fn balanced() -> impl Strategy<Value = Vec<(Option<char>, u32)>> {
        return prop::collection::vec((any::<bool>(), 0u32..4, prop::char::range('a', 'e')), 0..40)
            .prop_map(|steps| {
                let mut depth = 0usize;
                let mut script = Vec::new();
                for (open, step, value) in steps {
                    if open || depth == 0 {
                        depth += 1;
                        script.push((Some(value), step));
                    } else {
                        depth -= 1;
                        script.push((None, step));
                    }
                }
                for _ in 0..depth {
                    script.push((None, 1));
                }
                script
            });
    }

    proptest! {
        #[test]
        fn balanced_scripts_tile_the_top_scope(script in balanced()) {
            let out = run(&script);

            // Reference model: which value is on top for each unit of address.
            let mut expected: Vec<(u32, char)> = Vec::new();
            let mut open: Vec<char> = Vec::new();
            let mut at = encode(1, 1);
            for &(op, step) in &script {
                if let Some(&top) = open.last() {
                    for offset in 0..step {
                        expected.push((at + offset, top));
                    }
                }
                at += step;
                match op {
                    Some(value) => open.push(value),
                    None => { open.pop(); },
                }
            }

            let mut actual: Vec<(u32, char)> = Vec::new();
            for span in &out {
                prop_assert!(span.start < span.end);
                for addr in span.start..span.end {
                    actual.push((addr, span.value));
                }
            }
            prop_assert_eq!(actual, expected);
        }
    }
}
