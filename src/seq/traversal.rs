// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Iteration
//!
//! Two ways to walk a sequence:
//! - [`Iter`] borrows the list, so the borrow checker already rules out
//!   mutation while it is alive. It walks leaves left to right with an
//!   explicit stack and never re-descends from the root.
//! - [`Traversal`] is a detached position that does not borrow the list
//!   between steps. It records the list's modification count when created
//!   and refuses to step once that count has moved.

use smallvec::SmallVec;

use crate::error::Result;
use crate::error::SeqError;
use crate::seq::Sequence;
use crate::seq::gap_block::GapBlock;
use crate::seq::list::BlockList;
use crate::seq::tree::Node;
use crate::seq::tree::STACK_INLINE;

/// Borrowing in-order iterator over a [`BlockList`], or a range of one.
pub struct Iter<'a, T> {
    /// Subtrees still to visit, next one on top.
    stack: SmallVec<[&'a Node<T>; STACK_INLINE]>,
    block: Option<&'a GapBlock<T>>,
    pos: usize,
    remaining: usize,
}

impl<'a, T: Clone> Iter<'a, T> {
    /// Iterate over `from..to`; the caller has checked the range.
    ///
    /// One descent finds `from`, stacking the right subtrees passed on the
    /// way down.
    pub(crate) fn new(list: &'a BlockList<T>, from: usize, to: usize) -> Iter<'a, T> {
        let mut stack = SmallVec::new();
        let mut node = &list.root;
        let mut offset = from;
        let block = loop {
            match node {
                Node::Branch(branch) if offset < branch.left_count => {
                    stack.push(&branch.right);
                    node = &branch.left;
                }
                Node::Branch(branch) => {
                    offset -= branch.left_count;
                    node = &branch.right;
                }
                Node::Leaf(block) => break block.as_ref(),
            }
        };
        return Iter {
            stack,
            block: Some(block),
            pos: offset,
            remaining: to - from,
        };
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            if let Some(block) = self.block {
                if self.pos < block.len() {
                    let item = block.get(self.pos).ok()?;
                    self.pos += 1;
                    self.remaining -= 1;
                    return Some(item);
                }
                self.block = None;
            }
            match self.stack.pop()? {
                Node::Branch(branch) => {
                    self.stack.push(&branch.right);
                    self.stack.push(&branch.left);
                }
                Node::Leaf(block) => {
                    self.block = Some(block.as_ref());
                    self.pos = 0;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return (self.remaining, Some(self.remaining));
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A fail-fast position in a sequence.
///
/// Each call to [`Traversal::next`] first compares the sequence's current
/// modification count with the one recorded at creation. If they differ the
/// step fails with [`SeqError::ConcurrentStructuralChange`] and the
/// traversal is abandoned: every later step fails the same way.
#[derive(Clone, Debug)]
pub struct Traversal {
    next: usize,
    expected: u64,
    failed: bool,
}

impl Traversal {
    pub(crate) fn new(expected: u64) -> Traversal {
        return Traversal {
            next: 0,
            expected,
            failed: false,
        };
    }

    /// Step forward, returning `None` at the end of the sequence.
    pub fn next<'a, T, S>(&mut self, seq: &'a S) -> Result<Option<&'a T>>
    where
        S: Sequence<T> + ?Sized,
    {
        let found = seq.mod_count();
        if self.failed || found != self.expected {
            self.failed = true;
            return Err(SeqError::ConcurrentStructuralChange {
                expected: self.expected,
                found,
            });
        }
        if self.next >= seq.len() {
            return Ok(None);
        }
        let item = seq.get(self.next)?;
        self.next += 1;
        return Ok(Some(item));
    }

    /// Index of the element the next step will return.
    pub fn position(&self) -> usize {
        return self.next;
    }

    /// Whether the traversal has been abandoned after a failed step.
    pub fn is_abandoned(&self) -> bool {
        return self.failed;
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BlockConfig;
    use crate::error::SeqError;
    use crate::seq::list::BlockList;

    fn list_of(capacity: usize, len: u32) -> BlockList<u32> {
        let config = BlockConfig::with_capacity(capacity);
        let mut list = BlockList::with_config(config).unwrap();
        for i in 0..len {
            list.push(i).unwrap();
        }
        return list;
    }

    #[test]
    fn iter_visits_in_order() {
        let list = list_of(4, 100);
        let items: Vec<u32> = list.iter().copied().collect();
        assert_eq!(items, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn iter_reports_exact_size() {
        let list = list_of(4, 37);
        let mut iter = list.iter();
        assert_eq!(iter.len(), 37);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 35);
    }

    #[test]
    fn iter_range_starts_mid_block() {
        let list = list_of(4, 100);
        let items: Vec<u32> = list.range(37, 58).unwrap().copied().collect();
        assert_eq!(items, (37..58).collect::<Vec<_>>());
        assert_eq!(list.range(37, 58).unwrap().len(), 21);
        assert_eq!(list.range(100, 100).unwrap().next(), None);
    }

    #[test]
    fn iter_empty() {
        let list = list_of(4, 0);
        assert_eq!(list.iter().next(), None);
    }

    #[test]
    fn traversal_walks_everything() {
        let list = list_of(8, 50);
        let mut walk = list.traversal();
        let mut seen = Vec::new();
        while let Some(item) = walk.next(&list).unwrap() {
            seen.push(*item);
        }
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
        assert_eq!(walk.position(), 50);
    }

    #[test]
    fn traversal_fails_after_insert() {
        let mut list = list_of(8, 10);
        let mut walk = list.traversal();
        assert_eq!(walk.next(&list), Ok(Some(&0)));

        let before = list.mod_count();
        list.insert(5, 99).unwrap();
        let err = walk.next(&list).unwrap_err();
        assert_eq!(
            err,
            SeqError::ConcurrentStructuralChange {
                expected: before,
                found: before + 1
            }
        );
        assert!(walk.is_abandoned());
    }

    #[test]
    fn traversal_stays_abandoned() {
        let mut list = list_of(8, 10);
        let mut walk = list.traversal();
        list.remove(0).unwrap();
        assert!(walk.next(&list).is_err());
        assert!(walk.next(&list).is_err());
    }

    #[test]
    fn traversal_ignores_set() {
        let mut list = list_of(8, 3);
        let mut walk = list.traversal();
        assert_eq!(walk.next(&list), Ok(Some(&0)));
        list.set(1, 42).unwrap();
        assert_eq!(walk.next(&list), Ok(Some(&42)));
    }
}
