// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Block List
//!
//! The public face of the block tree: a positional sequence that stays a
//! single gap block while small and grows into a balanced tree of blocks
//! once it outgrows one.
//!
//! Operations:
//! - get/set: a cursor hit replays the cached path, a miss descends by count
//! - insert/remove: O(log n) count updates plus O(distance) gap movement
//!   inside the target block
//! - len: O(1)
//! - clone: O(1), every block and branch is shared until written
//!
//! Growth at either end of the list fills the outermost block nearly full and
//! then starts a new one, so pushing or prepending a long run packs blocks
//! tightly. Splits in half are reserved for inserts in the middle.
//!
//! Mutations that keep every block boundary in place refresh the access
//! cursor to the block they touched. Splits, merges, borrows and bulk
//! operations bump the tree generation instead, which retires the cursor.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;

use tracing::error;

use crate::config::BlockConfig;
use crate::error::Result;
use crate::error::check_index;
use crate::error::check_insert_index;
use crate::error::check_range;
use crate::search::SearchBias;
use crate::search::SearchResult;
use crate::search::binary_search_by;
use crate::seq::cursor::AccessCursor;
use crate::seq::cursor::LeafPath;
use crate::seq::gap_block::GapBlock;
use crate::seq::traversal::Iter;
use crate::seq::traversal::Traversal;
use crate::seq::tree::Edge;
use crate::seq::tree::Node;
use crate::seq::tree::build_subtree;
use crate::seq::verify;
use crate::value::ValueOrd;

/// A sequence stored as a balanced tree of gap blocks.
#[derive(Clone)]
pub struct BlockList<T> {
    /// Tree root. A list always has at least one (possibly empty) leaf.
    pub(crate) root: Node<T>,
    /// Total number of elements.
    pub(crate) len: usize,
    /// Block bounds, fixed for the lifetime of the list.
    pub(crate) config: BlockConfig,
    /// Last block touched.
    pub(crate) cursor: Cell<AccessCursor>,
    /// Bumped whenever block boundaries change.
    pub(crate) generation: u64,
    /// Bumped by every mutation that adds, removes or reorders elements.
    pub(crate) mod_count: u64,
}

impl<T: Clone> BlockList<T> {
    /// Create an empty list with default block bounds.
    pub fn new() -> BlockList<T> {
        return BlockList::from_config(BlockConfig::default());
    }

    /// Create an empty list whose first block pre-allocates `hint` slots.
    ///
    /// The hint only affects allocation; the list is still empty.
    pub fn with_capacity(hint: usize) -> BlockList<T> {
        let config = BlockConfig::default();
        let mut list = BlockList::from_config(config);
        list.root = Node::leaf(GapBlock::with_capacity(hint, config.capacity_max));
        return list;
    }

    /// Create an empty list with custom block bounds.
    pub fn with_config(config: BlockConfig) -> Result<BlockList<T>> {
        config.validate()?;
        return Ok(BlockList::from_config(config));
    }

    pub(crate) fn from_config(config: BlockConfig) -> BlockList<T> {
        return BlockList {
            root: Node::leaf(GapBlock::new(config.capacity_max)),
            len: 0,
            config,
            cursor: Cell::new(AccessCursor::new()),
            generation: 0,
            mod_count: 0,
        };
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        return self.len;
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    pub fn config(&self) -> &BlockConfig {
        return &self.config;
    }

    /// Structural version, bumped by every insert, remove and reorder.
    #[inline(always)]
    pub fn mod_count(&self) -> u64 {
        return self.mod_count;
    }

    /// Tree height; a list held in one block has height 0.
    pub fn height(&self) -> usize {
        return self.root.height() as usize;
    }

    /// Number of blocks currently in use.
    pub fn block_count(&self) -> usize {
        return self.root.leaf_count();
    }

    // --- Cursor ---

    /// Find the leaf holding `index`, trying the access cursor first.
    ///
    /// Returns the leaf's block and the global index of its first element.
    pub(crate) fn find_leaf(&self, index: usize) -> Result<(&GapBlock<T>, usize)> {
        if let Some((path, local)) = self.cursor.get().hit(index, self.generation) {
            return Ok((self.follow(path)?, index - local));
        }
        let (block, start, path) = self.locate(index);
        self.remember(path, start, start + block.len());
        return Ok((block, start));
    }

    /// Point the cursor at the leaf reached by `path`, covering `start..end`.
    pub(crate) fn remember(&self, path: Option<LeafPath>, start: usize, end: usize) {
        let mut cursor = self.cursor.get();
        match path {
            Some(path) => cursor.update(path, start, end, self.generation),
            None => cursor.invalidate(),
        }
        self.cursor.set(cursor);
    }

    /// Run the verifier if checking is enabled for this list.
    pub(crate) fn after_mutation(&self) -> Result<()> {
        if !self.config.checks_enabled() {
            return Ok(());
        }
        if let Err(err) = verify::verify(self) {
            error!(%err, len = self.len, "structural verification failed");
            return Err(err);
        }
        return Ok(());
    }

    /// Replace the whole contents with `items`.
    pub(crate) fn rebuild(&mut self, items: Vec<T>) {
        self.len = items.len();
        let root = build_subtree(items, self.config.capacity_max);
        self.set_root(root);
        self.generation += 1;
        self.cursor.set(AccessCursor::new());
    }

    /// Which end of the list an insert at `index` grows, if any.
    fn edge_at(&self, index: usize) -> Option<Edge> {
        if index == self.len {
            return Some(Edge::Back);
        }
        if index == 0 {
            return Some(Edge::Front);
        }
        return None;
    }

    // --- Core operations ---

    pub fn get(&self, index: usize) -> Result<&T> {
        check_index(index, self.len)?;
        let (block, start) = self.find_leaf(index)?;
        return block.get(index - start);
    }

    /// Mutable access to one element. Copies the block first if it is shared.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        check_index(index, self.len)?;
        let (block, start, _) = self.descend_mut(index, 0);
        return block.get_mut(index - start);
    }

    /// Replace the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        check_index(index, self.len)?;
        let (block, start, path) = self.descend_mut(index, 0);
        let old = block.set(index - start, value)?;
        let end = start + block.len();
        self.remember(path, start, end);
        self.after_mutation()?;
        return Ok(old);
    }

    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        check_insert_index(index, self.len)?;
        let edge = self.edge_at(index);
        let limit = match edge {
            Some(_) => self.config.edge_fill(),
            None => self.config.capacity_max,
        };
        let (block, _) = self.find_leaf(index)?;
        let in_place = block.len() < limit;
        self.mod_count += 1;

        if in_place {
            let (block, start, path) = self.descend_mut(index, 1);
            block.insert(index - start, value)?;
            let end = start + block.len();
            self.len += 1;
            self.remember(path, start, end);
        } else {
            let root = self.take_root();
            self.root = self.insert_rec(root, index, value, edge)?;
            self.len += 1;
            self.generation += 1;
        }
        return self.after_mutation();
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        check_index(index, self.len)?;
        let (block, start) = self.find_leaf(index)?;
        let leaf_len = block.len();
        let outermost = start == 0 || start + leaf_len == self.len;
        let in_place =
            self.root.is_leaf() || leaf_len > self.config.capacity_min || (outermost && leaf_len > 1);
        self.mod_count += 1;

        let value;
        if in_place {
            let (block, start, path) = self.descend_mut(index, -1);
            value = block.remove(index - start)?;
            let end = start + block.len();
            self.len -= 1;
            self.remember(path, start, end);
        } else {
            let root = self.take_root();
            let (root, removed) = self.remove_rec(root, index, true, true)?;
            self.root = root;
            value = removed;
            self.len -= 1;
            self.generation += 1;
        }
        self.after_mutation()?;
        return Ok(value);
    }

    pub fn push(&mut self, value: T) -> Result<()> {
        return self.insert(self.len, value);
    }

    pub fn pop(&mut self) -> Result<Option<T>> {
        if self.len == 0 {
            return Ok(None);
        }
        return self.remove(self.len - 1).map(Some);
    }

    pub fn push_front(&mut self, value: T) -> Result<()> {
        return self.insert(0, value);
    }

    pub fn pop_front(&mut self) -> Result<Option<T>> {
        if self.len == 0 {
            return Ok(None);
        }
        return self.remove(0).map(Some);
    }

    pub fn first(&self) -> Option<&T> {
        return self.get(0).ok();
    }

    pub fn last(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        return self.get(self.len - 1).ok();
    }

    /// Remove every element. Blocks shared with other lists are left alone.
    pub fn clear(&mut self) {
        self.mod_count += 1;
        self.rebuild(Vec::new());
    }

    pub fn iter(&self) -> Iter<'_, T> {
        return Iter::new(self, 0, self.len);
    }

    /// Iterate over the elements in `from..to`.
    pub fn range(&self, from: usize, to: usize) -> Result<Iter<'_, T>> {
        check_range(from, to, self.len)?;
        return Ok(Iter::new(self, from, to));
    }

    /// Start a fail-fast traversal; see [`Traversal`].
    pub fn traversal(&self) -> Traversal {
        return Traversal::new(self.mod_count);
    }

    pub fn to_vec(&self) -> Vec<T> {
        return self.iter().cloned().collect();
    }

    // --- Ordering ---

    /// Stable sort with a caller-supplied comparison.
    pub fn sort_by<F>(&mut self, compare: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let len = self.len;
        return self.sort_range_by(0, len, compare);
    }

    /// Stable sort of the elements in `from..to`, leaving the rest in place.
    ///
    /// The list is only touched once the sorted run is ready, so a panicking
    /// comparison leaves it as it was.
    pub fn sort_range_by<F>(&mut self, from: usize, to: usize, compare: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        check_range(from, to, self.len)?;
        let mut items: Vec<T> = self.range(from, to)?.cloned().collect();
        items.sort_by(compare);
        self.mod_count += 1;
        return self.replace_range(from, to, items);
    }

    /// Binary search over a list sorted consistently with `order`.
    ///
    /// `order` returns the ordering of an element relative to the target.
    /// `bias` fixes which match is reported when several elements compare
    /// equal.
    pub fn binary_search_by<F>(&self, bias: SearchBias, order: F) -> Result<SearchResult>
    where
        F: FnMut(&T) -> Ordering,
    {
        return self.binary_search_range_by(0, self.len, bias, order);
    }

    /// Binary search restricted to `from..to`, which must be sorted.
    ///
    /// Reported positions are indices into the whole list.
    pub fn binary_search_range_by<F>(
        &self,
        from: usize,
        to: usize,
        bias: SearchBias,
        mut order: F,
    ) -> Result<SearchResult>
    where
        F: FnMut(&T) -> Ordering,
    {
        check_range(from, to, self.len)?;
        let found = binary_search_by(to - from, bias, |offset| {
            let element = self.get(from + offset)?;
            return Ok(order(element));
        })?;
        return Ok(found.offset(from));
    }
}

impl<T: Clone + ValueOrd> BlockList<T> {
    /// Stable ascending sort by the element type's value ordering.
    ///
    /// For floating-point elements NaN sorts after every number.
    pub fn sort(&mut self) -> Result<()> {
        return self.sort_by(|a, b| a.value_cmp(b));
    }

    pub fn sort_range(&mut self, from: usize, to: usize) -> Result<()> {
        return self.sort_range_by(from, to, |a, b| a.value_cmp(b));
    }

    /// Leftmost binary search for `key` in a list sorted by [`Self::sort`].
    pub fn binary_search(&self, key: &T) -> Result<SearchResult> {
        return self.binary_search_by(SearchBias::Leftmost, |element| element.value_cmp(key));
    }

    /// Leftmost binary search for `key` within `from..to`.
    pub fn binary_search_range(&self, from: usize, to: usize, key: &T) -> Result<SearchResult> {
        return self.binary_search_range_by(from, to, SearchBias::Leftmost, |element| {
            element.value_cmp(key)
        });
    }

    pub fn index_of(&self, value: &T) -> Option<usize> {
        return self.iter().position(|element| element.value_eq(value));
    }

    pub fn last_index_of(&self, value: &T) -> Option<usize> {
        let mut found = None;
        for (index, element) in self.iter().enumerate() {
            if element.value_eq(value) {
                found = Some(index);
            }
        }
        return found;
    }

    pub fn contains(&self, value: &T) -> bool {
        return self.index_of(value).is_some();
    }
}

impl<T: Clone> Default for BlockList<T> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T: Clone + ValueOrd> PartialEq for BlockList<T> {
    /// Element-wise equality under the element type's value semantics.
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        return self.iter().zip(other.iter()).all(|(a, b)| a.value_eq(b));
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for BlockList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}

impl<T: Clone> FromIterator<T> for BlockList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = BlockList::new();
        list.rebuild(iter.into_iter().collect());
        return list;
    }
}

impl<'a, T: Clone> IntoIterator for &'a BlockList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        return self.iter();
    }
}
