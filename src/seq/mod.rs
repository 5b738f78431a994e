// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Block-organized sequences.
//!
//! - [`GapBlock`]: a bounded array segment with a movable gap
//! - [`BlockList`]: a balanced tree of gap blocks
//! - [`AccessCursor`]: the last-block-touched cache used by `BlockList`
//! - [`verify`]: the structural consistency checker

mod bulk;
pub mod cursor;
pub mod gap_block;
pub mod list;
pub mod traversal;
pub(crate) mod tree;
pub mod verify;

pub use cursor::AccessCursor;
pub use gap_block::GapBlock;
pub use list::BlockList;
pub use traversal::Iter;
pub use traversal::Traversal;
pub use verify::verify;

use crate::error::Result;

/// Positional storage as seen by layers built on top of a sequence.
pub trait Sequence<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    fn get(&self, index: usize) -> Result<&T>;

    /// Replace the element at `index`, returning the old one.
    fn set(&mut self, index: usize, value: T) -> Result<T>;

    fn insert(&mut self, index: usize, value: T) -> Result<()>;

    fn remove(&mut self, index: usize) -> Result<T>;

    /// Insert a run of elements at `index`, in order.
    fn insert_all(&mut self, index: usize, items: Vec<T>) -> Result<()>;

    /// Structural version; changes whenever elements are added, removed or
    /// reordered.
    fn mod_count(&self) -> u64;

    /// A fail-fast traversal from the first element.
    fn traversal(&self) -> Traversal {
        return Traversal::new(self.mod_count());
    }
}

impl<T: Clone> Sequence<T> for BlockList<T> {
    fn len(&self) -> usize {
        return BlockList::len(self);
    }

    fn get(&self, index: usize) -> Result<&T> {
        return BlockList::get(self, index);
    }

    fn set(&mut self, index: usize, value: T) -> Result<T> {
        return BlockList::set(self, index, value);
    }

    fn insert(&mut self, index: usize, value: T) -> Result<()> {
        return BlockList::insert(self, index, value);
    }

    fn remove(&mut self, index: usize) -> Result<T> {
        return BlockList::remove(self, index);
    }

    fn insert_all(&mut self, index: usize, items: Vec<T>) -> Result<()> {
        return BlockList::insert_all(self, index, items);
    }

    fn mod_count(&self) -> u64 {
        return BlockList::mod_count(self);
    }
}
