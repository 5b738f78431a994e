// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Bulk operations
//!
//! Range insert, range remove, range replace and range copy. Each one either
//! fits inside a single block, or cuts the tree with `split`, builds or drops
//! the middle, and stitches the pieces back together with `join`. Cutting
//! through a block can leave small blocks on either side of the cut, so every
//! cut point is repaired before returning.

use tracing::debug;

use crate::error::Result;
use crate::error::SeqError;
use crate::error::check_insert_index;
use crate::error::check_range;
use crate::seq::list::BlockList;
use crate::seq::tree::build_subtree;
use crate::seq::tree::drain;
use crate::seq::tree::join;
use crate::seq::tree::split;

impl<T: Clone> BlockList<T> {
    /// Insert every element of `items` at `index`, preserving their order.
    ///
    /// Equivalent to inserting them one at a time at `index`, `index + 1`
    /// and so on.
    pub fn insert_all<I>(&mut self, index: usize, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        check_insert_index(index, self.len)?;
        let items: Vec<T> = items.into_iter().collect();
        let count = items.len();
        if count == 0 {
            return Ok(());
        }
        self.mod_count += 1;

        let (block, _) = self.find_leaf(index)?;
        if block.len() + count <= self.config.capacity_max {
            let (block, start, path) = self.descend_mut(index, count as isize);
            block.insert_range(index - start, items)?;
            let end = start + block.len();
            self.len += count;
            self.remember(path, start, end);
            return self.after_mutation();
        }

        debug!(index, count, len = self.len, "bulk insert through split and join");
        let root = self.take_root();
        let (front, back) = split(Some(root), index)?;
        let middle = build_subtree(items, self.config.capacity_max);
        let joined = join(join(front, middle)?, back)?;
        self.set_root(joined);
        self.len += count;
        self.generation += 1;

        self.repair_boundary(index)?;
        self.repair_boundary(index + count)?;
        return self.after_mutation();
    }

    /// Remove the elements in `from..to`, returning them in order.
    pub fn remove_range(&mut self, from: usize, to: usize) -> Result<Vec<T>> {
        check_range(from, to, self.len)?;
        let count = to - from;
        if count == 0 {
            return Ok(Vec::new());
        }
        self.mod_count += 1;

        let (block, start) = self.find_leaf(from)?;
        let leaf_len = block.len();
        let inside = to <= start + leaf_len;
        let left = leaf_len.saturating_sub(count);
        let outermost = start == 0 || start + leaf_len == self.len;
        let keeps_bounds =
            self.root.is_leaf() || left >= self.config.capacity_min || (outermost && left > 0);
        if inside && keeps_bounds {
            let (block, start, path) = self.descend_mut(from, -(count as isize));
            let removed = block.remove_range(from - start, to - start)?;
            let end = start + block.len();
            self.len -= count;
            self.remember(path, start, end);
            self.after_mutation()?;
            return Ok(removed);
        }

        debug!(from, to, len = self.len, "bulk remove through split and join");
        let root = self.take_root();
        let (front, rest) = split(Some(root), from)?;
        let (middle, back) = split(rest, count)?;
        let removed = drain(middle);
        self.set_root(join(front, back)?);
        self.len -= count;
        self.generation += 1;

        self.repair_boundary(from)?;
        self.after_mutation()?;
        return Ok(removed);
    }

    /// Copy the elements in `from..to` into a new, independent list.
    ///
    /// The copy shares every subtree wholly inside the range with this list;
    /// whichever list writes to a shared block first gets its own copy. Only
    /// the nodes along the two cuts and the two partial blocks at the ends
    /// are copied up front.
    pub fn copy_range(&self, from: usize, to: usize) -> Result<BlockList<T>> {
        check_range(from, to, self.len)?;
        if from == 0 && to == self.len {
            return Ok(self.clone());
        }
        let mut out = BlockList::from_config(self.config);
        if from == to {
            return Ok(out);
        }

        let (_, rest) = split(Some(self.root.clone()), from)?;
        let (middle, _) = split(rest, to - from)?;
        out.set_root(middle);
        out.len = to - from;
        debug!(from, to, blocks = out.block_count(), "copied range");

        // The cuts only ever shorten what become the copy's outermost blocks.
        out.after_mutation()?;
        return Ok(out);
    }

    /// Alias for [`Self::copy_range`].
    pub fn get_all(&self, from: usize, to: usize) -> Result<BlockList<T>> {
        return self.copy_range(from, to);
    }

    /// Swap the elements in `from..to` for `items`, which must be just as
    /// many.
    pub(crate) fn replace_range(&mut self, from: usize, to: usize, items: Vec<T>) -> Result<()> {
        if items.len() != to - from {
            return Err(SeqError::invariant(format!(
                "replacing {} elements with {}",
                to - from,
                items.len()
            )));
        }
        if from == to {
            return self.after_mutation();
        }

        let root = self.take_root();
        let (front, rest) = split(Some(root), from)?;
        let (_, back) = split(rest, to - from)?;
        let middle = build_subtree(items, self.config.capacity_max);
        self.set_root(join(join(front, middle)?, back)?);
        self.generation += 1;

        self.repair_boundary(from)?;
        self.repair_boundary(to)?;
        return self.after_mutation();
    }

    /// Whether the leaf covering `start..start + len` is below the minimum.
    /// The first and last leaves of the list are exempt.
    fn is_short(&self, start: usize, len: usize) -> bool {
        return len < self.config.capacity_min && start != 0 && start + len != self.len;
    }

    /// Bring the blocks on both sides of global position `index` back
    /// within bounds.
    ///
    /// If either block next to the cut is short, the run made of both
    /// (extended by neighbours while it is still too small) is drained and
    /// rebuilt as evenly filled blocks.
    fn repair_boundary(&mut self, index: usize) -> Result<()> {
        if self.root.is_leaf() {
            return Ok(());
        }
        let min = self.config.capacity_min;
        let mut lo = index;
        let mut hi = index;
        let mut short = false;

        if index > 0 {
            let (block, start, _) = self.locate(index - 1);
            let len = block.len();
            short |= self.is_short(start, len);
            lo = start;
            hi = hi.max(start + len);
        }
        if index < self.len {
            let (block, start, _) = self.locate(index);
            let len = block.len();
            short |= self.is_short(start, len);
            lo = lo.min(start);
            hi = start + len;
        }
        if !short {
            return Ok(());
        }

        while hi - lo < min {
            if hi < self.len {
                let (block, start, _) = self.locate(hi);
                hi = start + block.len();
            } else if lo > 0 {
                let (_, start, _) = self.locate(lo - 1);
                lo = start;
            } else {
                break;
            }
        }

        debug!(index, lo, hi, "rebuilding blocks around cut");
        let root = self.take_root();
        let (front, rest) = split(Some(root), lo)?;
        let (run, back) = split(rest, hi - lo)?;
        let rebuilt = build_subtree(drain(run), self.config.capacity_max);
        let joined = join(join(front, rebuilt)?, back)?;
        if joined.is_none() {
            return Err(SeqError::invariant("boundary repair emptied a non-empty list"));
        }
        self.set_root(joined);
        self.generation += 1;
        return Ok(());
    }
}
