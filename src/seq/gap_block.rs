// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Gap Block
//!
//! A bounded array segment holding a run of elements around a single movable
//! gap of unused slots. Inserting or removing at local index `i` first moves
//! the gap to `i`, shifting only the elements between the old and the new gap
//! position, and then costs O(1). Repeated edits at or near the same position
//! therefore run in O(1) amortized.
//!
//! ```text
//! slots:  [a][b][c][ ][ ][ ][d][e]
//!                  ^gap_start
//!                  |<-gap_len->|
//! logical: a b c d e
//! ```
//!
//! The slot vector grows on demand but never beyond `capacity_max`. A full
//! block rejects inserts with `CapacityExceeded`; the owning tree splits it
//! first.

use crate::error::Result;
use crate::error::SeqError;
use crate::error::check_index;
use crate::error::check_insert_index;
use crate::error::check_range;

/// Initial slot allocation for blocks created without a hint.
const INITIAL_SLOTS: usize = 8;

/// A bounded gap buffer.
#[derive(Clone, Debug)]
pub struct GapBlock<T> {
    /// Element storage. Slots inside the gap are `None`, all others `Some`.
    slots: Vec<Option<T>>,
    /// Physical index of the first gap slot.
    gap_start: usize,
    /// Number of gap slots.
    gap_len: usize,
    /// Upper bound on the element count.
    capacity_max: usize,
}

impl<T> GapBlock<T> {
    /// Create an empty block that may hold up to `capacity_max` elements.
    pub fn new(capacity_max: usize) -> GapBlock<T> {
        return GapBlock {
            slots: Vec::new(),
            gap_start: 0,
            gap_len: 0,
            capacity_max,
        };
    }

    /// Create an empty block with `hint` slots allocated up front.
    pub fn with_capacity(hint: usize, capacity_max: usize) -> GapBlock<T> {
        let mut block = GapBlock::new(capacity_max);
        block.reserve(hint.min(capacity_max));
        return block;
    }

    /// Build a block from a run of elements, with no gap.
    pub fn from_vec(items: Vec<T>, capacity_max: usize) -> Result<GapBlock<T>> {
        if items.len() > capacity_max {
            return Err(SeqError::CapacityExceeded { capacity: capacity_max });
        }
        return Ok(GapBlock::from_chunk(items, capacity_max));
    }

    /// Build a block from a run the caller has already sized to fit.
    pub(crate) fn from_chunk(items: Vec<T>, capacity_max: usize) -> GapBlock<T> {
        debug_assert!(items.len() <= capacity_max);
        let slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        let len = slots.len();
        return GapBlock {
            slots,
            gap_start: len,
            gap_len: 0,
            capacity_max,
        };
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        return self.slots.len() - self.gap_len;
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        return self.len() >= self.capacity_max;
    }

    #[inline(always)]
    pub fn capacity_max(&self) -> usize {
        return self.capacity_max;
    }

    /// Remaining room before the block is full.
    #[inline(always)]
    pub fn spare(&self) -> usize {
        return self.capacity_max - self.len();
    }

    /// Current gap position as a local index.
    #[inline(always)]
    pub fn gap_position(&self) -> usize {
        return self.gap_start;
    }

    /// Map a local index to its slot.
    #[inline(always)]
    fn physical(&self, index: usize) -> usize {
        if index < self.gap_start {
            return index;
        }
        return index + self.gap_len;
    }

    /// Move the gap so that it starts at local index `to`.
    ///
    /// Costs O(|to - gap_start|); gap slots are `None`, so swapping them
    /// with the elements in between is all the shifting needed.
    fn move_gap(&mut self, to: usize) {
        if self.gap_len == 0 {
            self.gap_start = to;
            return;
        }
        if to < self.gap_start {
            for i in (to..self.gap_start).rev() {
                self.slots.swap(i, i + self.gap_len);
            }
        } else {
            for i in self.gap_start..to {
                self.slots.swap(i + self.gap_len, i);
            }
        }
        self.gap_start = to;
    }

    /// Make sure the gap has room for `additional` more elements.
    fn reserve(&mut self, additional: usize) {
        if self.gap_len >= additional {
            return;
        }
        let len = self.len();
        let wanted = (len + additional)
            .max(self.slots.len() * 2)
            .max(INITIAL_SLOTS)
            .min(self.capacity_max)
            .max(len + additional);
        // Park the gap at the end so the new slots extend it.
        self.move_gap(len);
        self.slots.resize_with(wanted, || None);
        self.gap_len = wanted - len;
    }

    /// Take the element out of a slot that must be occupied.
    fn take_slot(&mut self, slot: usize) -> Result<T> {
        return self.slots[slot]
            .take()
            .ok_or_else(|| SeqError::invariant(format!("gap block slot {} is empty", slot)));
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        check_index(index, self.len())?;
        return self.slots[self.physical(index)]
            .as_ref()
            .ok_or_else(|| SeqError::invariant(format!("gap block slot for {} is empty", index)));
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        check_index(index, self.len())?;
        let slot = self.physical(index);
        return self.slots[slot]
            .as_mut()
            .ok_or_else(|| SeqError::invariant(format!("gap block slot {} is empty", slot)));
    }

    /// Replace the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        let current = self.get_mut(index)?;
        return Ok(std::mem::replace(current, value));
    }

    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        check_insert_index(index, self.len())?;
        if self.is_full() {
            return Err(SeqError::CapacityExceeded { capacity: self.capacity_max });
        }
        self.reserve(1);
        self.move_gap(index);
        self.slots[index] = Some(value);
        self.gap_start += 1;
        self.gap_len -= 1;
        return Ok(());
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        check_index(index, self.len())?;
        self.move_gap(index);
        // The element now sits right after the gap.
        let value = self.take_slot(index + self.gap_len)?;
        self.gap_len += 1;
        return Ok(value);
    }

    /// Insert a run of elements starting at `index`.
    pub fn insert_range(&mut self, index: usize, items: Vec<T>) -> Result<()> {
        check_insert_index(index, self.len())?;
        if items.len() > self.spare() {
            return Err(SeqError::CapacityExceeded { capacity: self.capacity_max });
        }
        self.reserve(items.len());
        self.move_gap(index);
        for item in items {
            self.slots[self.gap_start] = Some(item);
            self.gap_start += 1;
            self.gap_len -= 1;
        }
        return Ok(());
    }

    /// Remove the elements in `from..to`, returning them in order.
    pub fn remove_range(&mut self, from: usize, to: usize) -> Result<Vec<T>> {
        check_range(from, to, self.len())?;
        self.move_gap(from);
        let mut removed = Vec::with_capacity(to - from);
        for _ in from..to {
            let slot = self.gap_start + self.gap_len;
            removed.push(self.take_slot(slot)?);
            self.gap_len += 1;
        }
        return Ok(removed);
    }

    /// Split off the elements from `at` onward into a new block.
    pub fn split_off(&mut self, at: usize) -> Result<GapBlock<T>> {
        let len = self.len();
        check_insert_index(at, len)?;
        let tail = self.remove_range(at, len)?;
        return GapBlock::from_vec(tail, self.capacity_max);
    }

    /// Split into two blocks at `at`, consuming this one.
    pub fn split_at(mut self, at: usize) -> Result<(GapBlock<T>, GapBlock<T>)> {
        let right = self.split_off(at)?;
        return Ok((self, right));
    }

    /// Append every element of `other` to this block.
    pub fn merge_with(&mut self, other: GapBlock<T>) -> Result<()> {
        if other.len() > self.spare() {
            return Err(SeqError::CapacityExceeded { capacity: self.capacity_max });
        }
        let len = self.len();
        return self.insert_range(len, other.into_vec());
    }

    /// Drop all elements, keeping the slot allocation.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.gap_start = 0;
        self.gap_len = self.slots.len();
    }

    /// Consume the block, returning its elements in order.
    pub fn into_vec(self) -> Vec<T> {
        return self.slots.into_iter().flatten().collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (front, rest) = self.slots.split_at(self.gap_start);
        let back = &rest[self.gap_len..];
        return front.iter().chain(back.iter()).filter_map(Option::as_ref);
    }

    /// Check the slot layout: gap in bounds, gap slots empty, all others filled.
    pub fn check(&self) -> Result<()> {
        if self.gap_start + self.gap_len > self.slots.len() {
            return Err(SeqError::invariant(format!(
                "gap {}+{} exceeds {} slots",
                self.gap_start,
                self.gap_len,
                self.slots.len()
            )));
        }
        if self.len() > self.capacity_max {
            return Err(SeqError::invariant(format!(
                "block holds {} elements, maximum is {}",
                self.len(),
                self.capacity_max
            )));
        }
        for (slot, value) in self.slots.iter().enumerate() {
            let in_gap = slot >= self.gap_start && slot < self.gap_start + self.gap_len;
            if in_gap == value.is_some() {
                return Err(SeqError::invariant(format!(
                    "slot {} occupancy does not match gap {}+{}",
                    slot, self.gap_start, self.gap_len
                )));
            }
        }
        return Ok(());
    }
}

impl<T: Clone> GapBlock<T> {
    /// Copy the elements in `from..to` into a new block with the same bound.
    pub fn copy_range(&self, from: usize, to: usize) -> Result<GapBlock<T>> {
        check_range(from, to, self.len())?;
        let items: Vec<T> = self.iter().skip(from).take(to - from).cloned().collect();
        return GapBlock::from_vec(items, self.capacity_max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(block: &GapBlock<u32>) -> Vec<u32> {
        return block.iter().copied().collect();
    }

    #[test]
    fn empty_block() {
        let block: GapBlock<u32> = GapBlock::new(16);
        assert_eq!(block.len(), 0);
        assert!(block.is_empty());
        assert!(block.get(0).is_err());
        assert!(block.check().is_ok());
    }

    #[test]
    fn insert_and_get() {
        let mut block = GapBlock::new(16);
        block.insert(0, 1).unwrap();
        block.insert(1, 3).unwrap();
        block.insert(1, 2).unwrap();
        assert_eq!(contents(&block), vec![1, 2, 3]);
        assert_eq!(block.get(1), Ok(&2));
        assert!(block.check().is_ok());
    }

    #[test]
    fn insert_far_from_gap() {
        let mut block = GapBlock::new(32);
        for i in 0..10 {
            block.insert(i, i as u32).unwrap();
        }
        block.insert(0, 100).unwrap();
        block.insert(11, 200).unwrap();
        block.insert(5, 300).unwrap();
        assert_eq!(contents(&block), vec![100, 0, 1, 2, 3, 300, 4, 5, 6, 7, 8, 9, 200]);
        assert!(block.check().is_ok());
    }

    #[test]
    fn sequential_edits_keep_gap_local() {
        let mut block = GapBlock::new(64);
        for i in 0..20 {
            block.insert(i, i as u32).unwrap();
        }
        block.insert(10, 99).unwrap();
        assert_eq!(block.gap_position(), 11);
        block.insert(11, 98).unwrap();
        assert_eq!(block.gap_position(), 12);
        block.remove(11).unwrap();
        assert_eq!(block.gap_position(), 11);
    }

    #[test]
    fn remove_returns_element() {
        let mut block = GapBlock::from_vec(vec![1, 2, 3, 4], 8).unwrap();
        assert_eq!(block.remove(1), Ok(2));
        assert_eq!(block.remove(2), Ok(4));
        assert_eq!(contents(&block), vec![1, 3]);
        assert!(block.check().is_ok());
    }

    #[test]
    fn index_errors() {
        let mut block = GapBlock::from_vec(vec![1, 2], 8).unwrap();
        assert_eq!(block.get(2), Err(SeqError::out_of_range(2, 2)));
        assert_eq!(block.insert(3, 0), Err(SeqError::out_of_range(3, 2)));
        assert_eq!(block.remove(2), Err(SeqError::out_of_range(2, 2)));
        assert!(block.set(5, 0).is_err());
    }

    #[test]
    fn full_block_rejects_insert() {
        let mut block = GapBlock::from_vec(vec![1, 2, 3, 4], 4).unwrap();
        assert!(block.is_full());
        assert_eq!(block.insert(0, 0), Err(SeqError::CapacityExceeded { capacity: 4 }));
        assert_eq!(contents(&block), vec![1, 2, 3, 4]);
    }

    #[test]
    fn from_vec_rejects_oversize() {
        let result = GapBlock::from_vec(vec![1, 2, 3], 2);
        assert!(matches!(result, Err(SeqError::CapacityExceeded { capacity: 2 })));
    }

    #[test]
    fn set_replaces() {
        let mut block = GapBlock::from_vec(vec![1, 2, 3], 8).unwrap();
        block.insert(1, 9).unwrap();
        assert_eq!(block.set(2, 7), Ok(2));
        assert_eq!(contents(&block), vec![1, 9, 7, 3]);
    }

    #[test]
    fn range_operations() {
        let mut block = GapBlock::from_vec(vec![0, 1, 2, 3, 4, 5], 16).unwrap();
        block.insert_range(3, vec![10, 11, 12]).unwrap();
        assert_eq!(contents(&block), vec![0, 1, 2, 10, 11, 12, 3, 4, 5]);

        let removed = block.remove_range(1, 4).unwrap();
        assert_eq!(removed, vec![1, 2, 10]);
        assert_eq!(contents(&block), vec![0, 11, 12, 3, 4, 5]);
        assert!(block.check().is_ok());

        assert!(block.insert_range(0, vec![0; 11]).is_err());
        assert!(block.remove_range(4, 2).is_err());
    }

    #[test]
    fn split_and_merge() {
        let mut block = GapBlock::from_vec((0..10).collect(), 16).unwrap();
        block.insert(3, 100).unwrap();
        let right = block.split_off(6).unwrap();
        assert_eq!(contents(&block), vec![0, 1, 2, 100, 3, 4]);
        assert_eq!(contents(&right), vec![5, 6, 7, 8, 9]);
        assert!(block.check().is_ok());
        assert!(right.check().is_ok());

        block.merge_with(right).unwrap();
        assert_eq!(contents(&block), vec![0, 1, 2, 100, 3, 4, 5, 6, 7, 8, 9]);
        assert!(block.check().is_ok());
    }

    #[test]
    fn split_at_consumes() {
        let block = GapBlock::from_vec(vec![1, 2, 3, 4], 8).unwrap();
        let (left, right) = block.split_at(1).unwrap();
        assert_eq!(contents(&left), vec![1]);
        assert_eq!(contents(&right), vec![2, 3, 4]);
    }

    #[test]
    fn merge_respects_capacity() {
        let mut left = GapBlock::from_vec(vec![1, 2, 3], 4).unwrap();
        let right = GapBlock::from_vec(vec![4, 5], 4).unwrap();
        assert!(matches!(left.merge_with(right), Err(SeqError::CapacityExceeded { .. })));
    }

    #[test]
    fn copy_range_clones() {
        let block = GapBlock::from_vec(vec![1, 2, 3, 4, 5], 8).unwrap();
        let copy = block.copy_range(1, 4).unwrap();
        assert_eq!(contents(&copy), vec![2, 3, 4]);
        assert_eq!(block.len(), 5);
    }

    #[test]
    fn clear_keeps_working() {
        let mut block = GapBlock::from_vec(vec![1, 2, 3], 8).unwrap();
        block.clear();
        assert!(block.is_empty());
        block.insert(0, 7).unwrap();
        assert_eq!(contents(&block), vec![7]);
        assert!(block.check().is_ok());
    }

    #[test]
    fn presized_block_returns_new_values() {
        let mut block = GapBlock::with_capacity(100, 100);
        for i in 0..10 {
            block.insert(i, i as u32).unwrap();
        }
        for i in 0..10 {
            assert_eq!(block.get(i), Ok(&(i as u32)));
        }
        assert!(block.get(10).is_err());
    }
}
