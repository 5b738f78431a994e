// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Access cursor caching for amortizing localized lookups.
//!
//! Sequential and localized access keeps hitting the same block. By caching
//! the last block touched together with the global index range it covers, a
//! lookup inside that range skips the count-comparing descent entirely and
//! just replays the recorded turns down to the leaf.
//!
//! The cursor never owns the block. It stores the leaf's path from the root
//! plus the tree generation at the time it was filled; every change to block
//! boundaries bumps the generation, so a stale cursor is detected by a
//! stamp comparison instead of ever following a path that no longer exists.
//!
//! # Usage Patterns
//!
//! ## Sequential scan
//! Reads at P, P+1, P+2, ... stay inside one block for `capacity` steps.
//!
//! ## Typing
//! Inserts at P, P+1, ... refresh the cursor to the same block each time.
//!
//! ## Random access
//! Cache miss: full descent, then the cursor is refilled.

/// Turns taken from the root to a leaf, one bit per level (set = right).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LeafPath {
    bits: u128,
    depth: u8,
}

impl LeafPath {
    /// The path of a list held in a single block.
    pub const ROOT: LeafPath = LeafPath { bits: 0, depth: 0 };

    /// Deepest path that can be recorded.
    pub const MAX_DEPTH: usize = 128;

    /// Extend the path by one level, or `None` past [`Self::MAX_DEPTH`].
    #[inline]
    pub fn step(self, right: bool) -> Option<LeafPath> {
        let depth = self.depth as usize;
        if depth >= Self::MAX_DEPTH {
            return None;
        }
        let bits = self.bits | (u128::from(right) << depth);
        return Some(LeafPath {
            bits,
            depth: self.depth + 1,
        });
    }

    #[inline]
    pub fn depth(&self) -> usize {
        return self.depth as usize;
    }

    /// Whether the turn at `level` goes right.
    #[inline]
    pub fn goes_right(&self, level: usize) -> bool {
        return (self.bits >> level) & 1 == 1;
    }
}

/// A cached `(leaf, start..end)` lookup result, stamped with a generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessCursor {
    /// Where the cached leaf sits in the tree.
    path: LeafPath,
    /// Global index of the leaf's first element.
    start: usize,
    /// Global index one past the leaf's last element.
    end: usize,
    /// Tree generation the entry was recorded at.
    generation: u64,
    /// Whether the cache holds an entry at all.
    valid: bool,
}

impl Default for AccessCursor {
    fn default() -> Self {
        return Self::new();
    }
}

impl AccessCursor {
    /// Create an empty cursor.
    pub const fn new() -> AccessCursor {
        return AccessCursor {
            path: LeafPath::ROOT,
            start: 0,
            end: 0,
            generation: 0,
            valid: false,
        };
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        return self.valid;
    }

    /// Whether the entry is still current for the given tree generation.
    #[inline]
    pub fn is_current(&self, generation: u64) -> bool {
        return self.valid && self.generation == generation;
    }

    /// Look up `index` in the cached range.
    ///
    /// Returns `(path, local_index)` on a hit, `None` when the entry is stale
    /// or does not cover `index`.
    #[inline]
    pub fn hit(&self, index: usize, generation: u64) -> Option<(LeafPath, usize)> {
        if !self.is_current(generation) {
            return None;
        }
        if index < self.start || index >= self.end {
            return None;
        }
        return Some((self.path, index - self.start));
    }

    /// Record a lookup result.
    #[inline]
    pub fn update(&mut self, path: LeafPath, start: usize, end: usize, generation: u64) {
        self.path = path;
        self.start = start;
        self.end = end;
        self.generation = generation;
        self.valid = true;
    }

    #[inline]
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    #[inline]
    pub fn path(&self) -> LeafPath {
        return self.path;
    }

    /// Cached global range as `(start, end)`.
    #[inline]
    pub fn range(&self) -> (usize, usize) {
        return (self.start, self.end);
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        return self.generation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(turns: &[bool]) -> LeafPath {
        let mut path = LeafPath::ROOT;
        for &right in turns {
            path = path.step(right).unwrap();
        }
        return path;
    }

    #[test]
    fn cursor_initially_invalid() {
        let cursor = AccessCursor::new();
        assert!(!cursor.is_valid());
        assert_eq!(cursor.hit(0, 0), None);
    }

    #[test]
    fn hit_inside_range() {
        let mut cursor = AccessCursor::new();
        let leaf = path(&[true, false, true]);
        cursor.update(leaf, 100, 150, 3);

        assert_eq!(cursor.hit(100, 3), Some((leaf, 0)));
        assert_eq!(cursor.hit(149, 3), Some((leaf, 49)));
        assert_eq!(cursor.hit(150, 3), None);
        assert_eq!(cursor.hit(99, 3), None);
    }

    #[test]
    fn stale_generation_misses() {
        let mut cursor = AccessCursor::new();
        cursor.update(path(&[false]), 0, 10, 3);

        assert!(cursor.is_current(3));
        assert!(!cursor.is_current(4));
        assert_eq!(cursor.hit(5, 4), None);
    }

    #[test]
    fn invalidate_clears() {
        let mut cursor = AccessCursor::new();
        cursor.update(LeafPath::ROOT, 0, 10, 0);
        cursor.invalidate();

        assert!(!cursor.is_valid());
        assert_eq!(cursor.hit(5, 0), None);
    }

    #[test]
    fn empty_range_never_hits() {
        let mut cursor = AccessCursor::new();
        cursor.update(LeafPath::ROOT, 0, 0, 0);
        assert_eq!(cursor.hit(0, 0), None);
    }

    #[test]
    fn path_records_turns() {
        let leaf = path(&[true, false, false, true]);
        assert_eq!(leaf.depth(), 4);
        assert!(leaf.goes_right(0));
        assert!(!leaf.goes_right(1));
        assert!(!leaf.goes_right(2));
        assert!(leaf.goes_right(3));
    }

    #[test]
    fn path_depth_is_bounded() {
        let mut leaf = LeafPath::ROOT;
        for _ in 0..LeafPath::MAX_DEPTH {
            leaf = leaf.step(true).unwrap();
        }
        assert_eq!(leaf.step(false), None);
    }
}
