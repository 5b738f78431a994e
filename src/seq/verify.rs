// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Structural verifier
//!
//! Recomputes everything the tree caches and compares:
//! - per branch: left count, total count, height, balance within -1..=1
//! - per leaf: gap layout, block bound, occupancy within the configured
//!   bounds (the first and last leaves only need to be non-empty, the sole
//!   leaf of a list may be empty)
//! - whole list: element total, no node reached twice, access cursor range

use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::error::SeqError;
use crate::seq::list::BlockList;
use crate::seq::tree::Node;

/// Check every structural invariant of `list`.
///
/// Returns [`SeqError::InternalInvariantViolation`] describing the first
/// mismatch found.
pub fn verify<T: Clone>(list: &BlockList<T>) -> Result<()> {
    let mut visited = FxHashSet::default();
    let (total, _) = walk(list, &list.root, true, true, &mut visited)?;

    if total != list.len {
        return Err(SeqError::invariant(format!(
            "leaf counts sum to {} but length is {}",
            total, list.len
        )));
    }

    check_cursor(list)?;
    return Ok(());
}

/// Returns `(element count, height)` of the subtree at `node`.
///
/// `front` and `back` say whether the subtree holds the list's first or last
/// leaf.
fn walk<T: Clone>(
    list: &BlockList<T>,
    node: &Node<T>,
    front: bool,
    back: bool,
    visited: &mut FxHashSet<usize>,
) -> Result<(usize, u32)> {
    let addr = node.addr();
    if !visited.insert(addr) {
        return Err(SeqError::invariant(format!("node {:#x} reachable twice", addr)));
    }

    return match node {
        Node::Leaf(block) => {
            block.check()?;
            let config = list.config();
            if block.capacity_max() != config.capacity_max {
                return Err(SeqError::invariant(format!(
                    "leaf {:#x} has bound {}, list uses {}",
                    addr,
                    block.capacity_max(),
                    config.capacity_max
                )));
            }
            let len = block.len();
            let sole = front && back;
            let floor = match (sole, front || back) {
                (true, _) => 0,
                (false, true) => 1,
                (false, false) => config.capacity_min,
            };
            if len < floor || len > config.capacity_max {
                return Err(SeqError::invariant(format!(
                    "leaf {:#x} holds {} outside {}..={}",
                    addr, len, floor, config.capacity_max
                )));
            }
            Ok((len, 0))
        }
        Node::Branch(branch) => {
            let (left_len, left_height) = walk(list, &branch.left, front, false, visited)?;
            let (right_len, right_height) = walk(list, &branch.right, false, back, visited)?;

            if branch.left_count != left_len {
                return Err(SeqError::invariant(format!(
                    "branch {:#x} caches left count {}, actual {}",
                    addr, branch.left_count, left_len
                )));
            }
            if branch.len != left_len + right_len {
                return Err(SeqError::invariant(format!(
                    "branch {:#x} caches count {}, actual {}",
                    addr,
                    branch.len,
                    left_len + right_len
                )));
            }
            let height = 1 + left_height.max(right_height);
            if branch.height != height {
                return Err(SeqError::invariant(format!(
                    "branch {:#x} caches height {}, actual {}",
                    addr, branch.height, height
                )));
            }
            if left_height.abs_diff(right_height) > 1 {
                return Err(SeqError::invariant(format!(
                    "branch {:#x} unbalanced: heights {} and {}",
                    addr, left_height, right_height
                )));
            }
            Ok((branch.len, height))
        }
    };
}

/// A current cursor must lead to a live leaf and record its true range.
fn check_cursor<T: Clone>(list: &BlockList<T>) -> Result<()> {
    let cursor = list.cursor.get();
    if !cursor.is_current(list.generation) {
        return Ok(());
    }
    let leaf = list.follow(cursor.path())?;
    let (start, end) = cursor.range();
    if end - start != leaf.len() {
        return Err(SeqError::invariant(format!(
            "cursor range {}..{} does not match a leaf of {}",
            start,
            end,
            leaf.len()
        )));
    }
    if start < list.len {
        let (_, found_start, found_path) = list.locate(start);
        if found_path != Some(cursor.path()) || found_start != start {
            return Err(SeqError::invariant(format!(
                "cursor says its leaf starts at {}, tree says {}",
                start, found_start
            )));
        }
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlockConfig;
    use crate::seq::gap_block::GapBlock;

    fn list_of(capacity: usize, len: u32) -> BlockList<u32> {
        let config = BlockConfig::with_capacity(capacity);
        let mut list = BlockList::with_config(config).unwrap();
        for i in 0..len {
            list.push(i).unwrap();
        }
        return list;
    }

    fn leaf_of(items: Vec<u32>, capacity: usize) -> Node<u32> {
        return Node::leaf(GapBlock::from_vec(items, capacity).unwrap());
    }

    fn is_violation(result: Result<()>) -> bool {
        return matches!(result, Err(SeqError::InternalInvariantViolation(_)));
    }

    #[test]
    fn healthy_lists_pass() {
        assert!(verify(&list_of(4, 0)).is_ok());
        assert!(verify(&list_of(4, 3)).is_ok());
        assert!(verify(&list_of(4, 500)).is_ok());
    }

    #[test]
    fn detects_wrong_length() {
        let mut list = list_of(4, 50);
        list.len += 1;
        assert!(is_violation(verify(&list)));
    }

    #[test]
    fn detects_stale_left_count() {
        let mut list = list_of(4, 50);
        list.root.branch_mut().unwrap().left_count += 1;
        assert!(is_violation(verify(&list)));
    }

    #[test]
    fn outer_leaves_may_be_small() {
        let mut list = list_of(6, 0);
        let front = Node::over(leaf_of(vec![0], 6), leaf_of(vec![1, 2], 6));
        let back = Node::over(leaf_of(vec![3, 4], 6), leaf_of(vec![5], 6));
        list.root = Node::over(front, back);
        list.len = 6;
        assert!(verify(&list).is_ok());
    }

    #[test]
    fn detects_underfull_leaf() {
        let mut list = list_of(6, 0);
        let front = Node::over(leaf_of(vec![0], 6), leaf_of(vec![1], 6));
        let back = Node::over(leaf_of(vec![2, 3], 6), leaf_of(vec![4], 6));
        list.root = Node::over(front, back);
        list.len = 5;
        assert!(is_violation(verify(&list)));
    }

    #[test]
    fn detects_empty_edge_leaf() {
        let mut list = list_of(6, 0);
        list.root = Node::over(leaf_of(vec![], 6), leaf_of(vec![0, 1, 2], 6));
        list.len = 3;
        assert!(is_violation(verify(&list)));
    }

    #[test]
    fn detects_node_reached_twice() {
        let mut list = list_of(6, 0);
        let shared = leaf_of(vec![0, 1, 2], 6);
        list.root = Node::over(shared.clone(), shared);
        list.len = 6;
        assert!(is_violation(verify(&list)));
    }

    #[test]
    fn detects_bad_height() {
        let mut list = list_of(4, 50);
        list.root.branch_mut().unwrap().height += 1;
        assert!(is_violation(verify(&list)));
    }
}
