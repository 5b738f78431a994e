// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Balanced Block Tree internals
//!
//! An order-statistics AVL tree whose leaves are gap blocks. Internal nodes
//! own exactly two children and cache the element count of their left
//! subtree, their own element count and their height (the balance factor is
//! the height difference of the children, kept within -1..=1).
//!
//! Structure:
//! - Every node sits behind an `Arc`, so a whole subtree can be referenced
//!   by two lists at once (after `clone` or `copy_range`)
//! - Writes copy a shared node on the way down with `Arc::make_mut`, so
//!   only the path to the touched leaf is ever duplicated
//! - Reshaping routines take subtrees by value and return the new subtree
//!   root (no parent links, no in-place pointer surgery)
//!
//! Operations:
//! - locate: O(log n) descent by `left_count`
//! - insert/remove: O(log n), splitting a full leaf or borrowing from /
//!   merging with the adjacent leaf on underflow
//! - split/join: O(log n) cut and concatenation, used by the bulk operations

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use crate::error::Result;
use crate::error::SeqError;
use crate::seq::cursor::LeafPath;
use crate::seq::gap_block::GapBlock;
use crate::seq::list::BlockList;

/// Inline capacity for walk stacks; AVL height stays far below this.
pub(crate) const STACK_INLINE: usize = 32;

/// An internal node.
pub(crate) struct Branch<T> {
    pub left: Node<T>,
    pub right: Node<T>,
    /// Elements in the left subtree.
    pub left_count: usize,
    /// Elements in the whole subtree.
    pub len: usize,
    /// Longest path to a leaf. Leaves have height 0.
    pub height: u32,
}

impl<T> Clone for Branch<T> {
    fn clone(&self) -> Self {
        return Branch {
            left: self.left.clone(),
            right: self.right.clone(),
            left_count: self.left_count,
            len: self.len,
            height: self.height,
        };
    }
}

/// A subtree handle. Cloning one shares the subtree.
pub(crate) enum Node<T> {
    Leaf(Arc<GapBlock<T>>),
    Branch(Arc<Branch<T>>),
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        return match self {
            Node::Leaf(block) => Node::Leaf(Arc::clone(block)),
            Node::Branch(branch) => Node::Branch(Arc::clone(branch)),
        };
    }
}

/// Which end of a subtree an operation works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Edge {
    Front,
    Back,
}

/// Take a node's contents out of its `Arc`, copying them if another list
/// still holds the same node.
pub(crate) fn unshare<X: Clone>(shared: Arc<X>) -> X {
    return Arc::try_unwrap(shared).unwrap_or_else(|shared| (*shared).clone());
}

/// Writable access to a leaf's block, copying it first if it is shared.
fn block_mut<T: Clone>(block: &mut Arc<GapBlock<T>>) -> &mut GapBlock<T> {
    if Arc::strong_count(block) > 1 {
        trace!(len = block.len(), "copying shared block before write");
    }
    return Arc::make_mut(block);
}

impl<T> Node<T> {
    pub(crate) fn leaf(block: GapBlock<T>) -> Node<T> {
        return Node::Leaf(Arc::new(block));
    }

    /// A branch over two subtrees, with counts and height computed.
    pub(crate) fn over(left: Node<T>, right: Node<T>) -> Node<T> {
        let left_count = left.len();
        let len = left_count + right.len();
        let height = 1 + left.height().max(right.height());
        return Node::Branch(Arc::new(Branch {
            left,
            right,
            left_count,
            len,
            height,
        }));
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        return match self {
            Node::Leaf(block) => block.len(),
            Node::Branch(branch) => branch.len,
        };
    }

    #[inline]
    pub(crate) fn height(&self) -> u32 {
        return match self {
            Node::Leaf(_) => 0,
            Node::Branch(branch) => branch.height,
        };
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        return matches!(self, Node::Leaf(_));
    }

    pub(crate) fn block(&self) -> Option<&GapBlock<T>> {
        return match self {
            Node::Leaf(block) => Some(&**block),
            Node::Branch(_) => None,
        };
    }

    /// Address of the node's shared allocation.
    pub(crate) fn addr(&self) -> usize {
        return match self {
            Node::Leaf(block) => Arc::as_ptr(block) as *const () as usize,
            Node::Branch(branch) => Arc::as_ptr(branch) as *const () as usize,
        };
    }

    pub(crate) fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack: SmallVec<[&Node<T>; STACK_INLINE]> = SmallVec::new();
        stack.push(self);
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf(_) => count += 1,
                Node::Branch(branch) => {
                    stack.push(&branch.right);
                    stack.push(&branch.left);
                }
            }
        }
        return count;
    }

    /// Length of the outermost leaf on `edge`.
    fn edge_len(&self, edge: Edge) -> usize {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(block) => return block.len(),
                Node::Branch(branch) => {
                    node = match edge {
                        Edge::Front => &branch.left,
                        Edge::Back => &branch.right,
                    };
                }
            }
        }
    }
}

impl<T: Clone> Node<T> {
    #[cfg(test)]
    pub(crate) fn branch_mut(&mut self) -> Option<&mut Branch<T>> {
        return match self {
            Node::Branch(branch) => Some(Arc::make_mut(branch)),
            Node::Leaf(_) => None,
        };
    }

    fn into_branch(self) -> Result<Branch<T>> {
        return match self {
            Node::Branch(branch) => Ok(unshare(branch)),
            Node::Leaf(_) => Err(SeqError::invariant("expected a branch, found a leaf")),
        };
    }

    pub(crate) fn into_block(self) -> Result<GapBlock<T>> {
        return match self {
            Node::Leaf(block) => Ok(unshare(block)),
            Node::Branch(_) => Err(SeqError::invariant("expected a leaf, found a branch")),
        };
    }
}

// --- Balance ---

/// Join two subtrees under a new branch, restoring the AVL condition.
///
/// Both subtrees must be balanced and differ in height by at most 2.
pub(crate) fn rebalance<T: Clone>(left: Node<T>, right: Node<T>) -> Result<Node<T>> {
    let left_height = left.height();
    let right_height = right.height();

    if left_height > right_height + 1 {
        let Branch {
            left: outer,
            right: inner,
            ..
        } = left.into_branch()?;
        if inner.height() > outer.height() {
            let Branch {
                left: inner_left,
                right: inner_right,
                ..
            } = inner.into_branch()?;
            return Ok(Node::over(
                Node::over(outer, inner_left),
                Node::over(inner_right, right),
            ));
        }
        return Ok(Node::over(outer, Node::over(inner, right)));
    }

    if right_height > left_height + 1 {
        let Branch {
            left: inner,
            right: outer,
            ..
        } = right.into_branch()?;
        if inner.height() > outer.height() {
            let Branch {
                left: inner_left,
                right: inner_right,
                ..
            } = inner.into_branch()?;
            return Ok(Node::over(
                Node::over(left, inner_left),
                Node::over(inner_right, outer),
            ));
        }
        return Ok(Node::over(Node::over(left, inner), outer));
    }

    return Ok(Node::over(left, right));
}

// --- Split / join ---

/// Concatenate two balanced subtrees, every element of `left` first.
pub(crate) fn join<T: Clone>(left: Option<Node<T>>, right: Option<Node<T>>) -> Result<Option<Node<T>>> {
    return match (left, right) {
        (None, right) => Ok(right),
        (left, None) => Ok(left),
        (Some(left), Some(right)) => join_nodes(left, right).map(Some),
    };
}

fn join_nodes<T: Clone>(left: Node<T>, right: Node<T>) -> Result<Node<T>> {
    let left_height = left.height();
    let right_height = right.height();
    if left_height > right_height + 1 {
        let branch = left.into_branch()?;
        let joined = join_nodes(branch.right, right)?;
        return rebalance(branch.left, joined);
    }
    if right_height > left_height + 1 {
        let branch = right.into_branch()?;
        let joined = join_nodes(left, branch.left)?;
        return rebalance(joined, branch.right);
    }
    return Ok(Node::over(left, right));
}

/// Cut a subtree into the first `index` elements and the rest.
///
/// Only the nodes along the cut are copied; everything else moves (or stays
/// shared) as a whole subtree. Splitting inside a leaf splits its block, so
/// the two boundary leaves may end up below the minimum; callers repair
/// them afterwards. Empty leaves are dropped.
pub(crate) fn split<T: Clone>(
    node: Option<Node<T>>,
    index: usize,
) -> Result<(Option<Node<T>>, Option<Node<T>>)> {
    let Some(node) = node else {
        return Ok((None, None));
    };
    match node {
        Node::Leaf(block) => {
            let len = block.len();
            if len == 0 {
                return Ok((None, None));
            }
            if index == 0 {
                return Ok((None, Some(Node::Leaf(block))));
            }
            if index >= len {
                return Ok((Some(Node::Leaf(block)), None));
            }
            let mut front = unshare(block);
            let back = front.split_off(index)?;
            return Ok((Some(Node::leaf(front)), Some(Node::leaf(back))));
        }
        Node::Branch(branch) => {
            let Branch {
                left,
                right,
                left_count,
                ..
            } = unshare(branch);
            if index < left_count {
                let (front, back) = split(Some(left), index)?;
                return Ok((front, join(back, Some(right))?));
            }
            if index == left_count {
                return Ok((Some(left), Some(right)));
            }
            let (front, back) = split(Some(right), index - left_count)?;
            return Ok((join(Some(left), front)?, back));
        }
    }
}

// --- Build / drain ---

/// Build a perfectly balanced subtree over leaves in order.
fn build_balanced<T>(leaves: &[Node<T>]) -> Option<Node<T>> {
    return match leaves.len() {
        0 => None,
        1 => Some(leaves[0].clone()),
        len => {
            let mid = len / 2;
            match (build_balanced(&leaves[..mid]), build_balanced(&leaves[mid..])) {
                (Some(left), Some(right)) => Some(Node::over(left, right)),
                (left, right) => left.or(right),
            }
        }
    };
}

/// Build a balanced subtree holding `items`.
///
/// Elements are spread evenly over the fewest blocks that can hold them;
/// with two or more blocks each gets at least half the maximum.
pub(crate) fn build_subtree<T>(items: Vec<T>, capacity: usize) -> Option<Node<T>> {
    let total = items.len();
    if total == 0 {
        return None;
    }
    let blocks = total.div_ceil(capacity);
    let base = total / blocks;
    let extra = total % blocks;

    let mut iter = items.into_iter();
    let mut leaves = Vec::with_capacity(blocks);
    for i in 0..blocks {
        let size = base + usize::from(i < extra);
        let chunk: Vec<T> = iter.by_ref().take(size).collect();
        leaves.push(Node::leaf(GapBlock::from_chunk(chunk, capacity)));
    }
    return build_balanced(&leaves);
}

/// Take every element out of a subtree, in order.
///
/// Blocks no other list holds are moved out; shared ones are copied.
pub(crate) fn drain<T: Clone>(node: Option<Node<T>>) -> Vec<T> {
    let mut out = Vec::with_capacity(node.as_ref().map_or(0, Node::len));
    let mut stack: SmallVec<[Node<T>; STACK_INLINE]> = SmallVec::new();
    stack.extend(node);
    while let Some(node) = stack.pop() {
        match node {
            Node::Leaf(block) => out.extend(unshare(block).into_vec()),
            Node::Branch(branch) => {
                let Branch { left, right, .. } = unshare(branch);
                stack.push(right);
                stack.push(left);
            }
        }
    }
    return out;
}

// --- Edge transfers ---

/// Remove `count` elements from the outermost leaf on `edge`.
fn take_edge<T: Clone>(node: Node<T>, edge: Edge, count: usize) -> Result<(Node<T>, Vec<T>)> {
    let branch = match node {
        Node::Leaf(block) => {
            let mut block = unshare(block);
            let len = block.len();
            let items = match edge {
                Edge::Front => block.remove_range(0, count)?,
                Edge::Back => block.remove_range(len - count, len)?,
            };
            return Ok((Node::leaf(block), items));
        }
        Node::Branch(branch) => unshare(branch),
    };
    let Branch { left, right, .. } = branch;
    return match edge {
        Edge::Front => {
            let (left, items) = take_edge(left, edge, count)?;
            Ok((Node::over(left, right), items))
        }
        Edge::Back => {
            let (right, items) = take_edge(right, edge, count)?;
            Ok((Node::over(left, right), items))
        }
    };
}

/// Add elements to the outermost leaf on `edge`.
fn give_edge<T: Clone>(node: Node<T>, edge: Edge, items: Vec<T>) -> Result<Node<T>> {
    if items.is_empty() {
        return Ok(node);
    }
    let branch = match node {
        Node::Leaf(block) => {
            let mut block = unshare(block);
            let at = match edge {
                Edge::Front => 0,
                Edge::Back => block.len(),
            };
            block.insert_range(at, items)?;
            return Ok(Node::leaf(block));
        }
        Node::Branch(branch) => unshare(branch),
    };
    let Branch { left, right, .. } = branch;
    return match edge {
        Edge::Front => Ok(Node::over(give_edge(left, edge, items)?, right)),
        Edge::Back => Ok(Node::over(left, give_edge(right, edge, items)?)),
    };
}

impl<T: Clone> BlockList<T> {
    // --- Root ---

    pub(crate) fn empty_leaf(&self) -> Node<T> {
        return Node::leaf(GapBlock::new(self.config.capacity_max));
    }

    /// Move the tree out, leaving an empty leaf in its place.
    pub(crate) fn take_root(&mut self) -> Node<T> {
        let empty = self.empty_leaf();
        return std::mem::replace(&mut self.root, empty);
    }

    /// Install a new root, falling back to an empty leaf.
    pub(crate) fn set_root(&mut self, root: Option<Node<T>>) {
        self.root = match root {
            Some(root) => root,
            None => self.empty_leaf(),
        };
    }

    // --- Descent ---

    /// Find the leaf holding global position `index`.
    ///
    /// Returns the leaf's block, the global index of its first element and
    /// its path (if shallow enough to record). An index equal to the length
    /// resolves to the end of the last leaf.
    pub(crate) fn locate(&self, index: usize) -> (&GapBlock<T>, usize, Option<LeafPath>) {
        let mut node = &self.root;
        let mut offset = index;
        let mut start = 0usize;
        let mut path = Some(LeafPath::ROOT);
        loop {
            match node {
                Node::Leaf(block) => return (&**block, start, path),
                Node::Branch(branch) => {
                    let right = offset >= branch.left_count;
                    if right {
                        offset -= branch.left_count;
                        start += branch.left_count;
                        node = &branch.right;
                    } else {
                        node = &branch.left;
                    }
                    path = path.and_then(|path| path.step(right));
                }
            }
        }
    }

    /// Like [`Self::locate`], but for writing: adds `delta` to every count on
    /// the way down and copies any shared node on the path.
    ///
    /// Used by mutations that stay inside one leaf.
    pub(crate) fn descend_mut(&mut self, index: usize, delta: isize) -> (&mut GapBlock<T>, usize, Option<LeafPath>) {
        let mut node = &mut self.root;
        let mut offset = index;
        let mut start = 0usize;
        let mut path = Some(LeafPath::ROOT);
        loop {
            let branch = match node {
                Node::Leaf(block) => return (block_mut(block), start, path),
                Node::Branch(branch) => Arc::make_mut(branch),
            };
            branch.len = branch.len.wrapping_add_signed(delta);
            let right = offset >= branch.left_count;
            path = path.and_then(|path| path.step(right));
            if right {
                offset -= branch.left_count;
                start += branch.left_count;
                node = &mut branch.right;
            } else {
                branch.left_count = branch.left_count.wrapping_add_signed(delta);
                node = &mut branch.left;
            }
        }
    }

    /// Replay a recorded path down to its leaf.
    pub(crate) fn follow(&self, path: LeafPath) -> Result<&GapBlock<T>> {
        let mut node = &self.root;
        for level in 0..path.depth() {
            node = match node {
                Node::Branch(branch) if path.goes_right(level) => &branch.right,
                Node::Branch(branch) => &branch.left,
                Node::Leaf(_) => return Err(SeqError::invariant(format!("cursor path ends early at level {}", level))),
            };
        }
        return match node {
            Node::Leaf(block) => Ok(&**block),
            Node::Branch(_) => Err(SeqError::invariant("cursor path stops at a branch")),
        };
    }

    // --- Single-element structural paths ---

    /// Insert into a subtree whose target leaf has no room.
    ///
    /// With `edge` set the target is the first or last leaf of the list and
    /// a fresh block is started on that side. Otherwise the full leaf is
    /// split in two.
    pub(crate) fn insert_rec(&self, node: Node<T>, index: usize, value: T, edge: Option<Edge>) -> Result<Node<T>> {
        let branch = match node {
            Node::Leaf(block) => return self.insert_into_leaf(block, index, value, edge),
            Node::Branch(branch) => unshare(branch),
        };
        let Branch {
            left,
            right,
            left_count,
            ..
        } = branch;
        if index < left_count {
            let left = self.insert_rec(left, index, value, edge)?;
            return rebalance(left, right);
        }
        let right = self.insert_rec(right, index - left_count, value, edge)?;
        return rebalance(left, right);
    }

    fn insert_into_leaf(
        &self,
        block: Arc<GapBlock<T>>,
        index: usize,
        value: T,
        edge: Option<Edge>,
    ) -> Result<Node<T>> {
        let capacity = self.config.capacity_max;
        if let Some(edge) = edge {
            let mut fresh = GapBlock::new(capacity);
            fresh.insert(0, value)?;
            trace!(?edge, len = block.len(), "starting new block at list edge");
            let (old, fresh) = (Node::Leaf(block), Node::leaf(fresh));
            return Ok(match edge {
                Edge::Front => Node::over(fresh, old),
                Edge::Back => Node::over(old, fresh),
            });
        }

        let mut block = unshare(block);
        if !block.is_full() {
            block.insert(index, value)?;
            return Ok(Node::leaf(block));
        }

        // Full leaf: the left half keeps the extra element of an odd split.
        let keep = block.len() - block.len() / 2;
        let mut right = block.split_off(keep)?;
        if index < keep {
            block.insert(index, value)?;
        } else {
            right.insert(index - keep, value)?;
        }
        trace!(keep, moved = right.len(), "split full block");
        return Ok(Node::over(Node::leaf(block), Node::leaf(right)));
    }

    /// Remove from a subtree whose target leaf may underflow.
    ///
    /// `front` and `back` say whether the subtree holds the first or last
    /// leaf of the whole list. Those two leaves may shrink below the minimum
    /// and are only dropped once empty.
    pub(crate) fn remove_rec(&self, node: Node<T>, index: usize, front: bool, back: bool) -> Result<(Node<T>, T)> {
        let branch = match node {
            Node::Leaf(block) => {
                let mut block = unshare(block);
                let value = block.remove(index)?;
                return Ok((Node::leaf(block), value));
            }
            Node::Branch(branch) => unshare(branch),
        };
        let Branch {
            left,
            right,
            left_count,
            ..
        } = branch;

        if index < left_count {
            let (left, value) = self.remove_rec(left, index, front, false)?;
            if self.underfull(&left, front) {
                return Ok((self.fix_underflow(left, right, Edge::Front)?, value));
            }
            return Ok((rebalance(left, right)?, value));
        }
        let (right, value) = self.remove_rec(right, index - left_count, false, back)?;
        if self.underfull(&right, back) {
            return Ok((self.fix_underflow(right, left, Edge::Back)?, value));
        }
        return Ok((rebalance(left, right)?, value));
    }

    /// Whether `node` is a leaf that must be repaired.
    fn underfull(&self, node: &Node<T>, outermost: bool) -> bool {
        return match node.block() {
            Some(block) => block.is_empty() || (!outermost && block.len() < self.config.capacity_min),
            None => false,
        };
    }

    /// Repair an underfull leaf next to its sibling subtree.
    ///
    /// `side` is `Front` when the leaf is the left child. The leaf borrows
    /// from the adjacent leaf of the sibling when the two together hold at
    /// least twice the minimum, otherwise it is merged into that neighbour
    /// and the branch collapses to the sibling. An empty leaf is dropped.
    fn fix_underflow(&self, leaf: Node<T>, sibling: Node<T>, side: Edge) -> Result<Node<T>> {
        let mut block = leaf.into_block()?;
        let leaf_len = block.len();
        let neighbour_len = sibling.edge_len(side);

        if leaf_len > 0 && leaf_len + neighbour_len >= 2 * self.config.capacity_min {
            let count = (leaf_len + neighbour_len) / 2 - leaf_len;
            let (sibling, items) = take_edge(sibling, side, count)?;
            let at = match side {
                Edge::Front => block.len(),
                Edge::Back => 0,
            };
            block.insert_range(at, items)?;
            trace!(count, "borrowed from neighbour block");
            let leaf = Node::leaf(block);
            return match side {
                Edge::Front => rebalance(leaf, sibling),
                Edge::Back => rebalance(sibling, leaf),
            };
        }

        trace!(count = leaf_len, "merged underfull block");
        return give_edge(sibling, side, block.into_vec());
    }
}
