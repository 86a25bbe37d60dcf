//! The structural algorithms: indexed descent, push-tail, path-copy
//! update, and the two slicing primitives. Concatenation lives in
//! `concat.rs` since it additionally needs `rebalance`.
//!
//! Every node above a leaf is addressed by `shift`: a subtree rooted at
//! `shift` spans `2^(shift + BITS)` elements when fully packed, and a
//! leaf is, by convention, "shift 0". This differs from the source's
//! own convention (which labels leaves `shift BL` and counts bits from
//! there) only by a constant offset -- since this implementation fixes
//! `B == BL`, renumbering from zero at the leaf removes one layer of
//! indirection from every formula below. See `DESIGN.md`.

use arrayvec::ArrayVec;

use crate::node::{make_path, InnerNode, LeafNode, NodePtr};
use crate::policy::{Policy, BITS, FANOUT, MASK};

/// Total element count of the subtree rooted at `node`, which has the
/// given `shift`. O(1) for relaxed nodes and leaves; for a strict node
/// this walks the (possibly partial) rightmost spine, which is at most
/// `shift / BITS` steps.
pub(crate) fn subtree_size<T, P: Policy>(node: &NodePtr<T, P>, shift: u32) -> usize {
    if shift == 0 {
        return node.leaf_len();
    }
    let inner = node.as_inner();
    match inner.relaxed_total() {
        Some(total) => total,
        None => {
            let count = inner.len();
            ((count - 1) << shift) + subtree_size(&inner.children[count - 1], shift - BITS)
        }
    }
}

/// Recomputes a cumulative relaxed `sizes[]` array for `children`,
/// assuming `children` are the child list of a node whose own shift is
/// `shift` (so each child lives at `shift - BITS`).
pub(crate) fn rebuild_sizes<T, P: Policy>(children: &[NodePtr<T, P>], shift: u32) -> Box<[u32]> {
    let child_shift = shift - BITS;
    let mut acc = 0u32;
    let mut out = Vec::with_capacity(children.len());
    for c in children {
        acc += subtree_size(c, child_shift) as u32;
        out.push(acc);
    }
    out.into_boxed_slice()
}

/// Finds the child slot containing `index` within `inner` (whose own
/// shift is `shift`), and the index of `index` relative to the start of
/// that child.
pub(crate) fn locate<T, P: Policy>(inner: &InnerNode<T, P>, shift: u32, index: usize) -> (usize, usize) {
    let mut slot = (index >> shift) & MASK;
    match &inner.sizes {
        Some(sizes) => {
            while (sizes[slot] as usize) <= index {
                slot += 1;
            }
            let child_index = if slot == 0 {
                index
            } else {
                index - sizes[slot - 1] as usize
            };
            (slot, child_index)
        }
        None => (slot, index & ((1usize << shift) - 1)),
    }
}

/// Descends from `node` (at `shift`) to the leaf holding `index`,
/// returning that leaf and the index local to it. Mirrors the
/// specification's `array_for`.
pub(crate) fn array_for<'a, T, P: Policy>(
    node: &'a NodePtr<T, P>,
    shift: u32,
    index: usize,
) -> (&'a LeafNode<T, P>, usize) {
    let mut node = node;
    let mut shift = shift;
    let mut index = index;
    while shift > 0 {
        let inner = node.as_inner();
        let (slot, child_index) = locate(inner, shift, index);
        node = &inner.children[slot];
        shift -= BITS;
        index = child_index;
    }
    (node.as_leaf(), index)
}

/// Element at `index` within the subtree rooted at `node`.
pub(crate) fn get<'a, T, P: Policy>(node: &'a NodePtr<T, P>, shift: u32, index: usize) -> &'a T {
    let (leaf, local) = array_for(node, shift, index);
    &leaf.values[local]
}

/// Path-copy `update`: returns a new subtree equal to `node` except
/// that the element at `index` is replaced by `value`. Untouched
/// siblings are shared (their `NodePtr`s are cloned, i.e. ref-counted,
/// not deep-copied).
pub(crate) fn update_path<T: Clone, P: Policy>(
    node: &NodePtr<T, P>,
    shift: u32,
    index: usize,
    value: T,
) -> NodePtr<T, P> {
    if shift == 0 {
        let mut values = node.as_leaf().values.clone();
        values[index] = value;
        return NodePtr::new_leaf(values);
    }
    let inner = node.as_inner();
    let (slot, child_index) = locate(inner, shift, index);
    let new_child = update_path(&inner.children[slot], shift - BITS, child_index, value);
    let mut children: ArrayVec<NodePtr<T, P>, FANOUT> = inner.children.iter().cloned().collect();
    children[slot] = new_child;
    NodePtr::new_inner(children, inner.sizes.clone())
}

/// Copies the first `n` values of a leaf into a new leaf.
pub(crate) fn copy_leaf_prefix<T: Clone, P: Policy>(leaf: &NodePtr<T, P>, n: usize) -> NodePtr<T, P> {
    let values: ArrayVec<T, FANOUT> = leaf.as_leaf().values.iter().take(n).cloned().collect();
    NodePtr::new_leaf(values)
}

/// Copies the values of a leaf starting at `from` into a new leaf.
pub(crate) fn copy_leaf_suffix<T: Clone, P: Policy>(leaf: &NodePtr<T, P>, from: usize) -> NodePtr<T, P> {
    let values: ArrayVec<T, FANOUT> = leaf.as_leaf().values.iter().skip(from).cloned().collect();
    NodePtr::new_leaf(values)
}

/// Pushes `new_leaf` (the promoted, previously-full tail) as the new
/// rightmost leaf of the subtree rooted at `node` (at `shift`).
/// `Ok` when it fit without growing the subtree's height; `Err` hands
/// the leaf back when the subtree is already full at this height, so
/// the caller can wrap one level higher.
///
/// Conservatively promotes the rebuilt node to relaxed whenever the
/// existing last child was not already fully packed, rather than
/// attempting to prove a narrower strict case still holds; see
/// `DESIGN.md` for why this mirrors the specification's own blessed
/// "prefer relaxed when unsure" resolution.
pub(crate) fn try_push_tail<T: Clone, P: Policy>(
    node: &NodePtr<T, P>,
    shift: u32,
    new_leaf: NodePtr<T, P>,
) -> Result<NodePtr<T, P>, NodePtr<T, P>> {
    let inner = node.as_inner();
    let count = inner.len();
    let last_idx = count - 1;

    if shift == BITS {
        if count < FANOUT {
            let last_was_full = inner.children[last_idx].leaf_len() == FANOUT;
            let mut children: ArrayVec<NodePtr<T, P>, FANOUT> = inner.children.iter().cloned().collect();
            children.push(new_leaf);
            let sizes = if inner.is_relaxed() || !last_was_full {
                Some(rebuild_sizes(&children, shift))
            } else {
                None
            };
            Ok(NodePtr::new_inner(children, sizes))
        } else {
            Err(new_leaf)
        }
    } else {
        match try_push_tail(&inner.children[last_idx], shift - BITS, new_leaf) {
            Ok(new_last) => {
                let mut children: ArrayVec<NodePtr<T, P>, FANOUT> = inner.children.iter().cloned().collect();
                children[last_idx] = new_last;
                let sizes = inner
                    .sizes
                    .as_ref()
                    .map(|_| rebuild_sizes(&children, shift));
                Ok(NodePtr::new_inner(children, sizes))
            }
            Err(leaf_back) => {
                if count < FANOUT {
                    let path = make_path(shift - BITS, leaf_back);
                    let mut children: ArrayVec<NodePtr<T, P>, FANOUT> =
                        inner.children.iter().cloned().collect();
                    children.push(path);
                    let sizes = Some(rebuild_sizes(&children, shift));
                    Ok(NodePtr::new_inner(children, sizes))
                } else {
                    Err(leaf_back)
                }
            }
        }
    }
}

/// Pushes `new_leaf` onto the tree's body, growing the tree upward by
/// wrapping the old root when it is already full. Returns the new
/// `(shift, root)`. `root == None` means the tree's body was empty (all
/// content was in the tail); `shift == 0` with `root == Some(leaf)`
/// means the body is a single bare leaf (no inner wrapper needed yet).
pub(crate) fn grow_and_push<T: Clone, P: Policy>(
    root: Option<NodePtr<T, P>>,
    shift: u32,
    new_leaf: NodePtr<T, P>,
) -> (u32, NodePtr<T, P>) {
    match root {
        None => (0, new_leaf),
        Some(r) if shift == 0 => {
            let r_full = r.leaf_len() == FANOUT;
            let mut children: ArrayVec<NodePtr<T, P>, FANOUT> = ArrayVec::new();
            children.push(r);
            children.push(new_leaf);
            let sizes = if r_full {
                None
            } else {
                Some(rebuild_sizes(&children, BITS))
            };
            (BITS, NodePtr::new_inner(children, sizes))
        }
        Some(r) => match try_push_tail(&r, shift, new_leaf) {
            Ok(new_root) => (shift, new_root),
            Err(leaf_back) => {
                let old_size = subtree_size(&r, shift);
                let path = make_path(shift, leaf_back);
                let added = subtree_size(&path, shift);
                let sizes: Box<[u32]> =
                    vec![old_size as u32, (old_size + added) as u32].into_boxed_slice();
                let mut children: ArrayVec<NodePtr<T, P>, FANOUT> = ArrayVec::new();
                children.push(r);
                children.push(path);
                (shift + BITS, NodePtr::new_inner(children, Some(sizes)))
            }
        },
    }
}

/// Re-wraps `node` (known to actually sit at `from_shift`) in single-child
/// inner nodes until it reaches `to_shift`. Needed when a recursive slice
/// collapses a spine deeper than expected: the collapsed result cannot be
/// pushed as a sibling of untouched same-depth children without first
/// restoring its depth, or the child list would mix shifts (invariant I4).
fn rewrap_to_shift<T, P: Policy>(node: NodePtr<T, P>, from_shift: u32, to_shift: u32) -> NodePtr<T, P> {
    if from_shift == to_shift {
        return node;
    }
    let inner = rewrap_to_shift(node, from_shift, to_shift - BITS);
    let mut children = ArrayVec::new();
    children.push(inner);
    NodePtr::new_inner(children, None)
}

/// `take`: returns the subtree holding the first `n` elements of
/// `node`'s subtree, split into (everything before the last leaf of
/// that prefix, the last leaf of that prefix as a detached new tail).
/// The first component also carries its own shift, since collapsing a
/// degenerate single-child spine can reduce it below `shift - BITS`.
pub(crate) fn slice_right<T: Clone, P: Policy>(
    node: &NodePtr<T, P>,
    shift: u32,
    n: usize,
) -> (Option<(NodePtr<T, P>, u32)>, NodePtr<T, P>) {
    if shift == 0 {
        let leaf_len = node.leaf_len();
        if n == leaf_len {
            return (None, node.clone());
        }
        return (None, copy_leaf_prefix(node, n));
    }
    let inner = node.as_inner();
    let (slot, child_n) = locate(inner, shift, n - 1);
    let (child_root, new_tail) = slice_right(&inner.children[slot], shift - BITS, child_n + 1);
    if slot == 0 {
        return (child_root, new_tail);
    }
    let mut children: ArrayVec<NodePtr<T, P>, FANOUT> =
        inner.children.iter().take(slot).cloned().collect();
    if let Some((cr, cr_shift)) = child_root {
        let expected = shift - BITS;
        let cr = if cr_shift == expected { cr } else { rewrap_to_shift(cr, cr_shift, expected) };
        children.push(cr);
    }
    if children.len() == 1 && shift > BITS {
        return (Some((children.into_iter().next().unwrap(), shift - BITS)), new_tail);
    }
    let sizes = rebuild_sizes(&children, shift);
    (Some((NodePtr::new_inner(children, Some(sizes)), shift)), new_tail)
}

/// `drop`: returns the subtree holding elements `[n..)` of `node`'s
/// subtree. Always produces a relaxed node (see specification's own
/// "always relaxed" resolution for this operation), except when a
/// degenerate single-child spine collapses.
pub(crate) fn slice_left<T: Clone, P: Policy>(
    node: &NodePtr<T, P>,
    shift: u32,
    n: usize,
) -> Option<(NodePtr<T, P>, u32)> {
    if shift == 0 {
        let leaf_len = node.leaf_len();
        if n >= leaf_len {
            return None;
        }
        if n == 0 {
            return Some((node.clone(), 0));
        }
        return Some((copy_leaf_suffix(node, n), 0));
    }
    let inner = node.as_inner();
    let (slot, child_n) = locate(inner, shift, n);
    let trimmed = slice_left(&inner.children[slot], shift - BITS, child_n);
    if slot + 1 == inner.len() {
        return trimmed;
    }
    let mut children: ArrayVec<NodePtr<T, P>, FANOUT> = ArrayVec::new();
    if let Some((t, t_shift)) = trimmed {
        let expected = shift - BITS;
        let t = if t_shift == expected { t } else { rewrap_to_shift(t, t_shift, expected) };
        children.push(t);
    }
    for c in inner.children.iter().skip(slot + 1) {
        children.push(c.clone());
    }
    if children.is_empty() {
        return None;
    }
    if children.len() == 1 && shift > BITS {
        return Some((children.into_iter().next().unwrap(), shift - BITS));
    }
    let sizes = rebuild_sizes(&children, shift);
    Some((NodePtr::new_inner(children, Some(sizes)), shift))
}
