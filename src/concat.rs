//! Tree concatenation: `concat_sub_tree` descends the taller side's
//! rightmost (or the shorter side's leftmost) spine until the two
//! meeting subtrees are equal-depth, fuses the two leaves that finally
//! meet, and `rebalance` repacks each level on the way back up.
//!
//! `rebalance` here flattens the surviving left/right siblings plus the
//! merged middle node's own children (when the middle node grew a
//! level taller than its siblings) into one list, then repacks that
//! list into fixed `FANOUT`-sized chunks. This is simpler than the
//! slack-preserving `RRB_EXTRAS`/search-based redistribution scheme --
//! it can leave the tree one node taller than the optimal packing would
//! -- while still producing a valid, correctly-balanced, O(log n) tree.
//! See `DESIGN.md`.

use arrayvec::ArrayVec;

use crate::algorithms::rebuild_sizes;
use crate::node::NodePtr;
use crate::policy::{Policy, BITS, FANOUT};

fn fuse_leaves<T: Clone, P: Policy>(left: &NodePtr<T, P>, right: &NodePtr<T, P>) -> (NodePtr<T, P>, u32) {
    let l = left.as_leaf();
    let r = right.as_leaf();
    let total = l.len() + r.len();
    if total <= FANOUT {
        let mut values: ArrayVec<T, FANOUT> = l.values.iter().cloned().collect();
        values.extend(r.values.iter().cloned());
        (NodePtr::new_leaf(values), 0)
    } else {
        let mut children: ArrayVec<NodePtr<T, P>, FANOUT> = ArrayVec::new();
        children.push(left.clone());
        children.push(right.clone());
        let sizes = rebuild_sizes(&children, BITS);
        (NodePtr::new_inner(children, Some(sizes)), BITS)
    }
}

/// Repacks `left_siblings ++ (cnode's contribution) ++ right_siblings`
/// -- all logically at depth `sibling_shift` -- into one or more new
/// parent nodes at `sibling_shift + BITS`, wrapping once more if more
/// than `FANOUT` items resulted.
fn rebalance<T: Clone, P: Policy>(
    left_siblings: &[NodePtr<T, P>],
    cnode: NodePtr<T, P>,
    cshift: u32,
    right_siblings: &[NodePtr<T, P>],
    sibling_shift: u32,
) -> (NodePtr<T, P>, u32) {
    let mut items: Vec<NodePtr<T, P>> = Vec::with_capacity(left_siblings.len() + right_siblings.len() + FANOUT);
    items.extend(left_siblings.iter().cloned());
    if cshift == sibling_shift {
        items.push(cnode);
    } else {
        debug_assert_eq!(cshift, sibling_shift + BITS);
        items.extend(cnode.as_inner().children.iter().cloned());
    }
    items.extend(right_siblings.iter().cloned());

    let mut parents: Vec<NodePtr<T, P>> = Vec::with_capacity(items.len() / FANOUT + 1);
    for chunk in items.chunks(FANOUT) {
        let arr: ArrayVec<NodePtr<T, P>, FANOUT> = chunk.iter().cloned().collect();
        let sizes = rebuild_sizes(&arr, sibling_shift + BITS);
        parents.push(NodePtr::new_inner(arr, Some(sizes)));
    }
    if parents.len() == 1 {
        (parents.pop().unwrap(), sibling_shift + BITS)
    } else {
        let shift2 = sibling_shift + 2 * BITS;
        let arr: ArrayVec<NodePtr<T, P>, FANOUT> = parents.into_iter().collect();
        let sizes = rebuild_sizes(&arr, shift2);
        (NodePtr::new_inner(arr, Some(sizes)), shift2)
    }
}

/// Concatenates the subtree `left` (at `lshift`) with `right` (at
/// `rshift`), returning the merged subtree and its shift.
pub(crate) fn concat_sub_tree<T: Clone, P: Policy>(
    left: &NodePtr<T, P>,
    lshift: u32,
    right: &NodePtr<T, P>,
    rshift: u32,
) -> (NodePtr<T, P>, u32) {
    use std::cmp::Ordering;
    match lshift.cmp(&rshift) {
        Ordering::Greater => {
            let linner = left.as_inner();
            let last_idx = linner.len() - 1;
            let (cnode, cshift) = concat_sub_tree(&linner.children[last_idx], lshift - BITS, right, rshift);
            rebalance(&linner.children[..last_idx], cnode, cshift, &[], lshift - BITS)
        }
        Ordering::Less => {
            let rinner = right.as_inner();
            let (cnode, cshift) = concat_sub_tree(left, lshift, &rinner.children[0], rshift - BITS);
            rebalance(&[], cnode, cshift, &rinner.children[1..], rshift - BITS)
        }
        Ordering::Equal if lshift == 0 => fuse_leaves(left, right),
        Ordering::Equal => {
            let linner = left.as_inner();
            let rinner = right.as_inner();
            let last_idx = linner.len() - 1;
            let (cnode, cshift) = concat_sub_tree(
                &linner.children[last_idx],
                lshift - BITS,
                &rinner.children[0],
                rshift - BITS,
            );
            rebalance(
                &linner.children[..last_idx],
                cnode,
                cshift,
                &rinner.children[1..],
                lshift - BITS,
            )
        }
    }
}
