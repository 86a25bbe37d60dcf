//! Transient builders: batch several mutations against one vector
//! without a path-copy per step, at the cost of losing persistence for
//! the duration of the edit.
//!
//! The specification leaves open whether uniqueness is tracked by a
//! separate edit-token stamped onto nodes as they are copied in, or by
//! querying the node's own refcount directly. This implementation takes
//! the latter: [`crate::node::NodePtr::is_unique`] already answers
//! "is this node reachable from anywhere else", so a transient never
//! needs to stamp anything -- it just checks the refcount before
//! mutating and copies-on-write on the first touch of a shared node,
//! same as the persistent algorithms already do, just destructively.
//! See `DESIGN.md`.
//!
//! `persistent(self)`/`FlexTransient::persistent(self)` take `self` by
//! value, so using a transient after freezing it is a compile error
//! rather than the specification's debug-only runtime assertion --
//! strictly stronger than the source's own contract.

use arrayvec::ArrayVec;

use crate::algorithms;
use crate::flex::FlexVector;
use crate::node::NodePtr;
use crate::policy::{Policy, BITS, FANOUT};
use crate::rrb::Inner;
use crate::vector::Vector;

fn set_in_tree<T: Clone, P: Policy>(node: &mut NodePtr<T, P>, shift: u32, index: usize, value: T) {
    if shift == 0 {
        if node.is_unique() {
            // SAFETY: just checked uniqueness.
            unsafe { node.leaf_mut_unchecked() }.values[index] = value;
        } else {
            let mut values = node.as_leaf().values.clone();
            values[index] = value;
            *node = NodePtr::new_leaf(values);
        }
        return;
    }
    let (slot, child_index) = algorithms::locate(node.as_inner(), shift, index);
    if node.is_unique() {
        // SAFETY: just checked uniqueness.
        let inner = unsafe { node.inner_mut_unchecked() };
        set_in_tree(&mut inner.children[slot], shift - BITS, child_index, value);
    } else {
        let mut children: ArrayVec<NodePtr<T, P>, FANOUT> = node.as_inner().children.iter().cloned().collect();
        let sizes = node.as_inner().sizes.clone();
        set_in_tree(&mut children[slot], shift - BITS, child_index, value);
        *node = NodePtr::new_inner(children, sizes);
    }
}

/// A mutable builder over the strict-vector operation set: `push_back`,
/// `set`/`update`, `take`, `drop`.
pub struct Transient<T, P: Policy> {
    inner: Inner<T, P>,
}

impl<T: Clone, P: Policy> Transient<T, P> {
    pub(crate) fn from_inner(inner: Inner<T, P>) -> Self {
        Transient { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.size
    }

    pub fn is_empty(&self) -> bool {
        self.inner.size == 0
    }

    pub fn get(&self, index: usize) -> &T {
        self.inner.get(index)
    }

    /// Appends `value`, mutating the tail leaf in place when this
    /// transient is its sole owner.
    pub fn push_back(&mut self, value: T) {
        let tail_len = self.inner.tail.as_ref().map_or(0, |t| t.leaf_len());
        if tail_len < FANOUT {
            if let Some(tail) = &mut self.inner.tail {
                if tail.is_unique() {
                    // SAFETY: just checked uniqueness.
                    unsafe { tail.leaf_mut_unchecked() }.values.push(value);
                    self.inner.size += 1;
                    return;
                }
            }
            let mut values: ArrayVec<T, FANOUT> = self
                .inner
                .tail
                .as_ref()
                .map_or(ArrayVec::new(), |t| t.as_leaf().values.clone());
            values.push(value);
            self.inner.tail = Some(NodePtr::new_leaf(values));
            self.inner.size += 1;
            return;
        }
        let old_tail = self.inner.tail.take().unwrap();
        let (new_shift, new_root) = algorithms::grow_and_push(self.inner.root.take(), self.inner.shift, old_tail);
        let mut values = ArrayVec::new();
        values.push(value);
        self.inner.shift = new_shift;
        self.inner.root = Some(new_root);
        self.inner.tail = Some(NodePtr::new_leaf(values));
        self.inner.size += 1;
    }

    /// Replaces the element at `index`, descending through uniquely
    /// owned ancestors in place and copying on first touch of a shared
    /// one.
    pub fn set(&mut self, index: usize, value: T) {
        assert!(index < self.inner.size, "index {index} out of bounds (len {})", self.inner.size);
        let tail_offset = self.inner.tail_offset();
        if index >= tail_offset {
            let local = index - tail_offset;
            let tail = self.inner.tail.as_mut().unwrap();
            if tail.is_unique() {
                // SAFETY: just checked uniqueness.
                unsafe { tail.leaf_mut_unchecked() }.values[local] = value;
            } else {
                let mut values = tail.as_leaf().values.clone();
                values[local] = value;
                *tail = NodePtr::new_leaf(values);
            }
            return;
        }
        set_in_tree(self.inner.root.as_mut().unwrap(), self.inner.shift, index, value);
    }

    pub fn update<F: FnOnce(&T) -> T>(&mut self, index: usize, f: F) {
        let new_value = f(self.get(index));
        self.set(index, new_value);
    }

    pub fn take(&mut self, n: usize) {
        self.inner = self.inner.take(n);
    }

    pub fn drop(&mut self, n: usize) {
        self.inner = self.inner.drop(n);
    }

    pub fn persistent(self) -> Vector<T, P> {
        Vector { inner: self.inner }
    }
}

/// A mutable builder that additionally supports `push_front`/`append`,
/// mirroring [`FlexVector`]'s extra operations over [`Vector`]'s.
pub struct FlexTransient<T, P: Policy> {
    transient: Transient<T, P>,
}

impl<T: Clone, P: Policy> FlexTransient<T, P> {
    pub(crate) fn from_inner(inner: Inner<T, P>) -> Self {
        FlexTransient {
            transient: Transient::from_inner(inner),
        }
    }

    pub fn len(&self) -> usize {
        self.transient.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transient.is_empty()
    }

    pub fn get(&self, index: usize) -> &T {
        self.transient.get(index)
    }

    pub fn push_back(&mut self, value: T) {
        self.transient.push_back(value);
    }

    pub fn set(&mut self, index: usize, value: T) {
        self.transient.set(index, value);
    }

    pub fn update<F: FnOnce(&T) -> T>(&mut self, index: usize, f: F) {
        self.transient.update(index, f);
    }

    pub fn take(&mut self, n: usize) {
        self.transient.take(n);
    }

    pub fn drop(&mut self, n: usize) {
        self.transient.drop(n);
    }

    /// Prepends `value`. Delegates to the persistent `push_front`
    /// algorithm rather than mutating in place: unlike `push_back`,
    /// there is no dedicated "head leaf" to grow into, so a fresh
    /// structure is built regardless.
    pub fn push_front(&mut self, value: T) {
        let current = FlexVector::from_parts(
            self.transient.inner.size,
            self.transient.inner.shift,
            self.transient.inner.root.clone(),
            self.transient.inner.tail.clone(),
        );
        let result = current.push_front(value);
        self.transient.inner = result.inner;
    }

    /// Appends `other` to this transient's content.
    pub fn append(&mut self, other: &FlexVector<T, P>) {
        self.transient.inner = self.transient.inner.concat(&other.inner);
    }

    pub fn persistent(self) -> FlexVector<T, P> {
        FlexVector {
            inner: self.transient.inner,
        }
    }
}
