//! [`FlexVector`]: [`crate::vector::Vector`] plus O(log n) `concat` and
//! `push_front`. Kept as a distinct type (rather than folding these
//! methods into `Vector` itself) because both operations can leave
//! relaxed nodes behind even when every input was strict -- a
//! distinction callers who only ever append may want reflected in the
//! type they hold, matching the specification's explicit split between
//! a plain persistent vector and a "flex-vector" variant.

use crate::policy::{DefaultPolicy, Policy};
use crate::rrb::{Inner, Iter};
use crate::transient::FlexTransient;
use crate::vector::Vector;

pub struct FlexVector<T, P: Policy = DefaultPolicy> {
    pub(crate) inner: Inner<T, P>,
}

impl<T, P: Policy> Clone for FlexVector<T, P> {
    fn clone(&self) -> Self {
        FlexVector {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone, P: Policy> FlexVector<T, P> {
    pub fn new() -> Self {
        FlexVector { inner: Inner::empty() }
    }

    pub fn singleton(value: T) -> Self {
        FlexVector {
            inner: Inner::singleton(value),
        }
    }

    pub(crate) fn from_parts(
        size: usize,
        shift: u32,
        root: Option<crate::node::NodePtr<T, P>>,
        tail: Option<crate::node::NodePtr<T, P>>,
    ) -> Self {
        FlexVector {
            inner: Inner { size, shift, root, tail },
        }
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

    pub fn push_back(&self, value: T) -> Self {
        FlexVector {
            inner: self.inner.push_back(value),
        }
    }

    /// O(log n): prepends `value`. Implemented as `singleton(value)
    /// .concat(self)`, matching the specification's own complexity
    /// figure for this operation (unlike `push_back`, it is not amortized O(1)).
    pub fn push_front(&self, value: T) -> Self {
        Self::singleton(value).concat(self)
    }

    pub fn set(&self, index: usize, value: T) -> Self {
        FlexVector {
            inner: self.inner.set(index, value),
        }
    }

    pub fn update<F: FnOnce(&T) -> T>(&self, index: usize, f: F) -> Self {
        FlexVector {
            inner: self.inner.update(index, f),
        }
    }

    pub fn take(&self, n: usize) -> Self {
        FlexVector {
            inner: self.inner.take(n),
        }
    }

    pub fn drop(&self, n: usize) -> Self {
        FlexVector {
            inner: self.inner.drop(n),
        }
    }

    /// O(log n): concatenates `self` followed by `other`.
    pub fn concat(&self, other: &Self) -> Self {
        FlexVector {
            inner: self.inner.concat(&other.inner),
        }
    }

    pub fn iter(&self) -> Iter<'_, T, P> {
        Iter::new(&self.inner)
    }

    pub fn reduce<B, F: FnMut(B, &T) -> B>(&self, init: B, f: F) -> B {
        self.iter().fold(init, f)
    }

    pub fn transient(self) -> FlexTransient<T, P> {
        FlexTransient::from_inner(self.inner)
    }

    pub fn into_vector(self) -> Vector<T, P> {
        Vector { inner: self.inner }
    }
}

impl<T: Clone, P: Policy> From<Vector<T, P>> for FlexVector<T, P> {
    fn from(v: Vector<T, P>) -> Self {
        FlexVector { inner: v.inner }
    }
}

impl<T: Clone + PartialEq, P: Policy> PartialEq for FlexVector<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Clone, P: Policy> Default for FlexVector<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, P: Policy> FromIterator<T> for FlexVector<T, P> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        FlexVector {
            inner: Inner::from_iter(iter),
        }
    }
}

impl<'a, T: Clone, P: Policy> IntoIterator for &'a FlexVector<T, P> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, P>;

    fn into_iter(self) -> Iter<'a, T, P> {
        self.iter()
    }
}
