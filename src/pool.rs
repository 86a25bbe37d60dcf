//! Flat, id-addressed serialization of a DAG of vectors: the
//! specification's "pool" format. Structural sharing between separate
//! vectors is preserved (two saved vectors that share a subtree emit it
//! once, keyed by pointer identity), and reloading validates the graph
//! before any node is trusted.

use std::collections::{HashMap, HashSet};

use arrayvec::ArrayVec;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::flex::FlexVector;
use crate::node::NodePtr;
use crate::policy::{Policy, BITS, FANOUT};
use crate::vector::Vector;

#[derive(Serialize, Deserialize, Clone)]
pub struct InnerRecord {
    pub children: Vec<u64>,
    pub relaxed: bool,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct ContainerRecord {
    pub root: Option<u64>,
    pub tail: Option<u64>,
}

/// The canonical JSON shape: `{"B", "BL", "leaves", "inners", "vectors"}`.
/// `root`/`tail` being `null` (rather than always present) is this
/// implementation's extension to represent an empty body/tail.
#[derive(Serialize, Deserialize)]
pub struct Pool<T> {
    #[serde(rename = "B")]
    pub b: u32,
    #[serde(rename = "BL")]
    pub bl: u32,
    pub leaves: Vec<(u64, Vec<T>)>,
    pub inners: Vec<(u64, InnerRecord)>,
    pub vectors: Vec<ContainerRecord>,
}

impl<T: Serialize> Pool<T> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<T: DeserializeOwned> Pool<T> {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

fn visit<T: Clone + Serialize, P: Policy>(
    node: &NodePtr<T, P>,
    seen: &mut HashMap<usize, u64>,
    next_id: &mut u64,
    leaves: &mut Vec<(u64, Vec<T>)>,
    inners: &mut Vec<(u64, InnerRecord)>,
) -> u64 {
    let addr = node.addr();
    if let Some(&id) = seen.get(&addr) {
        return id;
    }
    let id = *next_id;
    *next_id += 1;
    seen.insert(addr, id);
    if node.is_leaf() {
        let values: Vec<T> = node.as_leaf().values.iter().cloned().collect();
        leaves.push((id, values));
    } else {
        let inner = node.as_inner();
        let children: Vec<u64> = inner
            .children
            .iter()
            .map(|c| visit(c, seen, next_id, leaves, inners))
            .collect();
        inners.push((
            id,
            InnerRecord {
                children,
                relaxed: inner.is_relaxed(),
            },
        ));
    }
    id
}

/// Serializes a single [`FlexVector`] into a [`Pool`]. Shared subtrees
/// within this one vector (e.g. between a strict node's repeated full
/// children, when present) are deduplicated by pointer identity.
pub fn save<T: Clone + Serialize, P: Policy>(v: &FlexVector<T, P>) -> Pool<T> {
    let mut leaves = Vec::new();
    let mut inners = Vec::new();
    let mut seen = HashMap::new();
    let mut next_id = 0u64;

    let root_id = v
        .inner
        .root
        .as_ref()
        .map(|r| visit(r, &mut seen, &mut next_id, &mut leaves, &mut inners));
    let tail_id = v
        .inner
        .tail
        .as_ref()
        .map(|t| visit(t, &mut seen, &mut next_id, &mut leaves, &mut inners));

    Pool {
        b: BITS,
        bl: BITS,
        leaves,
        inners,
        vectors: vec![ContainerRecord {
            root: root_id,
            tail: tail_id,
        }],
    }
}

type BuildResult<T, P> = Result<(NodePtr<T, P>, u32, usize), PoolError>;

fn build_node<T: Clone + DeserializeOwned, P: Policy>(
    id: u64,
    leaves: &HashMap<u64, Vec<T>>,
    inners: &HashMap<u64, InnerRecord>,
    memo: &mut HashMap<u64, (NodePtr<T, P>, u32, usize)>,
    visiting: &mut HashSet<u64>,
) -> BuildResult<T, P> {
    if let Some((node, shift, size)) = memo.get(&id) {
        return Ok((node.clone(), *shift, *size));
    }
    if visiting.contains(&id) {
        return Err(PoolError::PoolHasCycles);
    }
    if let Some(values) = leaves.get(&id) {
        if values.is_empty() || values.len() > FANOUT {
            return Err(PoolError::InvalidChildrenCount);
        }
        let arr: ArrayVec<T, FANOUT> = values.iter().cloned().collect();
        let size = values.len();
        let node = NodePtr::new_leaf(arr);
        memo.insert(id, (node.clone(), 0, size));
        return Ok((node, 0, size));
    }
    let record = inners.get(&id).ok_or(PoolError::InvalidNodeId)?;
    if record.children.is_empty() || record.children.len() > FANOUT {
        return Err(PoolError::InvalidChildrenCount);
    }
    visiting.insert(id);
    let mut built = Vec::with_capacity(record.children.len());
    for &child_id in &record.children {
        built.push(build_node::<T, P>(child_id, leaves, inners, memo, visiting)?);
    }
    visiting.remove(&id);

    let child_shift = built[0].1;
    if built.iter().any(|(_, s, _)| *s != child_shift) {
        return Err(PoolError::SameDepthChildren);
    }
    let node_shift = child_shift + BITS;
    let sizes_actual: Vec<usize> = built.iter().map(|(_, _, sz)| *sz).collect();

    if record.relaxed {
        let mut acc = 0u32;
        let mut cumulative = Vec::with_capacity(built.len());
        for sz in &sizes_actual {
            acc += *sz as u32;
            cumulative.push(acc);
        }
        let children: ArrayVec<NodePtr<T, P>, FANOUT> = built.into_iter().map(|(n, _, _)| n).collect();
        let total = acc as usize;
        let node = NodePtr::new_inner(children, Some(cumulative.into_boxed_slice()));
        memo.insert(id, (node.clone(), node_shift, total));
        Ok((node, node_shift, total))
    } else {
        let full = 1usize << node_shift;
        let n = sizes_actual.len();
        for (i, sz) in sizes_actual.iter().enumerate() {
            let is_last = i + 1 == n;
            if !is_last && *sz != full {
                return Err(PoolError::VectorCorrupted);
            }
            if is_last && (*sz == 0 || *sz > full) {
                return Err(PoolError::VectorCorrupted);
            }
        }
        let total: usize = sizes_actual.iter().sum();
        let children: ArrayVec<NodePtr<T, P>, FANOUT> = built.into_iter().map(|(n, _, _)| n).collect();
        let node = NodePtr::new_inner(children, None);
        memo.insert(id, (node.clone(), node_shift, total));
        Ok((node, node_shift, total))
    }
}

/// Reconstructs the `vector_index`-th vector recorded in `pool`.
///
/// On any error, everything built so far (partial node graph held in
/// local variables) is released automatically when this function
/// returns, since every `NodePtr` built along the way is owned by a
/// local that goes out of scope -- no separate cleanup pass is needed.
pub fn load<T: Clone + DeserializeOwned, P: Policy>(
    pool: &Pool<T>,
    vector_index: usize,
) -> Result<FlexVector<T, P>, PoolError> {
    if pool.b != BITS || pool.bl != BITS {
        return Err(PoolError::IncompatibleBits);
    }
    let leaves: HashMap<u64, Vec<T>> = pool.leaves.iter().cloned().collect();
    let inners: HashMap<u64, InnerRecord> = pool.inners.iter().cloned().collect();
    let container = pool.vectors.get(vector_index).ok_or(PoolError::InvalidNodeId)?;

    let mut memo = HashMap::new();
    let mut visiting = HashSet::new();

    let (root, shift, root_size) = match container.root {
        Some(id) => {
            let (n, s, sz) = build_node::<T, P>(id, &leaves, &inners, &mut memo, &mut visiting)?;
            (Some(n), s, sz)
        }
        None => (None, 0, 0),
    };
    let (tail, tail_size) = match container.tail {
        Some(id) => {
            let (n, s, sz) = build_node::<T, P>(id, &leaves, &inners, &mut memo, &mut visiting)?;
            if s != 0 {
                return Err(PoolError::VectorCorrupted);
            }
            (Some(n), sz)
        }
        None => (None, 0),
    };

    Ok(FlexVector::from_parts(root_size + tail_size, shift, root, tail))
}

fn assert_strict<T, P: Policy>(node: &NodePtr<T, P>) -> Result<(), PoolError> {
    if node.is_leaf() {
        return Ok(());
    }
    let inner = node.as_inner();
    if inner.is_relaxed() {
        return Err(PoolError::RelaxedNodeNotAllowed);
    }
    for child in &inner.children {
        assert_strict(child)?;
    }
    Ok(())
}

/// Like [`load`], but additionally rejects the result if any relaxed
/// node appears anywhere in the body, for callers that need the
/// stricter guarantee that every reload rebuilds a strict-only
/// [`Vector`].
pub fn load_strict<T: Clone + DeserializeOwned, P: Policy>(
    pool: &Pool<T>,
    vector_index: usize,
) -> Result<Vector<T, P>, PoolError> {
    let flex = load::<T, P>(pool, vector_index)?;
    if let Some(root) = &flex.inner.root {
        assert_strict(root)?;
    }
    Ok(flex.into_vector())
}
