//! Cross-checks this crate's `FlexVector` against `im::Vector`, an
//! independently implemented persistent vector, across randomized
//! sequences of the shared operations (push_back, set, take, drop,
//! concat, push_front).

#![cfg(feature = "proptest")]

use im::Vector as ImVector;
use proptest::prelude::*;
use rrbtree::FlexVector;

#[derive(Debug, Clone)]
enum Op {
    PushBack(i32),
    PushFront(i32),
    Set(usize, i32),
    Take(usize),
    Drop(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::PushBack),
        any::<i32>().prop_map(Op::PushFront),
        (0usize..200, any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
        (0usize..200).prop_map(Op::Take),
        (0usize..200).prop_map(Op::Drop),
    ]
}

fn apply(ours: FlexVector<i32>, theirs: ImVector<i32>, op: &Op) -> (FlexVector<i32>, ImVector<i32>) {
    match op {
        Op::PushBack(v) => (ours.push_back(*v), {
            let mut t = theirs;
            t.push_back(*v);
            t
        }),
        Op::PushFront(v) => (ours.push_front(*v), {
            let mut t = theirs;
            t.push_front(*v);
            t
        }),
        Op::Set(i, v) => {
            if ours.is_empty() {
                (ours, theirs)
            } else {
                let idx = i % ours.len();
                let mut t = theirs;
                t.set(idx, *v);
                (ours.set(idx, *v), t)
            }
        }
        Op::Take(n) => {
            let n = if ours.is_empty() { 0 } else { n % (ours.len() + 1) };
            let mut t = theirs;
            t.truncate(n);
            (ours.take(n), t)
        }
        Op::Drop(n) => {
            let n = if ours.is_empty() { 0 } else { n % (ours.len() + 1) };
            let mut t = theirs;
            let suffix = t.split_off(n);
            (ours.drop(n), suffix)
        }
    }
}

fn assert_matches(ours: &FlexVector<i32>, theirs: &ImVector<i32>) {
    assert_eq!(ours.len(), theirs.len());
    for (i, expected) in theirs.iter().enumerate() {
        assert_eq!(ours.get(i), expected);
    }
}

proptest! {
    #[test]
    fn matches_im_vector_across_random_ops(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut ours: FlexVector<i32> = FlexVector::new();
        let mut theirs: ImVector<i32> = ImVector::new();
        for op in &ops {
            let (new_ours, new_theirs) = apply(ours, theirs, op);
            ours = new_ours;
            theirs = new_theirs;
            assert_matches(&ours, &theirs);
        }
    }

    #[test]
    fn concat_matches_im_vector_append(
        left in prop::collection::vec(any::<i32>(), 0..150),
        right in prop::collection::vec(any::<i32>(), 0..150),
    ) {
        let ours_left: FlexVector<i32> = left.iter().copied().collect();
        let ours_right: FlexVector<i32> = right.iter().copied().collect();
        let combined = ours_left.concat(&ours_right);

        let mut theirs_left: ImVector<i32> = left.iter().copied().collect();
        let theirs_right: ImVector<i32> = right.iter().copied().collect();
        theirs_left.append(theirs_right);

        assert_matches(&combined, &theirs_left);
    }
}
