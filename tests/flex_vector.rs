use rrbtree::FlexVector;

fn fv(range: std::ops::Range<i32>) -> FlexVector<i32> {
    range.collect()
}

#[test]
fn concat_with_empty_is_identity() {
    let a = fv(0..50);
    let empty: FlexVector<i32> = FlexVector::new();
    assert_eq!(a.concat(&empty), a);
    assert_eq!(empty.concat(&a), a);
}

#[test]
fn concat_preserves_order_and_length() {
    let a = fv(0..40);
    let b = fv(40..90);
    let combined = a.concat(&b);
    assert_eq!(combined.len(), 90);
    for i in 0..90 {
        assert_eq!(*combined.get(i), i as i32);
    }
}

#[test]
fn concat_of_small_vectors() {
    let a = fv(0..3);
    let b = fv(3..5);
    let combined = a.concat(&b);
    let expected: Vec<i32> = (0..5).collect();
    let actual: Vec<i32> = combined.iter().copied().collect();
    assert_eq!(actual, expected);
}

#[test]
fn balanced_recursive_concat_builds_the_full_sequence() {
    fn build(lo: i32, hi: i32) -> FlexVector<i32> {
        if hi - lo <= 1 {
            return FlexVector::singleton(lo);
        }
        let mid = lo + (hi - lo) / 2;
        build(lo, mid).concat(&build(mid, hi))
    }
    let v = build(0, 666);
    assert_eq!(v.len(), 666);
    for i in 0..666 {
        assert_eq!(*v.get(i), i as i32);
    }
}

#[test]
fn concat_is_associative_in_observed_contents() {
    let a = fv(0..10);
    let b = fv(10..23);
    let c = fv(23..61);
    let left = a.concat(&b).concat(&c);
    let right = a.concat(&b.concat(&c));
    assert_eq!(left, right);
}

#[test]
fn push_front_prepends() {
    let v = fv(1..10);
    let prepended = v.push_front(0);
    assert_eq!(prepended.len(), 10);
    for i in 0..10 {
        assert_eq!(*prepended.get(i), i as i32);
    }
}

#[test]
fn repeated_push_front_builds_reverse_order() {
    let mut v: FlexVector<i32> = FlexVector::new();
    for i in 0..50 {
        v = v.push_front(i);
    }
    for i in 0..50 {
        assert_eq!(*v.get(i), (49 - i) as i32);
    }
}

#[test]
fn take_and_drop_compose_to_a_slice() {
    let v = fv(0..300);
    let middle = v.drop(50).take(100);
    assert_eq!(middle.len(), 100);
    for i in 0..100 {
        assert_eq!(*middle.get(i), (50 + i) as i32);
    }
}

#[test]
fn concat_then_take_then_concat_round_trips() {
    let a = fv(0..80);
    let b = fv(80..140);
    let combined = a.concat(&b);
    let first_half = combined.take(80);
    assert_eq!(first_half, a);
}
