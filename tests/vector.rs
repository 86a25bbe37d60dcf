use rrbtree::Vector;

#[test]
fn empty_vector_has_zero_length() {
    let v: Vector<i32> = Vector::new();
    assert_eq!(v.len(), 0);
    assert!(v.is_empty());
}

#[test]
fn push_back_preserves_order() {
    let mut v: Vector<i32> = Vector::new();
    for i in 0..666 {
        v = v.push_back(i);
    }
    assert_eq!(v.len(), 666);
    for i in 0..666 {
        assert_eq!(*v.get(i), i as i32);
    }
}

#[test]
fn push_back_is_persistent() {
    let v0: Vector<i32> = Vector::new();
    let v1 = v0.push_back(1);
    let v2 = v1.push_back(2);
    assert_eq!(v0.len(), 0);
    assert_eq!(v1.len(), 1);
    assert_eq!(v2.len(), 2);
    assert_eq!(*v1.get(0), 1);
    assert_eq!(*v2.get(0), 1);
    assert_eq!(*v2.get(1), 2);
}

#[test]
fn set_does_not_mutate_the_original() {
    let v: Vector<i32> = (0..40).collect();
    let updated = v.set(10, 999);
    assert_eq!(*v.get(10), 10);
    assert_eq!(*updated.get(10), 999);
    for i in 0..40 {
        if i != 10 {
            assert_eq!(*updated.get(i), i as i32);
        }
    }
}

#[test]
fn update_applies_a_function_to_the_old_value() {
    let v: Vector<i32> = (0..40).collect();
    let updated = v.update(5, |x| x * 10);
    assert_eq!(*updated.get(5), 50);
    assert_eq!(*v.get(5), 5);
}

#[test]
fn take_keeps_a_prefix() {
    let v: Vector<i32> = (0..200).collect();
    let prefix = v.take(70);
    assert_eq!(prefix.len(), 70);
    for i in 0..70 {
        assert_eq!(*prefix.get(i), i as i32);
    }
}

#[test]
fn take_beyond_length_returns_the_same_vector() {
    let v: Vector<i32> = (0..10).collect();
    let same = v.take(1000);
    assert_eq!(same.len(), 10);
}

#[test]
fn take_zero_is_empty() {
    let v: Vector<i32> = (0..10).collect();
    assert!(v.take(0).is_empty());
}

#[test]
fn drop_keeps_a_suffix() {
    let v: Vector<i32> = (0..200).collect();
    let suffix = v.drop(150);
    assert_eq!(suffix.len(), 50);
    for i in 0..50 {
        assert_eq!(*suffix.get(i), (150 + i) as i32);
    }
}

#[test]
fn drop_beyond_length_is_empty() {
    let v: Vector<i32> = (0..10).collect();
    assert!(v.drop(1000).is_empty());
}

#[test]
fn take_then_push_back_still_works() {
    let v: Vector<i32> = (0..100).collect();
    let mut shortened = v.take(33);
    shortened = shortened.push_back(1000);
    assert_eq!(shortened.len(), 34);
    assert_eq!(*shortened.get(33), 1000);
    for i in 0..33 {
        assert_eq!(*shortened.get(i), i as i32);
    }
}

#[test]
fn iter_visits_every_element_in_order() {
    let v: Vector<i32> = (0..500).collect();
    let collected: Vec<i32> = v.iter().copied().collect();
    let expected: Vec<i32> = (0..500).collect();
    assert_eq!(collected, expected);
}

#[test]
fn reduce_sums_elements() {
    let v: Vector<i32> = (1..=100).collect();
    let sum = v.reduce(0, |acc, x| acc + x);
    assert_eq!(sum, 5050);
}

#[test]
fn equality_is_elementwise() {
    let a: Vector<i32> = (0..50).collect();
    let b: Vector<i32> = (0..50).collect();
    assert_eq!(a, b);
    let c = a.set(25, -1);
    assert_ne!(a, c);
}

#[test]
fn deep_structural_sharing_survives_many_versions() {
    let mut versions = Vec::new();
    let mut v: Vector<i32> = Vector::new();
    for i in 0..2000 {
        v = v.push_back(i);
        versions.push(v.clone());
    }
    for (i, version) in versions.iter().enumerate() {
        assert_eq!(version.len(), i + 1);
        assert_eq!(*version.get(i), i as i32);
    }
}

#[test]
#[should_panic]
fn get_out_of_bounds_panics() {
    let v: Vector<i32> = (0..5).collect();
    let _ = v.get(5);
}
