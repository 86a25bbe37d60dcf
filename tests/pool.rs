use rrbtree::{save, load, load_strict, FlexVector};

#[test]
fn save_then_load_round_trips_a_small_vector() {
    let v: FlexVector<i32> = (0..10).collect();
    let pool = save(&v);
    let loaded: FlexVector<i32> = load(&pool, 0).expect("pool should load");
    assert_eq!(loaded, v);
}

#[test]
fn save_then_load_round_trips_a_large_vector() {
    let v: FlexVector<i32> = (0..5000).collect();
    let pool = save(&v);
    let loaded: FlexVector<i32> = load(&pool, 0).expect("pool should load");
    assert_eq!(loaded.len(), v.len());
    for i in 0..v.len() {
        assert_eq!(*loaded.get(i), *v.get(i));
    }
}

#[test]
fn empty_vector_round_trips() {
    let v: FlexVector<i32> = FlexVector::new();
    let pool = save(&v);
    let loaded: FlexVector<i32> = load(&pool, 0).expect("pool should load");
    assert!(loaded.is_empty());
}

#[test]
fn json_round_trip_preserves_contents() {
    let v: FlexVector<i32> = (0..300).collect();
    let pool = save(&v);
    let json = pool.to_json().expect("serializes to json");
    let parsed = rrbtree::Pool::<i32>::from_json(&json).expect("parses back");
    let loaded: FlexVector<i32> = load(&parsed, 0).expect("pool should load");
    assert_eq!(loaded.len(), 300);
    for i in 0..300 {
        assert_eq!(*loaded.get(i), i as i32);
    }
}

#[test]
fn incompatible_bits_is_rejected() {
    let v: FlexVector<i32> = (0..10).collect();
    let mut pool = save(&v);
    pool.b = 4;
    let result: Result<FlexVector<i32>, _> = load(&pool, 0);
    assert!(result.is_err());
}

#[test]
fn dangling_child_id_is_rejected() {
    let v: FlexVector<i32> = (0..40).collect();
    let mut pool = save(&v);
    for (_, record) in pool.inners.iter_mut() {
        if let Some(child) = record.children.first_mut() {
            *child = 9_999_999;
        }
    }
    let result: Result<FlexVector<i32>, _> = load(&pool, 0);
    assert!(result.is_err());
}

#[test]
fn out_of_range_vector_index_is_rejected() {
    let v: FlexVector<i32> = (0..10).collect();
    let pool = save(&v);
    let result: Result<FlexVector<i32>, _> = load(&pool, 5);
    assert!(result.is_err());
}

#[test]
fn load_strict_accepts_a_strictly_built_vector() {
    // Sequential push_back over a length that is an exact multiple of
    // the branching factor never needs a relaxed node.
    let flex: FlexVector<i32> = (0..1024).collect();
    let pool = save(&flex);
    let loaded = load_strict::<i32, rrbtree::DefaultPolicy>(&pool, 0);
    assert!(loaded.is_ok());
}
