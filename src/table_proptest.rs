#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can call the
// structural invariant check.

use crate::config::CollisionPolicy;
use crate::djb2::bucket_index;
use crate::table::HashTable;
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, String),
    Retrieve(usize),
    Remove(usize),
    Resize,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<Op>)> {
    (1usize..=4, proptest::collection::vec("[a-z_0-9]{0,5}", 1..=10)).prop_flat_map(
        |(capacity, pool)| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                4 => (idx.clone(), "[a-z]{0,3}").prop_map(|(i, v)| Op::Insert(i, v)),
                2 => idx.clone().prop_map(Op::Retrieve),
                2 => idx.prop_map(Op::Remove),
                1 => Just(Op::Resize),
            ];
            proptest::collection::vec(op, 1..60)
                .prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

// Property: state-machine equivalence against std::collections::HashMap.
// - insert returns the previous value exactly when the key was present.
// - retrieve/remove agree with the model; removing an absent key is a no-op.
// - resize doubles capacity and keeps every pair.
// - After each step: len matches the model and the structure is consistent.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_chained_matches_model((capacity, pool, ops) in arb_scenario()) {
        let mut sut = HashTable::new(capacity).unwrap();
        let mut model: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    let k = &pool[i];
                    let prev = sut.insert(k, &v);
                    prop_assert_eq!(prev, model.insert(k.clone(), v));
                }
                Op::Retrieve(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.retrieve(k), model.get(k).map(String::as_str));
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(k));
                }
                Op::Remove(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.remove(k), model.remove(k));
                    prop_assert!(sut.retrieve(k).is_none());
                }
                Op::Resize => {
                    if sut.capacity() < 256 {
                        let before = sut.capacity();
                        sut = sut.resize().unwrap();
                        prop_assert_eq!(sut.capacity(), before * 2);
                    }
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            sut.check_invariants();
        }

        for (k, v) in &model {
            prop_assert_eq!(sut.retrieve(k), Some(v.as_str()));
        }
        prop_assert_eq!(sut.iter().count(), model.len());
    }
}

// Property: single-slot tables hold at most one entry per bucket and never
// return a value stored under a different key.
// - Model: per-bucket occupant (key, value), indexed by the table's own
//   bucket selection.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_single_slot_matches_model((capacity, pool, ops) in arb_scenario()) {
        let mut sut = HashTable::builder()
            .capacity(capacity)
            .collision_policy(CollisionPolicy::SingleSlot)
            .warn_on_overwrite(false)
            .build()
            .unwrap();
        let mut slots: Vec<Option<(String, String)>> = vec![None; capacity];

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    let k = &pool[i];
                    let b = bucket_index(k, sut.capacity());
                    let expected_prev = match &slots[b] {
                        Some((ok, ov)) if ok == k => Some(ov.clone()),
                        _ => None,
                    };
                    prop_assert_eq!(sut.insert(k, &v), expected_prev);
                    slots[b] = Some((k.clone(), v));
                }
                Op::Retrieve(i) => {
                    let k = &pool[i];
                    let b = bucket_index(k, sut.capacity());
                    let expected = match &slots[b] {
                        Some((ok, ov)) if ok == k => Some(ov.as_str()),
                        _ => None,
                    };
                    prop_assert_eq!(sut.retrieve(k), expected);
                }
                Op::Remove(i) => {
                    let k = &pool[i];
                    let b = bucket_index(k, sut.capacity());
                    let hit = matches!(&slots[b], Some((ok, _)) if ok == k);
                    let expected = if hit { slots[b].take().map(|(_, v)| v) } else { None };
                    prop_assert_eq!(sut.remove(k), expected);
                }
                Op::Resize => {
                    if sut.capacity() < 256 {
                        sut = sut.resize().unwrap();
                        let mut grown: Vec<Option<(String, String)>> = vec![None; sut.capacity()];
                        for (k, v) in slots.into_iter().flatten() {
                            let b = bucket_index(&k, sut.capacity());
                            prop_assert!(grown[b].is_none(), "doubling must not fold buckets");
                            grown[b] = Some((k, v));
                        }
                        slots = grown;
                    }
                }
            }
            prop_assert_eq!(sut.len(), slots.iter().flatten().count());
            sut.check_invariants();
        }
    }
}
