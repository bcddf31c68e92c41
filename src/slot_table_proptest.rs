#![cfg(test)]

// Property tests for SlotTable kept inside the crate so they can look at
// raw slot states.

use crate::error::Error;
use crate::hash::HashStrategy;
use crate::record::{KeyField, Record};
use crate::slot_table::{Slot, SlotTable};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, String),
    Remove(usize),
    Find(usize),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=8, proptest::collection::vec("[a-e]{0,4}", 1..=10)).prop_flat_map(|(cap, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), "[a-z ,]{0,6}").prop_map(|(i, aux)| OpI::Insert(i, aux)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Find),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (cap, pool.clone(), ops))
    })
}

fn run_scenario(
    hash: HashStrategy,
    cap: usize,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut sut = SlotTable::with_hash(cap, KeyField::Primary, hash).unwrap();
    let mut model: HashMap<String, Record> = HashMap::new();
    // Slots written at least once since the last clear.
    let mut touched: BTreeSet<usize> = BTreeSet::new();

    for op in ops {
        match op {
            OpI::Insert(i, aux) => {
                let key = pool[i].clone();
                let record = Record::new(key.clone(), format!("s-{key}"), aux);
                match sut.insert(record.clone()) {
                    Ok(slot) => {
                        prop_assert!(!key.is_empty());
                        prop_assert!(!model.contains_key(&key), "insert must fail on duplicate");
                        prop_assert!(model.len() < cap);
                        touched.insert(slot);
                        model.insert(key, record);
                    }
                    Err(Error::EmptyKey) => prop_assert!(key.is_empty()),
                    Err(Error::DuplicateKey { .. }) => prop_assert!(model.contains_key(&key)),
                    Err(Error::TableFull { .. }) => {
                        prop_assert!(!model.contains_key(&key));
                        prop_assert_eq!(model.len(), cap, "full only when every slot is live");
                    }
                    Err(e) => prop_assert!(false, "unexpected error: {}", e),
                }
            }
            OpI::Remove(i) => {
                let key = &pool[i];
                let removed = sut.remove(key);
                prop_assert_eq!(removed.is_ok(), model.remove(key).is_some());
                if let Ok(slot) = removed {
                    let is_tomb = matches!(sut.slot(slot), Some(Slot::Tombstone(r)) if &r.primary == key);
                    prop_assert!(is_tomb, "removed slot keeps its payload as a tombstone");
                }
            }
            OpI::Find(i) => {
                let key = &pool[i];
                let lookup = sut.find(key);
                prop_assert_eq!(lookup.is_found(), model.contains_key(key));
                prop_assert!(lookup.probes <= cap);
                if lookup.is_found() {
                    prop_assert!(lookup.probes >= 1);
                    prop_assert_eq!(sut.search_length(key), Some(lookup.probes));
                } else {
                    prop_assert_eq!(sut.search_length(key), None);
                }
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                touched.clear();
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(_, r)| r.primary.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                let order: Vec<usize> = sut.iter().map(|(i, _)| i).collect();
                prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
            }
        }

        // Post-conditions after each op
        // 1) Live count equals the number of Occupied slots and the model size
        let occupied = sut.slots().iter().filter(|s| s.live().is_some()).count();
        prop_assert_eq!(sut.len(), occupied);
        prop_assert_eq!(sut.len(), model.len());
        // 2) Every model record is reachable with its payload
        for (k, r) in &model {
            prop_assert_eq!(sut.search(k), Some(r));
        }
        // 3) A written slot never reverts to Empty before a clear
        for &i in &touched {
            prop_assert!(sut.slot(i) != Some(&Slot::Empty));
        }
        // 4) Instrumentation bounds
        let avg = sut.average_search_length();
        if model.is_empty() {
            prop_assert_eq!(avg, 0.0);
        } else {
            prop_assert!(avg >= 1.0 && avg <= cap as f64);
        }
        prop_assert_eq!(sut.load_factor(), model.len() as f64 / cap as f64);
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Duplicate and blank keys are rejected; TableFull only when every slot is live.
// - `find`/`search_length` parity with the model, bounded by capacity.
// - `remove` leaves a tombstone holding the old payload.
// - Written slots stay non-Empty until `clear`.
// - `len`, `load_factor` and `average_search_length` agree with the model.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_byte_sum((cap, pool, ops) in arb_scenario()) {
        run_scenario(HashStrategy::ByteSum, cap, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_polynomial((cap, pool, ops) in arb_scenario()) {
        run_scenario(HashStrategy::Polynomial, cap, &pool, ops)?;
    }
}
