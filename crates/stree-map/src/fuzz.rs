//! Property tests driving the map against a reference model.
//!
//! Arbitrary byte streams are decoded into put/remove/get command
//! sequences, applied to both a `TwoKeyMap` and a flat `FxHashMap` keyed by
//! the pair, and the observable behavior compared after every step.

use crate::TwoKeyMap;
use rustc_hash::FxHashMap;

#[test]
fn matches_reference_model() {
    bolero::check!().for_each(|ops: &[u8]| {
        let mut map = TwoKeyMap::new(4);
        let mut model: FxHashMap<(u8, u8), u8> = FxHashMap::default();
        for chunk in ops.chunks_exact(4) {
            let [op, k1, k2, value] = [chunk[0], chunk[1], chunk[2], chunk[3]];
            // Narrow key ranges so probe collisions and tombstone reuse
            // actually occur.
            let k1 = k1 % 16;
            let k2 = k2 % 8;
            match op % 3 {
                0 => assert_eq!(map.put(k1, k2, value), model.insert((k1, k2), value)),
                1 => assert_eq!(map.remove(k1, k2), model.remove(&(k1, k2))),
                _ => assert_eq!(map.get(k1, k2), model.get(&(k1, k2)).copied()),
            }
        }
        assert_eq!(map.len(), model.len());
        for k1 in 0..16 {
            let mut entries: Vec<_> = map.pairs(k1).collect();
            entries.sort_unstable();
            let mut expected: Vec<_> = model
                .iter()
                .filter(|((first, _), _)| *first == k1)
                .map(|((_, second), value)| (*second, *value))
                .collect();
            expected.sort_unstable();
            assert_eq!(entries, expected);
        }
    });
}
