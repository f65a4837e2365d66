//! The two-level open-addressed map.
//!
//! Layout follows four parallel arrays: a byte-wide slot-state array and
//! `MaybeUninit` arrays for the two keys and the value. A slot's key/value
//! cells are initialized exactly when its state byte says `Occupied`, and
//! every stored type is `Copy`, so slots carry no drop glue.
//!
//! Probing is two-level:
//! - the first key's hash, mixed with an odd constant, selects a bucket
//!   (high bits, masked to bucket-start granularity);
//! - both hashes seed the starting slot inside the bucket, advancing
//!   linearly over the bucket's slots;
//! - an exhausted bucket advances by an odd multiple of the bucket length
//!   derived from the first key alone, so the bucket walk is coprime with
//!   the bucket count and visits every bucket exactly once.
//!
//! Because the bucket walk depends only on `K1`, per-`K1` enumeration can
//! replay it and scan whole buckets, stopping once the recorded population
//! for that key has been yielded.

use rustc_hash::{FxHashMap, FxHasher};
use std::{
    fmt,
    hash::{Hash, Hasher},
    mem::MaybeUninit,
};

/// Odd mixing constant applied to the first key's hash.
const FIRST_KEY_MIX: u64 = 0x9e37_79b9;

/// Odd mixing constant applied to the combined hash that seeds the
/// in-bucket slot.
const SECOND_KEY_MIX: u64 = 0x85eb_ca6b;

/// Capacities at or below this grow 4x; larger maps grow 2x.
const GROWTH_SWITCH: usize = 65_536;

/// Hard ceiling on the slot count.
const MAX_CAPACITY: usize = 1 << (usize::BITS - 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum SlotState {
    Empty = 0,
    Deleted,
    Occupied,
}

fn fx<T: Hash>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Open-addressed map from `(K1, K2)` pairs to values.
///
/// See the crate docs for the probing scheme. All three stored types must
/// be `Copy`; lookups and iteration return values by copy.
pub struct TwoKeyMap<K1, K2, V> {
    states: Box<[SlotState]>,
    keys1: Box<[MaybeUninit<K1>]>,
    keys2: Box<[MaybeUninit<K2>]>,
    values: Box<[MaybeUninit<V>]>,
    /// log2 of the bucket length.
    bucket_shift: u32,
    len: usize,
    deleted: usize,
    /// Bumped on every structural change (insert, remove, growth).
    mods: u64,
    /// Live entry count per first key; drives per-`K1` iteration cutoff.
    per_key: FxHashMap<K1, usize>,
}

/// Result of a probe over every reachable slot.
enum ProbeHit {
    /// Slot holding both keys.
    Found(usize),
    /// Key pair absent; a free slot is available for insertion.
    Free(usize),
    /// Key pair absent and every reachable slot is occupied.
    Full,
}

impl<K1, K2, V> TwoKeyMap<K1, K2, V>
where
    K1: Copy + Eq + Hash,
    K2: Copy + Eq + Hash,
    V: Copy,
{
    /// Creates a map whose buckets hold at least `second_key_capacity`
    /// slots, rounded up to a power of two.
    ///
    /// `second_key_capacity` is meant to be the number of distinct `K2`
    /// values expected under one `K1` (for a suffix tree, the alphabet
    /// size), so that one bucket usually holds all of a key's entries.
    pub fn new(second_key_capacity: usize) -> Self {
        Self::with_capacity(second_key_capacity, 0)
    }

    /// Creates a map with room for roughly `capacity` entries before the
    /// first growth.
    pub fn with_capacity(second_key_capacity: usize, capacity: usize) -> Self {
        assert!(second_key_capacity > 0, "bucket capacity must be positive");
        let bucket_len = second_key_capacity.next_power_of_two();
        let bucket_shift = bucket_len.trailing_zeros();
        let slots = capacity
            .saturating_mul(2)
            .next_power_of_two()
            .max(bucket_len * 16);
        assert!(slots <= MAX_CAPACITY, "requested capacity exceeds the addressable limit");
        Self::with_slots(bucket_shift, slots)
    }

    fn with_slots(bucket_shift: u32, slots: usize) -> Self {
        debug_assert!(slots.is_power_of_two() && slots >= 1 << bucket_shift);
        Self {
            states: vec![SlotState::Empty; slots].into_boxed_slice(),
            keys1: Box::new_uninit_slice(slots),
            keys2: Box::new_uninit_slice(slots),
            values: Box::new_uninit_slice(slots),
            bucket_shift,
            len: 0,
            deleted: 0,
            mods: 0,
            per_key: FxHashMap::default(),
        }
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.states.len()
    }

    /// Slots per bucket.
    #[inline]
    pub fn bucket_len(&self) -> usize {
        1 << self.bucket_shift
    }

    /// Number of live entries stored under `k1`.
    #[inline]
    pub fn key_len(&self, k1: K1) -> usize {
        self.per_key.get(&k1).copied().unwrap_or(0)
    }

    /// Looks up the value stored under `(k1, k2)`.
    pub fn get(&self, k1: K1, k2: K2) -> Option<V> {
        match self.probe(k1, k2) {
            ProbeHit::Found(slot) => Some(self.value_at(slot)),
            _ => None,
        }
    }

    pub fn contains_key(&self, k1: K1, k2: K2) -> bool {
        matches!(self.probe(k1, k2), ProbeHit::Found(_))
    }

    /// Inserts `value` under `(k1, k2)`, returning the previous value if
    /// the pair was already present.
    ///
    /// # Panics
    ///
    /// Panics if growth would exceed the addressable slot limit.
    pub fn put(&mut self, k1: K1, k2: K2, value: V) -> Option<V> {
        if 2 * (self.len + self.deleted) > self.capacity() {
            self.grow();
        }
        loop {
            match self.probe(k1, k2) {
                ProbeHit::Found(slot) => {
                    let previous = self.value_at(slot);
                    self.values[slot].write(value);
                    return Some(previous);
                }
                ProbeHit::Free(slot) => {
                    if self.states[slot] == SlotState::Deleted {
                        self.deleted -= 1;
                    }
                    self.occupy(slot, k1, k2, value);
                    self.len += 1;
                    self.mods += 1;
                    *self.per_key.entry(k1).or_insert(0) += 1;
                    return None;
                }
                ProbeHit::Full => self.grow(),
            }
        }
    }

    /// Removes the entry under `(k1, k2)`, leaving a tombstone.
    pub fn remove(&mut self, k1: K1, k2: K2) -> Option<V> {
        let ProbeHit::Found(slot) = self.probe(k1, k2) else {
            return None;
        };
        let value = self.value_at(slot);
        self.states[slot] = SlotState::Deleted;
        self.len -= 1;
        self.deleted += 1;
        self.mods += 1;
        match self.per_key.get_mut(&k1) {
            Some(count) if *count > 1 => *count -= 1,
            _ => {
                self.per_key.remove(&k1);
            }
        }
        Some(value)
    }

    /// Lazily enumerates the `(K2, V)` entries stored under `k1`.
    ///
    /// The sequence walks only the buckets reachable for `k1` and ends
    /// after the key's recorded population has been yielded. Each entry is
    /// yielded exactly once, in no particular order.
    ///
    /// # Panics
    ///
    /// Panics if the map's structure is observed to change mid-iteration.
    pub fn pairs(&self, k1: K1) -> Pairs<'_, K1, K2, V> {
        let (bucket, step) = self.bucket_walk(fx(&k1));
        Pairs {
            map: self,
            k1,
            bucket,
            step,
            slot_in_bucket: 0,
            buckets_left: self.capacity() >> self.bucket_shift,
            remaining: self.key_len(k1),
            expected_mods: self.mods,
        }
    }

    /// First bucket and bucket advance (both in slot units) for a first-key
    /// hash. Both are multiples of the bucket length; the advance is an odd
    /// multiple, hence coprime with the bucket count.
    fn bucket_walk(&self, h1: u64) -> (usize, usize) {
        let mask = self.capacity() - 1;
        let bucket_mask = mask & !(self.bucket_len() - 1);
        let mixed = h1.wrapping_mul(FIRST_KEY_MIX);
        let bucket = ((mixed >> 32) as usize) & bucket_mask;
        let step = ((((mixed >> 15) as usize) | 1) << self.bucket_shift) & mask;
        (bucket, step)
    }

    /// Starting slot offset inside a bucket for a key pair.
    fn slot_offset(&self, h1: u64, h2: u64) -> usize {
        let mixed = h1.wrapping_add(h2).wrapping_mul(SECOND_KEY_MIX);
        ((mixed >> 16) as usize) & (self.bucket_len() - 1)
    }

    /// Deterministic probe over every slot reachable for `(k1, k2)`.
    ///
    /// Visits each reachable slot at most once. An `Empty` slot proves the
    /// pair absent; `Deleted` slots are skipped but remembered so inserts
    /// can reuse the first one.
    fn probe(&self, k1: K1, k2: K2) -> ProbeHit {
        let h1 = fx(&k1);
        let h2 = fx(&k2);
        let (mut bucket, step) = self.bucket_walk(h1);
        let offset = self.slot_offset(h1, h2);
        let mask = self.capacity() - 1;
        let bucket_len = self.bucket_len();
        let buckets = self.capacity() >> self.bucket_shift;
        let mut first_free = None;
        for _ in 0..buckets {
            for i in 0..bucket_len {
                let slot = bucket + ((offset + i) & (bucket_len - 1));
                match self.states[slot] {
                    SlotState::Empty => {
                        return ProbeHit::Free(first_free.unwrap_or(slot));
                    }
                    SlotState::Deleted => {
                        if first_free.is_none() {
                            first_free = Some(slot);
                        }
                    }
                    SlotState::Occupied => {
                        if self.key1_at(slot) == k1 && self.key2_at(slot) == k2 {
                            return ProbeHit::Found(slot);
                        }
                    }
                }
            }
            bucket = (bucket + step) & mask;
        }
        match first_free {
            Some(slot) => ProbeHit::Free(slot),
            None => ProbeHit::Full,
        }
    }

    /// Reallocates at 4x (2x past the switch point) and reinserts every
    /// occupied slot. Tombstones are dropped; bucket length is preserved.
    fn grow(&mut self) {
        let capacity = self.capacity();
        let factor = if capacity > GROWTH_SWITCH { 2 } else { 4 };
        let Some(new_capacity) = capacity.checked_mul(factor).filter(|&c| c <= MAX_CAPACITY) else {
            panic!("two-key map cannot grow past {MAX_CAPACITY} slots");
        };
        tracing::trace!(capacity, new_capacity, len = self.len, "growing two-key map");
        let mut next = Self::with_slots(self.bucket_shift, new_capacity);
        for slot in 0..capacity {
            if self.states[slot] == SlotState::Occupied {
                next.insert_fresh(self.key1_at(slot), self.key2_at(slot), self.value_at(slot));
            }
        }
        next.len = self.len;
        next.mods = self.mods + 1;
        next.per_key = std::mem::take(&mut self.per_key);
        *self = next;
    }

    /// Insert into a table known to contain neither the key pair nor any
    /// tombstone. Only used while rehashing.
    fn insert_fresh(&mut self, k1: K1, k2: K2, value: V) {
        match self.probe(k1, k2) {
            ProbeHit::Free(slot) => self.occupy(slot, k1, k2, value),
            _ => unreachable!("rehash target must have a free slot"),
        }
    }

    fn occupy(&mut self, slot: usize, k1: K1, k2: K2, value: V) {
        self.keys1[slot].write(k1);
        self.keys2[slot].write(k2);
        self.values[slot].write(value);
        self.states[slot] = SlotState::Occupied;
    }

    #[inline]
    fn key1_at(&self, slot: usize) -> K1 {
        debug_assert_eq!(self.states[slot], SlotState::Occupied);
        // SAFETY: the slot is Occupied, and `occupy` initializes all three
        // cells before setting the state byte.
        unsafe { self.keys1[slot].assume_init() }
    }

    #[inline]
    fn key2_at(&self, slot: usize) -> K2 {
        debug_assert_eq!(self.states[slot], SlotState::Occupied);
        // SAFETY: as in `key1_at`.
        unsafe { self.keys2[slot].assume_init() }
    }

    #[inline]
    fn value_at(&self, slot: usize) -> V {
        debug_assert_eq!(self.states[slot], SlotState::Occupied);
        // SAFETY: as in `key1_at`.
        unsafe { self.values[slot].assume_init() }
    }
}

impl<K1, K2, V> fmt::Debug for TwoKeyMap<K1, K2, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoKeyMap")
            .field("len", &self.len)
            .field("deleted", &self.deleted)
            .field("capacity", &self.states.len())
            .field("bucket_len", &(1usize << self.bucket_shift))
            .finish()
    }
}

/// Lazy per-`K1` view over a [`TwoKeyMap`]; see [`TwoKeyMap::pairs`].
pub struct Pairs<'a, K1, K2, V> {
    map: &'a TwoKeyMap<K1, K2, V>,
    k1: K1,
    bucket: usize,
    step: usize,
    slot_in_bucket: usize,
    buckets_left: usize,
    remaining: usize,
    expected_mods: u64,
}

impl<K1, K2, V> Iterator for Pairs<'_, K1, K2, V>
where
    K1: Copy + Eq + Hash,
    K2: Copy + Eq + Hash,
    V: Copy,
{
    type Item = (K2, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        assert_eq!(
            self.map.mods, self.expected_mods,
            "two-key map modified during per-key iteration"
        );
        let bucket_len = self.map.bucket_len();
        let mask = self.map.capacity() - 1;
        while self.buckets_left > 0 {
            while self.slot_in_bucket < bucket_len {
                let slot = self.bucket + self.slot_in_bucket;
                self.slot_in_bucket += 1;
                if self.map.states[slot] == SlotState::Occupied && self.map.key1_at(slot) == self.k1
                {
                    self.remaining -= 1;
                    return Some((self.map.key2_at(slot), self.map.value_at(slot)));
                }
            }
            self.slot_in_bucket = 0;
            self.buckets_left -= 1;
            self.bucket = (self.bucket + self.step) & mask;
        }
        unreachable!("per-key population outlived the reachable buckets")
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
