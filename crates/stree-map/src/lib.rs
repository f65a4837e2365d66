//! Open-addressed hash map keyed by a pair of keys, with two-level locality.
//!
//! `TwoKeyMap` stores `(K1, K2) -> V` entries in fixed-size buckets. The
//! first key picks the bucket, the second key picks the slot inside it, so
//! all entries sharing a `K1` cluster into a handful of cache lines and can
//! be enumerated without materializing a per-`K1` map.
//!
//! The map was built to back a suffix tree's child edges — `K1` a parent
//! node index, `K2` the first symbol of an edge — where tens of millions of
//! tiny entries make per-node maps prohibitively expensive. Nothing in the
//! crate depends on that use: keys and values are any `Copy` types.

mod map;

#[cfg(test)]
mod fuzz;

pub use map::{Pairs, TwoKeyMap};
