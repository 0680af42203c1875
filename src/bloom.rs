// Copyright (c) 2018 Aleksandr Bezobchuk
// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! A Bloom filter over a word-packed bit vector, using FNV-1a double hashing.

use std::f64;
use std::fmt;

use crate::bitvec::{word_count, BitVec};
use crate::error::{Error, Result};
use crate::hash;

/// The default false positive probability value, 1%.
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;

/// `ln` squared.
const LN_SQR: f64 = f64::consts::LN_2 * f64::consts::LN_2;

/// A Bloom filter over byte strings.
///
/// The filter itself does no locking; see [`crate::SyncBloomFilter`] for a
/// version that can be shared between threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    bits: BitVec,
    nhashes: u64,
}

impl BloomFilter {
    /// Return a new, empty Bloom filter of `nbits` bits probed by `nhashes` hashes.
    ///
    /// Fails with [`Error::InvalidParameter`] if either is zero.
    pub fn new(nbits: u64, nhashes: u64) -> Result<Self> {
        if nbits == 0 {
            return Err(Error::invalid("m", "number of bits must be > 0"));
        }
        if nhashes == 0 {
            return Err(Error::invalid("k", "number of hashes must be > 0"));
        }
        tracing::debug!(
            m = nbits,
            k = nhashes,
            words = word_count(nbits),
            "allocating bloom filter"
        );

        Ok(Self {
            bits: BitVec::new(nbits),
            nhashes,
        })
    }

    /// Return a new Bloom filter with a given approximate item capacity.
    /// The false positive probability is [`DEFAULT_FALSE_POSITIVE_RATE`].
    pub fn with_capacity(capacity: u64) -> Result<Self> {
        Self::with_rate(capacity, DEFAULT_FALSE_POSITIVE_RATE)
    }

    /// Return a new Bloom filter sized for `capacity` distinct items at a
    /// false positive probability of `fp_rate`.
    ///
    /// Fails with [`Error::InvalidParameter`] if `capacity` is zero or
    /// `fp_rate` is not strictly between 0 and 1.
    pub fn with_rate(capacity: u64, fp_rate: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid("n", "expected insertions must be > 0"));
        }
        if !(fp_rate > 0.0 && fp_rate < 1.0) {
            return Err(Error::invalid(
                "fp_rate",
                format!("must be between 0 and 1 (exclusive), got {}", fp_rate),
            ));
        }
        let nbits = optimal_bits(capacity, fp_rate);
        let nhashes = optimal_hashes(nbits, capacity);

        tracing::debug!(
            n = capacity,
            p = fp_rate,
            m = nbits,
            k = nhashes,
            "estimated bloom filter parameters"
        );
        Self::new(nbits, nhashes)
    }

    /// Set an item in the Bloom filter. This operation is idempotent with regards
    /// to each unique item.
    pub fn insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) {
        let (h1, h2) = self.seeds(item.as_ref());
        self.set_probes(h1, h2);
    }

    /// Return whether or not a given item is likely in the Bloom filter or not. There is a
    /// possibility for a false positive, but a false negative will never occur.
    pub fn contains<T: AsRef<[u8]> + ?Sized>(&self, item: &T) -> bool {
        let (h1, h2) = self.seeds(item.as_ref());
        self.probes_set(h1, h2)
    }

    /// Set all bits to zero.
    pub fn clear(&mut self) {
        tracing::trace!(m = self.bits(), "clearing bloom filter");
        self.bits.clear();
    }

    /// Return the number of bits in this filter (`m` parameter).
    pub fn bits(&self) -> u64 {
        self.bits.len()
    }

    /// Number of hashes used (`k` parameter).
    pub fn hashes(&self) -> u64 {
        self.nhashes
    }

    /// Return a short description of the filter's configuration.
    pub fn info(&self) -> String {
        self.to_string()
    }

    /// Count the bits currently set.
    pub fn count_ones(&self) -> u64 {
        self.bits.count_ones()
    }

    /// Estimate the number of distinct items inserted, from the share of set bits.
    ///
    /// A saturated filter yields `u64::MAX`.
    pub fn estimated_count(&self) -> u64 {
        let nbits = self.bits.len() as f64;
        let nbits_set = self.bits.count_ones() as f64;
        let nhashes = self.nhashes as f64;
        let count = -(nbits / nhashes) * (1. - (nbits_set / nbits)).ln();

        count.round() as u64
    }

    /// Check whether two filters can be intersected and unioned.
    pub fn is_comparable(&self, other: &Self) -> bool {
        self.nhashes == other.nhashes && self.bits.len() == other.bits.len()
    }

    /// Compute the union of two Bloom filters.
    pub fn union(&self, other: &Self) -> Result<Self> {
        self.check_comparable(other)?;

        Ok(Self {
            bits: self.bits.union(&other.bits),
            nhashes: self.nhashes,
        })
    }

    /// Compute the intersection of two Bloom filters.
    ///
    /// Items inserted into both filters are reported by the result; it may
    /// report more than an intersection built from scratch would.
    pub fn intersection(&self, other: &Self) -> Result<Self> {
        self.check_comparable(other)?;

        Ok(Self {
            bits: self.bits.intersection(&other.bits),
            nhashes: self.nhashes,
        })
    }

    /// Merge every item of `other` into this filter.
    pub fn union_with(&mut self, other: &Self) -> Result<()> {
        self.check_comparable(other)?;
        self.bits.union_in_place(&other.bits);

        Ok(())
    }

    /// Return the underlying word storage.
    pub fn as_words(&self) -> &[u64] {
        self.bits.as_words()
    }

    fn check_comparable(&self, other: &Self) -> Result<()> {
        if self.is_comparable(other) {
            Ok(())
        } else {
            Err(Error::invalid(
                "other",
                format!(
                    "filter configurations differ: {} and {}",
                    self.info(),
                    other.info()
                ),
            ))
        }
    }

    fn seeds(&self, item: &[u8]) -> (u64, u64) {
        assert!(
            self.nhashes > 0 && !self.bits.is_empty(),
            "{}",
            Error::NotInitialized
        );
        hash::hash_pair(item)
    }

    fn set_probes(&mut self, h1: u64, h2: u64) {
        let h2 = hash::nonzero_step(h2);

        for i in 0..self.nhashes {
            let index = self.bloom_hash(h1, h2, i);
            self.bits.set(index);
        }
    }

    fn probes_set(&self, h1: u64, h2: u64) -> bool {
        let h2 = hash::nonzero_step(h2);

        (0..self.nhashes).all(|i| self.bits.is_set(self.bloom_hash(h1, h2, i)))
    }

    #[inline]
    fn bloom_hash(&self, h1: u64, h2: u64, i: u64) -> u64 {
        h1.wrapping_add(i.wrapping_mul(h2)) % self.bits()
    }
}

impl fmt::Display for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BloomFilter{{m={} bits, k={}}}", self.bits(), self.hashes())
    }
}

/// Return the optimal bit vector size for a Bloom filter given an approximate
/// size and a desired false positive rate. Never less than one.
pub fn optimal_bits(capacity: u64, fp_rate: f64) -> u64 {
    let nbits = (-((fp_rate.ln() * (capacity as f64)) / LN_SQR)).ceil() as u64;

    nbits.max(1)
}

/// Return the optimal number of hash functions for a Bloom filter given a
/// bit vector size and an approximate set size. Never less than one.
///
/// Also called `k`.
pub fn optimal_hashes(nbits: u64, capacity: u64) -> u64 {
    let nhashes = ((nbits as f64 / capacity as f64) * f64::consts::LN_2).ceil() as u64;

    nhashes.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::iter;

    fn key() -> String {
        let rng = fastrand::Rng::new();
        iter::repeat_with(|| rng.alphanumeric()).take(32).collect()
    }

    fn items(size: usize) -> Vec<String> {
        let mut items = HashSet::<String>::new();
        while items.len() < size {
            items.insert(key());
        }
        items.into_iter().collect()
    }

    #[test]
    fn test_bloom_filter() {
        let n = 1024;
        let items = items(n);
        let mut bf = BloomFilter::with_capacity(items.len() as u64).unwrap();

        // Test inclusion.
        for item in items.iter() {
            bf.insert(item);

            assert_eq!(
                bf.contains(item),
                true,
                "item {} should result in a positive inclusion",
                item,
            );
        }

        // Test false negatives.
        for _ in 0..n {
            let item = key();
            let exists = bf.contains(&item);

            if items.contains(&item) {
                assert_eq!(exists, true, "item {} resulted in a false negative", item);
            }
        }
    }

    #[test]
    fn test_no_false_negatives() {
        let mut bf = BloomFilter::with_rate(1000, 0.01).unwrap();
        let keys: Vec<String> = (0..1000).map(|i| format!("key-{}", i)).collect();

        for key in &keys {
            bf.insert(key);
        }
        for (i, key) in keys.iter().enumerate() {
            assert!(bf.contains(key), "expected key {} to be present", i);
        }
    }

    #[test]
    fn test_hello_world() {
        let mut bf = BloomFilter::new(1024, 3).unwrap();

        bf.insert("hello");
        bf.insert("world");

        assert!(bf.contains("hello"));
        assert!(bf.contains("world"));

        // A false positive is allowed here, so it is not asserted.
        if bf.contains("another-key") {
            eprintln!("\"another-key\" reported as present");
        }

        bf.clear();
        assert!(!bf.contains("hello"));
        assert!(!bf.contains("world"));
    }

    #[test]
    fn test_clear() {
        let mut bf = BloomFilter::new(512, 4).unwrap();

        bf.insert("foo");
        assert!(bf.contains("foo"));
        assert!(bf.count_ones() > 0);

        bf.clear();
        assert_eq!(bf.count_ones(), 0);
        assert!(!bf.contains("foo"));
        assert_eq!(bf.bits(), 512);
        assert_eq!(bf.hashes(), 4);

        bf.insert("foo");
        assert!(bf.contains("foo"));
    }

    #[test]
    fn test_insert_sets_at_most_k_bits() {
        let mut bf = BloomFilter::new(4096, 5).unwrap();

        bf.insert(b"one");
        let after_one = bf.count_ones();
        assert!(after_one >= 1 && after_one <= 5);

        bf.insert(b"one");
        assert_eq!(bf.count_ones(), after_one);
    }

    #[test]
    fn test_contains_is_deterministic() {
        let mut bf = BloomFilter::new(256, 3).unwrap();
        for item in items(64) {
            bf.insert(&item);
        }
        for _ in 0..256 {
            let item = key();
            let first = bf.contains(&item);

            for _ in 0..4 {
                assert_eq!(bf.contains(&item), first);
            }
        }
    }

    #[test]
    fn test_empty_item() {
        let mut bf = BloomFilter::new(64, 2).unwrap();
        assert!(!bf.contains(""));

        bf.insert("");
        assert!(bf.contains(b""));
    }

    #[test]
    fn test_single_bit_filter() {
        let mut bf = BloomFilter::new(1, 3).unwrap();
        assert!(!bf.contains("x"));

        bf.insert("x");
        assert!(bf.contains("anything"));
        assert_eq!(bf.as_words(), &[1]);
    }

    #[test]
    fn test_bits_stay_in_range() {
        let mut bf = BloomFilter::new(100, 7).unwrap();
        for item in items(500) {
            bf.insert(&item);
        }
        // Padding bits of the last word are never touched.
        assert_eq!(bf.as_words().len(), 2);
        assert_eq!(bf.as_words()[1] >> (100 - 64), 0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            BloomFilter::new(0, 3),
            Err(Error::InvalidParameter { name: "m", .. })
        ));
        assert!(matches!(
            BloomFilter::new(1024, 0),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
        assert!(matches!(
            BloomFilter::with_rate(0, 0.01),
            Err(Error::InvalidParameter { name: "n", .. })
        ));
        for p in [0.0, 1.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    BloomFilter::with_rate(100, p),
                    Err(Error::InvalidParameter { name: "fp_rate", .. })
                ),
                "rate {} should be rejected",
                p
            );
        }
    }

    #[test]
    fn test_with_rate_parameters() {
        let bf = BloomFilter::with_rate(1000, 0.01).unwrap();

        assert_eq!(bf.bits(), 9586);
        assert_eq!(bf.hashes(), 7);
        assert_eq!(bf.as_words().len(), 150);
    }

    #[test]
    fn test_bits_grow_linearly() {
        let small = optimal_bits(1000, 0.01) as f64;
        let large = optimal_bits(10_000, 0.01) as f64;
        let ratio = large / small;

        assert!(ratio > 9.9 && ratio < 10.1, "ratio was {}", ratio);
    }

    #[test]
    fn test_tiny_rate_yields_many_hashes() {
        // No upper clamp on `k`: one item at a one-in-a-billion rate.
        let bf = BloomFilter::with_rate(1, 1e-9).unwrap();

        assert_eq!(bf.bits(), 44);
        assert_eq!(bf.hashes(), 31);
    }

    #[test]
    fn test_rate_near_one_clamps() {
        let bf = BloomFilter::with_rate(1, 0.999_999).unwrap();

        assert_eq!(bf.bits(), 1);
        assert_eq!(bf.hashes(), 1);
    }

    #[test]
    fn test_optimal_bits() {
        assert_eq!(optimal_bits(10, 0.04), 67);
        assert_eq!(optimal_bits(5000, 0.01), 47926);
        assert_eq!(optimal_bits(100000, 0.01), 958506);
    }

    #[test]
    fn test_optimal_hashes() {
        assert_eq!(optimal_hashes(67, 10), 5);
        assert_eq!(optimal_hashes(47926, 5000), 7);
        assert_eq!(optimal_hashes(958506, 100000), 7);
        assert_eq!(optimal_hashes(1, 1000), 1);
    }

    #[test]
    fn test_info() {
        let bf = BloomFilter::new(1024, 3).unwrap();

        assert_eq!(bf.info(), "BloomFilter{m=1024 bits, k=3}");
        assert_eq!(bf.to_string(), bf.info());
    }

    #[test]
    fn test_estimated_count() {
        let mut bf = BloomFilter::with_capacity(4096).unwrap();
        assert_eq!(bf.estimated_count(), 0);

        let few = items(12);
        for item in &few {
            bf.insert(item);
        }
        let estimate = bf.estimated_count();
        assert!((8..=12).contains(&estimate), "estimate was {}", estimate);

        for item in items(2036) {
            bf.insert(&item);
        }
        let many = bf.estimated_count();
        assert!(many > estimate);
        assert!((1600..=2460).contains(&many), "estimate was {}", many);
    }

    #[test]
    fn test_probe_positions() {
        let (m, k) = (1024, 3);
        let mut bf = BloomFilter::new(m, k).unwrap();
        bf.insert("hello");

        let (h1, h2) = hash::hash_pair(b"hello");
        let mut expected = vec![0u64; 16];
        for i in 0..k {
            let pos = h1.wrapping_add(i.wrapping_mul(h2)) % m;
            expected[(pos / 64) as usize] |= 1 << (pos % 64);
        }
        assert_eq!(bf.as_words(), expected.as_slice());
    }

    #[test]
    fn test_zero_step_uses_salt() {
        let (m, k) = (1024, 4);
        let mut zero = BloomFilter::new(m, k).unwrap();
        zero.set_probes(5, 0);

        // A zero step would put every probe on bit 5.
        assert!(zero.count_ones() > 1);
        assert!(zero.probes_set(5, 0));

        let mut salted = BloomFilter::new(m, k).unwrap();
        salted.set_probes(5, hash::SALT);
        assert_eq!(zero, salted);

        for i in 0..k {
            let pos = 5u64.wrapping_add(i.wrapping_mul(hash::SALT)) % m;
            assert!(zero.bits.is_set(pos));
        }
    }

    #[test]
    fn test_union() {
        let a_items = items(128);
        let mut a = BloomFilter::with_capacity(256).unwrap();
        for item in &a_items {
            a.insert(item);
        }

        let b_items = items(128);
        let mut b = BloomFilter::with_capacity(256).unwrap();
        for item in &b_items {
            b.insert(item);
        }

        let union = a.union(&b).unwrap();
        for item in a_items.iter().chain(b_items.iter()) {
            assert!(union.contains(item));
        }

        a.union_with(&b).unwrap();
        assert_eq!(a, union);
    }

    #[test]
    fn test_intersection() {
        let mut a = BloomFilter::with_capacity(3).unwrap();
        let mut b = a.clone();

        a.insert(&[1u8]);
        a.insert(&[2u8]);
        a.insert(&[3u8]);

        b.insert(&[3u8]);
        b.insert(&[4u8]);
        b.insert(&[5u8]);

        let intersection = a.intersection(&b).unwrap();
        assert!(intersection.contains(&[3u8]));
        assert!(intersection.count_ones() <= a.count_ones());
    }

    #[test]
    fn test_incomparable_filters() {
        let mut a = BloomFilter::new(1024, 3).unwrap();
        let b = BloomFilter::new(1024, 4).unwrap();
        let c = BloomFilter::new(2048, 3).unwrap();

        assert!(!a.is_comparable(&b));
        assert!(!a.is_comparable(&c));
        assert!(matches!(a.union(&b), Err(Error::InvalidParameter { .. })));
        assert!(matches!(a.intersection(&c), Err(Error::InvalidParameter { .. })));
        assert!(a.union_with(&c).is_err());
    }
}
