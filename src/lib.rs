//! A Bloom filter over byte strings, backed by a word-packed bit vector.
//!
//! # Bloom Filters
//!
//! A Bloom filter is a space-efficient probabilistic data structure that is
//! used to test whether an element is a member of a set. It allows for queries
//! to return: "possibly in set" or "definitely not in set". Elements can be
//! added to the set, but not removed; the more elements that are added to the
//! set, the larger the probability of false positives.
//!
//! A filter is either built from explicit parameters, `m` bits and `k`
//! hashes, or sized for an expected item count `n` and a target false
//! positive rate `p`:
//!
//! m = ⌈-n ln(p) / (ln 2)<sup>2</sup>⌉, k = ⌈(m / n) ln 2⌉
//!
//! # Double Hashing
//!
//! Each item is hashed twice with FNV-1a, once from the standard offset basis
//! and once from a salted one. The `k` bit positions are then derived from the
//! two hashes, following Adam Kirsch and Michael Mitzenmacher in *Less Hashing,
//! Same Performance: Building a Better Bloom Filter*:
//!
//! g<sub>i</sub>(x) = (H<sub>1</sub>(x) + iH<sub>2</sub>(x)) mod m
//!
//! # Example
//!
//! ```
//! use fnvbloom::BloomFilter;
//!
//! let mut filter = BloomFilter::with_rate(32, 0.01)?;
//!
//! filter.insert("foo");
//! filter.insert(b"bar");
//!
//! assert!(filter.contains("foo"));
//! assert!(filter.contains("bar"));
//! filter.contains("baz"); // false, most likely
//!
//! filter.clear();
//! assert!(!filter.contains("foo"));
//! # Ok::<(), fnvbloom::Error>(())
//! ```
#![warn(missing_docs)]
#![allow(clippy::bool_assert_comparison)]

pub mod bitvec;
pub mod bloom;
pub mod error;
pub mod hash;
pub mod sync;

pub use bloom::BloomFilter;
pub use error::{Error, Result};
pub use sync::SyncBloomFilter;
