// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! A Bloom filter that can be shared between threads.
use std::fmt;

use parking_lot::RwLock;

use crate::bloom::BloomFilter;
use crate::error::Result;

/// A [`BloomFilter`] behind a reader/writer lock.
///
/// Insertions and clears take the lock exclusively; queries share it.
#[derive(Debug)]
pub struct SyncBloomFilter {
    inner: RwLock<BloomFilter>,
}

impl SyncBloomFilter {
    /// Return a new filter of `nbits` bits probed by `nhashes` hashes.
    pub fn new(nbits: u64, nhashes: u64) -> Result<Self> {
        BloomFilter::new(nbits, nhashes).map(Self::from)
    }

    /// Return a new filter sized for `capacity` items at `fp_rate`.
    pub fn with_rate(capacity: u64, fp_rate: f64) -> Result<Self> {
        BloomFilter::with_rate(capacity, fp_rate).map(Self::from)
    }

    /// See [`BloomFilter::insert`].
    pub fn insert<T: AsRef<[u8]> + ?Sized>(&self, item: &T) {
        self.inner.write().insert(item);
    }

    /// See [`BloomFilter::contains`].
    pub fn contains<T: AsRef<[u8]> + ?Sized>(&self, item: &T) -> bool {
        self.inner.read().contains(item)
    }

    /// See [`BloomFilter::clear`].
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// See [`BloomFilter::info`].
    pub fn info(&self) -> String {
        self.inner.read().info()
    }

    /// Number of bits in the filter.
    pub fn bits(&self) -> u64 {
        self.inner.read().bits()
    }

    /// Number of hashes per item.
    pub fn hashes(&self) -> u64 {
        self.inner.read().hashes()
    }

    /// Return a copy of the filter as it is now.
    pub fn snapshot(&self) -> BloomFilter {
        self.inner.read().clone()
    }

    /// Unwrap the inner filter.
    pub fn into_inner(self) -> BloomFilter {
        self.inner.into_inner()
    }
}

impl From<BloomFilter> for SyncBloomFilter {
    fn from(filter: BloomFilter) -> Self {
        Self {
            inner: RwLock::new(filter),
        }
    }
}

impl fmt::Display for SyncBloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner.read(), f)
    }
}
