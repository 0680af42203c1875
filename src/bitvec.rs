// Copyright (c) 2020 Helge Wrede, Alexander Schultheiß, Lukas Simon
// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! Word-packed bit vector.
use std::fmt::Debug;

/// Number of bits stored per word.
pub const WORD_BITS: u64 = u64::BITS as u64;

/// A bit vector packed into 64-bit words.
#[derive(Clone, PartialEq, Eq)]
pub struct BitVec {
    words: Vec<u64>,
    nbits: u64,
}

impl BitVec {
    /// Create a new, zeroed bit vector of the given capacity, in bits.
    pub fn new(capacity: u64) -> Self {
        Self {
            nbits: capacity,
            words: vec![0; word_count(capacity)],
        }
    }

    /// Get the length in bits of the vector.
    pub fn len(&self) -> u64 {
        self.nbits
    }

    /// Check whether this vector is empty, ie. has a length of zero.
    pub fn is_empty(&self) -> bool {
        self.nbits == 0
    }

    /// Set all bits to zero.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Set a single bit to `1`.
    pub fn set(&mut self, index: u64) {
        self.check_bounds(index);

        let (word, mask) = locate(index);
        self.words[word] |= mask;
    }

    /// Check whether a bit is set.
    pub fn is_set(&self, index: u64) -> bool {
        self.check_bounds(index);

        let (word, mask) = locate(index);
        self.words[word] & mask != 0
    }

    /// Count the number of `1` bits.
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Count the number of `0` bits.
    pub fn count_zeros(&self) -> u64 {
        self.len() - self.count_ones()
    }

    /// Return the union of two bit vectors.
    /// This is a bitwise `OR` of two vectors.
    pub fn union(&self, other: &Self) -> Self {
        self.zip_with(other, "union", |a, b| a | b)
    }

    /// Return the intersection of two bit vectors.
    /// This is a bitwise `AND` of two vectors.
    pub fn intersection(&self, other: &Self) -> Self {
        self.zip_with(other, "intersect", |a, b| a & b)
    }

    /// Merge the bits of `other` into this vector.
    pub fn union_in_place(&mut self, other: &Self) {
        self.check_same_len(other, "union");
        self.words
            .iter_mut()
            .zip(other.words.iter())
            .for_each(|(a, b)| *a |= b);
    }

    /// Return the underlying word storage.
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    fn zip_with(&self, other: &Self, op: &str, f: impl Fn(u64, u64) -> u64) -> Self {
        self.check_same_len(other, op);

        Self {
            words: self
                .words
                .iter()
                .zip(other.words.iter())
                .map(|(a, b)| f(*a, *b))
                .collect(),
            nbits: self.nbits,
        }
    }

    fn check_same_len(&self, other: &Self, op: &str) {
        if self.nbits != other.nbits {
            panic!(
                "unable to {} bitvecs with different lengths: {} and {}",
                op, self.nbits, other.nbits
            );
        }
    }

    fn check_bounds(&self, index: u64) {
        if index >= self.len() {
            panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index,
            )
        }
    }
}

/// Number of words needed to hold `nbits` bits.
pub fn word_count(nbits: u64) -> usize {
    nbits.div_ceil(WORD_BITS) as usize
}

/// Map a bit position to its word index and in-word mask.
#[inline]
fn locate(index: u64) -> (usize, u64) {
    ((index / WORD_BITS) as usize, 1 << (index % WORD_BITS))
}

impl Debug for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits: String = (0..self.nbits)
            .map(|i| if self.is_set(i) { '1' } else { '0' })
            .collect();
        write!(f, "BitVec({})", bits)
    }
}
