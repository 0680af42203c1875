// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! FNV-1a hashing and the seed pair used for double hashing.
use std::hash::Hasher;

/// The standard 64-bit FNV offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// The 64-bit FNV prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Odd constant mixed into the offset basis of the second hash. It also
/// replaces a zero step in the probe sequence.
pub const SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// A streaming 64-bit FNV-1a hasher.
///
/// Not suitable where an adversary controls the input; collisions are
/// cheap to construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    /// Create a hasher starting from the standard offset basis.
    pub fn new() -> Self {
        Self::with_basis(FNV_OFFSET_BASIS)
    }

    /// Create a hasher starting from a custom offset basis.
    pub fn with_basis(basis: u64) -> Self {
        Self { state: basis }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state ^= *byte as u64;
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// Return the FNV-1a hash of `data`, starting from `basis`.
#[inline]
pub fn fnv1a(data: &[u8], basis: u64) -> u64 {
    let mut hasher = FnvHasher::with_basis(basis);
    hasher.write(data);
    hasher.finish()
}

/// Return the two seeds `(h1, h2)` for the probe sequence of `data`.
///
/// Both are FNV-1a over the same bytes; `h2` starts from the offset basis
/// XORed with [`SALT`]. `h2` may be zero; the filter replaces a zero step
/// before probing.
pub fn hash_pair(data: &[u8]) -> (u64, u64) {
    let h1 = fnv1a(data, FNV_OFFSET_BASIS);
    let h2 = fnv1a(data, FNV_OFFSET_BASIS ^ SALT);

    (h1, h2)
}

/// Replace a zero probe step with [`SALT`]; a zero step would make every
/// probe land on `h1 mod m`.
#[inline]
pub(crate) fn nonzero_step(h2: u64) -> u64 {
    if h2 == 0 {
        SALT
    } else {
        h2
    }
}
