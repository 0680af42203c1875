// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! Errors returned by filter construction and combination.
use thiserror::Error;

/// A Bloom filter error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A constructor argument or operand violated its precondition.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// The filter has no bits or no hashes. Never returned: constructors rule
    /// this out, so hitting it is a bug and aborts with this message.
    #[error("bloom filter not initialized")]
    NotInitialized,
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
