// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type shared by every module of the renderer.

use std::result;

/// Everything that can go wrong inside the core.  Validation happens
/// at the edge of each public operation, so an `Error` is always
/// produced before any per-pixel work begins.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum Error {
    /// A dimension, bound, iteration cap or zoom factor was out of range.
    #[fail(display = "invalid argument: {}", _0)]
    InvalidArgument(String),

    /// A palette name that isn't one of the fixed set.
    #[fail(display = "unknown palette '{}' (available: {})", name, available)]
    UnknownPalette {
        /// The name that was asked for.
        name: String,
        /// Comma-separated list of the names that would have worked.
        available: String,
    },

    /// A worker thread died while evaluating the grid.
    #[fail(display = "computation failed: {}", _0)]
    Computation(String),
}

impl Error {
    /// True for the errors caused by bad caller input, as opposed to
    /// failures during computation.
    pub fn is_invalid_argument(&self) -> bool {
        match *self {
            Error::InvalidArgument(_) | Error::UnknownPalette { .. } => true,
            Error::Computation(_) => false,
        }
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = result::Result<T, Error>;
