//! Fixed-width character fields
//!
//! TPC-C record layouts declare character fields with a fixed maximum byte
//! width and a single null terminator (see `original_source/table_layout.hpp`,
//! e.g. `char c_last[MAX_LAST + 1]`). This module re-expresses that
//! constraint idiomatically: `FixedStr<N>` is a heap string capped at `N`
//! bytes with no embedded NUL, rather than a literal `char[N+1]` buffer —
//! the on-the-wire byte layout is out of scope for this core (see §6).

use std::fmt;
use thiserror::Error;

/// A string field validated against a fixed maximum byte width.
///
/// `N` is the declared width from the TPC-C table layout (e.g. 16 for
/// `c_first`), matching spec field widths exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FixedStr<const N: usize>(String);

impl<const N: usize> FixedStr<N> {
    /// Maximum byte width for this field.
    pub const MAX_LEN: usize = N;

    /// Validate and construct a fixed-width field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TooLong`] if `value` exceeds `N` bytes, or
    /// [`FieldError::EmbeddedNul`] if `value` contains a NUL byte.
    pub fn new(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        if value.len() > N {
            return Err(FieldError::TooLong {
                actual: value.len(),
                max: N,
            });
        }
        if value.contains('\0') {
            return Err(FieldError::EmbeddedNul);
        }
        Ok(Self(value))
    }

    /// Borrow the field contents as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const N: usize> TryFrom<&str> for FixedStr<N> {
    type Error = FieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Errors constructing a [`FixedStr`].
///
/// These are construction-time validation errors, not transaction results —
/// callers building record payloads handle them directly, they never
/// propagate as [`crate::TxResult::Fail`]/[`crate::TxResult::Abort`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// Value exceeds the field's declared byte width.
    #[error("field value too long: {actual} bytes exceeds maximum {max}")]
    TooLong {
        /// Actual byte length supplied.
        actual: usize,
        /// Maximum byte width declared for the field.
        max: usize,
    },
    /// Value contains an embedded NUL byte.
    #[error("field value contains an embedded NUL byte")]
    EmbeddedNul,
}
