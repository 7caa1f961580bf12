//! The single error taxonomy shared by every fallible operation.
//!
//! Mirrors `ordered_map_error_t` from the original source, with the success case folded
//! into `Result::Ok` instead of a zero variant, and `NullArgument` kept only for parity —
//! Rust's ownership rules make "missing argument" a compile-time property, so it is not
//! reachable through this crate's safe API.

use thiserror::Error;

/// Everything that can go wrong calling into a [`crate::Map`] or [`crate::Cursor`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// Reserved for parity with the original taxonomy. Not reachable through the safe API:
    /// required keys and values are owned, non-`Option` parameters here.
    #[error("a required argument was not supplied")]
    NullArgument,

    /// [`crate::Policy`] was constructed without a comparator.
    #[error("the element policy is missing a required comparator")]
    InvalidConfig,

    /// The arena failed to grow to accommodate a new binding.
    #[error("allocation failed while materializing a key or value")]
    OutOfMemory,

    /// The operation requires the key to already be present, and it was not.
    #[error("no binding exists for the given key")]
    KeyNotFound,

    /// The cursor's handle no longer matches the slot it pointed at (the binding was removed).
    #[error("cursor has been invalidated by a prior mutation")]
    IteratorInvalid,

    /// The cursor has advanced past the last binding.
    #[error("cursor has advanced past the last binding")]
    IteratorAtEnd,
}

impl MapError {
    /// A stable, human-readable message for this error kind.
    ///
    /// Equivalent to `ordered_map_error_string`, provided alongside the `Display`/`Error`
    /// impls `thiserror` derives for callers that want a plain `&'static str`.
    pub const fn message(self) -> &'static str {
        match self {
            MapError::NullArgument => "a required argument was not supplied",
            MapError::InvalidConfig => "the element policy is missing a required comparator",
            MapError::OutOfMemory => "allocation failed while materializing a key or value",
            MapError::KeyNotFound => "no binding exists for the given key",
            MapError::IteratorInvalid => "cursor has been invalidated by a prior mutation",
            MapError::IteratorAtEnd => "cursor has advanced past the last binding",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_matches_display() {
        for e in [
            MapError::NullArgument,
            MapError::InvalidConfig,
            MapError::OutOfMemory,
            MapError::KeyNotFound,
            MapError::IteratorInvalid,
            MapError::IteratorAtEnd,
        ] {
            assert_eq!(e.message(), e.to_string());
        }
    }
}
