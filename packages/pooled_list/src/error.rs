use thiserror::Error;

/// Errors returned by the fallible (`try_*`) list operations.
///
/// Each fallible operation has a panicking counterpart without the `try_` prefix that treats
/// these conditions as programming errors.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Every slot in the list's pool is occupied.
    #[error("the list is full: all {capacity} slots are occupied")]
    Full {
        /// The fixed capacity of the list.
        capacity: usize,
    },

    /// The position was obtained from a different list instance.
    #[error("the position belongs to a different list")]
    ForeignPosition,

    /// The operation requires a position that refers to an item but the end position was given.
    #[error("the end position does not refer to an item")]
    EndPosition,

    /// The position refers to a slot that no longer holds an item, typically because the item
    /// was erased after the position was obtained.
    #[error("the position refers to slot {index}, which does not hold an item")]
    VacantPosition {
        /// The index of the pool slot the position refers to.
        index: usize,
    },
}

/// A specialized `Result` type for list operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
