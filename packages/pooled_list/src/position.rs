use std::sync::atomic::{self, AtomicU64};

/// Identifies one list instance for the lifetime of the process.
///
/// Positions remember the identity of the list they were obtained from, which allows the list to
/// reject positions from other lists even though slot indexes of two lists overlap.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ListId(u64);

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

impl ListId {
    #[must_use]
    pub(crate) fn next() -> Self {
        // 2^64 lists is not a realistic concern.
        Self(NEXT_LIST_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// Refers to an item in a [`List`][crate::List], or to the end of the list.
///
/// A position is a plain copyable value that does not borrow the list, so it can be stored and
/// used across mutations of the list. Positions are obtained from list operations such as
/// [`begin()`][crate::List::begin], [`push_back()`][crate::List::push_back] or
/// [`next()`][crate::List::next] and are passed back to the same list to access or modify it.
///
/// There is a single end position per list. It terminates traversal in both directions:
/// stepping forward from the back item and stepping backward from the front item both yield it.
///
/// # Validity
///
/// A position remains valid until the item it refers to is erased. Positions referring to other
/// items are not affected by insertions or removals. Using a position whose item was erased is a
/// programming error: the list panics if the slot is still vacant, but if the slot has since
/// been reused by a new item, the position silently refers to the new item.
///
/// Positions of different lists never compare equal, even if they refer to the same slot index.
///
/// # Example
///
/// ```
/// use pooled_list::ValueList;
///
/// let mut list = ValueList::<u32, 4>::new();
/// list.push_back(1);
/// let two = list.push_back(2);
/// list.push_back(3);
///
/// assert_eq!(list.value(two), &2);
/// assert_eq!(list.value(list.next(two)), &3);
/// assert!(list.next(list.rbegin()).is_end());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Position {
    owner: ListId,
    index: Option<usize>,
}

impl Position {
    #[must_use]
    pub(crate) fn new(owner: ListId, index: Option<usize>) -> Self {
        Self { owner, index }
    }

    #[must_use]
    pub(crate) fn owner(&self) -> ListId {
        self.owner
    }

    /// The index of the pool slot that holds the item, or `None` for the end position.
    ///
    /// Slot indexes are in `0..CAPACITY` and stay the same for as long as the item is in the list.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Whether this is the end position of its list.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.index.is_none()
    }
}
