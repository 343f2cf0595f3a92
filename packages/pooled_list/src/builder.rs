use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::{DropPolicy, List, Storage};

/// Builder for creating an instance of [`List`].
///
/// You only need to use this builder if you want to customize the list configuration.
/// The default configuration used by [`List::new()`][1] is sufficient for most use cases.
///
/// The capacity and storage strategy are not configured here; they are part of the list type.
///
/// # Examples
///
/// ```
/// use pooled_list::{DropPolicy, ObjectList};
///
/// let list = ObjectList::<String, 16>::builder()
///     .drop_policy(DropPolicy::MayDropItems)
///     .build();
///
/// assert_eq!(list.capacity(), 16);
/// ```
///
/// [1]: List::new
#[must_use]
pub struct ListBuilder<S: Storage> {
    drop_policy: DropPolicy,

    _storage: PhantomData<fn() -> S>,
}

impl<S: Storage> fmt::Debug for ListBuilder<S> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListBuilder")
            .field("item_type", &format_args!("{}", type_name::<S::Value>()))
            .field("capacity", &S::CAPACITY)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}

impl<S: Storage> ListBuilder<S> {
    pub(crate) fn new() -> Self {
        Self {
            drop_policy: DropPolicy::default(),
            _storage: PhantomData,
        }
    }

    /// Sets the [drop policy][DropPolicy] for the list. This governs how
    /// to treat remaining items in the list when the list is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooled_list::{DropPolicy, ValueList};
    ///
    /// let mut list = ValueList::<u32, 8>::builder()
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build();
    ///
    /// list.push_back(42);
    ///
    /// // The list must be emptied before it is dropped.
    /// list.clear();
    /// ```
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the list with the specified configuration, allocating the pool for all
    /// `S::CAPACITY` items.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero.
    #[must_use]
    pub fn build(self) -> List<S> {
        List::new_inner(self.drop_policy)
    }
}
