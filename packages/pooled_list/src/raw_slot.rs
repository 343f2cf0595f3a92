use std::any::type_name;
use std::fmt;

use tracing::trace;

use crate::{Embed, List, Position, Storage};

/// A slot reserved in a [`List`] by one of the `*_raw()` insertion methods, waiting for an item
/// to be written into it.
///
/// The index and position of the future item are known before the item exists, which allows the
/// item to be constructed with knowledge of where it will live.
///
/// The list is not modified until [`write()`][Self::write] is called. Dropping the slot without
/// writing to it leaves the list unchanged.
///
/// # Example
///
/// ```
/// use pooled_list::ValueList;
///
/// let mut list = ValueList::<usize, 4>::new();
///
/// // Each item remembers the slot it lives in.
/// for _ in 0..3 {
///     let slot = list.push_back_raw();
///     let index = slot.index();
///     slot.write(index);
/// }
///
/// let mut position = list.begin();
/// while !position.is_end() {
///     assert_eq!(position.index(), Some(*list.value(position)));
///     position = list.next(position);
/// }
/// ```
pub struct RawSlot<'l, S: Storage> {
    list: &'l mut List<S>,

    index: usize,

    previous: Option<usize>,
    next: Option<usize>,
}

impl<'l, S: Storage> RawSlot<'l, S> {
    /// The caller is responsible for ensuring that the list has a vacant slot and that
    /// `previous` and `next` are adjacent in the list (either may be the end sentinel).
    pub(crate) fn new(list: &'l mut List<S>, previous: Option<usize>, next: Option<usize>) -> Self {
        let index = list
            .next_index()
            .expect("caller verified that the list has a vacant slot");

        trace!(
            index,
            item_type = type_name::<S::Value>(),
            "reserved raw list slot"
        );

        Self {
            list,
            index,
            previous,
            next,
        }
    }

    /// The index of the pool slot the item will be written into.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The position the item will have once written.
    #[must_use]
    pub fn position(&self) -> Position {
        self.list.position_at(Some(self.index))
    }

    /// Writes the item into the reserved slot and links it into the list, returning a reference
    /// to the item in its final location.
    ///
    /// The value is moved into the slot. Reserving a slot first does not construct the item in
    /// place, it only makes the slot index and position known before the item exists.
    pub fn write<T>(self, value: T) -> &'l mut S::Value
    where
        S: Embed<T>,
    {
        let Self {
            list,
            index: reserved,
            previous,
            next,
        } = self;

        let index = list.splice(previous, next, S::embed(value));

        debug_assert_eq!(
            index, reserved,
            "raw slot index changed between reservation and write"
        );

        trace!(
            index,
            item_type = type_name::<S::Value>(),
            "filled raw list slot"
        );

        list.payload_mut(index)
    }
}

impl<S: Storage> fmt::Debug for RawSlot<'_, S> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSlot")
            .field("item_type", &format_args!("{}", type_name::<S::Value>()))
            .field("index", &self.index)
            .field("previous", &self.previous)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::{ObjectList, ValueList, VirtualList, impl_as_dyn};

    impl_as_dyn!(dyn AsRef<[u8]> => Vec<u8>);

    #[test]
    fn index_is_known_before_write() {
        let mut list = ValueList::<usize, 4>::new();

        list.push_back(100);

        let slot = list.push_back_raw();
        let index = slot.index();
        let position = slot.position();

        let item = slot.write(index);
        assert_eq!(*item, index);

        assert_eq!(list.rbegin(), position);
        assert_eq!(list.value(position), &index);
    }

    #[test]
    fn insert_raw_goes_before_position() {
        let mut list = ValueList::<u32, 4>::new();

        let one = list.push_back(1);
        let three = list.push_back(3);

        list.insert_raw(three).write(2);

        assert_eq!(list.next(one), list.prev(three));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn push_front_raw_goes_first() {
        let mut list = ObjectList::<String, 4>::new();

        list.push_back("b".to_string());
        list.push_front_raw().write("a".to_string());

        assert_eq!(list.front().map(String::as_str), Some("a"));
        list.integrity_check();
    }

    #[test]
    fn write_returns_mutable_item() {
        let mut list = ObjectList::<String, 4>::new();

        list.push_back_raw().write("abc".to_string()).push('d');

        assert_eq!(list.front().map(String::as_str), Some("abcd"));
    }

    #[test]
    fn write_moves_value_into_virtual_slot() {
        let mut list = VirtualList::<dyn AsRef<[u8]>, 4, 32>::new();

        let bytes = vec![1_u8, 2, 3];
        let heap = bytes.as_ptr();

        let slot = list.push_back_raw();
        let position = slot.position();
        let item = slot.write(bytes);

        // The value is moved, so its heap allocation comes along unchanged.
        let written: &[u8] = (*item).as_ref();
        assert_eq!(written.as_ptr(), heap);

        let stored: &[u8] = list.value(position).as_ref();
        assert_eq!(stored, [1, 2, 3]);
        list.integrity_check();
    }

    #[test]
    fn abandoned_slot_leaves_list_unchanged() {
        let mut list = ValueList::<u32, 1>::new();

        let slot = list.push_back_raw();
        drop(slot);

        assert!(list.is_empty());
        assert!(!list.is_full());
        list.integrity_check();
    }

    #[test]
    #[should_panic]
    fn reserve_in_full_list_panics() {
        let mut list = ValueList::<u32, 1>::new();

        list.push_back(1);
        _ = list.push_back_raw();
    }
}
