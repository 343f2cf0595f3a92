use std::any::type_name;
use std::{fmt, ptr};

use tracing::debug;

use crate::error::Result;
use crate::{
    Construct, Cursor, CursorMut, DropPolicy, Embed, Error, Iter, IterMut, Link, ListBuilder,
    ListId, ObjectSemantics, Pool, Position, RawSlot, Storage, ValueSemantics, VirtualSemantics,
};

/// A fixed-capacity doubly linked list whose items live in a pool allocated once, when the list
/// is created.
///
/// The chain is formed by slot indexes instead of pointers. Inserting and erasing items anywhere
/// in the list is O(1) and never allocates; at most `S::CAPACITY` items can be held at a time.
///
/// The storage strategy `S` decides how items are embedded in pool slots. The aliases
/// [`ValueList`], [`ObjectList`] and [`VirtualList`] name the three provided strategies.
///
/// # Positions
///
/// Items are addressed by [`Position`], a copyable handle that does not borrow the list. The
/// list has a single end position that terminates traversal in both directions, so walking
/// backward from the front item and forward from the back item both arrive at [`end()`][1], and
/// stepping from the end position wraps to the other side of the list.
///
/// For traversal while borrowing the list, use [`iter()`][2], [`iter_mut()`][3],
/// [`cursor()`][4] or [`cursor_mut()`][5].
///
/// # Preconditions
///
/// Using a position of a different list, using the end position where an item is required,
/// using a position whose item has been erased and inserting into a full list are programming
/// errors. The plain methods panic in these cases; each has a `try_` variant that returns
/// an [`Error`] instead.
///
/// # Example
///
/// ```
/// use pooled_list::ValueList;
///
/// let mut list = ValueList::<u32, 4>::new();
///
/// list.push_back(1);
/// list.push_back(2);
/// list.push_back(3);
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
///
/// // Erasing returns the position of the predecessor - the end position if there is none.
/// let before = list.erase(list.begin());
/// assert!(before.is_end());
/// assert_eq!(list.front(), Some(&2));
///
/// // Inserting after a position returns the position of the new item.
/// let nine = list.insert_after(list.begin(), 9);
/// assert_eq!(list.value(nine), &9);
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [2, 9, 3]);
/// ```
///
/// [1]: Self::end
/// [2]: Self::iter
/// [3]: Self::iter_mut
/// [4]: Self::cursor
/// [5]: Self::cursor_mut
pub struct List<S: Storage> {
    pool: Pool<S>,

    front: Option<usize>,
    back: Option<usize>,

    id: ListId,
}

/// A [`List`] of flat `Copy` values.
pub type ValueList<T, const CAPACITY: usize> = List<ValueSemantics<T, CAPACITY>>;

/// A [`List`] of objects that are dropped when erased.
pub type ObjectList<T, const CAPACITY: usize> = List<ObjectSemantics<T, CAPACITY>>;

/// A [`List`] of items of any type that can be viewed as `D` and fits into `MAX_SIZE` bytes.
pub type VirtualList<D, const CAPACITY: usize, const MAX_SIZE: usize> =
    List<VirtualSemantics<D, CAPACITY, MAX_SIZE>>;

impl<S: Storage> List<S> {
    /// Creates an empty list with the default configuration, allocating the pool for all
    /// `S::CAPACITY` items.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a list with a custom configuration.
    pub fn builder() -> ListBuilder<S> {
        ListBuilder::new()
    }

    #[must_use]
    pub(crate) fn new_inner(drop_policy: DropPolicy) -> Self {
        Self {
            pool: Pool::new(drop_policy),
            front: None,
            back: None,
            id: ListId::next(),
        }
    }

    /// The number of items in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Whether the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.front.is_none(), self.pool.len() == 0);
        debug_assert_eq!(self.front.is_none(), self.back.is_none());

        self.front.is_none()
    }

    /// Whether every slot of the pool is occupied, so no more items can be inserted.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.pool.is_full()
    }

    /// The maximum number of items the list can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        S::CAPACITY
    }

    /// Removes all items from the list.
    ///
    /// All positions of this list become invalid. This is O(1) for items that need no drop and
    /// otherwise proportional to the number of slots used since the list was created or last
    /// cleared.
    pub fn clear(&mut self) {
        // Unlink first, so the list is consistent even if dropping an item panics.
        self.front = None;
        self.back = None;

        let removed = self.pool.clear();

        debug!(
            removed,
            capacity = S::CAPACITY,
            item_type = type_name::<S::Value>(),
            "cleared list"
        );
    }

    /// The first item, or `None` if the list is empty.
    #[must_use]
    pub fn front(&self) -> Option<&S::Value> {
        self.front.map(|index| self.payload(index))
    }

    /// The last item, or `None` if the list is empty.
    #[must_use]
    pub fn back(&self) -> Option<&S::Value> {
        self.back.map(|index| self.payload(index))
    }

    /// Exclusive access to the first item, or `None` if the list is empty.
    #[must_use]
    pub fn front_mut(&mut self) -> Option<&mut S::Value> {
        self.front.map(|index| self.payload_mut(index))
    }

    /// Exclusive access to the last item, or `None` if the list is empty.
    #[must_use]
    pub fn back_mut(&mut self) -> Option<&mut S::Value> {
        self.back.map(|index| self.payload_mut(index))
    }

    /// The position of the first item, or the end position if the list is empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        self.position_at(self.front)
    }

    /// The position of the last item, or the end position if the list is empty.
    ///
    /// This is where backward traversal starts.
    #[must_use]
    pub fn rbegin(&self) -> Position {
        self.position_at(self.back)
    }

    /// The end position, which follows the last item and precedes the first item.
    #[must_use]
    pub fn end(&self) -> Position {
        self.position_at(None)
    }

    /// The position following `position`.
    ///
    /// The position following the last item is the end position and the position following the
    /// end position is that of the first item.
    ///
    /// # Panics
    ///
    /// Panics if the position belongs to a different list or its item has been erased.
    #[must_use]
    pub fn next(&self, position: Position) -> Position {
        let index = Self::unwrap_precondition(self.resolve_or_end(position), "next()");

        self.position_at(self.step_next(index))
    }

    /// The position preceding `position`.
    ///
    /// The position preceding the first item is the end position and the position preceding the
    /// end position is that of the last item.
    ///
    /// # Panics
    ///
    /// Panics if the position belongs to a different list or its item has been erased.
    #[must_use]
    pub fn prev(&self, position: Position) -> Position {
        let index = Self::unwrap_precondition(self.resolve_or_end(position), "prev()");

        self.position_at(self.step_prev(index))
    }

    /// The item at `position`, or `None` if the position does not refer to an item of this list.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&S::Value> {
        let index = self.resolve(position).ok()?;
        Some(self.payload(index))
    }

    /// Exclusive access to the item at `position`, or `None` if the position does not refer to
    /// an item of this list.
    #[must_use]
    pub fn get_mut(&mut self, position: Position) -> Option<&mut S::Value> {
        let index = self.resolve(position).ok()?;
        Some(self.payload_mut(index))
    }

    /// The item at `position`.
    ///
    /// # Panics
    ///
    /// Panics if the position is the end position, belongs to a different list or its item
    /// has been erased.
    #[must_use]
    pub fn value(&self, position: Position) -> &S::Value {
        let index = Self::unwrap_precondition(self.resolve(position), "value()");
        self.payload(index)
    }

    /// Exclusive access to the item at `position`.
    ///
    /// # Panics
    ///
    /// Panics if the position is the end position, belongs to a different list or its item
    /// has been erased.
    #[must_use]
    pub fn value_mut(&mut self, position: Position) -> &mut S::Value {
        let index = Self::unwrap_precondition(self.resolve(position), "value_mut()");
        self.payload_mut(index)
    }

    /// The position of an item of this list, given a reference to the item.
    ///
    /// Returns `None` if the reference does not point to an item in this list. Items of
    /// zero-sized types cannot be reliably located.
    ///
    /// # Example
    ///
    /// ```
    /// use pooled_list::ValueList;
    ///
    /// let mut list = ValueList::<u32, 4>::new();
    /// let two = list.push_back(2);
    ///
    /// let item = list.value(two);
    /// assert_eq!(list.position_of(item), Some(two));
    /// assert_eq!(list.position_of(&2), None);
    /// ```
    #[must_use]
    pub fn position_of(&self, value: &S::Value) -> Option<Position> {
        let index = self.pool.index_of(ptr::from_ref(value).cast::<u8>())?;
        Some(self.position_at(Some(index)))
    }

    /// Inserts an item immediately before `position` and returns the position of the new item.
    ///
    /// Inserting before the end position appends the item to the back of the list.
    ///
    /// # Panics
    ///
    /// Panics if the list is full, the position belongs to a different list or its item has
    /// been erased.
    pub fn insert<T>(&mut self, position: Position, value: T) -> Position
    where
        S: Embed<T>,
    {
        Self::unwrap_precondition(self.try_insert(position, value), "insert()")
    }

    /// Inserts an item immediately before `position` and returns the position of the new item.
    ///
    /// The value is dropped if the insertion fails.
    ///
    /// # Errors
    ///
    /// Fails if the list is full, the position belongs to a different list or its item has
    /// been erased.
    pub fn try_insert<T>(&mut self, position: Position, value: T) -> Result<Position>
    where
        S: Embed<T>,
    {
        let index = self.try_insert_payload(position, S::embed(value))?;
        Ok(self.position_at(Some(index)))
    }

    /// Inserts a default-constructed item immediately before `position` and returns a reference
    /// to it.
    ///
    /// # Panics
    ///
    /// Panics if the list is full, the position belongs to a different list or its item has
    /// been erased.
    pub fn insert_default(&mut self, position: Position) -> &mut S::Value
    where
        S: Construct,
        S::Item: Default,
    {
        let payload = S::construct(S::Item::default());
        let index = Self::unwrap_precondition(
            self.try_insert_payload(position, payload),
            "insert_default()",
        );

        self.payload_mut(index)
    }

    /// Reserves a slot immediately before `position` for an item that will be written into it
    /// through the returned [`RawSlot`].
    ///
    /// # Panics
    ///
    /// Panics if the list is full, the position belongs to a different list or its item has
    /// been erased.
    pub fn insert_raw(&mut self, position: Position) -> RawSlot<'_, S> {
        let next = Self::unwrap_precondition(self.resolve_or_end(position), "insert_raw()");
        Self::unwrap_precondition(self.ensure_vacancy(), "insert_raw()");

        let (previous, next) = self.neighbors_before(next);
        RawSlot::new(self, previous, next)
    }

    /// Inserts an item immediately after `position` and returns the position of the new item.
    ///
    /// Inserting after the end position threads the new item in directly after the current
    /// front item. If the list is empty, the new item becomes its only item.
    ///
    /// # Panics
    ///
    /// Panics if the list is full, the position belongs to a different list or its item has
    /// been erased.
    pub fn insert_after<T>(&mut self, position: Position, value: T) -> Position
    where
        S: Embed<T>,
    {
        Self::unwrap_precondition(self.try_insert_after(position, value), "insert_after()")
    }

    /// Inserts an item immediately after `position` and returns the position of the new item.
    ///
    /// The value is dropped if the insertion fails.
    ///
    /// # Errors
    ///
    /// Fails if the list is full, the position belongs to a different list or its item has
    /// been erased.
    pub fn try_insert_after<T>(&mut self, position: Position, value: T) -> Result<Position>
    where
        S: Embed<T>,
    {
        let index = self.try_insert_payload_after(position, S::embed(value))?;
        Ok(self.position_at(Some(index)))
    }

    /// Inserts a default-constructed item immediately after `position` and returns both the
    /// position of the new item and a reference to it.
    ///
    /// # Panics
    ///
    /// Panics if the list is full, the position belongs to a different list or its item has
    /// been erased.
    pub fn insert_after_default(&mut self, position: Position) -> (Position, &mut S::Value)
    where
        S: Construct,
        S::Item: Default,
    {
        let payload = S::construct(S::Item::default());
        let index = Self::unwrap_precondition(
            self.try_insert_payload_after(position, payload),
            "insert_after_default()",
        );

        (self.position_at(Some(index)), self.payload_mut(index))
    }

    /// Reserves a slot immediately after `position` for an item that will be written into it
    /// through the returned [`RawSlot`]. The position of the new item is available from
    /// [`RawSlot::position()`] before the item is written.
    ///
    /// # Panics
    ///
    /// Panics if the list is full, the position belongs to a different list or its item has
    /// been erased.
    pub fn insert_after_raw(&mut self, position: Position) -> RawSlot<'_, S> {
        let previous =
            Self::unwrap_precondition(self.resolve_or_end(position), "insert_after_raw()");
        Self::unwrap_precondition(self.ensure_vacancy(), "insert_after_raw()");

        let (previous, next) = self.neighbors_after(previous);
        RawSlot::new(self, previous, next)
    }

    /// Inserts an item at the front of the list and returns its position.
    ///
    /// # Panics
    ///
    /// Panics if the list is full.
    pub fn push_front<T>(&mut self, value: T) -> Position
    where
        S: Embed<T>,
    {
        self.insert(self.begin(), value)
    }

    /// Inserts an item at the front of the list and returns its position.
    ///
    /// # Errors
    ///
    /// Fails if the list is full. The value is dropped in that case.
    pub fn try_push_front<T>(&mut self, value: T) -> Result<Position>
    where
        S: Embed<T>,
    {
        self.try_insert(self.begin(), value)
    }

    /// Inserts a default-constructed item at the front of the list and returns a reference to it.
    ///
    /// # Panics
    ///
    /// Panics if the list is full.
    pub fn push_front_default(&mut self) -> &mut S::Value
    where
        S: Construct,
        S::Item: Default,
    {
        self.insert_default(self.begin())
    }

    /// Reserves a slot at the front of the list for an item that will be written into it through
    /// the returned [`RawSlot`].
    ///
    /// # Panics
    ///
    /// Panics if the list is full.
    pub fn push_front_raw(&mut self) -> RawSlot<'_, S> {
        self.insert_raw(self.begin())
    }

    /// Inserts an item at the back of the list and returns its position.
    ///
    /// # Panics
    ///
    /// Panics if the list is full.
    pub fn push_back<T>(&mut self, value: T) -> Position
    where
        S: Embed<T>,
    {
        self.insert(self.end(), value)
    }

    /// Inserts an item at the back of the list and returns its position.
    ///
    /// # Errors
    ///
    /// Fails if the list is full. The value is dropped in that case.
    pub fn try_push_back<T>(&mut self, value: T) -> Result<Position>
    where
        S: Embed<T>,
    {
        self.try_insert(self.end(), value)
    }

    /// Inserts a default-constructed item at the back of the list and returns a reference to it.
    ///
    /// # Panics
    ///
    /// Panics if the list is full.
    pub fn push_back_default(&mut self) -> &mut S::Value
    where
        S: Construct,
        S::Item: Default,
    {
        self.insert_default(self.end())
    }

    /// Reserves a slot at the back of the list for an item that will be written into it through
    /// the returned [`RawSlot`].
    ///
    /// # Panics
    ///
    /// Panics if the list is full.
    pub fn push_back_raw(&mut self) -> RawSlot<'_, S> {
        self.insert_raw(self.end())
    }

    /// Erases the item at `position` and returns the position of its predecessor, which is the
    /// end position if the erased item was at the front.
    ///
    /// Returning the predecessor allows a loop to keep walking backward after an erase. The
    /// position passed in becomes invalid, as do any copies of it.
    ///
    /// # Panics
    ///
    /// Panics if the position is the end position, belongs to a different list or its item has
    /// already been erased.
    pub fn erase(&mut self, position: Position) -> Position {
        Self::unwrap_precondition(self.try_erase(position), "erase()")
    }

    /// Erases the item at `position` and returns the position of its predecessor.
    ///
    /// # Errors
    ///
    /// Fails if the position is the end position, belongs to a different list or its item has
    /// already been erased.
    pub fn try_erase(&mut self, position: Position) -> Result<Position> {
        let index = self.resolve(position)?;

        let (previous, payload) = self.unlink(index);

        // The list is consistent again before the item is dropped.
        drop(payload);

        Ok(self.position_at(previous))
    }

    /// Removes the item at `position`, returning the position of its predecessor together with
    /// the item.
    ///
    /// # Panics
    ///
    /// Panics if the position is the end position, belongs to a different list or its item has
    /// already been erased.
    pub fn remove(&mut self, position: Position) -> (Position, S::Item)
    where
        S: Construct,
    {
        let index = Self::unwrap_precondition(self.resolve(position), "remove()");

        let (previous, payload) = self.unlink(index);

        (self.position_at(previous), S::deconstruct(payload))
    }

    /// Removes the first item and returns it, or returns `None` if the list is empty.
    pub fn pop_front(&mut self) -> Option<S::Item>
    where
        S: Construct,
    {
        let index = self.front?;
        let (_, payload) = self.unlink(index);

        Some(S::deconstruct(payload))
    }

    /// Removes the last item and returns it, or returns `None` if the list is empty.
    pub fn pop_back(&mut self) -> Option<S::Item>
    where
        S: Construct,
    {
        let index = self.back?;
        let (_, payload) = self.unlink(index);

        Some(S::deconstruct(payload))
    }

    /// Iterates over the items from front to back.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, S> {
        Iter::new(self, self.front, self.back)
    }

    /// Iterates over the items from front to back, with exclusive access to each.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, S> {
        let front = self.front;
        let back = self.back;
        let remaining = self.len();

        IterMut::new(self.pool.entries_ptr(), front, back, remaining)
    }

    /// A cursor that starts at `position` and borrows the list for shared access.
    ///
    /// # Panics
    ///
    /// Panics if the position belongs to a different list or its item has been erased.
    #[must_use]
    pub fn cursor(&self, position: Position) -> Cursor<'_, S> {
        let index = Self::unwrap_precondition(self.resolve_or_end(position), "cursor()");
        Cursor::new(self, index)
    }

    /// A cursor that starts at `position` and borrows the list for exclusive access, allowing
    /// items to be modified, inserted and erased at the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the position belongs to a different list or its item has been erased.
    #[must_use]
    pub fn cursor_mut(&mut self, position: Position) -> CursorMut<'_, S> {
        let index = Self::unwrap_precondition(self.resolve_or_end(position), "cursor_mut()");
        CursorMut::new(self, index)
    }

    #[must_use]
    pub(crate) fn position_at(&self, index: Option<usize>) -> Position {
        Position::new(self.id, index)
    }

    /// The slot after `index`, wrapping through the end sentinel.
    #[must_use]
    pub(crate) fn step_next(&self, index: Option<usize>) -> Option<usize> {
        match index {
            Some(index) => self.pool.link(index).next,
            None => self.front,
        }
    }

    /// The slot before `index`, wrapping through the end sentinel.
    #[must_use]
    pub(crate) fn step_prev(&self, index: Option<usize>) -> Option<usize> {
        match index {
            Some(index) => self.pool.link(index).previous,
            None => self.back,
        }
    }

    #[must_use]
    pub(crate) fn payload(&self, index: usize) -> &S::Value {
        S::value(
            self.pool
                .get(index)
                .expect("the list chain only references occupied slots"),
        )
    }

    #[must_use]
    pub(crate) fn payload_mut(&mut self, index: usize) -> &mut S::Value {
        S::value_mut(
            self.pool
                .get_mut(index)
                .expect("the list chain only references occupied slots"),
        )
    }

    #[must_use]
    pub(crate) fn next_index(&self) -> Option<usize> {
        self.pool.next_index()
    }

    fn resolve(&self, position: Position) -> Result<usize> {
        self.resolve_or_end(position)?.ok_or(Error::EndPosition)
    }

    fn resolve_or_end(&self, position: Position) -> Result<Option<usize>> {
        if position.owner() != self.id {
            return Err(Error::ForeignPosition);
        }

        match position.index() {
            None => Ok(None),
            Some(index) if self.pool.is_occupied(index) => Ok(Some(index)),
            Some(index) => Err(Error::VacantPosition { index }),
        }
    }

    fn ensure_vacancy(&self) -> Result<()> {
        if self.is_full() {
            debug!(
                capacity = S::CAPACITY,
                item_type = type_name::<S::Value>(),
                "rejected insertion into a full list"
            );

            return Err(Error::Full {
                capacity: S::CAPACITY,
            });
        }

        Ok(())
    }

    fn try_insert_payload(&mut self, position: Position, payload: S::Payload) -> Result<usize> {
        let next = self.resolve_or_end(position)?;
        self.ensure_vacancy()?;

        let (previous, next) = self.neighbors_before(next);
        Ok(self.splice(previous, next, payload))
    }

    fn try_insert_payload_after(
        &mut self,
        position: Position,
        payload: S::Payload,
    ) -> Result<usize> {
        let previous = self.resolve_or_end(position)?;
        self.ensure_vacancy()?;

        let (previous, next) = self.neighbors_after(previous);
        Ok(self.splice(previous, next, payload))
    }

    /// The neighbors a new item inserted before `next` will have.
    fn neighbors_before(&self, next: Option<usize>) -> (Option<usize>, Option<usize>) {
        let previous = match next {
            Some(next) => self.pool.link(next).previous,
            None => self.back,
        };

        (previous, next)
    }

    /// The neighbors a new item inserted after `previous` will have.
    ///
    /// The end sentinel is treated as the front item here.
    fn neighbors_after(&self, previous: Option<usize>) -> (Option<usize>, Option<usize>) {
        let previous = previous.or(self.front);
        let next = previous.and_then(|previous| self.pool.link(previous).next);

        (previous, next)
    }

    /// Places a payload into the pool and links it between two adjacent slots (either of which
    /// may be the end sentinel). Returns the index of the new slot.
    pub(crate) fn splice(
        &mut self,
        previous: Option<usize>,
        next: Option<usize>,
        payload: S::Payload,
    ) -> usize {
        debug_assert_eq!(previous.map_or(self.front, |p| self.pool.link(p).next), next);

        let index = self.pool.insert(Link::between(previous, next), payload);

        // LINK: (new)<-(next)
        match next {
            Some(next) => self.pool.link_mut(next).previous = Some(index),
            None => self.back = Some(index),
        }

        // LINK: (previous)->(new)
        match previous {
            Some(previous) => self.pool.link_mut(previous).next = Some(index),
            None => self.front = Some(index),
        }

        index
    }

    /// Takes a slot out of the chain and out of the pool, returning the index of its
    /// predecessor together with its payload.
    fn unlink(&mut self, index: usize) -> (Option<usize>, S::Payload) {
        let Link { next, previous } = self.pool.link(index);

        // LINK: (previous)<-(next)
        match next {
            Some(next) => self.pool.link_mut(next).previous = previous,
            None => self.back = previous,
        }

        // LINK: (previous)->(next)
        match previous {
            Some(previous) => self.pool.link_mut(previous).next = next,
            None => self.front = next,
        }

        (previous, self.pool.remove(index))
    }

    #[track_caller]
    fn unwrap_precondition<R>(result: Result<R>, operation: &str) -> R {
        match result {
            Ok(value) => value,
            Err(error) => panic!(
                "{operation} precondition violated in list of {}: {error}",
                type_name::<S::Value>()
            ),
        }
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(debug_assertions)]
    pub(crate) fn integrity_check(&self) {
        self.pool.integrity_check();

        assert_eq!(
            self.front.is_none(),
            self.back.is_none(),
            "front and back disagree on emptiness in list of {}",
            type_name::<S::Value>()
        );

        let mut visited: usize = 0;
        let mut previous = None;
        let mut cursor = self.front;

        while let Some(index) = cursor {
            let link = self.pool.link(index);

            assert_eq!(
                link.previous,
                previous,
                "slot {index} does not link back to its predecessor in list of {}",
                type_name::<S::Value>()
            );

            visited = visited
                .checked_add(1)
                .expect("guarded by the length assertion below");

            assert!(
                visited <= self.len(),
                "chain is longer than the number of items (cycle?) in list of {}",
                type_name::<S::Value>()
            );

            previous = Some(index);
            cursor = link.next;
        }

        assert_eq!(
            previous,
            self.back,
            "walking forward from the front does not end at the back in list of {}",
            type_name::<S::Value>()
        );

        assert_eq!(
            visited,
            self.len(),
            "chain length does not match the number of items in list of {}",
            type_name::<S::Value>()
        );
    }
}

impl<S: Storage> Default for List<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> Clone for List<S>
where
    S::Payload: Clone,
{
    /// Clones the list and all its items.
    ///
    /// The clone is a distinct list: positions of the original are not valid for the clone.
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            front: self.front,
            back: self.back,
            id: ListId::next(),
        }
    }
}

impl<S: Storage> fmt::Debug for List<S>
where
    S::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<S: Storage> PartialEq for List<S>
where
    S::Value: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<S: Storage> Eq for List<S> where S::Value: Eq {}

impl<S: Embed<T>, T> Extend<T> for List<S> {
    /// Appends the items to the back of the list.
    ///
    /// # Panics
    ///
    /// Panics if the list becomes full before all items are appended.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<S: Embed<T>, T> FromIterator<T> for List<S> {
    /// Creates a list with the items in iteration order.
    ///
    /// # Panics
    ///
    /// Panics if there are more items than the capacity of the list.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
