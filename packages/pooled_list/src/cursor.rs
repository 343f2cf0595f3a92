use std::{fmt, ptr};

use crate::error::Result;
use crate::{Construct, Embed, List, Position, Storage};

/// A cursor over a [`List`] with shared access to its items.
///
/// A cursor is always located either at an item or at the end of the list. Moving past the back
/// item arrives at the end and moving again wraps around to the front item; moving backward
/// behaves the same way in the other direction.
///
/// Obtain one via [`List::cursor()`] or by converting a [`CursorMut`].
pub struct Cursor<'l, S: Storage> {
    list: &'l List<S>,
    index: Option<usize>,
}

impl<'l, S: Storage> Cursor<'l, S> {
    #[must_use]
    pub(crate) fn new(list: &'l List<S>, index: Option<usize>) -> Self {
        Self { list, index }
    }

    /// The position the cursor is located at.
    #[must_use]
    pub fn position(&self) -> Position {
        self.list.position_at(self.index)
    }

    /// Whether the cursor is located at the end of the list.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.index.is_none()
    }

    /// The item at the cursor, or `None` if the cursor is at the end of the list.
    #[must_use]
    pub fn current(&self) -> Option<&'l S::Value> {
        let list = self.list;
        self.index.map(|index| list.payload(index))
    }

    /// The item the cursor would move to with [`move_next()`][Self::move_next], or `None` if
    /// that is the end of the list.
    #[must_use]
    pub fn peek_next(&self) -> Option<&'l S::Value> {
        let list = self.list;
        list.step_next(self.index).map(|index| list.payload(index))
    }

    /// The item the cursor would move to with [`move_prev()`][Self::move_prev], or `None` if
    /// that is the end of the list.
    #[must_use]
    pub fn peek_prev(&self) -> Option<&'l S::Value> {
        let list = self.list;
        list.step_prev(self.index).map(|index| list.payload(index))
    }

    /// Moves the cursor to the next item, to the end after the back item or to the front item
    /// when at the end.
    pub fn move_next(&mut self) {
        self.index = self.list.step_next(self.index);
    }

    /// Moves the cursor to the previous item, to the end before the front item or to the back
    /// item when at the end.
    pub fn move_prev(&mut self) {
        self.index = self.list.step_prev(self.index);
    }
}

impl<S: Storage> Clone for Cursor<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Storage> Copy for Cursor<'_, S> {}

impl<S: Storage> PartialEq for Cursor<'_, S> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.list, other.list) && self.index == other.index
    }
}

impl<S: Storage> Eq for Cursor<'_, S> {}

impl<S: Storage> fmt::Debug for Cursor<'_, S> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// A cursor over a [`List`] with exclusive access, which can modify the list around it.
///
/// Movement follows the same rules as for [`Cursor`].
///
/// # Example
///
/// ```
/// use pooled_list::ValueList;
///
/// let mut list: ValueList<u32, 8> = [1, 2, 4].into_iter().collect();
///
/// let mut cursor = list.cursor_mut(list.begin());
/// cursor.move_next();
/// cursor.insert_after(3);
/// assert_eq!(cursor.current(), Some(&mut 3));
///
/// cursor.move_prev();
/// cursor.erase();
/// assert_eq!(cursor.current(), Some(&mut 1));
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 3, 4]);
/// ```
pub struct CursorMut<'l, S: Storage> {
    list: &'l mut List<S>,
    index: Option<usize>,
}

impl<'l, S: Storage> CursorMut<'l, S> {
    #[must_use]
    pub(crate) fn new(list: &'l mut List<S>, index: Option<usize>) -> Self {
        Self { list, index }
    }

    /// The position the cursor is located at.
    #[must_use]
    pub fn position(&self) -> Position {
        self.list.position_at(self.index)
    }

    /// Whether the cursor is located at the end of the list.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.index.is_none()
    }

    /// The item at the cursor, or `None` if the cursor is at the end of the list.
    #[must_use]
    pub fn current(&mut self) -> Option<&mut S::Value> {
        self.index.map(|index| self.list.payload_mut(index))
    }

    /// Moves the cursor to the next item, to the end after the back item or to the front item
    /// when at the end.
    pub fn move_next(&mut self) {
        self.index = self.list.step_next(self.index);
    }

    /// Moves the cursor to the previous item, to the end before the front item or to the back
    /// item when at the end.
    pub fn move_prev(&mut self) {
        self.index = self.list.step_prev(self.index);
    }

    /// A read-only cursor at the same location, borrowing this one.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, S> {
        Cursor::new(self.list, self.index)
    }

    /// Inserts an item before the cursor. The cursor does not move.
    ///
    /// At the end of the list, this appends the item to the back.
    ///
    /// # Panics
    ///
    /// Panics if the list is full.
    pub fn insert_before<T>(&mut self, value: T)
    where
        S: Embed<T>,
    {
        let position = self.position();
        self.list.insert(position, value);
    }

    /// Inserts an item before the cursor. The cursor does not move.
    ///
    /// # Errors
    ///
    /// Fails if the list is full. The value is dropped in that case.
    pub fn try_insert_before<T>(&mut self, value: T) -> Result<()>
    where
        S: Embed<T>,
    {
        let position = self.position();
        self.list.try_insert(position, value)?;
        Ok(())
    }

    /// Inserts an item after the cursor and moves the cursor to the new item.
    ///
    /// At the end of the list, the item is inserted directly after the front item, or becomes
    /// the only item if the list is empty.
    ///
    /// # Panics
    ///
    /// Panics if the list is full.
    pub fn insert_after<T>(&mut self, value: T)
    where
        S: Embed<T>,
    {
        let position = self.position();
        self.index = self.list.insert_after(position, value).index();
    }

    /// Inserts an item after the cursor and moves the cursor to the new item.
    ///
    /// # Errors
    ///
    /// Fails if the list is full. The value is dropped and the cursor does not move in that case.
    pub fn try_insert_after<T>(&mut self, value: T) -> Result<()>
    where
        S: Embed<T>,
    {
        let position = self.position();
        self.index = self.list.try_insert_after(position, value)?.index();
        Ok(())
    }

    /// Erases the item at the cursor and moves the cursor to its predecessor, which is the end
    /// if the erased item was at the front.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end of the list.
    pub fn erase(&mut self) {
        let position = self.position();
        self.index = self.list.erase(position).index();
    }

    /// Erases the item at the cursor and moves the cursor to its predecessor.
    ///
    /// # Errors
    ///
    /// Fails if the cursor is at the end of the list. The cursor does not move in that case.
    pub fn try_erase(&mut self) -> Result<()> {
        let position = self.position();
        self.index = self.list.try_erase(position)?.index();
        Ok(())
    }

    /// Removes the item at the cursor, moves the cursor to its predecessor and returns the item.
    ///
    /// Returns `None` without moving if the cursor is at the end of the list.
    pub fn remove_current(&mut self) -> Option<S::Item>
    where
        S: Construct,
    {
        self.index?;

        let (previous, item) = self.list.remove(self.position());
        self.index = previous.index();

        Some(item)
    }
}

impl<'l, S: Storage> From<CursorMut<'l, S>> for Cursor<'l, S> {
    fn from(cursor: CursorMut<'l, S>) -> Self {
        let CursorMut { list, index } = cursor;
        Self::new(list, index)
    }
}

impl<S: Storage> fmt::Debug for CursorMut<'_, S> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use crate::{Error, ObjectList, ValueList};

    use super::*;

    assert_impl_all!(Cursor<'static, crate::ValueSemantics<u32, 4>>: Copy, Send, Sync);

    #[test]
    fn cursor_walks_and_wraps() {
        let list: ValueList<u32, 4> = [1, 2, 3].into_iter().collect();

        let mut cursor = list.cursor(list.begin());
        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.peek_prev(), None);
        assert_eq!(cursor.peek_next(), Some(&2));

        cursor.move_next();
        cursor.move_next();
        assert_eq!(cursor.current(), Some(&3));
        assert_eq!(cursor.position(), list.rbegin());

        cursor.move_next();
        assert!(cursor.is_end());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.position(), list.end());

        cursor.move_next();
        assert_eq!(cursor.current(), Some(&1));

        cursor.move_prev();
        assert!(cursor.is_end());

        cursor.move_prev();
        assert_eq!(cursor.current(), Some(&3));
    }

    #[test]
    fn cursors_compare_by_list_and_location() {
        let a: ValueList<u32, 4> = [1, 2].into_iter().collect();
        let b = a.clone();

        let first = a.cursor(a.begin());
        let mut second = first;
        assert_eq!(first, second);

        second.move_next();
        assert_ne!(first, second);

        assert_ne!(a.cursor(a.end()), b.cursor(b.end()));
    }

    #[test]
    fn cursor_mut_modifies_current() {
        let mut list: ValueList<u32, 4> = [1, 2, 3].into_iter().collect();

        let mut cursor = list.cursor_mut(list.begin());
        while !cursor.is_end() {
            if let Some(value) = cursor.current() {
                *value *= 10;
            }

            cursor.move_next();
        }

        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [10, 20, 30]);
    }

    #[test]
    fn cursor_mut_insert_before_stays() {
        let mut list: ValueList<u32, 4> = [2].into_iter().collect();

        let mut cursor = list.cursor_mut(list.begin());
        cursor.insert_before(1);
        assert_eq!(cursor.current(), Some(&mut 2));

        cursor.move_next();
        cursor.insert_before(3);
        assert!(cursor.is_end());

        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
        list.integrity_check();
    }

    #[test]
    fn cursor_mut_insert_after_moves_to_new_item() {
        let mut list = ValueList::<u32, 4>::new();

        let mut cursor = list.cursor_mut(list.end());
        cursor.insert_after(1);
        assert_eq!(cursor.current(), Some(&mut 1));

        cursor.insert_after(2);
        cursor.insert_after(3);
        assert_eq!(cursor.current(), Some(&mut 3));

        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
        list.integrity_check();
    }

    #[test]
    fn cursor_mut_erase_moves_to_predecessor() {
        let mut list: ValueList<u32, 4> = [1, 2, 3].into_iter().collect();

        let mut cursor = list.cursor_mut(list.rbegin());
        cursor.erase();
        assert_eq!(cursor.current(), Some(&mut 2));

        cursor.move_prev();
        cursor.erase();
        assert!(cursor.is_end());

        assert_eq!(cursor.try_erase(), Err(Error::EndPosition));

        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [2]);
        list.integrity_check();
    }

    #[test]
    fn cursor_mut_try_insert_into_full_list() {
        let mut list: ValueList<u32, 2> = [1, 2].into_iter().collect();

        let mut cursor = list.cursor_mut(list.begin());
        assert_eq!(cursor.try_insert_after(3), Err(Error::Full { capacity: 2 }));
        assert_eq!(cursor.try_insert_before(3), Err(Error::Full { capacity: 2 }));

        // Failed insertion leaves the cursor where it was.
        assert_eq!(cursor.current(), Some(&mut 1));
    }

    #[test]
    fn cursor_mut_remove_current_hands_back_item() {
        let mut list: ObjectList<String, 4> = ["a", "b"].into_iter().map(str::to_string).collect();

        let mut cursor = list.cursor_mut(list.rbegin());
        assert_eq!(cursor.remove_current().as_deref(), Some("b"));
        assert_eq!(cursor.current(), Some(&mut "a".to_string()));

        assert_eq!(cursor.remove_current().as_deref(), Some("a"));
        assert!(cursor.is_end());
        assert_eq!(cursor.remove_current(), None);

        assert!(list.is_empty());
    }

    #[test]
    fn cursor_mut_converts_to_cursor() {
        let mut list: ValueList<u32, 4> = [1, 2].into_iter().collect();

        let mut cursor = list.cursor_mut(list.begin());
        cursor.move_next();
        assert_eq!(cursor.as_cursor().current(), Some(&2));

        let shared: Cursor<'_, _> = cursor.into();
        assert_eq!(shared.current(), Some(&2));
        assert_eq!(shared.peek_prev(), Some(&1));
    }

    #[test]
    #[should_panic]
    fn cursor_from_foreign_position_panics() {
        let a = ValueList::<u32, 4>::new();
        let b = ValueList::<u32, 4>::new();

        _ = b.cursor(a.end());
    }
}
