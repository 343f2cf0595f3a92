use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::{Construct, Entry, List, Pool, Storage};

/// Iterator over shared references to the items of a [`List`], from front to back.
///
/// Created by [`List::iter()`].
pub struct Iter<'l, S: Storage> {
    list: &'l List<S>,

    front: Option<usize>,
    back: Option<usize>,

    remaining: usize,
}

impl<'l, S: Storage> Iter<'l, S> {
    #[must_use]
    pub(crate) fn new(list: &'l List<S>, front: Option<usize>, back: Option<usize>) -> Self {
        Self {
            list,
            front,
            back,
            remaining: list.len(),
        }
    }
}

impl<'l, S: Storage> Iterator for Iter<'l, S> {
    type Item = &'l S::Value;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let index = self.front?;
        self.front = self.list.step_next(Some(index));
        self.remaining = self.remaining.wrapping_sub(1);

        Some(self.list.payload(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S: Storage> DoubleEndedIterator for Iter<'_, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let index = self.back?;
        self.back = self.list.step_prev(Some(index));
        self.remaining = self.remaining.wrapping_sub(1);

        Some(self.list.payload(index))
    }
}

impl<S: Storage> ExactSizeIterator for Iter<'_, S> {}

impl<S: Storage> FusedIterator for Iter<'_, S> {}

impl<S: Storage> Clone for Iter<'_, S> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<S: Storage> fmt::Debug for Iter<'_, S> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

/// Iterator over exclusive references to the items of a [`List`], from front to back.
///
/// Created by [`List::iter_mut()`].
pub struct IterMut<'l, S: Storage> {
    // Each item is visited once, so the exclusive references handed out never overlap. They are
    // created from this pointer instead of from a `&mut List` so that creating one does not
    // invalidate the others.
    entries: NonNull<Entry<S::Payload>>,

    front: Option<usize>,
    back: Option<usize>,

    remaining: usize,

    _list: PhantomData<&'l mut List<S>>,
}

impl<S: Storage> IterMut<'_, S> {
    /// `entries` must come from the pool of the list that is exclusively borrowed for the
    /// lifetime of the iterator, and `front`, `back` and `remaining` must describe that list.
    #[must_use]
    pub(crate) fn new(
        entries: NonNull<Entry<S::Payload>>,
        front: Option<usize>,
        back: Option<usize>,
        remaining: usize,
    ) -> Self {
        Self {
            entries,
            front,
            back,
            remaining,
            _list: PhantomData,
        }
    }
}

impl<'l, S: Storage> Iterator for IterMut<'l, S> {
    type Item = &'l mut S::Value;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let index = self.front?;

        // SAFETY: The list is exclusively borrowed for 'l and is only accessed through this
        // pointer. `index` is part of the chain, so the entry is occupied. The remaining count
        // guarantees that no entry is visited twice, so no reference to it has been handed out.
        let link = unsafe { Pool::<S>::link_at(self.entries, index) };
        // SAFETY: As above.
        let payload = unsafe { Pool::<S>::payload_mut_at::<'l>(self.entries, index) };

        self.front = link.next;
        self.remaining = self.remaining.wrapping_sub(1);

        Some(S::value_mut(payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S: Storage> DoubleEndedIterator for IterMut<'_, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let index = self.back?;

        // SAFETY: See `next()`.
        let link = unsafe { Pool::<S>::link_at(self.entries, index) };
        // SAFETY: See `next()`.
        let payload = unsafe { Pool::<S>::payload_mut_at(self.entries, index) };

        self.back = link.previous;
        self.remaining = self.remaining.wrapping_sub(1);

        Some(S::value_mut(payload))
    }
}

impl<S: Storage> ExactSizeIterator for IterMut<'_, S> {}

impl<S: Storage> FusedIterator for IterMut<'_, S> {}

// SAFETY: The iterator is equivalent to a `&mut List<S>`, which is Send if the list is Send.
unsafe impl<S: Storage> Send for IterMut<'_, S> where List<S>: Send {}

// SAFETY: The iterator is equivalent to a `&mut List<S>`, which is Sync if the list is Sync.
unsafe impl<S: Storage> Sync for IterMut<'_, S> where List<S>: Sync {}

impl<S: Storage> fmt::Debug for IterMut<'_, S> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

/// Iterator that moves the items out of a [`List`], from front to back.
///
/// Created by the [`IntoIterator`] implementation of [`List`], which is available for the storage
/// strategies that hand back owned items.
pub struct IntoIter<S: Construct> {
    list: List<S>,
}

impl<S: Construct> Iterator for IntoIter<S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<S: Construct> DoubleEndedIterator for IntoIter<S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<S: Construct> ExactSizeIterator for IntoIter<S> {}

impl<S: Construct> FusedIterator for IntoIter<S> {}

impl<S: Construct> fmt::Debug for IntoIter<S> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("remaining", &self.list.len())
            .finish_non_exhaustive()
    }
}

impl<'l, S: Storage> IntoIterator for &'l List<S> {
    type Item = &'l S::Value;
    type IntoIter = Iter<'l, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'l, S: Storage> IntoIterator for &'l mut List<S> {
    type Item = &'l mut S::Value;
    type IntoIter = IterMut<'l, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<S: Construct> IntoIterator for List<S> {
    type Item = S::Item;
    type IntoIter = IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}
