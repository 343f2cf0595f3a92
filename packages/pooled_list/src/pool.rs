use std::any::type_name;
use std::mem::{self, needs_drop};
use std::ptr::{self, NonNull};
use std::{fmt, thread};

use crate::{DropPolicy, Link, Storage};

/// The backing storage of a [`List`][crate::List]: a fixed-capacity slab of `S::CAPACITY` slots,
/// each either vacant or holding one payload plus the [`Link`] that places it in the list chain.
///
/// All slots are allocated up front. Items never move between slots, so slot indices are stable
/// for as long as the item is in the pool, which is what the list chain relies on.
///
/// Vacant slots are tracked in two parts:
///
/// * Slots at or beyond `high_water` have never been handed out since the pool was created or
///   last cleared. They are vacant regardless of what their entry says.
/// * Slots below `high_water` that were handed out and later freed form a virtual stack whose
///   links are stored in the vacant entries themselves (an intrusive freelist).
///
/// Splitting it like this means clearing the pool only needs to touch the slots that were actually
/// used, and does not need to touch any if the payload needs no drop.
pub(crate) struct Pool<S: Storage> {
    entries: Box<[Entry<S::Payload>]>,

    /// Head of the stack of freed slots below `high_water`, if any.
    next_free_index: Option<usize>,

    /// Number of slots handed out at least once since creation or the last `clear()`.
    high_water: usize,

    /// The number of occupied slots.
    count: usize,

    drop_policy: DropPolicy,
}

#[derive(Clone, Debug)]
pub(crate) enum Entry<P> {
    Occupied { link: Link, payload: P },

    Vacant { next_free_index: Option<usize> },
}

impl<S: Storage> Pool<S> {
    /// # Panics
    ///
    /// Panics if the capacity of the storage strategy is zero.
    #[must_use]
    pub(crate) fn new(drop_policy: DropPolicy) -> Self {
        assert!(
            S::CAPACITY > 0,
            "pool of {} must have non-zero capacity",
            type_name::<S::Value>()
        );

        let entries = (0..S::CAPACITY)
            .map(|_| Entry::Vacant {
                next_free_index: None,
            })
            .collect();

        Self {
            entries,
            next_free_index: None,
            high_water: 0,
            count: 0,
            drop_policy,
        }
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub(crate) fn is_full(&self) -> bool {
        self.count >= S::CAPACITY
    }

    /// The index the next `insert()` will use, or `None` if the pool is full.
    #[must_use]
    pub(crate) fn next_index(&self) -> Option<usize> {
        match self.next_free_index {
            Some(index) => Some(index),
            None if self.high_water < S::CAPACITY => Some(self.high_water),
            None => None,
        }
    }

    fn entry(&self, index: usize) -> Option<&Entry<S::Payload>> {
        if index >= self.high_water {
            return None;
        }

        self.entries.get(index)
    }

    fn entry_mut(&mut self, index: usize) -> Option<&mut Entry<S::Payload>> {
        if index >= self.high_water {
            return None;
        }

        self.entries.get_mut(index)
    }

    #[must_use]
    pub(crate) fn is_occupied(&self, index: usize) -> bool {
        matches!(self.entry(index), Some(Entry::Occupied { .. }))
    }

    #[must_use]
    pub(crate) fn get(&self, index: usize) -> Option<&S::Payload> {
        match self.entry(index)? {
            Entry::Occupied { payload, .. } => Some(payload),
            Entry::Vacant { .. } => None,
        }
    }

    #[must_use]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut S::Payload> {
        match self.entry_mut(index)? {
            Entry::Occupied { payload, .. } => Some(payload),
            Entry::Vacant { .. } => None,
        }
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds or is not associated with an item.
    #[must_use]
    pub(crate) fn link(&self, index: usize) -> Link {
        match self.entry(index) {
            Some(Entry::Occupied { link, .. }) => *link,
            _ => panic!(
                "link({index}) entry was vacant in pool of {}",
                type_name::<S::Value>()
            ),
        }
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds or is not associated with an item.
    pub(crate) fn link_mut(&mut self, index: usize) -> &mut Link {
        match self.entry_mut(index) {
            Some(Entry::Occupied { link, .. }) => link,
            _ => panic!(
                "link_mut({index}) entry was vacant in pool of {}",
                type_name::<S::Value>()
            ),
        }
    }

    /// Places a payload in the slot reported by `next_index()` and returns that index.
    ///
    /// # Panics
    ///
    /// Panics if the pool is full.
    pub(crate) fn insert(&mut self, link: Link, payload: S::Payload) -> usize {
        let Some(index) = self.next_index() else {
            panic!(
                "cannot insert into a full pool of {} with capacity {}",
                type_name::<S::Value>(),
                S::CAPACITY
            );
        };

        let recycled = self.next_free_index == Some(index);

        if !recycled {
            // Cannot overflow because next_index() guarantees high_water < CAPACITY here.
            self.high_water = self.high_water.wrapping_add(1);
        }

        let entry = self
            .entries
            .get_mut(index)
            .expect("next_index() only reports indexes below CAPACITY");

        let previous_entry = mem::replace(entry, Entry::Occupied { link, payload });

        // A slot at the high water mark was never live since the last clear, so whatever it
        // contains is leftover data without meaning. Only recycled slots carry freelist state.
        if recycled {
            self.next_free_index = match previous_entry {
                Entry::Vacant { next_free_index } => next_free_index,
                Entry::Occupied { .. } => panic!(
                    "entry {index} was not vacant when we inserted into it in pool of {}",
                    type_name::<S::Value>()
                ),
            };
        }

        self.count = self
            .count
            .checked_add(1)
            .expect("guarded by is_full() check via next_index()");

        index
    }

    /// Removes the payload from a slot, returning the slot to the freelist.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds or is not associated with an item.
    pub(crate) fn remove(&mut self, index: usize) -> S::Payload {
        let next_free_index = self.next_free_index;

        let Some(entry) = self.entry_mut(index) else {
            panic!(
                "remove({index}) index is out of bounds in pool of {}",
                type_name::<S::Value>()
            );
        };

        let Entry::Occupied { payload, .. } = mem::replace(entry, Entry::Vacant { next_free_index })
        else {
            panic!(
                "remove({index}) entry was vacant in pool of {}",
                type_name::<S::Value>()
            );
        };

        // Push the removed item's entry onto the free stack.
        self.next_free_index = Some(index);

        self.count = self
            .count
            .checked_sub(1)
            .expect("we verified above that the entry is occupied so count must be non-zero");

        payload
    }

    /// Removes all payloads, returning the number of payloads that were removed.
    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.count;

        if needs_drop::<S::Payload>() {
            // Only slots below the high water mark can be occupied.
            for entry in self.entries.iter_mut().take(self.high_water) {
                *entry = Entry::Vacant {
                    next_free_index: None,
                };
            }
        }

        // Anything left in the entries now is beyond the high water mark and thus vacant.
        self.next_free_index = None;
        self.high_water = 0;
        self.count = 0;

        removed
    }

    /// Translates a pointer to an item back into the index of the slot that holds it.
    ///
    /// Returns `None` if the pointer does not point to the start of an item in this pool.
    #[must_use]
    pub(crate) fn index_of(&self, item: *const u8) -> Option<usize> {
        let first_entry = self.entries.as_ptr();

        let offset = item.addr().checked_sub(first_entry.addr())?;

        #[expect(
            clippy::integer_division,
            reason = "we only care which entry the address falls into, not where in the entry"
        )]
        let index = offset / size_of::<Entry<S::Payload>>();

        let payload = self.get(index)?;
        let expected = ptr::from_ref(S::value(payload)).cast::<u8>();

        (expected.addr() == item.addr()).then_some(index)
    }

    /// Pointer to the first entry, for iterators that hand out exclusive references to
    /// distinct items.
    #[must_use]
    pub(crate) fn entries_ptr(&mut self) -> NonNull<Entry<S::Payload>> {
        NonNull::from(&mut *self.entries).cast()
    }

    /// # Safety
    ///
    /// `entries` must have been obtained from `entries_ptr()` of a pool that is still alive and
    /// not borrowed except through that pointer. The entry at `index` must be occupied and no
    /// reference to it may exist.
    #[must_use]
    pub(crate) unsafe fn link_at(entries: NonNull<Entry<S::Payload>>, index: usize) -> Link {
        // SAFETY: Forwarding the caller's guarantee that the index is of an occupied entry.
        let entry = unsafe { entries.add(index).as_ref() };

        match entry {
            Entry::Occupied { link, .. } => *link,
            Entry::Vacant { .. } => unreachable!("caller guarantees that the entry is occupied"),
        }
    }

    /// # Safety
    ///
    /// `entries` must have been obtained from `entries_ptr()` of a pool that outlives `'a` and
    /// is not otherwise accessed during `'a`. The entry at `index` must be occupied and no other
    /// reference to it may be created during `'a`.
    #[must_use]
    pub(crate) unsafe fn payload_mut_at<'a>(
        entries: NonNull<Entry<S::Payload>>,
        index: usize,
    ) -> &'a mut S::Payload {
        // SAFETY: Forwarding the caller's guarantee that the index is of an occupied entry
        // that nobody else references.
        let entry = unsafe { entries.add(index).as_mut() };

        match entry {
            Entry::Occupied { payload, .. } => payload,
            Entry::Vacant { .. } => unreachable!("caller guarantees that the entry is occupied"),
        }
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(debug_assertions)]
    pub(crate) fn integrity_check(&self) {
        let occupied = self
            .entries
            .iter()
            .take(self.high_water)
            .filter(|entry| matches!(entry, Entry::Occupied { .. }))
            .count();

        assert!(
            self.count == occupied,
            "self.count {} does not match the observed occupied count {} in pool of {}",
            self.count,
            occupied,
            type_name::<S::Value>()
        );

        let mut free_count: usize = 0;
        let mut cursor = self.next_free_index;

        while let Some(index) = cursor {
            assert!(
                index < self.high_water,
                "freelist entry {index} is beyond the high water mark {} in pool of {}",
                self.high_water,
                type_name::<S::Value>()
            );

            match self.entries.get(index) {
                Some(Entry::Vacant { next_free_index }) => cursor = *next_free_index,
                _ => panic!(
                    "freelist entry {index} is not vacant in pool of {}",
                    type_name::<S::Value>()
                ),
            }

            free_count = free_count
                .checked_add(1)
                .expect("guarded by the high water mark assertion above");

            assert!(
                free_count <= self.high_water,
                "freelist of pool of {} contains a cycle",
                type_name::<S::Value>()
            );
        }

        assert!(
            free_count.checked_add(self.count) == Some(self.high_water),
            "{free_count} free and {} occupied slots do not add up to high water mark {} in pool of {}",
            self.count,
            self.high_water,
            type_name::<S::Value>()
        );
    }
}

impl<S: Storage> fmt::Debug for Pool<S> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("item_type", &format_args!("{}", type_name::<S::Value>()))
            .field("capacity", &S::CAPACITY)
            .field("count", &self.count)
            .field("high_water", &self.high_water)
            .field("next_free_index", &self.next_free_index)
            .field("drop_policy", &self.drop_policy)
            .finish_non_exhaustive()
    }
}

impl<S: Storage> Clone for Pool<S>
where
    S::Payload: Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            next_free_index: self.next_free_index,
            high_water: self.high_water,
            count: self.count,
            drop_policy: self.drop_policy,
        }
    }
}

impl<S: Storage> Drop for Pool<S> {
    fn drop(&mut self) {
        let was_empty = self.count == 0;

        // The entries drop any occupied payloads when the boxed slice is dropped after this.
        //
        // If we are already panicking, we do not want to panic again because that will
        // simply obscure whatever the original panic was, leading to debug difficulties.
        if self.drop_policy == DropPolicy::MustNotDropItems && !thread::panicking() {
            assert!(
                was_empty,
                "dropped a non-empty pool of {} with a policy that says it must be empty when dropped",
                type_name::<S::Value>()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::{ObjectSemantics, ValueSemantics};

    type SmallPool = Pool<ValueSemantics<u32, 3>>;

    struct Droppable {
        dropped: Rc<Cell<usize>>,
    }

    impl Drop for Droppable {
        fn drop(&mut self) {
            self.dropped.set(self.dropped.get().wrapping_add(1));
        }
    }

    #[test]
    fn smoke_test() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        let index_a = pool.insert(Link::default(), 42);
        let index_b = pool.insert(Link::default(), 43);
        let index_c = pool.insert(Link::default(), 44);

        assert_eq!(pool.get(index_a), Some(&42));
        assert_eq!(pool.get(index_b), Some(&43));
        assert_eq!(pool.get(index_c), Some(&44));

        assert_eq!(pool.len(), 3);
        assert!(pool.is_full());

        assert_eq!(pool.remove(index_b), 43);

        assert_eq!(pool.len(), 2);
        assert!(!pool.is_full());

        let index_d = pool.insert(Link::default(), 45);

        // The freed slot is reused.
        assert_eq!(index_d, index_b);
        assert_eq!(pool.get(index_a), Some(&42));
        assert_eq!(pool.get(index_c), Some(&44));
        assert_eq!(pool.get(index_d), Some(&45));

        pool.integrity_check();
    }

    #[test]
    fn next_index_predicts_insert() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        for value in 0..3 {
            let expected = pool.next_index().unwrap();
            assert_eq!(pool.insert(Link::default(), value), expected);
        }

        assert_eq!(pool.next_index(), None);

        _ = pool.remove(1);
        assert_eq!(pool.next_index(), Some(1));
    }

    #[test]
    fn freed_slots_are_reused_most_recent_first() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        let a = pool.insert(Link::default(), 1);
        let b = pool.insert(Link::default(), 2);

        _ = pool.remove(a);
        _ = pool.remove(b);

        assert_eq!(pool.insert(Link::default(), 3), b);
        assert_eq!(pool.insert(Link::default(), 4), a);

        pool.integrity_check();
    }

    #[test]
    #[should_panic]
    fn panic_when_full() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        _ = pool.insert(Link::default(), 42);
        _ = pool.insert(Link::default(), 43);
        _ = pool.insert(Link::default(), 44);

        _ = pool.insert(Link::default(), 45);
    }

    #[test]
    fn get_vacant_is_none() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        assert_eq!(pool.get(0), None);
        assert_eq!(pool.get(1234), None);
        assert!(pool.get_mut(2).is_none());
        assert!(!pool.is_occupied(0));
    }

    #[test]
    #[should_panic]
    fn remove_vacant_panics() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        _ = pool.insert(Link::default(), 1);
        _ = pool.remove(0);
        _ = pool.remove(0);
    }

    #[test]
    #[should_panic]
    fn link_of_vacant_panics() {
        let pool = SmallPool::new(DropPolicy::MayDropItems);

        _ = pool.link(0);
    }

    #[test]
    fn links_are_stored_with_payload() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        let index = pool.insert(Link::between(None, Some(2)), 7);
        assert_eq!(pool.link(index), Link::between(None, Some(2)));

        pool.link_mut(index).previous = Some(1);
        assert_eq!(pool.link(index), Link::between(Some(1), Some(2)));
    }

    #[test]
    fn clear_without_drop_forgets_everything() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        _ = pool.insert(Link::default(), 1);
        _ = pool.insert(Link::default(), 2);
        _ = pool.remove(0);

        assert_eq!(pool.clear(), 1);

        assert_eq!(pool.len(), 0);
        assert_eq!(pool.get(1), None);
        assert_eq!(pool.next_index(), Some(0));

        // Stale entries beyond the high water mark are overwritten without complaint.
        for value in 0..3 {
            _ = pool.insert(Link::default(), value);
        }

        assert!(pool.is_full());
        pool.integrity_check();
    }

    #[test]
    fn clear_drops_payloads() {
        let dropped = Rc::new(Cell::new(0));
        let mut pool = Pool::<ObjectSemantics<Droppable, 4>>::new(DropPolicy::MayDropItems);

        for _ in 0..3 {
            _ = pool.insert(
                Link::default(),
                Droppable {
                    dropped: Rc::clone(&dropped),
                },
            );
        }

        assert_eq!(pool.clear(), 3);
        assert_eq!(dropped.get(), 3);

        pool.integrity_check();
    }

    #[test]
    fn drop_drops_payloads() {
        let dropped = Rc::new(Cell::new(0));
        let mut pool = Pool::<ObjectSemantics<Droppable, 4>>::new(DropPolicy::MayDropItems);

        _ = pool.insert(
            Link::default(),
            Droppable {
                dropped: Rc::clone(&dropped),
            },
        );

        drop(pool);

        assert_eq!(dropped.get(), 1);
    }

    #[test]
    fn index_of_finds_items() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        let a = pool.insert(Link::default(), 10);
        let b = pool.insert(Link::default(), 20);

        let a_ptr = ptr::from_ref(pool.get(a).unwrap()).cast::<u8>();
        let b_ptr = ptr::from_ref(pool.get(b).unwrap()).cast::<u8>();

        assert_eq!(pool.index_of(a_ptr), Some(a));
        assert_eq!(pool.index_of(b_ptr), Some(b));

        let outsider = 10_u32;
        assert_eq!(pool.index_of(ptr::from_ref(&outsider).cast()), None);
    }

    #[test]
    fn index_of_freed_item_is_none() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        let a = pool.insert(Link::default(), 10);
        let a_ptr = ptr::from_ref(pool.get(a).unwrap()).cast::<u8>();

        _ = pool.remove(a);

        assert_eq!(pool.index_of(a_ptr), None);
    }

    #[test]
    fn clone_copies_items_and_slots() {
        let mut pool = SmallPool::new(DropPolicy::MayDropItems);

        let a = pool.insert(Link::default(), 10);
        let b = pool.insert(Link::default(), 20);
        _ = pool.remove(a);

        let clone = pool.clone();

        assert_eq!(clone.len(), 1);
        assert_eq!(clone.get(b), Some(&20));
        assert_eq!(clone.next_index(), Some(a));

        clone.integrity_check();
    }

    #[test]
    #[should_panic]
    fn drop_item_with_forbidden_to_drop_policy_panics() {
        let mut pool = SmallPool::new(DropPolicy::MustNotDropItems);
        _ = pool.insert(Link::default(), 123);
    }

    #[test]
    fn drop_itemless_with_forbidden_to_drop_policy_ok() {
        drop(SmallPool::new(DropPolicy::MustNotDropItems));
    }

    #[test]
    #[should_panic]
    fn zero_capacity_is_panic() {
        drop(Pool::<ValueSemantics<usize, 0>>::new(DropPolicy::MayDropItems));
    }
}
