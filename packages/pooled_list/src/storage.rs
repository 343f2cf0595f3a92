use std::marker::PhantomData;

/// Governs how a list item is embedded in a pool slot and how its lifetime is managed.
///
/// The list algorithm is written once against this trait and the strategy is selected at compile
/// time through the list's type parameter. Three strategies are provided:
///
/// * [`ValueSemantics`] - flat `Copy` values with no destruction logic.
/// * [`ObjectSemantics`] - any type, constructed and dropped following normal Rust ownership.
/// * [`VirtualSemantics`][crate::VirtualSemantics] - any type that can be viewed as `D` (usually
///   a trait object) and fits into a fixed-size inline buffer.
///
/// The strategy also fixes the capacity of the list.
pub trait Storage {
    /// The item type as seen by users of the list. May be unsized (e.g. `dyn Trait`).
    type Value: ?Sized;

    /// What is physically stored in a pool slot next to the slot's links.
    type Payload;

    /// Number of slots in the pool. A list never holds more items than this.
    const CAPACITY: usize;

    /// Borrows the item stored in a payload.
    fn value(payload: &Self::Payload) -> &Self::Value;

    /// Exclusively borrows the item stored in a payload.
    fn value_mut(payload: &mut Self::Payload) -> &mut Self::Value;
}

/// Storage strategies that can embed a `T` as a list item.
///
/// For [`ValueSemantics`] and [`ObjectSemantics`] the only embeddable type is the item type
/// itself. [`VirtualSemantics`][crate::VirtualSemantics] accepts any type that can be viewed
/// as its item type.
pub trait Embed<T>: Storage {
    /// Wraps `value` into a payload ready to be placed in a pool slot.
    fn embed(value: T) -> Self::Payload;
}

/// Storage strategies whose items are plain owned values that the list may construct and
/// hand back to the caller.
///
/// This is what enables default construction (`push_back_default()` and friends) and taking items
/// back out of the list (`pop_front()`, `remove()`, by-value iteration). The polymorphic strategy
/// does not implement it, as the list does not know the concrete type of its items.
pub trait Construct: Storage {
    /// The owned item type.
    type Item;

    /// Wraps an owned item into a payload.
    fn construct(item: Self::Item) -> Self::Payload;

    /// Unwraps a payload that has been removed from the pool back into the owned item.
    fn deconstruct(payload: Self::Payload) -> Self::Item;
}

/// Items are flat `Copy` values.
///
/// Nothing needs to happen when an item is removed, which also makes clearing the list O(1).
///
/// This type is only used as a type parameter and is never instantiated.
#[derive(Debug)]
pub struct ValueSemantics<T, const CAPACITY: usize> {
    _item: PhantomData<fn() -> T>,
}

impl<T: Copy, const CAPACITY: usize> Storage for ValueSemantics<T, CAPACITY> {
    type Value = T;
    type Payload = T;

    const CAPACITY: usize = CAPACITY;

    #[inline]
    fn value(payload: &T) -> &T {
        payload
    }

    #[inline]
    fn value_mut(payload: &mut T) -> &mut T {
        payload
    }
}

impl<T: Copy, const CAPACITY: usize> Embed<T> for ValueSemantics<T, CAPACITY> {
    #[inline]
    fn embed(value: T) -> T {
        value
    }
}

impl<T: Copy, const CAPACITY: usize> Construct for ValueSemantics<T, CAPACITY> {
    type Item = T;

    #[inline]
    fn construct(item: T) -> T {
        item
    }

    #[inline]
    fn deconstruct(payload: T) -> T {
        payload
    }
}

/// Items are full Rust objects that are dropped when they are erased from the list,
/// when the list is cleared and when the list itself is dropped.
///
/// This type is only used as a type parameter and is never instantiated.
#[derive(Debug)]
pub struct ObjectSemantics<T, const CAPACITY: usize> {
    _item: PhantomData<fn() -> T>,
}

impl<T, const CAPACITY: usize> Storage for ObjectSemantics<T, CAPACITY> {
    type Value = T;
    type Payload = T;

    const CAPACITY: usize = CAPACITY;

    #[inline]
    fn value(payload: &T) -> &T {
        payload
    }

    #[inline]
    fn value_mut(payload: &mut T) -> &mut T {
        payload
    }
}

impl<T, const CAPACITY: usize> Embed<T> for ObjectSemantics<T, CAPACITY> {
    #[inline]
    fn embed(value: T) -> T {
        value
    }
}

impl<T, const CAPACITY: usize> Construct for ObjectSemantics<T, CAPACITY> {
    type Item = T;

    #[inline]
    fn construct(item: T) -> T {
        item
    }

    #[inline]
    fn deconstruct(payload: T) -> T {
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_semantics_exposes_payload_directly() {
        let mut payload = <ValueSemantics<u32, 4> as Embed<u32>>::embed(42);

        assert_eq!(*<ValueSemantics<u32, 4>>::value(&payload), 42);

        *<ValueSemantics<u32, 4>>::value_mut(&mut payload) = 43;
        assert_eq!(<ValueSemantics<u32, 4>>::deconstruct(payload), 43);
    }

    #[test]
    fn object_semantics_round_trips_owned_item() {
        let payload = <ObjectSemantics<String, 4>>::construct("hello".to_string());

        assert_eq!(<ObjectSemantics<String, 4>>::value(&payload), "hello");
        assert_eq!(<ObjectSemantics<String, 4>>::deconstruct(payload), "hello");
    }

    #[test]
    fn capacity_is_carried_by_the_strategy() {
        assert_eq!(<ValueSemantics<u8, 16> as Storage>::CAPACITY, 16);
        assert_eq!(<ObjectSemantics<String, 3> as Storage>::CAPACITY, 3);
    }
}
