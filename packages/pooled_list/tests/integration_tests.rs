//! Integration tests for the `pooled_list` package.
//!
//! These exercise the public API the way a consumer would: walking and editing lists through
//! positions, cursors and iterators, and holding mixed item types behind a trait object.

use std::cell::RefCell;
use std::error::Error as StdError;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;
use std::thread;

use pooled_list::{
    AsDyn, DropPolicy, Error, ObjectList, Position, ValueList, VirtualList, impl_as_dyn,
};
use static_assertions::{assert_impl_all, assert_not_impl_any};

assert_impl_all!(ValueList<u64, 8>: Send, Sync, Clone, Debug, Default);
assert_impl_all!(ObjectList<String, 8>: Send, Sync, Clone, Debug);
assert_impl_all!(Position: Send, Sync, Copy, Eq, Hash);
assert_impl_all!(Error: Send, Sync, StdError);
assert_not_impl_any!(VirtualList<dyn Greeter, 8, 32>: Send, Sync, Clone);
assert_impl_all!(VirtualList<dyn Greeter + Send, 8, 32>: Send);

trait Greeter {
    fn greet(&self) -> String;
}

struct English;

struct Named {
    name: String,
}

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

impl Greeter for Named {
    fn greet(&self) -> String {
        format!("hi, {}", self.name)
    }
}

impl_as_dyn!(dyn Greeter => English, Named);
impl_as_dyn!(dyn Greeter + Send => English, Named);

fn contents<T: Copy, const CAPACITY: usize>(list: &ValueList<T, CAPACITY>) -> Vec<T> {
    list.iter().copied().collect()
}

#[test]
fn walk_forward_and_backward_by_position() {
    let list: ValueList<char, 8> = "abcde".chars().collect();

    let mut forward = String::new();
    let mut position = list.begin();
    while position != list.end() {
        forward.push(*list.value(position));
        position = list.next(position);
    }

    let mut backward = String::new();
    let mut position = list.rbegin();
    while position != list.end() {
        backward.push(*list.value(position));
        position = list.prev(position);
    }

    assert_eq!(forward, "abcde");
    assert_eq!(backward, "edcba");
}

#[test]
fn fill_drain_and_refill() {
    let mut list = ValueList::<u32, 16>::new();

    for round in 0..3 {
        for value in 0..16 {
            list.push_back(round * 100 + value);
        }

        assert!(list.is_full());
        assert_eq!(list.try_push_front(0), Err(Error::Full { capacity: 16 }));

        // Erase every other item, then the rest.
        let mut position = list.begin();
        while !position.is_end() {
            let next = list.next(position);
            list.erase(position);
            position = if next.is_end() { next } else { list.next(next) };
        }

        assert_eq!(list.len(), 8);

        while let Some(value) = list.pop_back() {
            assert_eq!(value % 2, 1);
        }

        assert!(list.is_empty());
    }
}

#[test]
fn positions_survive_neighbor_churn() {
    let mut list = ValueList::<u32, 8>::new();

    let anchor = list.push_back(42);

    for value in 0..20 {
        let before = list.insert(anchor, value);
        let after = list.insert_after(anchor, value);

        list.erase(before);
        list.erase(after);
    }

    assert_eq!(list.len(), 1);
    assert_eq!(list.value(anchor), &42);
    assert_eq!(list.begin(), anchor);
    assert_eq!(list.rbegin(), anchor);
}

#[test]
fn stale_position_after_slot_reuse_refers_to_new_item() {
    let mut list = ValueList::<u32, 1>::new();

    let old = list.push_back(1);
    list.erase(old);
    let new = list.push_back(2);

    // Both positions refer to the same slot of the same list.
    assert_eq!(old, new);
    assert_eq!(list.value(old), &2);
}

#[test]
fn foreign_positions_never_resolve() {
    let mut a = ValueList::<u32, 4>::new();
    let mut b = ValueList::<u32, 4>::new();

    let a_pos = a.push_back(1);
    b.push_back(1);

    assert_eq!(b.get(a_pos), None);
    assert_eq!(b.position_of(a.value(a_pos)), None);
    assert_eq!(b.try_insert_after(a_pos, 2), Err(Error::ForeignPosition));

    // A clone is a different list too.
    let c = a.clone();
    assert_eq!(c.get(a_pos), None);
    assert_eq!(c.get(c.begin()), Some(&1));
}

#[test]
fn insert_after_end_places_item_after_front() {
    let mut list: ValueList<u32, 8> = [1, 2, 3].into_iter().collect();

    list.insert_after(list.end(), 10);
    assert_eq!(contents(&list), [1, 10, 2, 3]);

    let mut empty = ValueList::<u32, 8>::new();
    let only = empty.insert_after(empty.end(), 7);
    assert_eq!(empty.begin(), only);
    assert_eq!(empty.rbegin(), only);
}

#[test]
fn cursor_edits_in_place() {
    let mut list: ValueList<u32, 16> = (1..=6).collect();

    // Follow each even number with a zero.
    let mut cursor = list.cursor_mut(list.begin());
    while !cursor.is_end() {
        let value = cursor.current().copied();

        if value.is_some_and(|value| value % 2 == 0) {
            // The cursor moves to the inserted zero.
            cursor.insert_after(0);
        }

        cursor.move_next();
    }

    assert_eq!(contents(&list), [1, 2, 0, 3, 4, 0, 5, 6, 0]);
}

#[test]
fn object_list_moves_items_in_and_out() {
    let mut list = ObjectList::<Vec<u8>, 4>::new();

    list.push_back(vec![1]);
    list.push_back(vec![2, 2]);
    list.push_front_default().push(0);

    let sizes: Vec<usize> = list.iter().map(Vec::len).collect();
    assert_eq!(sizes, [1, 1, 2]);

    let (_, removed) = list.remove(list.rbegin());
    assert_eq!(removed, [2, 2]);

    let rest: Vec<Vec<u8>> = list.into_iter().collect();
    assert_eq!(rest, [vec![0], vec![1]]);
}

#[test]
fn object_list_drops_every_item_exactly_once() {
    struct Tracked {
        id: u32,
        log: Rc<RefCell<Vec<u32>>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.log.borrow_mut().push(self.id);
        }
    }

    let log = Rc::new(RefCell::new(Vec::new()));
    let mut list = ObjectList::<Tracked, 8>::new();

    let track = |id| Tracked {
        id,
        log: Rc::clone(&log),
    };

    let first = list.push_back(track(1));
    list.push_back(track(2));
    list.push_back(track(3));

    list.erase(first);
    assert_eq!(*log.borrow(), [1]);

    let popped = list.pop_front();
    assert_eq!(*log.borrow(), [1]);
    drop(popped);
    assert_eq!(*log.borrow(), [1, 2]);

    list.push_back(track(4));
    list.clear();

    let mut dropped = log.borrow().clone();
    dropped.sort_unstable();
    assert_eq!(dropped, [1, 2, 3, 4]);
}

#[test]
fn virtual_list_of_trait_objects() {
    let mut list = VirtualList::<dyn Greeter, 8, 32>::new();

    list.push_back(English);
    let named = list.push_back(Named {
        name: "Ada".to_string(),
    });
    list.push_front(English);

    let greetings: Vec<String> = list.iter().map(|greeter| greeter.greet()).collect();
    assert_eq!(greetings, ["hello", "hello", "hi, Ada"]);

    assert_eq!(list.value(named).greet(), "hi, Ada");

    let front = list.begin();
    list.erase(front);
    assert_eq!(list.len(), 2);
}

#[test]
fn virtual_list_raw_slot_knows_its_position_first() {
    let mut list = VirtualList::<dyn Greeter, 4, 32>::new();

    let slot = list.push_back_raw();
    let position = slot.position();
    let name = format!("slot {}", slot.index());
    slot.write(Named { name });

    assert_eq!(list.value(position).greet(), "hi, slot 0");
}

#[test]
fn virtual_list_moves_between_threads() {
    let mut list = VirtualList::<dyn Greeter + Send, 4, 32>::new();
    list.push_back(Named {
        name: "thread".to_string(),
    });

    let greeting = thread::spawn(move || list.front().map(|greeter| greeter.greet()))
        .join()
        .unwrap();

    assert_eq!(greeting.as_deref(), Some("hi, thread"));
}

#[test]
fn value_list_shared_between_threads() {
    let list: ValueList<u64, 64> = (1..=64).collect();

    thread::scope(|scope| {
        let forward = scope.spawn(|| list.iter().sum::<u64>());
        let backward = scope.spawn(|| list.iter().rev().sum::<u64>());

        assert_eq!(forward.join().unwrap(), 2080);
        assert_eq!(backward.join().unwrap(), 2080);
    });
}

#[test]
fn as_dyn_views_concrete_type() {
    let mut english = English;

    assert_eq!(AsDyn::<dyn Greeter>::as_dyn(&english).greet(), "hello");
    assert_eq!(
        AsDyn::<dyn Greeter>::as_dyn_mut(&mut english).greet(),
        "hello"
    );
}

#[test]
fn must_not_drop_policy_accepts_emptied_list() {
    let mut list = ObjectList::<String, 4>::builder()
        .drop_policy(DropPolicy::MustNotDropItems)
        .build();

    list.push_back("x".to_string());
    list.clear();

    drop(list);
}

#[test]
#[should_panic]
fn must_not_drop_policy_rejects_non_empty_list() {
    let mut list = ObjectList::<String, 4>::builder()
        .drop_policy(DropPolicy::MustNotDropItems)
        .build();

    list.push_back("x".to_string());

    drop(list);
}

#[test]
fn equal_lists_have_equal_items_in_order() {
    let a: ValueList<u32, 4> = [1, 2, 3].into_iter().collect();
    let mut b = ValueList::<u32, 8>::new();

    b.push_front(3);
    b.push_front(2);
    b.push_front(1);

    assert!(a.iter().eq(b.iter()));

    let mut c: ValueList<u32, 4> = [3, 2, 1].into_iter().collect();
    assert_ne!(a, c);

    c.clear();
    c.extend([1, 2, 3]);
    assert_eq!(a, c);
}
