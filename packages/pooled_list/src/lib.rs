//! A fixed-capacity doubly linked list whose items live in a pool allocated once, up front.
//!
//! This crate provides [`List`], a doubly linked list that links its items to each other by
//! slot index instead of by pointer. All the memory the list will ever use is allocated when the
//! list is created, so inserting and erasing items never touches the allocator. Both are O(1)
//! anywhere in the list.
//!
//! # Key Features
//!
//! - **No allocation after creation**: The pool holds room for `CAPACITY` items from the start
//! - **Stable positions**: A [`Position`] stays valid until its own item is erased, regardless
//!   of what happens to other items
//! - **Checked positions**: Positions remember which list they came from and are rejected by
//!   other lists
//! - **Three storage strategies**: flat `Copy` values, owned objects, or a mix of concrete types
//!   viewed through a common trait object
//! - **In-place insertion**: Reserve a slot, learn its position, then write the item into it
//! - **Flexible drop policies**: Configure behavior when the list is dropped with remaining items
//!
//! # Storage strategies
//!
//! The strategy is chosen through the type of the list:
//!
//! | Alias | Items | Erasing an item |
//! |-------|-------|-----------------|
//! | [`ValueList<T, N>`] | `T: Copy` | forgets the bits |
//! | [`ObjectList<T, N>`] | any `T` | drops the `T` |
//! | [`VirtualList<D, N, MAX_SIZE>`] | any `T: AsDyn<D>` up to `MAX_SIZE` bytes | drops the concrete `T` |
//!
//! # Positions and the end
//!
//! Every list has a single end position that terminates traversal in both directions. Stepping
//! forward from the last item or backward from the first item yields the end position, and
//! stepping from the end position wraps around to the other side of the list.
//!
//! Erasing returns the position of the predecessor of the erased item, which allows erasing
//! while walking backward.
//!
//! # Examples
//!
//! ## Values
//!
//! ```rust
//! use pooled_list::ValueList;
//!
//! let mut list = ValueList::<u32, 4>::new();
//!
//! list.push_back(1);
//! list.push_back(2);
//! list.push_back(3);
//!
//! list.erase(list.begin());
//! let nine = list.insert_after(list.begin(), 9);
//!
//! assert_eq!(list.value(nine), &9);
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), [2, 9, 3]);
//! ```
//!
//! ## Trait objects
//!
//! ```rust
//! use pooled_list::{VirtualList, impl_as_dyn};
//!
//! trait Animal {
//!     fn legs(&self) -> u32;
//! }
//!
//! struct Bird;
//! struct Dog {
//!     age: u8,
//! }
//!
//! impl Animal for Bird {
//!     fn legs(&self) -> u32 {
//!         2
//!     }
//! }
//!
//! impl Animal for Dog {
//!     fn legs(&self) -> u32 {
//!         4
//!     }
//! }
//!
//! impl_as_dyn!(dyn Animal => Bird, Dog);
//!
//! let mut zoo = VirtualList::<dyn Animal, 8, 16>::new();
//! zoo.push_back(Bird);
//! zoo.push_back(Dog { age: 3 });
//!
//! assert_eq!(zoo.iter().map(|animal| animal.legs()).sum::<u32>(), 6);
//! ```
//!
//! ## Fallible operations
//!
//! ```rust
//! use pooled_list::{Error, ValueList};
//!
//! let mut list = ValueList::<u32, 1>::new();
//! list.push_back(1);
//!
//! assert_eq!(list.try_push_back(2), Err(Error::Full { capacity: 1 }));
//! assert_eq!(list.try_erase(list.end()), Err(Error::EndPosition));
//! ```

mod builder;
mod cursor;
mod drop_policy;
mod error;
mod iter;
mod link;
mod list;
mod pool;
mod position;
mod raw_slot;
mod storage;
mod virtual_storage;

pub use builder::*;
pub use cursor::*;
pub use drop_policy::*;
pub use error::Error;
pub use iter::*;
pub(crate) use link::*;
pub use list::*;
pub(crate) use pool::*;
pub(crate) use position::ListId;
pub use position::Position;
pub use raw_slot::*;
pub use storage::*;
pub use virtual_storage::*;
