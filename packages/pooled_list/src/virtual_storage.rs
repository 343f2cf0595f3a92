use std::any::type_name;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::{fmt, ptr};

use crate::{Embed, Storage};

/// Alignment of the inline buffer of a [`VirtualSemantics`] slot. Items with a stricter
/// alignment requirement cannot be stored in such a list.
pub const MAX_ALIGN: usize = 16;

/// Items are values of any concrete type that can be viewed as `D` and that fit into
/// `MAX_SIZE` bytes.
///
/// `D` is typically a trait object type such as `dyn Shape`, which allows one list to hold items
/// of different concrete types. Each slot reserves `MAX_SIZE` bytes (aligned to [`MAX_ALIGN`])
/// plus a small amount of bookkeeping to remember how to view and drop its occupant.
///
/// The list never default-constructs items of this strategy. Items are placed into the list
/// either directly (`push_back(value)`) or via a [`RawSlot`][crate::RawSlot] reserved in
/// advance, which reveals the slot index before the item exists.
///
/// This type is only used as a type parameter and is never instantiated.
#[derive(Debug)]
pub struct VirtualSemantics<D: ?Sized, const CAPACITY: usize, const MAX_SIZE: usize> {
    _item: PhantomData<*const D>,
}

/// Views a concrete type as a (usually unsized) type `D`.
///
/// Every sized type can be viewed as itself. To view a type as a trait object, implement this
/// trait for it, most conveniently via [`impl_as_dyn!`][crate::impl_as_dyn]:
///
/// ```
/// use pooled_list::{impl_as_dyn, VirtualList};
///
/// trait Shape {
///     fn corners(&self) -> u32;
/// }
///
/// struct Triangle;
/// struct Square;
///
/// impl Shape for Triangle {
///     fn corners(&self) -> u32 {
///         3
///     }
/// }
///
/// impl Shape for Square {
///     fn corners(&self) -> u32 {
///         4
///     }
/// }
///
/// impl_as_dyn!(dyn Shape => Triangle, Square);
///
/// let mut list = VirtualList::<dyn Shape, 8, 16>::new();
/// list.push_back(Triangle);
/// list.push_back(Square);
///
/// assert_eq!(list.iter().map(|s| s.corners()).sum::<u32>(), 7);
/// ```
///
/// # Safety
///
/// A [`VirtualList`][crate::VirtualList] only knows its items as `D`, so it relies on the
/// following guarantees to keep the concrete type sound:
///
/// * `as_dyn()` and `as_dyn_mut()` return a view of `self` itself, not of some other value.
/// * `Self` lives at least as long as `D`. For a trait object type without an explicit lifetime,
///   this means `Self: 'static`.
/// * `Self` implements every auto trait (such as `Send` and `Sync`) that `D` implements.
///
/// [`impl_as_dyn!`][crate::impl_as_dyn] upholds all of these by construction, because the unsizing
/// coercion it relies on only compiles if they hold. Prefer it over implementing this trait by hand.
///
/// Implementing the trait without `unsafe` is rejected:
///
/// ```compile_fail
/// use pooled_list::AsDyn;
///
/// trait Shape {}
///
/// struct Circle;
///
/// impl Shape for Circle {}
///
/// impl AsDyn<dyn Shape> for Circle {
///     fn as_dyn(&self) -> &(dyn Shape + 'static) {
///         self
///     }
///
///     fn as_dyn_mut(&mut self) -> &mut (dyn Shape + 'static) {
///         self
///     }
/// }
/// ```
pub unsafe trait AsDyn<D: ?Sized> {
    /// Borrows `self` as `D`.
    fn as_dyn(&self) -> &D;

    /// Exclusively borrows `self` as `D`.
    fn as_dyn_mut(&mut self) -> &mut D;
}

// SAFETY: The view is `self` itself, with the same type and therefore the same lifetime and
// auto traits.
unsafe impl<T> AsDyn<T> for T {
    #[inline]
    fn as_dyn(&self) -> &T {
        self
    }

    #[inline]
    fn as_dyn_mut(&mut self) -> &mut T {
        self
    }
}

/// Implements [`AsDyn`] for a list of concrete types, viewing each as the given trait object type.
///
/// ```
/// use pooled_list::{impl_as_dyn, AsDyn};
///
/// trait Named {
///     fn name(&self) -> &str;
/// }
///
/// struct Alice;
///
/// impl Named for Alice {
///     fn name(&self) -> &str {
///         "Alice"
///     }
/// }
///
/// impl_as_dyn!(dyn Named => Alice);
///
/// let named: &dyn Named = AsDyn::<dyn Named>::as_dyn(&Alice);
/// assert_eq!(named.name(), "Alice");
/// ```
///
/// Types that are not `'static` cannot be viewed as a trait object without an explicit lifetime:
///
/// ```compile_fail
/// use pooled_list::impl_as_dyn;
///
/// trait Named {}
///
/// struct Borrowed<'a>(&'a str);
///
/// impl Named for Borrowed<'_> {}
///
/// impl_as_dyn!(dyn Named => Borrowed<'_>);
/// ```
///
/// Nor can a type be viewed as a trait object carrying an auto trait that the type lacks:
///
/// ```compile_fail
/// use std::rc::Rc;
///
/// use pooled_list::impl_as_dyn;
///
/// trait Named {}
///
/// struct Shared(Rc<str>);
///
/// impl Named for Shared {}
///
/// impl_as_dyn!(dyn Named + Send => Shared);
/// ```
#[macro_export]
macro_rules! impl_as_dyn {
    ($target:ty => $($concrete:ty),+ $(,)?) => {
        const _: () = {
            // Naming the target through an alias pins its object lifetime to 'static,
            // matching the lifetime implied by the trait header.
            type Target = $target;

            $(
                // SAFETY: The view is `self` unsized into `Target`. That coercion only compiles if
                // the concrete type outlives `Target` and has every auto trait of `Target`.
                unsafe impl $crate::AsDyn<Target> for $concrete {
                    #[inline]
                    fn as_dyn(&self) -> &Target {
                        self
                    }

                    #[inline]
                    fn as_dyn_mut(&mut self) -> &mut Target {
                        self
                    }
                }
            )+
        };
    };
}

#[repr(C, align(16))]
struct InlineBuffer<const MAX_SIZE: usize>([MaybeUninit<u8>; MAX_SIZE]);

/// The payload of one [`VirtualSemantics`] slot: an item of some concrete type stored inline,
/// together with the type-erased functions needed to view it as `D` and to drop it.
///
/// Instances only ever exist inside the pool of a list; you interact with the item through `&D`
/// and `&mut D` references handed out by the list.
///
/// The item is first placed into a stack-allocated buffer and that buffer is then moved into the
/// pool slot, so constructing a payload costs a copy of `MAX_SIZE` bytes.
pub struct InlineDyn<D: ?Sized, const MAX_SIZE: usize> {
    buffer: InlineBuffer<MAX_SIZE>,

    /// Name of the concrete type, for diagnostics.
    type_name: &'static str,

    view: unsafe fn(*const u8) -> *const D,
    view_mut: unsafe fn(*mut u8) -> *mut D,
    drop_fn: unsafe fn(*mut u8),

    // The occupant outlives D and has every auto trait of D (`AsDyn` contract), so D stands in
    // for the concrete type when the compiler checks lifetimes and thread mobility.
    _item: PhantomData<D>,
}

impl<D: ?Sized, const MAX_SIZE: usize> InlineDyn<D, MAX_SIZE> {
    /// # Panics
    ///
    /// Panics if `T` is larger than `MAX_SIZE` or more strictly aligned than [`MAX_ALIGN`].
    #[must_use]
    pub(crate) fn new<T: AsDyn<D>>(value: T) -> Self {
        assert!(
            size_of::<T>() <= MAX_SIZE,
            "{} is {} bytes, which does not fit into a virtual list slot of {MAX_SIZE} bytes",
            type_name::<T>(),
            size_of::<T>()
        );
        assert!(
            align_of::<T>() <= MAX_ALIGN,
            "{} requires {}-byte alignment but virtual list slots are only {MAX_ALIGN}-byte aligned",
            type_name::<T>(),
            align_of::<T>()
        );

        let mut buffer = InlineBuffer([MaybeUninit::uninit(); MAX_SIZE]);

        // SAFETY: The buffer is large enough and sufficiently aligned for T, as asserted above.
        unsafe {
            buffer.0.as_mut_ptr().cast::<T>().write(value);
        }

        Self {
            buffer,
            type_name: type_name::<T>(),
            view: view::<T, D>,
            view_mut: view_mut::<T, D>,
            drop_fn: drop_in_buffer::<T>,
            _item: PhantomData,
        }
    }

    #[must_use]
    pub(crate) fn get(&self) -> &D {
        // SAFETY: The buffer holds an initialized value of the type that `view` was created for.
        // The `AsDyn` contract makes the view point at that value itself, so it is derived from a
        // shared borrow of the buffer and valid for as long as `self` is borrowed.
        unsafe { &*(self.view)(self.buffer.0.as_ptr().cast()) }
    }

    #[must_use]
    pub(crate) fn get_mut(&mut self) -> &mut D {
        // SAFETY: The buffer holds an initialized value of the type that `view_mut` was created
        // for. The `AsDyn` contract makes the view point at that value itself, so it is derived
        // from an exclusive borrow of the buffer and is valid and unaliased for as long as `self`
        // is exclusively borrowed.
        unsafe { &mut *(self.view_mut)(self.buffer.0.as_mut_ptr().cast()) }
    }
}

impl<D: ?Sized, const MAX_SIZE: usize> Drop for InlineDyn<D, MAX_SIZE> {
    fn drop(&mut self) {
        // SAFETY: The buffer holds an initialized value of the type that `drop_fn` was created
        // for and this is the only place where that value is dropped.
        unsafe {
            (self.drop_fn)(self.buffer.0.as_mut_ptr().cast());
        }
    }
}

impl<D: ?Sized, const MAX_SIZE: usize> fmt::Debug for InlineDyn<D, MAX_SIZE> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineDyn")
            .field("type_name", &self.type_name)
            .field("max_size", &MAX_SIZE)
            .finish_non_exhaustive()
    }
}

/// # Safety
///
/// `bytes` must point to an initialized `T`.
unsafe fn view<T: AsDyn<D>, D: ?Sized>(bytes: *const u8) -> *const D {
    // SAFETY: Forwarding the caller's guarantee.
    let value = unsafe { &*bytes.cast::<T>() };
    ptr::from_ref(value.as_dyn())
}

/// # Safety
///
/// `bytes` must point to an initialized `T` that is not aliased.
unsafe fn view_mut<T: AsDyn<D>, D: ?Sized>(bytes: *mut u8) -> *mut D {
    // SAFETY: Forwarding the caller's guarantee.
    let value = unsafe { &mut *bytes.cast::<T>() };
    ptr::from_mut(value.as_dyn_mut())
}

/// # Safety
///
/// `bytes` must point to an initialized `T` that is never used again afterwards.
unsafe fn drop_in_buffer<T>(bytes: *mut u8) {
    // SAFETY: Forwarding the caller's guarantee.
    unsafe {
        ptr::drop_in_place(bytes.cast::<T>());
    }
}

impl<D: ?Sized, const CAPACITY: usize, const MAX_SIZE: usize> Storage
    for VirtualSemantics<D, CAPACITY, MAX_SIZE>
{
    type Value = D;
    type Payload = InlineDyn<D, MAX_SIZE>;

    const CAPACITY: usize = CAPACITY;

    #[inline]
    fn value(payload: &Self::Payload) -> &D {
        payload.get()
    }

    #[inline]
    fn value_mut(payload: &mut Self::Payload) -> &mut D {
        payload.get_mut()
    }
}

impl<D: ?Sized, T: AsDyn<D>, const CAPACITY: usize, const MAX_SIZE: usize> Embed<T>
    for VirtualSemantics<D, CAPACITY, MAX_SIZE>
{
    #[inline]
    fn embed(value: T) -> Self::Payload {
        InlineDyn::new(value)
    }
}
